//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑层，不依赖 DOM 或 web_sys：路由枚举、路径解析，以及核心的
//! 导航守卫判定。守卫有两种形态：通用的角色守卫，和学生专用的
//! "人脸注册前置"守卫，两者都在 [`decide`] 里按顺序评估。

use crate::session::{Session, decode_claims, token_expired};
use facesure_shared::Role;
use std::fmt::Display;

/// super-admin 区域内的用户管理动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    CreateUser,
    DeleteUser,
    Promote,
    AssignHod,
}

impl AdminAction {
    fn from_segment(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Self::CreateUser),
            "delete" => Some(Self::DeleteUser),
            "promote" => Some(Self::Promote),
            "assign-hod" => Some(Self::AssignHod),
            _ => None,
        }
    }

    fn segment(&self) -> &'static str {
        match self {
            Self::CreateUser => "create",
            Self::DeleteUser => "delete",
            Self::Promote => "promote",
            Self::AssignHod => "assign-hod",
        }
    }
}

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 学生面板（需要已完成人脸注册）
    Student,
    /// 学生历史记录（按学期分组）
    StudentHistory,
    /// 人脸注册（学生登录后的强制第一站）
    RegisterFace,
    Mentor,
    Hod,
    Guard,
    /// 门卫人脸核验，携带目标学生与请假单标识
    GuardVerifyFace {
        student_id: String,
        request_id: String,
    },
    SuperAdmin,
    SuperAdminAction(AdminAction),
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            [""] | ["login"] => Self::Login,
            ["student"] => Self::Student,
            ["student", "history"] => Self::StudentHistory,
            ["student", "register-face"] => Self::RegisterFace,
            ["mentor"] => Self::Mentor,
            ["hod"] => Self::Hod,
            ["guard"] => Self::Guard,
            ["guard", "verify-face", student_id, request_id] => Self::GuardVerifyFace {
                student_id: (*student_id).to_string(),
                request_id: (*request_id).to_string(),
            },
            ["super-admin"] => Self::SuperAdmin,
            ["super-admin", action] => match AdminAction::from_segment(action) {
                Some(action) => Self::SuperAdminAction(action),
                None => Self::NotFound,
            },
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Student => "/student".to_string(),
            Self::StudentHistory => "/student/history".to_string(),
            Self::RegisterFace => "/student/register-face".to_string(),
            Self::Mentor => "/mentor".to_string(),
            Self::Hod => "/hod".to_string(),
            Self::Guard => "/guard".to_string(),
            Self::GuardVerifyFace {
                student_id,
                request_id,
            } => format!("/guard/verify-face/{student_id}/{request_id}"),
            Self::SuperAdmin => "/super-admin".to_string(),
            Self::SuperAdminAction(action) => format!("/super-admin/{}", action.segment()),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// 允许进入该路由的角色集合；None 表示公开路由
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Self::Login | Self::NotFound => None,
            Self::Student | Self::StudentHistory | Self::RegisterFace => Some(&[Role::Student]),
            Self::Mentor => Some(&[Role::Mentor]),
            Self::Hod => Some(&[Role::Hod]),
            Self::Guard | Self::GuardVerifyFace { .. } => Some(&[Role::Guard]),
            Self::SuperAdmin | Self::SuperAdminAction(_) => {
                Some(&[Role::Admin, Role::SuperAdmin])
            }
        }
    }

    /// 学生专用：进入前要求人脸注册已完成
    fn requires_enrollment(&self) -> bool {
        matches!(self, Self::Student | Self::StudentHistory)
    }

    /// 登录成功后各角色的落地路由
    pub fn landing(session: &Session) -> Self {
        match session.role {
            Role::Student if !session.face_enrolled => Self::RegisterFace,
            Role::Student => Self::Student,
            Role::Mentor => Self::Mentor,
            Role::Hod => Self::Hod,
            Role::Guard => Self::Guard,
            Role::Admin | Role::SuperAdmin => Self::SuperAdmin,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// 守卫判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardVerdict {
    /// 放行
    Allow,
    /// 回登录页；`clear` 为 true 时会话已失效（损坏/过期），需要清掉
    ToLogin { clear: bool },
    /// 重定向到另一条路由（注册前置、已登录访问登录页等）
    Redirect(AppRoute),
}

/// **核心守卫逻辑**
///
/// 按声明顺序评估，首个命中生效：
/// 1. 无会话 → 登录页
/// 2. token 损坏或过期 → 清会话，登录页
/// 3. 角色不在路由允许集合 → 登录页（刻意不暴露"无权限"页面）
/// 4. 学生路由且未完成人脸注册 → 注册页
/// 5. 已登录访问登录页 → 各自落地路由
pub fn decide(route: &AppRoute, session: Option<&Session>, now_secs: i64) -> GuardVerdict {
    let allowed = route.allowed_roles();

    let Some(session) = session else {
        return match allowed {
            Some(_) => GuardVerdict::ToLogin { clear: false },
            None => GuardVerdict::Allow,
        };
    };

    // 会话存在：先验 token，公开路由也一样（过期会话要清掉）
    let valid = match decode_claims(&session.token) {
        Some(claims) => !token_expired(&claims, now_secs),
        None => false,
    };
    if !valid {
        return GuardVerdict::ToLogin { clear: true };
    }

    match allowed {
        None => {
            // 已登录访问登录页：送回落地路由
            if *route == AppRoute::Login {
                GuardVerdict::Redirect(AppRoute::landing(session))
            } else {
                GuardVerdict::Allow
            }
        }
        Some(roles) if !roles.contains(&session.role) => GuardVerdict::ToLogin { clear: false },
        Some(_) => {
            if route.requires_enrollment() && !session.face_enrolled {
                GuardVerdict::Redirect(AppRoute::RegisterFace)
            } else if *route == AppRoute::RegisterFace && session.face_enrolled {
                // 已注册完成，不再允许重复注册
                GuardVerdict::Redirect(AppRoute::Student)
            } else {
                GuardVerdict::Allow
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    const NOW: i64 = 1_760_000_000;

    fn token(sub: &str, exp: i64) -> String {
        let payload =
            URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{sub}","exp":{exp}}}"#).as_bytes());
        format!("eyJh.{payload}.sig")
    }

    fn session(role: Role, face_enrolled: bool) -> Session {
        Session {
            token: token("2455E1C001", NOW + 3600),
            role,
            user_id: "2455E1C001".to_string(),
            face_enrolled,
        }
    }

    #[test]
    fn path_roundtrip() {
        for route in [
            AppRoute::Login,
            AppRoute::Student,
            AppRoute::StudentHistory,
            AppRoute::RegisterFace,
            AppRoute::Mentor,
            AppRoute::Hod,
            AppRoute::Guard,
            AppRoute::GuardVerifyFace {
                student_id: "2455E1C001".into(),
                request_id: "R123".into(),
            },
            AppRoute::SuperAdmin,
            AppRoute::SuperAdminAction(AdminAction::Promote),
        ] {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn root_and_unknown_paths() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/does/not/exist"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/super-admin/format-disk"), AppRoute::NotFound);
    }

    #[test]
    fn no_session_never_renders_protected_views() {
        for route in [
            AppRoute::Student,
            AppRoute::StudentHistory,
            AppRoute::RegisterFace,
            AppRoute::Mentor,
            AppRoute::Hod,
            AppRoute::Guard,
            AppRoute::SuperAdmin,
            AppRoute::SuperAdminAction(AdminAction::CreateUser),
        ] {
            assert_eq!(
                decide(&route, None, NOW),
                GuardVerdict::ToLogin { clear: false },
                "{route:?}"
            );
        }
        assert_eq!(decide(&AppRoute::Login, None, NOW), GuardVerdict::Allow);
    }

    #[test]
    fn expired_token_clears_session() {
        let mut s = session(Role::Hod, false);
        s.token = token("25H001", NOW - 1);
        assert_eq!(
            decide(&AppRoute::Hod, Some(&s), NOW),
            GuardVerdict::ToLogin { clear: true }
        );
    }

    #[test]
    fn corrupt_token_treated_as_no_session() {
        let mut s = session(Role::Guard, false);
        s.token = "not-a-jwt".to_string();
        assert_eq!(
            decide(&AppRoute::Guard, Some(&s), NOW),
            GuardVerdict::ToLogin { clear: true }
        );
    }

    #[test]
    fn wrong_role_redirects_to_login_not_forbidden() {
        let guard = session(Role::Guard, false);
        for route in [AppRoute::Student, AppRoute::Hod, AppRoute::SuperAdmin] {
            assert_eq!(
                decide(&route, Some(&guard), NOW),
                GuardVerdict::ToLogin { clear: false }
            );
        }
        let student = session(Role::Student, true);
        assert_eq!(
            decide(&AppRoute::Guard, Some(&student), NOW),
            GuardVerdict::ToLogin { clear: false }
        );
    }

    #[test]
    fn unenrolled_student_is_forced_to_register_face() {
        let s = session(Role::Student, false);
        assert_eq!(
            decide(&AppRoute::Student, Some(&s), NOW),
            GuardVerdict::Redirect(AppRoute::RegisterFace)
        );
        assert_eq!(
            decide(&AppRoute::StudentHistory, Some(&s), NOW),
            GuardVerdict::Redirect(AppRoute::RegisterFace)
        );
        // 注册页本身放行
        assert_eq!(decide(&AppRoute::RegisterFace, Some(&s), NOW), GuardVerdict::Allow);
    }

    #[test]
    fn enrolled_student_reaches_dashboard() {
        let s = session(Role::Student, true);
        assert_eq!(decide(&AppRoute::Student, Some(&s), NOW), GuardVerdict::Allow);
        // 注册完成后不再进注册页
        assert_eq!(
            decide(&AppRoute::RegisterFace, Some(&s), NOW),
            GuardVerdict::Redirect(AppRoute::Student)
        );
    }

    #[test]
    fn login_redirects_authenticated_users_to_their_landing() {
        assert_eq!(
            decide(&AppRoute::Login, Some(&session(Role::Student, false)), NOW),
            GuardVerdict::Redirect(AppRoute::RegisterFace)
        );
        assert_eq!(
            decide(&AppRoute::Login, Some(&session(Role::Student, true)), NOW),
            GuardVerdict::Redirect(AppRoute::Student)
        );
        assert_eq!(
            decide(&AppRoute::Login, Some(&session(Role::Mentor, false)), NOW),
            GuardVerdict::Redirect(AppRoute::Mentor)
        );
        assert_eq!(
            decide(&AppRoute::Login, Some(&session(Role::SuperAdmin, false)), NOW),
            GuardVerdict::Redirect(AppRoute::SuperAdmin)
        );
    }

    #[test]
    fn guard_verify_face_carries_params_and_role_gate() {
        let route = AppRoute::from_path("/guard/verify-face/2455E1C001/R123");
        assert_eq!(
            route,
            AppRoute::GuardVerifyFace {
                student_id: "2455E1C001".into(),
                request_id: "R123".into(),
            }
        );
        assert_eq!(
            decide(&route, Some(&session(Role::Guard, false)), NOW),
            GuardVerdict::Allow
        );
        assert_eq!(
            decide(&route, Some(&session(Role::Student, true)), NOW),
            GuardVerdict::ToLogin { clear: false }
        );
    }
}
