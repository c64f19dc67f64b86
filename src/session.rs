//! 会话模块
//!
//! 管理登录会话，与路由系统解耦。会话既存在内存信号里（驱动 UI），也落在
//! LocalStorage（刷新后恢复）。路由服务通过注入的会话信号执行守卫。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use facesure_shared::{KEY_SESSION, LoginResult, PREFIX_FACE_VERIFIED, Role};
use gloo_storage::{LocalStorage, Storage};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

/// 登录会话
///
/// 不变式：只要存在会话，token / role / user_id 三者齐备。
/// `face_enrolled` 只对学生有意义。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub user_id: String,
    pub face_enrolled: bool,
}

/// access token 的 JWT 载荷中会话层关心的两个声明
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// 解码 JWT 载荷（不校验签名，签名校验是服务端的事）
///
/// 结构损坏、base64 非法、JSON 非法都返回 None，由调用方按"无会话"处理。
pub fn decode_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// token 是否已过期（`exp` 为 Unix 秒）
pub fn token_expired(claims: &Claims, now_secs: i64) -> bool {
    claims.exp <= now_secs
}

/// 当前 Unix 秒
pub fn now_secs() -> i64 {
    (js_sys::Date::now() / 1000.0) as i64
}

/// 从登录响应构造会话
///
/// token 解不开 sub、角色不认识，都视为登录失败。
pub fn session_from_login(login: &LoginResult) -> Result<Session, String> {
    let role = Role::from_wire(&login.role)
        .ok_or_else(|| format!("Unrecognized role: {}", login.role))?;
    let claims =
        decode_claims(&login.access_token).ok_or_else(|| "Malformed access token".to_string())?;
    Ok(Session {
        token: login.access_token.clone(),
        role,
        user_id: claims.sub,
        face_enrolled: login.face_id.as_deref().is_some_and(|id| !id.is_empty()),
    })
}

/// 会话上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub state: ReadSignal<Option<Session>>,
    pub set_state: WriteSignal<Option<Session>>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(None);
        Self { state, set_state }
    }

    /// 会话快照信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Option<Session>> {
        let state = self.state;
        Signal::derive(move || state.get())
    }

    /// 登录成功：写入信号并持久化
    pub fn set_session(&self, session: Session) {
        let _ = LocalStorage::set(KEY_SESSION, &session);
        self.set_state.set(Some(session));
    }

    /// 登出 / token 失效：原子清空内存与持久化状态
    ///
    /// 连同人脸核验标记一起清掉（它们只在登录会话内有意义）。
    pub fn clear_session(&self) {
        LocalStorage::clear();
        self.set_state.set(None);
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

/// 绑定当前会话的 API 客户端
///
/// 服务端拒绝 token（401）时清除本地会话，路由守卫随即送回登录页。
/// exp 声明只能挡过期，挡不住服务端主动吊销。
pub fn session_api(ctx: &SessionContext, token: String) -> crate::api::FaceSureApi {
    let ctx = *ctx;
    crate::api::FaceSureApi::with_token(crate::api::API_BASE.to_string(), token)
        .handle_unauthorized(Callback::new(move |()| ctx.clear_session()))
}

/// 应用启动时从 LocalStorage 恢复会话
///
/// 持久化内容损坏或 token 已过期时清空，绝不带病恢复。
pub fn restore_session(ctx: &SessionContext) {
    match LocalStorage::get::<Session>(KEY_SESSION) {
        Ok(session) => match decode_claims(&session.token) {
            Some(claims) if !token_expired(&claims, now_secs()) => {
                ctx.set_state.set(Some(session));
            }
            _ => ctx.clear_session(),
        },
        Err(_) => {
            // 没有持久化会话或无法解析，保持未登录
            ctx.set_state.set(None);
        }
    }
}

// =========================================================
// 人脸核验标记（仅本设备本会话有效，见 guard 流程）
// =========================================================

fn face_verified_key(request_id: &str) -> String {
    format!("{PREFIX_FACE_VERIFIED}{request_id}")
}

/// 记录"该请假单已通过人脸核验"
pub fn mark_face_verified(request_id: &str) {
    let _ = LocalStorage::set(face_verified_key(request_id), &true);
}

pub fn is_face_verified(request_id: &str) -> bool {
    LocalStorage::get::<bool>(face_verified_key(request_id)).unwrap_or(false)
}

/// 标记离校后清掉对应标记
pub fn clear_face_verified(request_id: &str) {
    LocalStorage::delete(face_verified_key(request_id));
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 拼一个结构合法、签名随意的 JWT
    fn fake_token(sub: &str, exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{sub}","exp":{exp}}}"#).as_bytes());
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn decodes_subject_and_expiry() {
        let claims = decode_claims(&fake_token("2455E1C001", 2_000_000_000)).unwrap();
        assert_eq!(claims.sub, "2455E1C001");
        assert_eq!(claims.exp, 2_000_000_000);
    }

    #[test]
    fn corrupted_token_decodes_to_none() {
        assert!(decode_claims("").is_none());
        assert!(decode_claims("onlyonepart").is_none());
        assert!(decode_claims("a.%%%not-base64%%%.c").is_none());
        // 合法 base64 但不是 JSON
        let bogus = format!("h.{}.s", URL_SAFE_NO_PAD.encode(b"not json"));
        assert!(decode_claims(&bogus).is_none());
    }

    #[test]
    fn expiry_is_inclusive_of_now() {
        let claims = Claims {
            sub: "x".into(),
            exp: 1_000,
        };
        assert!(token_expired(&claims, 1_000));
        assert!(token_expired(&claims, 1_001));
        assert!(!token_expired(&claims, 999));
    }

    #[test]
    fn login_with_face_id_marks_enrolled() {
        let login = LoginResult {
            access_token: fake_token("2455E1C001", 2_000_000_000),
            refresh_token: None,
            role: "STUDENT".into(),
            face_id: Some("PRESENT".into()),
        };
        let session = session_from_login(&login).unwrap();
        assert_eq!(session.role, Role::Student);
        assert_eq!(session.user_id, "2455E1C001");
        assert!(session.face_enrolled);
    }

    #[test]
    fn login_without_face_id_is_unenrolled() {
        let login = LoginResult {
            access_token: fake_token("2455E1C001", 2_000_000_000),
            refresh_token: None,
            role: "STUDENT".into(),
            face_id: None,
        };
        assert!(!session_from_login(&login).unwrap().face_enrolled);
        // 空字符串等同缺省
        let login = LoginResult {
            face_id: Some(String::new()),
            ..login
        };
        assert!(!session_from_login(&login).unwrap().face_enrolled);
    }

    #[test]
    fn unknown_role_fails_login() {
        let login = LoginResult {
            access_token: fake_token("X1", 2_000_000_000),
            refresh_token: None,
            role: "WARDEN".into(),
            face_id: None,
        };
        assert!(session_from_login(&login).is_err());
    }

    #[test]
    fn malformed_token_fails_login() {
        let login = LoginResult {
            access_token: "garbage".into(),
            refresh_token: None,
            role: "HOD".into(),
            face_id: None,
        };
        assert!(session_from_login(&login).is_err());
    }
}
