//! 线上协议类型
//!
//! 后端的响应信封有两种形态：`{ success, message, data: <payload> }` 或者
//! 裸 payload。这里统一防御性解包。字段名与后端 snake_case 保持一致。

use crate::Role;
use crate::date::Timestamp;
use crate::lifecycle::RequestStatus;
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};

// =========================================================
// 响应信封 (Response Envelope)
// =========================================================

/// 响应信封：带 `data` 字段的包装或裸 payload
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiEnvelope<T> {
    Wrapped(WrappedBody<T>),
    Bare(T),
}

#[derive(Debug, Deserialize)]
pub struct WrappedBody<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    pub data: T,
}

impl<T> ApiEnvelope<T> {
    /// 解包 payload；信封自带 `success: false` 时转为错误
    pub fn into_data(self) -> Result<T, String> {
        match self {
            ApiEnvelope::Wrapped(body) => {
                if body.success == Some(false) {
                    Err(body
                        .detail
                        .or(body.message)
                        .unwrap_or_else(|| "Request failed".to_string()))
                } else {
                    Ok(body.data)
                }
            }
            ApiEnvelope::Bare(data) => Ok(data),
        }
    }
}

/// 错误响应体；FastAPI 用 `detail`，全局响应用 `message`
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self, fallback: &str) -> String {
        self.detail
            .or(self.message)
            .unwrap_or_else(|| fallback.to_string())
    }
}

// =========================================================
// 认证 (Auth)
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub user_id: String,
    pub password: String,
}

/// 登录结果；`role` 保留线上原文，未知角色由会话层拒绝
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResult {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub role: String,
    /// 学生已完成人脸注册时返回；其他角色缺省
    #[serde(default)]
    pub face_id: Option<String>,
}

// =========================================================
// 请假单 (Leave Requests)
// =========================================================

/// Mongo 的 `_id` 可能是字符串或 `{"$oid": "…"}`
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Oid {
        #[serde(rename = "$oid")]
        oid: String,
    },
    Str(String),
}

fn de_opt_object_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<IdRepr>::deserialize(deserializer).map_err(D::Error::custom)?;
    Ok(repr.map(|r| match r {
        IdRepr::Oid { oid } => oid,
        IdRepr::Str(s) => s,
    }))
}

/// 一张请假单，字段随端点不同而稀疏填充
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveRequest {
    /// 各端点在 `_id` 与 `request_id` 之间摇摆，两个都收
    #[serde(default, rename = "_id", deserialize_with = "de_opt_object_id")]
    raw_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_object_id")]
    request_id: Option<String>,

    pub student_id: String,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub year: Option<u8>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub college: Option<String>,

    pub reason: String,
    pub status: RequestStatus,

    #[serde(default)]
    pub mentor_status: Option<String>,
    #[serde(default)]
    pub mentor_name: Option<String>,
    #[serde(default, alias = "mentor_comment")]
    pub mentor_remark: Option<String>,
    #[serde(default)]
    pub mentor_parent_contacted: Option<bool>,
    #[serde(default)]
    pub hod_name: Option<String>,

    #[serde(default)]
    pub semester: Option<u8>,
    #[serde(default)]
    pub academic_year: Option<String>,

    #[serde(default)]
    pub request_time: Timestamp,
    #[serde(default)]
    pub approval_time: Option<Timestamp>,
    #[serde(default)]
    pub exit_mark_time: Option<Timestamp>,

    /// 缩略人脸照（base64 JPEG）
    #[serde(default)]
    pub student_face: Option<String>,
}

impl LeaveRequest {
    /// 请假单的稳定标识
    pub fn id(&self) -> &str {
        self.raw_id
            .as_deref()
            .or(self.request_id.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateLeaveRequest {
    pub student_id: String,
    pub reason: String,
}

/// 导师批准：备注与家长联系标记都随单提交
#[derive(Debug, Clone, Serialize)]
pub struct MentorApproval {
    pub mentor_id: String,
    pub mentor_name: String,
    pub remark: String,
    pub parent_contacted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MentorRejection {
    pub mentor_id: String,
    pub mentor_name: String,
    pub remark: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HodDecision {
    pub hod_id: String,
    pub hod_name: String,
}

// =========================================================
// 人脸 (Face)
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct FaceRegisterRequest {
    pub user_id: String,
    pub user_type: String,
    pub image_b64: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FaceVerifyRequest {
    pub user_id: String,
    pub image_b64: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaceVerifyResult {
    #[serde(default)]
    pub verified: bool,
}

// =========================================================
// 教职档案与指派 (Faculty & Assignment)
// =========================================================

/// 教职档案；既当"当前用户"也当"可指派候选人"用
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacultyProfile {
    #[serde(default, alias = "_id", deserialize_with = "de_opt_object_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub college: String,
    #[serde(default)]
    pub years: Vec<u8>,
    #[serde(default)]
    pub courses: Vec<String>,
}

impl FacultyProfile {
    /// 年级与课程两个维度都相交才算管辖重叠
    pub fn overlaps(&self, other: &FacultyProfile) -> bool {
        let years_overlap = self.years.iter().any(|y| other.years.contains(y));
        let courses_overlap = self.courses.iter().any(|c| other.courses.contains(c));
        years_overlap && courses_overlap
    }

    /// 与在任 HOD 管辖重叠的教职不能再被选为导师
    pub fn is_mentor_candidate(&self, hod: &FacultyProfile) -> bool {
        !self.overlaps(hod)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MentorAssignment {
    pub mentor_id: String,
    #[serde(default)]
    pub college: String,
    pub course: String,
    pub year: u8,
    pub section: String,
}

impl MentorAssignment {
    /// 展示用的分管范围标签
    pub fn scope_label(&self) -> String {
        format!("{} - Year {} - Sec {}", self.course, self.year, self.section)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignMentorsRequest {
    pub college: String,
    pub course: String,
    pub year: u8,
    pub section: String,
    pub mentor_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignHodRequest {
    pub faculty_id: String,
    pub college: String,
    pub years: Vec<u8>,
    pub courses: Vec<String>,
}

// =========================================================
// 学生与门卫档案 (Student & Guard)
// =========================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentProfile {
    #[serde(default, alias = "_id", deserialize_with = "de_opt_object_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub college: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub year: Option<u8>,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub semester: Option<u8>,
    #[serde(default)]
    pub face_id: Option<String>,
    #[serde(default)]
    pub student_face: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuardProfile {
    #[serde(default, alias = "_id", deserialize_with = "de_opt_object_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub college: String,
}

// =========================================================
// 用户管理 (User Administration)
// =========================================================

/// 用户管理可操作的账号类别
///
/// 与登录角色不是一回事：建号按 faculty 一类走，删号按 hod 细分，
/// 路径前缀跟着后端路由走。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagedRole {
    Student,
    Faculty,
    Hod,
    Guard,
    Admin,
}

impl ManagedRole {
    pub fn path_prefix(&self) -> &'static str {
        match self {
            ManagedRole::Student => "student",
            ManagedRole::Faculty => "faculty",
            ManagedRole::Hod => "hod",
            ManagedRole::Guard => "guard",
            ManagedRole::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ManagedRole::Student => "Student",
            ManagedRole::Faculty => "Faculty",
            ManagedRole::Hod => "HOD",
            ManagedRole::Guard => "Guard",
            ManagedRole::Admin => "Admin",
        }
    }

    /// 建号面板展示的类别；Admin 账号只有超管能建
    pub fn creatable_by(actor: Role) -> &'static [ManagedRole] {
        match actor {
            Role::SuperAdmin => &[
                ManagedRole::Student,
                ManagedRole::Faculty,
                ManagedRole::Guard,
                ManagedRole::Admin,
            ],
            _ => &[ManagedRole::Student, ManagedRole::Faculty, ManagedRole::Guard],
        }
    }

    /// 删号面板展示的类别
    pub fn deletable_by(actor: Role) -> &'static [ManagedRole] {
        match actor {
            Role::SuperAdmin => &[
                ManagedRole::Student,
                ManagedRole::Hod,
                ManagedRole::Guard,
                ManagedRole::Admin,
            ],
            _ => &[ManagedRole::Student, ManagedRole::Hod, ManagedRole::Guard],
        }
    }

    /// 仅作界面提示，服务端必须重新校验
    pub fn may_delete(&self, actor: Role) -> bool {
        !(actor == Role::Admin && *self == ManagedRole::Admin)
    }
}

/// 建号请求；角色字段按需填充，缺省字段不上送
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateUserRequest {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub password: String,
    pub college: String,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromoteStudentsRequest {
    pub admission_year: i32,
    pub college: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromoteStudentsResult {
    #[serde(default)]
    pub promoted_count: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_unwraps_wrapped_payload() {
        let json = r#"{"success": true, "message": "ok", "data": {"verified": true}}"#;
        let env: ApiEnvelope<FaceVerifyResult> = serde_json::from_str(json).unwrap();
        assert!(env.into_data().unwrap().verified);
    }

    #[test]
    fn envelope_unwraps_bare_payload() {
        let json = r#"{"verified": false}"#;
        let env: ApiEnvelope<FaceVerifyResult> = serde_json::from_str(json).unwrap();
        assert!(!env.into_data().unwrap().verified);
    }

    #[test]
    fn envelope_surfaces_failure_message() {
        let json = r#"{"success": false, "message": "Student not found", "data": null}"#;
        let env: ApiEnvelope<Option<FaceVerifyResult>> = serde_json::from_str(json).unwrap();
        assert_eq!(env.into_data().unwrap_err(), "Student not found");
    }

    #[test]
    fn request_id_from_mongo_oid() {
        let json = r#"{
            "_id": {"$oid": "65f1c0ffee"},
            "student_id": "2455E1C001",
            "reason": "Medical",
            "status": "PENDING_MENTOR"
        }"#;
        let req: LeaveRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id(), "65f1c0ffee");
        assert_eq!(req.status, RequestStatus::PendingMentor);
    }

    #[test]
    fn request_id_falls_back_to_request_id_field() {
        let json = r#"{
            "request_id": "R123",
            "student_id": "2455E1C001",
            "reason": "Family function",
            "status": "APPROVED"
        }"#;
        let req: LeaveRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id(), "R123");
    }

    #[test]
    fn mentor_comment_alias_maps_to_remark() {
        let json = r#"{
            "_id": "a1",
            "student_id": "s",
            "reason": "r",
            "status": "PENDING_HOD",
            "mentor_comment": "ok to go"
        }"#;
        let req: LeaveRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.mentor_remark.as_deref(), Some("ok to go"));
    }

    fn faculty(years: &[u8], courses: &[&str]) -> FacultyProfile {
        FacultyProfile {
            id: None,
            name: String::new(),
            college: "KMIT".to_string(),
            years: years.to_vec(),
            courses: courses.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn overlap_requires_both_dimensions() {
        let hod = faculty(&[2, 3], &["CSE", "IT"]);
        // 年级相交、课程不相交 → 不算重叠
        assert!(!faculty(&[3], &["ECE"]).overlaps(&hod));
        // 课程相交、年级不相交 → 不算重叠
        assert!(!faculty(&[1], &["CSE"]).overlaps(&hod));
        // 两者都相交 → 重叠，不可作候选
        let both = faculty(&[2], &["IT"]);
        assert!(both.overlaps(&hod));
        assert!(!both.is_mentor_candidate(&hod));
        // 互不相交 → 可作候选
        assert!(faculty(&[1], &["ECE"]).is_mentor_candidate(&hod));
    }

    #[test]
    fn create_user_skips_absent_role_fields() {
        let req = CreateUserRequest {
            id: "25H001".into(),
            name: "A".into(),
            phone: "9".into(),
            password: "p".into(),
            college: "KMIT".into(),
            created_by: "25A001".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("year"));
        assert!(!json.contains("courses"));
    }

    #[test]
    fn only_super_admin_manages_admin_accounts() {
        assert!(ManagedRole::creatable_by(Role::SuperAdmin).contains(&ManagedRole::Admin));
        assert!(!ManagedRole::creatable_by(Role::Admin).contains(&ManagedRole::Admin));
        assert!(!ManagedRole::Admin.may_delete(Role::Admin));
        assert!(ManagedRole::Admin.may_delete(Role::SuperAdmin));
        assert!(ManagedRole::Student.may_delete(Role::Admin));
    }
}
