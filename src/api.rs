//! 后端 API 客户端
//!
//! 所有请求都经过 [`ApiEnvelope`] 解包，后端在 `{ data: ... }` 包装和
//! 裸载荷两种返回形态之间并不一致，这里统一兜住。非 2xx 响应尝试解析
//! 错误体的 detail/message 字段，拿不到就退回状态码。

use gloo_net::http::{Request, RequestBuilder};
use leptos::prelude::{Callable, Callback};

use facesure_shared::{
    ApiEnvelope, AssignHodRequest, AssignMentorsRequest, CreateLeaveRequest, CreateUserRequest,
    ErrorBody, FaceRegisterRequest, FaceVerifyRequest, FaceVerifyResult, FacultyProfile,
    GuardProfile, HodDecision, LeaveRequest, LoginRequest, LoginResult, ManagedRole,
    MentorApproval, MentorAssignment, MentorRejection, PromoteStudentsRequest,
    PromoteStudentsResult, StudentProfile,
};

/// 后端地址，部署时由反向代理接管
pub const API_BASE: &str = "http://127.0.0.1:5000";

/// 非 2xx 响应归类后的失败：401 与其他错误分开处理
#[derive(Debug, Clone, PartialEq, Eq)]
struct ApiFailure {
    unauthorized: bool,
    message: String,
}

fn classify_failure(status: u16, body: Option<ErrorBody>, what: &str) -> ApiFailure {
    if status == 401 {
        return ApiFailure {
            unauthorized: true,
            message: "Session expired, please sign in again".to_string(),
        };
    }
    let fallback = format!("{what} failed ({status})");
    ApiFailure {
        unauthorized: false,
        message: body.map_or_else(|| fallback.clone(), |b| b.into_message(&fallback)),
    }
}

#[derive(Clone)]
pub struct FaceSureApi {
    pub base_url: String,
    /// 登录后携带的 access token，未登录时为空
    pub token: Option<String>,
    /// 服务端拒绝 token (401) 时触发，持有者负责清会话
    on_unauthorized: Option<Callback<()>>,
}

impl FaceSureApi {
    pub fn new(base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            token: None,
            on_unauthorized: None,
        }
    }

    pub fn with_token(base_url: String, token: String) -> Self {
        let mut api = Self::new(base_url);
        api.token = Some(token);
        api
    }

    pub fn handle_unauthorized(mut self, callback: Callback<()>) -> Self {
        self.on_unauthorized = Some(callback);
        self
    }

    fn fail(&self, failure: ApiFailure) -> String {
        if failure.unauthorized {
            if let Some(callback) = self.on_unauthorized {
                callback.run(());
            }
        }
        failure.message
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    /// 解析响应：失败时提取错误体，成功时解包 envelope
    async fn parse<T: serde::de::DeserializeOwned>(
        &self,
        res: gloo_net::http::Response,
        what: &str,
    ) -> Result<T, String> {
        if !res.ok() {
            let body = res.json::<ErrorBody>().await.ok();
            return Err(self.fail(classify_failure(res.status(), body, what)));
        }
        res.json::<ApiEnvelope<T>>()
            .await
            .map_err(|e| e.to_string())?
            .into_data()
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
    ) -> Result<T, String> {
        let res = self
            .authed(Request::get(&self.url(path)))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        self.parse(res, what).await
    }

    async fn post<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<T, String> {
        let res = self
            .authed(Request::post(&self.url(path)))
            .header("Content-Type", "application/json")
            .json(body)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        self.parse(res, what).await
    }

    /// 无请求体的 POST（如标记离校）
    async fn post_empty<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
    ) -> Result<T, String> {
        let res = self
            .authed(Request::post(&self.url(path)))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        self.parse(res, what).await
    }

    // ========================================================================
    // 认证
    // ========================================================================

    pub async fn login(&self, user_id: String, password: String) -> Result<LoginResult, String> {
        self.post("/auth/login", &LoginRequest { user_id, password }, "Login")
            .await
    }

    // ========================================================================
    // 个人档案
    // ========================================================================

    pub async fn student(&self, id: &str) -> Result<StudentProfile, String> {
        self.get(&format!("/student/{id}"), "Load student profile")
            .await
    }

    pub async fn faculty(&self, id: &str) -> Result<FacultyProfile, String> {
        self.get(&format!("/faculty/{id}"), "Load faculty profile")
            .await
    }

    pub async fn guard(&self, id: &str) -> Result<GuardProfile, String> {
        self.get(&format!("/guard/{id}"), "Load guard profile").await
    }

    pub async fn faculty_by_college(&self, college: &str) -> Result<Vec<FacultyProfile>, String> {
        self.get(&format!("/faculty/college/{college}"), "Load faculty list")
            .await
    }

    // ========================================================================
    // 请假单
    // ========================================================================

    pub async fn create_request(&self, req: &CreateLeaveRequest) -> Result<LeaveRequest, String> {
        self.post("/request/create", req, "Submit request").await
    }

    pub async fn student_today_requests(
        &self,
        student_id: &str,
    ) -> Result<Vec<LeaveRequest>, String> {
        self.get(
            &format!("/request/student/today/{student_id}"),
            "Load today's requests",
        )
        .await
    }

    pub async fn student_history(&self, student_id: &str) -> Result<Vec<LeaveRequest>, String> {
        self.get(&format!("/request/student/{student_id}"), "Load history")
            .await
    }

    pub async fn mentor_pending(&self, mentor_id: &str) -> Result<Vec<LeaveRequest>, String> {
        self.get(
            &format!("/request/mentor/pending/{mentor_id}"),
            "Load pending requests",
        )
        .await
    }

    pub async fn hod_pending(&self, hod_id: &str) -> Result<Vec<LeaveRequest>, String> {
        self.get(
            &format!("/request/hod/pending/{hod_id}"),
            "Load pending requests",
        )
        .await
    }

    pub async fn guard_approved(&self, college: &str) -> Result<Vec<LeaveRequest>, String> {
        self.get(
            &format!("/request/guard/approved/{college}"),
            "Load approved requests",
        )
        .await
    }

    // ========================================================================
    // 审批动作
    // ========================================================================

    pub async fn mentor_approve(
        &self,
        request_id: &str,
        approval: &MentorApproval,
    ) -> Result<serde_json::Value, String> {
        self.post(
            &format!("/request/{request_id}/mentor/approve"),
            approval,
            "Approve request",
        )
        .await
    }

    pub async fn mentor_reject(
        &self,
        request_id: &str,
        rejection: &MentorRejection,
    ) -> Result<serde_json::Value, String> {
        self.post(
            &format!("/request/{request_id}/mentor/reject"),
            rejection,
            "Reject request",
        )
        .await
    }

    pub async fn hod_approve(
        &self,
        request_id: &str,
        decision: &HodDecision,
    ) -> Result<serde_json::Value, String> {
        self.post(
            &format!("/request/{request_id}/approve"),
            decision,
            "Approve request",
        )
        .await
    }

    pub async fn hod_reject(
        &self,
        request_id: &str,
        decision: &HodDecision,
    ) -> Result<serde_json::Value, String> {
        self.post(
            &format!("/request/{request_id}/reject"),
            decision,
            "Reject request",
        )
        .await
    }

    pub async fn mark_left(&self, request_id: &str) -> Result<serde_json::Value, String> {
        self.post_empty(&format!("/request/{request_id}/left"), "Mark left")
            .await
    }

    // ========================================================================
    // 人脸
    // ========================================================================

    pub async fn face_register(
        &self,
        req: &FaceRegisterRequest,
    ) -> Result<serde_json::Value, String> {
        self.post("/face/register", req, "Register face").await
    }

    pub async fn face_verify(&self, req: &FaceVerifyRequest) -> Result<FaceVerifyResult, String> {
        self.post("/face/verify", req, "Verify face").await
    }

    // ========================================================================
    // 管理端：导师/系主任分配
    // ========================================================================

    pub async fn mentor_mappings(&self) -> Result<Vec<MentorAssignment>, String> {
        self.get("/mentor-mapping/all", "Load mentor assignments")
            .await
    }

    pub async fn assign_mentors(
        &self,
        req: &AssignMentorsRequest,
    ) -> Result<serde_json::Value, String> {
        self.post("/mentor-mapping/assign", req, "Assign mentors")
            .await
    }

    pub async fn assign_hod(&self, req: &AssignHodRequest) -> Result<serde_json::Value, String> {
        self.post("/hod/assign", req, "Assign HOD").await
    }

    // ========================================================================
    // 管理端：用户管理
    // ========================================================================

    pub async fn create_user(
        &self,
        role: ManagedRole,
        req: &CreateUserRequest,
    ) -> Result<serde_json::Value, String> {
        self.post(
            &format!("/{}/create", role.path_prefix()),
            req,
            "Create user",
        )
        .await
    }

    pub async fn fetch_user(
        &self,
        role: ManagedRole,
        id: &str,
    ) -> Result<serde_json::Value, String> {
        self.get(&format!("/{}/{id}", role.path_prefix()), "Load user")
            .await
    }

    pub async fn delete_user(
        &self,
        role: ManagedRole,
        id: &str,
    ) -> Result<serde_json::Value, String> {
        let path = format!("/{}/delete/{id}", role.path_prefix());
        let res = self
            .authed(Request::delete(&self.url(&path)))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        self.parse(res, "Delete user").await
    }

    pub async fn promote_students(
        &self,
        req: &PromoteStudentsRequest,
    ) -> Result<PromoteStudentsResult, String> {
        self.post("/student/promote", req, "Promote students").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos::prelude::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = FaceSureApi::new("http://127.0.0.1:5000/".to_string());
        assert_eq!(api.url("/auth/login"), "http://127.0.0.1:5000/auth/login");
        assert_eq!(api.url("auth/login"), "http://127.0.0.1:5000/auth/login");
    }

    #[test]
    fn unauthorized_is_classified_apart_from_other_failures() {
        let failure = classify_failure(401, None, "Profile");
        assert!(failure.unauthorized);

        let failure = classify_failure(500, None, "Profile");
        assert!(!failure.unauthorized);
        assert_eq!(failure.message, "Profile failed (500)");
    }

    #[test]
    fn unauthorized_failure_fires_session_handler() {
        let cleared = RwSignal::new(false);
        let api = FaceSureApi::with_token(API_BASE.to_string(), "stale".to_string())
            .handle_unauthorized(Callback::new(move |()| cleared.set(true)));

        let message = api.fail(classify_failure(401, None, "Profile"));
        assert!(cleared.get_untracked());
        assert_eq!(message, "Session expired, please sign in again");

        // 其他错误不碰会话
        cleared.set(false);
        api.fail(classify_failure(404, None, "Profile"));
        assert!(!cleared.get_untracked());
    }
}
