//! 请假单生命周期模型
//!
//! 一张请假单的流转：`PENDING_MENTOR → PENDING_HOD → APPROVED → EXIT_ALLOWED →
//! LEFT_CAMPUS`，在两个 pending 状态上各有一条拒绝分支。服务端是状态转换的
//! 唯一权威；客户端只根据本表决定给哪个角色展示哪些按钮。

use crate::Role;
use serde::{Deserialize, Serialize};

/// 请求状态
///
/// 未知的线上值落入 `Unrecognized`，渲染为"未识别"而不是空白或崩溃。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestStatus {
    PendingMentor,
    PendingHod,
    Approved,
    ExitAllowed,
    LeftCampus,
    RejectedByMentor,
    RejectedByHod,
    /// 已批准但未在当日离校（服务端清理任务写入）
    ApprovedNotLeft,
    /// 服务端兜底状态，客户端任何操作都不会产生它
    Unchecked,
    Unrecognized(String),
}

impl RequestStatus {
    pub fn from_wire(s: &str) -> Self {
        match s {
            "PENDING_MENTOR" => Self::PendingMentor,
            "PENDING_HOD" => Self::PendingHod,
            "APPROVED" => Self::Approved,
            "EXIT_ALLOWED" => Self::ExitAllowed,
            "LEFT_CAMPUS" => Self::LeftCampus,
            "REJECTED_BY_MENTOR" => Self::RejectedByMentor,
            // 旧数据里 HOD 拒绝写的是裸 "REJECTED"
            "REJECTED_BY_HOD" | "REJECTED" => Self::RejectedByHod,
            "APPROVED_NOT_LEFT" => Self::ApprovedNotLeft,
            "UNCHECKED" => Self::Unchecked,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::PendingMentor => "PENDING_MENTOR",
            Self::PendingHod => "PENDING_HOD",
            Self::Approved => "APPROVED",
            Self::ExitAllowed => "EXIT_ALLOWED",
            Self::LeftCampus => "LEFT_CAMPUS",
            Self::RejectedByMentor => "REJECTED_BY_MENTOR",
            Self::RejectedByHod => "REJECTED_BY_HOD",
            Self::ApprovedNotLeft => "APPROVED_NOT_LEFT",
            Self::Unchecked => "UNCHECKED",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// 终态：不再有任何角色可以推进它
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::LeftCampus | Self::RejectedByMentor | Self::RejectedByHod
        )
    }

    /// 状态徽章文案
    pub fn label(&self) -> &str {
        match self {
            Self::PendingMentor => "Pending Mentor",
            Self::PendingHod => "Pending HOD",
            Self::Approved => "Approved",
            Self::ExitAllowed => "Exit Allowed",
            Self::LeftCampus => "Left Campus",
            Self::RejectedByMentor => "Rejected by Mentor",
            Self::RejectedByHod => "Rejected by HOD",
            Self::ApprovedNotLeft => "Approved, Not Left",
            Self::Unchecked => "Unchecked",
            Self::Unrecognized(_) => "Unrecognized",
        }
    }

    /// 状态徽章配色（穷举匹配，新增状态时编译器会报出来）
    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::PendingMentor => "badge-warning",
            Self::PendingHod => "badge-info",
            Self::Approved => "badge-success",
            Self::ExitAllowed => "badge-accent",
            Self::LeftCampus => "badge-neutral",
            Self::RejectedByMentor | Self::RejectedByHod => "badge-error",
            Self::ApprovedNotLeft => "badge-warning",
            Self::Unchecked | Self::Unrecognized(_) => "badge-ghost",
        }
    }
}

impl From<String> for RequestStatus {
    fn from(s: String) -> Self {
        Self::from_wire(&s)
    }
}

impl From<RequestStatus> for String {
    fn from(s: RequestStatus) -> Self {
        s.as_wire().to_string()
    }
}

/// 角色在一张请假单上可触发的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    MentorApprove,
    MentorReject,
    HodApprove,
    HodReject,
    VerifyFace,
    MarkLeft,
}

impl RequestAction {
    /// 确认弹窗里的动词
    pub fn verb(&self) -> &'static str {
        match self {
            Self::MentorApprove | Self::HodApprove => "APPROVE",
            Self::MentorReject | Self::HodReject => "REJECT",
            Self::VerifyFace => "VERIFY",
            Self::MarkLeft => "MARK LEFT",
        }
    }
}

/// 角色 × 状态 → 可用动作表
///
/// 客户端只用它决定按钮的可见性；动作是否合法最终由服务端判定。
/// `MarkLeft` 在 `Approved` 上出现，但还要经过本地人脸核验标记这一道闸。
pub fn available_actions(role: Role, status: &RequestStatus) -> &'static [RequestAction] {
    use RequestAction::*;
    match (role, status) {
        (Role::Mentor, RequestStatus::PendingMentor) => &[MentorApprove, MentorReject],
        (Role::Hod, RequestStatus::PendingHod) => &[HodApprove, HodReject],
        (Role::Guard, RequestStatus::Approved) => &[VerifyFace, MarkLeft],
        (Role::Guard, RequestStatus::ExitAllowed) => &[MarkLeft],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_unrecognized_not_crash() {
        let status = RequestStatus::from_wire("SOMETHING_NEW");
        assert_eq!(
            status,
            RequestStatus::Unrecognized("SOMETHING_NEW".to_string())
        );
        assert_eq!(status.label(), "Unrecognized");
        assert_eq!(status.as_wire(), "SOMETHING_NEW");
    }

    #[test]
    fn legacy_bare_rejected_maps_to_hod_rejection() {
        assert_eq!(
            RequestStatus::from_wire("REJECTED"),
            RequestStatus::RejectedByHod
        );
    }

    #[test]
    fn serde_carries_wire_values() {
        let status: RequestStatus = serde_json::from_str("\"PENDING_MENTOR\"").unwrap();
        assert_eq!(status, RequestStatus::PendingMentor);
        let json = serde_json::to_string(&RequestStatus::ExitAllowed).unwrap();
        assert_eq!(json, "\"EXIT_ALLOWED\"");
        // 未识别值原样保留
        let odd: RequestStatus = serde_json::from_str("\"WEIRD\"").unwrap();
        assert_eq!(serde_json::to_string(&odd).unwrap(), "\"WEIRD\"");
    }

    #[test]
    fn terminal_states() {
        assert!(RequestStatus::LeftCampus.is_terminal());
        assert!(RequestStatus::RejectedByMentor.is_terminal());
        assert!(RequestStatus::RejectedByHod.is_terminal());
        assert!(!RequestStatus::Approved.is_terminal());
        assert!(!RequestStatus::ApprovedNotLeft.is_terminal());
        assert!(!RequestStatus::Unchecked.is_terminal());
    }

    #[test]
    fn mentor_acts_only_on_pending_mentor() {
        assert_eq!(
            available_actions(Role::Mentor, &RequestStatus::PendingMentor),
            &[RequestAction::MentorApprove, RequestAction::MentorReject]
        );
        assert!(available_actions(Role::Mentor, &RequestStatus::PendingHod).is_empty());
        assert!(available_actions(Role::Mentor, &RequestStatus::Approved).is_empty());
    }

    #[test]
    fn hod_acts_only_on_pending_hod() {
        assert_eq!(
            available_actions(Role::Hod, &RequestStatus::PendingHod),
            &[RequestAction::HodApprove, RequestAction::HodReject]
        );
        assert!(available_actions(Role::Hod, &RequestStatus::PendingMentor).is_empty());
    }

    #[test]
    fn guard_actions_follow_exit_flow() {
        assert_eq!(
            available_actions(Role::Guard, &RequestStatus::Approved),
            &[RequestAction::VerifyFace, RequestAction::MarkLeft]
        );
        assert_eq!(
            available_actions(Role::Guard, &RequestStatus::ExitAllowed),
            &[RequestAction::MarkLeft]
        );
        assert!(available_actions(Role::Guard, &RequestStatus::LeftCampus).is_empty());
    }

    #[test]
    fn observed_states_offer_no_actions() {
        for role in [Role::Student, Role::Mentor, Role::Hod, Role::Guard] {
            assert!(available_actions(role, &RequestStatus::ApprovedNotLeft).is_empty());
            assert!(available_actions(role, &RequestStatus::Unchecked).is_empty());
            assert!(
                available_actions(role, &RequestStatus::Unrecognized("X".into())).is_empty()
            );
        }
    }

    #[test]
    fn students_and_admins_never_get_request_actions() {
        for status in [
            RequestStatus::PendingMentor,
            RequestStatus::PendingHod,
            RequestStatus::Approved,
            RequestStatus::ExitAllowed,
        ] {
            assert!(available_actions(Role::Student, &status).is_empty());
            assert!(available_actions(Role::Admin, &status).is_empty());
            assert!(available_actions(Role::SuperAdmin, &status).is_empty());
        }
    }
}
