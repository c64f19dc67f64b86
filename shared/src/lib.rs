use serde::{Deserialize, Serialize};

pub mod date;
pub mod lifecycle;
pub mod protocol;

pub use date::Timestamp;
pub use lifecycle::{RequestAction, RequestStatus, available_actions};
pub use protocol::*;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// LocalStorage key prefix for per-request face-verified markers.
pub const PREFIX_FACE_VERIFIED: &str = "facesure_verified_";
/// LocalStorage key holding the serialized session.
pub const KEY_SESSION: &str = "facesure_session";

/// College choices offered by the registration forms.
pub const COLLEGES: &[&str] = &["KMIT", "NGIT", "KMEC"];
/// Course choices offered by the registration forms.
pub const COURSES: &[&str] = &["CSE", "CSM", "ECE", "IT"];
/// Study years offered by the registration forms.
pub const YEARS: &[u8] = &[1, 2, 3, 4];
/// How many mentors a (college, course, year, section) bucket takes.
pub const MENTORS_PER_SECTION: usize = 2;

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户角色
///
/// Wire values are SCREAMING_SNAKE_CASE, matching the backend role claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Hod,
    Mentor,
    Guard,
    Admin,
    SuperAdmin,
}

impl Role {
    /// 从线上字符串解析；未知角色返回 None
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "STUDENT" => Some(Role::Student),
            "HOD" => Some(Role::Hod),
            "MENTOR" => Some(Role::Mentor),
            "GUARD" => Some(Role::Guard),
            "ADMIN" => Some(Role::Admin),
            "SUPER_ADMIN" => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Hod => "HOD",
            Role::Mentor => "MENTOR",
            Role::Guard => "GUARD",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// 管理端角色（可进入 super-admin 区域）
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_roundtrip() {
        for role in [
            Role::Student,
            Role::Hod,
            Role::Mentor,
            Role::Guard,
            Role::Admin,
            Role::SuperAdmin,
        ] {
            assert_eq!(Role::from_wire(role.as_wire()), Some(role));
        }
    }

    #[test]
    fn unknown_role_is_none() {
        assert_eq!(Role::from_wire("JANITOR"), None);
        assert_eq!(Role::from_wire(""), None);
    }

    #[test]
    fn role_serde_uses_wire_values() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"SUPER_ADMIN\"");
        let back: Role = serde_json::from_str("\"GUARD\"").unwrap();
        assert_eq!(back, Role::Guard);
    }
}
