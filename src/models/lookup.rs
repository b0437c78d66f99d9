use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Seeded id→name reference document, collection "lookups".
/// The same tables exist as in-code constants below; the collection
/// only backs the admin listing endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Lookup {
    pub table: String,
    pub entry_id: i32,
    pub name: String,
}

/// Workflow status codes shared by designations, sub-resources,
/// plans and files. Soft deletion is a status flip, never a removal.
pub mod status {
    pub const PENDING: i32 = 1;
    pub const ACTIVE: i32 = 2;
    pub const CANCELLED: i32 = 3;
    pub const DELETED: i32 = 4;

    pub const TABLE: &[(i32, &str)] = &[
        (PENDING, "pending"),
        (ACTIVE, "active"),
        (CANCELLED, "cancelled"),
        (DELETED, "deleted"),
    ];

    pub fn name(id: i32) -> Option<&'static str> {
        TABLE.iter().find(|(k, _)| *k == id).map(|(_, v)| *v)
    }

    pub fn is_valid(id: i32) -> bool {
        name(id).is_some()
    }

    /// Statuses hidden from self-service read responses.
    pub fn is_soft_deleted(id: i32) -> bool {
        id == CANCELLED || id == DELETED
    }
}

pub mod gender {
    pub const MALE: i32 = 1;
    pub const FEMALE: i32 = 2;
    pub const OTHER: i32 = 3;

    pub const TABLE: &[(i32, &str)] = &[(MALE, "male"), (FEMALE, "female"), (OTHER, "other")];

    pub fn name(id: i32) -> Option<&'static str> {
        TABLE.iter().find(|(k, _)| *k == id).map(|(_, v)| *v)
    }

    pub fn is_valid(id: i32) -> bool {
        name(id).is_some()
    }
}

pub mod file_type {
    pub const RESUME: i32 = 1;
    pub const PICTURE: i32 = 2;
    pub const CERTIFICATE: i32 = 3;

    pub const TABLE: &[(i32, &str)] = &[
        (RESUME, "resume"),
        (PICTURE, "picture"),
        (CERTIFICATE, "certificate"),
    ];

    pub fn name(id: i32) -> Option<&'static str> {
        TABLE.iter().find(|(k, _)| *k == id).map(|(_, v)| *v)
    }
}

pub mod skill_type {
    pub const CORE: i32 = 1;
    pub const SOFT: i32 = 2;

    pub const TABLE: &[(i32, &str)] = &[(CORE, "core"), (SOFT, "soft")];

    pub fn name(id: i32) -> Option<&'static str> {
        TABLE.iter().find(|(k, _)| *k == id).map(|(_, v)| *v)
    }

    pub fn is_valid(id: i32) -> bool {
        name(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names() {
        assert_eq!(status::name(status::PENDING), Some("pending"));
        assert_eq!(status::name(status::DELETED), Some("deleted"));
        assert_eq!(status::name(99), None);
    }

    #[test]
    fn test_soft_deleted_statuses() {
        assert!(status::is_soft_deleted(status::CANCELLED));
        assert!(status::is_soft_deleted(status::DELETED));
        assert!(!status::is_soft_deleted(status::ACTIVE));
        assert!(!status::is_soft_deleted(status::PENDING));
    }

    #[test]
    fn test_gender_validation() {
        assert!(gender::is_valid(gender::FEMALE));
        assert!(!gender::is_valid(0));
    }
}
