//! Institution/Entity model

use serde::{Deserialize, Serialize};

/// Kind of enrolled institution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    School,
    College,
    Corporate,
    Healthcare,
    Government,
}

/// Enrollment status of an institution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Active,
    Pending,
    Suspended,
}

/// An organization enrolled in the platform
///
/// Static reference data in this scope. Member records point back via
/// `institution_id`; entities do not contain their members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub code: String,
    pub admin_name: String,
    pub admin_email: String,
    pub status: EntityStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_serialize() {
        assert_eq!(
            serde_json::to_string(&EntityType::Corporate).unwrap(),
            "\"corporate\""
        );
        let t: EntityType = serde_json::from_str("\"healthcare\"").unwrap();
        assert_eq!(t, EntityType::Healthcare);
    }
}
