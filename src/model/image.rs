use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RegistryError, RegistryResult};

pub type Id = String;

/// A single allowlist record for a container image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub id: Id,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inbound upsert payload. Timestamps are system-managed, so any supplied
/// `created_at`/`updated_at` fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewImageEntry {
    pub id: Id,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

impl NewImageEntry {
    pub fn new(id: impl Into<Id>, name: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tags,
        }
    }

    /// Checks the fields every stored record must carry. Values are not
    /// trimmed or otherwise normalized.
    pub fn validate(&self) -> RegistryResult<()> {
        if self.id.is_empty() {
            return Err(RegistryError::validation("Field 'id' must not be empty"));
        }
        if self.name.is_empty() {
            return Err(RegistryError::validation("Field 'name' must not be empty"));
        }
        Ok(())
    }

    /// Convert to a full ImageEntry with both timestamps set to `now`
    pub fn into_entry(self, now: DateTime<Utc>) -> ImageEntry {
        ImageEntry {
            id: self.id,
            name: self.name,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

// `"tags": null` is accepted and means no tags
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_defaults_missing_tags() {
        let payload: NewImageEntry = serde_json::from_str(r#"{"id": "123", "name": "foo"}"#).unwrap();
        assert!(payload.tags.is_empty());

        let payload: NewImageEntry =
            serde_json::from_str(r#"{"id": "123", "name": "foo", "tags": null}"#).unwrap();
        assert!(payload.tags.is_empty());
    }

    #[test]
    fn test_payload_requires_id_and_name() {
        assert!(serde_json::from_str::<NewImageEntry>(r#"{"name": "foo"}"#).is_err());
        assert!(serde_json::from_str::<NewImageEntry>(r#"{"id": "123"}"#).is_err());
        assert!(serde_json::from_str::<NewImageEntry>(r#"{"": "123", "name": "foo", "tags": "#).is_err());
    }

    #[test]
    fn test_payload_ignores_client_timestamps() {
        let payload: NewImageEntry = serde_json::from_str(
            r#"{"id": "123", "name": "foo", "created_at": "2001-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(payload, NewImageEntry::new("123", "foo", vec![]));
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let empty_id = NewImageEntry::new("", "foo", vec![]);
        assert!(matches!(empty_id.validate(), Err(RegistryError::Validation(_))));

        let empty_name = NewImageEntry::new("123", "", vec![]);
        assert!(matches!(empty_name.validate(), Err(RegistryError::Validation(_))));

        // Whitespace is kept as-is, so it counts as a value
        let padded = NewImageEntry::new(" 123 ", " foo ", vec![]);
        assert!(padded.validate().is_ok());
    }

    #[test]
    fn test_entry_serialization_omits_empty_tags() {
        let now = Utc::now();
        let entry = NewImageEntry::new("123", "foo", vec![]).into_entry(now);
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("tags").is_none());
        assert_eq!(json["id"], "123");
        assert!(json.get("created_at").is_some());
        assert!(json.get("updated_at").is_some());

        let tagged = NewImageEntry::new("123", "foo", vec!["v1".into(), "v1".into()]).into_entry(now);
        let json = serde_json::to_value(&tagged).unwrap();
        assert_eq!(json["tags"], serde_json::json!(["v1", "v1"]));
    }
}
