//! Stored record shapes
//!
//! These mirror the documents kept by the card backend: camelCase keys,
//! contact lists as plain `{label, value}` objects, and timestamps that
//! may arrive in several encodings.

use chrono::{DateTime, Utc};
use meishi_core::ColorTheme;
use serde::{Deserialize, Serialize};

use crate::models::{DEFAULT_TEMPLATE_ID, DynamicField, Privacy};

/// A card document as persisted, keyed externally by the card id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phones: Vec<DynamicField>,
    #[serde(default)]
    pub emails: Vec<DynamicField>,
    #[serde(default)]
    pub websites: Vec<DynamicField>,
    #[serde(default)]
    pub faxes: Vec<DynamicField>,
    #[serde(default = "default_template_id")]
    pub template_id: u32,
    #[serde(default)]
    pub color_theme: ColorTheme,
    #[serde(default)]
    pub privacy: Privacy,
    #[serde(default = "default_is_anonymous")]
    pub is_anonymous: bool,
    #[serde(default)]
    pub linked_account_type: Option<String>,
    #[serde(default, with = "stored_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "stored_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for CardRecord {
    fn default() -> Self {
        Self {
            user_id: None,
            name: String::new(),
            photo_url: String::new(),
            address: String::new(),
            phones: Vec::new(),
            emails: Vec::new(),
            websites: Vec::new(),
            faxes: Vec::new(),
            template_id: DEFAULT_TEMPLATE_ID,
            color_theme: ColorTheme::default(),
            privacy: Privacy::default(),
            is_anonymous: true,
            linked_account_type: None,
            created_at: None,
            updated_at: None,
        }
    }
}

fn default_template_id() -> u32 {
    DEFAULT_TEMPLATE_ID
}

fn default_is_anonymous() -> bool {
    true
}

/// A "saved to my collection" join entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntry {
    pub id: String,
    pub user_id: String,
    pub card_id: String,
    pub saved_at: DateTime<Utc>,
}

/// Timestamp codec for stored records.
///
/// Always writes RFC 3339. Reads RFC 3339 strings, epoch milliseconds, and
/// document-store native `{seconds, nanoseconds}` objects.
pub mod stored_timestamp {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Millis(i64),
        Native {
            #[serde(alias = "_seconds")]
            seconds: i64,
            #[serde(default, alias = "_nanoseconds", alias = "nanos")]
            nanoseconds: u32,
        },
    }

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let repr = Option::<Repr>::deserialize(deserializer)?;
        let Some(repr) = repr else {
            return Ok(None);
        };

        let ts = match repr {
            Repr::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| D::Error::custom(format!("invalid timestamp {:?}: {}", text, e)))?,
            Repr::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {}", ms)))?,
            Repr::Native { seconds, nanoseconds } => DateTime::from_timestamp(seconds, nanoseconds)
                .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {}s", seconds)))?,
        };
        Ok(Some(ts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_reads_every_timestamp_encoding() {
        let encodings = [
            json!("2024-03-15T12:00:00Z"),
            json!("2024-03-15T21:00:00+09:00"),
            json!(1_710_504_000_000_i64),
            json!({"seconds": 1_710_504_000_i64, "nanoseconds": 0}),
            json!({"_seconds": 1_710_504_000_i64, "_nanoseconds": 0}),
        ];

        for encoded in encodings {
            let record: CardRecord =
                serde_json::from_value(json!({"name": "Acme", "createdAt": encoded.clone()})).unwrap();
            assert_eq!(record.created_at, Some(t0()), "failed for {}", encoded);
        }
    }

    #[test]
    fn test_missing_and_null_timestamps() {
        let record: CardRecord =
            serde_json::from_value(json!({"name": "Acme", "updatedAt": null})).unwrap();
        assert_eq!(record.created_at, None);
        assert_eq!(record.updated_at, None);
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let result: Result<CardRecord, _> =
            serde_json::from_value(json!({"createdAt": "yesterday"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_for_sparse_record() {
        let record: CardRecord = serde_json::from_value(json!({"name": "Acme"})).unwrap();
        assert_eq!(record.template_id, 1);
        assert_eq!(record.color_theme, ColorTheme::Blue);
        assert_eq!(record.privacy, Privacy::Public);
        assert!(record.is_anonymous);
        assert!(record.phones.is_empty());
    }

    #[test]
    fn test_wire_shape() {
        let record = CardRecord {
            user_id: Some("u1".into()),
            name: "Acme".into(),
            phones: vec![DynamicField::new("work", "555")],
            privacy: Privacy::LinkOnly,
            created_at: Some(t0()),
            updated_at: Some(t0()),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["userId"], "u1");
        assert_eq!(json["phones"], json!([{"label": "work", "value": "555"}]));
        assert_eq!(json["privacy"], "link_only");
        assert_eq!(json["colorTheme"], "blue");
        assert_eq!(json["templateId"], 1);
        assert!(json["linkedAccountType"].is_null());
        assert_eq!(json["createdAt"], "2024-03-15T12:00:00+00:00");
    }
}
