//! Venue record schema and projection of raw service output onto it.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The persisted venue record. Every field is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VenueRecord {
    /// the name of the venue
    pub name: String,
    /// a brief description of the venue
    pub description: String,
    /// the email of the venue
    pub email: String,
    /// the phone number of the venue
    pub phone: String,
    /// the website of the venue
    pub website: String,
    /// the facebook page of the venue
    pub facebook_url: String,
    /// the twitter url of the venue
    pub twitter_url: String,
    /// the instagram url of the venue
    pub instagram_url: String,
    /// the url of the venue's logo or avatar
    pub logo_url: String,
    /// what kind of musicians does the venue normally book
    pub ideal_performer_profile: String,
}

/// Fields requested only by the extended schema. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VenueExtras {
    /// the capacity of the venue
    pub capacity: Option<String>,
    /// the genres they normally book
    pub genres: Vec<String>,
    /// the address of the venue
    pub address: Option<String>,
}

/// Shape of the extended variant; only its schema is used.
#[allow(dead_code)]
#[derive(Serialize, JsonSchema)]
struct ExtendedVenue {
    #[serde(flatten)]
    venue: VenueRecord,
    #[serde(flatten)]
    extras: VenueExtras,
}

/// Which field set is requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVariant {
    /// The ten persisted fields.
    #[default]
    Basic,
    /// The ten fields plus capacity, genres and address.
    Extended,
}

impl SchemaVariant {
    /// JSON schema sent to the service for this variant.
    #[must_use]
    pub fn target_schema(self) -> Value {
        match self {
            Self::Basic => json!(schema_for!(VenueRecord)),
            Self::Extended => json!(schema_for!(ExtendedVenue)),
        }
    }
}

/// A projected record plus the extras the extended variant asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedVenue {
    /// The record to persist.
    pub record: VenueRecord,
    /// Extras, present only for the extended variant.
    pub extras: Option<VenueExtras>,
}

/// Projects raw service output onto the venue schema.
///
/// Missing or null fields become empty strings; this never fails.
#[must_use]
pub fn project(raw: &Value, variant: SchemaVariant) -> ProjectedVenue {
    let empty = Map::new();
    let fields = record_object(raw).unwrap_or(&empty);
    let text = |key: &str| fields.get(key).map(stringify).unwrap_or_default();

    let record = VenueRecord {
        name: text("name"),
        description: text("description"),
        email: text("email"),
        phone: text("phone"),
        website: text("website"),
        facebook_url: text("facebookUrl"),
        twitter_url: text("twitterUrl"),
        instagram_url: text("instagramUrl"),
        logo_url: text("logoUrl"),
        ideal_performer_profile: text("idealPerformerProfile"),
    };

    let extras = match variant {
        SchemaVariant::Basic => None,
        SchemaVariant::Extended => Some(VenueExtras {
            capacity: Some(text("capacity")).filter(|c| !c.is_empty()),
            genres: fields.get("genres").map(genre_list).unwrap_or_default(),
            address: Some(text("address")).filter(|a| !a.is_empty()),
        }),
    };

    ProjectedVenue { record, extras }
}

/// The object inside `raw` that [`project`] reads fields from.
///
/// Unwraps a nested `result` and takes the first object of an array.
pub(crate) fn record_payload(raw: &Value) -> Option<&Value> {
    match raw {
        Value::Object(map) => match map.get("result") {
            Some(inner @ (Value::Object(_) | Value::Array(_))) => record_payload(inner),
            _ => Some(raw),
        },
        Value::Array(items) => items.iter().find(|item| item.is_object()),
        _ => None,
    }
}

fn record_object(raw: &Value) -> Option<&Map<String, Value>> {
    record_payload(raw).and_then(Value::as_object)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(items) => items
            .iter()
            .map(stringify)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn genre_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(stringify)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSISTED_KEYS: [&str; 10] = [
        "name",
        "description",
        "email",
        "phone",
        "website",
        "facebookUrl",
        "twitterUrl",
        "instagramUrl",
        "logoUrl",
        "idealPerformerProfile",
    ];

    #[test]
    fn test_record_serializes_exactly_ten_camel_case_fields() {
        let value = serde_json::to_value(VenueRecord::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), PERSISTED_KEYS.len());
        for key in PERSISTED_KEYS {
            assert_eq!(object[key], "", "missing {key}");
        }
    }

    #[test]
    fn test_basic_schema_lists_the_ten_fields_with_descriptions() {
        let schema = SchemaVariant::Basic.target_schema();
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 10);
        assert_eq!(
            properties["idealPerformerProfile"]["description"],
            "what kind of musicians does the venue normally book"
        );
    }

    #[test]
    fn test_extended_schema_adds_extras() {
        let schema = SchemaVariant::Extended.target_schema();
        let properties = schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("facebookUrl"));
        assert!(properties.contains_key("capacity"));
        assert!(properties.contains_key("genres"));
        assert!(properties.contains_key("address"));
    }

    #[test]
    fn test_missing_fields_project_to_empty_strings() {
        let projected = project(&json!({"name": "The Anthem"}), SchemaVariant::Basic);
        assert_eq!(projected.record.name, "The Anthem");
        assert_eq!(projected.record.email, "");
        assert_eq!(projected.record.logo_url, "");
        assert!(projected.extras.is_none());
    }

    #[test]
    fn test_non_string_values_are_stringified() {
        let projected = project(
            &json!({
                "phone": 2_022_656_800_u64,
                "email": ["info@theanthemdc.com", "booking@theanthemdc.com"],
                "website": null
            }),
            SchemaVariant::Basic,
        );
        assert_eq!(projected.record.phone, "2022656800");
        assert_eq!(projected.record.email, "info@theanthemdc.com, booking@theanthemdc.com");
        assert_eq!(projected.record.website, "");
    }

    #[test]
    fn test_result_envelope_and_arrays_are_unwrapped() {
        let wrapped = project(&json!({"result": {"name": "Wrapped"}}), SchemaVariant::Basic);
        assert_eq!(wrapped.record.name, "Wrapped");

        let listed = project(&json!([{"name": "First"}, {"name": "Second"}]), SchemaVariant::Basic);
        assert_eq!(listed.record.name, "First");

        let scalar = project(&json!("no record here"), SchemaVariant::Basic);
        assert_eq!(scalar.record, VenueRecord::default());
    }

    #[test]
    fn test_extended_extras_are_projected() {
        let projected = project(
            &json!({
                "name": "The Anthem",
                "capacity": 6000,
                "genres": "rock, indie ,  pop",
                "address": "901 Wharf St SW"
            }),
            SchemaVariant::Extended,
        );
        let extras = projected.extras.unwrap();
        assert_eq!(extras.capacity.as_deref(), Some("6000"));
        assert_eq!(extras.genres, vec!["rock", "indie", "pop"]);
        assert_eq!(extras.address.as_deref(), Some("901 Wharf St SW"));
    }

    #[test]
    fn test_missing_extras_are_absent_not_errors() {
        let projected = project(&json!({"name": "The Anthem"}), SchemaVariant::Extended);
        let extras = projected.extras.unwrap();
        assert_eq!(extras.capacity, None);
        assert!(extras.genres.is_empty());
        assert_eq!(extras.address, None);
    }
}
