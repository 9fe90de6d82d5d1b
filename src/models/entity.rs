//! Catalog entity wire model
//!
//! Entities travel to and from the catalog as `{typeName, guid, attributes, ...}`
//! documents. Attributes are kept as a loose JSON map because each asset type carries
//! a different attribute set; typed accessors cover the handful this crate reads back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Attribute holding the unique identity key of every asset
pub const QUALIFIED_NAME: &str = "qualifiedName";

/// A catalog entity as sent to / returned by the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Catalog type name (e.g. `S3Bucket`)
    pub type_name: String,
    /// Assigned guid, or a placeholder (leading `-`) on entities not yet saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    /// Lifecycle status (`ACTIVE`, `DELETED`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<Classification>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub update_time: Option<DateTime<Utc>>,
}

/// Classification (tag) attached to an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub type_name: String,
}

impl Entity {
    /// Create an unsaved entity with a fresh placeholder guid
    pub fn new(type_name: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        let mut entity = Self {
            type_name: type_name.into(),
            guid: Some(placeholder_guid()),
            ..Default::default()
        };
        entity.set(QUALIFIED_NAME, qualified_name.into());
        entity
    }

    /// Set an attribute
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// Set an attribute only when a value is present
    pub fn set_opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    pub fn qualified_name(&self) -> Option<&str> {
        self.attr_str(QUALIFIED_NAME)
    }

    pub fn name(&self) -> Option<&str> {
        self.attr_str("name")
    }

    /// Read a string attribute
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Read a string-list attribute; absent, null and non-string entries yield nothing
    pub fn attr_str_list(&self, key: &str) -> Vec<String> {
        self.attributes
            .get(key)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Reference to this entity, preferring its real guid
    pub fn to_ref(&self) -> AssetRef {
        AssetRef {
            type_name: self.type_name.clone(),
            guid: self.guid.clone().filter(|g| !is_placeholder_guid(g)),
            qualified_name: self.qualified_name().map(str::to_string),
        }
    }
}

/// Generate a placeholder guid for an unsaved entity
///
/// The catalog treats any guid starting with `-` as unassigned and reports the real
/// guid it allocated in the mutation response's `guidAssignments`.
pub fn placeholder_guid() -> String {
    format!("-{}", Uuid::new_v4().simple())
}

pub fn is_placeholder_guid(guid: &str) -> bool {
    guid.starts_with('-')
}

/// Reference to a node in the catalog
///
/// Serialized as `{typeName, guid}` when the guid is known, otherwise as
/// `{typeName, uniqueAttributes: {qualifiedName}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub type_name: String,
    pub guid: Option<String>,
    pub qualified_name: Option<String>,
}

impl AssetRef {
    pub fn by_guid(type_name: impl Into<String>, guid: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            guid: Some(guid.into()),
            qualified_name: None,
        }
    }

    pub fn by_qualified_name(
        type_name: impl Into<String>,
        qualified_name: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            guid: None,
            qualified_name: Some(qualified_name.into()),
        }
    }
}

impl Serialize for AssetRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("typeName", &self.type_name)?;
        match (&self.guid, &self.qualified_name) {
            (Some(guid), _) => map.serialize_entry("guid", guid)?,
            (None, Some(qn)) => {
                let mut unique = BTreeMap::new();
                unique.insert(QUALIFIED_NAME, qn);
                map.serialize_entry("uniqueAttributes", &unique)?
            }
            (None, None) => {}
        }
        map.end()
    }
}

impl From<AssetRef> for Value {
    fn from(reference: AssetRef) -> Self {
        serde_json::to_value(&reference).unwrap_or(Value::Null)
    }
}

/// Response of a catalog save (bulk upsert)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    /// Placeholder guid -> assigned guid, one entry per entity created or matched
    #[serde(default)]
    pub guid_assignments: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutated_entities: Option<Value>,
}
