//! Operation result payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Summary of a retrieved asset
///
/// Every field is `None` when the lookup found nothing, so a missing asset still
/// produces a well-formed `asset_info` object (all values `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub guid: Option<String>,
    pub qualified_name: Option<String>,
    pub owners: Option<Vec<String>>,
    pub owner_groups: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    /// Last update, as epoch milliseconds on the wire
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub update_time: Option<DateTime<Utc>>,
}

impl AssetInfo {
    /// Info for a lookup that matched nothing
    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Empty lists are reported as absent
fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() { None } else { Some(values) }
}

impl From<Option<Entity>> for AssetInfo {
    fn from(entity: Option<Entity>) -> Self {
        match entity {
            Some(entity) => AssetInfo::from(&entity),
            None => AssetInfo::not_found(),
        }
    }
}

impl From<&Entity> for AssetInfo {
    fn from(entity: &Entity) -> Self {
        Self {
            guid: entity.guid.clone(),
            qualified_name: entity.qualified_name().map(str::to_string),
            owners: non_empty(entity.attr_str_list("ownerUsers")),
            owner_groups: non_empty(entity.attr_str_list("ownerGroups")),
            tags: non_empty(
                entity
                    .classifications
                    .iter()
                    .map(|c| c.type_name.clone())
                    .collect(),
            ),
            update_time: entity.update_time,
        }
    }
}

/// Guids produced by one bucket/object/lineage synchronisation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertedAssets {
    pub s3_bucket_guid: String,
    /// One guid per object, in listing order
    pub s3_objects_guids: Vec<String>,
    /// Lineage process guids, source direction before target direction per object
    pub processes_guids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_serializes_all_fields_as_null() {
        let value = serde_json::to_value(AssetInfo::not_found()).unwrap();
        assert_eq!(
            value,
            json!({
                "guid": null,
                "qualified_name": null,
                "owners": null,
                "owner_groups": null,
                "tags": null,
                "update_time": null
            })
        );
    }

    #[test]
    fn test_asset_info_from_entity() {
        let entity: Entity = serde_json::from_value(json!({
            "typeName": "S3Bucket",
            "guid": "82c11978-e115-4d4f-88c4-06be25a99127",
            "updateTime": 1720796029000i64,
            "attributes": {
                "qualifiedName": "default/s3/1/arn",
                "ownerUsers": ["mag.i"],
                "ownerGroups": []
            }
        }))
        .unwrap();

        let info = AssetInfo::from(Some(entity));
        assert_eq!(info.guid.as_deref(), Some("82c11978-e115-4d4f-88c4-06be25a99127"));
        assert_eq!(info.qualified_name.as_deref(), Some("default/s3/1/arn"));
        assert_eq!(info.owners, Some(vec!["mag.i".to_string()]));
        assert_eq!(info.owner_groups, None);
        assert_eq!(info.tags, None);

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["update_time"], json!(1720796029000i64));
    }
}
