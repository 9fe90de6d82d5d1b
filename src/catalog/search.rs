//! Table search query
//!
//! Lineage needs every active table of a schema whose name matches a term. The term
//! is handed to the catalog as a case-insensitive regular expression on the table
//! name, so a plain table name matches exactly that table (regardless of case).

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::models::AssetType;

/// Attributes requested for each search hit
pub const SEARCH_ATTRIBUTES: [&str; 3] = ["name", "qualifiedName", "connectionQualifiedName"];

/// Search for active tables under a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSearch {
    /// Qualified name prefix the tables must live under
    pub schema_qualified_name: String,
    /// Regular expression the table name must match (case-insensitive, whole name)
    pub name_pattern: String,
}

impl TableSearch {
    pub fn new(schema_qualified_name: impl Into<String>, name_pattern: impl Into<String>) -> Self {
        Self {
            schema_qualified_name: schema_qualified_name.into(),
            name_pattern: name_pattern.into(),
        }
    }

    /// Index search request body for one page of results
    pub fn to_request(&self, from: usize, size: usize) -> Value {
        json!({
            "dsl": {
                "from": from,
                "size": size,
                "track_total_hits": true,
                "query": {
                    "bool": {
                        "filter": [
                            {"term": {"__typeName.keyword": {"value": AssetType::Table.type_name()}}},
                            {"term": {"__state": {"value": "ACTIVE"}}},
                            {"prefix": {"qualifiedName": {"value": self.schema_qualified_name}}},
                            {"regexp": {"name.keyword": {
                                "value": self.name_pattern,
                                "case_insensitive": true
                            }}}
                        ]
                    }
                },
                "sort": [{"__guid": {"order": "asc"}}]
            },
            "attributes": SEARCH_ATTRIBUTES,
            "suppressLogs": true,
            "showSearchScore": false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_filters() {
        let search = TableSearch::new("default/postgres/1/DB/SCHEMA", "orders");
        let request = search.to_request(100, 50);

        assert_eq!(request["dsl"]["from"], json!(100));
        assert_eq!(request["dsl"]["size"], json!(50));

        let filters = request["dsl"]["query"]["bool"]["filter"]
            .as_array()
            .unwrap();
        assert_eq!(filters.len(), 4);
        assert_eq!(
            filters[0]["term"]["__typeName.keyword"]["value"],
            json!("Table")
        );
        assert_eq!(
            filters[2]["prefix"]["qualifiedName"]["value"],
            json!("default/postgres/1/DB/SCHEMA")
        );
        assert_eq!(
            filters[3]["regexp"]["name.keyword"],
            json!({"value": "orders", "case_insensitive": true})
        );
        assert_eq!(
            request["attributes"],
            json!(["name", "qualifiedName", "connectionQualifiedName"])
        );
    }
}
