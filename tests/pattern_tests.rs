//! Object key to table name resolution through the public API

use s3_lineage_sync::pattern::{
    FileNamePattern, PatternError, ResolvedObject, apply_table_pattern, resolve_table_names,
};

#[test]
fn test_pattern_captures_table_names() {
    let pattern = FileNamePattern::new("sales/{table_name}_2024.csv").unwrap();
    let resolved = resolve_table_names(
        ["sales/orders_2024.csv", "sales/returns_2024.csv"],
        Some(&pattern),
    );
    assert_eq!(
        resolved,
        vec![
            ResolvedObject::new("sales/orders_2024.csv", "orders"),
            ResolvedObject::new("sales/returns_2024.csv", "returns"),
        ]
    );
}

#[test]
fn test_no_pattern_uses_file_name() {
    assert_eq!(
        resolve_table_names(["a/b/customer.csv"], None),
        vec![ResolvedObject::new("a/b/customer.csv", "customer")]
    );
}

#[test]
fn test_non_matching_keys_are_excluded() {
    let pattern = FileNamePattern::new("sales/{table_name}.csv").unwrap();
    assert!(resolve_table_names(["sales/x.txt"], Some(&pattern)).is_empty());
}

#[test]
fn test_pattern_characters_are_literal() {
    let pattern = FileNamePattern::new("exports/{table_name}.v1.csv").unwrap();
    assert_eq!(pattern.table_name("exports/orders.v1.csv").as_deref(), Some("orders"));
    assert_eq!(pattern.table_name("exports/orders_v1_csv"), None);
}

#[test]
fn test_resolution_keeps_listing_order() {
    let keys = ["z.csv", "a.csv", "m.parquet"];
    let names: Vec<String> = resolve_table_names(keys, None)
        .into_iter()
        .map(|r| r.table_name)
        .collect();
    assert_eq!(names, vec!["z", "a", "m"]);
}

#[test]
fn test_table_pattern_substitution() {
    assert_eq!(apply_table_pattern(Some("stg_{table_name}"), "orders"), "stg_orders");
    assert_eq!(apply_table_pattern(None, "orders"), "orders");
}

#[test]
fn test_empty_pattern_is_rejected() {
    assert_eq!(FileNamePattern::new("").unwrap_err(), PatternError::Empty);
}
