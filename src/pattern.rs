//! Object key to table name resolution
//!
//! Objects in a bucket are linked to tables by a logical table name. Without a
//! file-name pattern the name is the object's file name minus its extension
//! (`a/b/customer.csv` -> `customer`). With a pattern such as
//! `sales/{table_name}_2024.csv`, every character is matched literally except the
//! `{table_name}` placeholder, which captures the table name; keys that do not match
//! the pattern are left out.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder standing for the logical table name in file-name and table patterns
pub const TABLE_NAME_PLACEHOLDER: &str = "{table_name}";

const TABLE_NAME_GROUP: &str = "table_name";

/// Errors raised while building a file-name pattern
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("file name pattern cannot be empty")]
    Empty,

    #[error("invalid file name pattern '{pattern}': {reason}")]
    Invalid { pattern: String, reason: String },
}

pub type PatternResult<T> = Result<T, PatternError>;

/// An object key paired with the table name inferred from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedObject {
    pub key: String,
    pub table_name: String,
}

impl ResolvedObject {
    pub fn new(key: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            table_name: table_name.into(),
        }
    }
}

/// Compiled file-name pattern
#[derive(Debug, Clone)]
pub struct FileNamePattern {
    template: String,
    regex: Regex,
}

impl FileNamePattern {
    /// Compile a template into an anchored, case-insensitive matching rule
    ///
    /// Only the first placeholder captures; further occurrences match any text.
    pub fn new(template: &str) -> PatternResult<Self> {
        if template.is_empty() {
            return Err(PatternError::Empty);
        }

        let mut rule = String::from("^");
        for (index, literal) in template.split(TABLE_NAME_PLACEHOLDER).enumerate() {
            match index {
                0 => {}
                1 => rule.push_str(&format!("(?P<{}>.+)", TABLE_NAME_GROUP)),
                _ => rule.push_str("(?:.+)"),
            }
            rule.push_str(&regex::escape(literal));
        }
        rule.push('$');

        let regex = RegexBuilder::new(&rule)
            .case_insensitive(true)
            .build()
            .map_err(|e| PatternError::Invalid {
                pattern: template.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            template: template.to_string(),
            regex,
        })
    }

    /// The template this pattern was built from
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn has_placeholder(&self) -> bool {
        self.template.contains(TABLE_NAME_PLACEHOLDER)
    }

    /// Table name for a key, or `None` when the key does not match
    pub fn table_name(&self, key: &str) -> Option<String> {
        let captures = self.regex.captures(key)?;
        match captures.name(TABLE_NAME_GROUP) {
            Some(name) => Some(name.as_str().to_string()),
            None => Some(file_stem(key).to_string()),
        }
    }
}

/// File name of a key up to its first dot (`a/b/customer.tar.gz` -> `customer`)
pub fn file_stem(key: &str) -> &str {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    file_name.split('.').next().unwrap_or(file_name)
}

/// Resolve table names for object keys, keeping input order
///
/// Keys that do not match `pattern` are dropped.
pub fn resolve_table_names<I, S>(keys: I, pattern: Option<&FileNamePattern>) -> Vec<ResolvedObject>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .filter_map(|key| {
            let key = key.as_ref();
            let table_name = match pattern {
                Some(pattern) => pattern.table_name(key)?,
                None => file_stem(key).to_string(),
            };
            Some(ResolvedObject::new(key, table_name))
        })
        .collect()
}

/// Substitute a table name into an optional table pattern
///
/// Patterns without the placeholder are ignored and the table name is used as is.
pub fn apply_table_pattern(pattern: Option<&str>, table_name: &str) -> String {
    match pattern {
        Some(p) if p.contains(TABLE_NAME_PLACEHOLDER) => p.replace(TABLE_NAME_PLACEHOLDER, table_name),
        _ => table_name.to_string(),
    }
}
