//! Dot-separated field paths and request body expansion.

use crate::core::error::BindingError;
use serde_json::{Map, Value};
use std::fmt;

/// Location of a value inside a settings request body.
///
/// One segment sets a top-level key; two segments nest one level deep.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldPath {
    /// `{key: value}`.
    Top(String),
    /// `{group: {key: value}}`.
    Nested(String, String),
}

impl FieldPath {
    /// Parse a dot-separated path.
    ///
    /// # Errors
    /// Returns [`BindingError::PathArity`] when the path has more than two
    /// segments and [`BindingError::EmptySegment`] when any segment is blank.
    pub fn parse(raw: &str) -> Result<Self, BindingError> {
        let segments: Vec<&str> = raw.split('.').collect();
        if segments.iter().any(|segment| segment.trim().is_empty()) {
            return Err(BindingError::EmptySegment {
                path: raw.to_string(),
            });
        }
        match segments.as_slice() {
            [key] => Ok(Self::Top((*key).to_string())),
            [group, key] => Ok(Self::Nested((*group).to_string(), (*key).to_string())),
            _ => Err(BindingError::PathArity {
                path: raw.to_string(),
                segments: segments.len(),
            }),
        }
    }

    /// Wrap `value` into the request body shape for this path.
    #[must_use]
    pub fn body(&self, value: Value) -> Value {
        let mut body = Map::new();
        match self {
            Self::Top(key) => {
                body.insert(key.clone(), value);
            }
            Self::Nested(group, key) => {
                let mut inner = Map::new();
                inner.insert(key.clone(), value);
                body.insert(group.clone(), Value::Object(inner));
            }
        }
        Value::Object(body)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top(key) => f.write_str(key),
            Self::Nested(group, key) => write!(f, "{group}.{key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_segment_sets_top_level_key() {
        let path = FieldPath::parse("backupOptOut").expect("path");
        assert_eq!(path.body(json!(true)), json!({"backupOptOut": true}));
    }

    #[test]
    fn two_segments_nest_one_level() {
        let path = FieldPath::parse("autoExpand.reddit").expect("path");
        assert_eq!(
            path.body(json!(false)),
            json!({"autoExpand": {"reddit": false}})
        );
        assert_eq!(path.to_string(), "autoExpand.reddit");
    }

    #[test]
    fn deeper_paths_are_rejected() {
        assert_eq!(
            FieldPath::parse("a.b.c"),
            Err(BindingError::PathArity {
                path: "a.b.c".to_string(),
                segments: 3,
            })
        );
    }

    #[test]
    fn blank_segments_are_rejected() {
        for raw in ["", "a.", ".b", "a..b"] {
            assert!(
                matches!(
                    FieldPath::parse(raw),
                    Err(BindingError::EmptySegment { .. })
                ),
                "{raw} should be rejected"
            );
        }
    }
}
