//! Dotted key-path resolution through nested payload mappings.

use crate::core::{PathError, Value};

/// Walks a dotted path (`"a.b.c"`) through nested mappings.
///
/// Resolution is partial: a missing key, a non-mapping value under a
/// pending segment, and a null value before the final segment each
/// produce a distinct error kind. The final segment may legitimately
/// resolve to null.
pub fn resolve_path<'a>(payload: &'a Value, path: &str) -> Result<&'a Value, PathError> {
    let segments: Vec<&str> = path.split('.').collect();
    let last = segments.len() - 1;
    let mut current = payload;

    for (i, segment) in segments.iter().enumerate() {
        let Some(map) = current.as_map() else {
            return Err(PathError::NotAMapping {
                segment: (*segment).to_string(),
                path: path.to_string(),
            });
        };
        current = map.get(*segment).ok_or_else(|| PathError::MissingKey {
            path: path.to_string(),
        })?;
        if i < last && current.is_null() {
            return Err(PathError::NullIntermediate {
                segment: (*segment).to_string(),
                path: path.to_string(),
            });
        }
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload() -> Value {
        Value::from(json!({
            "domain": {"nx": 5, "bbox": null},
            "meta": {"run": {"id": "r-17"}},
            "empty": null,
        }))
    }

    #[test]
    fn resolves_nested_values() {
        let p = payload();
        assert_eq!(resolve_path(&p, "domain.nx"), Ok(&Value::Int(5)));
        assert_eq!(resolve_path(&p, "meta.run.id"), Ok(&Value::from("r-17")));
        assert_eq!(resolve_path(&p, "domain"), Ok(p.as_map().unwrap().get("domain").unwrap()));
    }

    #[test]
    fn terminal_null_is_a_legitimate_value() {
        let p = payload();
        assert_eq!(resolve_path(&p, "domain.bbox"), Ok(&Value::Null));
        assert_eq!(resolve_path(&p, "empty"), Ok(&Value::Null));
    }

    #[test]
    fn missing_key_names_the_full_path() {
        let err = resolve_path(&payload(), "domain.ny").unwrap_err();
        assert_eq!(
            err,
            PathError::MissingKey {
                path: "domain.ny".into()
            }
        );
        assert_eq!(err.to_string(), "Missing key in expression: domain.ny");
    }

    #[test]
    fn descending_into_a_scalar_names_the_segment() {
        let err = resolve_path(&payload(), "domain.nx.deeper").unwrap_err();
        assert_eq!(
            err,
            PathError::NotAMapping {
                segment: "deeper".into(),
                path: "domain.nx.deeper".into()
            }
        );
    }

    #[test]
    fn null_before_the_final_segment_is_distinct() {
        let err = resolve_path(&payload(), "empty.inner").unwrap_err();
        assert_eq!(
            err,
            PathError::NullIntermediate {
                segment: "empty".into(),
                path: "empty.inner".into()
            }
        );
    }

    #[test]
    fn resolution_is_deterministic_and_side_effect_free() {
        let p = payload();
        let first = resolve_path(&p, "meta.run.id").unwrap().clone();
        let second = resolve_path(&p, "meta.run.id").unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(p, payload());
    }
}
