//! Child-table rows projected onto a fixed field list.

use serde_json::Value;

/// A raw JSON object as returned in a page's `items` array.
pub type Item = serde_json::Map<String, Value>;

/// Convert a JSON value to its text form.
///
/// Strings are returned as-is, numbers and booleans in their JSON spelling,
/// nested arrays and objects as compact JSON. `null` has no text form.
pub fn json_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// One row from a related table.
///
/// Cells keep the order of the field list the row was projected with. A cell
/// is `None` when the source row did not carry that field (or carried `null`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildRecord {
    cells: Vec<(String, Option<String>)>,
}

impl ChildRecord {
    /// Create a record from ordered `(field, value)` pairs.
    pub fn new(cells: Vec<(String, Option<String>)>) -> Self {
        Self { cells }
    }

    /// Project a raw page item onto `fields`, in order.
    pub fn project<S: AsRef<str>>(item: &Item, fields: &[S]) -> Self {
        let cells = fields
            .iter()
            .map(|field| {
                let field = field.as_ref();
                (field.to_string(), item.get(field).and_then(json_to_text))
            })
            .collect();
        Self { cells }
    }

    /// Value of `field`, if the row carried one.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Iterate over the cells in field order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_text() {
        assert_eq!(json_to_text(&json!("abc")), Some("abc".to_string()));
        assert_eq!(json_to_text(&json!(42)), Some("42".to_string()));
        assert_eq!(json_to_text(&json!(true)), Some("true".to_string()));
        assert_eq!(json_to_text(&json!(null)), None);
        assert_eq!(json_to_text(&json!([1, 2])), Some("[1,2]".to_string()));
    }

    #[test]
    fn test_project_keeps_field_order() {
        let item = json!({ "City": "Austin", "Country": "US", "Ignored": "x" });
        let record = ChildRecord::project(item.as_object().unwrap(), &["Country", "City", "State"]);

        let cells: Vec<_> = record.cells().collect();
        assert_eq!(
            cells,
            vec![("Country", Some("US")), ("City", Some("Austin")), ("State", None)]
        );
        assert_eq!(record.get("City"), Some("Austin"));
        assert_eq!(record.get("State"), None);
        assert_eq!(record.get("Ignored"), None);
    }
}
