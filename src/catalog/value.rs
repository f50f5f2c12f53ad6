//! Values accepted by the generic insert endpoint.

use serde_json::{Map, Value};
use time::{macros::format_description, Date};

use crate::catalog::repo_types::TableColumn;

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(Date),
}

impl ColumnValue {
    /// Scalar JSON only; arrays and objects have no column counterpart.
    pub fn from_json(v: &Value) -> Option<Self> {
        Some(match v {
            Value::Null => ColumnValue::Null,
            Value::Bool(b) => ColumnValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ColumnValue::Int(i),
                // beyond i64: exact digits, the column cast parses them
                None if n.is_u64() => ColumnValue::Text(n.to_string()),
                None => ColumnValue::Float(n.as_f64()?),
            },
            Value::String(s) => ColumnValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => return None,
        })
    }

    /// Text headed for a `date` column is carried as a date when it parses.
    pub fn for_column(self, column: &TableColumn) -> Self {
        match self {
            ColumnValue::Text(s) if column.is_date() => {
                match Date::parse(&s, format_description!("[year]-[month]-[day]")) {
                    Ok(d) => ColumnValue::Date(d),
                    Err(_) => ColumnValue::Text(s),
                }
            }
            other => other,
        }
    }
}

/// Column name to raw JSON value, in the order the caller sent them.
/// Values are converted only once their column is known to be writable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPayload {
    entries: Vec<(String, Value)>,
}

impl RowPayload {
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl From<Map<String, Value>> for RowPayload {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl FromIterator<(String, Value)> for RowPayload {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RowPayload {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
