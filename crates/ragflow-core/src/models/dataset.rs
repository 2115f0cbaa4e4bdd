use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A server-side collection of indexed documents, searchable as a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Remote-assigned identifier
    pub id: String,

    /// Display name (falls back to the identifier)
    pub name: String,
}

impl Dataset {
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        let id = id.into();
        let name = name.unwrap_or_else(|| id.clone());
        Self { id, name }
    }

    /// Type one raw record from the dataset listing
    ///
    /// Returns `None` when the record has no string `id`.
    pub fn from_record(record: &Value) -> Option<Self> {
        let id = record.get("id")?.as_str()?;
        let name = record.get("name").and_then(Value::as_str).map(str::to_string);
        Some(Self::new(id, name))
    }

    /// Type every usable record, keeping listing order
    pub fn from_records(records: &[Value]) -> Vec<Self> {
        records.iter().filter_map(Self::from_record).collect()
    }
}
