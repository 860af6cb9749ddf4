//! Sheet names and the generic record envelope.

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The closed set of sheets the site stores content in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
    Blog,
    Events,
    Brochures,
    Subscribers,
    Popups,
    Applications,
    CourseOfferings,
}

impl Sheet {
    /// Every registered sheet, in registry order.
    pub const ALL: [Sheet; 7] = [
        Self::Blog,
        Self::Events,
        Self::Brochures,
        Self::Subscribers,
        Self::Popups,
        Self::Applications,
        Self::CourseOfferings,
    ];

    /// Returns the sheet name as the backend knows it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blog => "Blog",
            Self::Events => "Events",
            Self::Brochures => "Brochures",
            Self::Subscribers => "Subscribers",
            Self::Popups => "Popups",
            Self::Applications => "Applications",
            Self::CourseOfferings => "CourseOfferings",
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field payload of a record stored in one sheet.
///
/// The `id` is not part of the payload; it lives on [`Record`] and is
/// generated by the client when a record is created.
pub trait RecordData: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Sheet this record type is stored in.
    const SHEET: Sheet;
}

/// A stored record: the unique id plus the sheet-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    /// Opaque unique identifier, generated client-side at creation.
    #[serde(deserialize_with = "super::cells::string_or_number")]
    pub id: String,
    /// Sheet-specific fields.
    #[serde(flatten)]
    pub data: T,
}

impl<T> Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for Record<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        title: String,
    }

    #[test]
    fn test_record_flattens_fields_next_to_id() {
        let record = Record {
            id: "abc".to_string(),
            data: Note {
                title: "Hello".to_string(),
            },
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({ "id": "abc", "title": "Hello" }));
        assert_eq!(record.title, "Hello");
    }

    #[test]
    fn test_record_accepts_numeric_ids_from_sheet() {
        let record: Record<Note> = serde_json::from_value(json!({ "id": 7, "title": "x" })).unwrap();
        assert_eq!(record.id, "7");
    }

    #[test]
    fn test_sheet_names_are_unique() {
        let mut names: Vec<&str> = Sheet::ALL.iter().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Sheet::ALL.len());
    }
}
