//! The specification record extracted for one item

use crate::error::RecordParseError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// `error` value for an item whose name has no detail panel on the page
pub const NOT_FOUND: &str = "not found";

/// Row labels as they appear in the detail table, in output order.
///
/// Matching is by row-text prefix, so a wording change on the page leaves the
/// corresponding field empty.
pub const FIELD_LABELS: [&str; 12] = [
    "Head Size:",
    "Length:",
    "Balance:",
    "Swing Weight:",
    "Beam Width:",
    "Tip/Shaft:",
    "Composition:",
    "Power Level:",
    "Stiffness:",
    "String Pattern:",
    "Main Skip:",
    "String Tension:",
];

/// Wire keys the in-page script uses for each entry of [`FIELD_LABELS`]
pub const FIELD_KEYS: [&str; 12] = [
    "headSize",
    "length",
    "balance",
    "swingWeight",
    "beamWidth",
    "tipOrShaft",
    "composition",
    "powerLevel",
    "stiffness",
    "stringPattern",
    "mainSkip",
    "stringTension",
];

/// One item's specification.
///
/// Absent fields are empty strings, never missing. A record with a non-empty
/// `error` is a soft failure and its other fields carry no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecRecord {
    pub name: String,
    pub error: String,
    pub head_size: String,
    pub length: String,
    pub balance: String,
    pub swing_weight: String,
    pub beam_width: String,
    pub tip_or_shaft: String,
    pub composition: String,
    pub power_level: String,
    pub stiffness: String,
    pub string_pattern: String,
    pub main_skip: String,
    pub string_tension: String,
}

impl SpecRecord {
    /// Record for an item whose detail panel could not be located
    pub fn not_found(name: impl Into<String>) -> Self {
        Self { name: name.into(), error: NOT_FOUND.to_string(), ..Default::default() }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }

    /// Build a record from an in-page payload for `identifier`.
    ///
    /// The payload may be a JSON string (the script stringifies its result) or an
    /// already structured object. The record must name the item that was asked for.
    pub fn parse(identifier: &str, payload: Value) -> Result<Self, RecordParseError> {
        let record: SpecRecord = match payload {
            Value::Null => return Err(RecordParseError::Missing),
            Value::String(json) => serde_json::from_str(&json)?,
            obj @ Value::Object(_) => serde_json::from_value(obj)?,
            other => return Err(RecordParseError::UnexpectedShape(other.to_string())),
        };

        if record.name != identifier {
            return Err(RecordParseError::NameMismatch { expected: identifier.to_string(), found: record.name });
        }

        Ok(record)
    }

    /// Specification fields paired with their page labels, in [`FIELD_LABELS`] order
    pub fn fields(&self) -> [(&'static str, &str); 12] {
        [
            (FIELD_LABELS[0], self.head_size.as_str()),
            (FIELD_LABELS[1], self.length.as_str()),
            (FIELD_LABELS[2], self.balance.as_str()),
            (FIELD_LABELS[3], self.swing_weight.as_str()),
            (FIELD_LABELS[4], self.beam_width.as_str()),
            (FIELD_LABELS[5], self.tip_or_shaft.as_str()),
            (FIELD_LABELS[6], self.composition.as_str()),
            (FIELD_LABELS[7], self.power_level.as_str()),
            (FIELD_LABELS[8], self.stiffness.as_str()),
            (FIELD_LABELS[9], self.string_pattern.as_str()),
            (FIELD_LABELS[10], self.main_skip.as_str()),
            (FIELD_LABELS[11], self.string_tension.as_str()),
        ]
    }
}

impl fmt::Display for SpecRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Error: {}", self.error)?;
        for (label, value) in self.fields() {
            writeln!(f, "{} {}", label, value)?;
        }
        Ok(())
    }
}
