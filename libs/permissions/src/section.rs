//! The closed set of top-level permission sections

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Top-level functional area of the application
///
/// The set is closed: permission documents may only grant access under
/// these sections, and anything else in a persisted document is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Patients,
    Appointments,
    Messages,
    MedicalRecords,
    Billing,
    Settings,
    Reports,
    AiAssistant,
}

/// Error returned when a string does not name a known section
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown permission section: {0}")]
pub struct UnknownSection(pub String);

impl SectionKey {
    /// Canonical ordering of all sections, used wherever iteration order
    /// must be stable (summaries, presets)
    pub const ALL: [SectionKey; 8] = [
        SectionKey::Patients,
        SectionKey::Appointments,
        SectionKey::Messages,
        SectionKey::MedicalRecords,
        SectionKey::Billing,
        SectionKey::Settings,
        SectionKey::Reports,
        SectionKey::AiAssistant,
    ];

    /// The snake_case name used in persisted documents
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Patients => "patients",
            SectionKey::Appointments => "appointments",
            SectionKey::Messages => "messages",
            SectionKey::MedicalRecords => "medical_records",
            SectionKey::Billing => "billing",
            SectionKey::Settings => "settings",
            SectionKey::Reports => "reports",
            SectionKey::AiAssistant => "ai_assistant",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}
