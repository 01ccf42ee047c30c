//! Interpreting location save responses
//!
//! Between the uniqueness check and the save another user can claim the
//! same identifier. The backend then stores the location without it and
//! answers `DUPLICATED`. That is reported to the user as information, not
//! as a failure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier outcome reported by a create or update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IdentifierStatus {
    #[default]
    Ok,
    Duplicated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Create,
    Update,
}

/// The part of a save response the engine cares about
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    #[serde(default)]
    pub identifier_status: IdentifierStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
}

/// Message shown to the user once a save went through
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveNotice {
    pub severity: Severity,
    pub message: String,
}

impl SaveNotice {
    pub fn from_response(kind: SaveKind, response: &SaveResponse) -> Self {
        let verb = match kind {
            SaveKind::Create => "added",
            SaveKind::Update => "updated",
        };

        match response.identifier_status {
            IdentifierStatus::Ok => SaveNotice {
                severity: Severity::Success,
                message: format!("Location {}", verb),
            },
            IdentifierStatus::Duplicated => {
                tracing::info!(?kind, "location saved without its identifier");
                SaveNotice {
                    severity: Severity::Info,
                    message: format!(
                        "Location {}, but could not set location id because that LocationID is already being used.",
                        verb
                    ),
                }
            }
        }
    }
}

impl fmt::Display for SaveNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
