//! Label and session status enums.
//!
//! `Label` serializes with the backend's wire spelling (`menschlich`, `ki`);
//! `SessionStatus` uses `snake_case`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// Authorship class of a training example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Human-written text. Wire value `menschlich`.
    #[serde(rename = "menschlich")]
    Human,
    /// AI-generated text. Wire value `ki`.
    #[serde(rename = "ki")]
    Ai,
}

impl Label {
    pub const ALL: [Self; 2] = [Self::Human, Self::Ai];

    /// Return the string the backend uses on the wire.
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Human => "menschlich",
            Self::Ai => "ki",
        }
    }

    /// Return the operator-facing name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Ai => "ai",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "menschlich" => Ok(Self::Human),
            "ai" | "ki" => Ok(Self::Ai),
            other => Err(CoreError::UnknownLabel(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Observable authentication state of the operator session.
///
/// ```text
/// anonymous ──login ok──▶ authenticated ──401──▶ expired
///     ▲                        │                    │
///     └────────logout──────────┘                    │
///     ▲                                             │
///     └─────────────── login failed ◀───────────────┘
/// authenticated ◀──────────── login ok ─────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Anonymous,
    Authenticated,
    Expired,
}

impl SessionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Authenticated => "authenticated",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
