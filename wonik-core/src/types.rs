//! Core type definitions for Wonik Health.
//!
//! All records are serializable so they can be handed to a presentation
//! layer as JSON or stored alongside a medication row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WonikError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identifier of a stored medication (the SQLite row id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicationId(pub i64);

impl fmt::Display for MedicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MedicationId {
    type Err = WonikError;

    /// Numeric coercion: `" 42 "` and `"42"` name the same medication.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| WonikError::InvalidId(s.to_string()))
    }
}

impl From<i64> for MedicationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Advice records
// ---------------------------------------------------------------------------

/// Work/rest advice for a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    /// Condition the advice is for.
    pub subject: String,
    /// Work/rest rhythm, e.g. `"45분 업무 → 15분 휴식"`.
    pub pattern: String,
    /// Daily schedule hint.
    pub schedule: String,
    /// Up to four practical tips, in discovery order.
    pub tips: Vec<String>,
    /// When this record was produced.
    pub generated_at: DateTime<Utc>,
}

impl RecommendationRecord {
    /// Equality on everything except `generated_at`.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.subject == other.subject
            && self.pattern == other.pattern
            && self.schedule == other.schedule
            && self.tips == other.tips
    }
}

/// Reference information about a medication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationInfoRecord {
    /// Medication name.
    pub name: String,
    /// Drug class.
    pub category: String,
    /// What it is taken for.
    pub effects: String,
    /// How to take it.
    pub usage: String,
    /// Precautions.
    pub warnings: Vec<String>,
    /// Known side effects.
    pub side_effects: Vec<String>,
    /// When this record was produced.
    pub generated_at: DateTime<Utc>,
}

impl MedicationInfoRecord {
    /// Equality on everything except `generated_at`.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.name == other.name
            && self.category == other.category
            && self.effects == other.effects
            && self.usage == other.usage
            && self.warnings == other.warnings
            && self.side_effects == other.side_effects
    }
}

// ---------------------------------------------------------------------------
// Stored medications
// ---------------------------------------------------------------------------

/// Advice attached to a stored medication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttachedInfo {
    /// A work/rest recommendation.
    Recommendation(RecommendationRecord),
    /// Medication reference information.
    MedicationInfo(MedicationInfoRecord),
}

/// A medication the user has recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationEntity {
    /// Store-assigned identifier.
    pub id: MedicationId,
    /// Medication name.
    pub name: String,
    /// Dosage, e.g. `"500mg"`. May be empty.
    pub dosage: String,
    /// Time of day to take it, `HH:MM`. May be empty.
    pub time: String,
    /// Free-form notes.
    pub notes: String,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// Advice attached after creation.
    pub ai_info: Option<AttachedInfo>,
}

/// Fields supplied when adding a medication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMedication {
    /// Medication name (required).
    pub name: String,
    /// Dosage.
    #[serde(default)]
    pub dosage: String,
    /// Time of day.
    #[serde(default)]
    pub time: String,
    /// Notes.
    #[serde(default)]
    pub notes: String,
}

impl NewMedication {
    /// A medication with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a stored medication; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationPatch {
    /// New name.
    pub name: Option<String>,
    /// New dosage.
    pub dosage: Option<String>,
    /// New time.
    pub time: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// Advice to attach (replaces any previous attachment).
    pub ai_info: Option<AttachedInfo>,
}

impl MedicationPatch {
    /// A patch that only attaches advice.
    #[must_use]
    pub fn attach(info: AttachedInfo) -> Self {
        Self {
            ai_info: Some(info),
            ..Self::default()
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.dosage.is_none()
            && self.time.is_none()
            && self.notes.is_none()
            && self.ai_info.is_none()
    }
}
