//! Line tagger for medication-information answers.
//!
//! The model is asked for one labelled line per field (`분류: …`, `효능: …`).
//! Each line is tagged by the first label it contains; unlabelled bullet
//! lines spill into the warning and side-effect lists. Whatever is still
//! empty afterwards comes from [`lookup_medication`].

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use tracing::debug;

use crate::knowledge::lookup_medication;
use crate::types::MedicationInfoRecord;

/// Unlabelled bullets stop spilling into a list once it holds this many.
pub const MAX_SPILL_ITEMS: usize = 3;

static BULLET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[*\-•]|[0-9]+\.)\s+").expect("Invalid bullet regex"));

/// Field a labelled line fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicationField {
    /// Drug class.
    Category,
    /// Indications.
    Effects,
    /// How to take it.
    Usage,
    /// Precautions.
    Warnings,
    /// Side effects.
    SideEffects,
}

/// Labels per field. Korean first; English labels are matched lower-cased.
/// Side effects are listed before effects so "부작용" is not read as "효과".
const LABELS: &[(MedicationField, &[&str])] = &[
    (MedicationField::Category, &["분류", "category"]),
    (MedicationField::SideEffects, &["부작용", "side effect"]),
    (MedicationField::Effects, &["효능", "효과", "effect"]),
    (MedicationField::Usage, &["복용법", "용법", "usage", "dosage"]),
    (MedicationField::Warnings, &["주의사항", "warning", "caution"]),
];

/// First field whose label occurs in `line`.
#[must_use]
pub fn classify_line(line: &str) -> Option<MedicationField> {
    let lower = line.to_ascii_lowercase();
    LABELS
        .iter()
        .find(|(_, labels)| labels.iter().any(|label| lower.contains(label)))
        .map(|(field, _)| *field)
}

/// Text after the first `:` or `：`, trimmed; `None` when absent or blank.
fn value_after_separator(line: &str) -> Option<&str> {
    let idx = line.find([':', '：'])?;
    let sep_len = line[idx..].chars().next().map_or(1, char::len_utf8);
    let value = line[idx + sep_len..].trim();
    (!value.is_empty()).then_some(value)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', '，'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `raw` into a fully populated record for `name`.
#[must_use]
pub fn parse_medication_info(raw: &str, name: &str) -> MedicationInfoRecord {
    let mut record = MedicationInfoRecord {
        name: name.to_string(),
        category: String::new(),
        effects: String::new(),
        usage: String::new(),
        warnings: Vec::new(),
        side_effects: Vec::new(),
        generated_at: Utc::now(),
    };
    let mut warnings_labelled = false;
    let mut side_effects_labelled = false;

    for raw_line in raw.lines() {
        let line = raw_line.replace("**", "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(field) = classify_line(line) {
            let Some(value) = value_after_separator(line) else {
                continue;
            };
            match field {
                MedicationField::Category if record.category.is_empty() => {
                    record.category = value.to_string();
                }
                MedicationField::Effects if record.effects.is_empty() => {
                    record.effects = value.to_string();
                }
                MedicationField::Usage if record.usage.is_empty() => {
                    record.usage = value.to_string();
                }
                MedicationField::Warnings if !warnings_labelled => {
                    warnings_labelled = true;
                    record.warnings.extend(split_list(value));
                }
                MedicationField::SideEffects if !side_effects_labelled => {
                    side_effects_labelled = true;
                    record.side_effects.extend(split_list(value));
                }
                _ => {}
            }
            continue;
        }

        if let Some(prefix) = BULLET_PREFIX.find(line) {
            let item = line[prefix.end()..].trim();
            if item.is_empty() {
                continue;
            }
            if record.warnings.len() < MAX_SPILL_ITEMS {
                record.warnings.push(item.to_string());
            } else if record.side_effects.len() < MAX_SPILL_ITEMS {
                record.side_effects.push(item.to_string());
            }
        }
    }

    let missing = record.category.is_empty()
        || record.effects.is_empty()
        || record.usage.is_empty()
        || record.warnings.is_empty()
        || record.side_effects.is_empty();
    if missing {
        let fallback = lookup_medication(name);
        if record.category.is_empty() {
            record.category = fallback.category;
        }
        if record.effects.is_empty() {
            record.effects = fallback.effects;
        }
        if record.usage.is_empty() {
            record.usage = fallback.usage;
        }
        if record.warnings.is_empty() {
            record.warnings = fallback.warnings;
        }
        if record.side_effects.is_empty() {
            record.side_effects = fallback.side_effects;
        }
    }

    debug!(
        name,
        category = %record.category,
        warnings = record.warnings.len(),
        side_effects = record.side_effects.len(),
        backfilled = missing,
        "Parsed medication info"
    );
    record
}
