//! Patient ID assignment.

use serde::{Deserialize, Serialize};

use crate::models::Patient;

/// How new patients get their IDs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// One past the largest numeric ID in the collection
    #[default]
    #[serde(rename = "auto")]
    AutoIncrement,
    /// The caller supplies the ID; collisions are rejected
    Manual,
}

/// Next free auto-increment ID.
///
/// Starts one past the largest numeric ID (or at 1) and keeps counting while
/// the candidate collides with an existing ID. Past `u64::MAX` it wraps to 1.
pub fn next_auto_id(patients: &[Patient]) -> String {
    let max = patients
        .iter()
        .filter_map(|p| numeric_prefix(&p.id))
        .max()
        .unwrap_or(0);

    let mut candidate = max.checked_add(1).unwrap_or(1);
    while patients.iter().any(|p| p.id == candidate.to_string()) {
        candidate = candidate.checked_add(1).unwrap_or(1);
    }
    candidate.to_string()
}

/// Leading decimal digits of an ID ("12", "12-b" -> 12; "A-3" -> none).
fn numeric_prefix(id: &str) -> Option<u64> {
    let trimmed = id.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}
