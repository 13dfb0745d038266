//! Health history: a set of known conditions plus one free-text entry.

use serde::{Deserialize, Serialize};

/// Conditions offered as checkboxes on the intake form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Asthma,
    Allergies,
    Diabetes,
    Hypertension,
    HeartDisease,
    Epilepsy,
    Tuberculosis,
    Anemia,
}

impl Condition {
    /// Every condition, in form order.
    pub const ALL: [Condition; 8] = [
        Condition::Asthma,
        Condition::Allergies,
        Condition::Diabetes,
        Condition::Hypertension,
        Condition::HeartDisease,
        Condition::Epilepsy,
        Condition::Tuberculosis,
        Condition::Anemia,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Asthma => "Asthma",
            Condition::Allergies => "Allergies",
            Condition::Diabetes => "Diabetes",
            Condition::Hypertension => "Hypertension",
            Condition::HeartDisease => "Heart Disease",
            Condition::Epilepsy => "Epilepsy",
            Condition::Tuberculosis => "Tuberculosis",
            Condition::Anemia => "Anemia",
        }
    }

    /// Look up a condition by label, case-insensitively.
    ///
    /// Accepts the display label ("Heart Disease") and the stored tag
    /// ("heart_disease").
    pub fn from_label(label: &str) -> Option<Self> {
        let needle = label.trim().to_lowercase().replace('_', " ");
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().to_lowercase() == needle)
    }
}

/// Wire shape used to rebuild the set invariant on deserialize.
#[derive(Deserialize)]
struct RawHealthHistory {
    #[serde(default)]
    conditions: Vec<Condition>,
    #[serde(default)]
    other: Option<String>,
}

impl From<RawHealthHistory> for HealthHistory {
    fn from(raw: RawHealthHistory) -> Self {
        HealthHistory::new(raw.conditions, raw.other)
    }
}

/// Ordered set of conditions (first-insertion order, no duplicates) plus at
/// most one free-text entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawHealthHistory")]
pub struct HealthHistory {
    conditions: Vec<Condition>,
    other: Option<String>,
}

impl HealthHistory {
    /// Build from selected conditions and an optional "other" entry.
    pub fn new(conditions: impl IntoIterator<Item = Condition>, other: Option<String>) -> Self {
        let mut history = Self::default();
        for condition in conditions {
            history.insert(condition);
        }
        history.set_other(other);
        history
    }

    /// Add a condition. Returns false if it was already present.
    pub fn insert(&mut self, condition: Condition) -> bool {
        if self.conditions.contains(&condition) {
            return false;
        }
        self.conditions.push(condition);
        true
    }

    /// Replace the free-text entry; blank clears it.
    pub fn set_other(&mut self, other: Option<String>) {
        self.other = other
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty());
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn other(&self) -> Option<&str> {
        self.other.as_deref()
    }

    pub fn contains(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.other.is_none()
    }

    /// Comma-joined text for display.
    pub fn to_display_string(&self) -> String {
        let mut parts: Vec<&str> = self.conditions.iter().map(|c| c.label()).collect();
        if let Some(other) = self.other.as_deref() {
            parts.push(other);
        }
        parts.join(", ")
    }

    /// Parse a comma-joined history string from an unversioned store.
    ///
    /// Known labels become conditions; everything else is joined back
    /// together, in order, as the free-text entry.
    pub fn parse_legacy(text: &str) -> Self {
        let mut history = Self::default();
        let mut unknown = Vec::new();

        for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match Condition::from_label(part) {
                Some(condition) => {
                    history.insert(condition);
                }
                None => unknown.push(part),
            }
        }

        if !unknown.is_empty() {
            history.set_other(Some(unknown.join(", ")));
        }
        history
    }
}
