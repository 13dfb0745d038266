//! Visit models.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Vital signs and complaint taken at a visit. All free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Vitals {
    /// Blood pressure (e.g., "120/80")
    pub bp: String,
    /// Temperature
    pub temp: String,
    /// Pulse rate
    pub pr: String,
    /// Respiratory rate
    pub rr: String,
    /// Oxygen saturation
    pub oxygen: String,
    /// Chief complaint
    pub complaint: String,
}

/// One recorded visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    /// When the visit was recorded, formatted for display
    #[serde(default)]
    pub date: String,
    #[serde(flatten)]
    pub vitals: Vitals,
}

impl Visit {
    /// Create a visit stamped with the current local time.
    pub fn new(vitals: Vitals) -> Self {
        Self::with_date(format_visit_date(&Local::now()), vitals)
    }

    /// Create a visit with an explicit date string.
    pub fn with_date(date: String, vitals: Vitals) -> Self {
        Self { date, vitals }
    }
}

/// Format a timestamp the way visit dates are displayed, e.g.
/// `10/16/2026, 3:04:05 PM`.
pub fn format_visit_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}
