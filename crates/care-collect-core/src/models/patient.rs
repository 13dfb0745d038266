//! Patient models.

use serde::{Deserialize, Serialize};

use super::bmi::compute_bmi;
use super::history::HealthHistory;
use super::visit::Visit;

/// Where a patient belongs.
///
/// Older stores recorded a school program and year level; current stores
/// record the patient's barangay. Both shapes are kept rather than
/// collapsing one into the other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locality {
    /// Barangay of residence
    Barangay { barangay: String },
    /// Program and year level (legacy student records)
    Campus { program: String, year: String },
}

impl Default for Locality {
    fn default() -> Self {
        Locality::Barangay {
            barangay: String::new(),
        }
    }
}

impl Locality {
    /// Create a barangay locality.
    pub fn barangay(barangay: impl Into<String>) -> Self {
        Locality::Barangay {
            barangay: barangay.into(),
        }
    }

    /// Create a program/year locality.
    pub fn campus(program: impl Into<String>, year: impl Into<String>) -> Self {
        Locality::Campus {
            program: program.into(),
            year: year.into(),
        }
    }

    /// True if any part of the locality is blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Locality::Barangay { barangay } => barangay.trim().is_empty(),
            Locality::Campus { program, year } => {
                program.trim().is_empty() || year.trim().is_empty()
            }
        }
    }

    /// Human-readable form for listings.
    pub fn describe(&self) -> String {
        match self {
            Locality::Barangay { barangay } => barangay.clone(),
            Locality::Campus { program, year } => format!("{} / {}", program, year),
        }
    }

    fn trimmed(self) -> Self {
        match self {
            Locality::Barangay { barangay } => Locality::barangay(barangay.trim()),
            Locality::Campus { program, year } => Locality::campus(program.trim(), year.trim()),
        }
    }
}

/// A patient record with its visit history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Unique ID (auto-increment integer rendered as a string)
    pub id: String,
    /// Full name
    pub name: String,
    /// Age as entered
    pub age: String,
    /// Sex as entered
    pub sex: String,
    /// Barangay or program/year
    pub locality: Locality,
    /// Contact number
    pub contact: String,
    /// Height in centimetres, as entered
    pub height: String,
    /// Weight in kilograms, as entered
    pub weight: String,
    /// BMI derived from height/weight when the record was last saved
    pub bmi: String,
    /// Known conditions
    pub health_history: HealthHistory,
    /// Visits, oldest first
    #[serde(default)]
    pub visits: Vec<Visit>,
}

impl Patient {
    /// Build a record from submitted fields.
    ///
    /// The BMI is derived here from height and weight.
    pub fn from_fields(id: String, fields: PatientFields, visits: Vec<Visit>) -> Self {
        let bmi = compute_bmi(&fields.height, &fields.weight);
        Self {
            id,
            name: fields.name,
            age: fields.age,
            sex: fields.sex,
            locality: fields.locality,
            contact: fields.contact,
            height: fields.height,
            weight: fields.weight,
            bmi,
            health_history: fields.health_history,
            visits,
        }
    }

    /// The editable attributes of this record.
    pub fn to_fields(&self) -> PatientFields {
        PatientFields {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            age: self.age.clone(),
            sex: self.sex.clone(),
            locality: self.locality.clone(),
            contact: self.contact.clone(),
            height: self.height.clone(),
            weight: self.weight.clone(),
            health_history: self.health_history.clone(),
        }
    }
}

/// Attributes submitted when adding or editing a patient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientFields {
    /// Caller-chosen ID; only honoured when IDs are assigned manually
    pub id: Option<String>,
    pub name: String,
    pub age: String,
    pub sex: String,
    pub locality: Locality,
    pub contact: String,
    pub height: String,
    pub weight: String,
    pub health_history: HealthHistory,
}

impl PatientFields {
    /// Create fields with the required attributes set.
    pub fn new(
        name: impl Into<String>,
        age: impl Into<String>,
        sex: impl Into<String>,
        locality: Locality,
    ) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            sex: sex.into(),
            locality,
            ..Default::default()
        }
    }

    /// Trim surrounding whitespace from every text attribute.
    pub fn normalized(self) -> Self {
        Self {
            id: self
                .id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            name: self.name.trim().to_string(),
            age: self.age.trim().to_string(),
            sex: self.sex.trim().to_string(),
            locality: self.locality.trimmed(),
            contact: self.contact.trim().to_string(),
            height: self.height.trim().to_string(),
            weight: self.weight.trim().to_string(),
            health_history: self.health_history,
        }
    }

    /// Name of the first blank required attribute, if any.
    pub fn missing_required(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.age.trim().is_empty() {
            Some("age")
        } else if self.sex.trim().is_empty() {
            Some("sex")
        } else if self.locality.is_blank() {
            Some("locality")
        } else {
            None
        }
    }
}
