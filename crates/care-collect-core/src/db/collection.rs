//! Persisted patient collection.
//!
//! The collection is stored in the [`PATIENTS_SLOT`] slot as
//! `{"version": 2, "patients": [...]}`. Stores written before versioning hold
//! a bare JSON array of camelCase records; those are migrated on load and
//! written back in the current shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Database, DbError, DbResult};
use crate::models::{HealthHistory, Locality, Patient, Visit};

/// Slot holding the patient collection.
pub const PATIENTS_SLOT: &str = "students";

/// Current collection layout version.
pub const COLLECTION_VERSION: u64 = 2;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u64,
    patients: &'a [Patient],
}

#[derive(Deserialize)]
struct Envelope {
    patients: Vec<Patient>,
}

/// Result of decoding a stored collection.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCollection {
    pub patients: Vec<Patient>,
    /// True if the blob was in an older layout
    pub migrated: bool,
}

/// Serialize a collection in the current layout.
pub fn encode_collection(patients: &[Patient]) -> DbResult<String> {
    let envelope = EnvelopeRef {
        version: COLLECTION_VERSION,
        patients,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Deserialize a stored collection, migrating older layouts.
pub fn decode_collection(blob: &str) -> DbResult<DecodedCollection> {
    let value: Value = serde_json::from_str(blob)?;
    let version = match &value {
        Value::Array(records) => {
            let patients = records
                .iter()
                .map(migrate_legacy_record)
                .collect::<DbResult<Vec<_>>>()?;
            return Ok(DecodedCollection {
                patients,
                migrated: true,
            });
        }
        Value::Null => {
            return Ok(DecodedCollection {
                patients: Vec::new(),
                migrated: false,
            })
        }
        Value::Object(obj) => obj
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| DbError::Malformed("collection has no version".into()))?,
        _ => {
            return Err(DbError::Malformed(
                "collection is neither an array nor an object".into(),
            ))
        }
    };

    if version > COLLECTION_VERSION {
        return Err(DbError::UnsupportedVersion {
            found: version,
            supported: COLLECTION_VERSION,
        });
    }
    if version < COLLECTION_VERSION {
        return Err(DbError::Malformed(format!(
            "unknown collection version {}",
            version
        )));
    }

    let envelope: Envelope = serde_json::from_value(value)?;
    Ok(DecodedCollection {
        patients: envelope.patients,
        migrated: false,
    })
}

/// Convert one record from an unversioned store.
fn migrate_legacy_record(record: &Value) -> DbResult<Patient> {
    let obj = record
        .as_object()
        .ok_or_else(|| DbError::Malformed("legacy record is not an object".into()))?;
    let field = |name: &str| loose_string(obj.get(name));

    let visits = match obj.get("visits") {
        None | Some(Value::Null) => Vec::new(),
        Some(v) => serde_json::from_value::<Vec<Visit>>(v.clone())?,
    };

    Ok(Patient {
        id: field("id"),
        name: field("name"),
        age: field("age"),
        sex: field("sex"),
        locality: legacy_locality(obj),
        contact: field("contact"),
        height: field("height"),
        weight: field("weight"),
        bmi: field("bmi"),
        health_history: legacy_history(obj.get("healthHistory")),
        visits,
    })
}

fn legacy_locality(obj: &Map<String, Value>) -> Locality {
    let present = |name: &str| !matches!(obj.get(name), None | Some(Value::Null));

    if present("barangay") {
        Locality::barangay(loose_string(obj.get("barangay")))
    } else if present("program") || present("year") {
        Locality::campus(
            loose_string(obj.get("program")),
            loose_string(obj.get("year")),
        )
    } else {
        Locality::default()
    }
}

fn legacy_history(value: Option<&Value>) -> HealthHistory {
    match value {
        Some(Value::String(text)) => HealthHistory::parse_legacy(text),
        Some(Value::Array(items)) => {
            let joined = items
                .iter()
                .map(|item| loose_string(Some(item)))
                .collect::<Vec<_>>()
                .join(", ");
            HealthHistory::parse_legacy(&joined)
        }
        _ => HealthHistory::default(),
    }
}

/// Read a scalar JSON value as text; absent or null becomes empty.
fn loose_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

impl Database {
    /// Load the patient collection.
    ///
    /// An older layout is migrated and written back once.
    pub fn load_patients(&self) -> DbResult<Vec<Patient>> {
        let Some(blob) = self.get_slot(PATIENTS_SLOT)? else {
            log::debug!("no stored collection, starting empty");
            return Ok(Vec::new());
        };

        let decoded = decode_collection(&blob)?;
        if decoded.migrated {
            log::warn!(
                "migrating {} unversioned patient records to version {}",
                decoded.patients.len(),
                COLLECTION_VERSION
            );
            self.save_patients(&decoded.patients)?;
        }
        Ok(decoded.patients)
    }

    /// Replace the stored patient collection.
    pub fn save_patients(&self, patients: &[Patient]) -> DbResult<()> {
        let blob = encode_collection(patients)?;
        self.set_slot(PATIENTS_SLOT, &blob)?;
        log::debug!("saved {} patient records", patients.len());
        Ok(())
    }
}
