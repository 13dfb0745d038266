//! Care Collect Core Library
//!
//! Local clinic records: patient registration, vital-sign visits and search,
//! persisted in a single-file key-value store.
//!
//! # Architecture
//!
//! ```text
//!   Presentation layer (CLI / native shell via FFI)
//!                     │
//!             ┌───────▼────────┐
//!             │  RecordStore   │  patients + focused record
//!             │  upsert/delete │
//!             │  find/search   │
//!             │  record_visit  │
//!             └───────┬────────┘
//!                     │ whole-collection write on every mutation
//!             ┌───────▼────────┐
//!             │   Database     │  named slots in SQLite
//!             │  "students" →  │  {"version": 2, "patients": [...]}
//!             └────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite slot storage, collection versioning and migration
//! - [`models`]: Domain types (Patient, Visit, HealthHistory, etc.)
//! - [`store`]: The record store and its lookup rules

pub mod db;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use db::Database;
pub use models::{
    Condition, HealthHistory, Locality, Patient, PatientFields, Visit, Vitals,
};
pub use store::{IdPolicy, RecordStore, StoreError, StoreResult};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CareCollectError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Duplicate ID: {0}")]
    DuplicateId(String),
}

impl From<db::DbError> for CareCollectError {
    fn from(e: db::DbError) -> Self {
        CareCollectError::DatabaseError(e.to_string())
    }
}

impl From<StoreError> for CareCollectError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(field) => {
                CareCollectError::InvalidInput(format!("missing required field: {}", field))
            }
            StoreError::NotFound(what) => CareCollectError::NotFound(what),
            StoreError::DuplicateId(id) => CareCollectError::DuplicateId(id),
            StoreError::Database(e) => e.into(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for CareCollectError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        CareCollectError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a store at the given path.
#[uniffi::export]
pub fn open_store(
    path: String,
    manual_ids: bool,
) -> Result<Arc<CareCollectCore>, CareCollectError> {
    let db = Database::open(&path)?;
    CareCollectCore::wrap(db, manual_ids)
}

/// Create an in-memory store (for testing).
#[uniffi::export]
pub fn open_store_in_memory() -> Result<Arc<CareCollectCore>, CareCollectError> {
    let db = Database::open_in_memory()?;
    CareCollectCore::wrap(db, false)
}

/// BMI from height (cm) and weight (kg) as entered; empty if not computable.
#[uniffi::export]
pub fn compute_bmi(height_cm: String, weight_kg: String) -> String {
    models::compute_bmi(&height_cm, &weight_kg)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe record store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct CareCollectCore {
    store: Arc<Mutex<RecordStore>>,
}

impl CareCollectCore {
    fn wrap(db: Database, manual_ids: bool) -> Result<Arc<Self>, CareCollectError> {
        let policy = if manual_ids {
            IdPolicy::Manual
        } else {
            IdPolicy::AutoIncrement
        };
        let store = RecordStore::with_policy(db, policy)?;
        Ok(Arc::new(Self {
            store: Arc::new(Mutex::new(store)),
        }))
    }
}

#[uniffi::export]
impl CareCollectCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Add a patient, or replace the one identified by `editing_id`.
    pub fn upsert_patient(
        &self,
        fields: FfiPatientFields,
        editing_id: Option<String>,
    ) -> Result<FfiPatient, CareCollectError> {
        let mut store = self.store.lock()?;
        let fields = PatientFields::try_from(fields)?;
        let patient = store.upsert_patient(fields, editing_id.as_deref())?;
        Ok(patient.into())
    }

    /// Delete a patient. Returns false if it did not exist.
    pub fn delete_patient(&self, id: String) -> Result<bool, CareCollectError> {
        let mut store = self.store.lock()?;
        Ok(store.delete_patient(&id)?)
    }

    /// List all patients.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, CareCollectError> {
        let store = self.store.lock()?;
        Ok(store.patients().iter().cloned().map(Into::into).collect())
    }

    /// Search patients by ID or name.
    pub fn search_patients(&self, query: String) -> Result<Vec<FfiPatient>, CareCollectError> {
        let store = self.store.lock()?;
        Ok(store
            .search(&query)
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    // =========================================================================
    // Lookup / Visit Operations
    // =========================================================================

    /// Focus a patient by ID.
    pub fn find_patient_by_id(&self, id: String) -> Result<Option<FfiPatient>, CareCollectError> {
        let mut store = self.store.lock()?;
        not_found_as_none(store.find_patient_by_id(&id))
    }

    /// Focus a patient by name.
    pub fn find_patient_by_name(
        &self,
        name: String,
    ) -> Result<Option<FfiPatient>, CareCollectError> {
        let mut store = self.store.lock()?;
        not_found_as_none(store.find_patient_by_name(&name))
    }

    /// The focused patient, if any.
    pub fn focused_patient(&self) -> Result<Option<FfiPatient>, CareCollectError> {
        let store = self.store.lock()?;
        Ok(store.focused().cloned().map(Into::into))
    }

    /// Forget the focused patient, e.g. when the lookup screen is reset.
    pub fn clear_focus(&self) -> Result<(), CareCollectError> {
        let mut store = self.store.lock()?;
        store.clear_focus();
        Ok(())
    }

    /// Record a visit for the focused patient.
    pub fn record_visit(
        &self,
        patient_id: String,
        vitals: FfiVitals,
    ) -> Result<FfiVisit, CareCollectError> {
        let mut store = self.store.lock()?;
        let visit = store.record_visit(&patient_id, vitals.into())?;
        Ok(visit.into())
    }
}

fn not_found_as_none(
    result: StoreResult<Patient>,
) -> Result<Option<FfiPatient>, CareCollectError> {
    match result {
        Ok(patient) => Ok(Some(patient.into())),
        Err(StoreError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient input.
///
/// Set `program`/`year` for a campus record, otherwise `barangay` is used.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiPatientFields {
    pub id: Option<String>,
    pub name: String,
    pub age: String,
    pub sex: String,
    pub barangay: Option<String>,
    pub program: Option<String>,
    pub year: Option<String>,
    pub contact: String,
    pub height: String,
    pub weight: String,
    pub conditions: Vec<String>,
    pub other_history: Option<String>,
}

impl TryFrom<FfiPatientFields> for PatientFields {
    type Error = CareCollectError;

    fn try_from(fields: FfiPatientFields) -> Result<Self, Self::Error> {
        let conditions = fields
            .conditions
            .iter()
            .map(|label| {
                Condition::from_label(label).ok_or_else(|| {
                    CareCollectError::InvalidInput(format!("unknown condition: {}", label))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let locality = if fields.program.is_some() || fields.year.is_some() {
            Locality::campus(
                fields.program.unwrap_or_default(),
                fields.year.unwrap_or_default(),
            )
        } else {
            Locality::barangay(fields.barangay.unwrap_or_default())
        };

        Ok(PatientFields {
            id: fields.id,
            name: fields.name,
            age: fields.age,
            sex: fields.sex,
            locality,
            contact: fields.contact,
            height: fields.height,
            weight: fields.weight,
            health_history: HealthHistory::new(conditions, fields.other_history),
        })
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub age: String,
    pub sex: String,
    pub locality: String,
    pub contact: String,
    pub height: String,
    pub weight: String,
    pub bmi: String,
    pub conditions: Vec<String>,
    pub other_history: Option<String>,
    pub health_history: String,
    pub visits: Vec<FfiVisit>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            locality: patient.locality.describe(),
            conditions: patient
                .health_history
                .conditions()
                .iter()
                .map(|c| c.label().to_string())
                .collect(),
            other_history: patient.health_history.other().map(str::to_string),
            health_history: patient.health_history.to_display_string(),
            visits: patient.visits.into_iter().map(Into::into).collect(),
            id: patient.id,
            name: patient.name,
            age: patient.age,
            sex: patient.sex,
            contact: patient.contact,
            height: patient.height,
            weight: patient.weight,
            bmi: patient.bmi,
        }
    }
}

/// FFI-safe vital signs.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiVitals {
    pub bp: String,
    pub temp: String,
    pub pr: String,
    pub rr: String,
    pub oxygen: String,
    pub complaint: String,
}

impl From<FfiVitals> for Vitals {
    fn from(v: FfiVitals) -> Self {
        Vitals {
            bp: v.bp,
            temp: v.temp,
            pr: v.pr,
            rr: v.rr,
            oxygen: v.oxygen,
            complaint: v.complaint,
        }
    }
}

/// FFI-safe visit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisit {
    pub date: String,
    pub bp: String,
    pub temp: String,
    pub pr: String,
    pub rr: String,
    pub oxygen: String,
    pub complaint: String,
}

impl From<Visit> for FfiVisit {
    fn from(visit: Visit) -> Self {
        Self {
            date: visit.date,
            bp: visit.vitals.bp,
            temp: visit.vitals.temp,
            pr: visit.vitals.pr,
            rr: visit.vitals.rr,
            oxygen: visit.vitals.oxygen,
            complaint: visit.vitals.complaint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn juan() -> FfiPatientFields {
        FfiPatientFields {
            name: "Juan Dela Cruz".into(),
            age: "20".into(),
            sex: "M".into(),
            barangay: Some("Poblacion".into()),
            height: "170".into(),
            weight: "65".into(),
            conditions: vec!["asthma".into()],
            other_history: Some("dust, pollen".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_ffi_round_trip() {
        let core = open_store_in_memory().unwrap();

        let patient = core.upsert_patient(juan(), None).unwrap();
        assert_eq!(patient.id, "1");
        assert_eq!(patient.bmi, "22.5");
        assert_eq!(patient.locality, "Poblacion");
        assert_eq!(patient.health_history, "Asthma, dust, pollen");

        let found = core.find_patient_by_name("juan".into()).unwrap().unwrap();
        let visit = core
            .record_visit(
                found.id.clone(),
                FfiVitals {
                    bp: "120/80".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(visit.bp, "120/80");

        let listed = core.list_patients().unwrap();
        assert_eq!(listed[0].visits.len(), 1);
    }

    #[test]
    fn test_ffi_not_found_is_none() {
        let core = open_store_in_memory().unwrap();
        assert!(core.find_patient_by_id("3".into()).unwrap().is_none());
        assert!(core.focused_patient().unwrap().is_none());
    }

    #[test]
    fn test_ffi_clear_focus() {
        let core = open_store_in_memory().unwrap();
        let patient = core.upsert_patient(juan(), None).unwrap();

        core.find_patient_by_id(patient.id.clone()).unwrap().unwrap();
        core.clear_focus().unwrap();
        assert!(core.focused_patient().unwrap().is_none());
        assert!(matches!(
            core.record_visit(patient.id, FfiVitals::default()),
            Err(CareCollectError::NotFound(_))
        ));
    }

    #[test]
    fn test_ffi_errors() {
        let core = open_store_in_memory().unwrap();

        let mut unknown = juan();
        unknown.conditions = vec!["gout".into()];
        assert!(matches!(
            core.upsert_patient(unknown, None),
            Err(CareCollectError::InvalidInput(_))
        ));

        let mut blank = juan();
        blank.sex.clear();
        assert!(matches!(
            core.upsert_patient(blank, None),
            Err(CareCollectError::InvalidInput(_))
        ));

        assert!(matches!(
            core.record_visit("1".into(), FfiVitals::default()),
            Err(CareCollectError::NotFound(_))
        ));
    }

    #[test]
    fn test_ffi_campus_locality() {
        let mut fields = juan();
        fields.barangay = None;
        fields.program = Some("BSIT".into());
        fields.year = Some("3".into());

        let fields = PatientFields::try_from(fields).unwrap();
        assert_eq!(fields.locality, Locality::campus("BSIT", "3"));
    }

    #[test]
    fn test_compute_bmi_export() {
        assert_eq!(compute_bmi("170".into(), "65".into()), "22.5");
        assert_eq!(compute_bmi("0".into(), "65".into()), "");
    }
}
