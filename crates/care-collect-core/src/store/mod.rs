//! Patient record store.
//!
//! A [`RecordStore`] is one interactive session: it owns the database handle,
//! the in-memory patient collection and the focused record (the patient most
//! recently resolved by a lookup, which visit recording targets).
//!
//! Every mutation builds the next collection, persists it whole, and only
//! then swaps it in. A failed write leaves the session unchanged.

mod ids;
mod lookup;

pub use ids::*;
pub use lookup::*;

use log::{debug, info};
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{Patient, PatientFields, Visit, Vitals};

/// Record store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Missing required field: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Patient ID already exists: {0}")]
    DuplicateId(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Patient collection plus the focused record.
pub struct RecordStore {
    db: Database,
    patients: Vec<Patient>,
    focused: Option<String>,
    id_policy: IdPolicy,
}

impl RecordStore {
    /// Load the collection with auto-increment IDs.
    pub fn open(db: Database) -> StoreResult<Self> {
        Self::with_policy(db, IdPolicy::default())
    }

    /// Load the collection with the given ID policy.
    pub fn with_policy(db: Database, id_policy: IdPolicy) -> StoreResult<Self> {
        let patients = db.load_patients()?;
        info!(
            "record store opened with {} patients ({:?} ids)",
            patients.len(),
            id_policy
        );
        Ok(Self {
            db,
            patients,
            focused: None,
            id_policy,
        })
    }

    /// All patients, in insertion order.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Read a patient without changing focus.
    pub fn get(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// The focused patient, if any.
    pub fn focused(&self) -> Option<&Patient> {
        self.focused.as_deref().and_then(|id| self.get(id))
    }

    /// Drop the focused record; visits cannot be recorded until the next
    /// successful lookup.
    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    /// Add a patient, or replace the one identified by `editing_id`.
    ///
    /// Editing keeps the original ID and visit history.
    pub fn upsert_patient(
        &mut self,
        fields: PatientFields,
        editing_id: Option<&str>,
    ) -> StoreResult<Patient> {
        let fields = fields.normalized();
        if let Some(missing) = fields.missing_required() {
            return Err(StoreError::Validation(missing.into()));
        }

        match editing_id {
            Some(editing_id) => {
                let existing = self
                    .get(editing_id)
                    .ok_or_else(|| StoreError::NotFound(format!("patient {}", editing_id)))?;
                let patient =
                    Patient::from_fields(existing.id.clone(), fields, existing.visits.clone());

                let next = self
                    .patients
                    .iter()
                    .map(|p| {
                        if p.id == patient.id {
                            patient.clone()
                        } else {
                            p.clone()
                        }
                    })
                    .collect();
                self.commit(next)?;
                info!("updated patient {}", patient.id);
                Ok(patient)
            }
            None => {
                let id = self.assign_id(&fields)?;
                let patient = Patient::from_fields(id, fields, Vec::new());

                let mut next = self.patients.clone();
                next.push(patient.clone());
                self.commit(next)?;
                info!("added patient {}", patient.id);
                Ok(patient)
            }
        }
    }

    /// Remove a patient. Returns false if no such patient existed.
    ///
    /// Deleting the focused patient clears the focus.
    pub fn delete_patient(&mut self, id: &str) -> StoreResult<bool> {
        let next: Vec<Patient> = self
            .patients
            .iter()
            .filter(|p| p.id != id)
            .cloned()
            .collect();
        let removed = next.len() != self.patients.len();

        self.commit(next)?;
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
        }
        if removed {
            info!("deleted patient {}", id);
        }
        Ok(removed)
    }

    /// Resolve and focus a patient by exact ID.
    pub fn find_patient_by_id(&mut self, id: &str) -> StoreResult<Patient> {
        let id = id.trim();
        let found = self.get(id).cloned();
        self.refocus(found, || format!("patient {}", id))
    }

    /// Resolve and focus a patient by name.
    ///
    /// See [`match_by_name`] for the matching rules.
    pub fn find_patient_by_name(&mut self, name: &str) -> StoreResult<Patient> {
        let found = match_by_name(&self.patients, name).cloned();
        self.refocus(found, || format!("patient named {:?}", name.trim()))
    }

    /// All patients whose name contains the query. Focus is unchanged.
    pub fn find_patients_by_name(&self, name: &str) -> Vec<&Patient> {
        all_name_matches(&self.patients, name)
    }

    /// Patients whose ID or name contains the query. A blank query matches
    /// everyone.
    pub fn search(&self, query: &str) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| matches_search(p, query))
            .collect()
    }

    /// Append a visit to the focused patient.
    ///
    /// `patient_id` must be the focused patient; the store does not resolve
    /// it on its own.
    pub fn record_visit(&mut self, patient_id: &str, vitals: Vitals) -> StoreResult<Visit> {
        let target = match self.focused.as_deref() {
            Some(focused) if focused == patient_id => focused.to_string(),
            Some(focused) => {
                return Err(StoreError::NotFound(format!(
                    "patient {} is not the focused record ({})",
                    patient_id, focused
                )))
            }
            None => return Err(StoreError::NotFound("no focused patient".into())),
        };
        if self.get(&target).is_none() {
            self.focused = None;
            return Err(StoreError::NotFound(format!("patient {}", target)));
        }

        let visit = Visit::new(vitals);
        let next = self
            .patients
            .iter()
            .map(|p| {
                let mut p = p.clone();
                if p.id == target {
                    p.visits.push(visit.clone());
                }
                p
            })
            .collect();
        self.commit(next)?;
        info!("recorded visit for patient {}", target);
        Ok(visit)
    }

    fn assign_id(&self, fields: &PatientFields) -> StoreResult<String> {
        match self.id_policy {
            IdPolicy::AutoIncrement => Ok(next_auto_id(&self.patients)),
            IdPolicy::Manual => {
                let id = fields
                    .id
                    .clone()
                    .ok_or_else(|| StoreError::Validation("id".into()))?;
                if self.get(&id).is_some() {
                    return Err(StoreError::DuplicateId(id));
                }
                Ok(id)
            }
        }
    }

    fn refocus(
        &mut self,
        found: Option<Patient>,
        describe: impl FnOnce() -> String,
    ) -> StoreResult<Patient> {
        self.focused = found.as_ref().map(|p| p.id.clone());
        match found {
            Some(patient) => {
                debug!("focused patient {}", patient.id);
                Ok(patient)
            }
            None => Err(StoreError::NotFound(describe())),
        }
    }

    fn commit(&mut self, next: Vec<Patient>) -> StoreResult<()> {
        self.db.save_patients(&next)?;
        self.patients = next;
        Ok(())
    }
}
