//! Record store integration tests.

use care_collect_core::db::{decode_collection, encode_collection, Database, PATIENTS_SLOT};
use care_collect_core::models::{Condition, HealthHistory, Locality, PatientFields, Vitals};
use care_collect_core::store::{RecordStore, StoreError};

fn make_fields(name: &str, barangay: &str) -> PatientFields {
    PatientFields::new(name, "20", "M", Locality::barangay(barangay))
}

fn make_vitals(complaint: &str) -> Vitals {
    Vitals {
        bp: "120/80".to_string(),
        temp: "36.9".to_string(),
        pr: "78".to_string(),
        rr: "16".to_string(),
        oxygen: "99".to_string(),
        complaint: complaint.to_string(),
    }
}

#[test]
fn test_clinic_day_scenario() {
    let mut store = RecordStore::open(Database::open_in_memory().unwrap()).unwrap();

    let juan = store
        .upsert_patient(make_fields("Juan Dela Cruz", "Poblacion"), None)
        .unwrap();
    assert_eq!(juan.id, "1");

    let second = store
        .upsert_patient(make_fields("Maria Clara", "San Jose"), None)
        .unwrap();
    assert_eq!(second.id, "2");

    store.delete_patient("1").unwrap();
    let ids: Vec<_> = store.patients().iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec!["2"]);

    let third = store
        .upsert_patient(make_fields("Jose Rizal", "Calamba"), None)
        .unwrap();
    assert_eq!(third.id, "3");
}

#[test]
fn test_third_visit_goes_last() {
    let mut store = RecordStore::open(Database::open_in_memory().unwrap()).unwrap();
    let patient = store
        .upsert_patient(make_fields("Juan Dela Cruz", "Poblacion"), None)
        .unwrap();

    store.find_patient_by_name("juan dela cruz").unwrap();
    store.record_visit(&patient.id, make_vitals("fever")).unwrap();
    store.record_visit(&patient.id, make_vitals("cough")).unwrap();

    store.find_patient_by_id(&patient.id).unwrap();
    store.record_visit(&patient.id, make_vitals("follow-up")).unwrap();

    let visits = &store.get(&patient.id).unwrap().visits;
    let complaints: Vec<_> = visits.iter().map(|v| v.vitals.complaint.as_str()).collect();
    assert_eq!(complaints, vec!["fever", "cough", "follow-up"]);
}

#[test]
fn test_persisted_blob_matches_memory() {
    let mut store = RecordStore::open(Database::open_in_memory().unwrap()).unwrap();

    let mut fields = make_fields("Luz Villanueva", "Malabanan");
    fields.health_history = HealthHistory::new(
        [Condition::Diabetes, Condition::Hypertension],
        Some("knee surgery, 2019".to_string()),
    );
    let luz = store.upsert_patient(fields, None).unwrap();
    store.find_patient_by_id(&luz.id).unwrap();
    store.record_visit(&luz.id, make_vitals("dizziness")).unwrap();

    let blob = encode_collection(store.patients()).unwrap();
    let decoded = decode_collection(&blob).unwrap();
    assert_eq!(decoded.patients, store.patients());
}

#[test]
fn test_legacy_store_opens() {
    let db = Database::open_in_memory().unwrap();
    db.set_slot(
        PATIENTS_SLOT,
        r#"[
            {"id": "2021-0001", "name": "Ana Reyes", "age": "19", "sex": "F",
             "year": "1st Year", "program": "BSN", "contact": "", "height": "",
             "weight": "", "bmi": "", "healthHistory": "Asthma", "visits": []},
            {"id": "9", "name": "Ben Cruz", "age": "33", "sex": "M",
             "barangay": "Sabang", "healthHistory": "", "visits": []}
        ]"#,
    )
    .unwrap();

    let mut store = RecordStore::open(db).unwrap();
    assert_eq!(store.patients().len(), 2);
    assert_eq!(
        store.get("2021-0001").unwrap().locality,
        Locality::campus("BSN", "1st Year")
    );

    // "2021-0001" has numeric prefix 2021, so new IDs start above it.
    let next = store
        .upsert_patient(make_fields("Carla Diaz", "Sabang"), None)
        .unwrap();
    assert_eq!(next.id, "2022");
}

#[test]
fn test_failed_validation_writes_nothing() {
    let db = Database::open_in_memory().unwrap();
    let mut store = RecordStore::open(db).unwrap();

    let err = store
        .upsert_patient(make_fields("", "Poblacion"), None)
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(ref f) if f == "name"));
    assert!(store.patients().is_empty());
}
