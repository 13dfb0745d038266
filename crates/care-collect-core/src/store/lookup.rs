//! Name and ID matching over the patient collection.

use crate::models::Patient;

/// Resolve a name to one patient.
///
/// Case-insensitive exact match wins; otherwise the first record (in
/// collection order) whose name contains the query.
pub fn match_by_name<'a>(patients: &'a [Patient], name: &str) -> Option<&'a Patient> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    patients
        .iter()
        .find(|p| p.name.trim().to_lowercase() == needle)
        .or_else(|| {
            patients
                .iter()
                .find(|p| p.name.to_lowercase().contains(&needle))
        })
}

/// Every patient whose name contains the query, in collection order.
pub fn all_name_matches<'a>(patients: &'a [Patient], name: &str) -> Vec<&'a Patient> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    patients
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}

/// True if the query appears in "<id> <name>", ignoring case.
pub fn matches_search(patient: &Patient, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    format!("{} {}", patient.id, patient.name)
        .to_lowercase()
        .contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Locality, PatientFields};

    fn patients(names: &[(&str, &str)]) -> Vec<Patient> {
        names
            .iter()
            .map(|(id, name)| {
                let fields = PatientFields::new(*name, "30", "F", Locality::barangay("B"));
                Patient::from_fields(id.to_string(), fields, Vec::new())
            })
            .collect()
    }

    #[test]
    fn test_exact_match_beats_earlier_substring() {
        let list = patients(&[("1", "Anna Marie"), ("2", "Ann"), ("3", "ann")]);
        let found = match_by_name(&list, "ANN").unwrap();
        assert_eq!(found.id, "2");
    }

    #[test]
    fn test_substring_fallback_takes_first() {
        let list = patients(&[("1", "Juan Dela Cruz"), ("2", "Juana Cruz")]);
        let found = match_by_name(&list, "cruz").unwrap();
        assert_eq!(found.id, "1");
    }

    #[test]
    fn test_blank_and_missing() {
        let list = patients(&[("1", "Juan")]);
        assert!(match_by_name(&list, "   ").is_none());
        assert!(match_by_name(&list, "Pedro").is_none());
    }

    #[test]
    fn test_all_name_matches() {
        let list = patients(&[("1", "Juan Dela Cruz"), ("2", "Maria"), ("3", "Juana Cruz")]);
        let ids: Vec<_> = all_name_matches(&list, "cruz").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(all_name_matches(&list, "").is_empty());
    }

    #[test]
    fn test_matches_search_id_and_name() {
        let list = patients(&[("12", "Maria Santos")]);
        assert!(matches_search(&list[0], "12"));
        assert!(matches_search(&list[0], "santos"));
        assert!(matches_search(&list[0], ""));
        assert!(!matches_search(&list[0], "reyes"));
    }
}
