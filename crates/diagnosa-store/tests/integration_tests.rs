//! Integration tests for diagnosa-store
//!
//! These tests exercise the catalog, the case base and the classifier running
//! against a real SQLite database.

use diagnosa_domain::traits::{CaseBase, CaseQuery};
use diagnosa_domain::{
    diagnose, Answer, Case, CaseId, Classifier, ClassifierConfig, Disease, DiseaseCode,
    DiseaseDetails, SymptomSchema,
};
use diagnosa_store::{CaseRecord, DiseaseRecord, Seed, SqliteStore, StoreError, Table};

fn small_schema() -> SymptomSchema {
    SymptomSchema::from_questions(["nausea?", "bloating?", "heartburn?"]).unwrap()
}

fn small_store() -> SqliteStore {
    let mut store = SqliteStore::open(":memory:", small_schema()).unwrap();
    store.insert_disease(&Disease::new("P01", "GERD")).unwrap();
    store.insert_disease(&Disease::new("P02", "Gastritis")).unwrap();
    store
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
    assert_eq!(store.unwrap().schema().len(), 21);
}

#[test]
fn test_catalog_preserves_insertion_order() {
    let mut store = SqliteStore::open(":memory:", small_schema()).unwrap();
    store.insert_disease(&Disease::new("P03", "Peptic ulcer")).unwrap();
    store.insert_disease(&Disease::new("P01", "GERD")).unwrap();
    store.insert_disease(&Disease::new("P02", "Gastritis")).unwrap();

    let codes: Vec<String> = store
        .fetch_diseases()
        .unwrap()
        .into_iter()
        .map(|d| d.code.to_string())
        .collect();
    assert_eq!(codes, vec!["P03", "P01", "P02"]);
}

#[test]
fn test_duplicate_disease_rejected() {
    let mut store = small_store();
    let result = store.insert_disease(&Disease::new("P01", "Again"));
    assert!(matches!(result, Err(StoreError::Duplicate(_))));
}

#[test]
fn test_record_and_fetch_cases() {
    let mut store = small_store();

    let first = store
        .record_case(Case::new("P01", vec![true, false, true]))
        .unwrap();
    let second = store
        .record_case(Case::new("P02", vec![false, true, false]))
        .unwrap();

    assert_eq!(first.to_string(), "C001");
    assert_eq!(second.to_string(), "C002");

    let cases = store.fetch_cases().unwrap();
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0].id, Some(first));
    assert_eq!(cases[0].disease, DiseaseCode::new("P01"));
    assert_eq!(cases[0].symptoms, vec![true, false, true]);
    assert_eq!(cases[1].symptoms, vec![false, true, false]);
}

#[test]
fn test_record_case_from_answers_stores_unknown_as_zero() {
    let mut store = small_store();
    let case = Case::from_answers("P01", &[Answer::Yes, Answer::Unknown, Answer::No]);

    let id = store.record_case(case).unwrap();

    let cases = store.fetch_cases().unwrap();
    assert_eq!(cases[0].id, Some(id));
    assert_eq!(cases[0].symptoms, vec![true, false, false]);
}

#[test]
fn test_record_case_rejects_wrong_length() {
    let mut store = small_store();
    let result = store.record_case(Case::new("P01", vec![true; 21]));
    assert!(matches!(result, Err(StoreError::InvalidData(_))));
}

#[test]
fn test_record_case_rejects_unknown_disease() {
    let mut store = small_store();
    let result = store.record_case(Case::new("Unknown", vec![false; 3]));
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[test]
fn test_next_case_id_is_numeric() {
    let mut store = small_store();
    store
        .record_case(Case::new("P01", vec![true; 3]).with_id(CaseId::from_value(9)))
        .unwrap();
    assert_eq!(store.next_case_id().unwrap().to_string(), "C010");

    store
        .record_case(Case::new("P01", vec![true; 3]).with_id(CaseId::from_value(999)))
        .unwrap();
    let next = store.record_case(Case::new("P02", vec![false; 3])).unwrap();
    assert_eq!(next.to_string(), "C1000");
}

#[test]
fn test_duplicate_case_id_rejected() {
    let mut store = small_store();
    let id = CaseId::from_value(5);
    store
        .record_case(Case::new("P01", vec![true; 3]).with_id(id))
        .unwrap();

    let result = store.record_case(Case::new("P02", vec![false; 3]).with_id(id));
    assert!(matches!(result, Err(StoreError::Duplicate(_))));
}

#[test]
fn test_query_cases_by_disease() {
    let mut store = small_store();
    for _ in 0..3 {
        store.record_case(Case::new("P01", vec![true; 3])).unwrap();
    }
    store.record_case(Case::new("P02", vec![false; 3])).unwrap();

    let query = CaseQuery {
        disease: Some(DiseaseCode::new("P01")),
        limit: None,
    };
    assert_eq!(store.query_cases(&query).unwrap().len(), 3);

    let limited = CaseQuery {
        disease: None,
        limit: Some(2),
    };
    assert_eq!(store.query_cases(&limited).unwrap().len(), 2);
}

#[test]
fn test_disease_details() {
    let mut store = small_store();
    assert!(store
        .disease_details(&DiseaseCode::new("P01"))
        .unwrap()
        .is_none());

    store
        .upsert_details(&DiseaseDetails {
            code: DiseaseCode::new("P01"),
            name: "GERD".to_string(),
            description: "Stomach acid flows back into the oesophagus.".to_string(),
            ..Default::default()
        })
        .unwrap();

    let details = store
        .disease_details(&DiseaseCode::new("P01"))
        .unwrap()
        .unwrap();
    assert_eq!(details.name, "GERD");
    assert!(details.description.contains("oesophagus"));
    assert!(details.recommendations.is_empty());
}

#[test]
fn test_schema_mismatch_detected_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diagnosa.db");

    {
        let store = SqliteStore::open(&path, small_schema()).unwrap();
        drop(store);
    }

    let reopened = SqliteStore::open(&path, small_schema());
    assert!(reopened.is_ok(), "Same schema should reopen cleanly");

    let other = SymptomSchema::from_questions(["nausea?", "bloating?"]).unwrap();
    let mismatched = SqliteStore::open(&path, other);
    assert!(matches!(mismatched, Err(StoreError::SchemaMismatch(_))));
}

#[test]
fn test_cases_persist_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diagnosa.db");

    {
        let mut store = SqliteStore::open(&path, small_schema()).unwrap();
        store.insert_disease(&Disease::new("P01", "GERD")).unwrap();
        store.record_case(Case::new("P01", vec![true; 3])).unwrap();
    }

    let store = SqliteStore::open(&path, small_schema()).unwrap();
    assert_eq!(store.fetch_cases().unwrap().len(), 1);
    assert_eq!(store.next_case_id().unwrap().to_string(), "C002");
}

#[test]
fn test_import_seed() {
    let mut store = SqliteStore::open(":memory:", small_schema()).unwrap();
    let seed: Seed = serde_json::from_str(
        r#"{
            "diseases": [
                { "code": "P01", "name": "GERD", "details": { "description": "Reflux" } },
                { "code": "P02", "name": "Gastritis" }
            ],
            "cases": [
                { "id": "C001", "disease": "P01", "symptoms": [1, 1, 1] },
                { "disease": "P02", "symptoms": [0, 0, 0] }
            ]
        }"#,
    )
    .unwrap();

    let summary = store.import_seed(&seed).unwrap();
    assert_eq!(summary.diseases, 2);
    assert_eq!(summary.details, 1);
    assert_eq!(summary.cases, 2);

    let cases = store.fetch_cases().unwrap();
    assert_eq!(cases[1].id.map(|id| id.to_string()).as_deref(), Some("C002"));
}

#[test]
fn test_import_seed_is_atomic() {
    let mut store = SqliteStore::open(":memory:", small_schema()).unwrap();
    let seed = Seed {
        diseases: vec![DiseaseRecord {
            code: "P01".to_string(),
            name: "GERD".to_string(),
            details: None,
        }],
        cases: vec![
            CaseRecord {
                id: None,
                disease: "P01".to_string(),
                symptoms: vec![1, 0, 1],
            },
            CaseRecord {
                id: None,
                disease: "P01".to_string(),
                symptoms: vec![1, 0],
            },
        ],
    };

    assert!(store.import_seed(&seed).is_err());
    assert!(store.fetch_diseases().unwrap().is_empty());
    assert!(store.fetch_cases().unwrap().is_empty());
}

#[test]
fn test_row_counts() {
    let mut store = small_store();
    store.record_case(Case::new("P01", vec![true; 3])).unwrap();

    let counts = store.row_counts().unwrap();
    assert_eq!(
        counts,
        vec![(Table::Cases, 1), (Table::Diseases, 2), (Table::DiseaseDetails, 0)]
    );
}

#[test]
fn test_export_cases_uses_symptom_columns() {
    let mut store = small_store();
    store
        .record_case(Case::new("P02", vec![false, true, false]))
        .unwrap();

    let exported = store.export_table(Table::Cases).unwrap();
    let rows = exported.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "C001");
    assert_eq!(rows[0]["disease"], "P02");
    assert_eq!(rows[0]["G01"], 0);
    assert_eq!(rows[0]["G02"], 1);
}

#[test]
fn test_snapshot_matches_individual_fetches() {
    let mut store = small_store();
    store.record_case(Case::new("P01", vec![true; 3])).unwrap();

    let (diseases, cases) = store.snapshot().unwrap();
    assert_eq!(diseases, store.fetch_diseases().unwrap());
    assert_eq!(cases, store.fetch_cases().unwrap());
}

#[test]
fn test_diagnose_against_store() {
    let mut store = small_store();
    store.record_case(Case::new("P01", vec![true; 3])).unwrap();
    store.record_case(Case::new("P02", vec![false; 3])).unwrap();

    let classifier = Classifier::new(small_schema(), ClassifierConfig::default()).unwrap();
    let result = diagnose(&store, &classifier, &[Answer::Yes; 3]).unwrap();

    assert_eq!(result.disease.as_str(), "P01");
    assert_eq!(result.disease_name, "GERD");
    assert!(result.confidence > 0.5);
}

#[test]
fn test_diagnose_empty_catalog() {
    let store = SqliteStore::open(":memory:", small_schema()).unwrap();
    let classifier = Classifier::new(small_schema(), ClassifierConfig::default()).unwrap();

    let result = diagnose(&store, &classifier, &[Answer::Yes, Answer::No, Answer::Yes]).unwrap();
    assert!(!result.is_diagnosed());
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.symptoms_detected, 2);
}
