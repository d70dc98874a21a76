//! Seed import and table export
//!
//! Seed files are JSON documents holding a disease catalog (with optional
//! details) and a case base. Exports produce one JSON record per row, keyed
//! by column name.

use crate::{SqliteStore, StoreError};
use diagnosa_domain::traits::CaseBase;
use diagnosa_domain::{Case, CaseId, Disease, DiseaseCode, DiseaseDetails};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

/// Tables managed by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Historical diagnosed cases
    Cases,
    /// Disease catalog
    Diseases,
    /// Descriptive disease details
    DiseaseDetails,
}

impl Table {
    /// Every table, in display order
    pub const ALL: [Table; 3] = [Table::Cases, Table::Diseases, Table::DiseaseDetails];

    /// SQL table name
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Cases => "cases",
            Table::Diseases => "diseases",
            Table::DiseaseDetails => "disease_details",
        }
    }

    /// Parse a table name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "cases" | "case_base" => Some(Table::Cases),
            "diseases" | "catalog" => Some(Table::Diseases),
            "disease_details" | "details" => Some(Table::DiseaseDetails),
            _ => None,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contents of a seed file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    /// Catalog entries, imported in order
    #[serde(default)]
    pub diseases: Vec<DiseaseRecord>,

    /// Cases, imported after the catalog
    #[serde(default)]
    pub cases: Vec<CaseRecord>,
}

/// Catalog entry in a seed file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseRecord {
    /// Disease code (e.g. `P01`)
    pub code: String,
    /// Display name
    pub name: String,
    /// Optional descriptive details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<DetailsRecord>,
}

/// Descriptive details in a seed file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailsRecord {
    /// General description
    #[serde(default)]
    pub description: String,
    /// Common symptoms
    #[serde(default)]
    pub common_symptoms: String,
    /// Recommendations
    #[serde(default)]
    pub recommendations: String,
    /// Immediate actions
    #[serde(default)]
    pub immediate_actions: String,
    /// Medical consultation advice
    #[serde(default)]
    pub medical_consultation: String,
}

/// Case in a seed file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Case ID (`C001`); assigned sequentially when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Diagnosed disease code
    pub disease: String,
    /// One `0`/`1` value per symptom, in schema order
    pub symptoms: Vec<u8>,
}

impl CaseRecord {
    fn to_case(&self) -> Result<Case, StoreError> {
        let symptoms = self
            .symptoms
            .iter()
            .map(|v| match v {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(StoreError::InvalidData(format!(
                    "symptom value must be 0 or 1, got {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut case = Case::new(self.disease.as_str(), symptoms);
        if let Some(id) = &self.id {
            let id: CaseId = id.parse().map_err(StoreError::InvalidData)?;
            case = case.with_id(id);
        }
        Ok(case)
    }
}

/// What an import added
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Catalog entries added
    pub diseases: usize,
    /// Details rows written
    pub details: usize,
    /// Cases added
    pub cases: usize,
}

impl Seed {
    /// Read a seed file from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl SqliteStore {
    /// Import a seed inside one transaction
    ///
    /// Nothing is written when any record is rejected.
    pub fn import_seed(&mut self, seed: &Seed) -> Result<ImportSummary, StoreError> {
        let tx = self.conn.transaction()?;
        let mut summary = ImportSummary::default();

        for record in &seed.diseases {
            let disease = Disease::new(record.code.as_str(), record.name.as_str());
            Self::insert_disease_on(&tx, &disease)?;
            summary.diseases += 1;

            if let Some(details) = &record.details {
                Self::upsert_details_on(
                    &tx,
                    &DiseaseDetails {
                        code: DiseaseCode::new(record.code.as_str()),
                        name: record.name.clone(),
                        description: details.description.clone(),
                        common_symptoms: details.common_symptoms.clone(),
                        recommendations: details.recommendations.clone(),
                        immediate_actions: details.immediate_actions.clone(),
                        medical_consultation: details.medical_consultation.clone(),
                    },
                )?;
                summary.details += 1;
            }
        }

        for (idx, record) in seed.cases.iter().enumerate() {
            let case = record.to_case().map_err(|e| match e {
                StoreError::InvalidData(msg) => StoreError::InvalidData(format!("case #{}: {}", idx, msg)),
                other => other,
            })?;
            Self::insert_case_on(&tx, &self.schema, case)?;
            summary.cases += 1;
        }

        tx.commit()?;

        info!(
            diseases = summary.diseases,
            details = summary.details,
            cases = summary.cases,
            "Imported seed"
        );
        Ok(summary)
    }

    /// Dump a table as JSON records keyed by column name
    pub fn export_table(&self, table: Table) -> Result<Value, StoreError> {
        let records: Vec<Value> = match table {
            Table::Cases => self
                .fetch_cases()?
                .iter()
                .map(|case| self.case_to_json(case))
                .collect(),
            Table::Diseases => self
                .fetch_diseases()?
                .iter()
                .map(|d| json!({ "code": d.code.as_str(), "name": d.name }))
                .collect(),
            Table::DiseaseDetails => self
                .fetch_diseases()?
                .iter()
                .filter_map(|d| self.disease_details(&d.code).transpose())
                .map(|details| {
                    details.map(|d| {
                        json!({
                            "code": d.code.as_str(),
                            "name": d.name,
                            "description": d.description,
                            "common_symptoms": d.common_symptoms,
                            "recommendations": d.recommendations,
                            "immediate_actions": d.immediate_actions,
                            "medical_consultation": d.medical_consultation,
                        })
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(Value::Array(records))
    }

    fn case_to_json(&self, case: &Case) -> Value {
        let mut record = Map::new();
        record.insert(
            "id".to_string(),
            case.id.map(|id| Value::from(id.to_string())).unwrap_or(Value::Null),
        );
        record.insert("disease".to_string(), Value::from(case.disease.as_str()));
        for (code, present) in self.schema.codes().zip(&case.symptoms) {
            record.insert(code.to_string(), Value::from(u8::from(*present)));
        }
        Value::Object(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_parsing() {
        assert_eq!(Table::parse("cases"), Some(Table::Cases));
        assert_eq!(Table::parse("Diseases"), Some(Table::Diseases));
        assert_eq!(Table::parse("disease-details"), Some(Table::DiseaseDetails));
        assert_eq!(Table::parse("patients"), None);
    }

    #[test]
    fn test_seed_parsing() {
        let json = r#"{
            "diseases": [
                { "code": "P01", "name": "GERD", "details": { "description": "Acid reflux" } },
                { "code": "P02", "name": "Gastritis" }
            ],
            "cases": [
                { "id": "C001", "disease": "P01", "symptoms": [1, 0, 1] },
                { "disease": "P02", "symptoms": [0, 0, 1] }
            ]
        }"#;

        let seed: Seed = serde_json::from_str(json).unwrap();
        assert_eq!(seed.diseases.len(), 2);
        assert_eq!(
            seed.diseases[0].details.as_ref().map(|d| d.description.as_str()),
            Some("Acid reflux")
        );
        assert!(seed.diseases[1].details.is_none());
        assert_eq!(seed.cases[0].id.as_deref(), Some("C001"));
        assert!(seed.cases[1].id.is_none());
    }

    #[test]
    fn test_case_record_rejects_non_binary_values() {
        let record = CaseRecord {
            id: None,
            disease: "P01".to_string(),
            symptoms: vec![0, 2],
        };
        assert!(matches!(record.to_case(), Err(StoreError::InvalidData(_))));
    }
}
