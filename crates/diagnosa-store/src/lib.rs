//! Diagnosa Storage Layer
//!
//! Implements the CaseBase trait on top of SQLite.
//!
//! # Architecture
//!
//! - `diseases`: the catalog, iterated in insertion order
//! - `disease_details`: descriptive text shown with a diagnosis
//! - `cases`: one row per diagnosed case, one `0/1` column per symptom
//!
//! The symptom columns of `cases` are generated from the declared
//! [`SymptomSchema`] and checked against the existing table when the store is
//! opened.
//!
//! # Examples
//!
//! ```no_run
//! use diagnosa_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for case and catalog operations
//! ```

#![warn(missing_docs)]

pub mod seed;

use diagnosa_domain::traits::{CaseBase, CaseQuery};
use diagnosa_domain::{Case, CaseId, Disease, DiseaseCode, DiseaseDetails, SymptomSchema};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub use seed::{CaseRecord, DetailsRecord, DiseaseRecord, ImportSummary, Seed, Table};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Referenced record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A record with the same key already exists
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// The existing cases table was built for a different symptom schema
    #[error("Case table does not match the symptom schema: {0}")]
    SchemaMismatch(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// SQLite-based implementation of CaseBase
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
    schema: SymptomSchema,
}

impl SqliteStore {
    /// Open a store for the standard 21-symptom questionnaire
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use diagnosa_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("diagnosa.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::open(path, SymptomSchema::standard())
    }

    /// Open a store for an explicit symptom schema
    pub fn open<P: AsRef<Path>>(path: P, schema: SymptomSchema) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn, schema };
        store.initialize_schema()?;
        Ok(store)
    }

    /// The symptom schema the cases table follows
    pub fn schema(&self) -> &SymptomSchema {
        &self.schema
    }

    /// Initialize the database schema and validate the cases table
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        self.conn.execute_batch(&self.cases_table_sql())?;
        self.validate_case_columns()?;

        debug!(symptoms = self.schema.len(), "Store schema ready");
        Ok(())
    }

    /// DDL for the cases table, one constrained column per symptom
    fn cases_table_sql(&self) -> String {
        let columns: Vec<String> = self
            .schema
            .codes()
            .map(|code| format!("    {code} INTEGER NOT NULL CHECK ({code} IN (0, 1))"))
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS cases (\n    \
             id TEXT PRIMARY KEY NOT NULL,\n    \
             disease TEXT NOT NULL REFERENCES diseases(code),\n{}\n);",
            columns.join(",\n")
        )
    }

    /// Check that the existing cases table has exactly the declared columns
    fn validate_case_columns(&self) -> Result<(), StoreError> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(cases)")?;
        let found = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;

        let expected = self.case_columns();
        if found != expected {
            return Err(StoreError::SchemaMismatch(format!(
                "expected columns [{}], found [{}]",
                expected.join(", "),
                found.join(", ")
            )));
        }
        Ok(())
    }

    /// Column names of the cases table, in order
    fn case_columns(&self) -> Vec<String> {
        let mut columns = vec!["id".to_string(), "disease".to_string()];
        columns.extend(self.schema.codes().map(|c| c.to_string()));
        columns
    }

    fn symptom_column_list(&self) -> String {
        self.schema
            .codes()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn select_cases_sql(&self) -> String {
        format!("SELECT id, disease, {} FROM cases", self.symptom_column_list())
    }

    /// Map a `cases` row to a domain Case
    fn row_to_case(row: &Row<'_>, symptoms: usize) -> rusqlite::Result<Case> {
        let id_str: String = row.get(0)?;
        let id: CaseId = id_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(e)),
            )
        })?;
        let disease: String = row.get(1)?;

        let values = (0..symptoms)
            .map(|i| match row.get::<_, i64>(i + 2)? {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(rusqlite::Error::FromSqlConversionFailure(
                    i + 2,
                    rusqlite::types::Type::Integer,
                    Box::new(StoreError::InvalidData(format!(
                        "symptom value must be 0 or 1, got {}",
                        other
                    ))),
                )),
            })
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Case::new(disease, values).with_id(id))
    }

    fn load_cases(conn: &Connection, sql: &str, symptoms: usize) -> Result<Vec<Case>, StoreError> {
        let mut stmt = conn.prepare(sql)?;
        let cases = stmt
            .query_map([], |row| Self::row_to_case(row, symptoms))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cases)
    }

    fn load_diseases(conn: &Connection) -> Result<Vec<Disease>, StoreError> {
        let mut stmt = conn.prepare("SELECT code, name FROM diseases ORDER BY rowid")?;
        let diseases = stmt
            .query_map([], |row| {
                Ok(Disease::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(diseases)
    }

    /// Add a disease to the end of the catalog
    pub fn insert_disease(&mut self, disease: &Disease) -> Result<(), StoreError> {
        Self::insert_disease_on(&self.conn, disease)
    }

    pub(crate) fn insert_disease_on(conn: &Connection, disease: &Disease) -> Result<(), StoreError> {
        let exists = conn
            .query_row(
                "SELECT 1 FROM diseases WHERE code = ?1",
                params![disease.code.as_str()],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        if exists {
            return Err(StoreError::Duplicate(format!("disease {}", disease.code)));
        }

        conn.execute(
            "INSERT INTO diseases (code, name) VALUES (?1, ?2)",
            params![disease.code.as_str(), &disease.name],
        )?;
        Ok(())
    }

    /// Create or replace the descriptive details of a catalog disease
    pub fn upsert_details(&mut self, details: &DiseaseDetails) -> Result<(), StoreError> {
        Self::upsert_details_on(&self.conn, details)
    }

    pub(crate) fn upsert_details_on(conn: &Connection, details: &DiseaseDetails) -> Result<(), StoreError> {
        conn.execute(
            "INSERT INTO disease_details
                (code, name, description, common_symptoms, recommendations, immediate_actions, medical_consultation)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(code) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                common_symptoms = excluded.common_symptoms,
                recommendations = excluded.recommendations,
                immediate_actions = excluded.immediate_actions,
                medical_consultation = excluded.medical_consultation",
            params![
                details.code.as_str(),
                &details.name,
                &details.description,
                &details.common_symptoms,
                &details.recommendations,
                &details.immediate_actions,
                &details.medical_consultation,
            ],
        )?;
        Ok(())
    }

    /// ID that the next recorded case will receive
    ///
    /// One past the numeric maximum of the stored IDs, so `C999` is followed
    /// by `C1000` regardless of string ordering.
    pub fn next_case_id(&self) -> Result<CaseId, StoreError> {
        Self::next_case_id_on(&self.conn)
    }

    pub(crate) fn next_case_id_on(conn: &Connection) -> Result<CaseId, StoreError> {
        let mut stmt = conn.prepare("SELECT id FROM cases")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut max: Option<CaseId> = None;
        for id in ids {
            let id: CaseId = id.parse().map_err(StoreError::InvalidData)?;
            max = max.max(Some(id));
        }

        Ok(max.map(|id| id.next()).unwrap_or(CaseId::FIRST))
    }

    /// Insert a case, assigning the next sequential ID when it has none
    pub(crate) fn insert_case_on(
        conn: &Connection,
        schema: &SymptomSchema,
        case: Case,
    ) -> Result<CaseId, StoreError> {
        if case.symptoms.len() != schema.len() {
            return Err(StoreError::InvalidData(format!(
                "expected {} symptom values, got {}",
                schema.len(),
                case.symptoms.len()
            )));
        }

        let known = conn
            .query_row(
                "SELECT 1 FROM diseases WHERE code = ?1",
                params![case.disease.as_str()],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if !known {
            return Err(StoreError::NotFound(format!("disease {}", case.disease)));
        }

        let id = match case.id {
            Some(id) => id,
            None => Self::next_case_id_on(conn)?,
        };
        let id_str = id.to_string();

        let exists = conn
            .query_row("SELECT 1 FROM cases WHERE id = ?1", params![&id_str], |_| Ok(true))
            .optional()?
            .unwrap_or(false);
        if exists {
            return Err(StoreError::Duplicate(format!("case {}", id_str)));
        }

        let codes: Vec<String> = schema.codes().map(|c| c.to_string()).collect();
        let placeholders: Vec<String> = (1..=codes.len() + 2).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO cases (id, disease, {}) VALUES ({})",
            codes.join(", "),
            placeholders.join(", ")
        );

        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::with_capacity(codes.len() + 2);
        values.push(Box::new(id_str));
        values.push(Box::new(case.disease.as_str().to_string()));
        for present in &case.symptoms {
            values.push(Box::new(i64::from(*present)));
        }
        let value_refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();

        conn.execute(&sql, &value_refs[..])?;
        Ok(id)
    }

    /// Number of rows in a table
    pub fn row_count(&self, table: Table) -> Result<u64, StoreError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.as_str()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Row counts of every table, in [`Table::ALL`] order
    pub fn row_counts(&self) -> Result<Vec<(Table, u64)>, StoreError> {
        Table::ALL
            .iter()
            .map(|table| Ok((*table, self.row_count(*table)?)))
            .collect()
    }
}

impl CaseBase for SqliteStore {
    type Error = StoreError;

    fn fetch_cases(&self) -> Result<Vec<Case>, Self::Error> {
        let sql = format!("{} ORDER BY rowid", self.select_cases_sql());
        Self::load_cases(&self.conn, &sql, self.schema.len())
    }

    fn fetch_diseases(&self) -> Result<Vec<Disease>, Self::Error> {
        Self::load_diseases(&self.conn)
    }

    fn snapshot(&self) -> Result<(Vec<Disease>, Vec<Case>), Self::Error> {
        // Both reads share one read transaction
        let tx = self.conn.unchecked_transaction()?;
        let diseases = Self::load_diseases(&tx)?;
        let sql = format!("{} ORDER BY rowid", self.select_cases_sql());
        let cases = Self::load_cases(&tx, &sql, self.schema.len())?;
        tx.commit()?;

        debug!(diseases = diseases.len(), cases = cases.len(), "Loaded case base snapshot");
        Ok((diseases, cases))
    }

    fn query_cases(&self, query: &CaseQuery) -> Result<Vec<Case>, Self::Error> {
        let mut sql = format!("{} WHERE 1=1", self.select_cases_sql());
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(disease) = &query.disease {
            sql.push_str(" AND disease = ?");
            params.push(Box::new(disease.as_str().to_string()));
        }

        sql.push_str(" ORDER BY rowid");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let symptoms = self.schema.len();

        let cases = stmt
            .query_map(&param_refs[..], |row| Self::row_to_case(row, symptoms))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cases)
    }

    fn disease_details(&self, code: &DiseaseCode) -> Result<Option<DiseaseDetails>, Self::Error> {
        let details = self
            .conn
            .query_row(
                "SELECT code, name, description, common_symptoms, recommendations, immediate_actions, medical_consultation
                 FROM disease_details WHERE code = ?1",
                params![code.as_str()],
                |row| {
                    Ok(DiseaseDetails {
                        code: DiseaseCode::new(row.get::<_, String>(0)?),
                        name: row.get(1)?,
                        description: row.get(2)?,
                        common_symptoms: row.get(3)?,
                        recommendations: row.get(4)?,
                        immediate_actions: row.get(5)?,
                        medical_consultation: row.get(6)?,
                    })
                },
            )
            .optional()?;

        Ok(details)
    }

    fn record_case(&mut self, case: Case) -> Result<CaseId, Self::Error> {
        let disease = case.disease.clone();
        let id = Self::insert_case_on(&self.conn, &self.schema, case)?;
        info!(case = %id, disease = %disease, "Recorded case");
        Ok(id)
    }
}
