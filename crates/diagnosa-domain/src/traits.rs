//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Case, CaseId, Disease, DiseaseCode, DiseaseDetails};

/// Trait for the case base and disease catalog
///
/// Implemented by the infrastructure layer (diagnosa-store)
pub trait CaseBase {
    /// Error type for store operations
    type Error;

    /// Fetch every stored case
    fn fetch_cases(&self) -> Result<Vec<Case>, Self::Error>;

    /// Fetch the disease catalog in its iteration order
    fn fetch_diseases(&self) -> Result<Vec<Disease>, Self::Error>;

    /// Fetch the catalog and the case base as one consistent view
    ///
    /// The default reads the two tables one after the other; stores that can
    /// do better (a read transaction, a cached copy) should override it.
    fn snapshot(&self) -> Result<(Vec<Disease>, Vec<Case>), Self::Error> {
        Ok((self.fetch_diseases()?, self.fetch_cases()?))
    }

    /// Query cases matching criteria
    fn query_cases(&self, query: &CaseQuery) -> Result<Vec<Case>, Self::Error>;

    /// Descriptive details for a disease, if any were recorded
    fn disease_details(&self, code: &DiseaseCode) -> Result<Option<DiseaseDetails>, Self::Error>;

    /// Store a new case and return its assigned ID
    fn record_case(&mut self, case: Case) -> Result<CaseId, Self::Error>;
}

/// Query criteria for retrieving cases
#[derive(Debug, Clone, Default)]
pub struct CaseQuery {
    /// Filter by diagnosed disease
    pub disease: Option<DiseaseCode>,

    /// Maximum results to return
    pub limit: Option<usize>,
}
