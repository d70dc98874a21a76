//! Diagnosa Domain Layer
//!
//! This crate contains the data model and the Naive Bayes classification
//! engine for Diagnosa. It performs no I/O: storage and presentation live in
//! other crates and reach the domain through the traits in [`traits`].
//!
//! ## Key Concepts
//!
//! - **Symptom schema**: the fixed, ordered questionnaire (`G01..GN`)
//! - **Answer**: `Yes`, `No` or `Unknown` for each symptom
//! - **Case**: a historical diagnosed record with a full symptom vector
//! - **Disease**: a catalog entry and candidate class
//! - **Classifier**: prior and Laplace-smoothed likelihood estimation over the
//!   case base, producing a ranked [`DiagnosisResult`]
//!
//! ## Architecture
//!
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod answer;
pub mod case;
pub mod classifier;
pub mod diagnosis;
pub mod disease;
pub mod symptom;
pub mod traits;

// Re-exports for convenience
pub use answer::{Answer, Evidence};
pub use case::{Case, CaseId};
pub use classifier::{diagnose, ClassificationError, Classifier, ClassifierConfig};
pub use diagnosis::{DiagnosisResult, RankedDisease};
pub use disease::{Disease, DiseaseCode, DiseaseDetails};
pub use symptom::{SchemaError, Symptom, SymptomCode, SymptomSchema};
