//! Disease catalog module

use std::fmt;

/// Unique catalog key of a disease (e.g. `P01`)
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiseaseCode(String);

impl DiseaseCode {
    /// Create a code from any string-like value
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Borrow the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiseaseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DiseaseCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for DiseaseCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// A catalog entry and candidate class for the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disease {
    /// Unique code
    pub code: DiseaseCode,
    /// Human-readable name
    pub name: String,
}

impl Disease {
    /// Create a new catalog entry
    pub fn new(code: impl Into<DiseaseCode>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Descriptive text shown alongside a diagnosis
///
/// Presentation-only; the classifier never reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiseaseDetails {
    /// Disease this entry describes
    pub code: DiseaseCode,
    /// Name as it appears in the details table
    pub name: String,
    /// General description
    pub description: String,
    /// Common symptoms, free text
    pub common_symptoms: String,
    /// General recommendations
    pub recommendations: String,
    /// Immediate self-care actions
    pub immediate_actions: String,
    /// When and how to seek medical consultation
    pub medical_consultation: String,
}
