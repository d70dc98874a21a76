//! Case module - historical diagnosed records

use std::fmt;
use std::str::FromStr;

use crate::answer::Answer;
use crate::disease::DiseaseCode;

/// Sequential case identifier, displayed as `C001`, `C002`, ...
///
/// Widths grow past three digits rather than wrapping (`C999` -> `C1000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaseId(u32);

impl CaseId {
    /// First ID handed out in an empty case base
    pub const FIRST: CaseId = CaseId(1);

    /// Create a CaseId from its numeric part
    pub fn from_value(value: u32) -> Self {
        Self(value)
    }

    /// Numeric part of the ID
    pub fn value(&self) -> u32 {
        self.0
    }

    /// ID following this one
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{:03}", self.0)
    }
}

impl FromStr for CaseId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('C')
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|d| d.parse().ok())
            .map(Self)
            .ok_or_else(|| format!("Invalid case ID: {}", s))
    }
}

/// A historical labeled record
///
/// Immutable once stored. `symptoms[i]` is the value of the symptom at
/// 0-based index `i` of the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    /// Identifier, absent for cases that have not been stored yet
    pub id: Option<CaseId>,

    /// Diagnosed disease
    pub disease: DiseaseCode,

    /// One value per symptom, in schema order
    pub symptoms: Vec<bool>,
}

impl Case {
    /// Create an unsaved case
    pub fn new(disease: impl Into<DiseaseCode>, symptoms: Vec<bool>) -> Self {
        Self {
            id: None,
            disease: disease.into(),
            symptoms,
        }
    }

    /// Attach a stored identifier
    pub fn with_id(mut self, id: CaseId) -> Self {
        self.id = Some(id);
        self
    }

    /// Build the row recorded for a finished questionnaire
    ///
    /// The case base only holds 0/1 values, so `Unknown` is stored as absent.
    pub fn from_answers(disease: impl Into<DiseaseCode>, answers: &[Answer]) -> Self {
        let symptoms = answers.iter().map(|a| *a == Answer::Yes).collect();
        Self::new(disease, symptoms)
    }
}
