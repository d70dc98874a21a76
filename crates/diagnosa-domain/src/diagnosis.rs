//! Diagnosis result module

use crate::disease::DiseaseCode;

/// Disease code reported when no candidate disease exists
pub const UNDIAGNOSABLE_CODE: &str = "Unknown";

/// Display name reported when no candidate disease exists
pub const UNDIAGNOSABLE_NAME: &str = "Cannot be diagnosed";

/// One candidate with its normalized posterior probability
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDisease {
    /// Candidate disease
    pub code: DiseaseCode,
    /// Display name from the catalog
    pub name: String,
    /// Normalized posterior probability in [0, 1]
    pub probability: f64,
}

/// Output of one classification call
///
/// Created once per call and never persisted by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisResult {
    /// Selected disease, or [`UNDIAGNOSABLE_CODE`]
    pub disease: DiseaseCode,

    /// Display name of the selected disease
    pub disease_name: String,

    /// Normalized posterior of the selected disease, in [0, 1]
    pub confidence: f64,

    /// Number of `Yes` answers
    pub symptoms_detected: usize,

    /// Total number of answers
    pub total_symptoms: usize,

    /// Every candidate, highest probability first; ties keep catalog order
    pub ranking: Vec<RankedDisease>,
}

impl DiagnosisResult {
    /// The "cannot diagnose" sentinel, with symptom counts still populated
    pub fn undiagnosable(symptoms_detected: usize, total_symptoms: usize) -> Self {
        Self {
            disease: DiseaseCode::new(UNDIAGNOSABLE_CODE),
            disease_name: UNDIAGNOSABLE_NAME.to_string(),
            confidence: 0.0,
            symptoms_detected,
            total_symptoms,
            ranking: Vec::new(),
        }
    }

    /// False for the sentinel result
    pub fn is_diagnosed(&self) -> bool {
        !self.ranking.is_empty()
    }

    /// Confidence as a percentage
    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }
}
