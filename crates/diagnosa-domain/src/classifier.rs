//! Naive Bayes classifier
//!
//! Scores every catalog disease against the observed symptoms using priors and
//! Laplace-smoothed likelihoods estimated from the case base, then normalizes
//! the scores into a posterior distribution and picks the most likely disease.

use crate::answer::{count_yes, Answer, Evidence};
use crate::diagnosis::{DiagnosisResult, RankedDisease};
use crate::symptom::SymptomSchema;
use crate::traits::CaseBase;
use crate::{Case, Disease, DiseaseCode};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Prior assigned to a catalog disease that has no cases (default: 1e-6)
pub const FALLBACK_PRIOR: f64 = 1e-6;

/// Errors that can occur during classification
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    /// Answer vector length does not match the symptom schema
    #[error("expected {expected} answers, got {actual}")]
    InputShape {
        /// Number of symptoms in the schema
        expected: usize,
        /// Number of answers supplied
        actual: usize,
    },

    /// A case does not carry one value per symptom
    #[error("case {case} has {actual} symptom values, expected {expected}")]
    CaseShape {
        /// Case ID, or its position when unsaved
        case: String,
        /// Number of symptoms in the schema
        expected: usize,
        /// Number of values in the case
        actual: usize,
    },

    /// The case base or catalog could not be read
    #[error("data access failed: {0}")]
    DataAccess(String),

    /// Classifier configuration is out of range
    #[error("invalid classifier configuration: {0}")]
    InvalidConfig(String),
}

/// Configuration for classification
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Prior for catalog diseases with zero cases, in [0, 1]
    pub fallback_prior: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            fallback_prior: FALLBACK_PRIOR,
        }
    }
}

impl ClassifierConfig {
    /// Check that every setting is usable
    pub fn validate(&self) -> Result<(), ClassificationError> {
        if !self.fallback_prior.is_finite() || !(0.0..=1.0).contains(&self.fallback_prior) {
            return Err(ClassificationError::InvalidConfig(format!(
                "fallback_prior must be in [0, 1], got {}",
                self.fallback_prior
            )));
        }
        Ok(())
    }
}

/// Per-disease sufficient statistics gathered from the case base
#[derive(Debug, Clone)]
struct DiseaseStats {
    /// Number of cases with this disease (n)
    cases: usize,
    /// For each symptom index, number of those cases with the symptom (k)
    present: Vec<usize>,
}

impl DiseaseStats {
    fn empty(symptoms: usize) -> Self {
        Self {
            cases: 0,
            present: vec![0; symptoms],
        }
    }
}

/// Naive Bayes classifier over a fixed symptom schema
///
/// Holds no mutable state; every call estimates its parameters from the
/// tables it is given.
#[derive(Debug, Clone)]
pub struct Classifier {
    schema: SymptomSchema,
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier for a schema
    pub fn new(schema: SymptomSchema, config: ClassifierConfig) -> Result<Self, ClassificationError> {
        config.validate()?;
        Ok(Self { schema, config })
    }

    /// Classifier for the standard 21-symptom questionnaire with default settings
    pub fn standard() -> Self {
        Self {
            schema: SymptomSchema::standard(),
            config: ClassifierConfig::default(),
        }
    }

    /// The symptom schema answers are validated against
    pub fn schema(&self) -> &SymptomSchema {
        &self.schema
    }

    /// Active configuration
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Reject answer vectors that do not have one entry per symptom
    pub fn check_answers(&self, answers: &[Answer]) -> Result<(), ClassificationError> {
        if answers.len() != self.schema.len() {
            return Err(ClassificationError::InputShape {
                expected: self.schema.len(),
                actual: answers.len(),
            });
        }
        Ok(())
    }

    /// Classify an answer vector against the case base and disease catalog
    ///
    /// Candidates are the catalog diseases in catalog order; a repeated code
    /// keeps its first entry. An empty catalog yields
    /// [`DiagnosisResult::undiagnosable`] rather than an error.
    pub fn classify(
        &self,
        answers: &[Answer],
        cases: &[Case],
        diseases: &[Disease],
    ) -> Result<DiagnosisResult, ClassificationError> {
        self.check_answers(answers)?;

        let symptoms_detected = count_yes(answers);
        let total_symptoms = answers.len();

        let candidates = unique_candidates(diseases);
        if candidates.is_empty() {
            return Ok(DiagnosisResult::undiagnosable(symptoms_detected, total_symptoms));
        }

        // Step 1: Evidence extraction
        let evidence = Evidence::from_answers(&self.schema, answers);

        // Steps 2-4: Priors, likelihoods and posterior scores
        let stats = self.gather_statistics(cases)?;
        let empty = DiseaseStats::empty(self.schema.len());
        let log_scores: Vec<f64> = candidates
            .iter()
            .map(|disease| {
                let disease_stats = stats.get(&disease.code).unwrap_or(&empty);
                self.log_score(&evidence, disease_stats, cases.len())
            })
            .collect();

        // Step 5: Normalization
        let probabilities = normalize_log_scores(&log_scores);

        // Step 6: Selection (first maximum in catalog order)
        let mut winner = 0;
        for (idx, p) in probabilities.iter().enumerate() {
            if *p > probabilities[winner] {
                winner = idx;
            }
        }

        // Step 7: Result assembly
        let mut ranking: Vec<RankedDisease> = candidates
            .iter()
            .zip(&probabilities)
            .map(|(disease, p)| RankedDisease {
                code: disease.code.clone(),
                name: disease.name.clone(),
                probability: *p,
            })
            .collect();
        // Stable sort keeps catalog order among ties
        ranking.sort_by(|a, b| b.probability.total_cmp(&a.probability));

        Ok(DiagnosisResult {
            disease: candidates[winner].code.clone(),
            disease_name: candidates[winner].name.clone(),
            confidence: probabilities[winner].clamp(0.0, 1.0),
            symptoms_detected,
            total_symptoms,
            ranking,
        })
    }

    /// Count cases and present symptoms per disease in one pass
    fn gather_statistics<'a>(
        &self,
        cases: &'a [Case],
    ) -> Result<HashMap<&'a DiseaseCode, DiseaseStats>, ClassificationError> {
        let symptoms = self.schema.len();
        let mut stats: HashMap<&DiseaseCode, DiseaseStats> = HashMap::new();

        for (idx, case) in cases.iter().enumerate() {
            if case.symptoms.len() != symptoms {
                return Err(ClassificationError::CaseShape {
                    case: case
                        .id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| format!("#{}", idx)),
                    expected: symptoms,
                    actual: case.symptoms.len(),
                });
            }

            let entry = stats
                .entry(&case.disease)
                .or_insert_with(|| DiseaseStats::empty(symptoms));
            entry.cases += 1;
            for (count, present) in entry.present.iter_mut().zip(&case.symptoms) {
                if *present {
                    *count += 1;
                }
            }
        }

        Ok(stats)
    }

    /// Log of prior times the likelihood of every observed symptom
    ///
    /// Unobserved symptoms contribute no factor.
    fn log_score(&self, evidence: &Evidence, stats: &DiseaseStats, total_cases: usize) -> f64 {
        let prior = prior(stats.cases, total_cases, self.config.fallback_prior);

        evidence.iter().fold(prior.ln(), |acc, (code, value)| {
            let k = stats.present[code.index()];
            acc + likelihood(stats.cases, k, value).ln()
        })
    }
}

/// Prior probability of a disease from its case count
///
/// Relative frequency among all cases; `fallback` when the disease has none.
pub fn prior(disease_cases: usize, total_cases: usize, fallback: f64) -> f64 {
    if disease_cases == 0 || total_cases == 0 {
        return fallback;
    }
    disease_cases as f64 / total_cases as f64
}

/// Laplace-smoothed probability of observing a symptom value
///
/// `n` cases of the disease, `k` of them with the symptom present:
/// P(present) = (k + 1) / (n + 2), P(absent) = (n - k + 1) / (n + 2).
pub fn likelihood(n: usize, k: usize, present: bool) -> f64 {
    let hits = if present { k } else { n.saturating_sub(k) };
    (hits as f64 + 1.0) / (n as f64 + 2.0)
}

/// Turn log scores into a probability distribution
///
/// Falls back to a uniform distribution when the scores sum to zero or
/// are not finite.
fn normalize_log_scores(log_scores: &[f64]) -> Vec<f64> {
    let uniform = || vec![1.0 / log_scores.len() as f64; log_scores.len()];

    let max = log_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return uniform();
    }

    let weights: Vec<f64> = log_scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = weights.iter().sum();
    if !(sum > 0.0 && sum.is_finite()) {
        return uniform();
    }

    weights.iter().map(|w| w / sum).collect()
}

/// Catalog entries with repeated codes removed, first occurrence kept
fn unique_candidates(diseases: &[Disease]) -> Vec<&Disease> {
    let mut seen = HashSet::new();
    diseases
        .iter()
        .filter(|d| seen.insert(&d.code))
        .collect()
}

/// Fetch a consistent snapshot from a case base and classify against it
///
/// The answer shape is checked before any data is read. A failed fetch is
/// reported as [`ClassificationError::DataAccess`]; nothing is computed on
/// partial data.
pub fn diagnose<S>(
    store: &S,
    classifier: &Classifier,
    answers: &[Answer],
) -> Result<DiagnosisResult, ClassificationError>
where
    S: CaseBase,
    S::Error: fmt::Display,
{
    classifier.check_answers(answers)?;

    let (diseases, cases) = store
        .snapshot()
        .map_err(|e| ClassificationError::DataAccess(e.to_string()))?;

    classifier.classify(answers, &cases, &diseases)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const SYMPTOMS: usize = 6;

    fn classifier() -> Classifier {
        let questions: Vec<String> = (1..=SYMPTOMS).map(|i| format!("q{}?", i)).collect();
        let schema = SymptomSchema::from_questions(questions).unwrap();
        Classifier::new(schema, ClassifierConfig::default()).unwrap()
    }

    fn answer_strategy() -> impl Strategy<Value = Answer> {
        prop_oneof![Just(Answer::Yes), Just(Answer::No), Just(Answer::Unknown)]
    }

    fn case_strategy() -> impl Strategy<Value = Case> {
        (0..4usize, prop::collection::vec(any::<bool>(), SYMPTOMS))
            .prop_map(|(d, symptoms)| Case::new(format!("P{:02}", d + 1), symptoms))
    }

    fn catalog_strategy() -> impl Strategy<Value = Vec<Disease>> {
        (1..=4usize).prop_map(|n| {
            (1..=n)
                .map(|i| Disease::new(format!("P{:02}", i), format!("Disease {}", i)))
                .collect()
        })
    }

    proptest! {
        /// Property: Normalized probabilities sum to one
        #[test]
        fn test_probabilities_sum_to_one(
            answers in prop::collection::vec(answer_strategy(), SYMPTOMS),
            cases in prop::collection::vec(case_strategy(), 0..20),
            diseases in catalog_strategy(),
        ) {
            let result = classifier().classify(&answers, &cases, &diseases).unwrap();
            let sum: f64 = result.ranking.iter().map(|r| r.probability).sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "sum was {}", sum);
        }

        /// Property: Confidence is always in [0, 1] and equals the top ranking
        #[test]
        fn test_confidence_range(
            answers in prop::collection::vec(answer_strategy(), SYMPTOMS),
            cases in prop::collection::vec(case_strategy(), 0..20),
            diseases in catalog_strategy(),
        ) {
            let result = classifier().classify(&answers, &cases, &diseases).unwrap();
            prop_assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
            prop_assert_eq!(result.confidence, result.ranking[0].probability);
            prop_assert_eq!(&result.disease, &result.ranking[0].code);
        }

        /// Property: Classification is a pure function of its inputs
        #[test]
        fn test_idempotent(
            answers in prop::collection::vec(answer_strategy(), SYMPTOMS),
            cases in prop::collection::vec(case_strategy(), 0..20),
            diseases in catalog_strategy(),
        ) {
            let classifier = classifier();
            let first = classifier.classify(&answers, &cases, &diseases).unwrap();
            let second = classifier.classify(&answers, &cases, &diseases).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Property: A disease without cases never beats one whose history matches the evidence
        #[test]
        fn test_history_beats_zero_cases(
            answers in prop::collection::vec(answer_strategy(), SYMPTOMS),
            copies in 1..10usize,
        ) {
            let matching: Vec<bool> = answers.iter().map(|a| *a == Answer::Yes).collect();
            let cases = vec![Case::new("P01", matching); copies];
            let diseases = vec![Disease::new("P02", "No history"), Disease::new("P01", "History")];

            let result = classifier().classify(&answers, &cases, &diseases).unwrap();
            prop_assert_eq!(result.disease.as_str(), "P01");
        }

        /// Property: Yes count and total are independent of the tables
        #[test]
        fn test_symptom_counts(
            answers in prop::collection::vec(answer_strategy(), SYMPTOMS),
            cases in prop::collection::vec(case_strategy(), 0..5),
        ) {
            let result = classifier().classify(&answers, &cases, &[]).unwrap();
            let yes = answers.iter().filter(|a| **a == Answer::Yes).count();
            prop_assert_eq!(result.symptoms_detected, yes);
            prop_assert_eq!(result.total_symptoms, SYMPTOMS);
        }
    }
}
