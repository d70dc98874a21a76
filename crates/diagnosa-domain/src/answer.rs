//! Answer module - one response per questionnaire item

use crate::symptom::{SymptomCode, SymptomSchema};

/// Response to a single symptom question
///
/// `Unknown` excludes the symptom from the likelihood product. It is never
/// treated as `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Answer {
    /// Symptom is present
    Yes,

    /// Symptom is absent
    No,

    /// Patient skipped the question or does not know
    Unknown,
}

impl Answer {
    /// Get the answer name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
            Answer::Unknown => "unknown",
        }
    }

    /// Parse an answer; accepts short forms and the Indonesian `ya`/`tidak`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "y" | "yes" | "ya" | "1" | "true" => Some(Answer::Yes),
            "n" | "no" | "tidak" | "0" | "false" => Some(Answer::No),
            "u" | "s" | "?" | "unknown" | "skip" | "tidak diketahui" => Some(Answer::Unknown),
            _ => None,
        }
    }

    /// Observed value for the likelihood product, `None` when excluded
    pub fn observed(&self) -> Option<bool> {
        match self {
            Answer::Yes => Some(true),
            Answer::No => Some(false),
            Answer::Unknown => None,
        }
    }
}

/// Observed symptom values extracted from an answer vector
///
/// Only `Yes`/`No` answers appear; `Unknown` symptoms are omitted entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evidence {
    observations: Vec<(SymptomCode, bool)>,
}

impl Evidence {
    /// Extract evidence from answers given in schema order
    ///
    /// Answers beyond the schema length are ignored; callers check the shape
    /// before extracting.
    pub fn from_answers(schema: &SymptomSchema, answers: &[Answer]) -> Self {
        let observations = schema
            .codes()
            .zip(answers)
            .filter_map(|(code, answer)| answer.observed().map(|value| (code, value)))
            .collect();

        Self { observations }
    }

    /// Observed value for a symptom, if it was answered
    pub fn get(&self, code: SymptomCode) -> Option<bool> {
        self.observations
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, value)| *value)
    }

    /// Iterate `(code, value)` pairs in questionnaire order
    pub fn iter(&self) -> impl Iterator<Item = (SymptomCode, bool)> + '_ {
        self.observations.iter().copied()
    }

    /// Number of observed symptoms
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True when every answer was `Unknown`
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Count of `Yes` answers
pub fn count_yes(answers: &[Answer]) -> usize {
    answers.iter().filter(|a| **a == Answer::Yes).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_parsing() {
        assert_eq!(Answer::parse("Y"), Some(Answer::Yes));
        assert_eq!(Answer::parse("Ya"), Some(Answer::Yes));
        assert_eq!(Answer::parse("tidak"), Some(Answer::No));
        assert_eq!(Answer::parse(" no "), Some(Answer::No));
        assert_eq!(Answer::parse("?"), Some(Answer::Unknown));
        assert_eq!(Answer::parse("Tidak Diketahui"), Some(Answer::Unknown));
        assert_eq!(Answer::parse("maybe"), None);
    }

    #[test]
    fn test_evidence_skips_unknown() {
        let schema = SymptomSchema::from_questions(["a?", "b?", "c?"]).unwrap();
        let evidence =
            Evidence::from_answers(&schema, &[Answer::Yes, Answer::Unknown, Answer::No]);

        assert_eq!(evidence.len(), 2);
        assert_eq!(evidence.get("G01".parse().unwrap()), Some(true));
        assert_eq!(evidence.get("G02".parse().unwrap()), None);
        assert_eq!(evidence.get("G03".parse().unwrap()), Some(false));
    }

    #[test]
    fn test_all_unknown_is_empty() {
        let schema = SymptomSchema::from_questions(["a?", "b?"]).unwrap();
        let evidence = Evidence::from_answers(&schema, &[Answer::Unknown, Answer::Unknown]);
        assert!(evidence.is_empty());
    }

    #[test]
    fn test_count_yes() {
        assert_eq!(count_yes(&[Answer::Yes, Answer::No, Answer::Yes, Answer::Unknown]), 2);
        assert_eq!(count_yes(&[]), 0);
    }
}
