//! Symptom schema module
//!
//! The questionnaire is a fixed, ordered list of yes/no questions. Each
//! question is keyed by a code derived from its 1-based position (`G01`,
//! `G02`, ...). The schema is declared once and validated at construction,
//! so neither the classifier nor the store ever has to infer symptom columns.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Questions of the reference deployment (gastric complaints), in order.
const STANDARD_QUESTIONS: [&str; 21] = [
    "Do you have nausea and vomiting?",
    "Have you lost your appetite?",
    "Do you have difficulty swallowing food?",
    "Do you have pain in your breastbone?",
    "Do you have back pain?",
    "Do you taste bitterness on your tongue?",
    "Do you feel full quickly?",
    "Is your stomach bloated?",
    "Does your stomach feel painful or cramped?",
    "Are your stools black and tarry?",
    "Do you have digestive problems?",
    "Have you vomited blood?",
    "Do you burp often?",
    "Have you lost weight for no apparent reason?",
    "Have you been told you are anaemic (low red blood cells)?",
    "Do you have cold sweats?",
    "Do you feel weak?",
    "Does your stomach feel full?",
    "Do you feel uncomfortable after eating?",
    "Do you feel a stinging pain in your upper abdomen?",
    "Does fluid come up from your stomach?",
];

/// Errors raised while declaring a symptom schema or parsing a code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema has no symptoms
    #[error("symptom schema must declare at least one symptom")]
    Empty,

    /// A code does not follow the `G<index>` convention
    #[error("invalid symptom code: {0}")]
    InvalidCode(String),

    /// A declared code does not match its position in the schema
    #[error("symptom at position {position} has code {found}, expected {expected}")]
    OutOfOrder {
        /// 1-based position in the schema
        position: usize,
        /// Code that was declared
        found: SymptomCode,
        /// Code implied by the position
        expected: SymptomCode,
    },
}

/// Stable identifier of one questionnaire item (`G01..GN`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymptomCode(u16);

impl SymptomCode {
    /// Code for the symptom at the given 1-based position
    ///
    /// # Examples
    ///
    /// ```
    /// use diagnosa_domain::SymptomCode;
    ///
    /// let code = SymptomCode::from_position(3).unwrap();
    /// assert_eq!(code.to_string(), "G03");
    /// ```
    pub fn from_position(position: usize) -> Result<Self, SchemaError> {
        match u16::try_from(position) {
            Ok(p) if p > 0 => Ok(Self(p)),
            _ => Err(SchemaError::InvalidCode(format!("G{:02}", position))),
        }
    }

    /// 1-based position of this symptom in the questionnaire
    pub fn position(&self) -> usize {
        self.0 as usize
    }

    /// 0-based index into an answer or case vector
    pub fn index(&self) -> usize {
        self.position() - 1
    }
}

impl fmt::Display for SymptomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{:02}", self.0)
    }
}

impl FromStr for SymptomCode {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('G')
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| SchemaError::InvalidCode(s.to_string()))?;

        let position: usize = digits
            .parse()
            .map_err(|_| SchemaError::InvalidCode(s.to_string()))?;

        Self::from_position(position).map_err(|_| SchemaError::InvalidCode(s.to_string()))
    }
}

/// One questionnaire item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symptom {
    /// Stable code
    pub code: SymptomCode,
    /// Question shown to the patient
    pub question: String,
}

/// Ordered, validated list of symptoms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomSchema {
    symptoms: Vec<Symptom>,
}

impl SymptomSchema {
    /// Declare a schema from explicit symptoms
    ///
    /// Codes must run `G01..GN` in order.
    pub fn new(symptoms: Vec<Symptom>) -> Result<Self, SchemaError> {
        if symptoms.is_empty() {
            return Err(SchemaError::Empty);
        }

        for (idx, symptom) in symptoms.iter().enumerate() {
            let expected = SymptomCode::from_position(idx + 1)?;
            if symptom.code != expected {
                return Err(SchemaError::OutOfOrder {
                    position: idx + 1,
                    found: symptom.code,
                    expected,
                });
            }
        }

        Ok(Self { symptoms })
    }

    /// Build a schema from question texts, assigning codes by position
    pub fn from_questions<I, S>(questions: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symptoms = questions
            .into_iter()
            .enumerate()
            .map(|(idx, question)| {
                Ok(Symptom {
                    code: SymptomCode::from_position(idx + 1)?,
                    question: question.into(),
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        Self::new(symptoms)
    }

    /// The 21-question schema of the reference deployment
    pub fn standard() -> Self {
        let symptoms = STANDARD_QUESTIONS
            .iter()
            .enumerate()
            .map(|(idx, question)| Symptom {
                code: SymptomCode(idx as u16 + 1),
                question: (*question).to_string(),
            })
            .collect();

        Self { symptoms }
    }

    /// Number of symptoms (N)
    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    /// Always false for a validated schema
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    /// Symptom at a 0-based index
    pub fn get(&self, index: usize) -> Option<&Symptom> {
        self.symptoms.get(index)
    }

    /// Iterate symptoms in questionnaire order
    pub fn iter(&self) -> impl Iterator<Item = &Symptom> {
        self.symptoms.iter()
    }

    /// Iterate codes in questionnaire order
    pub fn codes(&self) -> impl Iterator<Item = SymptomCode> + '_ {
        self.symptoms.iter().map(|s| s.code)
    }
}

impl Default for SymptomSchema {
    fn default() -> Self {
        Self::standard()
    }
}
