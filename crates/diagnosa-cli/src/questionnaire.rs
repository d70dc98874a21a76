//! Questionnaire state machine driven by the interactive wizard.
//!
//! The questionnaire walks the symptom schema one question at a time:
//! `Asking(0) .. Asking(N-1) -> AllAnswered -> Complete`. Going back from
//! `Asking(i)` returns to `Asking(i-1)`; `review` leaves a completed result
//! and returns to `AllAnswered`; `reset` clears every answer.

use diagnosa_domain::{Answer, CaseId, DiagnosisResult, Symptom, SymptomSchema};
use std::fmt;
use thiserror::Error;

/// Where the questionnaire currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionnaireState {
    /// Waiting for the answer to the question at this index
    Asking(usize),
    /// Every question answered, ready to analyze
    AllAnswered,
    /// A diagnosis has been computed
    Complete,
}

impl fmt::Display for QuestionnaireState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionnaireState::Asking(i) => write!(f, "asking question {}", i + 1),
            QuestionnaireState::AllAnswered => f.write_str("all answered"),
            QuestionnaireState::Complete => f.write_str("complete"),
        }
    }
}

/// Errors raised by an out-of-order questionnaire action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionnaireError {
    /// Action not allowed in the current state
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        /// Attempted action
        action: &'static str,
        /// State at the time
        state: QuestionnaireState,
    },

    /// `back` on the first question
    #[error("already at the first question")]
    NoPreviousQuestion,

    /// The result was already recorded as a case
    #[error("result already saved as case {0}")]
    AlreadySaved(CaseId),

    /// Answers requested before every question was answered
    #[error("{answered} of {total} questions answered")]
    Incomplete {
        /// Questions answered so far
        answered: usize,
        /// Questions in the schema
        total: usize,
    },
}

/// Answer tallies for the summary view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerSummary {
    /// Questions in the schema
    pub total: usize,
    /// Questions answered so far
    pub answered: usize,
    /// `Yes` answers
    pub yes: usize,
    /// `No` answers
    pub no: usize,
    /// Skipped questions
    pub unknown: usize,
}

/// One pass through the symptom questionnaire.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    schema: SymptomSchema,
    answers: Vec<Option<Answer>>,
    state: QuestionnaireState,
    result: Option<DiagnosisResult>,
    saved: Option<CaseId>,
}

impl Questionnaire {
    /// Start at the first question.
    pub fn new(schema: SymptomSchema) -> Self {
        let answers = vec![None; schema.len()];
        Self {
            schema,
            answers,
            state: QuestionnaireState::Asking(0),
            result: None,
            saved: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> QuestionnaireState {
        self.state
    }

    /// Schema being asked.
    pub fn schema(&self) -> &SymptomSchema {
        &self.schema
    }

    /// The question waiting for an answer, if any.
    pub fn current_question(&self) -> Option<&Symptom> {
        match self.state {
            QuestionnaireState::Asking(i) => self.schema.get(i),
            _ => None,
        }
    }

    /// Answer previously given at `index`.
    pub fn answer_at(&self, index: usize) -> Option<Answer> {
        self.answers.get(index).copied().flatten()
    }

    /// Answer the current question and move on.
    pub fn answer(&mut self, answer: Answer) -> Result<QuestionnaireState, QuestionnaireError> {
        let QuestionnaireState::Asking(i) = self.state else {
            return Err(self.invalid("answer"));
        };

        self.answers[i] = Some(answer);
        self.state = if i + 1 < self.answers.len() {
            QuestionnaireState::Asking(i + 1)
        } else {
            QuestionnaireState::AllAnswered
        };
        Ok(self.state)
    }

    /// Return to the previous question.
    pub fn back(&mut self) -> Result<QuestionnaireState, QuestionnaireError> {
        self.state = match self.state {
            QuestionnaireState::Asking(0) => return Err(QuestionnaireError::NoPreviousQuestion),
            QuestionnaireState::Asking(i) => QuestionnaireState::Asking(i - 1),
            QuestionnaireState::AllAnswered => QuestionnaireState::Asking(self.answers.len() - 1),
            QuestionnaireState::Complete => return Err(self.invalid("go back")),
        };
        Ok(self.state)
    }

    /// Every answer in schema order.
    pub fn answers(&self) -> Result<Vec<Answer>, QuestionnaireError> {
        self.answers
            .iter()
            .copied()
            .collect::<Option<Vec<_>>>()
            .ok_or(QuestionnaireError::Incomplete {
                answered: self.answered(),
                total: self.answers.len(),
            })
    }

    /// Attach the diagnosis computed from the answers.
    pub fn complete(&mut self, result: DiagnosisResult) -> Result<(), QuestionnaireError> {
        if self.state != QuestionnaireState::AllAnswered {
            return Err(self.invalid("analyze"));
        }
        self.result = Some(result);
        self.state = QuestionnaireState::Complete;
        Ok(())
    }

    /// Diagnosis of a completed questionnaire.
    pub fn result(&self) -> Option<&DiagnosisResult> {
        match self.state {
            QuestionnaireState::Complete => self.result.as_ref(),
            _ => None,
        }
    }

    /// Case the current result was recorded as, if any.
    pub fn saved(&self) -> Option<CaseId> {
        self.saved
    }

    /// Remember that the current result was recorded.
    ///
    /// A result is recorded at most once; `review` or `reset` allow a new one.
    pub fn mark_saved(&mut self, id: CaseId) -> Result<(), QuestionnaireError> {
        if self.state != QuestionnaireState::Complete {
            return Err(self.invalid("save"));
        }
        if let Some(existing) = self.saved {
            return Err(QuestionnaireError::AlreadySaved(existing));
        }
        self.saved = Some(id);
        Ok(())
    }

    /// Leave the result and return to the answered questionnaire.
    pub fn review(&mut self) -> Result<QuestionnaireState, QuestionnaireError> {
        if self.state != QuestionnaireState::Complete {
            return Err(self.invalid("review"));
        }
        self.result = None;
        self.saved = None;
        self.state = QuestionnaireState::AllAnswered;
        Ok(self.state)
    }

    /// Clear every answer and start over.
    pub fn reset(&mut self) {
        self.answers.iter_mut().for_each(|a| *a = None);
        self.result = None;
        self.saved = None;
        self.state = QuestionnaireState::Asking(0);
    }

    /// Answer tallies so far.
    pub fn summary(&self) -> AnswerSummary {
        let mut summary = AnswerSummary {
            total: self.answers.len(),
            ..Default::default()
        };
        for answer in self.answers.iter().flatten() {
            summary.answered += 1;
            match answer {
                Answer::Yes => summary.yes += 1,
                Answer::No => summary.no += 1,
                Answer::Unknown => summary.unknown += 1,
            }
        }
        summary
    }

    /// Fraction of questions answered, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.answers.is_empty() {
            return 1.0;
        }
        self.answered() as f64 / self.answers.len() as f64
    }

    fn answered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    fn invalid(&self, action: &'static str) -> QuestionnaireError {
        QuestionnaireError::InvalidTransition {
            action,
            state: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_questions() -> Questionnaire {
        let schema = SymptomSchema::from_questions(["a?", "b?", "c?"]).unwrap();
        Questionnaire::new(schema)
    }

    fn answer_all(q: &mut Questionnaire, answers: &[Answer]) {
        for a in answers {
            q.answer(*a).unwrap();
        }
    }

    #[test]
    fn test_walks_through_every_question() {
        let mut q = three_questions();
        assert_eq!(q.state(), QuestionnaireState::Asking(0));
        assert_eq!(q.current_question().unwrap().question, "a?");

        assert_eq!(q.answer(Answer::Yes).unwrap(), QuestionnaireState::Asking(1));
        assert_eq!(q.answer(Answer::No).unwrap(), QuestionnaireState::Asking(2));
        assert_eq!(q.answer(Answer::Unknown).unwrap(), QuestionnaireState::AllAnswered);
        assert!(q.current_question().is_none());

        assert_eq!(
            q.answers().unwrap(),
            vec![Answer::Yes, Answer::No, Answer::Unknown]
        );
    }

    #[test]
    fn test_back_revisits_previous_question() {
        let mut q = three_questions();
        q.answer(Answer::Yes).unwrap();
        assert_eq!(q.back().unwrap(), QuestionnaireState::Asking(0));
        assert_eq!(q.answer_at(0), Some(Answer::Yes));

        q.answer(Answer::No).unwrap();
        assert_eq!(q.answer_at(0), Some(Answer::No));
    }

    #[test]
    fn test_back_on_first_question_fails() {
        let mut q = three_questions();
        assert_eq!(q.back(), Err(QuestionnaireError::NoPreviousQuestion));
    }

    #[test]
    fn test_back_from_all_answered_goes_to_last_question() {
        let mut q = three_questions();
        answer_all(&mut q, &[Answer::Yes; 3]);
        assert_eq!(q.back().unwrap(), QuestionnaireState::Asking(2));
    }

    #[test]
    fn test_answers_incomplete() {
        let mut q = three_questions();
        q.answer(Answer::Yes).unwrap();
        assert_eq!(
            q.answers(),
            Err(QuestionnaireError::Incomplete {
                answered: 1,
                total: 3
            })
        );
    }

    #[test]
    fn test_complete_and_review() {
        let mut q = three_questions();
        assert!(q.complete(DiagnosisResult::undiagnosable(0, 3)).is_err());

        answer_all(&mut q, &[Answer::Yes, Answer::Yes, Answer::No]);
        q.complete(DiagnosisResult::undiagnosable(2, 3)).unwrap();
        assert_eq!(q.state(), QuestionnaireState::Complete);
        assert_eq!(q.result().unwrap().symptoms_detected, 2);
        assert!(matches!(
            q.answer(Answer::Yes),
            Err(QuestionnaireError::InvalidTransition { .. })
        ));

        assert_eq!(q.review().unwrap(), QuestionnaireState::AllAnswered);
        assert!(q.result().is_none());
        assert_eq!(q.answers().unwrap().len(), 3);
    }

    #[test]
    fn test_result_saved_once_until_review() {
        let mut q = three_questions();
        assert!(q.mark_saved(CaseId::FIRST).is_err());

        answer_all(&mut q, &[Answer::Yes; 3]);
        q.complete(DiagnosisResult::undiagnosable(3, 3)).unwrap();
        q.mark_saved(CaseId::FIRST).unwrap();
        assert_eq!(q.saved(), Some(CaseId::FIRST));
        assert_eq!(
            q.mark_saved(CaseId::FIRST.next()),
            Err(QuestionnaireError::AlreadySaved(CaseId::FIRST))
        );

        q.review().unwrap();
        assert!(q.saved().is_none());
    }

    #[test]
    fn test_review_requires_result() {
        let mut q = three_questions();
        assert!(matches!(
            q.review(),
            Err(QuestionnaireError::InvalidTransition {
                action: "review",
                state: QuestionnaireState::Asking(0)
            })
        ));
    }

    #[test]
    fn test_reset_clears_answers() {
        let mut q = three_questions();
        answer_all(&mut q, &[Answer::Yes; 3]);
        q.complete(DiagnosisResult::undiagnosable(3, 3)).unwrap();

        q.reset();
        assert_eq!(q.state(), QuestionnaireState::Asking(0));
        assert_eq!(q.summary().answered, 0);
        assert!(q.result().is_none());
    }

    #[test]
    fn test_summary_and_progress() {
        let mut q = three_questions();
        q.answer(Answer::Yes).unwrap();
        q.answer(Answer::Unknown).unwrap();

        let summary = q.summary();
        assert_eq!(
            summary,
            AnswerSummary {
                total: 3,
                answered: 2,
                yes: 1,
                no: 0,
                unknown: 1
            }
        );
        assert!((q.progress() - 2.0 / 3.0).abs() < 1e-12);
    }
}
