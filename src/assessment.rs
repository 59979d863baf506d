//! Assessment engine: scoring, the pass threshold, and the countdown-bound
//! answer sheet.
//!
//! The countdown is a deadline check, not a background timer: reaching zero
//! closes the sheet to further answers, and grading then uses whatever was
//! recorded. A forced submission is a normal terminal transition, never an
//! error.

use serde::{Deserialize, Serialize};

use crate::catalog::Question;
use crate::error::{AcademyError, Result};

/// Number of correct answers required to pass, as a fraction of the bank.
/// Rounds up so a partial question can never be "enough".
pub fn pass_threshold(question_count: usize, pass_ratio: f64) -> usize {
    (question_count as f64 * pass_ratio).ceil() as usize
}

/// Count positions where the selected option matches the correct one.
/// Unanswered positions earn nothing.
pub fn score(answers: &[Option<usize>], bank: &[Question]) -> usize {
    bank.iter()
        .zip(answers.iter())
        .filter(|(q, a)| **a == Some(q.correct))
        .count()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    pub correct: usize,
    pub total: usize,
    pub threshold: usize,
    pub passed: bool,
}

impl AssessmentOutcome {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        }
    }
}

pub fn grade(answers: &[Option<usize>], bank: &[Question], pass_ratio: f64) -> AssessmentOutcome {
    let correct = score(answers, bank);
    let threshold = pass_threshold(bank.len(), pass_ratio);
    AssessmentOutcome {
        correct,
        total: bank.len(),
        threshold,
        passed: correct >= threshold,
    }
}

/// One sitting of the assessment: a sparse answer sheet bound to a deadline.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    answers: Vec<Option<usize>>,
    pub started_at_ms: u64,
    pub deadline_ms: u64,
}

impl AssessmentSession {
    pub fn new(question_count: usize, now_ms: u64, duration_secs: u64) -> Self {
        Self {
            answers: vec![None; question_count],
            started_at_ms: now_ms,
            deadline_ms: now_ms + duration_secs * 1000,
        }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.deadline_ms
    }

    pub fn remaining_secs(&self, now_ms: u64) -> u64 {
        self.deadline_ms.saturating_sub(now_ms) / 1000
    }

    /// Record or overwrite an answer. Rejected once the countdown has hit zero.
    pub fn record_answer(&mut self, question_idx: usize, choice: usize, now_ms: u64) -> Result<()> {
        if self.is_expired(now_ms) {
            return Err(AcademyError::InvalidState(
                "assessment time has expired".to_string(),
            ));
        }
        let slot = self.answers.get_mut(question_idx).ok_or_else(|| {
            AcademyError::Validation(format!("no question at index {}", question_idx))
        })?;
        *slot = Some(choice);
        Ok(())
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::question_bank;

    fn all_correct(bank: &[Question]) -> Vec<Option<usize>> {
        bank.iter().map(|q| Some(q.correct)).collect()
    }

    #[test]
    fn test_threshold_is_80_pct_rounded_up() {
        assert_eq!(pass_threshold(5, 0.8), 4);
        assert_eq!(pass_threshold(20, 0.8), 16);
        assert_eq!(pass_threshold(6, 0.8), 5); // 4.8 rounds up
        assert_eq!(pass_threshold(0, 0.8), 0);
    }

    #[test]
    fn test_score_counts_exact_matches() {
        let bank = question_bank();
        let mut answers = all_correct(&bank);
        assert_eq!(score(&answers, &bank), 5);

        answers[0] = Some(bank[0].correct + 1);
        assert_eq!(score(&answers, &bank), 4);

        answers[1] = None;
        assert_eq!(score(&answers, &bank), 3);
    }

    #[test]
    fn test_score_short_answer_sheet() {
        let bank = question_bank();
        // Only the first two questions answered, both correctly.
        let answers = vec![Some(bank[0].correct), Some(bank[1].correct)];
        assert_eq!(score(&answers, &bank), 2);
    }

    #[test]
    fn test_grade_4_of_5_passes() {
        let bank = question_bank();
        let mut answers = all_correct(&bank);
        answers[4] = None;
        let outcome = grade(&answers, &bank, 0.8);
        assert_eq!(outcome.correct, 4);
        assert_eq!(outcome.threshold, 4);
        assert!(outcome.passed);
        assert!((outcome.percentage() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_grade_2_of_5_fails() {
        let bank = question_bank();
        let mut answers = all_correct(&bank);
        answers[0] = None;
        answers[1] = None;
        answers[2] = Some(bank[2].correct + 1);
        let outcome = grade(&answers, &bank, 0.8);
        assert_eq!(outcome.correct, 2);
        assert!(!outcome.passed);
    }

    #[test]
    fn test_session_records_and_overwrites() {
        let mut session = AssessmentSession::new(5, 1_000, 1800);
        session.record_answer(0, 2, 2_000).unwrap();
        session.record_answer(0, 1, 3_000).unwrap();
        assert_eq!(session.answers()[0], Some(1));
        assert_eq!(session.answers()[1], None);
    }

    #[test]
    fn test_session_rejects_out_of_range_question() {
        let mut session = AssessmentSession::new(5, 0, 1800);
        let err = session.record_answer(5, 0, 0).unwrap_err();
        assert!(matches!(err, AcademyError::Validation(_)));
    }

    #[test]
    fn test_session_rejects_answers_after_deadline() {
        let mut session = AssessmentSession::new(5, 0, 30);
        session.record_answer(0, 1, 29_999).unwrap();
        let err = session.record_answer(1, 1, 30_000).unwrap_err();
        assert!(matches!(err, AcademyError::InvalidState(_)));
        // Forced submission still grades the recorded answers.
        assert_eq!(session.answers()[0], Some(1));
    }

    #[test]
    fn test_remaining_secs() {
        let session = AssessmentSession::new(5, 10_000, 1800);
        assert_eq!(session.remaining_secs(10_000), 1800);
        assert_eq!(session.remaining_secs(70_000), 1740);
        assert_eq!(session.remaining_secs(10_000 + 1800 * 1000), 0);
        assert_eq!(session.remaining_secs(u64::MAX), 0);
    }
}
