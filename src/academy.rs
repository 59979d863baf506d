//! Progression state machine: the reducer-style operations behind every
//! screen. Each operation takes the current user record and returns a new one
//! (wholesale replacement, no ambient mutation); persistence is the caller's
//! concern.

use rand::Rng;

use crate::assessment::{self, AssessmentOutcome, AssessmentSession};
use crate::catalog::{course_catalog, question_bank, Course, Question};
use crate::config::{ts_epoch_ms, ts_now, Config};
use crate::error::{AcademyError, Result};
use crate::user::User;

/// A course purchase in its simulated processing window. Settling before
/// `settle_at_ms` is rejected; settling at or after it completes the course.
#[derive(Debug, Clone)]
pub struct PendingPurchase {
    pub course_id: String,
    pub title: String,
    pub price: f64,
    pub requested_at_ms: u64,
    pub settle_at_ms: u64,
}

pub struct Academy {
    cfg: Config,
    questions: Vec<Question>,
    courses: Vec<Course>,
}

impl Academy {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            questions: question_bank(),
            courses: course_catalog(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Create a zeroed user record. An empty name defaults to the email local
    /// part, as the signup form does.
    pub fn register(&self, email: &str, name: &str) -> Result<User> {
        let email = email.trim();
        let local = email.split('@').next().unwrap_or("");
        if local.is_empty() || !email.contains('@') {
            return Err(AcademyError::Validation(format!(
                "not a usable email address: {:?}",
                email
            )));
        }
        let name = name.trim();
        let name = if name.is_empty() { local } else { name };
        let id = format!("u-{:x}-{:04x}", ts_epoch_ms(), rand::thread_rng().gen::<u16>());
        Ok(User::new(
            id,
            email.to_string(),
            name.to_string(),
            ts_now(),
        ))
    }

    /// Open a fresh answer sheet bound to the configured countdown.
    pub fn start_assessment(&self, now_ms: u64) -> AssessmentSession {
        AssessmentSession::new(self.questions.len(), now_ms, self.cfg.assessment_secs)
    }

    /// Grade a submission. Attempts always count; the pass flag never
    /// downgrades; the reward is a fixed grant, not additive.
    pub fn record_assessment(
        &self,
        user: &User,
        answers: &[Option<usize>],
    ) -> Result<(User, AssessmentOutcome)> {
        if answers.len() > self.questions.len() {
            return Err(AcademyError::Validation(format!(
                "{} answers for {} questions",
                answers.len(),
                self.questions.len()
            )));
        }
        let outcome = assessment::grade(answers, &self.questions, self.cfg.pass_ratio);
        let mut next = user.clone();
        next.test_attempts += 1;
        next.has_passed = next.has_passed || outcome.passed;
        if outcome.passed {
            next.credits = self.cfg.reward_credits;
        }
        Ok((next, outcome))
    }

    /// Start a course purchase. The record is untouched until the pending
    /// purchase settles.
    pub fn purchase_course(
        &self,
        user: &User,
        course_id: &str,
        now_ms: u64,
    ) -> Result<PendingPurchase> {
        let course = self
            .courses
            .iter()
            .find(|c| c.id == course_id)
            .ok_or_else(|| AcademyError::NotFound(format!("course {:?}", course_id)))?;
        if user.courses_completed.contains(&course.title) {
            return Err(AcademyError::InvalidState(format!(
                "course already completed: {}",
                course.title
            )));
        }
        Ok(PendingPurchase {
            course_id: course.id.clone(),
            title: course.title.clone(),
            price: course.price,
            requested_at_ms: now_ms,
            settle_at_ms: now_ms + self.cfg.purchase_settle_ms,
        })
    }

    pub fn settle_purchase(
        &self,
        user: &User,
        pending: &PendingPurchase,
        now_ms: u64,
    ) -> Result<User> {
        if now_ms < pending.settle_at_ms {
            return Err(AcademyError::InvalidState(format!(
                "purchase of {:?} still processing",
                pending.title
            )));
        }
        let mut next = user.clone();
        next.courses_completed.push(pending.title.clone());
        Ok(next)
    }

    /// First entry into the trading screen after passing: flips the flag and
    /// funds the portfolio. A no-op for balance and credits once active.
    pub fn activate_trading(&self, user: &User) -> Result<User> {
        if !user.has_passed {
            return Err(AcademyError::InvalidState(
                "trading requires a passed assessment".to_string(),
            ));
        }
        if user.trading_active {
            return Ok(user.clone());
        }
        let mut next = user.clone();
        next.trading_active = true;
        if next.credits == 0 {
            next.credits = self.cfg.starting_balance as i64;
        }
        next.portfolio.balance = self.cfg.starting_balance;
        next.portfolio.total_value = self.cfg.starting_balance;
        Ok(next)
    }
}

/// Process-wide session state: the live user record plus the one-at-a-time
/// pending purchase guard. Screens read through it and push replacements back.
pub struct Session {
    academy: Academy,
    user: Option<User>,
    pending: Option<PendingPurchase>,
}

impl Session {
    pub fn new(academy: Academy) -> Self {
        Self {
            academy,
            user: None,
            pending: None,
        }
    }

    /// Restore a persisted record, e.g. after a restart.
    pub fn resume(academy: Academy, user: User) -> Self {
        Self {
            academy,
            user: Some(user),
            pending: None,
        }
    }

    pub fn academy(&self) -> &Academy {
        &self.academy
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_mut(&mut self) -> Option<&mut User> {
        self.user.as_mut()
    }

    fn require_user(&self) -> Result<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| AcademyError::InvalidState("no user signed in".to_string()))
    }

    pub fn sign_up(&mut self, email: &str, name: &str) -> Result<&User> {
        let user = self.academy.register(email, name)?;
        Ok(&*self.user.insert(user))
    }

    pub fn submit_assessment(&mut self, answers: &[Option<usize>]) -> Result<AssessmentOutcome> {
        let user = self.require_user()?;
        let (next, outcome) = self.academy.record_assessment(user, answers)?;
        self.user = Some(next);
        Ok(outcome)
    }

    /// Begin a purchase. While one is pending, further purchases are rejected;
    /// this is the duplicate-submission guard the UI relies on.
    pub fn begin_purchase(&mut self, course_id: &str, now_ms: u64) -> Result<&PendingPurchase> {
        let user = self.require_user()?;
        if let Some(pending) = &self.pending {
            return Err(AcademyError::InvalidState(format!(
                "purchase of {:?} already pending",
                pending.title
            )));
        }
        let pending = self.academy.purchase_course(user, course_id, now_ms)?;
        Ok(&*self.pending.insert(pending))
    }

    pub fn pending_purchase(&self) -> Option<&PendingPurchase> {
        self.pending.as_ref()
    }

    /// Settle the pending purchase once its processing window has elapsed.
    pub fn settle_purchase(&mut self, now_ms: u64) -> Result<&User> {
        let user = self.require_user()?;
        let pending = self
            .pending
            .as_ref()
            .ok_or_else(|| AcademyError::InvalidState("no purchase pending".to_string()))?;
        let next = self.academy.settle_purchase(user, pending, now_ms)?;
        self.pending = None;
        Ok(&*self.user.insert(next))
    }

    pub fn activate_trading(&mut self) -> Result<&User> {
        let user = self.require_user()?;
        let next = self.academy.activate_trading(user)?;
        Ok(&*self.user.insert(next))
    }

    /// Drop the in-memory record. Clearing the persisted slot is the caller's
    /// job, alongside tearing down any feed subscription.
    pub fn logout(&mut self) {
        self.user = None;
        self.pending = None;
    }
}
