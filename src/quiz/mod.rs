use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::QuizError;
use crate::models::QuizResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Add,
    Subtract,
    Multiply,
}

impl Operator {
    pub(crate) fn all() -> &'static [Operator] {
        &[Self::Add, Self::Subtract, Self::Multiply]
    }

    pub(crate) fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
        }
    }

    pub(crate) fn apply(&self, left: i64, right: i64) -> i64 {
        match self {
            Self::Add => left + right,
            Self::Subtract => left - right,
            Self::Multiply => left * right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Question {
    pub(crate) left: i64,
    pub(crate) op: Operator,
    pub(crate) right: i64,
}

impl Question {
    pub(crate) fn answer(&self) -> i64 {
        self.op.apply(self.left, self.right)
    }

    fn random(rng: &mut impl Rng, max_operand: i64) -> Self {
        let ops = Operator::all();
        Self {
            left: rng.random_range(1..=max_operand),
            op: ops[rng.random_range(0..ops.len())],
            right: rng.random_range(1..=max_operand),
        }
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.left, self.op.symbol(), self.right)
    }
}

/// Largest operand a quiz may draw; keeps every product inside `i64`.
pub(crate) const MAX_OPERAND_LIMIT: i64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QuizConfig {
    pub(crate) questions: usize,
    pub(crate) max_operand: i64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions: 5,
            max_operand: 10,
        }
    }
}

impl QuizConfig {
    pub(crate) fn validate(&self) -> Result<(), QuizError> {
        if self.questions == 0 {
            return Err(QuizError::InvalidConfig(
                "at least one question is required".into(),
            ));
        }
        if !(1..=MAX_OPERAND_LIMIT).contains(&self.max_operand) {
            return Err(QuizError::InvalidConfig(format!(
                "max operand must be between 1 and {MAX_OPERAND_LIMIT}, got {}",
                self.max_operand
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Correct,
    Wrong { expected: i64 },
}

/// A fixed-length run of random arithmetic questions.
///
/// `current` is the question waiting for an answer; it stays put when an
/// answer is rejected as not-a-number.
#[derive(Debug)]
pub(crate) struct Quiz {
    rng: StdRng,
    config: QuizConfig,
    current: Question,
    answered: usize,
    score: usize,
}

impl Quiz {
    pub(crate) fn new(config: QuizConfig) -> Result<Self, QuizError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    #[cfg(test)]
    pub(crate) fn seeded(config: QuizConfig, seed: u64) -> Result<Self, QuizError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: QuizConfig, mut rng: StdRng) -> Result<Self, QuizError> {
        config.validate()?;
        let current = Question::random(&mut rng, config.max_operand);
        Ok(Self {
            rng,
            config,
            current,
            answered: 0,
            score: 0,
        })
    }

    pub(crate) fn current(&self) -> Option<&Question> {
        if self.is_finished() {
            None
        } else {
            Some(&self.current)
        }
    }

    /// 1-based number of the question being asked.
    pub(crate) fn question_number(&self) -> usize {
        (self.answered + 1).min(self.config.questions)
    }

    pub(crate) fn submit(&mut self, answer: i64) -> Result<Outcome, QuizError> {
        if self.is_finished() {
            return Err(QuizError::Finished);
        }

        let expected = self.current.answer();
        let outcome = if answer == expected {
            self.score += 1;
            Outcome::Correct
        } else {
            Outcome::Wrong { expected }
        };

        self.answered += 1;
        if !self.is_finished() {
            self.current = Question::random(&mut self.rng, self.config.max_operand);
        }
        Ok(outcome)
    }

    pub(crate) fn submit_text(&mut self, text: &str) -> Result<Outcome, QuizError> {
        if self.is_finished() {
            return Err(QuizError::Finished);
        }
        let trimmed = text.trim();
        let answer: i64 = trimmed
            .parse()
            .map_err(|_| QuizError::NotANumber(trimmed.to_string()))?;
        self.submit(answer)
    }

    pub(crate) fn restart(&mut self) {
        self.answered = 0;
        self.score = 0;
        self.current = Question::random(&mut self.rng, self.config.max_operand);
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.answered >= self.config.questions
    }

    pub(crate) fn score(&self) -> usize {
        self.score
    }

    pub(crate) fn answered(&self) -> usize {
        self.answered
    }

    pub(crate) fn total(&self) -> usize {
        self.config.questions
    }

    /// Result over the questions answered so far.
    pub(crate) fn result(&self) -> QuizResult {
        QuizResult::new(self.score as u32, self.answered as u32)
    }
}
