//! # Question Challenges
//!
//! Each star is guarded by a short question. The player gets a fixed number of
//! attempts; empty answers are bounced without costing one.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Built-in arithmetic questions as (prompt, answer).
pub const DEFAULT_QUESTIONS: &[(&str, &str)] = &[
    ("What is 5 + 3?", "8"),
    ("What is 7 × 4?", "28"),
    ("What is 15 - 6?", "9"),
    ("What is 36 ÷ 6?", "6"),
    ("What is 2³ (two cubed)?", "8"),
    ("What is the square root of 25?", "5"),
    ("What is 12 + 8?", "20"),
    ("What is 9 × 3?", "27"),
];

/// A question with its expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub answer: String,
}

impl Question {
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }

    /// The built-in question pool.
    pub fn default_pool() -> Vec<Question> {
        DEFAULT_QUESTIONS
            .iter()
            .map(|(prompt, answer)| Question::new(*prompt, *answer))
            .collect()
    }

    /// Exact match after trimming both sides.
    pub fn is_correct(&self, submitted: &str) -> bool {
        submitted.trim() == self.answer.trim()
    }
}

/// Result of submitting one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerOutcome {
    /// Nothing was typed; no attempt used
    Empty,
    Correct,
    Wrong { attempts_left: u32 },
    /// Last attempt used up; the challenge is over
    Exhausted,
}

/// An open challenge for one star.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Index into the star list
    pub star: usize,
    pub question: Question,
    pub attempts_left: u32,
}

impl Challenge {
    /// Opens a challenge with a question picked uniformly from `pool`.
    ///
    /// Returns None when the pool is empty.
    pub fn open(star: usize, pool: &[Question], attempts: u32, rng: &mut StdRng) -> Option<Self> {
        if pool.is_empty() {
            return None;
        }
        let question = pool[rng.gen_range(0..pool.len())].clone();
        Some(Self {
            star,
            question,
            attempts_left: attempts,
        })
    }

    /// Checks an answer and updates the remaining attempts.
    ///
    /// # Examples
    ///
    /// ```
    /// use starmaze::{AnswerOutcome, Challenge, Question};
    ///
    /// let mut challenge = Challenge {
    ///     star: 0,
    ///     question: Question::new("What is 5 + 3?", "8"),
    ///     attempts_left: 2,
    /// };
    /// assert_eq!(challenge.submit("   "), AnswerOutcome::Empty);
    /// assert_eq!(challenge.submit("7"), AnswerOutcome::Wrong { attempts_left: 1 });
    /// assert_eq!(challenge.submit(" 8 "), AnswerOutcome::Correct);
    /// ```
    pub fn submit(&mut self, answer: &str) -> AnswerOutcome {
        let answer = answer.trim();
        if answer.is_empty() {
            return AnswerOutcome::Empty;
        }
        if self.question.is_correct(answer) {
            return AnswerOutcome::Correct;
        }

        self.attempts_left = self.attempts_left.saturating_sub(1);
        if self.attempts_left == 0 {
            AnswerOutcome::Exhausted
        } else {
            AnswerOutcome::Wrong {
                attempts_left: self.attempts_left,
            }
        }
    }
}
