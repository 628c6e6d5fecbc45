use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QuizError, Result};
use crate::random::RandomSource;

/// Flip policy for reverse questions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReverseModeConfig {
    pub enabled: bool,
    /// Correct answers in a row before reverse questions become possible
    pub min_streak: u32,
    pub base_probability: f64,
    pub probability_step: f64,
    pub max_probability: f64,
}

impl Default for ReverseModeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_streak: 3,
            base_probability: 0.3,
            probability_step: 0.1,
            max_probability: 0.7,
        }
    }
}

impl ReverseModeConfig {
    pub fn validate(&self) -> Result<()> {
        let in_unit = |p: f64| (0.0..=1.0).contains(&p);
        if !in_unit(self.base_probability)
            || !in_unit(self.max_probability)
            || !in_unit(self.probability_step)
        {
            return Err(QuizError::invalid(
                "reverse mode probabilities must be within [0, 1]",
            ));
        }
        Ok(())
    }

    /// Probability of a reverse question after `streak` correct answers
    pub fn reverse_probability(&self, streak: u32) -> f64 {
        if !self.enabled || streak < self.min_streak {
            return 0.0;
        }
        let extra = f64::from(streak - self.min_streak) * self.probability_step;
        (self.base_probability + extra).min(self.max_probability)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReverseModeState {
    pub is_reverse: bool,
    pub consecutive_correct: u32,
}

/// Decides between forward (kana -> romaji) and reverse questions.
///
/// The orientation only changes in [`decide_next_mode`](Self::decide_next_mode),
/// which runs between questions. A wrong answer resets the streak but keeps the
/// orientation of the question still being answered.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseModeController {
    config: ReverseModeConfig,
    state: ReverseModeState,
}

impl ReverseModeController {
    pub fn new(config: ReverseModeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: ReverseModeState::default(),
        })
    }

    pub fn state(&self) -> ReverseModeState {
        self.state
    }

    pub fn is_reverse(&self) -> bool {
        self.state.is_reverse
    }

    pub fn decide_next_mode(&mut self, rng: &mut dyn RandomSource) {
        self.state.consecutive_correct += 1;
        let p = self.config.reverse_probability(self.state.consecutive_correct);
        let next = p > 0.0 && rng.chance(p);
        if next != self.state.is_reverse {
            debug!(
                reverse = next,
                streak = self.state.consecutive_correct,
                "orientation flipped"
            );
        }
        self.state.is_reverse = next;
    }

    pub fn record_wrong_answer(&mut self) {
        self.state.consecutive_correct = 0;
    }
}
