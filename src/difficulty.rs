use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QuizError, Result};

/// Bounds and step sizes for the number of answer options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DifficultyConfig {
    pub min_options: usize,
    pub max_options: usize,
    pub streak_per_level: u32,
    pub wrongs_to_decrease: u32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            min_options: 3,
            max_options: 6,
            streak_per_level: 5,
            wrongs_to_decrease: 2,
        }
    }
}

impl DifficultyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_options == 0 || self.streak_per_level == 0 || self.wrongs_to_decrease == 0 {
            return Err(QuizError::invalid(
                "difficulty bounds and step sizes must be positive",
            ));
        }
        if self.min_options > self.max_options {
            return Err(QuizError::invalid(format!(
                "min_options ({}) exceeds max_options ({})",
                self.min_options, self.max_options
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyState {
    pub option_count: usize,
    pub correct_streak: u32,
    pub wrong_count: u32,
}

/// Scales the option count with the learner's streaks.
///
/// `option_count` only moves through [`record_correct`](Self::record_correct)
/// and [`record_wrong`](Self::record_wrong) and always stays within
/// `[min_options, max_options]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressiveDifficulty {
    config: DifficultyConfig,
    state: DifficultyState,
}

impl ProgressiveDifficulty {
    pub fn new(config: DifficultyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: DifficultyState {
                option_count: config.min_options,
                correct_streak: 0,
                wrong_count: 0,
            },
        })
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    pub fn state(&self) -> DifficultyState {
        self.state
    }

    pub fn option_count(&self) -> usize {
        self.state.option_count
    }

    pub fn record_correct(&mut self) {
        self.state.correct_streak += 1;
        self.state.wrong_count = 0;

        if self.state.correct_streak % self.config.streak_per_level == 0
            && self.state.option_count < self.config.max_options
        {
            self.state.option_count += 1;
            debug!(
                option_count = self.state.option_count,
                streak = self.state.correct_streak,
                "difficulty up"
            );
        }
    }

    pub fn record_wrong(&mut self) {
        self.state.wrong_count += 1;
        self.state.correct_streak = 0;

        if self.state.wrong_count >= self.config.wrongs_to_decrease {
            self.state.wrong_count = 0;
            if self.state.option_count > self.config.min_options {
                self.state.option_count -= 1;
                debug!(option_count = self.state.option_count, "difficulty down");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn difficulty() -> ProgressiveDifficulty {
        ProgressiveDifficulty::new(DifficultyConfig::default()).unwrap()
    }

    #[test]
    fn starts_at_min_options() {
        let d = difficulty();
        assert_eq!(
            d.state(),
            DifficultyState {
                option_count: 3,
                correct_streak: 0,
                wrong_count: 0
            }
        );
    }

    #[test]
    fn five_correct_levels_up_once() {
        let mut d = difficulty();
        for _ in 0..4 {
            d.record_correct();
            assert_eq!(d.option_count(), 3);
        }
        d.record_correct();
        assert_eq!(d.option_count(), 4);
        assert_eq!(d.state().correct_streak, 5);
    }

    #[test]
    fn streak_keeps_accumulating_across_levels() {
        let mut d = difficulty();
        for _ in 0..10 {
            d.record_correct();
        }
        assert_eq!(d.option_count(), 5);
        assert_eq!(d.state().correct_streak, 10);
    }

    #[test]
    fn two_wrongs_level_down_and_reset_counter() {
        let mut d = difficulty();
        for _ in 0..5 {
            d.record_correct();
        }
        d.record_wrong();
        assert_eq!(d.option_count(), 4);
        assert_eq!(d.state().wrong_count, 1);
        assert_eq!(d.state().correct_streak, 0);

        d.record_wrong();
        assert_eq!(d.option_count(), 3);
        assert_eq!(d.state().wrong_count, 0);
    }

    #[test]
    fn correct_answer_resets_wrong_count() {
        let mut d = difficulty();
        for _ in 0..5 {
            d.record_correct();
        }
        d.record_wrong();
        d.record_correct();
        d.record_wrong();
        assert_eq!(d.option_count(), 4);
    }

    #[test]
    fn option_count_never_leaves_bounds() {
        let mut d = difficulty();
        for _ in 0..1_000 {
            d.record_correct();
            assert!(d.option_count() <= 6);
        }
        assert_eq!(d.option_count(), 6);

        for _ in 0..1_000 {
            d.record_wrong();
            assert!(d.option_count() >= 3);
        }
        assert_eq!(d.option_count(), 3);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let zero = DifficultyConfig {
            min_options: 0,
            ..DifficultyConfig::default()
        };
        assert_matches!(
            ProgressiveDifficulty::new(zero),
            Err(QuizError::InvalidArgument(_))
        );

        let inverted = DifficultyConfig {
            min_options: 5,
            max_options: 4,
            ..DifficultyConfig::default()
        };
        assert_matches!(inverted.validate(), Err(QuizError::InvalidArgument(_)));

        let no_step = DifficultyConfig {
            streak_per_level: 0,
            ..DifficultyConfig::default()
        };
        assert_matches!(no_step.validate(), Err(QuizError::InvalidArgument(_)));
    }

    #[test]
    fn fixed_bounds_never_move() {
        let mut d = ProgressiveDifficulty::new(DifficultyConfig {
            min_options: 4,
            max_options: 4,
            streak_per_level: 1,
            wrongs_to_decrease: 1,
        })
        .unwrap();
        d.record_correct();
        d.record_wrong();
        assert_eq!(d.option_count(), 4);
    }
}
