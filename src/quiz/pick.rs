use super::game::QuizGame;
use super::question::GameMode;
use crate::adaptive::AdaptiveSelector;
use crate::error::Result;
use crate::kana::{KanaPair, Pool};
use crate::random::RandomSource;

/// Single character, multiple choice
#[derive(Debug, Clone, Copy, Default)]
pub struct PickGame {
    pub wrong_ends_question: bool,
}

impl QuizGame for PickGame {
    fn mode(&self) -> GameMode {
        GameMode::Pick
    }

    fn wrong_ends_question(&self) -> bool {
        self.wrong_ends_question
    }

    fn select_targets(
        &self,
        selector: &AdaptiveSelector,
        pool: &Pool,
        previous: Option<&str>,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<KanaPair>> {
        let target = selector.select_weighted_character(pool.characters(), previous, rng)?;
        Ok(vec![target.clone()])
    }
}
