use super::game::QuizGame;
use super::question::GameMode;
use crate::adaptive::AdaptiveSelector;
use crate::error::{QuizError, Result};
use crate::kana::{KanaPair, Pool};
use crate::random::RandomSource;

pub const DEFAULT_WORD_LENGTH: usize = 3;

/// A short nonsense word assembled from weighted characters; the learner
/// places one tile per character, in order.
#[derive(Debug, Clone, Copy)]
pub struct WordBuildingGame {
    word_length: usize,
    pub wrong_ends_question: bool,
}

impl WordBuildingGame {
    pub fn new(word_length: usize) -> Result<Self> {
        if word_length == 0 {
            return Err(QuizError::invalid("word length must be positive"));
        }
        Ok(Self {
            word_length,
            wrong_ends_question: true,
        })
    }

    pub fn word_length(&self) -> usize {
        self.word_length
    }
}

impl QuizGame for WordBuildingGame {
    fn mode(&self) -> GameMode {
        GameMode::Word
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
        let mut remaining: Vec<KanaPair> = pool.characters().to_vec();
        let mut targets = Vec::with_capacity(self.word_length);
        let mut exclude = previous.map(str::to_string);

        for _ in 0..self.word_length {
            let pick = selector
                .select_weighted_character(&remaining, exclude.as_deref(), rng)?
                .clone();
            // Shared romaji would make a reverse prompt ambiguous; fall back
            // to kana-only distinctness, and repeats only once the pool is
            // exhausted
            let distinct: Vec<KanaPair> = remaining
                .iter()
                .filter(|c| c.kana != pick.kana && c.romaji != pick.romaji)
                .cloned()
                .collect();
            if !distinct.is_empty() {
                remaining = distinct;
            } else if remaining.len() > 1 {
                remaining.retain(|c| c.kana != pick.kana);
            }
            exclude = Some(pick.kana.clone());
            targets.push(pick);
        }
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptive::WeightPolicy;
    use crate::random::RngSource;
    use assert_matches::assert_matches;
    use itertools::Itertools;

    fn selector() -> AdaptiveSelector {
        AdaptiveSelector::new(WeightPolicy::default()).unwrap()
    }

    #[test]
    fn zero_length_is_invalid() {
        assert_matches!(WordBuildingGame::new(0), Err(QuizError::InvalidArgument(_)));
    }

    #[test]
    fn targets_are_distinct_when_pool_allows() {
        let pool = Pool::from_selection(&[crate::kana::Script::Hiragana], &["ka".into()]).unwrap();
        let game = WordBuildingGame::new(4).unwrap();
        let mut rng = RngSource::seeded(11);
        for _ in 0..50 {
            let targets = game.select_targets(&selector(), &pool, None, &mut rng).unwrap();
            assert_eq!(targets.len(), 4);
            assert!(targets.iter().map(|t| &t.kana).all_unique());
        }
    }

    #[test]
    fn targets_avoid_shared_romaji_when_pool_allows() {
        let pool = Pool::new(vec![
            KanaPair::new("か", "ka"),
            KanaPair::new("カ", "ka"),
            KanaPair::new("き", "ki"),
            KanaPair::new("キ", "ki"),
        ])
        .unwrap();
        let game = WordBuildingGame::new(2).unwrap();
        let mut rng = RngSource::seeded(3);
        for _ in 0..50 {
            let targets = game.select_targets(&selector(), &pool, None, &mut rng).unwrap();
            assert_ne!(targets[0].romaji, targets[1].romaji);
        }
    }

    #[test]
    fn tiny_pool_repeats_characters() {
        let pool = Pool::new(vec![KanaPair::new("ん", "n")]).unwrap();
        let game = WordBuildingGame::new(3).unwrap();
        let mut rng = RngSource::seeded(5);
        let targets = game
            .select_targets(&selector(), &pool, Some("ん"), &mut rng)
            .unwrap();
        assert_eq!(targets.len(), 3);
    }

    #[test]
    fn first_target_avoids_previous_word_end() {
        let pool = Pool::new(vec![KanaPair::new("あ", "a"), KanaPair::new("い", "i")]).unwrap();
        let game = WordBuildingGame::new(1).unwrap();
        let mut rng = RngSource::seeded(5);
        for _ in 0..20 {
            let targets = game
                .select_targets(&selector(), &pool, Some("い"), &mut rng)
                .unwrap();
            assert_eq!(targets[0].kana, "あ");
        }
    }
}
