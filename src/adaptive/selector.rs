use tracing::debug;

use super::weight_store::{WeightPolicy, WeightStore};
use crate::error::{QuizError, Result};
use crate::random::RandomSource;

/// Picks the next character to quiz, favouring characters the learner keeps
/// getting wrong while leaving every character in the pool reachable.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveSelector {
    store: WeightStore,
}

impl AdaptiveSelector {
    pub fn new(policy: WeightPolicy) -> Result<Self> {
        Ok(Self {
            store: WeightStore::new(policy)?,
        })
    }

    pub fn weights(&self) -> &WeightStore {
        &self.store
    }

    pub fn weight(&self, character: &str) -> f64 {
        self.store.weight(character)
    }

    pub fn is_seen(&self, character: &str) -> bool {
        self.store.is_seen(character)
    }

    /// Weighted draw over `pool`, skipping `exclude` unless it is the only option.
    /// Does not mutate any weight.
    pub fn select_weighted_character<'a, T: AsRef<str>>(
        &self,
        pool: &'a [T],
        exclude: Option<&str>,
        rng: &mut dyn RandomSource,
    ) -> Result<&'a T> {
        if pool.is_empty() {
            return Err(QuizError::invalid("cannot select from an empty pool"));
        }

        let candidates: Vec<&T> = pool
            .iter()
            .filter(|c| exclude != Some(AsRef::<str>::as_ref(*c)))
            .collect();

        // Only the excluded character is left; there is no alternative
        if candidates.is_empty() {
            return Ok(&pool[0]);
        }
        if candidates.len() == 1 {
            return Ok(candidates[0]);
        }

        let total: f64 = candidates
            .iter()
            .map(|c| self.store.weight(AsRef::<str>::as_ref(*c)))
            .sum();

        let mut target = rng.next_unit() * total;
        for &candidate in &candidates {
            let character: &str = candidate.as_ref();
            target -= self.store.weight(character);
            if target < 0.0 {
                debug!(character, total, "weighted pick");
                return Ok(candidate);
            }
        }

        // Floating point residue lands on the last candidate
        Ok(candidates[candidates.len() - 1])
    }

    pub fn mark_character_seen(&mut self, character: &str) {
        self.store.mark_seen(character);
    }

    pub fn update_character_weight(&mut self, character: &str, was_correct: bool) {
        let weight = self.store.apply_outcome(character, was_correct);
        debug!(character, was_correct, weight, "weight updated");
    }
}
