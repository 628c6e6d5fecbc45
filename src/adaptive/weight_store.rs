use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{QuizError, Result};

pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Tunable multiplicative update policy for character weights
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeightPolicy {
    pub floor: f64,
    pub ceiling: f64,
    /// Applied on a correct answer, in (0, 1)
    pub correct_factor: f64,
    /// Applied on a wrong answer, > 1
    pub wrong_factor: f64,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self {
            floor: 0.1,
            ceiling: 10.0,
            correct_factor: 0.8,
            wrong_factor: 1.5,
        }
    }
}

impl WeightPolicy {
    pub fn validate(&self) -> Result<()> {
        if !(self.floor > 0.0) {
            return Err(QuizError::invalid("weight floor must be positive"));
        }
        if !self.ceiling.is_finite() {
            return Err(QuizError::invalid("weight ceiling must be finite"));
        }
        if !(self.ceiling >= DEFAULT_WEIGHT && self.floor <= DEFAULT_WEIGHT) {
            return Err(QuizError::invalid(format!(
                "weight bounds [{}, {}] must contain the default weight {DEFAULT_WEIGHT}",
                self.floor, self.ceiling
            )));
        }
        if !(self.correct_factor > 0.0 && self.correct_factor < 1.0) {
            return Err(QuizError::invalid("correct_factor must be in (0, 1)"));
        }
        if !(self.wrong_factor > 1.0 && self.wrong_factor.is_finite()) {
            return Err(QuizError::invalid("wrong_factor must be greater than 1"));
        }
        Ok(())
    }
}

/// Weight and seen bit for a single character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterWeight {
    pub weight: f64,
    pub seen: bool,
}

impl Default for CharacterWeight {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
            seen: false,
        }
    }
}

/// Per-character weights, created lazily on first reference
#[derive(Debug, Clone, PartialEq)]
pub struct WeightStore {
    entries: HashMap<String, CharacterWeight>,
    policy: WeightPolicy,
}

impl WeightStore {
    pub fn new(policy: WeightPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            entries: HashMap::new(),
            policy,
        })
    }

    pub fn policy(&self) -> &WeightPolicy {
        &self.policy
    }

    /// Current weight; untouched characters report the default
    pub fn weight(&self, character: &str) -> f64 {
        self.entries
            .get(character)
            .map_or(DEFAULT_WEIGHT, |entry| entry.weight)
    }

    pub fn is_seen(&self, character: &str) -> bool {
        self.entries.get(character).is_some_and(|entry| entry.seen)
    }

    pub fn get(&self, character: &str) -> Option<&CharacterWeight> {
        self.entries.get(character)
    }

    pub fn seen_count(&self) -> usize {
        self.entries.values().filter(|entry| entry.seen).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mark_seen(&mut self, character: &str) {
        self.entry_mut(character).seen = true;
    }

    /// Multiplicative update clamped to `[floor, ceiling]`; returns the new weight
    pub fn apply_outcome(&mut self, character: &str, was_correct: bool) -> f64 {
        let policy = self.policy;
        let entry = self.entry_mut(character);
        let factor = if was_correct {
            policy.correct_factor
        } else {
            policy.wrong_factor
        };
        entry.weight = (entry.weight * factor).clamp(policy.floor, policy.ceiling);
        entry.weight
    }

    fn entry_mut(&mut self, character: &str) -> &mut CharacterWeight {
        self.entries.entry(character.to_string()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn unknown_characters_use_defaults() {
        let store = WeightStore::new(WeightPolicy::default()).unwrap();
        assert_eq!(store.weight("あ"), DEFAULT_WEIGHT);
        assert!(!store.is_seen("あ"));
        assert!(store.is_empty());
    }

    #[test]
    fn entries_are_created_lazily() {
        let mut store = WeightStore::new(WeightPolicy::default()).unwrap();
        store.mark_seen("か");
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("か"),
            Some(&CharacterWeight {
                weight: DEFAULT_WEIGHT,
                seen: true
            })
        );
    }

    #[test]
    fn weights_stay_within_bounds() {
        let policy = WeightPolicy::default();
        let mut store = WeightStore::new(policy).unwrap();
        for _ in 0..100 {
            store.apply_outcome("a", false);
        }
        assert_eq!(store.weight("a"), policy.ceiling);
        for _ in 0..200 {
            store.apply_outcome("a", true);
        }
        assert_eq!(store.weight("a"), policy.floor);
    }

    #[test]
    fn invalid_policies_are_rejected() {
        let bad_floor = WeightPolicy {
            floor: 0.0,
            ..WeightPolicy::default()
        };
        assert_matches!(
            WeightStore::new(bad_floor),
            Err(QuizError::InvalidArgument(_))
        );

        let unbounded = WeightPolicy {
            ceiling: f64::INFINITY,
            ..WeightPolicy::default()
        };
        assert_matches!(
            WeightStore::new(unbounded),
            Err(QuizError::InvalidArgument(_))
        );

        let bad_correct = WeightPolicy {
            correct_factor: 1.2,
            ..WeightPolicy::default()
        };
        assert_matches!(bad_correct.validate(), Err(QuizError::InvalidArgument(_)));

        let bad_wrong = WeightPolicy {
            wrong_factor: 1.0,
            ..WeightPolicy::default()
        };
        assert_matches!(bad_wrong.validate(), Err(QuizError::InvalidArgument(_)));

        let inverted = WeightPolicy {
            floor: 2.0,
            ceiling: 1.5,
            ..WeightPolicy::default()
        };
        assert_matches!(inverted.validate(), Err(QuizError::InvalidArgument(_)));
    }
}
