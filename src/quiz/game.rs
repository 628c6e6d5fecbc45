use itertools::Itertools;
use std::collections::HashSet;

use super::question::{GameMode, Orientation, Question};
use crate::adaptive::AdaptiveSelector;
use crate::error::{QuizError, Result};
use crate::kana::{KanaPair, Pool};
use crate::random::{sample_without_replacement, shuffle, RandomSource};

/// One quiz game variant. Games decide what a question looks like; the
/// session owns all learning state and records outcomes.
pub trait QuizGame {
    fn mode(&self) -> GameMode;

    /// Whether a wrong answer closes the question instead of letting the
    /// learner try again
    fn wrong_ends_question(&self) -> bool;

    /// Choose the target character(s) for the next question
    fn select_targets(
        &self,
        selector: &AdaptiveSelector,
        pool: &Pool,
        previous: Option<&str>,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<KanaPair>>;

    fn build_question(
        &self,
        targets: Vec<KanaPair>,
        pool: &Pool,
        option_count: usize,
        orientation: Orientation,
        rng: &mut dyn RandomSource,
    ) -> Question {
        let options = build_options(pool, &targets, option_count, orientation, rng);
        Question {
            mode: self.mode(),
            orientation,
            targets,
            options,
        }
    }
}

/// Correct answers plus `option_count - 1` distractors, shuffled.
///
/// Distractors never share a prompt or an answer text with any target, so
/// homophones like じ/ぢ cannot both appear as "correct".
pub fn build_options(
    pool: &Pool,
    targets: &[KanaPair],
    option_count: usize,
    orientation: Orientation,
    rng: &mut dyn RandomSource,
) -> Vec<String> {
    let taken_answers: HashSet<&str> = targets.iter().map(|t| orientation.answer_of(t)).collect();
    let taken_prompts: HashSet<&str> = targets.iter().map(|t| orientation.prompt_of(t)).collect();

    let candidates: Vec<&str> = pool
        .characters()
        .iter()
        .filter(|c| {
            !taken_answers.contains(orientation.answer_of(c))
                && !taken_prompts.contains(orientation.prompt_of(c))
        })
        .map(|c| orientation.answer_of(c))
        .unique()
        .collect();

    let distractors =
        sample_without_replacement(&candidates, option_count.saturating_sub(1), rng);

    let mut options: Vec<String> = targets
        .iter()
        .map(|t| orientation.answer_of(t).to_string())
        .chain(distractors.into_iter().map(str::to_string))
        .collect();
    shuffle(&mut options, rng);
    options
}

/// Grade option indices against the question; one bool per target
pub fn grade(question: &Question, picks: &[usize]) -> Result<Vec<bool>> {
    let needed = question.answer_len();
    if picks.len() != needed {
        return Err(QuizError::invalid(format!(
            "expected {needed} option(s), got {}",
            picks.len()
        )));
    }
    if let Some(&bad) = picks.iter().find(|&&i| i >= question.options.len()) {
        return Err(QuizError::invalid(format!(
            "option {bad} out of range (have {})",
            question.options.len()
        )));
    }
    if !picks.iter().all_unique() {
        return Err(QuizError::invalid("an option can only be used once"));
    }

    let expected = question.expected();
    Ok(match question.mode {
        GameMode::Pick => vec![question.options[picks[0]] == expected[0]],
        // A tile matches any target that reads the same in the prompt, so
        // "ka ka" over か and カ accepts either order
        GameMode::Word => picks
            .iter()
            .zip(&question.targets)
            .map(|(&i, target)| {
                let orientation = question.orientation;
                let prompt = orientation.prompt_of(target);
                question.targets.iter().any(|t| {
                    orientation.prompt_of(t) == prompt
                        && orientation.answer_of(t) == question.options[i]
                })
            })
            .collect(),
    })
}
