use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::kana::KanaPair;

/// Which quiz game drives the session
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameMode {
    /// Pick the matching answer for a single character
    #[default]
    Pick,
    /// Build a short word tile by tile
    Word,
}

/// Forward asks kana -> romaji, reverse asks romaji -> kana
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    pub fn from_reverse(is_reverse: bool) -> Self {
        if is_reverse {
            Orientation::Reverse
        } else {
            Orientation::Forward
        }
    }

    pub fn prompt_of<'a>(&self, pair: &'a KanaPair) -> &'a str {
        match self {
            Orientation::Forward => &pair.kana,
            Orientation::Reverse => &pair.romaji,
        }
    }

    pub fn answer_of<'a>(&self, pair: &'a KanaPair) -> &'a str {
        match self {
            Orientation::Forward => &pair.romaji,
            Orientation::Reverse => &pair.kana,
        }
    }
}

/// A fully built question: targets, orientation and shuffled options
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub mode: GameMode,
    pub orientation: Orientation,
    pub targets: Vec<KanaPair>,
    pub options: Vec<String>,
}

impl Question {
    /// Text shown to the learner
    pub fn prompt(&self) -> String {
        let parts: Vec<&str> = self
            .targets
            .iter()
            .map(|t| self.orientation.prompt_of(t))
            .collect();
        match self.orientation {
            Orientation::Forward => parts.concat(),
            Orientation::Reverse => parts.join(" "),
        }
    }

    /// Expected answer for each target, in order
    pub fn expected(&self) -> Vec<&str> {
        self.targets
            .iter()
            .map(|t| self.orientation.answer_of(t))
            .collect()
    }

    pub fn expected_text(&self) -> String {
        match self.orientation {
            Orientation::Forward => self.expected().join(" "),
            Orientation::Reverse => self.expected().concat(),
        }
    }

    /// Number of option picks that make up one answer
    pub fn answer_len(&self) -> usize {
        match self.mode {
            GameMode::Pick => 1,
            GameMode::Word => self.targets.len(),
        }
    }
}

/// Result of grading one answer event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// The round is closed; the next call should start a new round
    pub finished: bool,
    /// Per-target grading; a single entry in pick mode
    pub per_target: Vec<bool>,
}

/// One in-flight question.
///
/// Dropping a round before answering it records nothing anywhere.
#[derive(Debug, Clone)]
pub struct QuizRound {
    pub(crate) question: Question,
    pub(crate) presented_at: Instant,
    pub(crate) attempts: u32,
    pub(crate) eliminated: Vec<usize>,
    pub(crate) finished: bool,
}

impl QuizRound {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            presented_at: Instant::now(),
            attempts: 0,
            eliminated: Vec::new(),
            finished: false,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Options already answered wrongly while the question stays open
    pub fn eliminated(&self) -> &[usize] {
        &self.eliminated
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.presented_at.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(orientation: Orientation, mode: GameMode) -> Question {
        Question {
            mode,
            orientation,
            targets: vec![KanaPair::new("か", "ka"), KanaPair::new("さ", "sa")],
            options: vec![],
        }
    }

    #[test]
    fn forward_prompt_shows_kana() {
        let q = question(Orientation::Forward, GameMode::Word);
        assert_eq!(q.prompt(), "かさ");
        assert_eq!(q.expected(), vec!["ka", "sa"]);
        assert_eq!(q.expected_text(), "ka sa");
        assert_eq!(q.answer_len(), 2);
    }

    #[test]
    fn reverse_prompt_shows_romaji() {
        let q = question(Orientation::Reverse, GameMode::Word);
        assert_eq!(q.prompt(), "ka sa");
        assert_eq!(q.expected(), vec!["か", "さ"]);
        assert_eq!(q.expected_text(), "かさ");
    }

    #[test]
    fn pick_answers_take_one_option() {
        let q = question(Orientation::Forward, GameMode::Pick);
        assert_eq!(q.answer_len(), 1);
    }

    #[test]
    fn new_round_is_open() {
        let round = QuizRound::new(question(Orientation::Forward, GameMode::Pick));
        assert!(!round.is_finished());
        assert_eq!(round.attempts(), 0);
        assert!(round.eliminated().is_empty());
    }

    #[test]
    fn game_mode_display() {
        assert_eq!(GameMode::Pick.to_string(), "pick");
        assert_eq!(GameMode::Word.to_string(), "word");
        assert_eq!(Orientation::Reverse.to_string(), "reverse");
    }
}
