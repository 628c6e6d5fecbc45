use std::io::Write;

use crate::quiz::Question;

/// Observational hooks fired after every graded answer
pub trait Feedback {
    fn on_correct(&mut self, question: &Question);
    fn on_wrong(&mut self, question: &Question);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn on_correct(&mut self, _question: &Question) {}
    fn on_wrong(&mut self, _question: &Question) {}
}

/// Rings the terminal bell on wrong answers
#[derive(Debug)]
pub struct BellFeedback<W: Write> {
    out: W,
}

impl<W: Write> BellFeedback<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl BellFeedback<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Feedback for BellFeedback<W> {
    fn on_correct(&mut self, _question: &Question) {}

    fn on_wrong(&mut self, _question: &Question) {
        // A failed bell is not worth interrupting the quiz for
        let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kana::KanaPair;
    use crate::quiz::{GameMode, Orientation};

    fn question() -> Question {
        Question {
            mode: GameMode::Pick,
            orientation: Orientation::Forward,
            targets: vec![KanaPair::new("あ", "a")],
            options: vec!["a".into()],
        }
    }

    #[test]
    fn bell_rings_only_on_wrong() {
        let mut bell = BellFeedback::new(Vec::new());
        bell.on_correct(&question());
        assert!(bell.out.is_empty());
        bell.on_wrong(&question());
        bell.on_wrong(&question());
        assert_eq!(bell.into_inner(), b"\x07\x07".to_vec());
    }
}
