use tracing::{debug, info};

use crate::adaptive::{AdaptiveSelector, WeightPolicy};
use crate::difficulty::{DifficultyConfig, ProgressiveDifficulty};
use crate::error::{QuizError, Result};
use crate::feedback::{Feedback, SilentFeedback};
use crate::kana::Pool;
use crate::quiz::{
    grade, AnswerOutcome, GameMode, Orientation, PickGame, QuizGame, QuizRound,
    WordBuildingGame, DEFAULT_WORD_LENGTH,
};
use crate::random::{RandomSource, RngSource};
use crate::reverse_mode::{ReverseModeConfig, ReverseModeController};
use crate::stats::{MemoryStats, StatsSink};
use crate::util::{mean, std_dev};

/// Options are picked with the digit keys
pub const MAX_OPTION_SLOTS: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub game_mode: GameMode,
    pub word_length: usize,
    /// Overrides the game's own default when set
    pub wrong_ends_question: Option<bool>,
    pub difficulty: DifficultyConfig,
    pub reverse_mode: ReverseModeConfig,
    pub weights: WeightPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_mode: GameMode::Pick,
            word_length: DEFAULT_WORD_LENGTH,
            wrong_ends_question: None,
            difficulty: DifficultyConfig::default(),
            reverse_mode: ReverseModeConfig::default(),
            weights: WeightPolicy::default(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        self.difficulty.validate()?;
        self.reverse_mode.validate()?;
        self.weights.validate()?;

        let slots = match self.game_mode {
            GameMode::Pick => self.difficulty.max_options,
            GameMode::Word => self
                .word_length
                .checked_add(self.difficulty.max_options - 1)
                .ok_or_else(|| {
                    QuizError::invalid(format!("word length {} is too large", self.word_length))
                })?,
        };
        if slots > MAX_OPTION_SLOTS {
            return Err(QuizError::invalid(format!(
                "{slots} answer options requested, at most {MAX_OPTION_SLOTS} fit"
            )));
        }
        Ok(())
    }

    pub fn build_game(&self) -> Result<Box<dyn QuizGame>> {
        Ok(match self.game_mode {
            GameMode::Pick => {
                let mut game = PickGame::default();
                if let Some(ends) = self.wrong_ends_question {
                    game.wrong_ends_question = ends;
                }
                Box::new(game)
            }
            GameMode::Word => {
                let mut game = WordBuildingGame::new(self.word_length)?;
                if let Some(ends) = self.wrong_ends_question {
                    game.wrong_ends_question = ends;
                }
                Box::new(game)
            }
        })
    }
}

/// Running totals for the results screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub questions: u32,
    pub answers: u32,
    pub correct: u32,
    pub wrong: u32,
    pub latencies_ms: Vec<u64>,
}

impl SessionSummary {
    pub fn accuracy(&self) -> f64 {
        if self.answers == 0 {
            0.0
        } else {
            (self.correct as f64 / self.answers as f64 * 100.0).round()
        }
    }

    pub fn mean_latency_ms(&self) -> Option<f64> {
        mean(&self.latencies())
    }

    pub fn latency_std_dev(&self) -> Option<f64> {
        std_dev(&self.latencies())
    }

    fn latencies(&self) -> Vec<f64> {
        self.latencies_ms.iter().map(|&ms| ms as f64).collect()
    }
}

/// One quiz session: owns the selector, difficulty and orientation state and
/// wires them to the game, stats sink, feedback and randomness.
pub struct QuizSession {
    config: SessionConfig,
    pool: Pool,
    game: Box<dyn QuizGame>,
    selector: AdaptiveSelector,
    difficulty: ProgressiveDifficulty,
    reverse_mode: ReverseModeController,
    stats: Box<dyn StatsSink>,
    feedback: Box<dyn Feedback>,
    rng: Box<dyn RandomSource>,
    previous: Option<String>,
    summary: SessionSummary,
}

impl std::fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSession")
            .field("mode", &self.game.mode())
            .field("pool", &self.pool.len())
            .field("difficulty", &self.difficulty.state())
            .field("reverse_mode", &self.reverse_mode.state())
            .field("summary", &self.summary)
            .finish()
    }
}

impl QuizSession {
    pub fn new(config: SessionConfig, pool: Pool) -> Result<Self> {
        config.validate()?;
        let session = Self {
            game: config.build_game()?,
            selector: AdaptiveSelector::new(config.weights)?,
            difficulty: ProgressiveDifficulty::new(config.difficulty)?,
            reverse_mode: ReverseModeController::new(config.reverse_mode)?,
            stats: Box::new(MemoryStats::new()),
            feedback: Box::new(SilentFeedback),
            rng: Box::new(RngSource::thread()),
            previous: None,
            summary: SessionSummary::default(),
            config,
            pool,
        };
        info!(
            mode = %session.game.mode(),
            pool = session.pool.len(),
            "quiz session started"
        );
        Ok(session)
    }

    pub fn with_stats(mut self, stats: Box<dyn StatsSink>) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_feedback(mut self, feedback: Box<dyn Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_rng(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// Fresh weights, streaks and totals; sinks and randomness are kept
    pub fn restart(&mut self) -> Result<()> {
        self.selector = AdaptiveSelector::new(self.config.weights)?;
        self.difficulty = ProgressiveDifficulty::new(self.config.difficulty)?;
        self.reverse_mode = ReverseModeController::new(self.config.reverse_mode)?;
        self.previous = None;
        self.summary = SessionSummary::default();
        info!("quiz session restarted");
        Ok(())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.game.mode()
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn selector(&self) -> &AdaptiveSelector {
        &self.selector
    }

    pub fn difficulty(&self) -> &ProgressiveDifficulty {
        &self.difficulty
    }

    pub fn reverse_mode(&self) -> &ReverseModeController {
        &self.reverse_mode
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// Build the next question. Reads the learning state without changing it,
    /// so a round that is never answered leaves no trace.
    pub fn start_round(&mut self) -> Result<QuizRound> {
        let targets = self.game.select_targets(
            &self.selector,
            &self.pool,
            self.previous.as_deref(),
            self.rng.as_mut(),
        )?;
        let option_count = self.difficulty.option_count();
        let orientation = Orientation::from_reverse(self.reverse_mode.is_reverse());

        let question =
            self.game
                .build_question(targets, &self.pool, option_count, orientation, self.rng.as_mut());
        debug!(
            prompt = %question.prompt(),
            options = question.options.len(),
            %orientation,
            "round started"
        );
        Ok(QuizRound::new(question))
    }

    /// Grade an answer using the time since the round was presented
    pub fn answer(&mut self, round: &mut QuizRound, picks: &[usize]) -> Result<AnswerOutcome> {
        let latency_ms = round.elapsed_ms();
        self.answer_with_latency(round, picks, latency_ms)
    }

    pub fn answer_with_latency(
        &mut self,
        round: &mut QuizRound,
        picks: &[usize],
        latency_ms: u64,
    ) -> Result<AnswerOutcome> {
        if round.finished {
            return Err(QuizError::invalid("round is already finished"));
        }
        let per_target = grade(&round.question, picks)?;
        let correct = per_target.iter().all(|&ok| ok);

        if round.attempts == 0 {
            for target in &round.question.targets {
                self.selector.mark_character_seen(&target.kana);
            }
        }
        round.attempts += 1;

        for (target, &ok) in round.question.targets.iter().zip(&per_target) {
            self.selector.update_character_weight(&target.kana, ok);
            if ok {
                self.stats.record_correct(&target.kana);
            } else {
                self.stats.record_wrong(&target.kana);
            }
        }
        self.stats.record_answer_latency(latency_ms);

        self.summary.answers += 1;
        self.summary.latencies_ms.push(latency_ms);

        if correct {
            self.summary.correct += 1;
            self.difficulty.record_correct();
            self.reverse_mode.decide_next_mode(self.rng.as_mut());
            self.feedback.on_correct(&round.question);
            round.finished = true;
        } else {
            self.summary.wrong += 1;
            self.difficulty.record_wrong();
            // Orientation stays put: the learner may still be on this question
            self.reverse_mode.record_wrong_answer();
            self.feedback.on_wrong(&round.question);
            if self.game.wrong_ends_question() {
                round.finished = true;
            } else if round.question.mode == GameMode::Pick {
                round.eliminated.push(picks[0]);
            }
        }

        if round.finished {
            self.summary.questions += 1;
            self.previous = round.question.targets.last().map(|t| t.kana.clone());
        }

        debug!(
            correct,
            finished = round.finished,
            attempts = round.attempts,
            option_count = self.difficulty.option_count(),
            "answer graded"
        );

        Ok(AnswerOutcome {
            correct,
            finished: round.finished,
            per_target,
        })
    }
}
