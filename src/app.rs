use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::Result;
use crate::quiz::{AnswerOutcome, GameMode, QuizRound};
use crate::runtime::QuizEvent;
use crate::session::QuizSession;
use crate::stats::{CharSummary, StatsDb};

/// Ticks a feedback flash stays on screen
pub const FLASH_TICKS: u16 = 12;
const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Quiz,
    Summary,
    CharacterStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Character,
    Attempts,
    MissRate,
    LastAnswered,
}

#[derive(Debug)]
pub struct CharStatsState {
    pub scroll_offset: usize,
    pub sort_by: SortBy,
    pub sort_ascending: bool,
    /// Snapshot loaded when the screen is opened
    pub rows: Vec<CharSummary>,
}

impl Default for CharStatsState {
    fn default() -> Self {
        Self {
            scroll_offset: 0,
            sort_by: SortBy::MissRate,
            sort_ascending: false,
            rows: Vec::new(),
        }
    }
}

impl CharStatsState {
    pub fn sorted_rows(&self) -> Vec<&CharSummary> {
        let mut rows: Vec<&CharSummary> = self.rows.iter().collect();
        rows.sort_by(|a, b| {
            let cmp = match self.sort_by {
                SortBy::Character => a.character.cmp(&b.character),
                SortBy::Attempts => a.attempts.cmp(&b.attempts),
                SortBy::MissRate => a
                    .miss_rate
                    .partial_cmp(&b.miss_rate)
                    .unwrap_or(std::cmp::Ordering::Equal),
                SortBy::LastAnswered => a.last_answered.cmp(&b.last_answered),
            };
            if self.sort_ascending {
                cmp
            } else {
                cmp.reverse()
            }
        });
        rows
    }

    fn sort(&mut self, sort_by: SortBy) {
        self.sort_by = sort_by;
        self.scroll_offset = 0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    pub correct: bool,
    pub message: String,
    pub ticks_left: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// Interactive quiz state: the session, the open round and screen state
#[derive(Debug)]
pub struct App {
    pub session: QuizSession,
    pub round: QuizRound,
    pub state: AppState,
    pub char_stats_state: CharStatsState,
    pub flash: Option<Flash>,
    /// Tiles placed so far in a word round
    pub tiles: Vec<usize>,
    stats_path: Option<PathBuf>,
}

impl App {
    pub fn new(mut session: QuizSession, stats_path: Option<PathBuf>) -> Result<Self> {
        let round = session.start_round()?;
        Ok(Self {
            session,
            round,
            state: AppState::Quiz,
            char_stats_state: CharStatsState::default(),
            flash: None,
            tiles: Vec::new(),
            stats_path,
        })
    }

    /// Throw away the open round and all learning state
    pub fn new_session(&mut self) -> Result<()> {
        self.session.restart()?;
        self.round = self.session.start_round()?;
        self.tiles.clear();
        self.flash = None;
        self.state = AppState::Quiz;
        Ok(())
    }

    pub fn handle_event(&mut self, event: QuizEvent) -> Result<AppAction> {
        if event.is_quit() {
            return Ok(AppAction::Quit);
        }
        match event {
            QuizEvent::Tick => {
                self.on_tick();
                Ok(AppAction::Continue)
            }
            QuizEvent::Resize => Ok(AppAction::Continue),
            QuizEvent::Key(key) => {
                self.on_key(key)?;
                Ok(AppAction::Continue)
            }
        }
    }

    pub fn on_tick(&mut self) {
        let expired = match &mut self.flash {
            Some(flash) => {
                flash.ticks_left = flash.ticks_left.saturating_sub(1);
                flash.ticks_left == 0
            }
            None => false,
        };
        if expired {
            self.flash = None;
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.state {
            AppState::Quiz => self.on_quiz_key(key)?,
            AppState::Summary => match key.code {
                KeyCode::Tab | KeyCode::Char('b') | KeyCode::Backspace => {
                    self.state = AppState::Quiz
                }
                KeyCode::Char('s') => self.open_character_stats(),
                KeyCode::Char('n') => self.new_session()?,
                _ => {}
            },
            AppState::CharacterStats => self.on_stats_key(key)?,
        }
        Ok(())
    }

    fn on_quiz_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let slot = c as usize - '1' as usize;
                self.pick(slot)?;
            }
            KeyCode::Backspace => {
                self.tiles.pop();
            }
            KeyCode::Tab => self.state = AppState::Summary,
            KeyCode::Char('s') => self.open_character_stats(),
            KeyCode::Char('n') => self.new_session()?,
            _ => {}
        }
        Ok(())
    }

    fn on_stats_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('b') | KeyCode::Backspace => {
                self.state = AppState::Quiz;
                return Ok(());
            }
            KeyCode::Tab => {
                self.state = AppState::Summary;
                return Ok(());
            }
            KeyCode::Char('n') => return self.new_session(),
            _ => {}
        }

        let st = &mut self.char_stats_state;
        match key.code {
            KeyCode::Up => st.scroll_offset = st.scroll_offset.saturating_sub(1),
            // Upper bound is clamped while rendering
            KeyCode::Down => st.scroll_offset += 1,
            KeyCode::PageUp => st.scroll_offset = st.scroll_offset.saturating_sub(PAGE_SIZE),
            KeyCode::PageDown => st.scroll_offset += PAGE_SIZE,
            KeyCode::Home => st.scroll_offset = 0,
            KeyCode::Char('1') => st.sort(SortBy::Character),
            KeyCode::Char('2') => st.sort(SortBy::Attempts),
            KeyCode::Char('3') => st.sort(SortBy::MissRate),
            KeyCode::Char('4') => st.sort(SortBy::LastAnswered),
            KeyCode::Char(' ') => {
                st.sort_ascending = !st.sort_ascending;
                st.scroll_offset = 0;
            }
            _ => {}
        }
        Ok(())
    }

    /// Choose the option in `slot`. Unavailable slots are ignored.
    pub fn pick(&mut self, slot: usize) -> Result<Option<AnswerOutcome>> {
        let question = self.round.question();
        if slot >= question.options.len() || self.round.eliminated().contains(&slot) {
            return Ok(None);
        }
        let (mode, answer_len) = (question.mode, question.answer_len());

        match mode {
            GameMode::Pick => self.submit(vec![slot]).map(Some),
            GameMode::Word => {
                if self.tiles.contains(&slot) {
                    return Ok(None);
                }
                self.tiles.push(slot);
                if self.tiles.len() < answer_len {
                    return Ok(None);
                }
                let picks = std::mem::take(&mut self.tiles);
                self.submit(picks).map(Some)
            }
        }
    }

    fn submit(&mut self, picks: Vec<usize>) -> Result<AnswerOutcome> {
        let outcome = self.session.answer(&mut self.round, &picks)?;
        let question = self.round.question();

        let message = if outcome.correct {
            format!("{} = {}", question.prompt(), question.expected_text())
        } else if outcome.finished {
            format!("{} was {}", question.prompt(), question.expected_text())
        } else {
            "not quite, try again".to_string()
        };
        self.flash = Some(Flash {
            correct: outcome.correct,
            message,
            ticks_left: FLASH_TICKS,
        });

        if outcome.finished {
            self.round = self.session.start_round()?;
        }
        Ok(outcome)
    }

    pub fn open_character_stats(&mut self) {
        self.char_stats_state.rows = self.load_char_summary();
        self.char_stats_state.scroll_offset = 0;
        self.state = AppState::CharacterStats;
    }

    fn load_char_summary(&self) -> Vec<CharSummary> {
        let Some(path) = &self.stats_path else {
            return Vec::new();
        };
        match StatsDb::open(path).and_then(|db| db.get_char_summary()) {
            Ok(rows) => {
                info!(rows = rows.len(), "loaded character stats");
                rows
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load character stats");
                Vec::new()
            }
        }
    }
}
