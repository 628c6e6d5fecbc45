use ratatui::Frame;

use crate::app::{App, AppState};
use crate::ui::character_stats::render_character_stats;

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Question, options and feedback flash
pub struct QuizScreen;

impl Screen for QuizScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// Session results with the latency chart
pub struct SummaryScreen;

impl Screen for SummaryScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

pub struct CharacterStatsScreen;

impl Screen for CharacterStatsScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_character_stats(app, f);
    }
}

pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Quiz => Box::new(QuizScreen),
        AppState::Summary => Box::new(SummaryScreen),
        AppState::CharacterStats => Box::new(CharacterStatsScreen),
    }
}
