pub mod character_stats;
pub mod charting;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, AppState};
use crate::quiz::GameMode;
use crate::ui::charting::{compute_chart_params, format_label, latency_coords};
use crate::util::format_ms;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Summary => render_summary(self, area, buf),
            _ => render_quiz(self, area, buf),
        }
    }
}

/// Right-pad `text` with spaces to `width` terminal columns
pub fn pad_to_width(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(pad))
}

fn render_quiz(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let question = app.round.question();
    let option_lines = question.options.len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1),            // status
            Constraint::Min(0),               // spacer
            Constraint::Length(1),            // prompt
            Constraint::Length(1),            // padding
            Constraint::Length(1),            // placed tiles
            Constraint::Length(1),            // padding
            Constraint::Length(option_lines), // options
            Constraint::Length(1),            // padding
            Constraint::Length(1),            // flash
            Constraint::Min(0),               // spacer
            Constraint::Length(1),            // legend
        ])
        .split(area);

    let difficulty = app.session.difficulty().state();
    let summary = app.session.summary();
    let status = format!(
        "{} | {} | {} options | streak {} | {}/{} correct",
        question.mode,
        question.orientation,
        question.options.len(),
        difficulty.correct_streak,
        summary.correct,
        summary.answers,
    );
    Paragraph::new(Span::styled(status, dim_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        question.prompt(),
        bold_style.fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    if question.mode == GameMode::Word {
        let mut spans: Vec<Span> = app
            .tiles
            .iter()
            .map(|&slot| Span::styled(format!("{} ", question.options[slot]), bold_style))
            .collect();
        for _ in app.tiles.len()..question.answer_len() {
            spans.push(Span::styled("_ ", dim_style));
        }
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }

    let column = question
        .options
        .iter()
        .map(|o| o.width())
        .max()
        .unwrap_or(0);
    let lines: Vec<Line> = question
        .options
        .iter()
        .enumerate()
        .map(|(slot, option)| {
            let label = format!("{}  {}", slot + 1, pad_to_width(option, column));
            let style = if app.round.eliminated().contains(&slot) {
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
            } else if app.tiles.contains(&slot) {
                dim_style
            } else {
                bold_style
            };
            Line::from(Span::styled(label, style))
        })
        .collect();
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[6], buf);

    if let Some(flash) = &app.flash {
        let color = if flash.correct {
            Color::Green
        } else {
            Color::Red
        };
        Paragraph::new(Span::styled(
            flash.message.clone(),
            bold_style.fg(color),
        ))
        .alignment(Alignment::Center)
        .render(chunks[8], buf);
    }

    let legend = match question.mode {
        GameMode::Pick => "(1-9) pick / (tab) summary / (s)tats / (n)ew / (esc)ape",
        GameMode::Word => {
            "(1-9) place tile / (backspace) undo / (tab) summary / (s)tats / (n)ew / (esc)ape"
        }
    };
    Paragraph::new(Span::styled(legend, italic_style))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[10], buf);
}

fn render_summary(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // chart
            Constraint::Length(1), // stats
            Constraint::Length(1), // current level
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let summary = app.session.summary();
    let coords = latency_coords(&summary.latencies_ms);
    let (answers, slowest) = compute_chart_params(&coords);

    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(magenta_style)
        .graph_type(GraphType::Line)
        .data(&coords)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("answer")
                .bounds([1.0, answers])
                .labels(vec![
                    Span::styled("1", bold_style),
                    Span::styled(format_label(answers), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("ms")
                .bounds([0.0, slowest])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(format_label(slowest), bold_style),
                ]),
        )
        .render(chunks[0], buf);

    let latency = match (summary.mean_latency_ms(), summary.latency_std_dev()) {
        (Some(mean), Some(sd)) => format!("{} mean   {} sd", format_ms(mean), format_ms(sd)),
        _ => "no answers yet".to_string(),
    };
    Paragraph::new(Span::styled(
        format!(
            "{} questions   {}% acc   {latency}",
            summary.questions,
            summary.accuracy()
        ),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let difficulty = app.session.difficulty().state();
    let level = format!(
        "{} options   {} correct in a row   {} characters seen",
        difficulty.option_count,
        app.session.reverse_mode().state().consecutive_correct,
        app.session.selector().weights().seen_count(),
    );
    Paragraph::new(Span::styled(
        level,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        "(tab/b) back / (s)tats / (n)ew / (esc)ape",
        italic_style,
    ))
    .render(chunks[4], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kana::{KanaPair, Pool};
    use crate::random::RngSource;
    use crate::session::{QuizSession, SessionConfig};
    use ratatui::{buffer::Buffer, layout::Rect};

    fn create_test_app(mode: GameMode) -> App {
        let pool = Pool::new(vec![
            KanaPair::new("な", "na"),
            KanaPair::new("に", "ni"),
            KanaPair::new("ぬ", "nu"),
            KanaPair::new("ね", "ne"),
            KanaPair::new("の", "no"),
        ])
        .unwrap();
        let config = SessionConfig {
            game_mode: mode,
            word_length: 2,
            ..SessionConfig::default()
        };
        let session = QuizSession::new(config, pool)
            .unwrap()
            .with_rng(Box::new(RngSource::seeded(9)));
        App::new(session, None).unwrap()
    }

    fn rendered(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_quiz_screen_shows_options() {
        let app = create_test_app(GameMode::Pick);
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        for option in &app.round.question().options {
            assert!(text.contains(option.as_str()), "missing option {option}");
        }
        assert!(text.contains("(1-9) pick"));
    }

    #[test]
    fn test_word_screen_shows_tile_slots() {
        let app = create_test_app(GameMode::Word);
        let text = rendered(&app, Rect::new(0, 0, 100, 24));
        assert!(text.contains("_ _"));
        assert!(text.contains("place tile"));
    }

    #[test]
    fn test_flash_is_rendered() {
        let mut app = create_test_app(GameMode::Pick);
        app.flash = Some(crate::app::Flash {
            correct: false,
            message: "not quite, try again".into(),
            ticks_left: 3,
        });
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("not quite, try again"));
    }

    #[test]
    fn test_summary_screen() {
        let mut app = create_test_app(GameMode::Pick);
        app.state = AppState::Summary;
        let text = rendered(&app, Rect::new(0, 0, 80, 24));
        assert!(text.contains("0 questions"));
        assert!(text.contains("no answers yet"));
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let mut app = create_test_app(GameMode::Word);
        rendered(&app, Rect::new(0, 0, 12, 5));
        app.state = AppState::Summary;
        rendered(&app, Rect::new(0, 0, 12, 5));
    }

    #[test]
    fn test_pad_to_width_counts_columns() {
        assert_eq!(pad_to_width("ka", 4), "ka  ");
        // Kana are two columns wide
        assert_eq!(pad_to_width("か", 4), "か  ");
        assert_eq!(pad_to_width("shi", 2), "shi");
    }
}
