use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, SortBy};
use crate::stats::CharSummary;

pub struct CharRowData {
    pub character: String,
    pub attempts: i64,
    pub miss_rate: f64,
    /// Current selection weight, when the character was seen this session
    pub weight: Option<f64>,
    pub last_answered: Option<String>,
}

impl CharRowData {
    pub fn from_summary(summary: &CharSummary, weight: Option<f64>) -> Self {
        Self {
            character: summary.character.clone(),
            attempts: summary.attempts,
            miss_rate: summary.miss_rate,
            weight,
            last_answered: summary
                .last_answered_at()
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}

/// Pure presenter for a single character stats row
pub fn present_row(data: &CharRowData) -> Row<'static> {
    let miss_color = if data.miss_rate == 0.0 {
        Color::Green
    } else if data.miss_rate < 20.0 {
        Color::Yellow
    } else {
        Color::Red
    };

    // Above-default weight means the character is being drilled harder
    let (weight_display, weight_style) = match data.weight {
        Some(w) if w > 1.0 => (format!("{w:.2} ↑"), Style::default().fg(Color::Red)),
        Some(w) if w < 1.0 => (format!("{w:.2} ↓"), Style::default().fg(Color::Green)),
        Some(w) => (format!("{w:.2}"), Style::default()),
        None => ("—".to_string(), Style::default().fg(Color::Gray)),
    };

    Row::new(vec![
        Cell::from(data.character.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(data.attempts.to_string()),
        Cell::from(format!("{:.1}", data.miss_rate)).style(Style::default().fg(miss_color)),
        Cell::from(weight_display).style(weight_style),
        Cell::from(
            data.last_answered
                .clone()
                .unwrap_or_else(|| "—".to_string()),
        ),
    ])
}

/// Render the Character Statistics screen
pub fn render_character_stats(app: &mut App, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Stats table
            Constraint::Length(4), // Instructions
        ])
        .split(area);

    let st = &app.char_stats_state;
    let sort_direction = if st.sort_ascending { "↑" } else { "↓" };
    let sort_by_text = match st.sort_by {
        SortBy::Character => "Character",
        SortBy::Attempts => "Attempts",
        SortBy::MissRate => "Miss Rate",
        SortBy::LastAnswered => "Last Answered",
    };
    let title = Paragraph::new(format!(
        "Character Statistics (Sort: {sort_by_text} {sort_direction})"
    ))
    .block(Block::default().borders(Borders::ALL).title("Stats"))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    if st.rows.is_empty() {
        let no_data =
            Paragraph::new("No character statistics available yet. Answer a few questions first.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[1]);
    } else {
        let table_height = chunks[1].height.saturating_sub(3) as usize; // borders + header
        let max_scroll = st.rows.len().saturating_sub(table_height);
        let scroll_offset = st.scroll_offset.min(max_scroll);

        let indicator = |column: SortBy| {
            if st.sort_by == column {
                sort_direction
            } else {
                ""
            }
        };
        let header = Row::new(vec![
            Cell::from(format!("Char {}", indicator(SortBy::Character))),
            Cell::from(format!("Attempts {}", indicator(SortBy::Attempts))),
            Cell::from(format!("Miss Rate (%) {}", indicator(SortBy::MissRate))),
            Cell::from("Weight"),
            Cell::from(format!("Last Answered {}", indicator(SortBy::LastAnswered))),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let selector = app.session.selector();
        let visible_rows: Vec<Row> = st
            .sorted_rows()
            .into_iter()
            .skip(scroll_offset)
            .take(table_height)
            .map(|summary| {
                let weight = selector
                    .is_seen(&summary.character)
                    .then(|| selector.weight(&summary.character));
                present_row(&CharRowData::from_summary(summary, weight))
            })
            .collect();

        let widths = [
            Constraint::Length(8),  // Char
            Constraint::Length(12), // Attempts
            Constraint::Length(16), // Miss Rate
            Constraint::Length(10), // Weight
            Constraint::Min(18),    // Last Answered
        ];

        let table = Table::new(visible_rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Character Stats"),
            )
            .column_spacing(2);
        f.render_widget(table, chunks[1]);

        app.char_stats_state.scroll_offset = scroll_offset;
    }

    let instructions = Paragraph::new(
        "(↑/↓) scroll  (PgUp/PgDn) page  (Home) top  (1-4) sort  (space) direction  (b) back  (n) new",
    )
    .alignment(Alignment::Center)
    .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(instructions, chunks[2]);
}
