use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::refresh::Phase;
use crate::rows::Bucket;
use crate::state::AppState;

const HEADER_BLUE: Color = Color::Rgb(0x00, 0x71, 0x9b);
const MUTED_GREY: Color = Color::Rgb(0x80, 0x80, 0x80);
const FINAL_RED: Color = Color::Rgb(0xbd, 0x00, 0x00);
const MAX_DETAIL_HEIGHT: u16 = 9;

pub fn draw(frame: &mut Frame, state: &AppState, phase: Phase) {
    let detail = state.detail_lines();
    let detail_height = (detail.len() as u16 + 1).min(MAX_DETAIL_HEIGHT);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(detail_height),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(state.header())
        .style(
            Style::default()
                .fg(HEADER_BLUE)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_rows(frame, chunks[1], state);

    let detail = Paragraph::new(detail.join("\n"))
        .style(Style::default().add_modifier(Modifier::ITALIC))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(detail, chunks[2]);

    let footer = Paragraph::new(footer_text(state, phase))
        .style(Style::default().fg(MUTED_GREY).add_modifier(Modifier::ITALIC))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);
}

fn render_rows(frame: &mut Frame, area: Rect, state: &AppState) {
    let list = &state.list;
    let rows = list.rows();
    if rows.is_empty() {
        let empty = Paragraph::new("No games this cycle")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }
    if area.height == 0 {
        return;
    }

    let (start, end) = visible_range(list.cursor(), rows.len(), area.height as usize);
    let lines: Vec<Line> = (start..end)
        .map(|idx| {
            let row = &rows[idx];
            let at_cursor = idx == list.cursor();
            let mut style = bucket_style(row.bucket);
            if at_cursor {
                style = style.bg(Color::DarkGray);
            }
            Line::styled(row_line(at_cursor, list.is_selected(idx), &row.text), style)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// `"{cursor} [{check}] {text}"` with `>` and `x` as the markers.
pub fn row_line(at_cursor: bool, checked: bool, text: &str) -> String {
    let cursor = if at_cursor { '>' } else { ' ' };
    let check = if checked { 'x' } else { ' ' };
    format!("{cursor} [{check}] {text}")
}

pub fn footer_text(state: &AppState, phase: Phase) -> String {
    let updated = match state.list.last_updated() {
        Some(at) => at.format("%H:%M:%S").to_string(),
        None => "never".to_string(),
    };
    let suffix = match phase {
        Phase::Refreshing => " (refreshing)",
        Phase::Idle => "",
    };
    format!("j/k/↑/↓ Move | Enter/Space Select | Press q to quit. Updated: {updated}{suffix}")
}

fn bucket_style(bucket: Bucket) -> Style {
    let color = match bucket {
        Bucket::InProgress => Color::White,
        Bucket::Scheduled => MUTED_GREY,
        Bucket::Final => FINAL_RED,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}
