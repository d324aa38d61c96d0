use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::task::{Filter, Task};

use super::app::{AppState, DeleteConfirmState, StatusKind};

const ID_WIDTH: usize = 4;
const HELP_KEY_WIDTH: usize = 10;
const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_BG_MUTED: Color = Color::Rgb(52, 56, 60);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER_LIST: Color = Color::Rgb(92, 126, 166);

pub fn render(frame: &mut Frame, app: &AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_tabs(frame, app, chunks[0]);
    render_input(frame, app, chunks[1]);
    render_list(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);

    if let Some(state) = app.delete_confirm.as_ref() {
        render_delete_confirm_modal(frame, area, state);
    }
    if app.show_help {
        render_help_modal(frame, area);
    }
}

fn render_tabs(frame: &mut Frame, app: &AppState, area: Rect) {
    let total = app.store.total_count();
    let active = app.store.active_count();
    let current = app.store.filter();
    let tabs = vec![
        ("1 All", Filter::All, total, COLOR_INFO),
        ("2 Active", Filter::Active, active, COLOR_ACCENT),
        ("3 Completed", Filter::Completed, total - active, COLOR_SUCCESS),
    ];

    let mut spans = Vec::new();
    for (idx, (label, filter, count, color)) in tabs.into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("  ", Style::default().fg(COLOR_MUTED_DARK)));
        }
        let text = format!("{label} ({count})");
        let style = if filter == current {
            Style::default()
                .fg(color)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(COLOR_MUTED)
        };
        spans.push(Span::styled(text, style));
    }

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(COLOR_BG_MUTED)),
    );
    frame.render_widget(widget, area);
}

fn render_input(frame: &mut Frame, app: &AppState, area: Rect) {
    let line = if app.input_active {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(COLOR_ACCENT)),
            Span::styled(app.input.clone(), Style::default().fg(COLOR_TEXT)),
            Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
        ])
    } else {
        Line::from(Span::styled(
            "press a to add a task",
            Style::default().fg(COLOR_MUTED_DARK),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_list(frame: &mut Frame, app: &AppState, area: Rect) {
    let content_width = area.width.saturating_sub(2) as usize;
    let visible = app.store.visible();

    let mut lines = Vec::new();
    if visible.is_empty() {
        let message = match app.store.filter() {
            Filter::All => "No tasks",
            Filter::Active => "No active tasks",
            Filter::Completed => "No completed tasks",
        };
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(COLOR_MUTED_DARK),
        )));
    } else {
        let list_height = area.height.saturating_sub(2) as usize;
        let selected_pos = app
            .selected
            .and_then(|id| visible.iter().position(|task| task.id == id));
        let (start, end) = list_window(visible.len(), selected_pos, list_height);
        for pos in start..end {
            let task = visible[pos];
            let selected = selected_pos == Some(pos);
            lines.push(render_task_row(task, selected, content_width));
        }
    }

    let title = format!("Tasks ({})", app.store.filter().label());
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(COLOR_BORDER_LIST)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_task_row(task: &Task, selected: bool, width: usize) -> Line<'static> {
    let mark = if task.completed { "[x]" } else { "[ ]" };
    let mark_style = if task.completed {
        Style::default().fg(COLOR_SUCCESS)
    } else {
        Style::default().fg(COLOR_MUTED_DARK)
    };
    let id_text = pad_text(&task.id.to_string(), ID_WIDTH);
    let text_width = width.saturating_sub(ID_WIDTH + 6);
    let text_style = if task.completed {
        Style::default()
            .fg(COLOR_MUTED_DARK)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(COLOR_TEXT)
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(mark, mark_style),
        Span::raw(" "),
        Span::styled(id_text, id_style()),
        Span::raw(" "),
        Span::styled(truncate_text(&task.text, text_width), text_style),
    ];

    if selected {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }

    Line::from(spans)
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let hint_span = Span::styled(app.footer_hint(), Style::default().fg(COLOR_INFO));
    let line = if let Some((status, kind)) = app.status_line() {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status, status_style),
        ])
    } else {
        Line::from(hint_span)
    };

    let active = app.store.active_count();
    let noun = if active == 1 { "item" } else { "items" };
    let counts_line = Line::from(Span::styled(
        format!("{active} {noun} left"),
        Style::default().fg(COLOR_ACCENT),
    ));

    let widget = Paragraph::new(vec![line, counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_BORDER_LIST)),
        );
    frame.render_widget(widget, area);
}

fn render_delete_confirm_modal(frame: &mut Frame, area: Rect, state: &DeleteConfirmState) {
    let content_width = area.width.saturating_sub(8).min(56);
    let height = 8u16.min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let text_width = (content_width as usize).saturating_sub(8);
    let lines = vec![
        Line::from(Span::styled(
            "Delete task?",
            Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("ID: ", Style::default().fg(COLOR_MUTED_DARK)),
            Span::styled(state.task_id.to_string(), id_style()),
        ]),
        Line::from(vec![
            Span::styled("Text: ", Style::default().fg(COLOR_MUTED_DARK)),
            Span::styled(
                truncate_text(&state.text, text_width),
                Style::default().fg(COLOR_TEXT),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "y/enter confirm  esc/q cancel",
            Style::default().fg(COLOR_MUTED_DARK),
        )),
    ];

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Delete Task"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_help_modal(frame: &mut Frame, area: Rect) {
    let content_width = area.width.saturating_sub(6).min(48);
    let entries = [
        ("a / i", "add a task"),
        ("j/k", "move selection"),
        ("space / x", "toggle active and completed"),
        ("d", "delete selected task"),
        ("c", "clear completed tasks"),
        ("1/2/3", "filter all/active/completed"),
        ("tab", "cycle filter"),
        ("r", "reload from disk"),
        ("q / esc", "quit"),
    ];
    let height = (entries.len() as u16 + 3).min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let width = (content_width as usize).saturating_sub(2);
    let mut lines: Vec<Line<'static>> = Vec::new();
    for (keys, desc) in entries {
        lines.push(help_line(keys, desc, width));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "any key to close",
        Style::default().fg(COLOR_MUTED_DARK),
    )));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn help_line(keys: &str, desc: &str, width: usize) -> Line<'static> {
    let key_text = pad_text(keys, HELP_KEY_WIDTH.min(width));
    let desc_width = width.saturating_sub(HELP_KEY_WIDTH + 1);
    Line::from(vec![
        Span::styled(
            key_text,
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            truncate_text(desc, desc_width),
            Style::default().fg(COLOR_MUTED),
        ),
    ])
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn id_style() -> Style {
    Style::default()
        .fg(COLOR_MUTED)
        .add_modifier(Modifier::BOLD)
}

fn pad_text(value: &str, width: usize) -> String {
    let mut text = value.to_string();
    if text.len() > width {
        text = truncate_text(&text, width);
    }
    format!("{text:width$}")
}

fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}
