use crate::model::TaskRecord;
use crate::tui::dialog::{DialogState, LineEditor, TextInput};
use crate::tui::state::{AppState, HELP_MESSAGE};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    // --- Task List ---
    let task_items: Vec<ListItem> = state
        .tasks
        .iter()
        .map(|t| {
            let style = if state.in_flight.contains(&t.id) {
                Style::default().fg(Color::DarkGray)
            } else if t.due_date.is_some() {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![Span::styled(task_line(t), style)]))
        })
        .collect();

    let title = if state.loading {
        " Tasks (Loading...) ".to_string()
    } else {
        format!(" Tasks ({}) ", state.tasks.len())
    };
    let task_list = List::new(task_items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        );
    f.render_stateful_widget(task_list, v_chunks[0], &mut state.list_state);

    // --- Footer ---
    let f_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(v_chunks[1]);
    let status_color = if state.message.starts_with("Error") {
        Color::Red
    } else {
        Color::Cyan
    };
    let status = Paragraph::new(state.message.clone())
        .style(Style::default().fg(status_color))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                .title(" Status "),
        );
    let help = Paragraph::new(HELP_MESSAGE)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                .title(" Actions "),
        );
    f.render_widget(status, f_chunks[0]);
    f.render_widget(help, f_chunks[1]);

    // --- Dialog ---
    if let DialogState::DueDate(dialog) = &state.dialog {
        let area = f.area();
        render_due_date_dialog(f, area, dialog.input());
    }
}

fn task_line(t: &TaskRecord) -> String {
    let due_str = match (t.due_datetime, t.due_date) {
        (Some(dt), _) => format!(" ({})", dt.format("%d/%m %H:%M")),
        (None, Some(d)) => format!(" ({})", d.format("%d/%m")),
        (None, None) => String::new(),
    };
    let recur_str = if t.is_recurring { " (R)" } else { "" };
    let deadline_str = match t.deadline {
        Some(d) => format!(" !{}", d.format("%d/%m")),
        None => String::new(),
    };
    format!("{}{}{}{}", t.content, due_str, recur_str, deadline_str)
}

pub fn render_due_date_dialog(f: &mut Frame, area: Rect, input: &TextInput) {
    let dialog_area = centered_rect(60, 5, area);
    f.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Set Due Date ")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(dialog_area);
    f.render_widget(block, dialog_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let prefix = "> ";
    let prefix_width = prefix.chars().count();
    let visible = (rows[0].width as usize).saturating_sub(prefix_width + 1).max(1);
    let scroll = input_scroll(input.cursor(), visible);
    let shown: String = input.text().chars().skip(scroll).take(visible).collect();
    let field = Paragraph::new(format!("{}{}", prefix, shown))
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(field, rows[0]);

    let hints = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Green)),
        Span::raw(" Set | "),
        Span::styled("Empty", Style::default().fg(Color::Yellow)),
        Span::raw(" Clear | "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]));
    f.render_widget(hints, rows[1]);

    let offset = u16::try_from(prefix_width + input.cursor() - scroll).unwrap_or(u16::MAX);
    let cursor_x = rows[0].x.saturating_add(offset);
    let max_x = rows[0].x + rows[0].width.saturating_sub(1);
    f.set_cursor_position((cursor_x.min(max_x), rows[0].y));
}

/// First character shown so that a cursor at `cursor` stays inside `visible` columns.
fn input_scroll(cursor: usize, visible: usize) -> usize {
    (cursor + 1).saturating_sub(visible)
}

/// A `width_pct`-wide, `height`-tall rect centered in `area`, clipped to it.
fn centered_rect(width_pct: u16, height: u16, area: Rect) -> Rect {
    let width = ((area.width as u32 * width_pct as u32 / 100) as u16)
        .max(20)
        .min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
