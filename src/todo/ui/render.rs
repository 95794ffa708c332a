use crate::todo::ui::presenter::{
    DELETE_LABEL, EMPTY_PLACEHOLDER, Focus, INPUT_PLACEHOLDER, ItemView, Presenter, SUBMIT_LABEL,
    ViewState,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Draws the title, the input form, the task list and the help line.
pub fn draw_ui(f: &mut Frame, presenter: &Presenter) {
    let view = presenter.view();
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(3), // input form
            Constraint::Min(1),    // list
            Constraint::Length(1), // help
        ])
        .split(size);

    draw_title(f, &view, chunks[0]);
    draw_form(f, &view, chunks[1]);
    draw_list(f, &view, chunks[2]);

    let help = Paragraph::new(help_text(&view.focus))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[3]);
}

fn draw_title(f: &mut Frame, view: &ViewState, area: Rect) {
    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            view.title.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            view.date.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(title, area);
}

fn draw_form(f: &mut Frame, view: &ViewState, area: Rect) {
    let focused = view.focus == Focus::Input;
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Blue)
    };
    let block = Block::default()
        .title(INPUT_PLACEHOLDER)
        .title_bottom(Line::from(format!("[{}]", SUBMIT_LABEL)).right_aligned())
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);

    let text_width = Span::raw(view.input.as_str()).width();
    let (scroll, cursor_offset) = input_window(text_width, inner.width);

    let input = if view.input.is_empty() {
        Paragraph::new(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(view.input.clone()).scroll((0, scroll))
    };
    f.render_widget(block, area);
    f.render_widget(input, inner);

    if focused {
        f.set_cursor_position(Position {
            x: inner.x.saturating_add(cursor_offset),
            y: inner.y,
        });
    }
}

/// Horizontal scroll and cursor column for a single-line input `box_width` cells wide.
/// Long input scrolls so its tail and the cursor stay inside the box.
fn input_window(text_width: usize, box_width: u16) -> (u16, u16) {
    let width = u16::try_from(text_width).unwrap_or(u16::MAX);
    let last_column = box_width.saturating_sub(1);
    let scroll = width.saturating_sub(last_column);
    (scroll, width - scroll)
}

fn draw_list(f: &mut Frame, view: &ViewState, area: Rect) {
    let horizontal_line = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::Blue));
    let inner = horizontal_line.inner(area);
    f.render_widget(horizontal_line, area);

    if view.items.is_empty() {
        let placeholder = Paragraph::new(EMPTY_PLACEHOLDER)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(placeholder, inner);
        return;
    }

    let list_focused = view.focus != Focus::Input;
    let items: Vec<ListItem> = view
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let selected = list_focused && i == view.selected;
            let editing = match &view.focus {
                Focus::Editing { id, text } if *id == item.id => Some(text.as_str()),
                _ => None,
            };
            let style = if selected {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format_item(item, editing)).style(style)
        })
        .collect();

    f.render_widget(List::new(items), inner);
}

/// One row: checkbox, text (struck through when complete), delete control.
fn format_item(item: &ItemView, editing: Option<&str>) -> Line<'static> {
    let checkbox = if item.complete { "[x] " } else { "[ ] " };
    let text = match editing {
        Some(text) => Span::styled(
            format!("{text}_"),
            Style::default().fg(Color::Yellow),
        ),
        None if item.complete => Span::styled(
            item.text.clone(),
            Style::default().add_modifier(Modifier::CROSSED_OUT),
        ),
        None => Span::raw(item.text.clone()),
    };

    Line::from(vec![
        Span::raw(checkbox),
        text,
        Span::raw("  "),
        Span::styled(
            format!("[{}]", DELETE_LABEL),
            Style::default().fg(Color::Red),
        ),
    ])
}

fn help_text(focus: &Focus) -> &'static str {
    match focus {
        Focus::Input => "Type a task | Enter to submit | Tab to go to the list | Ctrl+C to quit",
        Focus::List => {
            "'j'/'k' to move | Space to toggle | 'e' to edit | 'd' to delete | Tab to add | 'q' to quit"
        }
        Focus::Editing { .. } => "Editing | Enter to save | Esc to cancel",
    }
}
