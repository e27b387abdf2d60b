//! Modal dialogs drawn over the home screen.

use crate::colors;
use crate::state::{MenuOption, OptionsMenuState, RenamePromptState};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

/// Centered rect of at most `width` x `height`, cleared for drawing.
fn dialog_area(f: &mut Frame, width: u16, height: u16) -> Rect {
    let area = f.area();
    let dialog_width = width.min(area.width.saturating_sub(4));
    let dialog_height = height.min(area.height);
    let dialog_x = (area.width.saturating_sub(dialog_width)) / 2;
    let dialog_y = (area.height.saturating_sub(dialog_height)) / 2;

    let dialog_area = Rect::new(dialog_x, dialog_y, dialog_width, dialog_height);
    f.render_widget(Clear, dialog_area);
    dialog_area
}

fn dialog_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {title} "))
        .style(Style::default().bg(colors::SURFACE_HIGH))
        .border_style(Style::default().fg(colors::PRIMARY))
}

pub fn render_options_menu(f: &mut Frame, menu: &OptionsMenuState) {
    #[allow(clippy::cast_possible_truncation)]
    let height = MenuOption::ALL.len() as u16 + 4;
    let area = dialog_area(f, 40, height);

    let block = dialog_block(&menu.app_name);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = MenuOption::ALL
        .iter()
        .enumerate()
        .map(|(i, option)| {
            if i == menu.selected {
                Line::from(Span::styled(
                    format!("> {}", option.label()),
                    Style::default()
                        .fg(colors::ON_SURFACE)
                        .bg(colors::PRIMARY_CONTAINER)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!("  {}", option.label()),
                    Style::default().fg(colors::ON_SURFACE),
                ))
            }
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Enter", Style::default().fg(colors::PRIMARY)),
        Span::styled(": select  ", Style::default().fg(colors::SUBTEXT)),
        Span::styled("Esc", Style::default().fg(colors::ERROR)),
        Span::styled(": close", Style::default().fg(colors::SUBTEXT)),
    ]));

    f.render_widget(Paragraph::new(lines), inner);
}

/// Terminal column for a char cursor, clamped to the last column of `inner`.
fn cursor_column(inner: Rect, cursor: usize) -> u16 {
    let offset = u16::try_from(cursor).unwrap_or(u16::MAX);
    inner
        .x
        .saturating_add(offset)
        .min(inner.right().saturating_sub(1))
}

pub fn render_rename_prompt(f: &mut Frame, prompt: &RenamePromptState) {
    let area = dialog_area(f, 50, 7);

    let block = dialog_block("Rename");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let input_line = if prompt.input.is_empty() {
        Line::from(Span::styled(
            &prompt.current_name,
            Style::default()
                .fg(colors::OUTLINE)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled(
            &prompt.input,
            Style::default().fg(colors::ON_SURFACE),
        ))
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("Current: {}", prompt.current_name),
            Style::default().fg(colors::SUBTEXT),
        )),
        input_line,
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(colors::PRIMARY)),
            Span::styled(": confirm  ", Style::default().fg(colors::SUBTEXT)),
            Span::styled("Esc", Style::default().fg(colors::ERROR)),
            Span::styled(": cancel", Style::default().fg(colors::SUBTEXT)),
        ]),
    ];
    f.render_widget(Paragraph::new(lines), inner);

    if inner.height > 1 {
        f.set_cursor_position((cursor_column(inner, prompt.cursor), inner.y + 1));
    }
}
