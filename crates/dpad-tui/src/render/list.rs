//! Home screen rendering: title, app rows and footer.

use crate::app::LauncherApp;
use crate::colors;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

pub fn render_home(f: &mut Frame, app: &mut LauncherApp) {
    let bg_block = Block::default().style(Style::default().bg(colors::BG));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let header = Paragraph::new(Span::styled(
        &app.title,
        Style::default()
            .fg(colors::ON_SURFACE)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(colors::SURFACE))
            .border_style(Style::default().fg(colors::PRIMARY)),
    );
    f.render_widget(header, chunks[0]);

    let list_block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.row_count()))
        .style(Style::default().bg(colors::SURFACE))
        .border_style(Style::default().fg(colors::OUTLINE));
    app.list_area = list_block.inner(chunks[1]);

    if app.row_count() == 0 {
        let empty = Paragraph::new(Span::styled(
            "No apps to show",
            Style::default().fg(colors::SUBTEXT),
        ))
        .alignment(Alignment::Center)
        .block(list_block);
        f.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = app
            .apps
            .visible()
            .map(|a| {
                ListItem::new(Span::styled(
                    a.display_name(),
                    Style::default().fg(colors::ON_SURFACE),
                ))
            })
            .collect();

        let list = List::new(items)
            .block(list_block)
            .highlight_style(
                Style::default()
                    .bg(colors::SURFACE_HIGH)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        f.render_stateful_widget(list, chunks[1], &mut app.list_state);
    }

    let footer = Paragraph::new(Line::from(build_footer_spans(app))).block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(colors::SURFACE))
            .border_style(Style::default().fg(colors::OUTLINE)),
    );
    f.render_widget(footer, chunks[2]);
}

fn build_footer_spans(app: &LauncherApp) -> Vec<Span<'_>> {
    if let Some(notice) = &app.notice {
        return vec![Span::styled(
            &notice.message,
            Style::default().fg(colors::WARNING),
        )];
    }

    vec![
        Span::styled("Enter", Style::default().fg(colors::PRIMARY)),
        Span::styled(": open  ", Style::default().fg(colors::SUBTEXT)),
        Span::styled("m", Style::default().fg(colors::PRIMARY)),
        Span::styled(": options  ", Style::default().fg(colors::SUBTEXT)),
        Span::styled("r", Style::default().fg(colors::PRIMARY)),
        Span::styled(": refresh  ", Style::default().fg(colors::SUBTEXT)),
        Span::styled("q", Style::default().fg(colors::PRIMARY)),
        Span::styled(": quit", Style::default().fg(colors::SUBTEXT)),
    ]
}
