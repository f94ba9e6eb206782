//! Prompt picker dropdown and settings menu entries

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use super::{accent, bg_selected, danger, inactive, text, text_dim};
use crate::app::{App, SettingsItem};
use crate::i18n::{Key, Locale};
use crate::support;

pub fn draw_prompt_dropdown(f: &mut Frame, app: &App) {
    let area = app.dropdown_area();
    if area.height < 3 || area.width < 4 {
        return;
    }
    let picker = &app.picker;

    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Search input
            Constraint::Min(0),    // List
        ])
        .split(inner);

    let title = Paragraph::new(Span::styled(
        app.locale.t(Key::PromptLibrary),
        Style::default().fg(accent()).add_modifier(Modifier::BOLD),
    ));
    f.render_widget(title, chunks[0]);

    let search = if picker.query().is_empty() {
        Line::from(vec![
            Span::styled("/ ", Style::default().fg(accent())),
            Span::styled(app.locale.t(Key::Search), Style::default().fg(text_dim())),
        ])
    } else {
        Line::from(vec![
            Span::styled("/ ", Style::default().fg(accent())),
            Span::styled(picker.query(), Style::default().fg(text())),
        ])
    };
    f.render_widget(
        Paragraph::new(search).style(Style::default().bg(bg_selected())),
        chunks[1],
    );

    // Focus stays in the search input while open
    let cursor_x = chunks[1].x + 2 + picker.query().chars().count() as u16;
    if cursor_x < chunks[1].right() {
        f.set_cursor_position((cursor_x, chunks[1].y));
    }

    let items: Vec<ListItem> = if picker.filtered().is_empty() {
        vec![ListItem::new(Span::styled(
            app.locale.t(Key::NoMatches),
            Style::default().fg(text_dim()),
        ))]
    } else {
        picker
            .visible()
            .map(|(i, prompt)| {
                let style = if i == picker.selected() {
                    Style::default().bg(bg_selected()).fg(text())
                } else {
                    Style::default().fg(text())
                };
                ListItem::new(Span::raw(prompt.name.as_str())).style(style)
            })
            .collect()
    };
    f.render_widget(List::new(items), chunks[2]);
}

/// One line of the settings menu
pub fn settings_line(item: SettingsItem, locale: Locale, selected: bool) -> Line<'static> {
    let row_style = if selected {
        Style::default().bg(bg_selected())
    } else {
        Style::default()
    };

    let line = match item {
        SettingsItem::Language => Line::from(vec![
            Span::styled("  󰗊 ", Style::default().fg(accent())),
            Span::styled(language_name(locale), Style::default().fg(text())),
        ]),
        SettingsItem::SupportLink => Line::from(vec![
            Span::styled(format!("  {} ", support::HEART), Style::default().fg(danger())),
            Span::styled(
                locale.t(Key::OriginalRepo).to_string(),
                Style::default().fg(text()),
            ),
            Span::styled(format!("  {}", support::SUPPORT_URL), Style::default().fg(inactive())),
        ]),
    };
    line.style(row_style)
}

fn language_name(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "English",
        Locale::ZhCn => "简体中文",
        Locale::Ja => "日本語",
    }
}

/// Render `lines` centered inside `area` with a titled border
pub fn draw_boxed(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'_>>) {
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), Style::default().fg(accent())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
