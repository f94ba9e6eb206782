mod components;
pub mod layout;

use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Popup, SETTINGS_ITEMS};
use crate::i18n::Key;
use crate::theme::Theme;

// Theme is fixed for the whole session once the config is read
static THEME: OnceLock<Theme> = OnceLock::new();

pub fn init_theme(theme: Theme) {
    if THEME.set(theme).is_err() {
        tracing::debug!("Theme already initialized");
    }
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn danger() -> Color { theme().danger }
fn inactive() -> Color { theme().inactive }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }

pub fn draw(f: &mut Frame, app: &App) {
    let areas = app.areas();

    draw_info_line(f, app, areas.info);
    draw_transcript(f, app, areas.transcript);
    draw_composer(f, app, areas.composer, areas.trigger);
    draw_footer(f, app, areas.footer);

    if app.picker.is_open() {
        components::draw_prompt_dropdown(f, app);
    }

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Settings => draw_settings_popup(f, app),
        Popup::Help => draw_help_popup(f, app),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status_message {
        Some(msg) => Line::from(Span::styled(format!(" {}", msg), Style::default().fg(accent()))),
        None => Line::from(vec![
            Span::styled(" promptpick", Style::default().fg(accent()).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(
                    " │ {}: {}",
                    app.locale.t(Key::PromptLibrary),
                    app.store.snapshot().len()
                ),
                Style::default().fg(text_dim()),
            ),
        ]),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_transcript(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for message in &app.transcript {
        for (i, l) in message.split('\n').enumerate() {
            let marker = if i == 0 { "› " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(accent())),
                Span::styled(l.to_string(), Style::default().fg(text())),
            ]));
        }
        lines.push(Line::from(""));
    }

    // Keep the newest messages in view
    let scroll = lines.len().saturating_sub(area.height as usize) as u16;
    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(transcript, area);
}

fn draw_composer(f: &mut Frame, app: &App, area: Rect, trigger: Rect) {
    let is_active = app.popup == Popup::None && !app.picker.is_open();
    let border_color = if is_active { accent() } else { inactive() };

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", app.locale.t(Key::Message)),
            Style::default().fg(border_color),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);

    let (row, col) = app.composer.cursor_row_col();
    let scroll = (row as u16).saturating_sub(inner.height.saturating_sub(1));

    let content = Paragraph::new(app.composer.content())
        .style(Style::default().fg(text()))
        .block(block)
        .scroll((scroll, 0));
    f.render_widget(content, area);

    let trigger_style = if app.picker.is_open() {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(accent())
    };
    f.render_widget(Paragraph::new(Span::styled("[/]", trigger_style)), trigger);

    if is_active {
        let x = inner.x + (col as u16).min(inner.width.saturating_sub(1));
        let y = inner.y + row as u16 - scroll;
        f.set_cursor_position((x, y));
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: &[(&str, &str)] = if app.picker.is_open() {
        &[("↑/↓", "nav"), ("Enter", "insert"), ("^D", "delete"), ("Esc", "close")]
    } else {
        &[
            ("/", "prompts"),
            ("Enter", "send"),
            ("Alt+Enter", "newline"),
            ("^S", "save as prompt"),
            ("F1", "help"),
            ("F2", "settings"),
        ]
    };

    let mut spans = Vec::new();
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(inactive())));
        }
        spans.push(Span::styled(*key, Style::default().fg(accent())));
        spans.push(Span::styled(format!(" {}", label), Style::default().fg(text_dim())));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn draw_settings_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(if area.width < 100 { 95 } else { 70 }, 30, area);

    let mut lines = vec![Line::from("")];
    lines.extend(
        SETTINGS_ITEMS
            .iter()
            .enumerate()
            .map(|(i, item)| components::settings_line(*item, app.locale, i == app.settings_selected)),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Enter", Style::default().fg(accent())),
        Span::styled(" select │ ", Style::default().fg(text_dim())),
        Span::styled("Esc", Style::default().fg(accent())),
        Span::styled(" close", Style::default().fg(text_dim())),
    ]));

    components::draw_boxed(f, popup_area, app.locale.t(Key::Settings), lines);
}

fn draw_help_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 30 { 95 } else { 70 },
        area,
    );

    let heading = |s: &'static str| {
        Line::from(Span::styled(s, Style::default().fg(danger()).add_modifier(Modifier::BOLD)))
    };
    let entry = |key: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), Style::default().fg(accent())),
            Span::raw(what),
        ])
    };

    let help_text = vec![
        heading("═══ Composer ═══"),
        entry("Enter", "Send message"),
        entry("Alt+Enter", "New line"),
        entry("Ctrl+S", "Save message as a new prompt"),
        entry("Ctrl+R", "Reload config and prompt library"),
        entry("Ctrl+C/Q", "Quit"),
        entry("Esc", "Quit (when nothing is open)"),
        Line::from(""),
        heading("═══ Prompt Library ═══"),
        entry("/ or Ctrl+P", "Open (slash only on an empty message)"),
        entry("type", "Fuzzy search by name"),
        entry("↑/↓ Tab", "Move selection"),
        entry("Enter/click", "Insert at the cursor on its own line"),
        entry("Ctrl+D", "Delete highlighted prompt"),
        entry("Esc/click", "Close (click outside the list)"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text).wrap(Wrap { trim: false });
    f.render_widget(ratatui::widgets::Clear, popup_area);
    f.render_widget(
        help.block(
            Block::default()
                .title(Span::styled(
                    format!(" 󰋖 {} ", app.locale.t(Key::Help)),
                    Style::default().fg(accent()),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        ),
        popup_area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::prompt::Prompt;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_draw_open_picker() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            prompts: vec![
                Prompt::new("1", "Alpha", "ALPHA"),
                Prompt::new("2", "Beta", "BETA"),
            ],
            ..Default::default()
        };
        let mut app = App::new(config, dir.path().join("config.toml"));
        app.viewport = Rect::new(0, 0, 80, 30);
        let trigger = app.areas().trigger;
        app.picker.open(trigger.y, app.viewport.height);
        app.picker.set_query("be");

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let screen = screen(&terminal);
        assert!(screen.contains("Prompt Library"));
        assert!(screen.contains("/ be"));
        assert!(screen.contains("Beta"));
        assert!(!screen.contains("Alpha"));
        assert!(screen.contains("[/]"));
    }

    #[test]
    fn test_draw_settings_shows_support_link() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(AppConfig::default(), dir.path().join("config.toml"));
        app.viewport = Rect::new(0, 0, 100, 30);
        app.popup = Popup::Settings;

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let screen = screen(&terminal);
        assert!(screen.contains("Original Repository"));
        assert!(screen.contains("github.com/ztjhz/KoalaClient"));
    }
}
