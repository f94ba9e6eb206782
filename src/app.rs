use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::composer::Composer;
use crate::config::AppConfig;
use crate::i18n::Locale;
use crate::picker::dismiss::{is_outside, DismissRegistry};
use crate::picker::PromptPicker;
use crate::prompt::{CatalogStore, Prompt};
use crate::support;
use crate::ui::layout::{dropdown_list, dropdown_rect, Areas};

/// How long a status message stays on the info line
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Longest name given to a prompt saved from the composer
const SAVED_NAME_MAX: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Settings,
    Help,
}

/// Entries of the settings menu, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    Language,
    SupportLink,
}

pub const SETTINGS_ITEMS: [SettingsItem; 2] = [SettingsItem::Language, SettingsItem::SupportLink];

const LOCALE_CODES: [&str; 3] = ["en", "zh-CN", "ja"];

pub struct App {
    pub popup: Popup,
    pub settings_selected: usize,

    /// Set when the user asks to leave from an idle composer
    pub should_quit: bool,

    pub composer: Composer,
    pub picker: PromptPicker,
    pub store: CatalogStore,
    pub dismiss: DismissRegistry,

    /// Messages sent this session (local only)
    pub transcript: Vec<String>,

    pub config: AppConfig,
    pub config_path: PathBuf,
    pub locale: Locale,

    /// Frame size as of the last draw
    pub viewport: Rect,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
}

impl App {
    pub fn new(config: AppConfig, config_path: PathBuf) -> Self {
        let store = CatalogStore::new(config.prompts.clone());
        let dismiss = DismissRegistry::new();
        let picker = PromptPicker::new(store.subscribe(), dismiss.clone(), config.picker.max_visible);
        let locale = Locale::from_code(&config.locale);

        Self {
            popup: Popup::None,
            settings_selected: 0,
            should_quit: false,
            composer: Composer::new(),
            picker,
            store,
            dismiss,
            transcript: Vec::new(),
            config,
            config_path,
            locale,
            viewport: Rect::default(),
            status_message: None,
            status_message_time: None,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn areas(&self) -> Areas {
        Areas::compute(self.viewport, self.config.picker.composer, self.composer.line_count())
    }

    /// Where the open dropdown is drawn
    pub fn dropdown_area(&self) -> Rect {
        let width = self
            .picker
            .filtered()
            .iter()
            .map(|p| p.name.chars().count())
            .max()
            .unwrap_or(0);
        dropdown_rect(
            self.viewport,
            self.areas().trigger,
            self.picker.placement(),
            self.picker.visible_len(),
            width,
        )
    }

    /// Periodic housekeeping between events
    pub fn tick(&mut self) {
        if self
            .status_message_time
            .is_some_and(|t| t.elapsed() >= STATUS_TIMEOUT)
        {
            self.status_message = None;
            self.status_message_time = None;
        }
        self.picker.sync_catalog();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        if self.picker.is_open() {
            return self.handle_picker_key(key);
        }

        self.handle_composer_key(key)
    }

    fn handle_composer_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Enter
                if key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
            {
                self.composer.insert_newline();
            }
            KeyCode::Enter => self.submit(),

            // No popup and no picker: Esc leaves the app
            KeyCode::Esc => self.should_quit = true,

            // Slash on an empty line opens the prompt library
            KeyCode::Char('/') if self.composer.is_empty() => self.open_picker(),
            KeyCode::Char('p') if ctrl => self.open_picker(),
            KeyCode::Char('s') if ctrl => self.save_buffer_as_prompt()?,
            KeyCode::Char('r') if ctrl => self.reload_config(),

            KeyCode::F(1) => self.popup = Popup::Help,
            KeyCode::F(2) => {
                self.settings_selected = 0;
                self.popup = Popup::Settings;
            }

            KeyCode::Backspace => self.composer.backspace(),
            KeyCode::Delete => self.composer.delete(),
            KeyCode::Left => self.composer.move_left(),
            KeyCode::Right => self.composer.move_right(),
            KeyCode::Home => self.composer.move_home(),
            KeyCode::End => self.composer.move_end(),
            KeyCode::Char(c) if !ctrl => self.composer.insert_char(c),

            _ => {}
        }
        Ok(())
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.picker.close(),
            KeyCode::Enter => self.commit_selection(None),
            KeyCode::Down | KeyCode::Tab => self.picker.move_down(),
            KeyCode::Up | KeyCode::BackTab => self.picker.move_up(),
            KeyCode::Char('n') if ctrl => self.picker.move_down(),
            KeyCode::Char('p') if ctrl => self.picker.move_up(),
            KeyCode::Char('d') if ctrl => self.delete_highlighted_prompt()?,
            KeyCode::Backspace => self.picker.pop_char(),
            KeyCode::Char(c) if !ctrl => self.picker.push_char(c),
            _ => {}
        }
        Ok(())
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter) {
                    self.popup = Popup::None;
                }
            }
            Popup::Settings => match key.code {
                KeyCode::Esc | KeyCode::F(2) => self.popup = Popup::None,
                KeyCode::Down => {
                    self.settings_selected = (self.settings_selected + 1) % SETTINGS_ITEMS.len();
                }
                KeyCode::Up => {
                    self.settings_selected = self
                        .settings_selected
                        .checked_sub(1)
                        .unwrap_or(SETTINGS_ITEMS.len() - 1);
                }
                KeyCode::Enter | KeyCode::Char(' ') => self.activate_setting()?,
                _ => {}
            },
            Popup::None => {}
        }
        Ok(())
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        let trigger = self.areas().trigger;
        let on_trigger = trigger.contains(Position::new(column, row));

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if on_trigger && self.popup == Popup::None {
                    self.picker.toggle(trigger.y, self.viewport.height);
                } else if self.picker.is_open() {
                    let dropdown = self.dropdown_area();
                    if self.dismiss.is_listening() && is_outside(&[dropdown, trigger], column, row) {
                        tracing::debug!("Click outside prompt picker at {},{}", column, row);
                        self.picker.close();
                    } else {
                        let list = dropdown_list(dropdown);
                        if list.contains(Position::new(column, row)) {
                            let offset = usize::from(row - list.y);
                            let index = self.picker.visible().nth(offset).map(|(i, _)| i);
                            if index.is_some() {
                                self.commit_selection(index);
                            }
                        }
                    }
                }
            }
            MouseEventKind::ScrollDown if self.picker.is_open() => self.picker.move_down(),
            MouseEventKind::ScrollUp if self.picker.is_open() => self.picker.move_up(),
            _ => {}
        }
    }

    fn open_picker(&mut self) {
        let trigger = self.areas().trigger;
        self.picker.open(trigger.y, self.viewport.height);
    }

    /// Insert the chosen prompt (highlighted one when `index` is None)
    fn commit_selection(&mut self, index: Option<usize>) {
        let cursor = self.composer.cursor();
        let insertion = match index {
            Some(i) => self.picker.select_index(i, cursor),
            None => self.picker.select(cursor),
        };
        if let Some(insertion) = insertion {
            self.composer.apply_insertion(&insertion);
        }
    }

    fn submit(&mut self) {
        if self.composer.content().trim().is_empty() {
            return;
        }
        let message = self.composer.take();
        tracing::info!("Message added to transcript ({} chars)", message.chars().count());
        self.transcript.push(message);
    }

    /// Store the current buffer as a new prompt named after its first line
    fn save_buffer_as_prompt(&mut self) -> Result<()> {
        let content = self.composer.content().to_string();
        let Some(first_line) = content.lines().map(str::trim).find(|l| !l.is_empty()) else {
            self.set_status("Nothing to save");
            return Ok(());
        };

        let name: String = first_line.chars().take(SAVED_NAME_MAX).collect();
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let id = format!("user-{}-{}", stamp, self.store.snapshot().len());

        self.store.add(Prompt::new(id, name.clone(), content))?;
        self.persist_catalog();
        self.set_status(format!("Saved prompt '{}'", name));
        Ok(())
    }

    fn delete_highlighted_prompt(&mut self) -> Result<()> {
        let Some(id) = self.picker.highlighted().map(|p| p.id.clone()) else {
            return Ok(());
        };
        let removed = self.store.remove(&id)?;
        // Catalog changed: the picker resets its query and view
        self.picker.sync_catalog();
        self.persist_catalog();
        self.set_status(format!("Deleted prompt '{}'", removed.name));
        Ok(())
    }

    fn persist_catalog(&mut self) {
        self.config.prompts = self.store.snapshot().as_ref().clone();
        if let Err(e) = self.config.save_to(&self.config_path) {
            tracing::warn!("Failed to save config: {}", e);
            self.set_status(format!("Could not save config: {}", e));
        }
    }

    fn reload_config(&mut self) {
        let config = AppConfig::load_from(&self.config_path);
        self.locale = Locale::from_code(&config.locale);
        self.store.replace(config.prompts.clone());
        let count = config.prompts.len();
        self.config = config;
        tracing::debug!(
            "Config reloaded, {} catalog subscribers notified",
            self.store.subscriber_count()
        );
        let noun = if count == 1 { "prompt" } else { "prompts" };
        self.set_status(format!("Reloaded {} {}", count, noun));
    }

    fn activate_setting(&mut self) -> Result<()> {
        match SETTINGS_ITEMS[self.settings_selected] {
            SettingsItem::Language => {
                let current = LOCALE_CODES
                    .iter()
                    .position(|code| Locale::from_code(code) == self.locale)
                    .unwrap_or(0);
                let next = LOCALE_CODES[(current + 1) % LOCALE_CODES.len()];
                self.locale = Locale::from_code(next);
                self.config.locale = next.to_string();
                if let Err(e) = self.config.save_to(&self.config_path) {
                    tracing::warn!("Failed to save config: {}", e);
                }
            }
            SettingsItem::SupportLink => {
                support::open_link()?;
                self.set_status(format!("Opened {}", support::SUPPORT_URL));
            }
        }
        Ok(())
    }
}
