mod app;
mod composer;
mod config;
mod error;
mod i18n;
mod picker;
mod prompt;
mod support;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::AppConfig;
use i18n::Locale;
use prompt::{filter_prompts, insert_at_cursor, CatalogStore};

#[derive(Parser, Debug)]
#[command(name = "promptpick")]
#[command(version)]
#[command(about = "A terminal chat composer with a slash-command prompt library")]
struct Args {
    /// Use this config file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the prompt library as JSON
    #[arg(short, long)]
    list: bool,

    /// Print prompt names ranked against a search query
    #[arg(short, long, value_name = "QUERY")]
    filter: Option<String>,

    /// Insert a prompt (by id or name) into text read from stdin
    #[arg(short, long, value_name = "PROMPT")]
    insert: Option<String>,

    /// Char offset for --insert (defaults to the end of the input)
    #[arg(long, requires = "insert")]
    cursor: Option<usize>,

    /// Open the project page in the browser
    #[arg(long)]
    support: bool,
}

impl Args {
    fn wants_tui(&self) -> bool {
        !self.list && self.filter.is_none() && self.insert.is_none() && !self.support
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match args.config.clone() {
        Some(path) => path,
        None => AppConfig::config_path()?,
    };
    init_logging(args.wants_tui(), &config_path);

    let config = AppConfig::load_from(&config_path);

    // Handle CLI-only commands
    if args.list {
        return print_library(&config);
    }

    if let Some(query) = &args.filter {
        return print_filtered(&config, query);
    }

    if let Some(key) = &args.insert {
        return insert_prompt(&config, key, args.cursor);
    }

    if args.support {
        return open_support(&config);
    }

    // Run TUI
    ui::init_theme(theme::Theme::from_config(&config.theme));
    run_tui(config, config_path)
}

/// The TUI owns the terminal, so its logs go to a file next to the config
/// in use. CLI commands log to stderr.
fn init_logging(tui: bool, config_path: &Path) {
    let log_file = if tui {
        let dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)
            .and_then(|()| std::fs::File::create(log_path(config_path)))
            .ok()
    } else {
        None
    };

    let file_layer = log_file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
    });
    let stderr_layer = (!tui).then(|| tracing_subscriber::fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

fn log_path(config_path: &Path) -> PathBuf {
    config_path.with_file_name("promptpick.log")
}

fn print_library(config: &AppConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&config.prompts)?);
    Ok(())
}

fn print_filtered(config: &AppConfig, query: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for prompt in filter_prompts(&config.prompts, query) {
        writeln!(stdout, "{}\t{}", prompt.id, prompt.name)?;
    }
    Ok(())
}

fn insert_prompt(config: &AppConfig, key: &str, cursor: Option<usize>) -> Result<()> {
    let store = CatalogStore::new(config.prompts.clone());
    let prompt = store
        .get(key)
        .ok_or_else(|| error::Error::UnknownPrompt(key.to_string()))?;

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let cursor = cursor.unwrap_or_else(|| buffer.chars().count());

    tracing::debug!("Inserting '{}' at {} into {} chars", prompt.name, cursor, buffer.len());
    print!("{}", insert_at_cursor(&buffer, cursor, &prompt.prompt));
    io::stdout().flush()?;
    Ok(())
}

fn open_support(config: &AppConfig) -> Result<()> {
    println!("{}  {}", support::label(Locale::from_code(&config.locale)), support::SUPPORT_URL);
    support::open_link()?;
    Ok(())
}

fn run_tui(config: AppConfig, config_path: PathBuf) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, config_path);
    tracing::info!("Starting promptpick with {} prompts", app.store.snapshot().len());

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        let size = terminal.size()?;
        app.viewport = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                    match key.code {
                        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return Ok(()),
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key) {
                                tracing::warn!("Key handling failed: {}", e);
                                app.set_status(format!("Error: {}", e));
                            }
                            if app.should_quit {
                                return Ok(());
                            }
                        }
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        app.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_sits_next_to_config() {
        assert_eq!(
            log_path(Path::new("/tmp/custom/promptpick.toml")),
            PathBuf::from("/tmp/custom/promptpick.log")
        );
        assert_eq!(log_path(Path::new("config.toml")), PathBuf::from("promptpick.log"));
    }
}
