// themelab: live theme editor in the terminal

use std::fs::{self, File};
use std::io;
use std::sync::Mutex;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use themelab::config::{self, Config, ConfigError, LOG_ENV};
use themelab::fonts::{FontCatalog, JsonFileCatalog, StaticCatalog};
use themelab::persistence::{FileStore, PersistenceBridge};
use themelab::studio::Studio;
use themelab::ui::App;

fn init_logging(config: &Config) -> io::Result<()> {
    fs::create_dir_all(&config.data_dir)?;
    let file = File::create(config.log_path())?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let program_name = std::env::args()
        .next()
        .unwrap_or_else(|| "themelab".to_string());

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(ConfigError::HelpRequested) => {
            eprint!("{}", config::usage(&program_name));
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprint!("{}", config::usage(&program_name));
            std::process::exit(2);
        }
    };

    init_logging(&config)?;
    info!(data_dir = %config.data_dir.display(), "starting themelab");

    let persistence = PersistenceBridge::with_quiet_period(
        Box::new(FileStore::new(&config.data_dir)),
        config.debounce,
    );
    let fonts: Box<dyn FontCatalog> = match &config.font_catalog {
        Some(path) => Box::new(JsonFileCatalog::new(path)),
        None => Box::new(StaticCatalog::common()),
    };
    let studio = Studio::open(persistence, fonts);

    // Headless export
    if let Some(path) = &config.export {
        let source = studio.export_source();
        if source.is_empty() {
            eprintln!("Error: the composed theme cannot be exported (see the log)");
            std::process::exit(1);
        }
        fs::write(path, source)?;
        eprintln!("Exported theme to {}", path.display());
        return Ok(());
    }

    let export_path = config.data_dir.join("theme.js");

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(studio, export_path);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
