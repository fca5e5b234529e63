use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::info;

use spellbee::{
    app::App,
    app_dirs::AppDirs,
    catalog::Catalog,
    config::{Config, ConfigStore, FileConfigStore, ListMode},
    controls::{dispatch, Controls},
    kv_store::FileKeyValueStore,
    logging::{init_logging, LogConfig},
    runtime::{transcript_sink, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    speech::CommandSpeech,
    ui::Screen,
    word_list_store::{SingleListStore, WordListStore, WordLists},
};

const TICK_RATE_MS: u64 = 100;

/// spelling practice: hear a word, type or say it, check it
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Spelling practice in the terminal. A random word from the active list is spoken aloud; type it (or say it) and check whether you got it right. Manage built-in and custom word lists."
)]
pub struct Cli {
    /// keep one word list instead of several named lists
    #[clap(long)]
    single_list: bool,

    /// directory holding the saved word lists
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// config file to read (and write with --save-config)
    #[clap(long)]
    config: Option<PathBuf>,

    /// locale used for speaking and listening
    #[clap(long)]
    locale: Option<String>,

    /// speech synthesis program, called as `<cmd> -v <voice> -s <wpm> <word>`
    #[clap(long)]
    speak_command: Option<String>,

    /// speech recognition program that prints one transcript line on stdout
    #[clap(long)]
    listen_command: Option<String>,

    /// write logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// more logging (-v info, -vv debug, -vvv trace)
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// persist the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Flags given on the command line win over the config file
    fn apply_to(&self, cfg: &mut Config) {
        if self.single_list {
            cfg.list_mode = ListMode::Single;
        }
        if let Some(locale) = &self.locale {
            cfg.locale.clone_from(locale);
        }
        if self.speak_command.is_some() {
            cfg.speak_command.clone_from(&self.speak_command);
        }
        if self.listen_command.is_some() {
            cfg.listen_command.clone_from(&self.listen_command);
        }
    }

    fn log_config(&self) -> LogConfig {
        let file = self
            .log_file
            .clone()
            .or_else(|| (self.verbose > 0).then(AppDirs::log_path).flatten());
        LogConfig::from_verbosity(self.verbose, file)
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn build_lists(cli: &Cli, cfg: &Config) -> Result<Box<dyn WordLists>, Box<dyn Error>> {
    let kv = match &cli.data_dir {
        Some(dir) => FileKeyValueStore::with_dir(dir),
        None => FileKeyValueStore::new(),
    };
    let catalog = Catalog::bundled()?;
    Ok(match cfg.list_mode {
        ListMode::Multi => Box::new(WordListStore::load(kv, catalog)?),
        ListMode::Single => Box::new(SingleListStore::load(kv, catalog)?),
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(&cli.log_config())?;

    let config_store = cli.config_store();
    let mut cfg = config_store.load();
    cli.apply_to(&mut cfg);
    if cli.save_config {
        config_store.save(&cfg)?;
    }
    info!(mode = %cfg.list_mode, locale = %cfg.locale, "starting");

    let lists = build_lists(&cli, &cfg)?;
    let events = CrosstermEventSource::new();
    let speech = CommandSpeech::new(cfg.speak_command.clone(), cfg.listen_command.clone());
    let mut app = App::new(
        lists,
        Box::new(speech),
        cfg,
        transcript_sink(events.sender()),
    );
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let mut controls = Controls::new();

    loop {
        let view = app.view();
        terminal.draw(|f| f.render_widget(Screen::new(&view, &controls), f.area()))?;

        if !dispatch(app, &mut controls, runner.step()) {
            break;
        }
    }

    Ok(())
}
