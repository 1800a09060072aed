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
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
};
use typeterm::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, ModeKind},
    engine::SessionEngine,
    error::SessionError,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    session::{FinishReason, SessionState},
};

/// terminal typing test with live wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing test. Type the words shown, space or enter submits a word. Runs until the time or word limit is reached; TAB restarts, ESC quits."
)]
pub struct Cli {
    /// end the test after a fixed time or after a number of words
    #[clap(short = 'm', long, value_enum)]
    mode: Option<ModeKind>,

    /// number of seconds to run a time test [default: 60]
    #[clap(short = 's', long)]
    seconds: Option<u64>,

    /// number of words in a words test [default: 50]
    #[clap(short = 'w', long)]
    words: Option<usize>,

    /// seed for a repeatable word sequence
    #[clap(long)]
    seed: Option<u64>,

    /// custom word list, one word per line
    #[clap(long)]
    wordlist: Option<PathBuf>,

    /// remember mode, seconds, words and wordlist as the new defaults
    #[clap(long)]
    save_defaults: bool,
}

impl Cli {
    /// Layer the command line over saved settings
    fn apply(&self, mut config: Config) -> Config {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(seconds) = self.seconds {
            config.seconds = seconds;
        }
        if let Some(words) = self.words {
            config.words = words;
        }
        if let Some(ref wordlist) = self.wordlist {
            config.wordlist = Some(wordlist.clone());
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_defaults {
        match store.save(&config) {
            Ok(()) => log::info!("saved defaults to {}", store.path().display()),
            Err(err) => log::warn!("could not save defaults: {err}"),
        }
    }

    let mut engine = match SessionEngine::new(config.session_config(cli.seed)) {
        Ok(engine) => engine,
        Err(err) => {
            let kind = match err {
                SessionError::InvalidConfiguration(_) => ErrorKind::InvalidValue,
                _ => ErrorKind::Io,
            };
            Cli::command().error(kind, err).exit()
        }
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut engine);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    engine: &mut SessionEngine,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        let snapshot = engine.snapshot();
        terminal.draw(|f| f.render_widget(&snapshot, f.area()))?;

        runner.step_engine(engine);

        if engine.state() == SessionState::Finished(FinishReason::UserQuit) {
            break;
        }
    }

    Ok(())
}

/// Log to a file; the terminal belongs to the UI. Logging stays off if the
/// file cannot be opened.
fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    env_logger::Builder::from_env(env_logger::Env::default().filter_or("TYPETERM_LOG", "warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}
