use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use kanaquiz::{
    app::{App, AppAction},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    feedback::{BellFeedback, Feedback, SilentFeedback},
    kana::{describe_groups, Pool, Script},
    quiz::GameMode,
    runtime::{CrosstermEventSource, FixedTicker, QuizEvent, Runner},
    session::{QuizSession, SessionConfig},
    stats::{MemoryStats, StatsDb, StatsSink},
    ui::screen::current_screen,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// adaptive kana drills in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Adaptive kana drills in the terminal. Characters you miss come back more often, the number of answer options grows with your streak, and the quiz flips to romaji-to-kana once you are on a roll."
)]
pub struct Cli {
    /// kana scripts to drill (comma separated)
    #[clap(short = 'S', long = "script", value_enum, value_delimiter = ',')]
    scripts: Option<Vec<Script>>,

    /// groups to drill: a kind (base, dakuon, yoon), a row name (ka, sha, ...) or all
    #[clap(short = 'g', long = "group", value_delimiter = ',')]
    groups: Option<Vec<String>>,

    /// pick a single answer, or build a word tile by tile
    #[clap(short = 'm', long, value_enum)]
    mode: Option<GameMode>,

    /// number of characters per word in word mode
    #[clap(short = 'w', long)]
    word_length: Option<usize>,

    /// fewest answer options shown
    #[clap(long)]
    min_options: Option<usize>,

    /// most answer options shown
    #[clap(long)]
    max_options: Option<usize>,

    /// whether a wrong answer closes the question (defaults: pick false, word true)
    #[clap(long)]
    wrong_ends_question: Option<bool>,

    /// never ask romaji -> kana
    #[clap(long, conflicts_with = "reverse")]
    no_reverse: bool,

    /// allow romaji -> kana questions once on a streak
    #[clap(long)]
    reverse: bool,

    /// ring the terminal bell on wrong answers
    #[clap(long, conflicts_with = "no_bell")]
    bell: bool,

    /// stay quiet on wrong answers
    #[clap(long)]
    no_bell: bool,

    /// print the available kana groups and exit
    #[clap(long)]
    list_groups: bool,

    /// write per-character statistics as CSV to FILE and exit
    #[clap(long, value_name = "FILE")]
    export_stats: Option<PathBuf>,

    /// delete all recorded statistics and exit
    #[clap(long)]
    clear_stats: bool,
}

impl Cli {
    /// Layer command line overrides on top of the stored config
    fn apply(&self, cfg: &mut Config) {
        if let Some(scripts) = &self.scripts {
            cfg.scripts = scripts.clone();
        }
        if let Some(groups) = &self.groups {
            cfg.groups = groups.clone();
        }
        if let Some(mode) = self.mode {
            cfg.game_mode = mode;
        }
        if let Some(len) = self.word_length {
            cfg.word_length = len;
        }
        if let Some(min) = self.min_options {
            cfg.difficulty.min_options = min;
        }
        if let Some(max) = self.max_options {
            cfg.difficulty.max_options = max;
        }
        if self.wrong_ends_question.is_some() {
            cfg.wrong_ends_question = self.wrong_ends_question;
        }
        if self.no_reverse {
            cfg.reverse_mode.enabled = false;
        }
        if self.reverse {
            cfg.reverse_mode.enabled = true;
        }
        if self.bell {
            cfg.bell = true;
        }
        if self.no_bell {
            cfg.bell = false;
        }
    }

    fn list_scripts(&self) -> Vec<Script> {
        self.scripts
            .clone()
            .unwrap_or_else(|| vec![Script::Hiragana, Script::Katakana])
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    if cli.list_groups {
        for script in cli.list_scripts() {
            for line in describe_groups(script)? {
                println!("{line}");
            }
        }
        return Ok(());
    }

    if cli.clear_stats {
        StatsDb::open_default()?.clear_all_stats()?;
        info!("statistics cleared");
        println!("statistics cleared");
        return Ok(());
    }

    if let Some(path) = &cli.export_stats {
        let rows = StatsDb::open_default()?.export_csv(path)?;
        info!(rows, path = %path.display(), "statistics exported");
        println!("wrote {rows} characters to {}", path.display());
        return Ok(());
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply(&mut config);

    let session_config = SessionConfig::from(&config);
    if let Err(e) = session_config.validate() {
        Cli::command().error(ErrorKind::ValueValidation, e).exit();
    }
    let pool = match Pool::from_selection(&config.scripts, &config.groups) {
        Ok(pool) => pool,
        Err(e) => Cli::command().error(ErrorKind::InvalidValue, e).exit(),
    };
    if let Err(e) = store.save(&config) {
        warn!(path = %store.path().display(), error = %e, "failed to save config");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let stats_path = StatsDb::default_path();
    let (stats, stats_path): (Box<dyn StatsSink>, Option<PathBuf>) =
        match StatsDb::open(&stats_path) {
            Ok(db) => (Box::new(db), Some(stats_path)),
            Err(e) => {
                warn!(error = %e, "stats database unavailable, keeping stats in memory");
                (Box::new(MemoryStats::new()), None)
            }
        };
    let feedback: Box<dyn Feedback> = if config.bell {
        Box::new(BellFeedback::stdout())
    } else {
        Box::new(SilentFeedback)
    };
    let session = QuizSession::new(session_config, pool)?
        .with_stats(stats)
        .with_feedback(feedback);
    let mut app = App::new(session, stats_path)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(
        questions = app.session.summary().questions,
        accuracy = app.session.summary().accuracy(),
        "quiz finished"
    );
    result
}

/// stdout belongs to the TUI, so logs go to a file in the state dir
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

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "kanaquiz=info".into()))
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init();
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = runner.step();
        // Idle ticks only repaint while a flash is counting down
        let redraw = !matches!(event, QuizEvent::Tick) || app.flash.is_some();

        if app.handle_event(event)? == AppAction::Quit {
            break;
        }
        if redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    current_screen(&app.state).render(app, f);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_leave_config_untouched() {
        let cli = Cli::parse_from(["kanaquiz"]);
        let mut cfg = Config::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg, Config::default());
        assert!(!cli.list_groups);
        assert!(cli.export_stats.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "kanaquiz",
            "-S",
            "hiragana,katakana",
            "-g",
            "dakuon,sha",
            "-m",
            "word",
            "-w",
            "2",
            "--max-options",
            "5",
            "--wrong-ends-question",
            "false",
            "--no-reverse",
            "--bell",
        ]);
        let mut cfg = Config::default();
        cli.apply(&mut cfg);

        assert_eq!(cfg.scripts, vec![Script::Hiragana, Script::Katakana]);
        assert_eq!(cfg.groups, vec!["dakuon".to_string(), "sha".to_string()]);
        assert_eq!(cfg.game_mode, GameMode::Word);
        assert_eq!(cfg.word_length, 2);
        assert_eq!(cfg.difficulty.max_options, 5);
        assert_eq!(cfg.wrong_ends_question, Some(false));
        assert!(!cfg.reverse_mode.enabled);
        assert!(cfg.bell);
    }

    #[test]
    fn test_cli_can_turn_stored_flags_back_off() {
        let mut cfg = Config {
            bell: true,
            ..Config::default()
        };
        cfg.reverse_mode.enabled = false;
        Cli::parse_from(["kanaquiz", "--no-bell", "--reverse"]).apply(&mut cfg);
        assert!(!cfg.bell);
        assert!(cfg.reverse_mode.enabled);
    }

    #[test]
    fn test_cli_rejects_conflicting_flags() {
        assert!(Cli::try_parse_from(["kanaquiz", "--bell", "--no-bell"]).is_err());
        assert!(Cli::try_parse_from(["kanaquiz", "--reverse", "--no-reverse"]).is_err());
        assert!(Cli::try_parse_from(["kanaquiz", "-m", "typing"]).is_err());
    }

    #[test]
    fn test_list_scripts_defaults_to_both() {
        let cli = Cli::parse_from(["kanaquiz", "--list-groups"]);
        assert_eq!(cli.list_scripts(), vec![Script::Hiragana, Script::Katakana]);
        let cli = Cli::parse_from(["kanaquiz", "--list-groups", "-S", "katakana"]);
        assert_eq!(cli.list_scripts(), vec![Script::Katakana]);
    }

    #[test]
    fn test_cli_command_is_valid() {
        Cli::command().debug_assert();
    }
}
