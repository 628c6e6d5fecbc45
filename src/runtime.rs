use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub const TICK_RATE_MS: u64 = 100;

/// Everything the quiz loop reacts to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

impl QuizEvent {
    /// Keep key presses and resizes; drop releases, mouse and focus events
    pub fn from_terminal(event: CtEvent) -> Option<Self> {
        match event {
            CtEvent::Key(key) if key.kind != KeyEventKind::Release => Some(QuizEvent::Key(key)),
            CtEvent::Resize(_, _) => Some(QuizEvent::Resize),
            _ => None,
        }
    }

    pub fn key(code: KeyCode) -> Self {
        QuizEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// Esc or Ctrl-C, on any screen
    pub fn is_quit(&self) -> bool {
        match self {
            QuizEvent::Key(key) => {
                key.code == KeyCode::Esc
                    || (key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c'))
            }
            _ => false,
        }
    }
}

pub trait QuizEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError>;
}

/// Reads the terminal on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<QuizEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let Ok(raw) = event::read() else {
                break;
            };
            let Some(evt) = QuizEvent::from_terminal(raw) else {
                continue;
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Drives feedback flash expiry
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed event source for headless runs
pub struct TestEventSource {
    rx: Receiver<QuizEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<QuizEvent>) -> Self {
        Self { rx }
    }

    /// Replays `events` in order, then only ticks
    pub fn scripted(events: impl IntoIterator<Item = QuizEvent>) -> Self {
        let (tx, rx) = mpsc::channel();
        for evt in events {
            // The receiver is alive right here, so sending cannot fail
            let _ = tx.send(evt);
        }
        Self { rx }
    }
}

impl QuizEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: QuizEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: QuizEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> QuizEvent {
        self.event_source
            .recv_timeout(self.ticker.interval())
            .unwrap_or(QuizEvent::Tick)
    }
}
