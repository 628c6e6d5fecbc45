// Library surface shared by the binary and the integration tests.
pub mod adaptive;
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod feedback;
pub mod kana;
pub mod quiz;
pub mod random;
pub mod reverse_mode;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod ui;
pub mod util;

pub use error::{QuizError, Result};
