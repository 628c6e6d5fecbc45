pub mod game;
pub mod pick;
pub mod question;
pub mod word_building;

pub use game::{build_options, grade, QuizGame};
pub use pick::PickGame;
pub use question::{AnswerOutcome, GameMode, Orientation, Question, QuizRound};
pub use word_building::{WordBuildingGame, DEFAULT_WORD_LENGTH};
