pub mod quiz_question;
pub mod study_session;
pub use quiz_question::{OptionLabel, QuizQuestion, RecordError};
pub use study_session::StudySession;
