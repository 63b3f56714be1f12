mod session;

pub use session::{LessonSession, SessionOptions};
