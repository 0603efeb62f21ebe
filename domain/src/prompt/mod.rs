//! Prompt domain
//!
//! Instructional preambles sent to every answer provider.

mod template;

pub use template::AnswerPromptTemplate;
