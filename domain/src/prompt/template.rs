//! Prompt templates for answer providers

/// Templates framing a captured question as a "value only" task
pub struct AnswerPromptTemplate;

impl AnswerPromptTemplate {
    /// System prompt shared by chat-style backends
    pub fn system() -> &'static str {
        "You are an assistant and finance expert that analyzes multiple choice questions and determines the correct answer."
    }

    /// Formatting rules appended to every question
    pub fn formatting_rules() -> &'static str {
        r#"Formatting rules:
- If the choices are lettered, respond with the letter only (A, B, C, D or E).
- If the answer is a number, respond with the bare number.
- If the answer is a time period or frequency, respond with a short standard phrase (e.g. "quarterly").
- If the answer is a percentage, respond as N%.
- If the answer is a currency amount, respond as $N."#
    }

    /// User prompt for a captured question
    pub fn answer_query(question: &str) -> String {
        format!(
            r#"This contains a multiple choice question. Identify the correct choice or value. Respond with the value only, no explanation needed.

{}

{}"#,
            Self::formatting_rules(),
            question
        )
    }

    /// Single-message prompt for backends with search grounding and no
    /// separate system role
    pub fn grounded_query(question: &str) -> String {
        format!(
            r#"{}

Using the latest accurate information from search results, identify the correct choice or value. Respond with the value only, no explanation needed.

{}

Question: {}"#,
            Self::system(),
            Self::formatting_rules(),
            question
        )
    }
}
