//! Provider-side short answer cleanup.

const ANSWER_LETTERS: &[char] = &['A', 'B', 'C', 'D', 'E'];

/// Reduce a verbose provider reply to a short answer-like line.
///
/// Replies of at most 5 characters are returned trimmed. Longer replies are
/// scanned line by line for the first line of at most 3 characters that
/// contains one of the letters `A`-`E` (case-insensitive); when none is found
/// the trimmed reply is returned unchanged.
///
/// # Example
///
/// ```
/// use triplecheck_domain::extract_short_answer_line;
///
/// assert_eq!(extract_short_answer_line("Looking at the options:\nB)\nbecause..."), "B)");
/// assert_eq!(extract_short_answer_line(" C "), "C");
/// ```
pub fn extract_short_answer_line(answer: &str) -> &str {
    let answer = answer.trim();
    if answer.chars().count() <= 5 {
        return answer;
    }

    answer
        .lines()
        .map(str::trim)
        .find(|line| {
            line.chars().count() <= 3
                && line
                    .to_uppercase()
                    .chars()
                    .any(|c| ANSWER_LETTERS.contains(&c))
        })
        .unwrap_or(answer)
}
