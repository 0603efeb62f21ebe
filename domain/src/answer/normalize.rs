//! Canonical answer normalization.
//!
//! The pipeline is a fixed sequence of stages, evaluated in order on every
//! call:
//!
//! 1. strip markdown emphasis (`**b**`, `*i*`, `_u_`)
//! 2. collapse whitespace runs, trim
//! 3. trim leading/trailing `. , ! ? ; :`
//! 4. lower-case
//! 5. frequency phrase table (substring, first entry wins, replaces all)
//! 6. percentage phrase table (substring, first entry wins, replaces all)
//! 7. whole-string number word ("zero".."twenty")
//! 8. strip answer preambles ("the answer is ", "answer: ", ...)
//! 9. drop everything from the first `.`
//! 10. trim punctuation and spaces
//! 11. lone letter `a`-`e` as a whole word wins
//! 12. otherwise a numeric token wins when there is more than one token
//!
//! The stages run repeatedly until the text stops changing, so every
//! canonical answer is a fixed point: `"The answer is three"` only becomes
//! a bare number word after stage 8, and the next pass maps it to `"3"`.
//!
//! Stage 9 also cuts decimal answers such as `"$4.50"` down to `"$4"`.
//! Stages 5 and 6 match substrings anywhere in the answer, so an unrelated
//! answer mentioning "monthly" canonicalizes to `"12"`.

use regex::Regex;
use std::sync::LazyLock;

/// Frequency phrases and their per-year count, in priority order.
pub const FREQUENCY_PHRASES: &[(&str, &str)] = &[
    ("quarterly", "4"),
    ("four times a year", "4"),
    ("4 times a year", "4"),
    ("four times per year", "4"),
    ("4 times per year", "4"),
    ("every quarter", "4"),
    ("every 3 months", "4"),
    ("semi-annually", "2"),
    ("twice a year", "2"),
    ("2 times a year", "2"),
    ("twice per year", "2"),
    ("2 times per year", "2"),
    ("every 6 months", "2"),
    ("annually", "1"),
    ("once a year", "1"),
    ("1 time a year", "1"),
    ("yearly", "1"),
    ("monthly", "12"),
    ("12 times a year", "12"),
    ("twelve times a year", "12"),
];

/// Spelled-out percentages, in priority order.
///
/// "twenty-five percent" precedes "five percent", which it contains.
pub const PERCENTAGE_PHRASES: &[(&str, &str)] = &[
    ("fifty percent", "50%"),
    ("twenty-five percent", "25%"),
    ("ten percent", "10%"),
    ("five percent", "5%"),
    ("one percent", "1%"),
    ("zero percent", "0%"),
];

/// Number words replaced only when they are the entire answer.
pub const NUMBER_WORDS: &[(&str, &str)] = &[
    ("zero", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
    ("eleven", "11"),
    ("twelve", "12"),
    ("thirteen", "13"),
    ("fourteen", "14"),
    ("fifteen", "15"),
    ("sixteen", "16"),
    ("seventeen", "17"),
    ("eighteen", "18"),
    ("nineteen", "19"),
    ("twenty", "20"),
];

/// Upper bound on pipeline passes
const MAX_PASSES: usize = 8;

const EDGE_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];
const FINAL_TRIM: &[char] = &['.', ',', '!', '?', ';', ':', ' '];

static BOLD: LazyLock<Regex> = LazyLock::new(|| pattern(r"\*\*([^*]+)\*\*"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| pattern(r"\*([^*]+)\*"));
static UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| pattern(r"_([^_]+)_"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\s+"));

/// Cleanup patterns applied one after another, each at most once.
static CLEANUP: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^the answer is\s*",
        r"(?i)^the correct answer is\s*",
        r"(?i)^answer:\s*",
        r"(?i)^correct answer:\s*",
        r"(?i)^based on.*?the.*?answer is\s*",
        r"(?i)^according to.*?the.*?answer is\s*",
        r"\..*$",
    ]
    .into_iter()
    .map(pattern)
    .collect()
});

static LETTER: LazyLock<Regex> = LazyLock::new(|| pattern(r"\b([a-e])\b"));
static NUMBER: LazyLock<Regex> = LazyLock::new(|| pattern(r"\b(\d+(?:\.\d+)?%?)\b"));

fn pattern(re: &str) -> Regex {
    // Patterns are compile-time literals covered by the tests below.
    Regex::new(re).unwrap_or_else(|e| panic!("invalid normalization pattern {re:?}: {e}"))
}

/// Normalize a raw provider answer into its canonical comparable form.
///
/// Total and deterministic: empty input yields an empty string.
///
/// # Example
///
/// ```
/// use triplecheck_domain::normalize;
///
/// assert_eq!(normalize("**A**"), "a");
/// assert_eq!(normalize("The answer is Quarterly."), "4");
/// assert_eq!(normalize("five percent"), "5%");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut current = normalize_pass(raw);
    for _ in 1..MAX_PASSES {
        let next = normalize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// One run of stages 1-12
fn normalize_pass(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let stripped = BOLD.replace_all(raw, "$1");
    let stripped = ITALIC.replace_all(&stripped, "$1");
    let stripped = UNDERSCORE.replace_all(&stripped, "$1");

    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let mut normalized = collapsed
        .trim()
        .trim_matches(EDGE_PUNCTUATION)
        .to_lowercase();

    if let Some(count) = first_contained(&normalized, FREQUENCY_PHRASES) {
        normalized = count.to_string();
    }

    if let Some(percent) = first_contained(&normalized, PERCENTAGE_PHRASES) {
        normalized = percent.to_string();
    }

    if let Some((_, digits)) = NUMBER_WORDS.iter().find(|(word, _)| normalized == *word) {
        normalized = digits.to_string();
    }

    for cleanup in CLEANUP.iter() {
        normalized = cleanup.replace(&normalized, "").into_owned();
    }

    let mut normalized = normalized.trim_matches(FINAL_TRIM).to_string();

    if let Some(letter) = LETTER.captures(&normalized).and_then(|c| c.get(1)) {
        normalized = letter.as_str().to_string();
    }

    if normalized.split_whitespace().count() > 1
        && let Some(number) = NUMBER.captures(&normalized).and_then(|c| c.get(1))
    {
        normalized = number.as_str().to_string();
    }

    normalized
}

fn first_contained(haystack: &str, table: &'static [(&str, &str)]) -> Option<&'static str> {
    table
        .iter()
        .find(|(phrase, _)| haystack.contains(phrase))
        .map(|(_, canonical)| *canonical)
}
