//! Answer canonicalization
//!
//! - [`normalize`] maps a free-text provider answer to the canonical token
//!   used for agreement comparison.
//! - [`extract_short_answer_line`] is the best-effort cleanup some providers
//!   apply to their own raw output before returning it. It is independent of
//!   normalization and never used for comparison.

mod extract;
mod normalize;

pub use extract::extract_short_answer_line;
pub use normalize::{FREQUENCY_PHRASES, NUMBER_WORDS, PERCENTAGE_PHRASES, normalize};
