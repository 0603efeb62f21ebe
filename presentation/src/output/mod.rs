//! Output formatting for round results

pub mod console;
