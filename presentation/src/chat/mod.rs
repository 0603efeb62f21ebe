//! Interactive capture mode
//!
//! Each submitted line (or `/image <path>`) is one capture action and
//! starts one round.

mod repl;

pub use repl::CaptureRepl;
