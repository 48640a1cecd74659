//! Human-readable rendering of coverage analyses.
//!
//! - `markdown`: the full report written to disk and echoed to stdout
//! - `terminal`: a short colored recap

pub mod markdown;
pub mod terminal;

pub use markdown::render_report;
pub use terminal::render_terminal_summary;
