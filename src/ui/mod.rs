//! User interface components for the devguard CLI
//!
//! Interactive terminals get colors and unicode symbols; CI runs and piped
//! output get plain text.

pub mod output;

pub use output::Printer;
