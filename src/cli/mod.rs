//! Terminal front end.

pub mod args;
pub mod session;
pub mod view;

pub use args::Cli;
pub use session::{Command, LoadOutcome, Session};
