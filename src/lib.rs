//! Fetch an image from a URL, decode it, and publish the outcome.
//!
//! [`fetch::ImageFetchController`] is the core: it runs one cancellable
//! fetch-and-decode at a time and guarantees that only the most recently
//! started fetch can publish a status. Everything else is plumbing around
//! it: configuration, logging, a connectivity indicator and a terminal
//! front end.

pub mod cli;
pub mod config;
pub mod connectivity;
pub mod fetch;
pub mod logging;
