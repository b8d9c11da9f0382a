//! Per-contestant accepted problems from Codeforces group standings pages.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod scraper;
pub mod server;
pub mod utils;
