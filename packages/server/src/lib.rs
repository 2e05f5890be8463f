// Website Compliance Screener - API Core
//
// This crate provides the backend API for automated business-compliance
// screening of websites: scrape, summarize, flag-screen, classify, and
// extract/validate registration details and a physical address, all run
// as asynchronous background jobs.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
