pub mod archive;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod period;
pub mod prompt;
pub mod session;
pub mod stats;
