pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod output;
pub mod run;
