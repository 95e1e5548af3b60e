pub mod accumulator;
pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod renderer;
pub mod report_hash;
pub mod runner;
pub mod schema;
pub mod session;

#[cfg(test)]
mod test_util;
