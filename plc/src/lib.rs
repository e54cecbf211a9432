//! Library side of the `plc` binary: CLI definition, crawl driver, JSON
//! persistence and LaTeX rendering. Exposed for the xtask and for testing.
pub mod cli;
pub mod crawl;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod utils;
