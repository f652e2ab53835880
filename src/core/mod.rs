//! Core business logic modules.

pub mod aggregator;
pub mod archive;
pub mod classifier;
pub mod executor;
pub mod materializer;
pub mod parser;
pub mod planner;
pub mod scanner;
