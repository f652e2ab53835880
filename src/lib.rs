//! Episode Organizer Library
//!
//! Discovers episodic video files (and RAR archives holding them), derives
//! their `season NN/sNNeNN.ext` location from the file name, and copies,
//! links or moves them there on a pool of workers.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod utils;

pub use error::{Error, Result};
