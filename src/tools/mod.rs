//! The tools module provides the collaborators around the codec core.
//!
//! - cli: command line parsing and logger setup for the rle binary.
//! - mapped: memory mapped byte ranges over input and output files.

pub mod cli;
pub mod mapped;
