//! riskscan CLI
//!
//! Configuration loading and the scan driver behind the `riskscan` binary.

pub mod cli;
pub mod config;
pub mod runner;

pub use cli::Cli;
pub use config::{FetchConfig, ScanConfig};
pub use runner::{
    RunReport, ScanEvent, ScanRunner, StageError, SubjectOutcome, SubjectState, SubjectStatus,
};
