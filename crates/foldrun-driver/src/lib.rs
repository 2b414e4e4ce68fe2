//! foldrun-driver — Runs a directory of AlphaFold3 job documents through the
//! prediction executable, one at a time.
//!
//! The flow is linear:
//! 1. Validate the model-parameter directory
//! 2. Create (if needed) and probe the output directory
//! 3. Resolve the prediction executable
//! 4. Discover job documents in the input directory
//! 5. Invoke the executable once per document
//! 6. Decide the batch verdict from the invocation outcomes

pub mod config;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod preflight;
pub mod runner;

pub use config::{FailurePolicy, RunConfig};
pub use discovery::JobSpec;
pub use driver::{BatchDriver, BatchReport, JobOutcome};
pub use error::{DriverError, Result};
pub use runner::{Af3Runner, JobStatus, PredictionRunner};
