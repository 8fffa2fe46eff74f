//! Turning a finished archive into a self-executing file.
//!
//! The pipeline renders a launcher preamble, prepends it to the archive with
//! every offset repaired, verifies the written file, marks it executable and
//! renames it into place. An optional install step copies it elsewhere.
//!
//! # Example
//!
//! ```no_run
//! use binjar_build::{BuildConfig, BuildRequest, build};
//!
//! let config = BuildConfig {
//!     entry_point: Some("hello.core".to_string()),
//!     version: Some("0.3.1".to_string()),
//!     ..BuildConfig::default()
//! };
//! let request = BuildRequest::new("target/hello-standalone.jar", "target", config);
//! let outcome = build(&request).unwrap();
//! println!("{}", outcome.artifact.display());
//! ```

pub mod config;
mod error;
pub mod pipeline;
pub mod publish;

pub use config::{BuildConfig, CONFIG_FILE_NAME};
pub use error::{BuildError, ErrorKind, Result};
pub use pipeline::{BuildOutcome, BuildRequest, build};
