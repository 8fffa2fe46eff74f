//! Launcher preambles for self-executing archives.
//!
//! A preamble is a short polyglot script, valid both as a POSIX shell script
//! and as a Windows batch file, that starts the runtime on the file it is
//! part of.
//!
//! # Example
//!
//! ```
//! use binjar_preamble::{RenderContext, RuntimeOptions, TemplateChoice, render, resolve_template};
//!
//! let template = resolve_template(&TemplateChoice::default()).unwrap();
//! let options = RuntimeOptions::default();
//! let preamble = render(
//!     &template,
//!     &RenderContext {
//!         name: "app",
//!         version: "1.0.0",
//!         main: "app.core",
//!         options: &options,
//!     },
//! );
//! assert!(preamble.as_bytes().starts_with(b":;exec java "));
//! ```

mod error;
pub mod options;
mod render;
pub mod template;

pub use error::{PreambleError, Result};

pub use options::{DEFAULT_RUNTIME_OPTIONS, RuntimeOptions};

pub use render::{Preamble, RenderContext, render};

pub use template::{Template, TemplateChoice, TemplateSource, resolve_template};
