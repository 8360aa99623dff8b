//! Core logic shared by the CLI and library callers.
//!
//! Rendering ([`header`], [`template`]) is pure. Git and filesystem access
//! live in [`git`] and [`output`].

mod error;
pub mod git;
pub mod header;
pub mod output;
pub mod template;
pub mod version;

pub use error::{Error, Result};
pub use git::GitInfo;
pub use header::{OutputFormat, VersionInfo, render_version_info};
pub use template::{Bindings, Template, TemplateError};
pub use version::Version;
