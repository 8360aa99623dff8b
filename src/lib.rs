//! verstamp - version-information source generation.
//!
//! Build tooling calls verstamp once per build to turn a release version,
//! a commit hash and a "modified" flag into a compilable source file:
//! - a C++ header with include guard, namespaced constants
//! - or a Rust module for `include!` from `OUT_DIR`
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  ┌──────────┐  ┌─────────┐
//! │   CLI    │  │  Config  │  │   Git   │
//! └────┬─────┘  └────┬─────┘  └────┬────┘
//!      └─────────────┼─────────────┘
//!              ┌─────┴─────┐
//!              │  Header   │  VersionInfo -> Bindings
//!              └─────┬─────┘
//!              ┌─────┴─────┐
//!              │ Template  │  {{token}} substitution
//!              └───────────┘
//! ```

pub mod build_info;
pub mod cli;
pub mod config;
pub mod core;

pub use config::Config;
pub use crate::core::{
    Bindings, Error, GitInfo, OutputFormat, Result, Template, Version, VersionInfo,
    render_version_info,
};
