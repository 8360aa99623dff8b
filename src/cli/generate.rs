//! The `generate` and `render` commands.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::core::header::{CppOptions, OutputFormat, VersionInfo, render_version_info};
use crate::core::output::{self, WriteOutcome};
use crate::core::template::Template;

/// Result of a `generate` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated {
    /// Rendered text for stdout (no output path configured).
    Stdout(String),
    /// Output written, or left alone because it was identical.
    File {
        /// Where the output lives.
        path: PathBuf,
        /// What happened to it.
        outcome: WriteOutcome,
    },
    /// `--check` found the output current.
    UpToDate(PathBuf),
    /// `--check` found the output missing or different.
    Stale(PathBuf),
}

/// Read and parse a template file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid template.
pub fn read_template(path: &Path) -> anyhow::Result<Template> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("reading template {}: {e}", path.display()))?;
    Template::parse(&source).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
}

/// Render `info` using the configured template and format.
///
/// # Errors
///
/// Returns an error if the values are invalid for the format or the template
/// references an unknown placeholder.
pub fn render_with_config(config: &Config, info: &VersionInfo) -> anyhow::Result<String> {
    let template = config.load_template()?;
    Ok(render_version_info(
        info,
        config.output.format,
        template.as_ref(),
        &config.cpp,
    )?)
}

/// Render explicitly given values, for the `render` command.
///
/// # Errors
///
/// Returns an error if the template cannot be loaded or rendering fails.
pub fn render_explicit(
    info: &VersionInfo,
    format: OutputFormat,
    template: Option<&Path>,
    cpp: &CppOptions,
) -> anyhow::Result<String> {
    let template = template.map(read_template).transpose()?;
    Ok(render_version_info(info, format, template.as_ref(), cpp)?)
}

/// Resolve, render and emit version info for a project.
///
/// # Errors
///
/// Returns an error if resolution, rendering or writing fails.
pub fn generate(
    config: &Config,
    info: &VersionInfo,
    output: Option<&Path>,
    check: bool,
) -> anyhow::Result<Generated> {
    let rendered = render_with_config(config, info)?;

    let Some(path) = output.map(Path::to_path_buf).or_else(|| config.output_path()) else {
        if check {
            anyhow::bail!("--check needs an output path");
        }
        return Ok(Generated::Stdout(rendered));
    };

    if check {
        return Ok(if output::is_up_to_date(&path, &rendered)? {
            Generated::UpToDate(path)
        } else {
            Generated::Stale(path)
        });
    }

    let outcome = output::write_if_changed(&path, &rendered)?;
    Ok(Generated::File { path, outcome })
}
