//! Configuration management for verstamp.
//!
//! A global `config.toml` supplies shared defaults (for example the C++
//! version type a whole organisation uses). The project-local `verstamp.toml`
//! overrides every key it sets. Relative paths in either file resolve against
//! the directory that contains that file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::git::GitInfo;
use crate::core::header::{CppOptions, OutputFormat, VersionInfo};
use crate::core::template::Template;
use crate::core::version::{BuildNumber, DEFAULT_BUILD_NUMBER_ENV, DEV_BUILD_NUMBER, Version};

/// Name of the project-local configuration file.
pub const PROJECT_CONFIG_FILE: &str = "verstamp.toml";

/// Where and how the generated source is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputConfig {
    /// Output file; stdout when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Language of the generated source.
    pub format: OutputFormat,

    /// Custom template replacing the built-in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
}

/// A single configuration file as written: only the keys it sets.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    project: Option<String>,
    namespace: Option<String>,
    version_file: Option<PathBuf>,
    build_number_env: Option<String>,
    default_build: Option<u32>,
    hash_length: Option<usize>,
    #[serde(default)]
    output: OutputFile,
    #[serde(default)]
    cpp: CppFile,
}

#[derive(Debug, Default, Deserialize)]
struct OutputFile {
    path: Option<PathBuf>,
    format: Option<OutputFormat>,
    template: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct CppFile {
    version_type: Option<String>,
    version_include: Option<String>,
}

impl ConfigFile {
    /// Parse `path`, anchoring its relative paths to the file's directory.
    ///
    /// Returns the file and that (absolute) directory.
    fn read(path: &Path) -> anyhow::Result<(Self, PathBuf)> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
        let mut file: Self =
            toml::from_str(&contents).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let dir = std::path::absolute(parent)?;

        for relative in [
            &mut file.version_file,
            &mut file.output.path,
            &mut file.output.template,
        ]
        .into_iter()
        .flatten()
        {
            *relative = dir.join(&*relative);
        }

        tracing::debug!(path = %path.display(), "loaded config");
        Ok((file, dir))
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Project name; the include guard derives from it.
    pub project: String,

    /// Namespace (or Rust module) the constants live in. Defaults to the
    /// lower-cased project name.
    pub namespace: String,

    /// One-line `major.minor.point` release file.
    pub version_file: PathBuf,

    /// Environment variable carrying the CI build number.
    pub build_number_env: String,

    /// Build number when the variable is unset.
    pub default_build: u32,

    /// Abbreviate the commit hash to this many characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_length: Option<usize>,

    /// Output configuration.
    pub output: OutputConfig,

    /// C++ header options.
    pub cpp: CppOptions,

    /// Directory relative paths resolve against.
    #[serde(skip)]
    root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: String::new(),
            namespace: String::new(),
            version_file: PathBuf::from("mb_version"),
            build_number_env: DEFAULT_BUILD_NUMBER_ENV.to_string(),
            default_build: DEV_BUILD_NUMBER,
            hash_length: None,
            output: OutputConfig::default(),
            cpp: CppOptions::default(),
            root: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// Applies the global config first, then the project config from
    /// `project_path`, or `./verstamp.toml` when not given. Each key the
    /// project file sets wins, even when it restates the built-in default.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file cannot be read or parsed, or
    /// if an explicitly named project file does not exist.
    pub fn load(project_path: Option<&Path>) -> anyhow::Result<Self> {
        let default_project = Self::project_config_path()?;
        let project_path = project_path.map_or_else(|| default_project.clone(), Path::to_path_buf);

        if !project_path.exists() && project_path != default_project {
            anyhow::bail!("config file not found: {}", project_path.display());
        }

        Self::layered(&Self::config_path()?, &project_path)
    }

    /// Apply the global file, then the project file, skipping either when
    /// absent. The project file's directory becomes the root.
    fn layered(global_path: &Path, project_path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if global_path.exists() {
            let (global, _) = ConfigFile::read(global_path)?;
            config.apply(global);
        }

        if project_path.exists() {
            let (project, dir) = ConfigFile::read(project_path)?;
            config.apply(project);
            config.root = dir;
        }

        Ok(config)
    }

    /// Parse a single configuration file, rooted at its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let (file, dir) = ConfigFile::read(path)?;
        let mut config = Self::default();
        config.apply(file);
        config.root = dir;
        Ok(config)
    }

    /// Get the project-local configuration file path.
    ///
    /// Looks for `verstamp.toml` in the current directory.
    pub fn project_config_path() -> anyhow::Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(cwd.join(PROJECT_CONFIG_FILE))
    }

    /// Get the global configuration file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the config directory path (`~/.config/verstamp/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config_home).join("verstamp"));
        }

        let base = directories::BaseDirs::new()
            .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;

        Ok(base.config_dir().join("verstamp"))
    }

    /// Override every key `file` sets.
    fn apply(&mut self, file: ConfigFile) {
        if let Some(project) = file.project {
            self.project = project;
        }
        if let Some(namespace) = file.namespace {
            self.namespace = namespace;
        }
        if let Some(version_file) = file.version_file {
            self.version_file = version_file;
        }
        if let Some(var) = file.build_number_env {
            self.build_number_env = var;
        }
        if let Some(build) = file.default_build {
            self.default_build = build;
        }
        if file.hash_length.is_some() {
            self.hash_length = file.hash_length;
        }

        if file.output.path.is_some() {
            self.output.path = file.output.path;
        }
        if let Some(format) = file.output.format {
            self.output.format = format;
        }
        if file.output.template.is_some() {
            self.output.template = file.output.template;
        }

        if let Some(version_type) = file.cpp.version_type {
            self.cpp.version_type = version_type;
        }
        if let Some(version_include) = file.cpp.version_include {
            self.cpp.version_include = version_include;
        }
    }

    /// Directory relative paths resolve against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Namespace to emit, falling back to the lower-cased project name.
    #[must_use]
    pub fn effective_namespace(&self) -> String {
        if self.namespace.is_empty() {
            self.project.to_lowercase()
        } else {
            self.namespace.clone()
        }
    }

    /// Resolved output path, if one is configured.
    #[must_use]
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output.path.as_deref().map(|p| self.resolve_path(p))
    }

    /// Load the custom template, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be read or parsed.
    pub fn load_template(&self) -> anyhow::Result<Option<Template>> {
        let Some(path) = &self.output.template else {
            return Ok(None);
        };
        let path = self.resolve_path(path);
        let source = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading template {}: {e}", path.display()))?;
        let template = Template::parse(&source)
            .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;
        Ok(Some(template))
    }

    /// Resolve the version from the release file and build number.
    ///
    /// # Errors
    ///
    /// Returns an error if the release file is missing or malformed, or the
    /// build number variable holds a non-number.
    pub fn resolve_version(&self) -> anyhow::Result<Version> {
        let build = BuildNumber::resolve(&self.build_number_env, self.default_build)?;
        let path = self.resolve_path(&self.version_file);
        Version::load(&path, build)
            .map_err(|e| anyhow::anyhow!("release file {}: {e}", path.display()))
    }

    /// Assemble everything the template needs, probing git for the hash and
    /// modified flag.
    ///
    /// # Errors
    ///
    /// Returns an error if no project is configured or the version cannot be
    /// resolved.
    pub fn resolve(&self) -> anyhow::Result<VersionInfo> {
        let git = GitInfo::probe_or_unknown(&self.root, self.hash_length);
        self.resolve_with(git)
    }

    /// Like [`Config::resolve`] with already-known git information.
    ///
    /// # Errors
    ///
    /// Returns an error if no project is configured or the version cannot be
    /// resolved.
    pub fn resolve_with(&self, git: GitInfo) -> anyhow::Result<VersionInfo> {
        if self.project.is_empty() {
            anyhow::bail!("no project configured; set `project` in {PROJECT_CONFIG_FILE}");
        }

        Ok(VersionInfo {
            project: self.project.clone(),
            namespace: self.effective_namespace(),
            version: self.resolve_version()?,
            hash: git.hash,
            modified: git.modified,
        })
    }
}
