//! Version-info sources: the built-in templates and the values bound into them.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::{Error, Result};
use super::template::{Bindings, Template};
use super::version::Version;

/// Built-in C++ header template.
pub const CPP_TEMPLATE: &str = include_str!("../../../templates/version_info.h.in");

/// Built-in Rust module template.
pub const RUST_TEMPLATE: &str = include_str!("../../../templates/version_info.rs.in");

static IDENTIFIER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok());

/// Reserved words that cannot name a C++ namespace.
const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Strict and reserved Rust keywords (2024 edition).
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

fn is_identifier(name: &str, keywords: &[&str]) -> bool {
    name != "_"
        && !keywords.contains(&name)
        && IDENTIFIER.as_ref().is_some_and(|re| re.is_match(name))
}

/// Language of the generated source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Include-guarded C++ header.
    #[default]
    Cpp,
    /// Rust module, for `include!` from a build script's `OUT_DIR`.
    Rust,
}

impl OutputFormat {
    /// The built-in template for this format.
    #[must_use]
    pub const fn builtin_template(self) -> &'static str {
        match self {
            Self::Cpp => CPP_TEMPLATE,
            Self::Rust => RUST_TEMPLATE,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpp => f.write_str("cpp"),
            Self::Rust => f.write_str("rust"),
        }
    }
}

/// Names the C++ version type and the header that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CppOptions {
    /// Type constructed from the four version parts.
    pub version_type: String,
    /// Header included for `version_type`.
    pub version_include: String,
}

impl CppOptions {
    /// Check that both values can be emitted into the header.
    pub fn validate(&self) -> Result<()> {
        if self.version_type.is_empty() || self.version_type.chars().any(char::is_control) {
            return Err(Error::InvalidCppOption {
                name: "version_type",
                value: self.version_type.clone(),
            });
        }
        if self.version_include.is_empty()
            || self
                .version_include
                .chars()
                .any(|c| c == '"' || c.is_control())
        {
            return Err(Error::InvalidCppOption {
                name: "version_include",
                value: self.version_include.clone(),
            });
        }
        Ok(())
    }
}

impl Default for CppOptions {
    fn default() -> Self {
        Self {
            version_type: "Version".to_string(),
            version_include: "version.h".to_string(),
        }
    }
}

/// Everything substituted into a version-info template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Project name; the include guard derives from it.
    pub project: String,
    /// Scope the constants are declared in.
    pub namespace: String,
    /// Release version.
    pub version: Version,
    /// Commit hash, embedded verbatim.
    pub hash: String,
    /// Working tree had uncommitted changes.
    pub modified: bool,
}

impl VersionInfo {
    /// Check that the values can be emitted as `format` source.
    pub fn validate(&self, format: OutputFormat) -> Result<()> {
        let namespace_ok = match format {
            OutputFormat::Cpp => self
                .namespace
                .split("::")
                .all(|segment| is_identifier(segment, CPP_KEYWORDS)),
            OutputFormat::Rust => is_identifier(&self.namespace, RUST_KEYWORDS),
        };
        if !namespace_ok {
            return Err(Error::InvalidNamespace(self.namespace.clone()));
        }

        // Emitted into a line comment.
        if self.project.is_empty() || self.project.chars().any(char::is_control) {
            return Err(Error::InvalidProject(self.project.clone()));
        }

        if self.hash.is_empty()
            || self
                .hash
                .chars()
                .any(|c| c == '"' || c == '\\' || c.is_control())
        {
            return Err(Error::InvalidHash(self.hash.clone()));
        }

        Ok(())
    }

    /// Bindings for every token the built-in templates use.
    #[must_use]
    pub fn bindings(&self, cpp: &CppOptions) -> Bindings {
        Bindings::new()
            .with("project", &self.project)
            .with("namespace", &self.namespace)
            .with("major", self.version.major())
            .with("minor", self.version.minor())
            .with("point", self.version.point())
            .with("build", self.version.build())
            .with("version", self.version)
            .with("hash", &self.hash)
            .with("modified", self.modified)
            .with("guard", include_guard(&self.project))
            .with("version_type", &cpp.version_type)
            .with("version_include", &cpp.version_include)
    }
}

/// Include guard for a project: `<PROJECT>_VERSION_INFO_H`.
///
/// The project name is upper-cased and anything outside `[A-Z0-9_]` becomes
/// `_`. A leading digit gets a `_` prefix.
#[must_use]
pub fn include_guard(project: &str) -> String {
    let sanitized: String = project
        .to_uppercase()
        .chars()
        .map(|c| if c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' { c } else { '_' })
        .collect();
    let prefix = if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        "_"
    } else {
        ""
    };
    format!("{prefix}{sanitized}_VERSION_INFO_H")
}

/// Validate `info` and render it with `template`, or the built-in template
/// for `format` when none is given.
pub fn render_version_info(
    info: &VersionInfo,
    format: OutputFormat,
    template: Option<&Template>,
    cpp: &CppOptions,
) -> Result<String> {
    info.validate(format)?;
    if format == OutputFormat::Cpp {
        cpp.validate()?;
    }

    let builtin;
    let template = if let Some(template) = template {
        template
    } else {
        builtin = Template::parse(format.builtin_template())?;
        &builtin
    };

    tracing::debug!(
        project = %info.project,
        version = %info.version,
        hash = %info.hash,
        modified = info.modified,
        %format,
        "rendering version info"
    );
    Ok(template.render(&info.bindings(cpp))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foo() -> VersionInfo {
        VersionInfo {
            project: "Foo".to_string(),
            namespace: "foo".to_string(),
            version: Version::new(1, 2, 3, 4),
            hash: "abc123".to_string(),
            modified: false,
        }
    }

    #[test]
    fn builtin_templates_parse() {
        let cpp = Template::parse(CPP_TEMPLATE).unwrap();
        for token in ["project", "namespace", "major", "minor", "point", "build", "hash", "modified"] {
            assert!(cpp.placeholders().contains(&token), "cpp template lacks {token}");
        }
        let rust = Template::parse(RUST_TEMPLATE).unwrap();
        assert!(rust.placeholders().contains(&"hash"));
    }

    #[test]
    fn renders_cpp_header() {
        let out = render_version_info(&foo(), OutputFormat::Cpp, None, &CppOptions::default())
            .unwrap();
        assert!(out.contains("#ifndef FOO_VERSION_INFO_H\n#define FOO_VERSION_INFO_H"));
        assert!(out.contains("#endif  // FOO_VERSION_INFO_H"));
        assert!(out.contains("namespace foo {"));
        assert!(out.contains("static const Version version = Version(\n    1,\n    2,\n    3,\n    4);"));
        assert!(out.contains("static const std::string commitHash(\"abc123\");"));
        assert!(out.contains("static const bool modified(false);"));
        assert!(!out.contains("{{"));
    }

    #[test]
    fn renders_rust_module() {
        let info = VersionInfo {
            modified: true,
            ..foo()
        };
        let out = render_version_info(&info, OutputFormat::Rust, None, &CppOptions::default())
            .unwrap();
        assert!(out.contains("pub mod foo {"));
        assert!(out.contains("pub const VERSION: [u32; 4] = [1, 2, 3, 4];"));
        assert!(out.contains("pub const VERSION_STRING: &str = \"1.2.3.4\";"));
        assert!(out.contains("pub const COMMIT_HASH: &str = \"abc123\";"));
        assert!(out.contains("pub const MODIFIED: bool = true;"));
    }

    #[test]
    fn cpp_options_are_substituted() {
        let cpp = CppOptions {
            version_type: "acme::Version".to_string(),
            version_include: "acme/version.h".to_string(),
        };
        let out = render_version_info(&foo(), OutputFormat::Cpp, None, &cpp).unwrap();
        assert!(out.contains("#include \"acme/version.h\""));
        assert!(out.contains("static const acme::Version version = acme::Version("));
    }

    #[test]
    fn bad_cpp_options_are_rejected() {
        let cpp = CppOptions {
            version_include: "evil.h\"\n#include \"other.h".to_string(),
            ..CppOptions::default()
        };
        assert!(matches!(
            render_version_info(&foo(), OutputFormat::Cpp, None, &cpp),
            Err(Error::InvalidCppOption { name: "version_include", .. })
        ));
        assert!(render_version_info(&foo(), OutputFormat::Rust, None, &cpp).is_ok());
    }

    #[test]
    fn custom_template_is_used() {
        let template = Template::parse("{{project}} {{version}} {{hash}}").unwrap();
        let out = render_version_info(
            &foo(),
            OutputFormat::Cpp,
            Some(&template),
            &CppOptions::default(),
        )
        .unwrap();
        assert_eq!(out, "Foo 1.2.3.4 abc123");
    }

    #[test]
    fn guard_is_sanitized() {
        assert_eq!(include_guard("Foo"), "FOO_VERSION_INFO_H");
        assert_eq!(include_guard("my-app.core"), "MY_APP_CORE_VERSION_INFO_H");
        assert_eq!(include_guard("3d tools"), "_3D_TOOLS_VERSION_INFO_H");
    }

    #[test]
    fn nested_namespace_only_for_cpp() {
        let info = VersionInfo {
            namespace: "acme::foo".to_string(),
            ..foo()
        };
        assert!(info.validate(OutputFormat::Cpp).is_ok());
        assert!(matches!(
            info.validate(OutputFormat::Rust),
            Err(Error::InvalidNamespace(_))
        ));
    }

    #[test]
    fn bad_namespace_is_rejected() {
        for namespace in ["", "1foo", "foo bar", "foo::", "foo-bar", "_", "class", "acme::namespace"] {
            let info = VersionInfo {
                namespace: namespace.to_string(),
                ..foo()
            };
            assert!(info.validate(OutputFormat::Cpp).is_err(), "{namespace:?}");
        }
        for namespace in ["_", "type", "self", "fn", "gen"] {
            let info = VersionInfo {
                namespace: namespace.to_string(),
                ..foo()
            };
            assert!(info.validate(OutputFormat::Rust).is_err(), "{namespace:?}");
        }
    }

    #[test]
    fn keywords_of_the_other_language_are_allowed() {
        let cpp_only = VersionInfo {
            namespace: "class".to_string(),
            ..foo()
        };
        assert!(cpp_only.validate(OutputFormat::Rust).is_ok());

        let rust_only = VersionInfo {
            namespace: "fn".to_string(),
            ..foo()
        };
        assert!(rust_only.validate(OutputFormat::Cpp).is_ok());
    }

    #[test]
    fn project_with_line_break_is_rejected() {
        let info = VersionInfo {
            project: "Foo\n#error injected".to_string(),
            ..foo()
        };
        for format in [OutputFormat::Cpp, OutputFormat::Rust] {
            assert!(matches!(
                render_version_info(&info, format, None, &CppOptions::default()),
                Err(Error::InvalidProject(_))
            ));
        }

        let spaced = VersionInfo {
            project: "Acme Widget".to_string(),
            ..foo()
        };
        assert!(spaced.validate(OutputFormat::Cpp).is_ok());
    }

    #[test]
    fn bad_hash_is_rejected() {
        for hash in ["", "ab\"c", "a\\b", "abc\n"] {
            let info = VersionInfo {
                hash: hash.to_string(),
                ..foo()
            };
            assert!(
                matches!(info.validate(OutputFormat::Cpp), Err(Error::InvalidHash(_))),
                "{hash:?}"
            );
        }
    }

    #[test]
    fn format_names() {
        assert_eq!(OutputFormat::Cpp.to_string(), "cpp");
        assert_eq!(OutputFormat::Rust.to_string(), "rust");
    }
}
