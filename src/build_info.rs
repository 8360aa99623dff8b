//! Build information for verstamp itself, captured at compile time.

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short git commit hash (7 chars), or `unknown`.
pub const BUILD_HASH: &str = env!("BUILD_HASH");

/// `true` when built from a working tree with uncommitted changes.
pub const BUILD_DIRTY: bool = matches!(env!("BUILD_DIRTY").as_bytes(), b"true");

/// `--version` text: `0.1.0 (abc1234)`, or `0.1.0 (abc1234*)` if dirty.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BUILD_HASH"),
    env!("BUILD_DIRTY_MARK"),
    ")"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_version_embeds_hash() {
        assert!(LONG_VERSION.starts_with(VERSION));
        assert!(LONG_VERSION.contains(BUILD_HASH));
        assert_eq!(LONG_VERSION.ends_with("*)"), BUILD_DIRTY);
    }
}
