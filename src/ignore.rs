//! Ignore rules for tree scans.
//!
//! Two layers decide whether a relative path is skipped:
//!
//! 1. Hidden entries. Any path segment starting with `.` is ignored, always. This runs before the
//!    user patterns and nothing in the pattern list can re-include such a path.
//! 2. User patterns in gitignore style. Each raw pattern is classified as root-relative (`/foo`),
//!    directory-only (`foo/`) or plain. Plain patterns without a slash match basenames anywhere in
//!    the tree; plain patterns with a slash match anchored at the root or as a suffix at any depth.
//!
//! Negated patterns (`!foo`) are accepted but never match. Patterns that are not valid globs are
//! reported once when the matcher is built and never match afterwards.

use globset::{GlobBuilder, GlobMatcher};
use std::path::MAIN_SEPARATOR;
use tracing::warn;

/// Check whether any segment of a relative path starts with `.`
pub fn is_hidden(relative_path: &str) -> bool {
    relative_path
        .split(|c| c == '/' || c == MAIN_SEPARATOR)
        .any(|segment| segment.starts_with('.'))
}

/// Normalize a relative path for matching: forward slashes, no leading or trailing slash.
pub fn normalize_relative_path(relative_path: &str) -> String {
    relative_path.replace('\\', "/").trim_matches('/').to_string()
}

/// One raw gitignore-style pattern, compiled for matching.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    raw: String,
    compiled: CompiledRule,
}

#[derive(Debug, Clone)]
enum CompiledRule {
    /// Empty, comment, negation, or invalid glob
    Inert,
    /// `dir/`: the directory itself (directories only) or anything inside it
    DirectoryOnly {
        itself: Vec<GlobMatcher>,
        inside: Vec<GlobMatcher>,
    },
    /// Root-relative or slash-containing pattern, matched against the whole path
    FullPath(Vec<GlobMatcher>),
    /// Slash-free pattern, matched against the last segment
    Basename(GlobMatcher),
}

impl IgnoreRule {
    /// Parse and compile a raw pattern.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let compiled = match Self::compile(&raw) {
            Ok(compiled) => compiled,
            Err(e) => {
                warn!(pattern = %raw, error = %e, "Ignoring invalid ignore pattern");
                CompiledRule::Inert
            }
        };
        Self { raw, compiled }
    }

    /// The pattern as supplied (whitespace trimmed)
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_comment(&self) -> bool {
        self.raw.starts_with('#')
    }

    pub fn is_negated(&self) -> bool {
        self.raw.starts_with('!')
    }

    /// Anchored at the synchronized root (`/foo`)
    pub fn is_root_relative(&self) -> bool {
        self.raw.starts_with('/')
    }

    /// Only matches directories and their contents (`foo/`)
    pub fn is_directory_only(&self) -> bool {
        self.raw.len() > 1 && self.raw.ends_with('/')
    }

    /// Contains a slash once the anchoring and directory markers are stripped
    pub fn has_slash(&self) -> bool {
        self.body().contains('/')
    }

    /// Whether this rule can ever match
    pub fn is_active(&self) -> bool {
        !matches!(self.compiled, CompiledRule::Inert)
    }

    fn body(&self) -> &str {
        let mut body = self.raw.as_str();
        if self.is_root_relative() {
            body = &body[1..];
        }
        if self.is_directory_only() {
            body = body.strip_suffix('/').unwrap_or(body);
        }
        body
    }

    fn compile(raw: &str) -> Result<CompiledRule, globset::Error> {
        if raw.is_empty() || raw.starts_with('#') || raw.starts_with('!') {
            return Ok(CompiledRule::Inert);
        }

        let probe = IgnoreRule {
            raw: raw.to_string(),
            compiled: CompiledRule::Inert,
        };
        let body = probe.body();
        if body.is_empty() {
            return Ok(CompiledRule::Inert);
        }

        let root_relative = probe.is_root_relative();

        if probe.is_directory_only() {
            let mut itself = vec![glob(body)?];
            let mut inside = vec![glob(&inside_of(body))?];
            if !root_relative {
                itself.push(glob(&at_any_depth(body))?);
                inside.push(glob(&at_any_depth(&inside_of(body)))?);
            }
            return Ok(CompiledRule::DirectoryOnly { itself, inside });
        }

        if root_relative {
            return Ok(CompiledRule::FullPath(vec![
                glob(body)?,
                glob(&inside_of(body))?,
            ]));
        }

        if probe.has_slash() {
            let mut globs = vec![
                glob(body)?,
                glob(&inside_of(body))?,
                glob(&at_any_depth(body))?,
                glob(&at_any_depth(&inside_of(body)))?,
            ];
            // `dir/**` should hide the directory entry too, not only its contents
            if let Some(dir) = body.strip_suffix("/**") {
                if !dir.is_empty() {
                    globs.push(glob(dir)?);
                    globs.push(glob(&at_any_depth(dir))?);
                }
            }
            return Ok(CompiledRule::FullPath(globs));
        }

        Ok(CompiledRule::Basename(glob(body)?))
    }

    /// Match a relative path already passed through [`normalize_relative_path`].
    pub fn matches(&self, normalized_path: &str, is_directory: bool) -> bool {
        match &self.compiled {
            CompiledRule::Inert => false,
            CompiledRule::DirectoryOnly { itself, inside } => {
                (is_directory && itself.iter().any(|g| g.is_match(normalized_path)))
                    || inside.iter().any(|g| g.is_match(normalized_path))
            }
            CompiledRule::FullPath(globs) => globs.iter().any(|g| g.is_match(normalized_path)),
            CompiledRule::Basename(g) => {
                let basename = normalized_path.rsplit('/').next().unwrap_or(normalized_path);
                g.is_match(basename)
            }
        }
    }
}

fn glob(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    Ok(GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

fn at_any_depth(pattern: &str) -> String {
    if pattern == "**" || pattern.starts_with("**/") {
        pattern.to_string()
    } else {
        format!("**/{}", pattern)
    }
}

fn inside_of(pattern: &str) -> String {
    if pattern == "**" || pattern.ends_with("/**") {
        pattern.to_string()
    } else {
        format!("{}/**", pattern)
    }
}

/// Decides whether a relative path is excluded from scans.
///
/// Owned by the synchronizer and replaced wholesale when the pattern list changes.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    patterns: Vec<String>,
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    /// Build a matcher from raw gitignore-style patterns, in order.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let rules = patterns.iter().map(|p| IgnoreRule::parse(p)).collect();
        Self { patterns, rules }
    }

    /// The raw patterns this matcher was built from
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Check whether a path relative to the synchronized root is ignored.
    pub fn is_ignored(&self, relative_path: &str, is_directory: bool) -> bool {
        if is_hidden(relative_path) {
            return true;
        }

        if self.rules.is_empty() {
            return false;
        }

        let normalized = normalize_relative_path(relative_path);
        if normalized.is_empty() {
            return false;
        }

        self.rules
            .iter()
            .any(|rule| rule.matches(&normalized, is_directory))
    }
}
