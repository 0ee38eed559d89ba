//! Module rules handed to the bundler.
//!
//! A rule pairs a file-path pattern with an ordered chain of transform
//! stages. The bundler tests rules in order, so every composer here returns
//! its rules in a fixed, variant-dependent order:
//!
//! ```text
//! script rules (.js, .jsx, .vue) → .html → .css/.less/.scss → assets
//! ```

pub mod asset;
pub mod script;
pub mod style;

pub use asset::{asset_rule, html_rule, DEFAULT_ASSET_EXTENSIONS};
pub use script::{script_rules, RewriteSpec, TransformOptions};
pub use style::{style_rule, style_rules, BuildMode, ScopeMode, StyleLanguage, StyleOptions};

use crate::config::ProjectOptions;
use regex_lite::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// A regular expression over file paths.
///
/// Serializes as its source text.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a user-supplied pattern.
    pub fn new(source: &str) -> Result<Self, regex_lite::Error> {
        Regex::new(source).map(Self)
    }

    /// Pattern matching paths ending in `.{ext}`.
    #[must_use]
    pub fn extension(ext: &str) -> Self {
        Self::escaped(&format!(r"\.{}$", regex_lite::escape(ext)))
    }

    /// Pattern matching paths ending in any of the given extensions.
    #[must_use]
    pub fn extensions<S: AsRef<str>>(exts: &[S]) -> Self {
        let alternatives: Vec<String> = exts
            .iter()
            .map(|ext| regex_lite::escape(ext.as_ref()))
            .collect();
        Self::escaped(&format!(r"\.({})$", alternatives.join("|")))
    }

    /// Pattern matching `text` literally anywhere in a path.
    #[must_use]
    pub fn literal(text: &str) -> Self {
        Self::escaped(&regex_lite::escape(text))
    }

    // Only reached with `regex_lite::escape`d text around fixed syntax, which
    // always compiles; `test_escaped_patterns_always_compile` guards it.
    fn escaped(source: &str) -> Self {
        Self(Regex::new(source).expect("escaped pattern compiles"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.0.is_match(path)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Self::new(&source).map_err(serde::de::Error::custom)
    }
}

/// One named stage of a transform chain with its option bag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformStage {
    pub loader: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl TransformStage {
    /// A stage without options.
    pub fn new(loader: impl Into<String>) -> Self {
        Self {
            loader: loader.into(),
            options: None,
        }
    }

    /// A stage configured with an option bag.
    pub fn with_options(loader: impl Into<String>, options: Value) -> Self {
        Self {
            loader: loader.into(),
            options: Some(options),
        }
    }
}

/// Which files get which transform chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformRule {
    /// Paths this rule applies to.
    pub test: Pattern,
    /// Stages listed in bundler order.
    #[serde(rename = "use")]
    pub chain: Vec<TransformStage>,
    /// Paths removed from `test`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Pattern>,
    /// When set, only paths also matching this are handled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Pattern>,
}

impl TransformRule {
    pub fn new(test: Pattern, chain: Vec<TransformStage>) -> Self {
        Self {
            test,
            chain,
            exclude: None,
            include: None,
        }
    }

    /// Whether the bundler would apply this rule to `path`.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.test.is_match(path)
            && !self.exclude.as_ref().is_some_and(|p| p.is_match(path))
            && self.include.as_ref().map_or(true, |p| p.is_match(path))
    }

    /// Loader names in chain order.
    pub fn loaders(&self) -> impl Iterator<Item = &str> {
        self.chain.iter().map(|stage| stage.loader.as_str())
    }

    /// The option bag of the first stage using `loader`.
    #[must_use]
    pub fn stage_options(&self, loader: &str) -> Option<&Value> {
        self.chain
            .iter()
            .find(|stage| stage.loader == loader)
            .and_then(|stage| stage.options.as_ref())
    }
}

/// The complete module rule set for a project.
#[must_use]
pub fn module_rules(options: &ProjectOptions, mode: BuildMode) -> Vec<TransformRule> {
    let mut rules = script_rules(options.variant, &options.transform);
    rules.push(html_rule());
    rules.extend(style_rules(&options.style, mode));
    rules.push(asset_rule(&options.asset_extensions));

    debug!(
        variant = %options.variant,
        ?mode,
        rules = rules.len(),
        "Composed module rules"
    );
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Variant;
    use std::collections::HashSet;

    #[test]
    fn test_extension_pattern_is_anchored() {
        let js = Pattern::extension("js");
        assert_eq!(js.as_str(), r"\.js$");
        assert!(js.is_match("src/index.js"));
        assert!(!js.is_match("src/index.jsx"));
        assert!(!js.is_match("src/index.json"));
    }

    #[test]
    fn test_extensions_pattern_escapes() {
        let pattern = Pattern::extensions(&["png", "woff2", "c++"]);
        assert_eq!(pattern.as_str(), r"\.(png|woff2|c\+\+)$");
        assert!(pattern.is_match("a/logo.png"));
        assert!(pattern.is_match("font.woff2"));
        assert!(pattern.is_match("x.c++"));
        assert!(!pattern.is_match("x.cc"));
    }

    #[test]
    fn test_escaped_patterns_always_compile() {
        let metacharacters = r"\.+*?()|[]{}^$#&-~ ";
        let mut exts: Vec<String> = (0..500).map(|i| format!("ext{i}")).collect();
        exts.extend(metacharacters.chars().map(|c| format!("a{c}b")));
        exts.push(metacharacters.to_string());
        exts.push(String::new());

        let pattern = Pattern::extensions(&exts);
        assert!(pattern.is_match("file.ext499"));
        assert!(pattern.is_match("file.a(b"));
        assert!(pattern.is_match(&format!("file.{metacharacters}")));
        assert!(!pattern.is_match("file.ext500"));

        for text in &exts {
            assert!(Pattern::literal(text).is_match(&format!("x{text}y")));
            assert!(Pattern::extension(text).is_match(&format!("x.{text}")));
        }
    }

    #[test]
    fn test_pattern_serde() {
        let pattern: Pattern = serde_json::from_str(r#""node_modules|vendor""#).unwrap();
        assert!(pattern.is_match("/app/vendor/x.css"));
        assert_eq!(
            serde_json::to_string(&pattern).unwrap(),
            r#""node_modules|vendor""#
        );
        assert!(serde_json::from_str::<Pattern>(r#""(unclosed""#).is_err());
    }

    #[test]
    fn test_rule_matches_honours_exclude_and_include() {
        let mut rule = TransformRule::new(Pattern::extension("css"), vec![]);
        assert!(rule.matches("a/b.css"));

        rule.exclude = Some(Pattern::literal("node_modules"));
        assert!(!rule.matches("node_modules/x/b.css"));
        assert!(rule.matches("src/b.css"));

        rule.exclude = None;
        rule.include = Some(Pattern::literal("src/components"));
        assert!(rule.matches("src/components/b.css"));
        assert!(!rule.matches("src/pages/b.css"));
    }

    #[test]
    fn test_rule_serializes_like_bundler_rule() {
        let rule = TransformRule {
            exclude: Some(Pattern::literal("node_modules")),
            ..TransformRule::new(
                Pattern::extension("less"),
                vec![TransformStage::new("less-loader")],
            )
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["test"], r"\.less$");
        assert_eq!(json["use"][0]["loader"], "less-loader");
        assert!(json["use"][0].get("options").is_none());
        assert_eq!(json["exclude"], "node_modules");
        assert!(json.get("include").is_none());
    }

    #[test]
    fn test_module_rules_order_and_distinct_patterns() {
        for variant in Variant::ALL {
            let options = ProjectOptions {
                variant,
                ..ProjectOptions::default()
            };
            let rules = module_rules(&options, BuildMode::Development);
            let script_count = script_rules(variant, &options.transform).len();
            // scripts, html, three style languages, assets
            assert_eq!(rules.len(), script_count + 5);
            assert_eq!(rules[script_count].test.as_str(), r"\.html$");
            assert_eq!(rules.last().unwrap().loaders().next(), Some("url-loader"));

            let patterns: HashSet<&str> = rules.iter().map(|r| r.test.as_str()).collect();
            assert_eq!(patterns.len(), rules.len(), "duplicate pattern for {variant}");
        }
    }
}
