//! Style rules for css, less and sass.
//!
//! Every language gets the same chain, with a preprocessor appended for
//! less and sass:
//!
//! ```text
//! output (extract | inject) → css-loader → postcss-loader (autoprefixer) → [less|sass]-loader
//! ```
//!
//! Module scoping decides the rule's file filter:
//!
//! | modules | scope mode | css-loader `modules` | exclude | include |
//! |---------|------------|----------------------|---------|---------|
//! | false   | any        | false                | -       | -       |
//! | true    | exclude    | true                 | scope   | -       |
//! | true    | include    | false                | -       | scope   |

use super::{Pattern, TransformRule, TransformStage};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

const EXTRACT_LOADER: &str = "mini-css-extract-plugin/loader";
const STYLE_LOADER: &str = "style-loader";
const CSS_LOADER: &str = "css-loader";
const POSTCSS_LOADER: &str = "postcss-loader";

/// Whether styles are extracted to a file or injected into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleLanguage {
    Css,
    Less,
    Sass,
}

impl StyleLanguage {
    pub const ALL: [Self; 3] = [Self::Css, Self::Less, Self::Sass];

    /// File extension the rule matches.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Less => "less",
            Self::Sass => "scss",
        }
    }

    /// Language-specific stage appended last.
    #[must_use]
    pub fn preprocessor(self) -> Option<&'static str> {
        match self {
            Self::Css => None,
            Self::Less => Some("less-loader"),
            Self::Sass => Some("sass-loader"),
        }
    }
}

/// Whether the scope path set is the exception or the sole target of module scoping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeMode {
    #[default]
    Exclude,
    Include,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOptions {
    /// Locally scoped class names.
    pub modules: bool,
    /// Class-name template for scoped names.
    pub modules_name: String,
    /// Path set the scope mode applies to.
    pub modules_scope: Pattern,
    pub scope_mode: ScopeMode,
    /// Autoprefixer browser targets.
    pub browsers: Vec<String>,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            modules: false,
            modules_name: "[name]__[local]-[hash:base64:5]".to_string(),
            modules_scope: Pattern::literal("node_modules"),
            scope_mode: ScopeMode::Exclude,
            browsers: vec!["> 1%".to_string(), "last 4 versions".to_string()],
        }
    }
}

/// The transform rule for one style language.
#[must_use]
pub fn style_rule(language: StyleLanguage, options: &StyleOptions, mode: BuildMode) -> TransformRule {
    let output = match mode {
        BuildMode::Production => EXTRACT_LOADER,
        BuildMode::Development => STYLE_LOADER,
    };

    let (local_names, exclude, include) = match (options.modules, options.scope_mode) {
        (false, _) => (false, None, None),
        (true, ScopeMode::Exclude) => (true, Some(options.modules_scope.clone()), None),
        (true, ScopeMode::Include) => (false, None, Some(options.modules_scope.clone())),
    };

    let mut chain = vec![
        TransformStage::new(output),
        TransformStage::with_options(
            CSS_LOADER,
            json!({ "modules": local_names, "localIdentName": options.modules_name }),
        ),
        TransformStage::with_options(
            POSTCSS_LOADER,
            json!({ "plugins": [["autoprefixer", { "browsers": options.browsers }]] }),
        ),
    ];
    if let Some(preprocessor) = language.preprocessor() {
        chain.push(TransformStage::new(preprocessor));
    }

    debug!(?language, ?mode, modules = options.modules, "Composed style rule");
    TransformRule {
        test: Pattern::extension(language.extension()),
        chain,
        exclude,
        include,
    }
}

/// Rules for css, less and sass, in that order.
#[must_use]
pub fn style_rules(options: &StyleOptions, mode: BuildMode) -> Vec<TransformRule> {
    StyleLanguage::ALL
        .into_iter()
        .map(|language| style_rule(language, options, mode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(modules: bool, scope_mode: ScopeMode) -> StyleOptions {
        StyleOptions {
            modules,
            scope_mode,
            modules_scope: Pattern::new("node_modules|legacy").unwrap(),
            ..StyleOptions::default()
        }
    }

    fn modules_setting(rule: &TransformRule) -> bool {
        rule.stage_options(CSS_LOADER).unwrap()["modules"]
            .as_bool()
            .unwrap()
    }

    #[test]
    fn test_scoping_truth_table() {
        for language in StyleLanguage::ALL {
            for mode in [BuildMode::Development, BuildMode::Production] {
                for scope_mode in [ScopeMode::Exclude, ScopeMode::Include] {
                    let disabled = style_rule(language, &options(false, scope_mode), mode);
                    assert!(!modules_setting(&disabled));
                    assert!(disabled.exclude.is_none() && disabled.include.is_none());
                }

                let exclude = style_rule(language, &options(true, ScopeMode::Exclude), mode);
                assert!(modules_setting(&exclude));
                assert_eq!(exclude.exclude.as_ref().unwrap().as_str(), "node_modules|legacy");
                assert!(exclude.include.is_none());

                let include = style_rule(language, &options(true, ScopeMode::Include), mode);
                assert!(!modules_setting(&include));
                assert!(include.exclude.is_none());
                assert_eq!(include.include.as_ref().unwrap().as_str(), "node_modules|legacy");
            }
        }
    }

    #[test]
    fn test_production_swaps_only_first_stage() {
        let opts = options(true, ScopeMode::Exclude);
        for language in StyleLanguage::ALL {
            let dev = style_rule(language, &opts, BuildMode::Development);
            let prod = style_rule(language, &opts, BuildMode::Production);

            assert_eq!(dev.chain[0].loader, STYLE_LOADER);
            assert_eq!(prod.chain[0].loader, EXTRACT_LOADER);
            assert_eq!(dev.chain[1..], prod.chain[1..]);
            assert_eq!(dev.test, prod.test);
        }
    }

    #[test]
    fn test_chain_per_language() {
        let opts = StyleOptions::default();
        let loaders = |language| {
            style_rule(language, &opts, BuildMode::Development)
                .loaders()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };

        assert_eq!(
            loaders(StyleLanguage::Css),
            vec![STYLE_LOADER, CSS_LOADER, POSTCSS_LOADER]
        );
        assert_eq!(
            loaders(StyleLanguage::Less),
            vec![STYLE_LOADER, CSS_LOADER, POSTCSS_LOADER, "less-loader"]
        );
        assert_eq!(
            loaders(StyleLanguage::Sass),
            vec![STYLE_LOADER, CSS_LOADER, POSTCSS_LOADER, "sass-loader"]
        );
    }

    #[test]
    fn test_loader_options_carry_template_and_browsers() {
        let opts = StyleOptions {
            modules_name: "[local]_[hash:6]".to_string(),
            browsers: vec!["ie >= 11".to_string()],
            ..StyleOptions::default()
        };
        let rule = style_rule(StyleLanguage::Sass, &opts, BuildMode::Production);

        assert_eq!(rule.test.as_str(), r"\.scss$");
        assert_eq!(
            rule.stage_options(CSS_LOADER).unwrap()["localIdentName"],
            "[local]_[hash:6]"
        );
        assert_eq!(
            rule.stage_options(POSTCSS_LOADER).unwrap()["plugins"],
            json!([["autoprefixer", { "browsers": ["ie >= 11"] }]])
        );
    }

    #[test]
    fn test_style_options_deserialize_with_defaults() {
        let opts: StyleOptions =
            serde_json::from_value(json!({ "modules": true, "scopeMode": "include" })).unwrap();
        assert!(opts.modules);
        assert_eq!(opts.scope_mode, ScopeMode::Include);
        assert_eq!(opts.modules_scope.as_str(), "node_modules");
        assert_eq!(opts.modules_name, StyleOptions::default().modules_name);
    }
}
