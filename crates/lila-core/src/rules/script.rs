//! Script transform rules, dispatched on the project variant.
//!
//! | variant     | `.js` (+ vue jsx) | `.jsx` | `.vue` |
//! |-------------|-------------------|--------|--------|
//! | `base`      | yes (no)          |        |        |
//! | `react`     | yes (no)          | yes    |        |
//! | `vue`       | yes (yes)         |        | yes    |
//! | `react-vue` | yes (yes)         | yes    | yes    |
//!
//! The `.vue` rule always comes last.

use super::{Pattern, TransformRule, TransformStage};
use crate::variant::Variant;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

const BABEL_LOADER: &str = "babel-loader";
const VUE_LOADER: &str = "vue-loader";

const PRESET_ENV: &str = "@babel/preset-env";
const PRESET_FLOW: &str = "@babel/preset-flow";
const PRESET_REACT: &str = "@babel/preset-react";

const PLUGIN_DYNAMIC_IMPORT: &str = "@babel/plugin-syntax-dynamic-import";
const PLUGIN_REACT_JSX: &str = "@babel/plugin-transform-react-jsx";
const PLUGIN_VUE_JSX: &str = "transform-vue-jsx";
const PLUGIN_IMPORT: &str = "import";
const PLUGIN_COMPONENT: &str = "component";
const PLUGIN_FLOW_RUNTIME: &str = "flow-runtime";

const NO_PLUGINS: &[&str] = &[];
const VUE_SCRIPT_PLUGINS: &[&str] = &[PLUGIN_VUE_JSX];

/// Options of an on-demand import or component auto-register rewrite.
///
/// Written either as an option object or as `[options, name]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RewriteSpec {
    Named(Map<String, Value>, String),
    Options(Map<String, Value>),
}

impl RewriteSpec {
    /// `[plugin, options]` or `[plugin, options, name]`.
    fn plugin_entry(&self, plugin: &str) -> Value {
        match self {
            Self::Options(options) => json!([plugin, options]),
            Self::Named(options, name) => json!([plugin, options, name]),
        }
    }
}

/// Accepts a list of rewrite specs or a lone spec.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<RewriteSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<RewriteSpec>),
        One(RewriteSpec),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(specs) => specs,
        OneOrMany::One(spec) => vec![spec],
    })
}

/// Options shared by every script rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    /// On-demand import rewrites, in order.
    #[serde(deserialize_with = "one_or_many")]
    pub import_rewrites: Vec<RewriteSpec>,
    /// Component auto-register rewrites, in order.
    #[serde(deserialize_with = "one_or_many")]
    pub component_rewrites: Vec<RewriteSpec>,
    /// Paths the script rules skip.
    pub exclude: Option<Pattern>,
    /// Extra presets, appended after the built-in ones.
    pub presets: Vec<String>,
    /// Extra plugins, appended after the built-in ones.
    pub plugins: Vec<String>,
    /// Strip static type annotations.
    pub flow: bool,
    /// Emit runtime type assertions.
    pub flow_runtime: bool,
}

/// Ordered script rules for `variant`.
#[must_use]
pub fn script_rules(variant: Variant, options: &TransformOptions) -> Vec<TransformRule> {
    let (script_plugins, markup, single_file) = match variant {
        Variant::Base => (NO_PLUGINS, false, false),
        Variant::React => (NO_PLUGINS, true, false),
        Variant::Vue => (VUE_SCRIPT_PLUGINS, false, true),
        Variant::ReactVue => (VUE_SCRIPT_PLUGINS, true, true),
    };

    let mut rules = Vec::with_capacity(3);
    rules.push(babel_rule(
        options,
        Pattern::extension("js"),
        &[],
        script_plugins,
    ));

    if markup {
        rules.push(babel_rule(
            options,
            Pattern::extension("jsx"),
            &[PRESET_REACT],
            &[PLUGIN_REACT_JSX],
        ));
    }

    if single_file {
        rules.push(TransformRule::new(
            Pattern::extension("vue"),
            vec![TransformStage::new(VUE_LOADER)],
        ));
    }

    debug!(%variant, rules = rules.len(), "Composed script rules");
    rules
}

/// One `babel-loader` rule: the base chain plus rule-specific presets and plugins.
fn babel_rule(
    options: &TransformOptions,
    test: Pattern,
    presets: &[&str],
    plugins: &[&str],
) -> TransformRule {
    let mut all_presets: Vec<Value> = vec![PRESET_ENV.into()];
    all_presets.extend(presets.iter().map(|&p| Value::from(p)));
    if options.flow {
        all_presets.push(PRESET_FLOW.into());
    }
    all_presets.extend(options.presets.iter().map(|p| Value::from(p.as_str())));

    let mut all_plugins: Vec<Value> = plugins.iter().map(|&p| Value::from(p)).collect();
    all_plugins.push(PLUGIN_DYNAMIC_IMPORT.into());
    all_plugins.extend(
        options
            .import_rewrites
            .iter()
            .map(|spec| spec.plugin_entry(PLUGIN_IMPORT)),
    );
    all_plugins.extend(
        options
            .component_rewrites
            .iter()
            .map(|spec| spec.plugin_entry(PLUGIN_COMPONENT)),
    );
    if options.flow_runtime {
        all_plugins.push(json!([PLUGIN_FLOW_RUNTIME, { "assert": true, "annotate": true }]));
    }
    all_plugins.extend(options.plugins.iter().map(|p| Value::from(p.as_str())));

    TransformRule {
        exclude: options.exclude.clone(),
        ..TransformRule::new(
            test,
            vec![TransformStage::with_options(
                BABEL_LOADER,
                json!({ "presets": all_presets, "plugins": all_plugins }),
            )],
        )
    }
}
