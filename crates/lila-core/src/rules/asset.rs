//! Asset and HTML rules.

use super::{Pattern, TransformRule, TransformStage};
use serde_json::json;

const URL_LOADER: &str = "url-loader";
const HTML_LOADER: &str = "html-loader";

/// Inline-size threshold in bytes. `0` would inline everything, so `1`
/// keeps every asset on the regular file pipeline.
pub const INLINE_LIMIT: u64 = 1;

pub const DEFAULT_ASSET_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "ico", "svg", "eot", "ttf", "woff", "woff2",
];

/// A rule routing files with any of `extensions` through the url loader.
#[must_use]
pub fn asset_rule<S: AsRef<str>>(extensions: &[S]) -> TransformRule {
    TransformRule::new(
        Pattern::extensions(extensions),
        vec![TransformStage::with_options(
            URL_LOADER,
            json!({ "limit": INLINE_LIMIT }),
        )],
    )
}

/// A rule resolving `img:src` and `link:href` references in HTML files.
#[must_use]
pub fn html_rule() -> TransformRule {
    TransformRule::new(
        Pattern::extension("html"),
        vec![TransformStage::with_options(
            HTML_LOADER,
            json!({ "attrs": ["img:src", "link:href"], "interpolate": "require" }),
        )],
    )
}
