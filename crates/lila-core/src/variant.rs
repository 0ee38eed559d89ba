//! Project variants.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared project archetype. Chosen at configuration time, never derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Plain scripts only.
    #[default]
    Base,
    /// React components in `.jsx` files.
    React,
    /// Vue single-file components, JSX allowed in `.js`.
    Vue,
    /// Both React and Vue.
    ReactVue,
}

impl Variant {
    pub const ALL: [Self; 4] = [Self::Base, Self::React, Self::Vue, Self::ReactVue];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::React => "react",
            Self::Vue => "vue",
            Self::ReactVue => "react-vue",
        }
    }

    #[must_use]
    pub fn has_react(self) -> bool {
        matches!(self, Self::React | Self::ReactVue)
    }

    #[must_use]
    pub fn has_vue(self) -> bool {
        matches!(self, Self::Vue | Self::ReactVue)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| Error::UnknownVariant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for variant in Variant::ALL {
            assert_eq!(variant.as_str().parse::<Variant>().unwrap(), variant);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "svelte".parse::<Variant>().unwrap_err();
        assert!(matches!(err, Error::UnknownVariant(ref name) if name == "svelte"));
    }

    #[test]
    fn test_capabilities() {
        assert!(!Variant::Base.has_react() && !Variant::Base.has_vue());
        assert!(Variant::React.has_react() && !Variant::React.has_vue());
        assert!(!Variant::Vue.has_react() && Variant::Vue.has_vue());
        assert!(Variant::ReactVue.has_react() && Variant::ReactVue.has_vue());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Variant::ReactVue).unwrap();
        assert_eq!(json, "\"react-vue\"");
        let parsed: Variant = serde_json::from_str("\"vue\"").unwrap();
        assert_eq!(parsed, Variant::Vue);
    }
}
