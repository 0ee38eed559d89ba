//! Project settings and the settings provider seam.
//!
//! [`FileSettings`] reads `lila.json` from the project root:
//!
//! ```json
//! {
//!   "src": "src",
//!   "dev": "dev",
//!   "build": "build",
//!   "options": { "variant": "react", "port": 3000 },
//!   "pages": { "admin": { "mock": false } }
//! }
//! ```
//!
//! Page entries are merged over `options` key by key.

use crate::config::ProjectOptions;
use crate::error::{Error, Result};
use crate::server::BundlerConfigGenerator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings file name looked up in the project root.
pub const SETTINGS_FILE: &str = "lila.json";

/// Key of the project's own middleware list in the dev-server options.
pub const USER_MIDDLEWARE_KEY: &str = "middleware";

/// Command-line arguments, opaque to the composer.
pub type Argv = Map<String, Value>;

/// Directory layout of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Project root.
    #[serde(skip)]
    pub cwd: PathBuf,
    /// Source directory, relative to `cwd`.
    pub src: String,
    /// Development output directory, relative to `cwd`.
    pub dev: String,
    /// Build output directory, relative to `cwd`.
    pub build: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            cwd: PathBuf::from("."),
            src: "src".to_string(),
            dev: "dev".to_string(),
            build: "build".to_string(),
        }
    }
}

impl ProjectSettings {
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            ..Self::default()
        }
    }
}

/// The command a configuration is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Dev,
    Build,
    Start,
}

impl Command {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Build => "build",
            Self::Start => "start",
        }
    }
}

/// Input to [`SettingsProvider::make_config`].
#[derive(Debug, Clone, Copy)]
pub struct ConfigRequest<'a> {
    pub page: &'a str,
    pub cmd: Command,
    pub argv: &'a Argv,
}

/// Source of settings, per-page options and the bundler config generator.
pub trait SettingsProvider {
    fn settings(&self) -> &ProjectSettings;

    /// Resolve the options for one page and command.
    fn make_config(&self, request: &ConfigRequest<'_>) -> ProjectOptions;

    /// The caller's bundler config generator, if one is configured.
    fn bundler_config_generator(&self) -> Option<&dyn BundlerConfigGenerator>;

    /// File served at `/serve` for `page`.
    fn serve_path(&self, page: &str) -> PathBuf {
        let settings = self.settings();
        settings.cwd.join(&settings.src).join(page)
    }

    /// The project's own middleware entries, placed between the optional
    /// interceptors and the mandatory ones. Read from `server.middleware`.
    fn user_middleware(&self, options: &ProjectOptions) -> Vec<Value> {
        options
            .server
            .get(USER_MIDDLEWARE_KEY)
            .map(|entries| match entries {
                Value::Array(entries) => entries.clone(),
                Value::Null => Vec::new(),
                entry => vec![entry.clone()],
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    #[serde(flatten)]
    settings: ProjectSettings,
    options: Map<String, Value>,
    pages: BTreeMap<String, Map<String, Value>>,
}

/// Settings backed by `lila.json`.
pub struct FileSettings {
    settings: ProjectSettings,
    options: ProjectOptions,
    pages: BTreeMap<String, ProjectOptions>,
    generator: Option<Box<dyn BundlerConfigGenerator>>,
}

impl fmt::Debug for FileSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSettings")
            .field("settings", &self.settings)
            .field("options", &self.options)
            .field("pages", &self.pages.keys().collect::<Vec<_>>())
            .field("generator", &self.generator.is_some())
            .finish()
    }
}

impl FileSettings {
    pub fn new(settings: ProjectSettings, options: ProjectOptions) -> Self {
        Self {
            settings,
            options,
            pages: BTreeMap::new(),
            generator: None,
        }
    }

    /// Load `lila.json` from `root`, falling back to defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(SETTINGS_FILE);
        if !path.exists() {
            debug!(root = %root.display(), "No settings file, using defaults");
            return Ok(Self::new(ProjectSettings::new(root), ProjectOptions::default()));
        }

        let source = std::fs::read_to_string(&path).map_err(|source| Error::SettingsRead {
            path: path.clone(),
            source,
        })?;
        let parse_err = |source: serde_json::Error| Error::SettingsParse {
            path: path.clone(),
            source,
        };

        let file: SettingsFile = serde_json::from_str(&source).map_err(parse_err)?;
        let options: ProjectOptions =
            serde_json::from_value(Value::Object(file.options.clone())).map_err(parse_err)?;

        let mut pages = BTreeMap::new();
        for (page, overrides) in file.pages {
            let mut merged = Value::Object(file.options.clone());
            merge(&mut merged, Value::Object(overrides));
            pages.insert(page, serde_json::from_value(merged).map_err(parse_err)?);
        }

        debug!(path = %path.display(), pages = pages.len(), "Loaded settings");
        Ok(Self {
            settings: ProjectSettings {
                cwd: root.to_path_buf(),
                ..file.settings
            },
            options,
            pages,
            generator: None,
        })
    }

    /// Options used for `page` instead of the shared ones.
    pub fn with_page(mut self, page: impl Into<String>, options: ProjectOptions) -> Self {
        self.pages.insert(page.into(), options);
        self
    }

    pub fn with_generator(mut self, generator: impl BundlerConfigGenerator + 'static) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }
}

impl SettingsProvider for FileSettings {
    fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    fn make_config(&self, request: &ConfigRequest<'_>) -> ProjectOptions {
        let mut options = self
            .pages
            .get(request.page)
            .unwrap_or(&self.options)
            .clone();
        apply_argv(&mut options, request.argv);
        options
    }

    fn bundler_config_generator(&self) -> Option<&dyn BundlerConfigGenerator> {
        self.generator.as_deref()
    }
}

/// Command-line `port`, `mock` and `forceGet` win over file options.
fn apply_argv(options: &mut ProjectOptions, argv: &Argv) {
    if let Some(port) = argv
        .get("port")
        .and_then(Value::as_u64)
        .and_then(|p| u16::try_from(p).ok())
    {
        options.port = port;
    }
    if let Some(mock) = argv.get("mock").and_then(Value::as_bool) {
        options.mock = mock;
    }
    if let Some(force_get) = argv.get("forceGet").and_then(Value::as_bool) {
        options.force_get = force_get;
    }
}

/// Deep-merge `patch` into `base`; objects merge per key, anything else replaces.
fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, patch) => *base = patch,
    }
}
