#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod error;
pub mod middleware;
pub mod rules;
pub mod server;
pub mod settings;
pub mod variant;

pub use config::{DevMiddlewareOptions, ProjectOptions, DEFAULT_PORT};
pub use error::{ConfigurationError, Error, Result};
pub use middleware::{assemble, MiddlewareStack, MiddlewareToggles, OptionalInterceptor, ServerMode};
pub use rules::{
    asset_rule, html_rule, module_rules, script_rules, style_rule, style_rules, BuildMode,
    Pattern, RewriteSpec, ScopeMode, StyleLanguage, StyleOptions, TransformOptions,
    TransformRule, TransformStage,
};
pub use server::{
    development_session, static_serve_session, BundlerConfig, BundlerConfigGenerator,
    BundlerConfigInput, DevRequest, DevSession, InterceptorFactory, MakeBundlerConfig,
    ServeOptions, ServerConfig, ServerSettings, StartRequest,
};
pub use settings::{
    Argv, Command, ConfigRequest, FileSettings, ProjectSettings, SettingsProvider,
    USER_MIDDLEWARE_KEY,
};
pub use variant::Variant;
