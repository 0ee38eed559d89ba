//! Session orchestration.
//!
//! A session is a one-shot setup call: it reads settings, composes the
//! module rules and the middleware stack, and returns the configuration the
//! bundler and dev server consume. Two sessions exist:
//!
//! - **development** — rules + `[optional…, user…, dev, hot]` middleware,
//!   start path `/serve` or `/<dev>/index.html`.
//! - **static serve** — no rules, `[optional…, user…]` middleware, start
//!   path `/<build>/index.html`.

use crate::config::{DevMiddlewareOptions, ProjectOptions};
use crate::error::{ConfigurationError, Result};
use crate::middleware::{assemble, MiddlewareStack, OptionalInterceptor, ServerMode};
use crate::rules::{module_rules, BuildMode, TransformRule};
use crate::settings::{
    Argv, Command, ConfigRequest, ProjectSettings, SettingsProvider, USER_MIDDLEWARE_KEY,
};
use crate::variant::Variant;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::info;

/// Start path when a single page is served.
pub const SERVE_START_PATH: &str = "/serve";

const DEV_MIDDLEWARE_STATS: &str = "errors-only";

/// Input handed to the caller's bundler config factory.
#[derive(Debug, Clone, Copy)]
pub struct BundlerConfigInput<'a> {
    pub page: &'a str,
    pub argv: &'a Argv,
    pub cmd: Command,
    pub variant: Variant,
    pub options: &'a ProjectOptions,
    pub settings: &'a ProjectSettings,
}

/// Produces the caller's bundler configuration.
pub trait MakeBundlerConfig {
    fn make(&self, input: &BundlerConfigInput<'_>) -> Value;
}

impl<F> MakeBundlerConfig for F
where
    F: Fn(&BundlerConfigInput<'_>) -> Value,
{
    fn make(&self, input: &BundlerConfigInput<'_>) -> Value {
        self(input)
    }
}

/// Caller-supplied generator of a [`MakeBundlerConfig`].
pub trait BundlerConfigGenerator {
    /// `None` when the generator has no factory to offer.
    fn generate(&self) -> Option<Box<dyn MakeBundlerConfig>>;
}

impl<F> BundlerConfigGenerator for F
where
    F: Fn() -> Option<Box<dyn MakeBundlerConfig>>,
{
    fn generate(&self) -> Option<Box<dyn MakeBundlerConfig>> {
        self()
    }
}

/// Options of the single-page `serve` interceptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServeOptions {
    pub root: PathBuf,
    pub dev_dir: String,
    pub serve_path: PathBuf,
}

/// Makes the opaque interceptor handles placed on the stack.
pub trait InterceptorFactory {
    type Handle;

    fn force_get(&self) -> Self::Handle;

    fn mock(&self, root: &Path) -> Self::Handle;

    fn serve(&self, options: &ServeOptions) -> Self::Handle;

    /// One entry of the project's own middleware list.
    fn user(&self, entry: &Value) -> Self::Handle;

    /// Serves compiler output from memory.
    fn dev_middleware(&self, bundler: &BundlerConfig, options: &DevMiddlewareOptions)
        -> Self::Handle;

    /// Pushes hot updates to the page.
    fn hot_middleware(&self, bundler: &BundlerConfig, options: &Map<String, Value>)
        -> Self::Handle;
}

/// Configuration handed to the bundler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundlerConfig {
    /// Module rules, in match order.
    pub rules: Vec<TransformRule>,
    /// What the caller's factory returned.
    pub generated: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    pub base_dir: PathBuf,
    pub port: u16,
    pub start_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
}

/// Configuration handed to the dev server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig<H> {
    #[serde(flatten)]
    pub settings: ServerSettings,
    pub middleware: MiddlewareStack<H>,
    /// User dev-server options, minus the middleware list.
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, Copy)]
pub struct DevRequest<'a> {
    pub page: &'a str,
    pub argv: &'a Argv,
    /// Serve the page at `/serve`.
    pub serve: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct StartRequest<'a> {
    pub page: &'a str,
    pub argv: &'a Argv,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevSession<H> {
    pub bundler: BundlerConfig,
    pub server: ServerConfig<H>,
}

/// Compose a development session.
///
/// Fails with a [`ConfigurationError`] before any collaborator is consulted
/// when the provider has no bundler config generator, or the generator
/// offers no factory.
pub fn development_session<P, I>(
    provider: &P,
    interceptors: &I,
    request: &DevRequest<'_>,
) -> Result<DevSession<I::Handle>>
where
    P: SettingsProvider + ?Sized,
    I: InterceptorFactory + ?Sized,
{
    let generator = provider
        .bundler_config_generator()
        .ok_or(ConfigurationError::MissingConfigGenerator)?;
    let make_bundler_config = generator
        .generate()
        .ok_or(ConfigurationError::InvalidConfigGenerator)?;

    let settings = provider.settings();
    let options = provider.make_config(&ConfigRequest {
        page: request.page,
        cmd: Command::Dev,
        argv: request.argv,
    });
    let generated = make_bundler_config.make(&BundlerConfigInput {
        page: request.page,
        argv: request.argv,
        cmd: Command::Dev,
        variant: options.variant,
        options: &options,
        settings,
    });
    let bundler = BundlerConfig {
        rules: module_rules(&options, BuildMode::Development),
        generated,
    };

    let dev_options = DevMiddlewareOptions {
        stats: DEV_MIDDLEWARE_STATS.to_string(),
        public_path: Some(format!("/{}/", settings.dev)),
        ..options.dev_middleware.clone()
    };
    let tail = [
        interceptors.dev_middleware(&bundler, &dev_options),
        interceptors.hot_middleware(&bundler, &options.hot_middleware),
    ];
    let user = user_handles(provider, interceptors, &options);
    let middleware = assemble(
        ServerMode::Development,
        &options.toggles(request.serve),
        |interceptor| optional_handle(provider, interceptors, interceptor, request.page),
        user,
        tail,
    );

    let start_path = if request.serve {
        SERVE_START_PATH.to_string()
    } else {
        format!("/{}/index.html", settings.dev)
    };

    info!(
        page = request.page,
        variant = %options.variant,
        rules = bundler.rules.len(),
        middleware = middleware.len(),
        %start_path,
        "Composed development session"
    );

    Ok(DevSession {
        bundler,
        server: ServerConfig {
            settings: ServerSettings {
                base_dir: settings.cwd.clone(),
                port: options.port,
                start_path,
                public_path: dev_options.public_path,
            },
            middleware,
            options: passthrough(options.server),
        },
    })
}

/// Compose a static-serve session over the build output.
pub fn static_serve_session<P, I>(
    provider: &P,
    interceptors: &I,
    request: &StartRequest<'_>,
) -> ServerConfig<I::Handle>
where
    P: SettingsProvider + ?Sized,
    I: InterceptorFactory + ?Sized,
{
    let settings = provider.settings();
    let options = provider.make_config(&ConfigRequest {
        page: request.page,
        cmd: Command::Start,
        argv: request.argv,
    });

    let user = user_handles(provider, interceptors, &options);
    let middleware = assemble(
        ServerMode::StaticServe,
        &options.toggles(false),
        |interceptor| optional_handle(provider, interceptors, interceptor, request.page),
        user,
        std::iter::empty(),
    );
    let start_path = format!("/{}/index.html", settings.build);

    info!(
        page = request.page,
        middleware = middleware.len(),
        %start_path,
        "Composed static serve session"
    );

    ServerConfig {
        settings: ServerSettings {
            base_dir: settings.cwd.clone(),
            port: options.port,
            start_path,
            public_path: None,
        },
        middleware,
        options: passthrough(options.server),
    }
}

fn optional_handle<P, I>(
    provider: &P,
    interceptors: &I,
    interceptor: OptionalInterceptor,
    page: &str,
) -> I::Handle
where
    P: SettingsProvider + ?Sized,
    I: InterceptorFactory + ?Sized,
{
    let settings = provider.settings();
    match interceptor {
        OptionalInterceptor::ForceGet => interceptors.force_get(),
        OptionalInterceptor::Mock => interceptors.mock(&settings.cwd),
        OptionalInterceptor::Serve => interceptors.serve(&ServeOptions {
            root: settings.cwd.clone(),
            dev_dir: settings.dev.clone(),
            serve_path: provider.serve_path(page),
        }),
    }
}

fn user_handles<P, I>(provider: &P, interceptors: &I, options: &ProjectOptions) -> Vec<I::Handle>
where
    P: SettingsProvider + ?Sized,
    I: InterceptorFactory + ?Sized,
{
    provider
        .user_middleware(options)
        .iter()
        .map(|entry| interceptors.user(entry))
        .collect()
}

/// Dev-server options minus the middleware list, which is on the stack.
fn passthrough(mut server: Map<String, Value>) -> Map<String, Value> {
    server.remove(USER_MIDDLEWARE_KEY);
    server
}
