//! Dev-server middleware ordering.
//!
//! The stack has three groups. Optional interceptors come first, in the
//! reverse of their declaration order (`force-get`, `mock`, `serve`), which
//! is the order the legacy stack produced by inserting each one at the
//! front. The project's own middleware follows, then the mandatory
//! interceptors, both in the order given.
//!
//! ```text
//! development, all enabled:  serve → mock → force-get → user… → dev → hot
//! static serve, all enabled: mock → force-get → user…
//! ```

use serde::Serialize;
use tracing::trace;

/// Which session a stack is assembled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerMode {
    Development,
    StaticServe,
}

/// Interceptors that can be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionalInterceptor {
    /// Rewrites non-GET requests to GET.
    ForceGet,
    /// Answers requests from local mock files.
    Mock,
    /// Serves a single page at `/serve`. Development only.
    Serve,
}

impl OptionalInterceptor {
    pub const DECLARATION_ORDER: [Self; 3] = [Self::ForceGet, Self::Mock, Self::Serve];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ForceGet => "force-get",
            Self::Mock => "mock",
            Self::Serve => "serve",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiddlewareToggles {
    pub force_get: bool,
    pub mock: bool,
    pub serve: bool,
}

impl Default for MiddlewareToggles {
    fn default() -> Self {
        Self {
            force_get: true,
            mock: true,
            serve: false,
        }
    }
}

impl MiddlewareToggles {
    /// Whether `interceptor` goes on the stack in `mode`.
    #[must_use]
    pub fn is_enabled(&self, interceptor: OptionalInterceptor, mode: ServerMode) -> bool {
        match interceptor {
            OptionalInterceptor::ForceGet => self.force_get,
            OptionalInterceptor::Mock => self.mock,
            OptionalInterceptor::Serve => mode == ServerMode::Development && self.serve,
        }
    }
}

/// Ordered interceptor handles. Order is load-bearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MiddlewareStack<H>(Vec<H>);

impl<H> MiddlewareStack<H> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, H> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[H] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<H> {
        self.0
    }
}

impl<H> IntoIterator for MiddlewareStack<H> {
    type Item = H;
    type IntoIter = std::vec::IntoIter<H>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, H> IntoIterator for &'a MiddlewareStack<H> {
    type Item = &'a H;
    type IntoIter = std::slice::Iter<'a, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build the middleware stack.
///
/// `make` is called once per enabled optional interceptor, in declaration
/// order. `user` and `mandatory_tail` are appended unchanged, in that order.
pub fn assemble<H, F, U, T>(
    mode: ServerMode,
    toggles: &MiddlewareToggles,
    mut make: F,
    user: U,
    mandatory_tail: T,
) -> MiddlewareStack<H>
where
    F: FnMut(OptionalInterceptor) -> H,
    U: IntoIterator<Item = H>,
    T: IntoIterator<Item = H>,
{
    let mut stack: Vec<H> = OptionalInterceptor::DECLARATION_ORDER
        .into_iter()
        .filter(|&interceptor| toggles.is_enabled(interceptor, mode))
        .map(&mut make)
        .collect();
    stack.reverse();

    let optional = stack.len();
    stack.extend(user);
    let user = stack.len() - optional;
    stack.extend(mandatory_tail);
    trace!(
        ?mode,
        optional,
        user,
        total = stack.len(),
        "Assembled middleware stack"
    );

    MiddlewareStack(stack)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(
        mode: ServerMode,
        toggles: &MiddlewareToggles,
        tail: &[&'static str],
    ) -> Vec<&'static str> {
        assemble(
            mode,
            toggles,
            OptionalInterceptor::as_str,
            std::iter::empty(),
            tail.iter().copied(),
        )
        .into_vec()
    }

    const ALL_ON: MiddlewareToggles = MiddlewareToggles {
        force_get: true,
        mock: true,
        serve: true,
    };

    const ALL_OFF: MiddlewareToggles = MiddlewareToggles {
        force_get: false,
        mock: false,
        serve: false,
    };

    #[test]
    fn test_development_all_enabled() {
        assert_eq!(
            names(ServerMode::Development, &ALL_ON, &["dev", "hot"]),
            vec!["serve", "mock", "force-get", "dev", "hot"]
        );
    }

    #[test]
    fn test_static_serve_all_enabled() {
        assert_eq!(
            names(ServerMode::StaticServe, &ALL_ON, &[]),
            vec!["mock", "force-get"]
        );
    }

    #[test]
    fn test_all_disabled_yields_tail_unchanged() {
        assert_eq!(
            names(ServerMode::Development, &ALL_OFF, &["dev", "hot"]),
            vec!["dev", "hot"]
        );
        assert!(names(ServerMode::StaticServe, &ALL_OFF, &[]).is_empty());
    }

    #[test]
    fn test_defaults() {
        let toggles = MiddlewareToggles::default();
        assert_eq!(
            names(ServerMode::Development, &toggles, &["dev", "hot"]),
            vec!["mock", "force-get", "dev", "hot"]
        );
    }

    #[test]
    fn test_partial_toggles_keep_relative_order() {
        let toggles = MiddlewareToggles {
            force_get: false,
            mock: true,
            serve: true,
        };
        assert_eq!(
            names(ServerMode::Development, &toggles, &["dev"]),
            vec!["serve", "mock", "dev"]
        );
    }

    #[test]
    fn test_make_called_only_for_enabled_in_declaration_order() {
        let mut calls = Vec::new();
        let toggles = MiddlewareToggles {
            force_get: true,
            mock: false,
            serve: true,
        };
        let stack = assemble(
            ServerMode::StaticServe,
            &toggles,
            |interceptor| {
                calls.push(interceptor);
                interceptor.as_str().to_string()
            },
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(calls, vec![OptionalInterceptor::ForceGet]);
        assert_eq!(stack.as_slice(), ["force-get".to_string()]);
    }

    #[test]
    fn test_user_middleware_sits_between_optional_and_tail() {
        let stack = assemble(
            ServerMode::Development,
            &ALL_ON,
            OptionalInterceptor::as_str,
            ["user-a", "user-b"],
            ["dev", "hot"],
        );
        assert_eq!(
            stack.into_vec(),
            vec!["serve", "mock", "force-get", "user-a", "user-b", "dev", "hot"]
        );

        let stack = assemble(
            ServerMode::StaticServe,
            &ALL_OFF,
            OptionalInterceptor::as_str,
            ["user-a"],
            std::iter::empty(),
        );
        assert_eq!(stack.into_vec(), vec!["user-a"]);
    }
}
