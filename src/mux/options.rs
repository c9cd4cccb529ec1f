use std::sync::Arc;

use crate::path::NormalizeOptions;

use super::handler::Handler;

/// A handler that does nothing; the default `not_found`/`method_not_allowed` handler
/// before a host overrides either with [`MuxOptions::not_found`]/
/// [`MuxOptions::method_not_allowed`].
struct NoopHandler;

impl<Req: ?Sized> Handler<Req> for NoopHandler {
    fn call(&self, _req: &mut Req) {}
}

/// Construction-time configuration for a [`Mux`](super::Mux). Mirrors the teacher's
/// `RouterOptions` — a plain builder struct with a `Default` impl, no file-based config
/// layer, since this matcher has no runtime config surface beyond construction.
pub struct MuxOptions<Req: ?Sized + 'static> {
    /// Auto-register the `/`-toggled sibling of every static, non-capture-rest pattern
    /// as a redirect when it has no handler of its own. On by default (spec.md §6).
    pub strict_slash: bool,
    /// Request-path normalization mode fed to every `dispatch` call (spec.md §6).
    pub path: NormalizeOptions,
    /// Builds the permanent-redirect handler installed at a strict-slash companion
    /// route, given the canonical target pattern it should redirect to. `None` means
    /// strict-slash companions are not installed (a route is still registered and
    /// looked up for the `:name`/`*name`-less pattern alone, but the `/`-toggled
    /// sibling is left unregistered) — the crate does not know how to write a
    /// `Location` header onto an arbitrary `Req` without this factory.
    pub redirect_factory: Option<Arc<dyn Fn(String) -> Arc<dyn Handler<Req>> + Send + Sync>>,
    /// Handler invoked when no tree contains the requested path. The teacher's
    /// `option.go` calls this `HandleNotFound`.
    pub not_found: Arc<dyn Handler<Req>>,
    /// Handler invoked when some tree contains the path but not under the request's
    /// method. The teacher's `option.go` calls this `HandleMethodNotAllowed`.
    pub method_not_allowed: Arc<dyn Handler<Req>>,
}

impl<Req: ?Sized + 'static> Default for MuxOptions<Req> {
    fn default() -> Self {
        MuxOptions {
            strict_slash: true,
            path: NormalizeOptions::default(),
            redirect_factory: None,
            not_found: Arc::new(NoopHandler),
            method_not_allowed: Arc::new(NoopHandler),
        }
    }
}

impl<Req: ?Sized + 'static> Clone for MuxOptions<Req> {
    fn clone(&self) -> Self {
        MuxOptions {
            strict_slash: self.strict_slash,
            path: self.path,
            redirect_factory: self.redirect_factory.clone(),
            not_found: self.not_found.clone(),
            method_not_allowed: self.method_not_allowed.clone(),
        }
    }
}
