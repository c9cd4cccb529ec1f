use std::sync::Arc;

/// A handler capability: something that can act on a host-defined request/response
/// bundle `Req`. The crate is deliberately generic over `Req` instead of depending on
/// any particular HTTP stack (spec.md §1 Out of scope) — a host wires its own request
/// type (commonly a struct bundling a response writer and the incoming request) in as
/// `Req`.
pub trait Handler<Req: ?Sized>: Send + Sync {
    fn call(&self, req: &mut Req);
}

impl<Req, F> Handler<Req> for F
where
    Req: ?Sized,
    F: Fn(&mut Req) + Send + Sync,
{
    fn call(&self, req: &mut Req) {
        self(req)
    }
}

/// A handler-transforming capability. `wrap` takes the handler it is composed in front
/// of and returns the wrapped handler that runs first — composition is right-
/// associative, the outermost middleware in a chain runs first (spec.md §6).
pub trait Middleware<Req: ?Sized>: Send + Sync {
    fn wrap(&self, next: Arc<dyn Handler<Req>>) -> Arc<dyn Handler<Req>>;
}

impl<Req, F> Middleware<Req> for F
where
    Req: ?Sized,
    F: Fn(Arc<dyn Handler<Req>>) -> Arc<dyn Handler<Req>> + Send + Sync,
{
    fn wrap(&self, next: Arc<dyn Handler<Req>>) -> Arc<dyn Handler<Req>> {
        self(next)
    }
}

/// Applies `middlewares` around `handler`, outermost-first: `middlewares[0]` wraps
/// `middlewares[1]` wraps ... wraps `handler`. Composition runs right-to-left over the
/// slice so the resulting chain invokes `middlewares[0]` first at request time, per
/// spec.md §4.3's order: `mux_middlewares[0] ∘ … ∘ group_middlewares[0] ∘ … ∘ handler`.
pub(crate) fn compose<Req: 'static + ?Sized>(
    middlewares: &[Arc<dyn Middleware<Req>>],
    handler: Arc<dyn Handler<Req>>,
) -> Arc<dyn Handler<Req>> {
    middlewares
        .iter()
        .rev()
        .fold(handler, |inner, mw| mw.wrap(inner))
}
