use std::sync::Arc;

use super::handler::{Handler, Middleware};
use super::error::MuxResult;
use super::Mux;

/// Joins a prefix and a sub-pattern, normalizing a single `/` boundary the way the
/// teacher's `group.go` `concat` helper does: exactly one `/` survives at the seam
/// regardless of which side(s) already carried one.
pub(crate) fn concat(prefix: &str, s: &str) -> String {
    let prefix_has_slash = prefix.ends_with('/');
    let s_has_slash = s.starts_with('/');
    match (prefix_has_slash, s_has_slash) {
        (true, true) => format!("{prefix}{}", &s[1..]),
        (false, false) => format!("{prefix}/{s}"),
        _ => format!("{prefix}{s}"),
    }
}

/// A prefix plus an inherited middleware chain, scoped to a parent [`Mux`]. Handler
/// registrations through a `Group` concatenate the prefix and apply the group's
/// middlewares *inside* the mux-level middlewares (spec.md §4.3).
pub struct Group<'m, Req: ?Sized + 'static> {
    mux: &'m Mux<Req>,
    prefix: String,
    middlewares: Vec<Arc<dyn Middleware<Req>>>,
}

impl<'m, Req: ?Sized + 'static> Group<'m, Req> {
    pub(crate) fn new(mux: &'m Mux<Req>, prefix: String) -> Self {
        Group {
            mux,
            prefix,
            middlewares: Vec::new(),
        }
    }

    /// Appends `middlewares` to this group's chain. Only affects registrations made
    /// through this `Group` (or a sub-`Group` derived from it) after the call.
    pub fn use_middleware(&mut self, middleware: Arc<dyn Middleware<Req>>) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    /// Derives a child group whose prefix is `concat(self.prefix, prefix)` and whose
    /// middlewares are this group's middlewares, inherited.
    pub fn group(&self, prefix: &str) -> Group<'m, Req> {
        Group {
            mux: self.mux,
            prefix: concat(&self.prefix, prefix),
            middlewares: self.middlewares.clone(),
        }
    }

    pub fn handle(
        &self,
        method: &str,
        pattern: &str,
        handler: Arc<dyn Handler<Req>>,
    ) -> MuxResult<()> {
        let full_pattern = concat(&self.prefix, pattern);
        self.mux.add(method, &full_pattern, handler, &self.middlewares)
    }

    pub fn get(&self, pattern: &str, handler: Arc<dyn Handler<Req>>) -> MuxResult<()> {
        self.handle("GET", pattern, handler)
    }

    pub fn head(&self, pattern: &str, handler: Arc<dyn Handler<Req>>) -> MuxResult<()> {
        self.handle("HEAD", pattern, handler)
    }

    pub fn post(&self, pattern: &str, handler: Arc<dyn Handler<Req>>) -> MuxResult<()> {
        self.handle("POST", pattern, handler)
    }

    pub fn put(&self, pattern: &str, handler: Arc<dyn Handler<Req>>) -> MuxResult<()> {
        self.handle("PUT", pattern, handler)
    }

    pub fn delete(&self, pattern: &str, handler: Arc<dyn Handler<Req>>) -> MuxResult<()> {
        self.handle("DELETE", pattern, handler)
    }

    pub fn patch(&self, pattern: &str, handler: Arc<dyn Handler<Req>>) -> MuxResult<()> {
        self.handle("PATCH", pattern, handler)
    }

    pub fn options(&self, pattern: &str, handler: Arc<dyn Handler<Req>>) -> MuxResult<()> {
        self.handle("OPTIONS", pattern, handler)
    }

    pub fn trace(&self, pattern: &str, handler: Arc<dyn Handler<Req>>) -> MuxResult<()> {
        self.handle("TRACE", pattern, handler)
    }

    pub fn connect(&self, pattern: &str, handler: Arc<dyn Handler<Req>>) -> MuxResult<()> {
        self.handle("CONNECT", pattern, handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_normalizes_the_slash_boundary() {
        assert_eq!(concat("/api/", "/v1"), "/api/v1");
        assert_eq!(concat("/api", "v1"), "/api/v1");
        assert_eq!(concat("/api/", "v1"), "/api/v1");
        assert_eq!(concat("/api", "/v1"), "/api/v1");
    }
}
