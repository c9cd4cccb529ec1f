mod error;
mod group;
mod handler;
mod hmap;
mod options;
mod params;

use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::radix::{Match, NodeId, Tree};

pub use error::{MuxError, MuxResult};
pub use group::Group;
pub use handler::{Handler, Middleware};
pub use options::MuxOptions;
pub use params::Params;

use handler::compose;
use hmap::HMap;

/// The opaque per-request value store a host plugs in for `Req`, and the only channel
/// `Mux::dispatch` uses to hand back the method/path it needs and the captures it found
/// (spec.md §1). A host's `Req` is typically a struct bundling the incoming request and
/// whatever it writes a response through; the mux never sees either directly.
pub trait RequestContext {
    /// Receives the `:name`/`*name` captures bound by a successful match. Called once,
    /// immediately before the resolved handler runs. Not called on a 404/405 outcome.
    fn set_params(&mut self, params: Params<'_>);
}

/// What a [`Mux::dispatch`] call resolved to.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// A registered handler ran.
    Matched,
    /// An auto-installed strict-slash companion handler ran (spec.md §6). The handler
    /// itself is whatever [`MuxOptions::redirect_factory`] built; this variant only
    /// tells the host it was the companion, not the route the host asked for.
    Redirected,
    /// Some tree holds this path, but not under the requested method. `allowed` lists
    /// every method registered at that path, for a host to build its own `Allow` header.
    MethodNotAllowed { allowed: Vec<Box<str>> },
    /// No tree holds this path under any method.
    NotFound,
}

struct MuxState<Req: ?Sized + 'static> {
    methods: HMap<Arc<dyn Handler<Req>>>,
    /// Every registered pattern, under any method, folded into one tree with a unit
    /// payload — used only to tell a 404 (no tree has the path) from a 405 (some tree
    /// has it, just not this method). Grounded in the source's `combined` endpoint.
    combined: Tree<()>,
    /// `combined` node -> the `(method, per-method node)` pairs registered at that path.
    /// Drives the `Allow` data for a 405 outcome. Keyed by `combined`'s `NodeId`s, kept
    /// in sync across `seal`'s remap the same way `auto_redirect` is.
    link: HashMap<NodeId, SmallVec<[(Box<str>, NodeId); 4]>>,
    /// `(method, per-method node)` pairs holding an auto-installed strict-slash
    /// companion handler rather than one the host explicitly registered. A later
    /// explicit registration at the same node removes its entry here instead of
    /// failing as a duplicate (an edge case spec.md leaves open; see DESIGN.md).
    auto_redirect: HashSet<(Box<str>, NodeId)>,
    sealed: bool,
    middlewares: Vec<Arc<dyn Middleware<Req>>>,
}

/// A demultiplexer: composes per-route middleware chains over a method-fanned-out set
/// of compressed radix tries and resolves one request to a handler invocation, a 404,
/// or a 405 (spec.md §4-§7). Generic over an opaque host request type `Req`; has no
/// knowledge of any particular HTTP stack.
///
/// Mirrors the teacher's `Router`/`RouterState` split: registration (`add`, `group`,
/// `use_middleware`) runs under a write lock and is rejected once [`Mux::seal`] has run;
/// `dispatch` only ever takes a read lock, so many callers can serve requests from the
/// same `Mux` concurrently.
pub struct Mux<Req: ?Sized + 'static> {
    state: RwLock<MuxState<Req>>,
    options: MuxOptions<Req>,
}

impl<Req: ?Sized + 'static> Mux<Req> {
    pub fn new(options: MuxOptions<Req>) -> Self {
        Mux {
            state: RwLock::new(MuxState {
                methods: HMap::new(),
                combined: Tree::new(),
                link: HashMap::new(),
                auto_redirect: HashSet::new(),
                sealed: false,
                middlewares: Vec::new(),
            }),
            options,
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.state.read().sealed
    }

    /// Appends `middleware` to the chain every registration made after this call is
    /// wrapped in, mux-wide (spec.md §4.3). Rejected once sealed.
    pub fn use_middleware(&self, middleware: Arc<dyn Middleware<Req>>) -> MuxResult<()> {
        let mut state = self.state.write();
        if state.sealed {
            return Err(MuxError::AlreadySealed {
                operation: "use_middleware",
            });
        }
        state.middlewares.push(middleware);
        Ok(())
    }

    /// Derives a [`Group`] scoped to `prefix`, inheriting no middlewares of its own —
    /// only this mux's mux-wide chain applies until the group adds its own.
    pub fn group(&self, prefix: &str) -> Group<'_, Req> {
        Group::new(self, prefix.to_string())
    }

    /// Registers `handler` for `method`/`pattern`, wrapped in this mux's middleware
    /// chain followed by `middlewares` (outermost-first, spec.md §4.3). If
    /// [`MuxOptions::strict_slash`] is set and `pattern`'s trailing-slash-toggled
    /// sibling has no handler of its own, installs a companion redirect handler there
    /// via [`MuxOptions::redirect_factory`] (spec.md §6).
    pub fn add(
        &self,
        method: &str,
        pattern: &str,
        handler: Arc<dyn Handler<Req>>,
        middlewares: &[Arc<dyn Middleware<Req>>],
    ) -> MuxResult<()> {
        let mut state = self.state.write();
        if state.sealed {
            return Err(MuxError::AlreadySealed { operation: "add" });
        }

        let composed = {
            let mut chain: Vec<Arc<dyn Middleware<Req>>> =
                Vec::with_capacity(state.middlewares.len() + middlewares.len());
            chain.extend(state.middlewares.iter().cloned());
            chain.extend(middlewares.iter().cloned());
            compose(&chain, handler)
        };

        self.bind(&mut state, method, pattern, composed, false)?;

        if self.options.strict_slash {
            if let Some(sibling) = toggle_trailing_slash(pattern) {
                self.maybe_install_redirect(&mut state, method, pattern, &sibling)?;
            }
        }

        Ok(())
    }

    pub fn handle(&self, method: &str, pattern: &str, handler: Arc<dyn Handler<Req>>) -> MuxResult<()> {
        self.add(method, pattern, handler, &[])
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

    /// Registers `pattern` in `method`'s tree and in the combined tree, binding
    /// `handler` at the method tree's node. A duplicate *explicit* registration is
    /// rejected unless the existing binding was an auto-installed strict-slash
    /// companion, in which case it is silently replaced.
    fn bind(
        &self,
        state: &mut MuxState<Req>,
        method: &str,
        pattern: &str,
        handler: Arc<dyn Handler<Req>>,
        is_auto: bool,
    ) -> MuxResult<NodeId> {
        let node = {
            let tree = state.methods.get_or_insert_mut(method);
            tree.add(pattern)?
        };

        let key: (Box<str>, NodeId) = (method.into(), node);
        let was_auto = state.auto_redirect.remove(&key);

        {
            let tree = state.methods.get_or_insert_mut(method);
            let had_value = tree.node_ref(node).has_value();
            if had_value && !was_auto && !is_auto {
                return Err(MuxError::DuplicateRegistration {
                    method: method.to_string(),
                    pattern: pattern.to_string(),
                });
            }
            tree.replace(node, handler);
        }

        if is_auto {
            state.auto_redirect.insert(key);
        }

        let combined_node = state.combined.add(pattern)?;
        state.combined.replace(combined_node, ());
        let entry = state.link.entry(combined_node).or_insert_with(SmallVec::new);
        if !entry.iter().any(|(m, n)| m.as_ref() == method && *n == node) {
            entry.push((method.into(), node));
        }

        Ok(node)
    }

    /// Installs a redirect handler at `sibling` unless it already has a handler or no
    /// [`MuxOptions::redirect_factory`] was configured — in the latter case the
    /// companion route is simply left unregistered (spec.md §6, "graceful degradation").
    fn maybe_install_redirect(
        &self,
        state: &mut MuxState<Req>,
        method: &str,
        primary_pattern: &str,
        sibling: &str,
    ) -> MuxResult<()> {
        let already_bound = {
            let tree = state.methods.get_or_insert_mut(method);
            let node = tree.add(sibling)?;
            tree.node_ref(node).has_value()
        };
        if already_bound {
            return Ok(());
        }

        let Some(factory) = &self.options.redirect_factory else {
            return Ok(());
        };
        let redirect_handler = factory(primary_pattern.to_string());
        self.bind(state, method, sibling, redirect_handler, true)?;
        Ok(())
    }

    /// Compacts every tree this mux holds (per-method and combined) and fixes up the
    /// bookkeeping tables `seal` invalidates the old `NodeId`s of. Build APIs
    /// (`add`/`group`/`use_middleware`) are rejected afterwards; `dispatch` only works
    /// afterwards (spec.md §7).
    #[tracing::instrument(skip(self))]
    pub fn seal(&self) -> MuxResult<()> {
        let mut state = self.state.write();
        if state.sealed {
            return Err(MuxError::AlreadySealed { operation: "seal" });
        }
        tracing::debug!(node_count = state.combined.len(), "mux::seal");

        let method_remaps = state.methods.optimize_all()?;
        let combined_remap = state.combined.optimize()?;

        let remap_for = |method: &str| -> Option<&Vec<NodeId>> {
            method_remaps
                .iter()
                .find(|(m, _)| m.as_ref() == method)
                .map(|(_, remap)| remap)
        };

        let mut new_link: HashMap<NodeId, SmallVec<[(Box<str>, NodeId); 4]>> =
            HashMap::with_capacity(state.link.len());
        for (old_combined, entries) in state.link.drain() {
            let new_combined = combined_remap[old_combined.index()];
            let remapped: SmallVec<[(Box<str>, NodeId); 4]> = entries
                .into_iter()
                .map(|(method, old_node)| {
                    let new_node = remap_for(&method)
                        .map(|remap| remap[old_node.index()])
                        .unwrap_or(old_node);
                    (method, new_node)
                })
                .collect();
            new_link.insert(new_combined, remapped);
        }
        state.link = new_link;

        let mut new_auto: HashSet<(Box<str>, NodeId)> = HashSet::with_capacity(state.auto_redirect.len());
        for (method, old_node) in state.auto_redirect.drain() {
            let new_node = remap_for(&method)
                .map(|remap| remap[old_node.index()])
                .unwrap_or(old_node);
            new_auto.insert((method, new_node));
        }
        state.auto_redirect = new_auto;

        state.sealed = true;
        Ok(())
    }
}

impl<Req: RequestContext + ?Sized + 'static> Mux<Req> {
    /// Resolves one request: normalizes `path` per [`MuxOptions::path`], looks it up in
    /// `method`'s tree, and on a hit hands the captures to `req` before invoking the
    /// resolved handler. On a miss, checks the combined tree to tell a 405 from a 404
    /// and runs the matching configured fallback handler (spec.md §7).
    #[tracing::instrument(skip(self, req), fields(method, path))]
    pub fn dispatch(&self, method: &str, path: &str, req: &mut Req) -> MuxResult<DispatchOutcome> {
        let state = self.state.read();
        if !state.sealed {
            return Err(MuxError::NotSealed);
        }

        let normalized = crate::path::normalize_path(path, &self.options.path)?;

        if let Some(tree) = state.methods.get(method) {
            if let Some(found) = tree.lookup(&normalized) {
                let Match { node, value, params } = found;
                let is_redirect = state.auto_redirect.contains(&(method.into(), node));
                req.set_params(Params::from_matches(params));
                value.call(req);
                let outcome = if is_redirect {
                    DispatchOutcome::Redirected
                } else {
                    DispatchOutcome::Matched
                };
                tracing::trace!(?outcome, "mux::dispatch");
                return Ok(outcome);
            }
        }

        if let Some(combined_match) = state.combined.lookup(&normalized) {
            let allowed = state
                .link
                .get(&combined_match.node)
                .map(|entries| entries.iter().map(|(m, _)| m.clone()).collect())
                .unwrap_or_default();
            self.options.method_not_allowed.call(req);
            tracing::trace!(?allowed, "mux::dispatch method not allowed");
            return Ok(DispatchOutcome::MethodNotAllowed { allowed });
        }

        self.options.not_found.call(req);
        tracing::trace!("mux::dispatch not found");
        Ok(DispatchOutcome::NotFound)
    }
}

/// The trailing-slash-toggled sibling of `pattern`, or `None` when toggling makes no
/// sense: an empty pattern, or one ending in a `*name` capture-rest segment (there is no
/// notion of a slash boundary to flip after "the rest of the path", spec.md §6).
fn toggle_trailing_slash(pattern: &str) -> Option<String> {
    if pattern.is_empty() || ends_in_capture_rest(pattern) {
        return None;
    }
    if pattern == "/" {
        return Some(String::new());
    }
    match pattern.strip_suffix('/') {
        Some(stripped) => Some(stripped.to_string()),
        None => Some(format!("{pattern}/")),
    }
}

fn ends_in_capture_rest(pattern: &str) -> bool {
    matches!(pattern.rsplit('/').next(), Some(segment) if segment.starts_with('*'))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        calls: Vec<&'static str>,
        params: Vec<(String, String)>,
    }

    impl Recorder {
        fn new() -> Self {
            Recorder {
                calls: Vec::new(),
                params: Vec::new(),
            }
        }
    }

    impl RequestContext for Recorder {
        fn set_params(&mut self, params: Params<'_>) {
            self.params = params
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect();
        }
    }

    fn mark(label: &'static str) -> Arc<dyn Handler<Recorder>> {
        Arc::new(move |req: &mut Recorder| req.calls.push(label))
    }

    #[test]
    fn matches_a_static_route() {
        let mux: Mux<Recorder> = Mux::new(MuxOptions::default());
        mux.add("GET", "/health", mark("health"), &[]).unwrap();
        mux.seal().unwrap();

        let mut req = Recorder::new();
        let outcome = mux.dispatch("GET", "/health", &mut req).unwrap();
        assert!(matches!(outcome, DispatchOutcome::Matched));
        assert_eq!(req.calls, vec!["health"]);
    }

    #[test]
    fn captures_a_parametric_segment() {
        let mux: Mux<Recorder> = Mux::new(MuxOptions::default());
        mux.add("GET", "/users/:id", mark("user"), &[]).unwrap();
        mux.seal().unwrap();

        let mut req = Recorder::new();
        mux.dispatch("GET", "/users/42", &mut req).unwrap();
        assert_eq!(req.params, vec![("id".to_string(), "42".to_string())]);
    }

    #[test]
    fn unknown_path_is_not_found() {
        let mux: Mux<Recorder> = Mux::new(MuxOptions::default());
        mux.add("GET", "/health", mark("health"), &[]).unwrap();
        mux.seal().unwrap();

        let mut req = Recorder::new();
        let outcome = mux.dispatch("GET", "/nope", &mut req).unwrap();
        assert!(matches!(outcome, DispatchOutcome::NotFound));
    }

    #[test]
    fn wrong_method_on_a_known_path_is_method_not_allowed() {
        let mux: Mux<Recorder> = Mux::new(MuxOptions::default());
        mux.add("GET", "/health", mark("health"), &[]).unwrap();
        mux.seal().unwrap();

        let mut req = Recorder::new();
        let outcome = mux.dispatch("POST", "/health", &mut req).unwrap();
        match outcome {
            DispatchOutcome::MethodNotAllowed { allowed } => {
                assert_eq!(allowed.as_slice(), &[Box::<str>::from("GET")]);
            }
            other => panic!("expected MethodNotAllowed, got {other:?}"),
        }
    }

    #[test]
    fn strict_slash_installs_a_redirect_companion() {
        let mut options: MuxOptions<Recorder> = MuxOptions::default();
        options.redirect_factory = Some(Arc::new(|_target: String| mark("redirect")));
        let mux: Mux<Recorder> = Mux::new(options);
        mux.add("GET", "/docs/", mark("docs"), &[]).unwrap();
        mux.seal().unwrap();

        let mut req = Recorder::new();
        let outcome = mux.dispatch("GET", "/docs", &mut req).unwrap();
        assert!(matches!(outcome, DispatchOutcome::Redirected));
        assert_eq!(req.calls, vec!["redirect"]);
    }

    #[test]
    fn explicit_registration_overwrites_an_auto_redirect_companion() {
        let mut options: MuxOptions<Recorder> = MuxOptions::default();
        options.redirect_factory = Some(Arc::new(|_target: String| mark("redirect")));
        let mux: Mux<Recorder> = Mux::new(options);
        mux.add("GET", "/docs/", mark("docs"), &[]).unwrap();
        mux.add("GET", "/docs", mark("docs-no-slash"), &[]).unwrap();
        mux.seal().unwrap();

        let mut req = Recorder::new();
        let outcome = mux.dispatch("GET", "/docs", &mut req).unwrap();
        assert!(matches!(outcome, DispatchOutcome::Matched));
        assert_eq!(req.calls, vec!["docs-no-slash"]);
    }

    #[test]
    fn duplicate_explicit_registration_is_rejected() {
        let mux: Mux<Recorder> = Mux::new(MuxOptions::default());
        mux.add("GET", "/health", mark("health"), &[]).unwrap();
        let err = mux.add("GET", "/health", mark("again"), &[]).unwrap_err();
        assert!(matches!(err, MuxError::DuplicateRegistration { .. }));
    }

    #[test]
    fn dispatch_before_seal_is_rejected() {
        let mux: Mux<Recorder> = Mux::new(MuxOptions::default());
        mux.add("GET", "/health", mark("health"), &[]).unwrap();
        let mut req = Recorder::new();
        let err = mux.dispatch("GET", "/health", &mut req).unwrap_err();
        assert!(matches!(err, MuxError::NotSealed));
    }

    #[test]
    fn add_after_seal_is_rejected() {
        let mux: Mux<Recorder> = Mux::new(MuxOptions::default());
        mux.seal().unwrap();
        let err = mux.add("GET", "/health", mark("health"), &[]).unwrap_err();
        assert!(matches!(err, MuxError::AlreadySealed { .. }));
    }

    #[test]
    fn toggle_trailing_slash_skips_capture_rest_patterns() {
        assert_eq!(toggle_trailing_slash("/files/*rest"), None);
        assert_eq!(toggle_trailing_slash("/a"), Some("/a/".to_string()));
        assert_eq!(toggle_trailing_slash("/a/"), Some("/a".to_string()));
    }
}
