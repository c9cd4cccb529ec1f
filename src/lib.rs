//! A compressed radix-trie URL route matcher and request demultiplexer.
//!
//! [`radix`] holds the trie itself: insertion, lookup, and the arena-compaction pass
//! that runs once registration is done. [`pattern`] parses a registration pattern into
//! its `/`-delimited segments. [`path`] normalizes a raw request path before it reaches
//! the trie. [`mux`] is the demultiplexer built on top: [`mux::Mux`] fans routes out by
//! method, composes middleware chains, and resolves a request to a handler invocation,
//! a 404, or a 405.

pub mod errors;
pub mod mux;
pub mod path;
pub mod pattern;
pub mod radix;

pub use errors::{RouterError, RouterErrorCode, RouterResult};
pub use mux::{DispatchOutcome, Group, Handler, Middleware, Mux, MuxError, MuxOptions, MuxResult, Params, RequestContext};
pub use path::NormalizeOptions;
pub use radix::{NodeId, RadixError, RadixResult, Tree};
