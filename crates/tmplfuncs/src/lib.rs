//! # tmplfuncs - Template Helper Functions for MiniJinja
//!
//! `tmplfuncs` is a catalog of small template helpers: string casing and
//! truncation, number formatting, pluralization, relative dates, trust
//! markers for pre-escaped content, and request query rewriting.
//!
//! Every helper is a plain function over [`Value`]s. A helper that receives
//! a value it cannot handle returns a documented fallback (an empty string,
//! zero, `false`, or the input unchanged) instead of failing, so a single odd
//! value never aborts a render.
//!
//! ## Core Concepts
//!
//! - [`Catalog`]: the immutable name → helper table; [`catalog`] returns the
//!   process-wide one
//! - [`FuncMap`]: a caller-owned function table the registration operations
//!   write into
//! - [`inject`], [`force_inject`], [`inject_with_prefix`]: merge the catalog
//!   into a table, keeping, replacing, or prefixing names
//! - [`register_functions`], [`register_filters`]: install a table into a
//!   MiniJinja [`Environment`](minijinja::Environment)
//! - [`Engine`] / [`new_environment`]: ready-made environments with the whole
//!   catalog loaded
//! - [`Timestamp`], [`ObjectId`], [`Request`]: values the time, identity and
//!   query helpers consume
//!
//! ## Quick Start
//!
//! ```rust
//! use minijinja::context;
//!
//! let env = tmplfuncs::new_environment();
//! let output = env.render_str(
//!     "{{ ordinal(place) }} of {{ total | intcomma }}, {{ size | filesizeformat }}",
//!     context! { place => 21, total => 1048576, size => 1536 },
//! ).unwrap();
//! assert_eq!(output, "21st of 1,048,576, 1.5 KB");
//! ```
//!
//! ## Bringing Your Own Table
//!
//! ```rust
//! use minijinja::{context, Environment, Value};
//! use tmplfuncs::{register_functions, FuncMap};
//!
//! let mut funcs = FuncMap::new();
//! funcs.insert("shout".into(), Value::from_function(|s: String| s.to_uppercase()));
//! tmplfuncs::inject_with_prefix(&mut funcs, "h_");
//!
//! let mut env = Environment::new();
//! register_functions(&mut env, &funcs);
//! let output = env
//!     .render_str("{{ shout(h_truncatechars(8, msg)) }}", context! { msg => "hello there" })
//!     .unwrap();
//! assert_eq!(output, "HELLO...");
//! ```

pub mod catalog;
mod engine;
mod error;
pub mod helpers;
mod options;
pub mod values;

pub use catalog::{
    catalog, environment_with, force_inject, inject, inject_with_prefix, new_environment,
    register_filters, register_functions, Catalog, FuncMap,
};
pub use engine::{render, Engine};
pub use error::{RenderError, ValueError};
pub use options::{
    HelperOptions, DEFAULT_TIMEAGO_LAYOUT, DEFAULT_TIMEAGO_MAX, DEFAULT_TIMEZONE,
    DEFAULT_TIME_LAYOUT,
};
pub use values::{ObjectId, Request, Timestamp};

// Re-export minijinja Value for convenience
pub use minijinja::Value;
