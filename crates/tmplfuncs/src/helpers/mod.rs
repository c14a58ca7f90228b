//! Helper definitions, grouped by what they work on.
//!
//! Every helper takes [`Value`] arguments, checks their kinds first, and
//! returns its documented fallback when they do not fit. Nothing here returns
//! an error or panics on bad input: one odd value must never abort a render.
//!
//! Most helpers take the value they transform as their last argument, so they
//! read the same called directly (`truncatechars(3, name)`) or piped
//! (`name | truncatechars(3)`). The time, request and membership helpers take
//! their subject first and are meant to be called as functions.

pub mod collections;
pub mod identity;
pub mod markdown;
pub mod numbers;
pub mod query;
pub mod safe;
pub mod strings;
pub mod time;

use std::collections::BTreeMap;

use minijinja::Value;

use crate::options::HelperOptions;

/// Name → callable, as built into a [`Catalog`](crate::Catalog).
pub(crate) type Entries = BTreeMap<&'static str, Value>;

/// Adds every helper to `entries`.
pub(crate) fn define(entries: &mut Entries, options: &HelperOptions) {
    strings::define(entries);
    numbers::define(entries);
    collections::define(entries);
    identity::define(entries);
    query::define(entries);
    safe::define(entries);
    markdown::define(entries);
    time::define(entries, options);
}

/// Records a rejected input and hands back the helper's fallback.
pub(crate) fn fail_soft<T>(helper: &'static str, reason: &'static str, fallback: T) -> T {
    tracing::trace!(helper, reason, "helper input rejected, using fallback");
    fallback
}
