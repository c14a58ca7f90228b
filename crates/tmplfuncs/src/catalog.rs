//! The helper catalog and the operations that copy it into function tables.
//!
//! A [`Catalog`] is built once and never changes. The process-wide one is
//! returned by [`catalog`]; it is initialized on first use and can be read
//! from any number of threads.
//!
//! Registration copies entries into a caller-owned [`FuncMap`]:
//!
//! | Operation | Existing name |
//! |-----------|---------------|
//! | [`Catalog::inject`] | kept |
//! | [`Catalog::force_inject`] | replaced |
//! | [`Catalog::inject_with_prefix`] | inserted as `prefix + name` |
//!
//! A function table is handed to MiniJinja with [`register_functions`]
//! (`{{ intcomma(total) }}`) and/or [`register_filters`]
//! (`{{ total | intcomma }}`).

use std::collections::BTreeMap;

use minijinja::value::Rest;
use minijinja::{Environment, Error, State, Value};
use once_cell::sync::Lazy;

use crate::helpers;
use crate::options::HelperOptions;

/// A caller-owned table of template callables, keyed by name.
pub type FuncMap = BTreeMap<String, Value>;

static GLOBAL: Lazy<Catalog> = Lazy::new(|| Catalog::with_options(&HelperOptions::default()));

/// Returns the process-wide catalog built with default options.
pub fn catalog() -> &'static Catalog {
    &GLOBAL
}

/// An immutable set of named helpers.
#[derive(Clone, Debug)]
pub struct Catalog {
    helpers: BTreeMap<&'static str, Value>,
}

impl Catalog {
    /// Builds a catalog whose time helpers follow `options`.
    pub fn with_options(options: &HelperOptions) -> Self {
        let mut helpers = BTreeMap::new();
        helpers::define(&mut helpers, options);
        tracing::debug!(helpers = helpers.len(), "built helper catalog");
        Catalog { helpers }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.helpers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    /// Helper names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.helpers.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.helpers.iter().map(|(name, func)| (*name, func))
    }

    /// Adds every helper whose name is not already in `funcs`.
    pub fn inject(&self, funcs: &mut FuncMap) {
        let mut skipped = 0usize;
        for (name, func) in &self.helpers {
            if funcs.contains_key(*name) {
                skipped += 1;
                continue;
            }
            funcs.insert(name.to_string(), func.clone());
        }
        tracing::debug!(
            inserted = self.helpers.len() - skipped,
            skipped,
            "injected helpers"
        );
    }

    /// Adds every helper, replacing same-named entries in `funcs`.
    pub fn force_inject(&self, funcs: &mut FuncMap) {
        let mut replaced = 0usize;
        for (name, func) in &self.helpers {
            if funcs.insert(name.to_string(), func.clone()).is_some() {
                replaced += 1;
            }
        }
        tracing::debug!(
            inserted = self.helpers.len(),
            replaced,
            "force-injected helpers"
        );
    }

    /// Adds every helper under `prefix + name`.
    ///
    /// Collisions under the prefixed name are overwritten without checks.
    pub fn inject_with_prefix(&self, funcs: &mut FuncMap, prefix: &str) {
        for (name, func) in &self.helpers {
            funcs.insert(format!("{prefix}{name}"), func.clone());
        }
        tracing::debug!(
            inserted = self.helpers.len(),
            prefix,
            "injected prefixed helpers"
        );
    }

    /// A fresh function table holding exactly this catalog.
    pub fn to_func_map(&self) -> FuncMap {
        let mut funcs = FuncMap::new();
        self.force_inject(&mut funcs);
        funcs
    }
}

/// [`Catalog::inject`] on the process-wide catalog.
pub fn inject(funcs: &mut FuncMap) {
    catalog().inject(funcs);
}

/// [`Catalog::force_inject`] on the process-wide catalog.
pub fn force_inject(funcs: &mut FuncMap) {
    catalog().force_inject(funcs);
}

/// [`Catalog::inject_with_prefix`] on the process-wide catalog.
pub fn inject_with_prefix(funcs: &mut FuncMap, prefix: &str) {
    catalog().inject_with_prefix(funcs, prefix);
}

/// Installs every entry of `funcs` as a global function.
///
/// Same-named globals already in `env` are replaced.
pub fn register_functions(env: &mut Environment<'_>, funcs: &FuncMap) {
    for (name, func) in funcs {
        env.add_global(name.clone(), func.clone());
    }
}

/// Installs every entry of `funcs` as a filter.
///
/// The piped value becomes the callable's last argument, so
/// `{{ name | truncatechars(10) }}` calls `truncatechars(10, name)`.
/// Same-named filters, including MiniJinja's built-ins, are replaced.
pub fn register_filters(env: &mut Environment<'_>, funcs: &FuncMap) {
    for (name, func) in funcs {
        let func = func.clone();
        env.add_filter(
            name.clone(),
            move |state: &State, args: Rest<Value>| -> Result<Value, Error> {
                let mut args = args.0;
                // value | f(a, b) arrives as (value, a, b)
                if !args.is_empty() {
                    args.rotate_left(1);
                }
                func.call(state, &args)
            },
        );
    }
}

/// Builds an environment pre-loaded with the whole catalog, both as global
/// functions and as filters.
///
/// The catalog's filters take the place of MiniJinja's built-ins of the same
/// name: `default`, `first`, `join`, `last`, `length`, `lower`, `replace`,
/// `slice`, `title`, `tojson`, `trim`, `upper` and `urlencode`. Two of them
/// read differently from Jinja:
///
/// - `s | replace('a')` removes every `a`; there is no third argument.
/// - `missing | default('x')` renders empty, because only empty strings,
///   sequences, maps and `false` are replaced.
///
/// Build the environment with [`register_functions`] alone to keep the
/// built-in filters.
pub fn new_environment() -> Environment<'static> {
    environment_with(catalog())
}

/// Like [`new_environment`] for a specific catalog.
pub fn environment_with(catalog: &Catalog) -> Environment<'static> {
    let funcs = catalog.to_func_map();
    let mut env = Environment::new();
    register_functions(&mut env, &funcs);
    register_filters(&mut env, &funcs);
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    fn sentinel() -> Value {
        Value::from_function(|_: Value| "mine")
    }

    fn call_lower(funcs: &FuncMap) -> String {
        let mut env = Environment::new();
        register_functions(&mut env, funcs);
        env.render_str("{{ lower('ABC') }}", context! {}).unwrap()
    }

    #[test]
    fn test_global_catalog_is_shared() {
        assert!(std::ptr::eq(catalog(), catalog()));
        assert!(catalog().contains("truncatechars"));
        assert!(!catalog().is_empty());
    }

    #[test]
    fn test_catalog_filters_replace_builtins() {
        let env = new_environment();
        let out = env
            .render_str(
                concat!(
                    "{{ 'banana' | replace('a') }}|",
                    "{{ missing | default('x') }}|",
                    "{{ '' | default('x') }}",
                ),
                context! {},
            )
            .unwrap();
        assert_eq!(out, "bnn||x");
    }

    #[test]
    fn test_builtin_filters_survive_function_only_registration() {
        let mut env = Environment::new();
        register_functions(&mut env, &catalog().to_func_map());
        let out = env
            .render_str("{{ 'banana' | replace('a', 'o') }}", context! {})
            .unwrap();
        assert_eq!(out, "bonono");
    }

    #[test]
    fn test_get_returns_callable_helpers() {
        let env = Environment::new();
        let state = env.empty_state();
        let upper = catalog().get("upper").unwrap();
        let out = upper.call(&state, &[Value::from("abc")]).unwrap();
        assert_eq!(out, Value::from("ABC"));
        assert!(catalog().get("nope").is_none());
    }

    #[test]
    fn test_names_are_sorted_and_unique() {
        let names: Vec<&str> = catalog().names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), catalog().len());
    }

    #[test]
    fn test_inject_keeps_existing() {
        let mut funcs = FuncMap::new();
        funcs.insert("lower".into(), sentinel());
        inject(&mut funcs);
        assert_eq!(funcs.len(), catalog().len());
        assert_eq!(call_lower(&funcs), "mine");
    }

    #[test]
    fn test_force_inject_replaces_existing() {
        let mut funcs = FuncMap::new();
        funcs.insert("lower".into(), sentinel());
        funcs.insert("custom".into(), sentinel());
        force_inject(&mut funcs);
        assert_eq!(funcs.len(), catalog().len() + 1);
        assert!(funcs.contains_key("custom"));
        assert_eq!(call_lower(&funcs), "abc");
    }

    #[test]
    fn test_inject_with_prefix() {
        let mut funcs = FuncMap::new();
        funcs.insert("lower".into(), sentinel());
        inject_with_prefix(&mut funcs, "tf_");
        assert_eq!(funcs.len(), catalog().len() + 1);
        assert!(funcs.contains_key("tf_lower"));
        assert!(funcs
            .keys()
            .filter(|k| k.as_str() != "lower")
            .all(|k| k.starts_with("tf_")));
        assert_eq!(call_lower(&funcs), "mine");
    }

    #[test]
    fn test_filters_take_piped_value_last() {
        let mut env = Environment::new();
        let mut funcs = FuncMap::new();
        catalog().inject(&mut funcs);
        register_filters(&mut env, &funcs);
        let out = env
            .render_str("{{ name | truncatechars(7) }}", context! { name => "Joel is a slug" })
            .unwrap();
        assert_eq!(out, "Joel...");
    }

    #[test]
    fn test_new_environment_has_functions_and_filters() {
        let env = new_environment();
        let out = env
            .render_str(
                "{{ intcomma(n) }}|{{ n | intcomma }}",
                context! { n => 1234567 },
            )
            .unwrap();
        assert_eq!(out, "1,234,567|1,234,567");
    }
}
