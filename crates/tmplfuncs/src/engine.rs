//! A MiniJinja environment pre-loaded with the helper catalog.
//!
//! [`Engine`] is the ready-to-use option for callers who do not manage their
//! own function table: every helper is available both as a function and as a
//! filter. The filters replace MiniJinja's built-ins of the same name; see
//! [`new_environment`](crate::new_environment) for the list.
//!
//! ```rust
//! use tmplfuncs::Engine;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Cart { items: u32, total: u64 }
//!
//! let engine = Engine::new();
//! let output = engine.render_template(
//!     "{{ items }} item{{ pluralize('s', items) }}, {{ total | intcomma }} credits",
//!     &Cart { items: 3, total: 1250000 },
//! ).unwrap();
//! assert_eq!(output, "3 items, 1,250,000 credits");
//! ```

use std::collections::HashMap;

use minijinja::{Environment, Value};
use serde::Serialize;

use crate::catalog::{catalog, environment_with, Catalog};
use crate::error::RenderError;

pub struct Engine {
    env: Environment<'static>,
}

impl Engine {
    /// Creates an engine loaded with the process-wide catalog.
    pub fn new() -> Self {
        Self::with_catalog(catalog())
    }

    pub fn with_catalog(catalog: &Catalog) -> Self {
        Engine {
            env: environment_with(catalog),
        }
    }

    /// Returns a reference to the underlying MiniJinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// Use it to register more functions or to configure auto-escaping.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Compiles and stores a named template.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())?;
        Ok(())
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Compiles and renders a template string in one step.
    pub fn render_template<S: Serialize>(
        &self,
        template: &str,
        data: &S,
    ) -> Result<String, RenderError> {
        Ok(self.env.render_str(template, Value::from_serialize(data))?)
    }

    /// Renders a template previously stored with [`add_template`](Self::add_template).
    pub fn render_named<S: Serialize>(&self, name: &str, data: &S) -> Result<String, RenderError> {
        let tmpl = self.env.get_template(name)?;
        Ok(tmpl.render(Value::from_serialize(data))?)
    }

    /// Renders with extra context values merged under the serialized `data`.
    ///
    /// `context` carries values serde cannot produce, such as
    /// [`Timestamp`](crate::Timestamp) or [`Request`](crate::Request)
    /// objects. On key conflicts `data` wins.
    pub fn render_with_context<S: Serialize>(
        &self,
        template: &str,
        data: &S,
        context: HashMap<String, Value>,
    ) -> Result<String, RenderError> {
        let mut combined = context;
        if let serde_json::Value::Object(map) = serde_json::to_value(data)? {
            for (key, value) in map {
                combined.insert(key, Value::from_serialize(&value));
            }
        }
        Ok(self.env.render_str(template, &combined)?)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders `template` once with a fresh [`Engine`].
pub fn render<S: Serialize>(template: &str, data: &S) -> Result<String, RenderError> {
    Engine::new().render_template(template, data)
}
