//! Compiled cell templates.
//!
//! Cell templates are MiniJinja sources compiled once when the column is
//! registered and rendered once per row. Templates created with
//! [`CellTemplate::html`] auto-escape interpolated values; plain templates
//! behave like string substitution.

use std::fmt;
use std::sync::Arc;

use minijinja::Environment;
use serde::Serialize;

use crate::error::Result;

const PLAIN: &str = "cell";
const HTML: &str = "cell.html";

/// A template compiled into its own environment.
#[derive(Clone)]
pub struct CellTemplate {
    source: String,
    name: &'static str,
    env: Arc<Environment<'static>>,
}

impl CellTemplate {
    /// Compiles a template that outputs values verbatim.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        Self::compile(source.into(), PLAIN)
    }

    /// Compiles a template that HTML-escapes every interpolated value.
    pub fn html(source: impl Into<String>) -> Result<Self> {
        Self::compile(source.into(), HTML)
    }

    fn compile(source: String, name: &'static str) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template_owned(name, source.clone())?;
        Ok(Self {
            source,
            name,
            env: Arc::new(env),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Renders the template against a serializable context.
    pub fn render<S: Serialize>(&self, context: S) -> Result<String> {
        let template = self.env.get_template(self.name)?;
        Ok(template.render(context)?)
    }
}

impl fmt::Debug for CellTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellTemplate")
            .field("source", &self.source)
            .field("html", &(self.name == HTML))
            .finish()
    }
}
