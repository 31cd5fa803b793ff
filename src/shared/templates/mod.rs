//! HTML fragment templates (Jinja2 syntax).
//!
//! Templates live in `templates/` at the repository root and are embedded at
//! compile time, so rendering never depends on the working directory.

pub mod engine;

pub use engine::{render_template, TemplateError};
