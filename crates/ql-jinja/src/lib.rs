//! ql-jinja - Parameterized SQL text for Quill
//!
//! SQL templates are plain Jinja text whose variables are a closed set of
//! named slots. Slots are checked when a template is compiled, so a template
//! that references an unknown slot never makes it into the rule catalog, and
//! rendering runs with strict undefined behavior.

pub mod environment;
pub mod error;
pub mod template;

pub use environment::TemplateEnvironment;
pub use error::{JinjaError, JinjaResult};
pub use template::{SlotValues, SqlTemplate};
