//! Jinja environment setup for SQL templates

use crate::error::{JinjaError, JinjaResult};
use crate::template::{SlotValues, SqlTemplate};
use minijinja::{Environment, UndefinedBehavior};
use std::collections::BTreeSet;

/// Strict Jinja environment that compiles and renders [`SqlTemplate`]s.
///
/// Undefined variables are render errors, never empty strings, so a slot
/// that slips past compilation still cannot produce half-filled SQL.
pub struct TemplateEnvironment {
    env: Environment<'static>,
}

impl TemplateEnvironment {
    /// Create a new environment with strict undefined behavior
    pub fn new() -> Self {
        Self { env: strict_env() }
    }

    /// Compile template text, checking its variables against `allowed` slots.
    pub fn compile(&self, key: &str, text: &str, allowed: &[&str]) -> JinjaResult<SqlTemplate> {
        // Template handles borrow their source for the environment's lifetime,
        // so inspection happens in a scratch environment scoped to `text`.
        let scratch = strict_env();
        let template = scratch
            .template_from_str(text)
            .map_err(|e| JinjaError::SyntaxError {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        let used: BTreeSet<String> = template.undeclared_variables(false).into_iter().collect();
        if let Some(unknown) = used.iter().find(|slot| !allowed.contains(&slot.as_str())) {
            return Err(JinjaError::UnknownSlot {
                key: key.to_string(),
                slot: unknown.clone(),
                known: allowed.join(", "),
            });
        }

        for slot in allowed {
            if !used.contains(*slot) {
                log::debug!("Template '{}' does not use slot '{}'", key, slot);
            }
        }

        Ok(SqlTemplate::from_parts(key, text.trim(), used))
    }

    /// Render a compiled template with the given slot values
    pub fn render(&self, template: &SqlTemplate, values: &SlotValues) -> JinjaResult<String> {
        if let Some(missing) = template.slots().find(|slot| !values.contains(slot)) {
            return Err(JinjaError::MissingSlot {
                key: template.key().to_string(),
                slot: missing.to_string(),
            });
        }

        let rendered = self
            .env
            .render_str(template.text(), values.as_map())
            .map_err(JinjaError::from)?;

        Ok(rendered.trim().to_string())
    }
}

fn strict_env<'s>() -> Environment<'s> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}

impl Default for TemplateEnvironment {
    fn default() -> Self {
        Self::new()
    }
}
