//! Embedded templates — the scaffold files compiled into the CLI binary.
//!
//! At compile time, `include_dir!` embeds everything under `cli/templates/`.
//! Templates use `{{ name }}` placeholders, where `name` is a lowercase
//! identifier. Anything else between braces, such as GitHub Actions
//! `${{ matrix.mayhemfile }}` expressions, is left untouched.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use include_dir::{Dir, include_dir};
use regex::{Captures, Regex};

use crate::application::ports::TemplateRenderer;

/// All templates, compiled in at build time.
static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

#[allow(clippy::expect_used)] // compile-time constant pattern
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([a-z_]+)\s*\}\}").expect("valid regex"));

/// Return the raw text of a template without rendering it.
///
/// # Errors
///
/// Returns an error if no template with the given `name` exists or it is
/// not UTF-8.
pub fn template_text(name: &str) -> Result<&'static str> {
    let file = TEMPLATES
        .get_file(name)
        .ok_or_else(|| anyhow::anyhow!("embedded template not found: {name}"))?;
    file.contents_utf8()
        .with_context(|| format!("template {name} is not UTF-8"))
}

/// Substitute `{{ var }}` placeholders in `text`.
///
/// # Errors
///
/// Returns an error naming the first placeholder that has no value in `vars`.
pub fn substitute(text: &str, vars: &[(&str, &str)]) -> Result<String> {
    let mut missing = None;
    let rendered = PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
        let key = &caps[1];
        if let Some((_, value)) = vars.iter().find(|(k, _)| *k == key) {
            (*value).to_string()
        } else {
            missing.get_or_insert_with(|| key.to_string());
            caps[0].to_string()
        }
    });
    if let Some(key) = missing {
        anyhow::bail!("no value for template variable '{key}'");
    }
    Ok(rendered.into_owned())
}

/// `TemplateRenderer` backed by the embedded template directory.
pub struct EmbeddedTemplates;

impl TemplateRenderer for EmbeddedTemplates {
    fn render(&self, name: &str, vars: &[(&str, &str)]) -> Result<String> {
        substitute(template_text(name)?, vars).with_context(|| format!("rendering {name}"))
    }
}
