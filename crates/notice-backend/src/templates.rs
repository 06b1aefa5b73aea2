//! Notice templates rendered with handlebars.
//!
//! Three templates are built in: `notice` (the website message),
//! `email_subject` and `email_body`. Any of them can be overridden globally,
//! per language, per notice type, or per language and notice type by
//! registering or loading a template under the matching name.

use std::fs;
use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use notice_core::error::{AppError, ErrorKind};
use notice_core::result::AppResult;

/// Website notice message.
pub const NOTICE: &str = "notice";
/// Email subject line.
pub const EMAIL_SUBJECT: &str = "email_subject";
/// Email body.
pub const EMAIL_BODY: &str = "email_body";

const TEMPLATE_EXTENSION: &str = "hbs";

const DEFAULT_NOTICE: &str = "{{notice.display}}{{#if message}}: {{message}}{{/if}}";

const DEFAULT_EMAIL_SUBJECT: &str = "[{{current_site}}] {{notice.display}}";

const DEFAULT_EMAIL_BODY: &str = "Hello {{recipient.username}},

{{notice.display}}{{#if message}}: {{message}}{{/if}}
{{#if notice.description}}
{{notice.description}}
{{/if}}
{{#if sender_url}}
View it here: {{sender_url}}
{{/if}}
See all your notices at {{notices_url}}

To stop receiving these emails, visit {{unsubscribe_link}}
";

/// Renders notice templates by name with language and type overrides.
#[derive(Debug)]
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Create a renderer with the built-in templates only.
    pub fn new() -> AppResult<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        // Output goes to email bodies and JSON; the host escapes for HTML.
        registry.register_escape_fn(handlebars::no_escape);

        let mut renderer = Self { registry };
        renderer.register(NOTICE, DEFAULT_NOTICE)?;
        renderer.register(EMAIL_SUBJECT, DEFAULT_EMAIL_SUBJECT)?;
        renderer.register(EMAIL_BODY, DEFAULT_EMAIL_BODY)?;
        Ok(renderer)
    }

    /// Create a renderer and load every `*.hbs` file under `dir`.
    ///
    /// A file `de/friends_invite/email_body.hbs` registers the template
    /// `de/friends_invite/email_body`.
    pub fn with_dir(dir: &Path) -> AppResult<Self> {
        let mut renderer = Self::new()?;
        let loaded = renderer.load_dir(dir, dir)?;
        info!(dir = %dir.display(), loaded, "Loaded notice templates");
        Ok(renderer)
    }

    /// Register or replace a template.
    pub fn register(&mut self, name: &str, source: &str) -> AppResult<()> {
        self.registry
            .register_template_string(name, source)
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Template,
                    format!("Invalid template '{name}': {e}"),
                    e,
                )
            })
    }

    /// The first registered name among the lookup candidates.
    pub fn resolve(&self, name: &str, label: &str, language: &str) -> Option<String> {
        candidates(name, label, language)
            .into_iter()
            .find(|candidate| self.registry.has_template(candidate))
    }

    /// Render `name` for a notice type label in a language.
    pub fn render<T: Serialize>(
        &self,
        name: &str,
        label: &str,
        language: &str,
        context: &T,
    ) -> AppResult<String> {
        let resolved = self
            .resolve(name, label, language)
            .ok_or_else(|| AppError::template(format!("No template named '{name}'")))?;
        debug!(template = %resolved, "Rendering notice template");
        self.registry.render(&resolved, context).map_err(|e| {
            AppError::with_source(
                ErrorKind::Template,
                format!("Failed to render template '{resolved}': {e}"),
                e,
            )
        })
    }

    fn load_dir(&mut self, root: &Path, dir: &Path) -> AppResult<usize> {
        let mut loaded = 0;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                loaded += self.load_dir(root, &path)?;
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            let Some(name) = template_name(root, &path) else {
                continue;
            };
            let source = fs::read_to_string(&path)?;
            self.register(&name, &source)?;
            loaded += 1;
        }
        Ok(loaded)
    }
}

/// Lookup order for a template.
fn candidates(name: &str, label: &str, language: &str) -> Vec<String> {
    vec![
        format!("{language}/{label}/{name}"),
        format!("{label}/{name}"),
        format!("{language}/{name}"),
        name.to_string(),
    ]
}

fn template_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
