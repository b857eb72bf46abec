//! Handlebars rendering of merged change logs.
//!
//! Templates receive:
//! - `css`: stylesheet for the HTML page
//! - `releases[]`: `heading`, `version_name`, `version_code`, `date`, `changes[]`

use changelog_core::ReleaseItem;
use handlebars::Handlebars;
use serde_json::{json, Value};
use tracing::debug;

use crate::templates::TemplateSet;
use crate::{OutputFormat, RenderError};

const HTML_TEMPLATE: &str = "html";
const TEXT_TEMPLATE: &str = "text";

/// Placeholder replaced by the version name in the heading format.
pub const VERSION_PLACEHOLDER: &str = "{version}";

pub struct ChangeLogRenderer<'a> {
    handlebars: Handlebars<'a>,
    version_format: String,
    css: String,
}

impl<'a> ChangeLogRenderer<'a> {
    /// Renderer with the built-in templates.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_templates(&TemplateSet::default())
    }

    pub fn with_templates(templates: &TemplateSet) -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars
            .register_template_string(HTML_TEMPLATE, &templates.html)
            .map_err(|e| RenderError::Template(e.to_string()))?;
        handlebars
            .register_template_string(TEXT_TEMPLATE, &templates.text)
            .map_err(|e| RenderError::Template(e.to_string()))?;

        Ok(Self {
            handlebars,
            version_format: changelog_core::config::DEFAULT_VERSION_FORMAT.to_string(),
            css: String::new(),
        })
    }

    /// Heading format, e.g. `"Version {version}"`.
    pub fn version_format(mut self, format: impl Into<String>) -> Self {
        self.version_format = format.into();
        self
    }

    pub fn css(mut self, css: impl Into<String>) -> Self {
        self.css = css.into();
        self
    }

    pub fn heading(&self, release: &ReleaseItem) -> String {
        self.version_format
            .replace(VERSION_PLACEHOLDER, release.version_name())
    }

    pub fn render(&self, releases: &[ReleaseItem], format: OutputFormat) -> Result<String, RenderError> {
        debug!(releases = releases.len(), format = %format, "Rendering change log");
        match format {
            OutputFormat::Html => self.render_template(HTML_TEMPLATE, releases),
            OutputFormat::Text => self.render_template(TEXT_TEMPLATE, releases),
            OutputFormat::Json => serde_json::to_string_pretty(releases)
                .map_err(|e| RenderError::Render(e.to_string())),
        }
    }

    fn render_template(&self, name: &str, releases: &[ReleaseItem]) -> Result<String, RenderError> {
        self.handlebars
            .render(name, &self.template_data(releases))
            .map_err(|e| RenderError::Render(e.to_string()))
    }

    fn template_data(&self, releases: &[ReleaseItem]) -> Value {
        let releases: Vec<Value> = releases
            .iter()
            .map(|release| {
                json!({
                    "heading": self.heading(release),
                    "version_name": release.version_name(),
                    "version_code": release.version_code(),
                    "date": release.date(),
                    "changes": release.changes(),
                })
            })
            .collect();

        json!({
            "css": self.css,
            "releases": releases,
        })
    }
}
