//! Template loading for change log output.
//!
//! A templates file overrides the built-in HTML and text templates:
//!
//! ```yaml
//! html: "<ul>{{#each releases}}<li>{{heading}}</li>{{/each}}</ul>"
//! text: "{{#each releases}}{{{heading}}}\n{{/each}}"
//! ```
//!
//! The built-in HTML template escapes change text, so markup written in a
//! `<change>` (through entities or CDATA) is shown literally rather than
//! interpreted. Use `{{{this}}}` in an override to insert it raw.

use serde::Deserialize;

/// Built-in HTML page: one `<h1>` and `<ul>` per release.
pub const DEFAULT_HTML_TEMPLATE: &str = concat!(
    "<html><head><style type=\"text/css\">{{{css}}}</style></head><body>",
    "{{#each releases}}<h1>{{heading}}</h1><ul>",
    "{{#each changes}}<li>{{this}}</li>{{/each}}",
    "</ul>{{/each}}</body></html>",
);

/// Built-in plain text listing.
pub const DEFAULT_TEXT_TEMPLATE: &str = concat!(
    "{{#each releases}}{{{heading}}}{{#if date}} ({{{date}}}){{/if}}\n",
    "{{#each changes}} * {{{this}}}\n{{/each}}",
    "{{/each}}",
);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateSet {
    #[serde(default = "default_html")]
    pub html: String,
    #[serde(default = "default_text")]
    pub text: String,
}

fn default_html() -> String {
    DEFAULT_HTML_TEMPLATE.to_string()
}

fn default_text() -> String {
    DEFAULT_TEXT_TEMPLATE.to_string()
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            html: default_html(),
            text: default_text(),
        }
    }
}

impl TemplateSet {
    /// Load templates from a YAML file
    pub fn load(path: &str) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read templates file: {}", e))?;
        Self::from_yaml(&content)
    }

    /// Parse templates from YAML content; missing keys keep the built-ins.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse templates YAML: {}", e))
    }
}
