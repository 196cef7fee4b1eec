//! Template loading and management

use protodoc_common::{anchor_id, is_well_known, output_file_name, DocFormat};
use protodoc_common::{GeneratorError, PluginOptions, Result};
use protodoc_parser::TypeIndex;
use std::collections::HashMap;
use tera::{Tera, Value};

pub(crate) const MARKDOWN_TEMPLATE: &str = "file.md";
pub(crate) const HTML_TEMPLATE: &str = "file.html";

/// Template used for a format; JSON output does not go through Tera
pub(crate) fn template_name(format: DocFormat) -> Option<&'static str> {
    match format {
        DocFormat::Markdown => Some(MARKDOWN_TEMPLATE),
        DocFormat::Html => Some(HTML_TEMPLATE),
        DocFormat::Json => None,
    }
}

/// Load the built-in templates, or the user's template for the selected format
pub fn load_templates(options: &PluginOptions) -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("anchor", anchor_filter);
    tera.register_filter("oneline", oneline_filter);
    // Replaced per request once a type index exists
    tera.register_filter("type_link", no_link_filter);

    tera.add_raw_template(MARKDOWN_TEMPLATE, include_str!("../templates/file.md.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load markdown template: {}", e))
        })?;

    tera.add_raw_template(HTML_TEMPLATE, include_str!("../templates/file.html.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load html template: {}", e))
        })?;

    if let Some(path) = &options.template {
        let name = template_name(options.format).ok_or_else(|| {
            GeneratorError::Config("A custom template cannot be used with json output".to_string())
        })?;

        tera.add_template_file(path, Some(name)).map_err(|e| {
            GeneratorError::Generation(format!(
                "Failed to load template {}: {}",
                path.display(),
                e
            ))
        })?;
    }

    Ok(tera)
}

/// `type_link` filter: href of the page section documenting a type
pub(crate) struct TypeLinker {
    index: TypeIndex,
    format: DocFormat,
    include_well_known: bool,
}

impl TypeLinker {
    pub(crate) fn new(index: TypeIndex, options: &PluginOptions) -> Self {
        Self {
            index,
            format: options.format,
            include_well_known: options.include_well_known,
        }
    }

    pub(crate) fn href(&self, type_name: &str) -> Option<String> {
        let location = self.index.lookup(type_name)?;
        if !self.include_well_known && is_well_known(&location.file) {
            return None;
        }

        Some(format!(
            "{}#{}",
            output_file_name(&location.file, self.format),
            anchor_id(&location.anchor)
        ))
    }
}

impl tera::Filter for TypeLinker {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        let type_name = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("type_link filter expects a string"))?;

        Ok(Value::String(self.href(type_name).unwrap_or_default()))
    }
}

fn no_link_filter(_value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(String::new()))
}

/// Filter to turn a qualified name into an anchor id
fn anchor_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("anchor filter expects a string"))?;

    Ok(Value::String(anchor_id(name)))
}

/// Filter to squeeze a comment onto one line (Markdown table cells)
fn oneline_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("oneline filter expects a string"))?;

    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    Ok(Value::String(joined.replace('|', "\\|")))
}
