//! Documentation rendering for protobuf files
//!
//! This crate turns documented [`File`] models into pages (Markdown, HTML or
//! JSON) and packs them into the `CodeGeneratorResponse` protoc expects from
//! a plugin.

mod templates;

pub use templates::load_templates;

use prost_types::compiler::code_generator_response::{self, Feature};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use protodoc_common::{output_file_name, DocFormat, GeneratorError, PluginOptions, Result};
use protodoc_parser::{File, RequestParser};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use templates::{template_name, TypeLinker};
use tera::Tera;
use tracing::{debug, info, warn};

/// Documentation generator
///
/// Renders every documented file of a request into one page:
/// - `<name>.md` from the Markdown template
/// - `<name>.html` from the HTML template
/// - `<name>.json`, the serialized model
pub struct DocGenerator {
    options: PluginOptions,
    tera: Tera,
}

impl DocGenerator {
    /// Create a generator; loads (and checks) the templates up front
    pub fn new(options: PluginOptions) -> Result<Self> {
        let tera = templates::load_templates(&options)?;
        Ok(Self { options, tera })
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    /// Render a single file without cross-file links
    pub fn render_file(&self, file: &File) -> Result<String> {
        self.render_with(&self.tera, file)
    }

    /// Render every documented file of a request into a plugin response
    pub fn generate(&self, parser: &RequestParser) -> Result<CodeGeneratorResponse> {
        let files = parser.parse(self.options.include_well_known)?;
        let tera = self.request_templates(parser);

        let mut response = CodeGeneratorResponse {
            supported_features: Some(Feature::Proto3Optional as u64),
            ..Default::default()
        };
        let mut seen = HashSet::new();

        for file in &files {
            let name = output_file_name(&file.name, self.options.format);
            if !seen.insert(name.clone()) {
                warn!(
                    file = %file.name,
                    output = %name,
                    "output name already used by another file; protoc will reject the response"
                );
            }

            let content = self.render_with(&tera, file)?;
            debug!(file = %file.name, output = %name, bytes = content.len(), "rendered");

            response.file.push(code_generator_response::File {
                name: Some(name),
                content: Some(content),
                ..Default::default()
            });
        }

        info!(
            files = response.file.len(),
            format = %self.options.format,
            "documentation generated"
        );

        Ok(response)
    }

    /// Render every documented file into `output_dir`
    ///
    /// Returns the paths written, in request order.
    pub fn generate_to_directory(
        &self,
        parser: &RequestParser,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let response = self.generate(parser)?;

        fs::create_dir_all(output_dir).map_err(|e| {
            GeneratorError::Generation(format!("Failed to create output directory: {}", e))
        })?;

        let mut written = Vec::with_capacity(response.file.len());
        for file in response.file {
            let output_path = output_dir.join(file.name());
            fs::write(&output_path, file.content()).map_err(|e| {
                GeneratorError::Generation(format!(
                    "Failed to write {}: {}",
                    output_path.display(),
                    e
                ))
            })?;
            written.push(output_path);
        }

        Ok(written)
    }

    /// Templates for one request, with `type_link` bound to its type index
    fn request_templates(&self, parser: &RequestParser) -> Tera {
        let mut tera = self.tera.clone();

        if !self.options.links || self.options.format == DocFormat::Json {
            return tera;
        }

        match parser.type_index() {
            Ok(index) => {
                debug!(types = index.len(), "type links enabled");
                tera.register_filter("type_link", TypeLinker::new(index, &self.options));
            }
            Err(e) => warn!(error = %e, "rendering without type links"),
        }

        tera
    }

    fn render_with(&self, tera: &Tera, file: &File) -> Result<String> {
        let Some(template) = template_name(self.options.format) else {
            return Ok(serde_json::to_string_pretty(file)?);
        };

        let mut context = tera::Context::new();
        context.insert("file", file);
        context.insert("all_messages", &file.all_messages());
        context.insert("all_enums", &file.all_enums());
        context.insert("format", &self.options.format);

        tera.render(template, &context).map_err(|e| {
            GeneratorError::Generation(format!(
                "Failed to render {}: {}",
                file.name,
                error_chain(&e)
            ))
        })
    }
}

/// Apply the request's protoc parameter string on top of `options`
///
/// The parameter (`--protodoc_opt=...`) is the last configuration layer, so it
/// overrides whatever the config file, flags or environment selected.
pub fn request_options(
    mut options: PluginOptions,
    parser: &RequestParser,
) -> Result<PluginOptions> {
    if let Some(parameter) = parser.parameter() {
        options.apply_parameter(parameter)?;
        debug!(parameter, "applied plugin parameter");
    }
    Ok(options)
}

/// Run the whole plugin pipeline over a request (convenience function)
pub fn generate_response(
    request: CodeGeneratorRequest,
    options: PluginOptions,
) -> Result<CodeGeneratorResponse> {
    let parser = RequestParser::new(request);
    let generator = DocGenerator::new(request_options(options, &parser)?)?;
    generator.generate(&parser)
}

/// Tera hides the useful part of an error in its source chain
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
