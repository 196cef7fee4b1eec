//! protoc request decoding

use super::converter::build_file;
use crate::comments::attach_comments;
use crate::model::File;
use crate::resolve::TypeIndex;
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use prost_types::{FileDescriptorProto, FileDescriptorSet};
use protodoc_common::{is_well_known, GeneratorError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Documentation source: the proto files of one protoc invocation
///
/// Wraps a `CodeGeneratorRequest`, either received by the plugin on stdin or
/// assembled from a `FileDescriptorSet` written by `protoc -o`.
#[derive(Debug, Clone)]
pub struct RequestParser {
    request: CodeGeneratorRequest,
}

impl RequestParser {
    pub fn new(request: CodeGeneratorRequest) -> Self {
        Self { request }
    }

    /// Decode a serialized `CodeGeneratorRequest`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let request = CodeGeneratorRequest::decode(bytes)?;
        debug!(
            files = request.proto_file.len(),
            parameter = request.parameter(),
            "decoded CodeGeneratorRequest"
        );
        Ok(Self::new(request))
    }

    /// Decode a serialized `FileDescriptorSet`
    ///
    /// Comments are only present if the set was written with
    /// `--include_source_info`.
    pub fn from_file_descriptor_set(bytes: &[u8]) -> Result<Self> {
        let set = FileDescriptorSet::decode(bytes)?;

        let request = CodeGeneratorRequest {
            file_to_generate: set.file.iter().map(|f| f.name().to_string()).collect(),
            proto_file: set.file,
            ..Default::default()
        };

        Ok(Self::new(request))
    }

    /// Load a `FileDescriptorSet` from a binary file
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = RequestParser::from_file("api.pb")?;
    /// let files = parser.parse(false)?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read FileDescriptorSet file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_file_descriptor_set(&bytes)
    }

    pub fn request(&self) -> &CodeGeneratorRequest {
        &self.request
    }

    /// The `--<plugin>_opt` string protoc forwarded, if any
    pub fn parameter(&self) -> Option<&str> {
        self.request.parameter.as_deref()
    }

    /// File descriptors that should be documented
    pub fn documented_files(
        &self,
        include_well_known: bool,
    ) -> impl Iterator<Item = &FileDescriptorProto> + '_ {
        self.request
            .proto_file
            .iter()
            .filter(move |f| include_well_known || !is_well_known(f.name()))
    }

    /// Build and comment the model of every documented file, in request order
    pub fn parse(&self, include_well_known: bool) -> Result<Vec<File>> {
        self.documented_files(include_well_known)
            .map(document_file)
            .collect()
    }

    /// Cross-reference index over every file in the request
    pub fn type_index(&self) -> Result<TypeIndex> {
        TypeIndex::from_files(self.request.proto_file.clone())
    }
}

/// Build one file's model and attach its source comments
pub fn document_file(proto: &FileDescriptorProto) -> Result<File> {
    let mut file = build_file(proto)?;

    if let Some(info) = &proto.source_code_info {
        attach_comments(&mut file, &info.location);
    }

    debug!(
        file = %file.name,
        messages = file.messages.len(),
        enums = file.enums.len(),
        services = file.services.len(),
        "built document model"
    );

    Ok(file)
}
