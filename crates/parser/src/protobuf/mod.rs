//! Protobuf descriptor input
//!
//! Reads the descriptors protoc hands to a plugin and turns each file into a
//! documented [`File`](crate::File).
//!
//! ## Sources
//! - **CodeGeneratorRequest**: what protoc writes to a plugin's stdin
//! - **FileDescriptorSet**: `protoc --include_source_info -o api.pb ...`
//!
//! ## Example
//! ```rust,ignore
//! use protodoc_parser::RequestParser;
//!
//! let parser = RequestParser::from_bytes(&stdin_bytes)?;
//! for file in parser.parse(false)? {
//!     println!("{}: {} messages", file.name, file.messages.len());
//! }
//! ```

mod converter;
mod parser;

pub use converter::{build_enum, build_file, build_message, build_service};
pub use parser::{document_file, RequestParser};
