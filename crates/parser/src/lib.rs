//! Document model construction for protobuf files
//!
//! This crate turns the file descriptors of a protoc request into a tree of
//! documentation nodes (`File` → `Message` / `Enum` / `Service` → ...).
//!
//! ## Pipeline
//!
//! 1. **Build**: walk each `FileDescriptorProto` and create a model tree of the
//!    same shape, with field types classified by [`TypeMapper`].
//! 2. **Attach**: replay the file's `SourceCodeInfo` locations and store each
//!    comment on the node its path addresses.
//! 3. **Resolve** (optional): index type names across the whole request so a
//!    renderer can link field types to their definitions.

mod comments;
mod model;
mod protobuf;
mod resolve;
mod type_mapper;

pub use comments::{attach_comments, attach_description, comment_text};
pub use model::{
    Enum, EnumValue, FieldPlacement, File, Message, MessageField, OneOfGroup, Rpc, Service,
};
pub use protobuf::{
    build_enum, build_file, build_message, build_service, document_file, RequestParser,
};
pub use resolve::{TypeIndex, TypeLocation};
pub use type_mapper::{FieldType, ScalarType, TypeMapper};
