//! Type mapping from protobuf field type codes to the document model
//!
//! Scalars get a fixed display name; messages, enums and groups keep the
//! symbolic type name exactly as protoc wrote it.

use prost_types::field_descriptor_proto::Type;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Protobuf scalar value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Bytes,
    Uint32,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl ScalarType {
    /// Name shown in rendered documentation
    pub fn display_name(self) -> &'static str {
        match self {
            ScalarType::Double => "double",
            ScalarType::Float => "float",
            ScalarType::Int64 => "int64",
            ScalarType::Uint64 => "uint64",
            ScalarType::Int32 => "int32",
            ScalarType::Fixed64 => "fixed64",
            ScalarType::Fixed32 => "fixed32",
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
            ScalarType::Uint32 => "uint32",
            ScalarType::Sfixed32 => "sfixed32",
            ScalarType::Sfixed64 => "sfixed64",
            ScalarType::Sint32 => "sint32",
            ScalarType::Sint64 => "sint64",
        }
    }
}

/// Declared type of a message field
///
/// Non-scalar types are never resolved here; the name is the one found in
/// the descriptor (usually fully qualified with a leading dot).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Primitive(ScalarType),
    Message(String),
    Enum(String),
    Group(String),
}

impl FieldType {
    /// Display name for scalars, symbolic type name otherwise
    pub fn name(&self) -> &str {
        match self {
            FieldType::Primitive(scalar) => scalar.display_name(),
            FieldType::Message(name) | FieldType::Enum(name) | FieldType::Group(name) => name,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, FieldType::Primitive(_))
    }

    pub fn is_message(&self) -> bool {
        matches!(self, FieldType::Message(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, FieldType::Enum(_))
    }

    fn kind(&self) -> &'static str {
        match self {
            FieldType::Primitive(_) => "primitive",
            FieldType::Message(_) => "message",
            FieldType::Enum(_) => "enum",
            FieldType::Group(_) => "group",
        }
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FieldType", 3)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("is_primitive", &self.is_primitive())?;
        state.end()
    }
}

/// Maps descriptor type codes to `FieldType`
pub struct TypeMapper;

impl TypeMapper {
    /// Map a `FieldDescriptorProto.type` code and its `type_name`
    ///
    /// Returns `None` for codes that are not protobuf field types.
    ///
    /// # Examples
    /// ```
    /// use protodoc_parser::{FieldType, ScalarType, TypeMapper};
    ///
    /// assert_eq!(
    ///     TypeMapper::map_type(5, ""),
    ///     Some(FieldType::Primitive(ScalarType::Int32))
    /// );
    /// assert_eq!(
    ///     TypeMapper::map_type(11, ".pkg.Thing"),
    ///     Some(FieldType::Message(".pkg.Thing".to_string()))
    /// );
    /// assert_eq!(TypeMapper::map_type(99, ""), None);
    /// ```
    pub fn map_type(code: i32, type_name: &str) -> Option<FieldType> {
        let scalar = match Type::try_from(code).ok()? {
            Type::Double => ScalarType::Double,
            Type::Float => ScalarType::Float,
            Type::Int64 => ScalarType::Int64,
            Type::Uint64 => ScalarType::Uint64,
            Type::Int32 => ScalarType::Int32,
            Type::Fixed64 => ScalarType::Fixed64,
            Type::Fixed32 => ScalarType::Fixed32,
            Type::Bool => ScalarType::Bool,
            Type::String => ScalarType::String,
            Type::Bytes => ScalarType::Bytes,
            Type::Uint32 => ScalarType::Uint32,
            Type::Sfixed32 => ScalarType::Sfixed32,
            Type::Sfixed64 => ScalarType::Sfixed64,
            Type::Sint32 => ScalarType::Sint32,
            Type::Sint64 => ScalarType::Sint64,
            Type::Message => return Some(FieldType::Message(type_name.to_string())),
            Type::Enum => return Some(FieldType::Enum(type_name.to_string())),
            Type::Group => return Some(FieldType::Group(type_name.to_string())),
        };

        Some(FieldType::Primitive(scalar))
    }
}
