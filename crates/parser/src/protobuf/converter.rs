//! Converts protobuf descriptors to the document model

use crate::model::{
    Enum, EnumValue, FieldPlacement, File, Message, MessageField, OneOfGroup, Rpc, Service,
};
use crate::type_mapper::TypeMapper;
use protodoc_common::{GeneratorError, Result};
use prost_types::field_descriptor_proto::Label;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    ServiceDescriptorProto,
};

/// Build the (undocumented) model of one file
///
/// Descriptions are left empty; see [`crate::attach_comments`].
pub fn build_file(proto: &FileDescriptorProto) -> Result<File> {
    let mut file = File::new(proto.name());
    file.package = proto.package().to_string();

    for message in &proto.message_type {
        file.messages.push(build_message(message, None)?);
    }

    file.enums
        .extend(proto.enum_type.iter().map(|e| build_enum(e, None)));
    file.services
        .extend(proto.service.iter().map(build_service));

    Ok(file)
}

/// Build a message and everything nested in it
///
/// `prefix` is the qualified name of the enclosing message, if any.
pub fn build_message(proto: &DescriptorProto, prefix: Option<&str>) -> Result<Message> {
    let mut message = Message::new(qualify(prefix, proto.name()));

    // Groups first: fields refer to them by index
    message.oneof_groups.extend(
        proto
            .oneof_decl
            .iter()
            .map(|decl| OneOfGroup::new(decl.name())),
    );

    for field in &proto.field {
        let field = build_field(field)?;
        message.push_field(field)?;
    }

    for group in &mut message.oneof_groups {
        group.synthetic = !group.fields.is_empty() && group.fields.iter().all(|f| f.optional);
    }

    for nested in &proto.nested_type {
        let nested = build_message(nested, Some(&message.name))?;
        message.messages.push(nested);
    }

    let enums: Vec<Enum> = proto
        .enum_type
        .iter()
        .map(|e| build_enum(e, Some(&message.name)))
        .collect();
    message.enums = enums;

    Ok(message)
}

fn build_field(proto: &FieldDescriptorProto) -> Result<MessageField> {
    let code = proto.r#type.unwrap_or_default();
    let field_type = TypeMapper::map_type(code, proto.type_name()).ok_or_else(|| {
        GeneratorError::UnknownFieldType {
            field: proto.name().to_string(),
            code,
        }
    })?;

    let placement = match proto.oneof_index {
        None => FieldPlacement::Direct,
        Some(index) => FieldPlacement::OneOf(usize::try_from(index).map_err(|_| {
            GeneratorError::Parse(format!(
                "Field `{}` has negative oneof index {}",
                proto.name(),
                index
            ))
        })?),
    };

    Ok(MessageField {
        repeated: proto.label() == Label::Repeated,
        optional: proto.proto3_optional(),
        number: proto.number(),
        placement,
        ..MessageField::new(proto.name(), field_type)
    })
}

/// Build an enum; nested enums get the enclosing message's qualified name as prefix
pub fn build_enum(proto: &EnumDescriptorProto, prefix: Option<&str>) -> Enum {
    let mut enumeration = Enum::new(qualify(prefix, proto.name()));
    enumeration.values.extend(
        proto
            .value
            .iter()
            .map(|value| EnumValue::new(value.name(), value.number())),
    );
    enumeration
}

pub fn build_service(proto: &ServiceDescriptorProto) -> Service {
    let mut service = Service::new(proto.name());
    service.rpcs.extend(proto.method.iter().map(|method| Rpc {
        name: method.name().to_string(),
        input_type: method.input_type().to_string(),
        output_type: method.output_type().to_string(),
        client_streaming: method.client_streaming(),
        server_streaming: method.server_streaming(),
        description: String::new(),
    }));
    service
}

fn qualify(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}.{}", prefix, local),
        None => local.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::field_descriptor_proto::Type;
    use prost_types::OneofDescriptorProto;

    fn scalar(name: &str, ty: Type) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            r#type: Some(ty as i32),
            ..Default::default()
        }
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify(None, "Outer"), "Outer");
        assert_eq!(qualify(Some("Outer"), "Inner"), "Outer.Inner");
        assert_eq!(qualify(Some("A.B"), "C"), "A.B.C");
    }

    #[test]
    fn test_build_field_repeated_message() {
        let proto = FieldDescriptorProto {
            name: Some("whatval".to_string()),
            number: Some(3),
            label: Some(Label::Repeated as i32),
            r#type: Some(Type::Message as i32),
            type_name: Some(".What".to_string()),
            ..Default::default()
        };

        let field = build_field(&proto).unwrap();
        assert!(field.repeated);
        assert_eq!(field.number, 3);
        assert!(field.field_type.is_message());
        assert_eq!(field.field_type.name(), ".What");
        assert_eq!(field.placement, FieldPlacement::Direct);
        assert_eq!(field.description, "");
    }

    #[test]
    fn test_build_field_unknown_type_code() {
        let proto = FieldDescriptorProto {
            name: Some("mystery".to_string()),
            r#type: Some(42),
            ..Default::default()
        };

        let err = build_field(&proto).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::UnknownFieldType { code: 42, .. }
        ));
    }

    #[test]
    fn test_build_message_oneof_placement() {
        let proto = DescriptorProto {
            name: Some("Shape".to_string()),
            field: vec![
                scalar("id", Type::String),
                FieldDescriptorProto {
                    oneof_index: Some(0),
                    ..scalar("radius", Type::Double)
                },
                FieldDescriptorProto {
                    oneof_index: Some(0),
                    ..scalar("side", Type::Float)
                },
            ],
            oneof_decl: vec![OneofDescriptorProto {
                name: Some("kind".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let message = build_message(&proto, None).unwrap();
        assert_eq!(message.fields.len(), 1);
        assert_eq!(message.fields[0].name, "id");
        assert_eq!(message.oneof_groups[0].name, "kind");

        let members: Vec<&str> = message.oneof_groups[0]
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(members, vec!["radius", "side"]);
        assert_eq!(message.field(1).unwrap().name, "radius");
    }

    #[test]
    fn test_build_message_proto3_optional() {
        let proto = DescriptorProto {
            name: Some("Settings".to_string()),
            field: vec![
                FieldDescriptorProto {
                    oneof_index: Some(0),
                    proto3_optional: Some(true),
                    ..scalar("retries", Type::Int32)
                },
                FieldDescriptorProto {
                    oneof_index: Some(1),
                    ..scalar("by_id", Type::Int64)
                },
            ],
            oneof_decl: vec![
                OneofDescriptorProto {
                    name: Some("_retries".to_string()),
                    ..Default::default()
                },
                OneofDescriptorProto {
                    name: Some("target".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let message = build_message(&proto, None).unwrap();
        assert!(message.fields.is_empty());
        assert_eq!(message.oneof_groups.len(), 2);

        let retries = &message.oneof_groups[0];
        assert!(retries.synthetic);
        assert!(retries.fields[0].optional);

        let target = &message.oneof_groups[1];
        assert!(!target.synthetic);
        assert!(!target.fields[0].optional);
    }

    #[test]
    fn test_build_message_undeclared_oneof() {
        let proto = DescriptorProto {
            name: Some("Broken".to_string()),
            field: vec![FieldDescriptorProto {
                oneof_index: Some(1),
                ..scalar("x", Type::Bool)
            }],
            ..Default::default()
        };

        assert!(build_message(&proto, None).is_err());
    }

    #[test]
    fn test_build_enum_values() {
        let proto = EnumDescriptorProto {
            name: Some("Color".to_string()),
            value: vec![
                prost_types::EnumValueDescriptorProto {
                    name: Some("RED".to_string()),
                    number: Some(0),
                    ..Default::default()
                },
                prost_types::EnumValueDescriptorProto {
                    name: Some("BLUE".to_string()),
                    number: Some(4),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let enumeration = build_enum(&proto, Some("Palette"));
        assert_eq!(enumeration.name, "Palette.Color");
        assert_eq!(enumeration.values.len(), 2);
        assert_eq!(enumeration.values[1].name, "BLUE");
        assert_eq!(enumeration.values[1].number, 4);
    }
}
