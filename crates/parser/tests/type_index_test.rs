//! Integration tests for the cross-reference index

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto,
};
use protodoc_parser::{RequestParser, TypeIndex};

fn create_shared_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("shop/common.proto".to_string()),
        package: Some("shop".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("Money".to_string()),
            field: vec![FieldDescriptorProto {
                name: Some("cents".to_string()),
                number: Some(1),
                label: Some(Label::Optional as i32),
                r#type: Some(Type::Int64 as i32),
                ..Default::default()
            }],
            nested_type: vec![DescriptorProto {
                name: Some("Currency".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }],
        enum_type: vec![EnumDescriptorProto {
            name: Some("Status".to_string()),
            value: vec![EnumValueDescriptorProto {
                name: Some("STATUS_UNSPECIFIED".to_string()),
                number: Some(0),
                ..Default::default()
            }],
            ..Default::default()
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn create_order_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("shop/order.proto".to_string()),
        package: Some("shop".to_string()),
        dependency: vec!["shop/common.proto".to_string()],
        message_type: vec![DescriptorProto {
            name: Some("Order".to_string()),
            field: vec![
                FieldDescriptorProto {
                    name: Some("total".to_string()),
                    number: Some(1),
                    label: Some(Label::Optional as i32),
                    r#type: Some(Type::Message as i32),
                    type_name: Some(".shop.Money".to_string()),
                    ..Default::default()
                },
                FieldDescriptorProto {
                    name: Some("status".to_string()),
                    number: Some(2),
                    label: Some(Label::Optional as i32),
                    r#type: Some(Type::Enum as i32),
                    type_name: Some(".shop.Status".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_index_spans_files() {
    let index = TypeIndex::from_files(vec![create_shared_file(), create_order_file()]).unwrap();

    let money = index.lookup(".shop.Money").expect("Money should be indexed");
    assert_eq!(money.file, "shop/common.proto");
    assert_eq!(money.anchor, "Money");

    let currency = index.lookup("shop.Money.Currency").unwrap();
    assert_eq!(currency.anchor, "Money.Currency");

    let status = index.lookup(".shop.Status").unwrap();
    assert_eq!(status.file, "shop/common.proto");
    assert_eq!(status.anchor, "Status");

    let order = index.lookup(".shop.Order").unwrap();
    assert_eq!(order.file, "shop/order.proto");

    assert!(index.lookup(".shop.Missing").is_none());
    assert_eq!(index.len(), 4);
}

#[test]
fn test_index_rejects_dangling_reference() {
    // order.proto refers to types whose file is absent
    let result = TypeIndex::from_files(vec![create_order_file()]);
    assert!(result.is_err());
}

#[test]
fn test_index_from_parser() {
    let parser = RequestParser::new(prost_types::compiler::CodeGeneratorRequest {
        proto_file: vec![create_shared_file(), create_order_file()],
        ..Default::default()
    });

    let index = parser.type_index().unwrap();
    assert!(index.lookup(".shop.Order").is_some());
}
