//! Document model
//!
//! Every node mirrors one descriptor in a protoc request. Child lists keep
//! declaration order because `SourceCodeInfo` paths address children by
//! position.

use crate::type_mapper::FieldType;
use protodoc_common::{GeneratorError, Result};
use serde::Serialize;

/// One documented `.proto` file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct File {
    /// File path as declared to protoc (e.g. `api/v1/user.proto`)
    pub name: String,
    pub package: String,
    pub description: String,
    pub messages: Vec<Message>,
    pub services: Vec<Service>,
    pub enums: Vec<Enum>,
}

impl File {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Every message in the file, depth first, in declaration order
    pub fn all_messages(&self) -> Vec<&Message> {
        let mut out = Vec::new();
        for message in &self.messages {
            out.push(message);
            out.extend(message.descendants());
        }
        out
    }

    /// Top-level enums followed by enums nested in messages (depth first)
    pub fn all_enums(&self) -> Vec<&Enum> {
        let mut out: Vec<&Enum> = self.enums.iter().collect();
        for message in self.all_messages() {
            out.extend(message.enums.iter());
        }
        out
    }
}

/// Where a field is stored inside its message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(into = "Option<usize>")]
pub enum FieldPlacement {
    /// In the message's own field list
    #[default]
    Direct,
    /// In `oneof_groups[index]`
    OneOf(usize),
}

impl From<FieldPlacement> for Option<usize> {
    fn from(placement: FieldPlacement) -> Self {
        match placement {
            FieldPlacement::Direct => None,
            FieldPlacement::OneOf(group) => Some(group),
        }
    }
}

/// Declaration-order slot of a field: where it ended up after partitioning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FieldSlot {
    placement: FieldPlacement,
    position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub repeated: bool,
    /// Declared with proto3 `optional` (explicit presence)
    pub optional: bool,
    pub number: i32,
    #[serde(rename = "oneof_index")]
    pub placement: FieldPlacement,
    pub description: String,
}

impl MessageField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            repeated: false,
            optional: false,
            number: 0,
            placement: FieldPlacement::Direct,
            description: String::new(),
        }
    }
}

/// Fields of a message of which at most one is set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OneOfGroup {
    pub name: String,
    pub fields: Vec<MessageField>,
    pub description: String,
    /// Generated by protoc for a proto3 `optional` field, not written by the user
    pub synthetic: bool,
}

impl OneOfGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Message {
    /// Qualified with the enclosing message names (`Outer.Inner`)
    pub name: String,
    /// Fields that are not members of a oneof
    pub fields: Vec<MessageField>,
    pub messages: Vec<Message>,
    pub oneof_groups: Vec<OneOfGroup>,
    pub enums: Vec<Enum>,
    pub description: String,
    #[serde(skip)]
    slots: Vec<FieldSlot>,
}

impl Message {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Store the next declared field according to its placement
    ///
    /// Oneof groups must be added before their member fields.
    pub fn push_field(&mut self, field: MessageField) -> Result<()> {
        let list = match field.placement {
            FieldPlacement::Direct => &mut self.fields,
            FieldPlacement::OneOf(group) => match self.oneof_groups.get_mut(group) {
                Some(group) => &mut group.fields,
                None => {
                    return Err(GeneratorError::Parse(format!(
                        "Field `{}` of message `{}` refers to undeclared oneof #{}",
                        field.name, self.name, group
                    )));
                }
            },
        };

        self.slots.push(FieldSlot {
            placement: field.placement,
            position: list.len(),
        });
        list.push(field);
        Ok(())
    }

    /// Number of declared fields, oneof members included
    pub fn field_count(&self) -> usize {
        self.slots.len()
    }

    /// Field by declaration index, wherever it is stored
    pub fn field(&self, declared: usize) -> Option<&MessageField> {
        let slot = self.slots.get(declared)?;
        match slot.placement {
            FieldPlacement::Direct => self.fields.get(slot.position),
            FieldPlacement::OneOf(group) => self.oneof_groups.get(group)?.fields.get(slot.position),
        }
    }

    pub fn field_mut(&mut self, declared: usize) -> Option<&mut MessageField> {
        let slot = *self.slots.get(declared)?;
        match slot.placement {
            FieldPlacement::Direct => self.fields.get_mut(slot.position),
            FieldPlacement::OneOf(group) => self
                .oneof_groups
                .get_mut(group)?
                .fields
                .get_mut(slot.position),
        }
    }

    /// All fields in declaration order
    pub fn declared_fields(&self) -> impl Iterator<Item = &MessageField> + '_ {
        (0..self.field_count()).filter_map(move |i| self.field(i))
    }

    /// Nested messages at every depth, depth first
    pub fn descendants(&self) -> Vec<&Message> {
        let mut out = Vec::new();
        for message in &self.messages {
            out.push(message);
            out.extend(message.descendants());
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Enum {
    /// Qualified with the enclosing message names when nested
    pub name: String,
    pub values: Vec<EnumValue>,
    pub description: String,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
    pub description: String,
}

impl EnumValue {
    pub fn new(name: impl Into<String>, number: i32) -> Self {
        Self {
            name: name.into(),
            number,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Service {
    pub name: String,
    pub rpcs: Vec<Rpc>,
    pub description: String,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// One service method
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Rpc {
    pub name: String,
    /// Request message name, unresolved
    pub input_type: String,
    /// Response message name, unresolved
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
    pub description: String,
}
