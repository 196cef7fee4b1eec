//! Attaches `SourceCodeInfo` comments to the document model
//!
//! A location path is a sequence of `(field number, index)` pairs naming the
//! repeated descriptor field followed at each level, e.g. `[4, 0, 2, 1]` is
//! `message_type[0].field[1]`. The walk below consumes one pair per level;
//! whatever node it stands on when fewer than two elements remain receives
//! the comment.

use crate::model::File;
use crate::model::{Enum, EnumValue, Message, MessageField, OneOfGroup, Rpc, Service};
use prost_types::source_code_info::Location;
use tracing::trace;

/// Descriptor field numbers (from `descriptor.proto`) followed by paths
mod field_number {
    pub const FILE_MESSAGE_TYPE: i32 = 4;
    pub const FILE_ENUM_TYPE: i32 = 5;
    pub const FILE_SERVICE: i32 = 6;
    pub const MESSAGE_FIELD: i32 = 2;
    pub const MESSAGE_NESTED_TYPE: i32 = 3;
    pub const MESSAGE_ENUM_TYPE: i32 = 4;
    pub const MESSAGE_ONEOF_DECL: i32 = 8;
    pub const SERVICE_METHOD: i32 = 2;
    pub const ENUM_VALUE: i32 = 2;
}

/// Kind of model node a path step starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    File,
    Message,
    Field,
    OneOf,
    Enum,
    EnumValue,
    Service,
    Rpc,
}

/// Child list a path step descends into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    FileMessages,
    FileEnums,
    FileServices,
    MessageFields,
    NestedMessages,
    NestedEnums,
    OneofGroups,
    ServiceMethods,
    EnumValues,
}

/// Navigation table: (current node, field number) -> child list
const STEPS: [(NodeKind, i32, Container); 9] = [
    (NodeKind::File, field_number::FILE_MESSAGE_TYPE, Container::FileMessages),
    (NodeKind::File, field_number::FILE_ENUM_TYPE, Container::FileEnums),
    (NodeKind::File, field_number::FILE_SERVICE, Container::FileServices),
    (NodeKind::Message, field_number::MESSAGE_FIELD, Container::MessageFields),
    (NodeKind::Message, field_number::MESSAGE_NESTED_TYPE, Container::NestedMessages),
    (NodeKind::Message, field_number::MESSAGE_ENUM_TYPE, Container::NestedEnums),
    (NodeKind::Message, field_number::MESSAGE_ONEOF_DECL, Container::OneofGroups),
    (NodeKind::Service, field_number::SERVICE_METHOD, Container::ServiceMethods),
    (NodeKind::Enum, field_number::ENUM_VALUE, Container::EnumValues),
];

/// Mutable handle on any describable node
enum Node<'a> {
    File(&'a mut File),
    Message(&'a mut Message),
    Field(&'a mut MessageField),
    OneOf(&'a mut OneOfGroup),
    Enum(&'a mut Enum),
    EnumValue(&'a mut EnumValue),
    Service(&'a mut Service),
    Rpc(&'a mut Rpc),
}

impl Node<'_> {
    fn kind(&self) -> NodeKind {
        match self {
            Node::File(_) => NodeKind::File,
            Node::Message(_) => NodeKind::Message,
            Node::Field(_) => NodeKind::Field,
            Node::OneOf(_) => NodeKind::OneOf,
            Node::Enum(_) => NodeKind::Enum,
            Node::EnumValue(_) => NodeKind::EnumValue,
            Node::Service(_) => NodeKind::Service,
            Node::Rpc(_) => NodeKind::Rpc,
        }
    }

    fn set_description(self, description: &str) {
        let text = description.to_string();
        match self {
            Node::File(n) => n.description = text,
            Node::Message(n) => n.description = text,
            Node::Field(n) => n.description = text,
            Node::OneOf(n) => n.description = text,
            Node::Enum(n) => n.description = text,
            Node::EnumValue(n) => n.description = text,
            Node::Service(n) => n.description = text,
            Node::Rpc(n) => n.description = text,
        }
    }
}

impl Container {
    fn lookup(kind: NodeKind, tag: i32) -> Option<Self> {
        STEPS
            .iter()
            .find(|(from, number, _)| *from == kind && *number == tag)
            .map(|(_, _, container)| *container)
    }

    fn descend<'a>(self, node: Node<'a>, index: usize) -> Option<Node<'a>> {
        match (self, node) {
            (Container::FileMessages, Node::File(f)) => {
                f.messages.get_mut(index).map(Node::Message)
            }
            (Container::FileEnums, Node::File(f)) => f.enums.get_mut(index).map(Node::Enum),
            (Container::FileServices, Node::File(f)) => {
                f.services.get_mut(index).map(Node::Service)
            }
            // Declaration index, not the position in the partitioned storage
            (Container::MessageFields, Node::Message(m)) => m.field_mut(index).map(Node::Field),
            (Container::NestedMessages, Node::Message(m)) => {
                m.messages.get_mut(index).map(Node::Message)
            }
            (Container::NestedEnums, Node::Message(m)) => m.enums.get_mut(index).map(Node::Enum),
            (Container::OneofGroups, Node::Message(m)) => {
                m.oneof_groups.get_mut(index).map(Node::OneOf)
            }
            (Container::ServiceMethods, Node::Service(s)) => s.rpcs.get_mut(index).map(Node::Rpc),
            (Container::EnumValues, Node::Enum(e)) => e.values.get_mut(index).map(Node::EnumValue),
            _ => None,
        }
    }
}

/// Join the comments of one location
///
/// Leading, trailing, then each detached block, separated by a single space.
/// Returns `None` when the location carries no comment text at all.
pub fn comment_text(location: &Location) -> Option<String> {
    let detached = &location.leading_detached_comments;
    let parts: Vec<&str> = location
        .leading_comments
        .as_deref()
        .into_iter()
        .chain(location.trailing_comments.as_deref())
        .chain(detached.iter().map(String::as_str))
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Set the description of the node addressed by `path`
///
/// Paths that lead nowhere in the model (options, names, out-of-range
/// indices) are ignored.
pub fn attach_description(file: &mut File, path: &[i32], description: &str) {
    let mut node = Node::File(file);
    let mut rest = path;

    while let [tag, index, tail @ ..] = rest {
        let Some(container) = Container::lookup(node.kind(), *tag) else {
            trace!(?path, tag, "no model node for path step");
            return;
        };
        let Ok(index) = usize::try_from(*index) else {
            trace!(?path, index, "negative index in path");
            return;
        };
        node = match container.descend(node, index) {
            Some(child) => child,
            None => {
                trace!(?path, index, "path index out of range");
                return;
            }
        };
        rest = tail;
    }

    node.set_description(description);
}

/// Populate descriptions from a file's source-info locations
pub fn attach_comments(file: &mut File, locations: &[Location]) {
    for location in locations {
        if let Some(text) = comment_text(location) {
            attach_description(file, &location.path, &text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(leading: Option<&str>, trailing: Option<&str>, detached: &[&str]) -> Location {
        Location {
            path: vec![],
            leading_comments: leading.map(String::from),
            trailing_comments: trailing.map(String::from),
            leading_detached_comments: detached.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_comment_text_leading_only_is_verbatim() {
        let text = " Enum docstring\n With multiple lines\n foobar\n";
        assert_eq!(
            comment_text(&location(Some(text), None, &[])),
            Some(text.to_string())
        );
    }

    #[test]
    fn test_comment_text_join_order() {
        let loc = location(Some("lead"), Some("trail"), &["one", "two"]);
        assert_eq!(comment_text(&loc), Some("lead trail one two".to_string()));
    }

    #[test]
    fn test_comment_text_skips_empty_parts() {
        let loc = location(Some(""), Some("trail"), &["", "detached"]);
        assert_eq!(comment_text(&loc), Some("trail detached".to_string()));
        assert_eq!(comment_text(&location(None, Some(""), &[])), None);
    }

    #[test]
    fn test_container_lookup() {
        assert_eq!(
            Container::lookup(NodeKind::File, 4),
            Some(Container::FileMessages)
        );
        assert_eq!(
            Container::lookup(NodeKind::Message, 4),
            Some(Container::NestedEnums)
        );
        assert_eq!(Container::lookup(NodeKind::File, 8), None);
        assert_eq!(Container::lookup(NodeKind::Field, 2), None);
        assert_eq!(Container::lookup(NodeKind::Rpc, 2), None);
    }

    #[test]
    fn test_short_path_targets_file() {
        let mut file = File::new("a.proto");
        attach_description(&mut file, &[], "file docs");
        assert_eq!(file.description, "file docs");

        attach_description(&mut file, &[12], "syntax docs");
        assert_eq!(file.description, "syntax docs");
    }

    #[test]
    fn test_unknown_paths_are_ignored() {
        let mut file = File::new("a.proto");
        file.messages.push(Message::new("Only"));

        attach_description(&mut file, &[4, 1], "out of range");
        attach_description(&mut file, &[4, -1], "negative");
        attach_description(&mut file, &[8, 0], "file options");
        attach_description(&mut file, &[4, 0, 7, 0], "message options");

        assert_eq!(file.description, "");
        assert_eq!(file.messages[0].description, "");
    }
}
