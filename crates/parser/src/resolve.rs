//! Cross-reference index for symbolic type names
//!
//! The document model keeps message and enum references as the text protoc
//! wrote (`.pkg.Outer.Inner`). Renderers that want hyperlinks look those
//! names up here after every file in the request has been loaded, since a
//! type may live in another file.

use prost_reflect::DescriptorPool;
use prost_types::{FileDescriptorProto, FileDescriptorSet};
use protodoc_common::{GeneratorError, Result};
use std::collections::HashMap;

/// Where a named type is documented
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLocation {
    /// Declared name of the defining proto file
    pub file: String,
    /// Qualified model name of the type (package stripped)
    pub anchor: String,
}

/// Full type name -> documentation location
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    entries: HashMap<String, TypeLocation>,
}

impl TypeIndex {
    /// Index every message and enum of a self-contained set of files
    ///
    /// Fails if the files do not form a valid descriptor pool (missing
    /// dependencies, unresolvable type names).
    pub fn from_files(files: Vec<FileDescriptorProto>) -> Result<Self> {
        let pool = DescriptorPool::from_file_descriptor_set(FileDescriptorSet { file: files })
            .map_err(|e| {
                GeneratorError::Parse(format!("Failed to create DescriptorPool: {}", e))
            })?;

        let messages = pool
            .all_messages()
            .map(|m| (m.full_name().to_string(), m.parent_file()));
        let enums = pool
            .all_enums()
            .map(|e| (e.full_name().to_string(), e.parent_file()));

        let entries = messages
            .chain(enums)
            .map(|(full_name, file)| {
                let location = TypeLocation {
                    file: file.name().to_string(),
                    anchor: strip_package(&full_name, file.package_name()),
                };
                (full_name, location)
            })
            .collect();

        Ok(Self { entries })
    }

    /// Look up a type name, with or without the leading `.`
    pub fn lookup(&self, type_name: &str) -> Option<&TypeLocation> {
        let full_name = type_name.strip_prefix('.').unwrap_or(type_name);
        self.entries.get(full_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn strip_package(full_name: &str, package: &str) -> String {
    if package.is_empty() {
        return full_name.to_string();
    }

    full_name
        .strip_prefix(package)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(full_name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_package() {
        assert_eq!(strip_package("pkg.Outer.Inner", "pkg"), "Outer.Inner");
        assert_eq!(strip_package("a.b.Thing", "a.b"), "Thing");
        assert_eq!(strip_package("Thing", ""), "Thing");
        assert_eq!(strip_package("pkgx.Thing", "pkg"), "pkgx.Thing");
    }

    #[test]
    fn test_empty_index() {
        let index = TypeIndex::from_files(vec![]).unwrap();
        assert!(index.is_empty());
        assert!(index.lookup(".pkg.Missing").is_none());
    }
}
