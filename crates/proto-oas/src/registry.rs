//! Cross-file message lookup.
//!
//! Fields and methods reference messages by fully-qualified name, and the
//! referenced message may live in another included file or later in the same
//! one. The registry is filled from every included file before any schema is
//! built, so resolution never depends on declaration order.

use std::collections::HashMap;

use proto_oas_core::descriptor::{DescriptorProto, FileDescriptorProto};

use crate::comment::{child_path, tags};

/// A registered message and where it was declared.
#[derive(Debug, Clone)]
pub(crate) struct MessageEntry<'a> {
    /// The message descriptor.
    pub desc: &'a DescriptorProto,
    /// Index of the owning file in the included-file list.
    pub file: usize,
    /// Source-info path of the declaration inside the owning file.
    pub path: Vec<i32>,
}

/// Fully-qualified name (no leading dot) to message, across all included
/// files. Registering the same name twice keeps the last entry.
#[derive(Debug, Default)]
pub(crate) struct Registry<'a> {
    entries: HashMap<String, MessageEntry<'a>>,
}

impl<'a> Registry<'a> {
    /// Register every message of a file, nested messages included.
    pub(crate) fn register_file(&mut self, file_index: usize, file: &'a FileDescriptorProto) {
        let package = file.package.as_deref().unwrap_or("");
        for (index, message) in file.message_type.iter().enumerate() {
            let path = child_path(&[], tags::FILE_MESSAGE, index);
            self.register(file_index, package, path, message);
        }
    }

    fn register(
        &mut self,
        file_index: usize,
        parent: &str,
        path: Vec<i32>,
        message: &'a DescriptorProto,
    ) {
        let name = message.name.as_deref().unwrap_or("");
        let fqn = if parent.is_empty() {
            name.to_string()
        } else {
            format!("{parent}.{name}")
        };

        for (index, nested) in message.nested_type.iter().enumerate() {
            let nested_path = child_path(&path, tags::MESSAGE_NESTED, index);
            self.register(file_index, &fqn, nested_path, nested);
        }

        self.entries.insert(
            fqn,
            MessageEntry {
                desc: message,
                file: file_index,
                path,
            },
        );
    }

    /// Look up a message by fully-qualified name. Callers strip the leading
    /// dot that descriptor `type_name` fields carry.
    pub(crate) fn get(&self, fqn: &str) -> Option<&MessageEntry<'a>> {
        self.entries.get(fqn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: &str, nested: Vec<DescriptorProto>) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            nested_type: nested,
            ..Default::default()
        }
    }

    fn file(package: &str, messages: Vec<DescriptorProto>) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some("test.proto".to_string()),
            package: Some(package.to_string()),
            message_type: messages,
            ..Default::default()
        }
    }

    #[test]
    fn registers_top_level_and_nested_messages() {
        let file = file(
            "shop.v1",
            vec![
                message("Order", vec![message("Line", Vec::new())]),
                message("Item", Vec::new()),
            ],
        );

        let mut registry = Registry::default();
        registry.register_file(0, &file);

        assert!(registry.get("shop.v1.Order").is_some());
        assert!(registry.get("shop.v1.Order.Line").is_some());
        assert!(registry.get("shop.v1.Item").is_some());
        assert!(registry.get("shop.v1.Missing").is_none());
    }

    #[test]
    fn entries_carry_declaration_paths() {
        let file = file(
            "shop.v1",
            vec![message("Order", vec![message("Line", Vec::new())])],
        );

        let mut registry = Registry::default();
        registry.register_file(0, &file);

        assert_eq!(registry.get("shop.v1.Order").unwrap().path, vec![4, 0]);
        assert_eq!(
            registry.get("shop.v1.Order.Line").unwrap().path,
            vec![4, 0, 3, 0]
        );
    }

    #[test]
    fn empty_package_yields_bare_names() {
        let file = file("", vec![message("Order", Vec::new())]);

        let mut registry = Registry::default();
        registry.register_file(0, &file);

        assert!(registry.get("Order").is_some());
        assert!(registry.get(".Order").is_none());
    }

    #[test]
    fn later_files_shadow_earlier_ones() {
        let first = file("shop.v1", vec![message("Order", Vec::new())]);
        let second = file("shop.v1", vec![message("Order", Vec::new())]);

        let mut registry = Registry::default();
        registry.register_file(0, &first);
        registry.register_file(1, &second);

        assert_eq!(registry.get("shop.v1.Order").unwrap().file, 1);
    }
}
