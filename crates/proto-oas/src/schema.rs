//! Message to schema translation.

use proto_oas_core::descriptor::{
    self, field_type, DescriptorProto, FieldDescriptorProto, FileDescriptorProto, SchemaRules,
};

use crate::comment::{child_path, split_comment, tags, CommentMap};
use crate::document::{Document, Schema, SchemaRef, SchemaType};
use crate::error::{Error, Result};
use crate::registry::Registry;

/// Translates registered messages into document schema nodes.
pub(crate) struct SchemaBuilder<'a> {
    registry: &'a Registry<'a>,
    /// Indexed by the same included-file order the registry was built with.
    comments: &'a [CommentMap],
    json_names: bool,
}

/// One message being translated. The path locates its comments inside the
/// owning file.
struct Scope<'s> {
    desc: &'s DescriptorProto,
    fqn: &'s str,
    file: usize,
    path: &'s [i32],
}

impl<'a> SchemaBuilder<'a> {
    pub(crate) fn new(
        registry: &'a Registry<'a>,
        comments: &'a [CommentMap],
        json_names: bool,
    ) -> Self {
        Self {
            registry,
            comments,
            json_names,
        }
    }

    /// Add a named schema for every top-level message of a file, skipping
    /// operation messages (`*Request`/`*Response` names).
    pub(crate) fn add_file_schemas(
        &self,
        doc: &mut Document,
        file_index: usize,
        file: &FileDescriptorProto,
    ) -> Result<()> {
        let package = file.package.as_deref().unwrap_or("");

        for (index, message) in file.message_type.iter().enumerate() {
            let name = message.name.as_deref().unwrap_or("");
            if is_operation_message(name) {
                continue;
            }
            let fqn = if package.is_empty() {
                name.to_string()
            } else {
                format!("{package}.{name}")
            };
            let path = child_path(&[], tags::FILE_MESSAGE, index);
            let scope = Scope {
                desc: message,
                fqn: &fqn,
                file: file_index,
                path: &path,
            };

            // Register a placeholder first so self references resolve to a
            // $ref instead of recursing forever.
            doc.components
                .schemas
                .insert(fqn.clone(), SchemaRef::inline(Schema::default()));

            let mut root = Schema::default();
            self.build_message(doc, &scope, &mut root)?;
            doc.components.schemas.insert(fqn, SchemaRef::inline(root));
        }

        Ok(())
    }

    /// Inline-build the message registered under `fqn`, if any.
    pub(crate) fn build_registered(&self, doc: &Document, fqn: &str) -> Result<Option<Schema>> {
        let Some(entry) = self.registry.get(fqn) else {
            return Ok(None);
        };
        let scope = Scope {
            desc: entry.desc,
            fqn,
            file: entry.file,
            path: &entry.path,
        };
        let mut root = Schema::default();
        self.build_message(doc, &scope, &mut root)?;
        Ok(Some(root))
    }

    /// Fill `node` with one property per field of the scoped message.
    fn build_message(&self, doc: &Document, scope: &Scope<'_>, node: &mut Schema) -> Result<()> {
        for (index, field) in scope.desc.field.iter().enumerate() {
            let display_name = self.field_name(field);
            let mut field_node = node_for_kind(field);

            let field_path = child_path(scope.path, tags::MESSAGE_FIELD, index);
            let parsed = split_comment(self.comments[scope.file].leading(&field_path));
            if !parsed.description.is_empty() {
                field_node.description = Some(parsed.description);
            }
            if !parsed.example.is_empty() {
                field_node.example = Some(parse_example(&parsed.example));
            }

            if let Some(options) = field.options.as_ref() {
                if options.deprecated == Some(true) {
                    field_node.deprecated = true;
                }
                if options.required == Some(true) {
                    node.required.push(display_name.clone());
                }
                // The example option beats the comment example.
                if let Some(example) = options.example.as_deref() {
                    if !example.is_empty() {
                        field_node.example = Some(parse_example(example));
                    }
                }
                if let Some(rules) = options.rules.as_ref() {
                    apply_rules(&mut field_node, rules);
                }
            }

            let resolved = self.resolve_field(doc, scope, field, field_node)?;
            node.properties.insert(display_name, resolved);
        }

        Ok(())
    }

    /// Resolve an object (or array-of-object) node against, in order: the
    /// current message's direct children, the named schema table, and the
    /// registry. Lexical children win even over a same-named schema.
    fn resolve_field(
        &self,
        doc: &Document,
        scope: &Scope<'_>,
        field: &FieldDescriptorProto,
        mut node: Schema,
    ) -> Result<SchemaRef> {
        let is_object = node.schema_type == Some(SchemaType::Object);
        let is_object_array = node.schema_type == Some(SchemaType::Array)
            && matches!(
                node.items.as_deref(),
                Some(SchemaRef::Inline(items)) if items.schema_type == Some(SchemaType::Object)
            );
        if !is_object && !is_object_array {
            return Ok(SchemaRef::inline(node));
        }

        let type_name = field
            .type_name
            .as_deref()
            .unwrap_or("")
            .trim_start_matches('.');

        let child = scope.desc.nested_type.iter().enumerate().find(|(_, nested)| {
            let name = nested.name.as_deref().unwrap_or("");
            type_name
                .strip_prefix(scope.fqn)
                .and_then(|rest| rest.strip_prefix('.'))
                == Some(name)
        });
        if let Some((child_index, child)) = child {
            let child_path = child_path(scope.path, tags::MESSAGE_NESTED, child_index);
            let child_scope = Scope {
                desc: child,
                fqn: type_name,
                file: scope.file,
                path: &child_path,
            };
            return self.inline_message(doc, &child_scope, node, is_object_array);
        }

        if doc.components.schemas.contains_key(type_name) {
            if is_object_array {
                node.items = Some(Box::new(SchemaRef::reference(type_name)));
                return Ok(SchemaRef::inline(node));
            }
            return Ok(SchemaRef::reference(type_name));
        }

        if let Some(entry) = self.registry.get(type_name) {
            let entry_scope = Scope {
                desc: entry.desc,
                fqn: type_name,
                file: entry.file,
                path: &entry.path,
            };
            return self.inline_message(doc, &entry_scope, node, is_object_array);
        }

        Err(Error::UnresolvedReference {
            referrer: format!("{}.{}", scope.fqn, field.name.as_deref().unwrap_or("")),
            type_name: type_name.to_string(),
        })
    }

    /// Expand a resolved message into `node` itself, or into its items slot
    /// for array nodes.
    fn inline_message(
        &self,
        doc: &Document,
        scope: &Scope<'_>,
        mut node: Schema,
        into_items: bool,
    ) -> Result<SchemaRef> {
        if into_items {
            let mut items = Schema::of_type(SchemaType::Object);
            self.build_message(doc, scope, &mut items)?;
            node.items = Some(Box::new(SchemaRef::inline(items)));
        } else {
            self.build_message(doc, scope, &mut node)?;
        }
        Ok(SchemaRef::inline(node))
    }

    fn field_name(&self, field: &FieldDescriptorProto) -> String {
        let name = field.name.as_deref().unwrap_or("");
        if !self.json_names {
            return name.to_string();
        }
        match field.json_name.as_deref() {
            Some(json_name) if !json_name.is_empty() => json_name.to_string(),
            _ => snake_to_lower_camel(name),
        }
    }
}

/// Untyped node for the field kind: scalars map straight to a type, repeated
/// fields wrap their element type in an array node.
fn node_for_kind(field: &FieldDescriptorProto) -> Schema {
    let kind = schema_type_for(field.r#type.unwrap_or_default());
    if descriptor::is_repeated(field) {
        let mut node = Schema::of_type(SchemaType::Array);
        node.items = Some(Box::new(SchemaRef::inline(Schema::of_type(kind))));
        node
    } else {
        Schema::of_type(kind)
    }
}

/// Proto field kind to schema type. 64-bit integers serialize as strings in
/// proto JSON, so they map to `string` here too.
fn schema_type_for(kind: i32) -> SchemaType {
    match kind {
        field_type::STRING
        | field_type::INT64
        | field_type::UINT64
        | field_type::SINT64
        | field_type::FIXED64
        | field_type::SFIXED64 => SchemaType::String,
        field_type::INT32
        | field_type::UINT32
        | field_type::SINT32
        | field_type::FIXED32
        | field_type::SFIXED32 => SchemaType::Integer,
        field_type::BOOL => SchemaType::Boolean,
        field_type::MESSAGE => SchemaType::Object,
        _ => SchemaType::Number,
    }
}

/// Copy constraint annotations onto a schema node.
pub(crate) fn apply_rules(node: &mut Schema, rules: &SchemaRules) {
    node.minimum = rules.minimum;
    node.maximum = rules.maximum;
    node.exclusive_minimum = rules.exclusive_minimum.unwrap_or_default();
    node.exclusive_maximum = rules.exclusive_maximum.unwrap_or_default();
    node.multiple_of = rules.multiple_of;
    node.min_length = rules.min_length;
    node.max_length = rules.max_length;
    node.pattern = rules.pattern.clone();
    node.min_items = rules.min_items;
    node.max_items = rules.max_items;
    node.unique_items = rules.unique_items.unwrap_or_default();
    node.min_properties = rules.min_properties;
    node.max_properties = rules.max_properties;
}

/// Valid JSON examples keep their parsed shape, anything else stays a string.
fn parse_example(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn is_operation_message(name: &str) -> bool {
    name.ends_with("Request") || name.ends_with("Response")
}

/// protoc's `json_name` rule: drop underscores, capitalize the next letter.
fn snake_to_lower_camel(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proto_oas_core::descriptor::{field_label, FieldOptions, SourceCodeInfo};

    use super::*;
    use crate::document::Info;

    fn field(name: &str, kind: i32) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            r#type: Some(kind),
            ..Default::default()
        }
    }

    fn message_field(name: &str, type_name: &str) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            r#type: Some(field_type::MESSAGE),
            type_name: Some(type_name.to_string()),
            ..Default::default()
        }
    }

    fn repeated(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
        field.label = Some(field_label::REPEATED);
        field
    }

    fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            field: fields,
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

    fn build(file: &FileDescriptorProto) -> Result<Document> {
        build_with(file, false)
    }

    fn build_with(file: &FileDescriptorProto, json_names: bool) -> Result<Document> {
        let mut registry = Registry::default();
        registry.register_file(0, file);
        let comments = vec![CommentMap::from_file(file)];
        let builder = SchemaBuilder::new(&registry, &comments, json_names);
        let mut doc = Document::new(Info::default());
        builder.add_file_schemas(&mut doc, 0, file)?;
        Ok(doc)
    }

    fn named<'d>(doc: &'d Document, key: &str) -> &'d Schema {
        match &doc.components.schemas[key] {
            SchemaRef::Inline(schema) => schema,
            SchemaRef::Reference { reference } => panic!("unexpected reference {reference}"),
        }
    }

    #[test]
    fn maps_proto_kinds_to_schema_types() {
        assert_eq!(schema_type_for(field_type::STRING), SchemaType::String);
        assert_eq!(schema_type_for(field_type::INT64), SchemaType::String);
        assert_eq!(schema_type_for(field_type::FIXED64), SchemaType::String);
        assert_eq!(schema_type_for(field_type::INT32), SchemaType::Integer);
        assert_eq!(schema_type_for(field_type::SFIXED32), SchemaType::Integer);
        assert_eq!(schema_type_for(field_type::BOOL), SchemaType::Boolean);
        assert_eq!(schema_type_for(field_type::MESSAGE), SchemaType::Object);
        assert_eq!(schema_type_for(field_type::DOUBLE), SchemaType::Number);
        assert_eq!(schema_type_for(field_type::BYTES), SchemaType::Number);
        assert_eq!(schema_type_for(field_type::ENUM), SchemaType::Number);
    }

    #[test]
    fn skips_operation_messages() {
        let file = file(
            "test.v1",
            vec![
                message("User", vec![field("name", field_type::STRING)]),
                message("CreateUserRequest", Vec::new()),
                message("CreateUserResponse", Vec::new()),
            ],
        );

        let doc = build(&file).unwrap();

        let keys: Vec<&str> = doc.components.schemas.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["test.v1.User"]);
    }

    #[test]
    fn named_schema_root_has_no_type() {
        let file = file(
            "test.v1",
            vec![message("User", vec![field("name", field_type::STRING)])],
        );

        let doc = build(&file).unwrap();

        let user = named(&doc, "test.v1.User");
        assert_eq!(user.schema_type, None);
        assert_eq!(user.properties.len(), 1);
    }

    #[test]
    fn self_reference_becomes_a_ref() {
        let file = file(
            "test.v1",
            vec![message("Node", vec![message_field("next", ".test.v1.Node")])],
        );

        let doc = build(&file).unwrap();

        let node = named(&doc, "test.v1.Node");
        match &node.properties["next"] {
            SchemaRef::Reference { reference } => {
                assert_eq!(reference, "#/components/schemas/test.v1.Node");
            }
            SchemaRef::Inline(_) => panic!("expected a reference"),
        }
    }

    #[test]
    fn nested_child_is_inlined() {
        let mut outer = message("Order", vec![message_field("line", ".test.v1.Order.Line")]);
        outer.nested_type = vec![message("Line", vec![field("sku", field_type::STRING)])];
        let file = file("test.v1", vec![outer]);

        let doc = build(&file).unwrap();

        let order = named(&doc, "test.v1.Order");
        let SchemaRef::Inline(line) = &order.properties["line"] else {
            panic!("expected an inline node");
        };
        assert_eq!(line.schema_type, Some(SchemaType::Object));
        assert!(line.properties.contains_key("sku"));
    }

    #[test]
    fn repeated_message_referencing_a_schema_keeps_the_array_wrapper() {
        let file = file(
            "test.v1",
            vec![
                message("Item", vec![field("sku", field_type::STRING)]),
                message(
                    "Order",
                    vec![repeated(message_field("items", ".test.v1.Item"))],
                ),
            ],
        );

        let doc = build(&file).unwrap();

        let order = named(&doc, "test.v1.Order");
        let SchemaRef::Inline(items) = &order.properties["items"] else {
            panic!("expected an inline array node");
        };
        assert_eq!(items.schema_type, Some(SchemaType::Array));
        match items.items.as_deref() {
            Some(SchemaRef::Reference { reference }) => {
                assert_eq!(reference, "#/components/schemas/test.v1.Item");
            }
            other => panic!("expected items to be a reference, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_reference_is_an_error() {
        let file = file(
            "test.v1",
            vec![message(
                "Order",
                vec![message_field("customer", ".crm.v1.Customer")],
            )],
        );

        let err = build(&file).unwrap_err();

        match err {
            Error::UnresolvedReference {
                referrer,
                type_name,
            } => {
                assert_eq!(referrer, "test.v1.Order.customer");
                assert_eq!(type_name, "crm.v1.Customer");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn required_option_collects_field_names() {
        let mut email = field("email", field_type::STRING);
        email.options = Some(FieldOptions {
            required: Some(true),
            ..Default::default()
        });
        let file = file(
            "test.v1",
            vec![message("User", vec![email, field("name", field_type::STRING)])],
        );

        let doc = build(&file).unwrap();

        assert_eq!(named(&doc, "test.v1.User").required, vec!["email"]);
    }

    #[test]
    fn rules_land_on_the_field_node() {
        let mut email = field("email", field_type::STRING);
        email.options = Some(FieldOptions {
            rules: Some(SchemaRules {
                pattern: Some("^.+@.+$".to_string()),
                min_length: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        });
        let file = file("test.v1", vec![message("User", vec![email])]);

        let doc = build(&file).unwrap();

        let SchemaRef::Inline(email) = &named(&doc, "test.v1.User").properties["email"] else {
            panic!("expected an inline node");
        };
        assert_eq!(email.pattern.as_deref(), Some("^.+@.+$"));
        assert_eq!(email.min_length, Some(3));
    }

    #[test]
    fn example_option_beats_comment_example() {
        let mut id = field("id", field_type::STRING);
        id.options = Some(FieldOptions {
            example: Some("\"usr_1\"".to_string()),
            ..Default::default()
        });
        let mut file = file("test.v1", vec![message("User", vec![id])]);
        file.source_code_info = Some(SourceCodeInfo {
            location: vec![proto_oas_core::descriptor::Location {
                path: vec![4, 0, 2, 0],
                leading_comments: Some(" The id.\n Example: ignored\n".to_string()),
            }],
        });

        let doc = build(&file).unwrap();

        let SchemaRef::Inline(id) = &named(&doc, "test.v1.User").properties["id"] else {
            panic!("expected an inline node");
        };
        assert_eq!(id.example, Some(serde_json::json!("usr_1")));
        assert_eq!(id.description.as_deref(), Some("The id.\n"));
    }

    #[test]
    fn comment_example_parses_json_or_stays_raw() {
        assert_eq!(parse_example("{\"a\": 1}"), serde_json::json!({"a": 1}));
        assert_eq!(parse_example("42"), serde_json::json!(42));
        assert_eq!(parse_example("plain text"), serde_json::json!("plain text"));
    }

    #[test]
    fn json_names_switch_renames_properties() {
        let mut first = field("user_id", field_type::STRING);
        first.json_name = Some("userId".to_string());
        let second = field("display_name", field_type::STRING);
        let file = file("test.v1", vec![message("User", vec![first, second])]);

        let doc = build_with(&file, true).unwrap();

        let user = named(&doc, "test.v1.User");
        let keys: Vec<&str> = user.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["userId", "displayName"]);
    }

    #[test]
    fn snake_names_convert_like_protoc() {
        assert_eq!(snake_to_lower_camel("user_id"), "userId");
        assert_eq!(snake_to_lower_camel("a_b_c"), "aBC");
        assert_eq!(snake_to_lower_camel("plain"), "plain");
    }
}
