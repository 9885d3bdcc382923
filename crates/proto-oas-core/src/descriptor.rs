//! Minimal protobuf descriptor types with `oas.v1` option extension support.
//!
//! Standard [`prost_types`] option messages drop the `oas.v1` extensions
//! (fields 50000–50002 on `FileOptions`, `ServiceOptions`, `MethodOptions`
//! and `FieldOptions`) during decoding because prost doesn't retain unknown
//! fields. These custom types preserve them.
//!
//! Only the descriptor subset the generator consumes is modelled; unknown
//! fields in the input are skipped by prost on decode.

#[allow(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
mod types {
    use prost::Message;

    #[derive(Clone, PartialEq, Message)]
    pub struct FileDescriptorSet {
        #[prost(message, repeated, tag = "1")]
        pub file: Vec<FileDescriptorProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct FileDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(string, optional, tag = "2")]
        pub package: Option<String>,
        #[prost(message, repeated, tag = "4")]
        pub message_type: Vec<DescriptorProto>,
        #[prost(message, repeated, tag = "6")]
        pub service: Vec<ServiceDescriptorProto>,
        #[prost(message, optional, tag = "8")]
        pub options: Option<FileOptions>,
        /// Comment locations, keyed by declaration path.
        #[prost(message, optional, tag = "9")]
        pub source_code_info: Option<SourceCodeInfo>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct DescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(message, repeated, tag = "2")]
        pub field: Vec<FieldDescriptorProto>,
        #[prost(message, repeated, tag = "3")]
        pub nested_type: Vec<DescriptorProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct FieldDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        /// Protobuf field label enum: 1=optional, 2=required, 3=repeated.
        #[prost(int32, optional, tag = "4")]
        pub label: Option<i32>,
        /// Protobuf field type enum: 1=double, 5=int32, 9=string, 11=message, 14=enum, …
        #[prost(int32, optional, tag = "5")]
        pub r#type: Option<i32>,
        /// Fully-qualified type name for message/enum fields (e.g., `.shop.v1.Item`).
        #[prost(string, optional, tag = "6")]
        pub type_name: Option<String>,
        #[prost(message, optional, tag = "8")]
        pub options: Option<FieldOptions>,
        /// camelCase alias computed by the compiler (e.g., `userId` for `user_id`).
        #[prost(string, optional, tag = "10")]
        pub json_name: Option<String>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct ServiceDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(message, repeated, tag = "2")]
        pub method: Vec<MethodDescriptorProto>,
        #[prost(message, optional, tag = "3")]
        pub options: Option<ServiceOptions>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct MethodDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(string, optional, tag = "2")]
        pub input_type: Option<String>,
        #[prost(string, optional, tag = "3")]
        pub output_type: Option<String>,
        #[prost(message, optional, tag = "4")]
        pub options: Option<MethodOptions>,
    }

    /// File options with the `oas.v1.file` extension (field 50000).
    #[derive(Clone, PartialEq, Message)]
    pub struct FileOptions {
        #[prost(message, optional, tag = "50000")]
        pub oas: Option<FileRule>,
    }

    /// Service options with the `oas.v1.service` extension (field 50000).
    #[derive(Clone, PartialEq, Message)]
    pub struct ServiceOptions {
        #[prost(message, optional, tag = "50000")]
        pub oas: Option<ServiceRule>,
    }

    /// Method options with the `oas.v1.method` extension (field 50000).
    #[derive(Clone, PartialEq, Message)]
    pub struct MethodOptions {
        #[prost(message, optional, tag = "50000")]
        pub oas: Option<MethodRule>,
    }

    /// Field options: standard `deprecated` plus the `oas.v1` extensions
    /// `rules` (50000), `required` (50001) and `example` (50002).
    #[derive(Clone, PartialEq, Message)]
    pub struct FieldOptions {
        #[prost(bool, optional, tag = "3")]
        pub deprecated: Option<bool>,
        #[prost(message, optional, tag = "50000")]
        pub rules: Option<SchemaRules>,
        #[prost(bool, optional, tag = "50001")]
        pub required: Option<bool>,
        #[prost(string, optional, tag = "50002")]
        pub example: Option<String>,
    }

    /// File-scope REST options: broadest layer of the override chain.
    #[derive(Clone, PartialEq, Message)]
    pub struct FileRule {
        #[prost(string, optional, tag = "1")]
        pub host: Option<String>,
        #[prost(string, optional, tag = "2")]
        pub prefix: Option<String>,
        #[prost(string, optional, tag = "3")]
        pub content_type: Option<String>,
        #[prost(message, repeated, tag = "4")]
        pub security_schemes: Vec<SecuritySchemeRule>,
        #[prost(message, repeated, tag = "5")]
        pub security: Vec<SecurityRule>,
        #[prost(message, repeated, tag = "6")]
        pub servers: Vec<ServerRule>,
    }

    /// Service-scope REST options.
    #[derive(Clone, PartialEq, Message)]
    pub struct ServiceRule {
        #[prost(string, optional, tag = "1")]
        pub host: Option<String>,
        #[prost(string, optional, tag = "2")]
        pub prefix: Option<String>,
        #[prost(string, optional, tag = "3")]
        pub content_type: Option<String>,
        #[prost(string, optional, tag = "4")]
        pub default_response: Option<String>,
        /// An entry with an empty name clears the list instead of adding to it.
        #[prost(message, repeated, tag = "5")]
        pub security: Vec<SecurityRule>,
        #[prost(message, repeated, tag = "6")]
        pub path_parameters: Vec<ParameterRule>,
        #[prost(message, repeated, tag = "7")]
        pub query_parameters: Vec<ParameterRule>,
        #[prost(message, repeated, tag = "8")]
        pub header_parameters: Vec<ParameterRule>,
        #[prost(message, repeated, tag = "9")]
        pub cookie_parameters: Vec<ParameterRule>,
        /// Rendered as the tag's `x-displayName` extension.
        #[prost(string, optional, tag = "10")]
        pub display_name: Option<String>,
        /// Tag group this service's tag belongs to (`x-tagGroups`).
        #[prost(string, optional, tag = "11")]
        pub tag_group: Option<String>,
    }

    /// Method-scope REST options: the narrowest layer of the override chain.
    #[derive(Clone, PartialEq, Message)]
    pub struct MethodRule {
        #[prost(oneof = "RoutePattern", tags = "1, 2, 3, 4, 5")]
        pub pattern: Option<RoutePattern>,
        #[prost(string, optional, tag = "6")]
        pub host: Option<String>,
        #[prost(string, optional, tag = "7")]
        pub content_type: Option<String>,
        #[prost(string, optional, tag = "8")]
        pub default_response: Option<String>,
        /// Success status code, 200 when unset.
        #[prost(int32, optional, tag = "9")]
        pub status: Option<i32>,
        #[prost(bool, optional, tag = "10")]
        pub deprecated: Option<bool>,
        #[prost(string, optional, tag = "11")]
        pub summary: Option<String>,
        /// Appended to the service list; an empty-name entry clears instead.
        #[prost(message, repeated, tag = "12")]
        pub security: Vec<SecurityRule>,
        #[prost(message, repeated, tag = "13")]
        pub path_parameters: Vec<ParameterRule>,
        #[prost(message, repeated, tag = "14")]
        pub query_parameters: Vec<ParameterRule>,
        #[prost(message, repeated, tag = "15")]
        pub header_parameters: Vec<ParameterRule>,
        #[prost(message, repeated, tag = "16")]
        pub cookie_parameters: Vec<ParameterRule>,
    }

    /// HTTP verb + path template for a method.
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum RoutePattern {
        #[prost(string, tag = "1")]
        Get(String),
        #[prost(string, tag = "2")]
        Put(String),
        #[prost(string, tag = "3")]
        Post(String),
        #[prost(string, tag = "4")]
        Delete(String),
        #[prost(string, tag = "5")]
        Patch(String),
    }

    /// A security requirement: scheme name plus requested scopes.
    #[derive(Clone, PartialEq, Message)]
    pub struct SecurityRule {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(string, repeated, tag = "2")]
        pub scopes: Vec<String>,
    }

    /// A named security scheme declaration (file scope).
    #[derive(Clone, PartialEq, Message)]
    pub struct SecuritySchemeRule {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(message, optional, tag = "2")]
        pub scheme: Option<SchemeRule>,
    }

    /// Security scheme shape, mirroring the `components.securitySchemes` fields.
    #[derive(Clone, PartialEq, Message)]
    pub struct SchemeRule {
        #[prost(string, optional, tag = "1")]
        pub r#type: Option<String>,
        #[prost(string, optional, tag = "2")]
        pub name: Option<String>,
        #[prost(string, optional, tag = "3")]
        pub r#in: Option<String>,
        #[prost(string, optional, tag = "4")]
        pub scheme: Option<String>,
        #[prost(string, optional, tag = "5")]
        pub bearer_format: Option<String>,
        #[prost(string, optional, tag = "6")]
        pub open_id_connect_url: Option<String>,
    }

    /// An additional server URL declared at file scope.
    #[derive(Clone, PartialEq, Message)]
    pub struct ServerRule {
        #[prost(string, optional, tag = "1")]
        pub url: Option<String>,
    }

    /// A declared operation parameter (path/query/header/cookie lists).
    #[derive(Clone, PartialEq, Message)]
    pub struct ParameterRule {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        /// Parameter type enum: 0=unspecified, 1=string, 2=integer, 3=number, 4=boolean.
        #[prost(int32, optional, tag = "2")]
        pub r#type: Option<i32>,
        #[prost(string, optional, tag = "3")]
        pub description: Option<String>,
        #[prost(string, optional, tag = "4")]
        pub example: Option<String>,
        /// Overrides the location default (path parameters default to required).
        #[prost(bool, optional, tag = "5")]
        pub required: Option<bool>,
        #[prost(message, optional, tag = "6")]
        pub rules: Option<SchemaRules>,
    }

    /// Constraint annotations copied verbatim onto the generated schema node.
    #[derive(Clone, PartialEq, Message)]
    pub struct SchemaRules {
        #[prost(double, optional, tag = "1")]
        pub minimum: Option<f64>,
        #[prost(double, optional, tag = "2")]
        pub maximum: Option<f64>,
        #[prost(uint64, optional, tag = "3")]
        pub min_length: Option<u64>,
        #[prost(uint64, optional, tag = "4")]
        pub max_length: Option<u64>,
        #[prost(uint64, optional, tag = "5")]
        pub min_items: Option<u64>,
        #[prost(uint64, optional, tag = "6")]
        pub max_items: Option<u64>,
        #[prost(bool, optional, tag = "7")]
        pub unique_items: Option<bool>,
        #[prost(uint64, optional, tag = "8")]
        pub min_properties: Option<u64>,
        #[prost(uint64, optional, tag = "9")]
        pub max_properties: Option<u64>,
        #[prost(string, optional, tag = "10")]
        pub pattern: Option<String>,
        #[prost(bool, optional, tag = "11")]
        pub exclusive_minimum: Option<bool>,
        #[prost(bool, optional, tag = "12")]
        pub exclusive_maximum: Option<bool>,
        #[prost(double, optional, tag = "13")]
        pub multiple_of: Option<f64>,
    }

    /// Comment locations for a file, as emitted by the compiler.
    #[derive(Clone, PartialEq, Message)]
    pub struct SourceCodeInfo {
        #[prost(message, repeated, tag = "1")]
        pub location: Vec<Location>,
    }

    /// One commented span: a declaration path plus its leading comment.
    #[derive(Clone, PartialEq, Message)]
    pub struct Location {
        #[prost(int32, repeated, tag = "1")]
        pub path: Vec<i32>,
        #[prost(string, optional, tag = "3")]
        pub leading_comments: Option<String>,
    }
}

pub use types::*;

/// Proto field type constants (from `google.protobuf.FieldDescriptorProto.Type`).
pub mod field_type {
    /// `TYPE_DOUBLE = 1`
    pub const DOUBLE: i32 = 1;
    /// `TYPE_FLOAT = 2`
    pub const FLOAT: i32 = 2;
    /// `TYPE_INT64 = 3`
    pub const INT64: i32 = 3;
    /// `TYPE_UINT64 = 4`
    pub const UINT64: i32 = 4;
    /// `TYPE_INT32 = 5`
    pub const INT32: i32 = 5;
    /// `TYPE_FIXED64 = 6`
    pub const FIXED64: i32 = 6;
    /// `TYPE_FIXED32 = 7`
    pub const FIXED32: i32 = 7;
    /// `TYPE_BOOL = 8`
    pub const BOOL: i32 = 8;
    /// `TYPE_STRING = 9`
    pub const STRING: i32 = 9;
    /// `TYPE_MESSAGE = 11`
    pub const MESSAGE: i32 = 11;
    /// `TYPE_BYTES = 12`
    pub const BYTES: i32 = 12;
    /// `TYPE_UINT32 = 13`
    pub const UINT32: i32 = 13;
    /// `TYPE_ENUM = 14`
    pub const ENUM: i32 = 14;
    /// `TYPE_SFIXED32 = 15`
    pub const SFIXED32: i32 = 15;
    /// `TYPE_SFIXED64 = 16`
    pub const SFIXED64: i32 = 16;
    /// `TYPE_SINT32 = 17`
    pub const SINT32: i32 = 17;
    /// `TYPE_SINT64 = 18`
    pub const SINT64: i32 = 18;
}

/// Proto field label constants (from `google.protobuf.FieldDescriptorProto.Label`).
pub mod field_label {
    /// `LABEL_OPTIONAL = 1`
    pub const OPTIONAL: i32 = 1;
    /// `LABEL_REPEATED = 3`
    pub const REPEATED: i32 = 3;
}

/// Parameter type constants (from `oas.v1.ParameterRule.Type`).
pub mod parameter_type {
    /// Treated as string.
    pub const UNSPECIFIED: i32 = 0;
    /// JSON schema `string`.
    pub const STRING: i32 = 1;
    /// JSON schema `integer`.
    pub const INTEGER: i32 = 2;
    /// JSON schema `number`.
    pub const NUMBER: i32 = 3;
    /// JSON schema `boolean`.
    pub const BOOLEAN: i32 = 4;
}

/// Extract `(verb, path_template)` from a method's route annotation.
///
/// Returns `None` when the annotation carries no verb; such methods are not
/// exposed over REST and the generator skips them.
#[must_use]
pub fn extract_route(rule: &MethodRule) -> Option<(&'static str, &str)> {
    let pattern = rule.pattern.as_ref()?;

    Some(match pattern {
        RoutePattern::Get(p) => ("GET", p.as_str()),
        RoutePattern::Put(p) => ("PUT", p.as_str()),
        RoutePattern::Post(p) => ("POST", p.as_str()),
        RoutePattern::Delete(p) => ("DELETE", p.as_str()),
        RoutePattern::Patch(p) => ("PATCH", p.as_str()),
    })
}

/// Whether a field is repeated.
#[must_use]
pub fn is_repeated(field: &FieldDescriptorProto) -> bool {
    field.label == Some(field_label::REPEATED)
}

#[cfg(test)]
mod tests {
    use prost::Message as _;

    use super::*;

    fn rule_with_pattern(pattern: RoutePattern) -> MethodRule {
        MethodRule {
            pattern: Some(pattern),
            ..Default::default()
        }
    }

    #[test]
    fn extract_get_route() {
        let rule = rule_with_pattern(RoutePattern::Get("/items".to_string()));
        let (verb, path) = extract_route(&rule).unwrap();
        assert_eq!(verb, "GET");
        assert_eq!(path, "/items");
    }

    #[test]
    fn extract_post_route() {
        let rule = rule_with_pattern(RoutePattern::Post("/items".to_string()));
        let (verb, path) = extract_route(&rule).unwrap();
        assert_eq!(verb, "POST");
        assert_eq!(path, "/items");
    }

    #[test]
    fn extract_put_route() {
        let rule = rule_with_pattern(RoutePattern::Put("/items/{id}".to_string()));
        let (verb, path) = extract_route(&rule).unwrap();
        assert_eq!(verb, "PUT");
        assert_eq!(path, "/items/{id}");
    }

    #[test]
    fn extract_delete_route() {
        let rule = rule_with_pattern(RoutePattern::Delete("/items/{id}".to_string()));
        let (verb, path) = extract_route(&rule).unwrap();
        assert_eq!(verb, "DELETE");
        assert_eq!(path, "/items/{id}");
    }

    #[test]
    fn extract_patch_route() {
        let rule = rule_with_pattern(RoutePattern::Patch("/items/{id}".to_string()));
        let (verb, path) = extract_route(&rule).unwrap();
        assert_eq!(verb, "PATCH");
        assert_eq!(path, "/items/{id}");
    }

    #[test]
    fn returns_none_without_pattern() {
        let rule = MethodRule {
            summary: Some("annotated but not routed".to_string()),
            ..Default::default()
        };
        assert!(extract_route(&rule).is_none());
    }

    #[test]
    fn repeated_label_detected() {
        let field = FieldDescriptorProto {
            name: Some("tags".to_string()),
            label: Some(field_label::REPEATED),
            r#type: Some(field_type::STRING),
            ..Default::default()
        };
        assert!(is_repeated(&field));

        let field = FieldDescriptorProto {
            label: Some(field_label::OPTIONAL),
            ..field
        };
        assert!(!is_repeated(&field));
    }

    /// Round-trip: encode → decode a `FileDescriptorSet` with oas.v1 options.
    #[test]
    fn descriptor_round_trip() {
        let original = FileDescriptorSet {
            file: vec![FileDescriptorProto {
                name: Some("shop.proto".to_string()),
                package: Some("shop.v1".to_string()),
                message_type: vec![DescriptorProto {
                    name: Some("Item".to_string()),
                    field: vec![FieldDescriptorProto {
                        name: Some("name".to_string()),
                        label: Some(field_label::OPTIONAL),
                        r#type: Some(field_type::STRING),
                        options: Some(FieldOptions {
                            required: Some(true),
                            rules: Some(SchemaRules {
                                min_length: Some(1),
                                max_length: Some(64),
                                ..Default::default()
                            }),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }],
                    nested_type: vec![],
                }],
                service: vec![ServiceDescriptorProto {
                    name: Some("ShopService".to_string()),
                    method: vec![MethodDescriptorProto {
                        name: Some("ListItems".to_string()),
                        input_type: Some(".shop.v1.ListItemsRequest".to_string()),
                        output_type: Some(".shop.v1.ListItemsResponse".to_string()),
                        options: Some(MethodOptions {
                            oas: Some(rule_with_pattern(RoutePattern::Get(
                                "/items".to_string(),
                            ))),
                        }),
                    }],
                    options: Some(ServiceOptions {
                        oas: Some(ServiceRule {
                            prefix: Some("/v1".to_string()),
                            ..Default::default()
                        }),
                    }),
                }],
                options: Some(FileOptions {
                    oas: Some(FileRule {
                        host: Some("api.shop.example".to_string()),
                        ..Default::default()
                    }),
                }),
                source_code_info: None,
            }],
        };

        let bytes = original.encode_to_vec();
        let decoded = FileDescriptorSet::decode(bytes.as_slice()).unwrap();
        assert_eq!(original, decoded);
    }
}
