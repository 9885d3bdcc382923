//! Typed OpenAPI 3.0.3 document model.
//!
//! Serialize-only: the generator assembles these values and writes them out
//! once. All maps are insertion-ordered so identical inputs serialize to
//! byte-identical documents.
//!
//! Absence semantics worth knowing:
//! - [`SchemaRef`] is either a concrete node or a `$ref`, never both.
//! - [`Operation::security`] is tri-state: `None` inherits the document
//!   list, `Some(vec![])` serializes `security: []` (an explicit opt-out),
//!   `Some(list)` is an explicit requirement list.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

/// The OpenAPI version this generator targets.
pub const OPENAPI_VERSION: &str = "3.0.3";

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// A security requirement: scheme name → requested scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// Top-level document.
#[derive(Debug, Serialize)]
pub struct Document {
    /// Always [`OPENAPI_VERSION`].
    pub openapi: String,
    /// Title/description/version block.
    pub info: Info,
    /// Deduplicated by URL, first-seen order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// Deduplicated by name, first-seen order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Templated path → verb slots.
    pub paths: IndexMap<String, PathItem>,
    /// Shared schemas, security schemes and responses.
    #[serde(skip_serializing_if = "Components::is_empty")]
    pub components: Components,
    /// Document-wide security, overridable per operation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
    /// Tag display groups (`x-tagGroups` document extension).
    #[serde(rename = "x-tagGroups", skip_serializing_if = "Vec::is_empty")]
    pub tag_groups: Vec<TagGroup>,
}

impl Document {
    /// An empty document at [`OPENAPI_VERSION`].
    #[must_use]
    pub fn new(info: Info) -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info,
            servers: Vec::new(),
            tags: Vec::new(),
            paths: IndexMap::new(),
            components: Components::default(),
            security: Vec::new(),
            tag_groups: Vec::new(),
        }
    }

    /// Drop repeated server URLs, keeping the first occurrence. Idempotent.
    pub fn dedup_servers(&mut self) {
        let mut seen = HashSet::new();
        self.servers.retain(|server| seen.insert(server.url.clone()));
    }

    /// Drop repeated tag names, keeping the first occurrence. Idempotent.
    pub fn dedup_tags(&mut self) {
        let mut seen = HashSet::new();
        self.tags.retain(|tag| seen.insert(tag.name.clone()));
    }

    /// Record a tag under a display group, creating the group bucket on
    /// first use and skipping tags that are already members.
    pub fn add_tag_group_member(&mut self, group: &str, tag: &str) {
        if let Some(bucket) = self.tag_groups.iter_mut().find(|g| g.name == group) {
            if !bucket.tags.iter().any(|t| t == tag) {
                bucket.tags.push(tag.to_string());
            }
        } else {
            self.tag_groups.push(TagGroup {
                name: group.to_string(),
                tags: vec![tag.to_string()],
            });
        }
    }
}

/// `info` block.
#[derive(Debug, Default, Serialize)]
pub struct Info {
    /// Document title.
    pub title: String,
    /// Omitted when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Document version.
    pub version: String,
}

/// One server entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Server {
    /// Absolute base URL.
    pub url: String,
}

impl Server {
    /// Build a server from a host option, defaulting the scheme to `https`.
    #[must_use]
    pub fn from_host(host: &str) -> Self {
        let url = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        Self { url }
    }
}

/// One tag entry (one per service).
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    /// Tag name (the service name).
    pub name: String,
    /// From the service's leading comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional `x-displayName` extension.
    #[serde(rename = "x-displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// One `x-tagGroups` bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagGroup {
    /// Group display name.
    pub name: String,
    /// Member tag names, first-seen order.
    pub tags: Vec<String>,
}

/// `components` block.
#[derive(Debug, Default, Serialize)]
pub struct Components {
    /// Named schemas keyed by fully-qualified message name.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaRef>,
    /// Declared security schemes keyed by scheme name.
    #[serde(rename = "securitySchemes", skip_serializing_if = "IndexMap::is_empty")]
    pub security_schemes: IndexMap<String, SecurityScheme>,
    /// Shared responses (the global `default` error response).
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseRef>,
}

impl Components {
    /// Whether every component table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty() && self.security_schemes.is_empty() && self.responses.is_empty()
    }
}

/// A declared security scheme, all fields as given in the file option.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SecurityScheme {
    /// Scheme type (`apiKey`, `http`, `openIdConnect`, …).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub scheme_type: Option<String>,
    /// Header/query/cookie name for `apiKey` schemes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Location for `apiKey` schemes.
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// HTTP auth scheme (`bearer`, `basic`, …).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// Bearer token format hint.
    #[serde(rename = "bearerFormat", skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,
    /// Discovery URL for `openIdConnect` schemes.
    #[serde(rename = "openIdConnectUrl", skip_serializing_if = "Option::is_none")]
    pub open_id_connect_url: Option<String>,
}

/// A schema position: concrete node or `$ref`, never both.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SchemaRef {
    /// Reference to a named schema under `components.schemas`.
    Reference {
        /// The `#/components/schemas/<name>` pointer.
        #[serde(rename = "$ref")]
        reference: String,
    },
    /// Concrete inline node.
    Inline(Box<Schema>),
}

impl SchemaRef {
    /// Reference to the named schema under `components.schemas`.
    #[must_use]
    pub fn reference(name: &str) -> Self {
        Self::Reference {
            reference: format!("#/components/schemas/{name}"),
        }
    }

    /// Wrap a concrete node.
    #[must_use]
    pub fn inline(schema: Schema) -> Self {
        Self::Inline(Box::new(schema))
    }
}

/// JSON schema type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// Textual values, including proto 64-bit integers.
    String,
    /// Proto 32-bit integer kinds.
    Integer,
    /// Floating-point, bytes, and enum kinds.
    Number,
    /// Booleans.
    Boolean,
    /// Message kinds.
    Object,
    /// Repeated fields.
    Array,
}

/// A concrete schema node.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schema {
    /// Node type; object nodes always carry one.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// Properties of an object node, field declaration order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaRef>,
    /// Required property names, append order, no dedup.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Element schema of an array node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaRef>>,
    /// From the leading comment before the `Example:` marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comment example (JSON-parsed when valid) or the example option.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
    /// Standard field option.
    #[serde(skip_serializing_if = "is_false")]
    pub deprecated: bool,
    /// Numeric lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Numeric upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Whether `minimum` is exclusive.
    #[serde(rename = "exclusiveMinimum", skip_serializing_if = "is_false")]
    pub exclusive_minimum: bool,
    /// Whether `maximum` is exclusive.
    #[serde(rename = "exclusiveMaximum", skip_serializing_if = "is_false")]
    pub exclusive_maximum: bool,
    /// Required numeric divisor.
    #[serde(rename = "multipleOf", skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    /// Minimum string length.
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum string length.
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Regular-expression constraint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Minimum array length.
    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// Maximum array length.
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    /// Whether array elements must be unique.
    #[serde(rename = "uniqueItems", skip_serializing_if = "is_false")]
    pub unique_items: bool,
    /// Minimum property count.
    #[serde(rename = "minProperties", skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    /// Maximum property count.
    #[serde(rename = "maxProperties", skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
}

impl Schema {
    /// A bare node of the given type.
    #[must_use]
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Bound to a `{placeholder}` segment of the route.
    Path,
    /// Appended to the query string.
    Query,
    /// Sent as an HTTP header.
    Header,
    /// Sent as a cookie.
    Cookie,
}

impl ParameterLocation {
    /// Lowercase name as used in documents and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

/// One operation parameter.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    /// Parameter name; path parameters must match a `{name}` placeholder.
    pub name: String,
    /// Location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Copied from the declaration when non-blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Always true for path parameters.
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    /// Copied from the declaration when non-blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Value schema (type plus any declared constraints).
    pub schema: SchemaRef,
}

/// `requestBody` of an operation.
#[derive(Debug, Clone, Serialize)]
pub struct RequestBody {
    /// Media type → schema.
    pub content: IndexMap<String, MediaType>,
}

/// One media type entry.
#[derive(Debug, Clone, Serialize)]
pub struct MediaType {
    /// The content schema.
    pub schema: SchemaRef,
}

/// A response position: shared-component `$ref` or inline response.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseRef {
    /// Reference to a shared response under `components.responses`.
    Reference {
        /// The `#/components/responses/<name>` pointer.
        #[serde(rename = "$ref")]
        reference: String,
    },
    /// Inline response.
    Inline(Response),
}

impl ResponseRef {
    /// Reference to the named shared response.
    #[must_use]
    pub fn reference(name: &str) -> Self {
        Self::Reference {
            reference: format!("#/components/responses/{name}"),
        }
    }
}

/// One concrete response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Response {
    /// Mandatory in OpenAPI; empty when no text applies.
    pub description: String,
    /// Media type → schema.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

/// HTTP verbs an operation can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    /// `GET`; operations never carry a request body.
    Get,
    /// `PUT`.
    Put,
    /// `POST`.
    Post,
    /// `DELETE`.
    Delete,
    /// `PATCH`.
    Patch,
}

impl HttpVerb {
    /// Uppercase name as used in error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

/// Verb slots of one templated path.
///
/// Slots are private so every insertion goes through [`PathItem::insert`],
/// which is where duplicate verbs are caught.
#[derive(Debug, Default, Serialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    patch: Option<Operation>,
}

impl PathItem {
    /// The operation bound to a verb, if any.
    #[must_use]
    pub fn operation(&self, verb: HttpVerb) -> Option<&Operation> {
        match verb {
            HttpVerb::Get => self.get.as_ref(),
            HttpVerb::Put => self.put.as_ref(),
            HttpVerb::Post => self.post.as_ref(),
            HttpVerb::Delete => self.delete.as_ref(),
            HttpVerb::Patch => self.patch.as_ref(),
        }
    }

    /// Bind an operation to a verb slot.
    ///
    /// Returns the rejected operation when the slot is already taken, so
    /// the caller can turn the collision into a build error.
    pub fn insert(
        &mut self,
        verb: HttpVerb,
        operation: Operation,
    ) -> std::result::Result<(), Operation> {
        let slot = match verb {
            HttpVerb::Get => &mut self.get,
            HttpVerb::Put => &mut self.put,
            HttpVerb::Post => &mut self.post,
            HttpVerb::Delete => &mut self.delete,
            HttpVerb::Patch => &mut self.patch,
        };
        if slot.is_some() {
            return Err(operation);
        }
        *slot = Some(operation);
        Ok(())
    }
}

/// One assembled operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Operation {
    /// Single entry: the owning service's tag.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// From the method option.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// From the method's leading comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `Service_Method`.
    #[serde(rename = "operationId")]
    pub operation_id: String,
    /// Service parameters then method parameters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Absent for GET operations.
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Status string or `default` → response.
    pub responses: IndexMap<String, ResponseRef>,
    /// From the method option.
    #[serde(skip_serializing_if = "is_false")]
    pub deprecated: bool,
    /// Tri-state: `None` inherits, `Some(vec![])` clears, else explicit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
    /// The resolved host, when any layer provided one.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
}
