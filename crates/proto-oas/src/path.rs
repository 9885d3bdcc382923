//! Service and method translation into the path table.
//!
//! Options layer file < service < method. Every layered value is resolved
//! fresh per service and per method, so nothing carries over between
//! siblings.

use indexmap::IndexMap;

use proto_oas_core::descriptor::{
    FileDescriptorProto, FileRule, MethodDescriptorProto, MethodRule, RoutePattern, SecurityRule,
    ServiceDescriptorProto, ServiceRule,
};

use crate::comment::{child_path, split_comment, tags, CommentMap};
use crate::config::GenConfig;
use crate::document::{
    Document, HttpVerb, MediaType, Operation, Parameter, RequestBody, Response, ResponseRef,
    SchemaRef, SecurityRequirement, Server, Tag,
};
use crate::error::{Error, Result};
use crate::parameter::{self, Declarations};
use crate::schema::SchemaBuilder;

/// Builds the path table, tags and per-operation wiring.
pub(crate) struct PathBuilder<'a> {
    config: &'a GenConfig,
    schemas: &'a SchemaBuilder<'a>,
    /// Indexed by the same included-file order the registry was built with.
    comments: &'a [CommentMap],
    /// Packages of the included files, for default-response qualification.
    packages: &'a [String],
}

/// Per-service context shared by all of its methods.
struct ServiceScope<'s> {
    file: usize,
    package: &'s str,
    service_name: &'s str,
    host: Option<&'s str>,
    prefix: &'s str,
    content_type: &'s str,
    security: SecurityPolicy,
    parameters: Vec<Parameter>,
    default_response: Option<&'s str>,
}

/// What one layer's security entries say.
#[derive(Debug, Clone, PartialEq)]
enum SecurityPolicy {
    /// No entries: defer to the broader layer.
    Inherit,
    /// An empty-name entry: opt out, rendered as `security: []`.
    Clear,
    /// Named requirements.
    Require(Vec<SecurityRequirement>),
}

impl<'a> PathBuilder<'a> {
    pub(crate) fn new(
        config: &'a GenConfig,
        schemas: &'a SchemaBuilder<'a>,
        comments: &'a [CommentMap],
        packages: &'a [String],
    ) -> Self {
        Self {
            config,
            schemas,
            comments,
            packages,
        }
    }

    /// Add every routed method of a file's services to the path table.
    pub(crate) fn add_file_paths(
        &self,
        doc: &mut Document,
        file_index: usize,
        file: &FileDescriptorProto,
    ) -> Result<()> {
        let file_rule = file.options.as_ref().and_then(|o| o.oas.as_ref());
        let package = file.package.as_deref().unwrap_or("");

        for (index, service) in file.service.iter().enumerate() {
            let service_path = child_path(&[], tags::FILE_SERVICE, index);
            self.add_service(doc, file_index, package, file_rule, service, &service_path)?;
        }
        Ok(())
    }

    fn add_service(
        &self,
        doc: &mut Document,
        file_index: usize,
        package: &str,
        file_rule: Option<&FileRule>,
        service: &ServiceDescriptorProto,
        service_path: &[i32],
    ) -> Result<()> {
        let rule = service.options.as_ref().and_then(|o| o.oas.as_ref());
        let service_name = service.name.as_deref().unwrap_or("");

        self.register_tag(doc, file_index, service_name, rule, service_path);

        // A service host is a document server even when no method uses it.
        if let Some(host) = non_empty(rule.and_then(|r| r.host.as_deref())) {
            doc.servers.push(Server::from_host(host));
        }

        let prefix = non_empty(rule.and_then(|r| r.prefix.as_deref()))
            .or_else(|| non_empty(file_rule.and_then(|r| r.prefix.as_deref())))
            .unwrap_or("");

        let scope = ServiceScope {
            file: file_index,
            package,
            service_name,
            host: non_empty(rule.and_then(|r| r.host.as_deref()))
                .or_else(|| non_empty(file_rule.and_then(|r| r.host.as_deref())))
                .or_else(|| non_empty(self.config.host.as_deref())),
            prefix,
            content_type: non_empty(rule.and_then(|r| r.content_type.as_deref()))
                .or_else(|| non_empty(file_rule.and_then(|r| r.content_type.as_deref())))
                .unwrap_or(&self.config.content_type),
            security: security_policy(rule.map_or(&[][..], |r| r.security.as_slice())),
            parameters: parameter::resolve_all(
                prefix,
                &Declarations {
                    path: rule.map_or(&[][..], |r| r.path_parameters.as_slice()),
                    query: rule.map_or(&[][..], |r| r.query_parameters.as_slice()),
                    header: rule.map_or(&[][..], |r| r.header_parameters.as_slice()),
                    cookie: rule.map_or(&[][..], |r| r.cookie_parameters.as_slice()),
                },
            )?,
            default_response: non_empty(rule.and_then(|r| r.default_response.as_deref())),
        };

        for (index, method) in service.method.iter().enumerate() {
            let method_path = child_path(service_path, tags::SERVICE_METHOD, index);
            self.add_method(doc, &scope, method, &method_path)?;
        }
        Ok(())
    }

    fn register_tag(
        &self,
        doc: &mut Document,
        file_index: usize,
        service_name: &str,
        rule: Option<&ServiceRule>,
        service_path: &[i32],
    ) {
        let comment = split_comment(self.comments[file_index].leading(service_path));
        doc.tags.push(Tag {
            name: service_name.to_string(),
            description: (!comment.description.is_empty()).then_some(comment.description),
            display_name: non_empty(rule.and_then(|r| r.display_name.as_deref()))
                .map(str::to_string),
        });

        let group = rule
            .and_then(|r| r.tag_group.as_deref())
            .map(str::trim)
            .filter(|group| !group.is_empty());
        if let Some(group) = group {
            doc.add_tag_group_member(group, service_name);
        }
    }

    fn add_method(
        &self,
        doc: &mut Document,
        scope: &ServiceScope<'_>,
        method: &MethodDescriptorProto,
        method_path: &[i32],
    ) -> Result<()> {
        // No annotation, or an annotation without a verb: not a REST method.
        let Some(rule) = method.options.as_ref().and_then(|o| o.oas.as_ref()) else {
            return Ok(());
        };
        let Some((verb, template)) = route(rule) else {
            return Ok(());
        };

        let method_name = method.name.as_deref().unwrap_or("");
        let full_method = if scope.package.is_empty() {
            format!("{}.{}", scope.service_name, method_name)
        } else {
            format!("{}.{}.{}", scope.package, scope.service_name, method_name)
        };

        let content_type = non_empty(rule.content_type.as_deref()).unwrap_or(scope.content_type);
        let path = join_path(scope.prefix, template);

        let comment = split_comment(self.comments[scope.file].leading(method_path));
        let mut operation = Operation {
            tags: vec![scope.service_name.to_string()],
            summary: non_empty(rule.summary.as_deref()).map(str::to_string),
            description: (!comment.description.is_empty()).then_some(comment.description),
            operation_id: format!("{}_{}", scope.service_name, method_name),
            deprecated: rule.deprecated == Some(true),
            security: resolve_security(&scope.security, &rule.security),
            ..Operation::default()
        };

        if let Some(host) = non_empty(rule.host.as_deref()).or(scope.host) {
            let server = Server::from_host(host);
            doc.servers.push(server.clone());
            operation.servers = vec![server];
        }

        let method_parameters = parameter::resolve_all(
            &path,
            &Declarations {
                path: &rule.path_parameters,
                query: &rule.query_parameters,
                header: &rule.header_parameters,
                cookie: &rule.cookie_parameters,
            },
        )?;
        for parameter in &method_parameters {
            let clash = scope.parameters.iter().any(|existing| {
                existing.location == parameter.location && existing.name == parameter.name
            });
            if clash {
                return Err(Error::DuplicateParameter {
                    method: full_method,
                    location: parameter.location.as_str().to_string(),
                    name: parameter.name.clone(),
                });
            }
        }
        operation.parameters = scope.parameters.clone();
        operation.parameters.extend(method_parameters);

        if verb != HttpVerb::Get {
            let input = method
                .input_type
                .as_deref()
                .unwrap_or("")
                .trim_start_matches('.');
            // Unregistered inputs (well-known empty/any types) mean no body.
            if let Some(schema) = self.schemas.build_registered(doc, input)? {
                operation.request_body = Some(RequestBody {
                    content: media(content_type, SchemaRef::inline(schema)),
                });
            }
        }

        let output = method
            .output_type
            .as_deref()
            .unwrap_or("")
            .trim_start_matches('.');
        let Some(schema) = self.schemas.build_registered(doc, output)? else {
            return Err(Error::UnresolvedReference {
                referrer: full_method,
                type_name: output.to_string(),
            });
        };
        operation.responses.insert(
            rule.status.unwrap_or(200).to_string(),
            ResponseRef::Inline(Response {
                description: String::new(),
                content: media(content_type, SchemaRef::inline(schema)),
            }),
        );

        self.add_default_response(doc, &mut operation, scope, rule, content_type, &full_method)?;

        let item = doc.paths.entry(path.clone()).or_default();
        if item.insert(verb, operation).is_err() {
            return Err(Error::DuplicateOperation {
                verb: verb.as_str().to_string(),
                path,
            });
        }
        Ok(())
    }

    /// Attach the layered default response: method over service over the
    /// shared component registered from config.
    fn add_default_response(
        &self,
        doc: &Document,
        operation: &mut Operation,
        scope: &ServiceScope<'_>,
        rule: &MethodRule,
        content_type: &str,
        full_method: &str,
    ) -> Result<()> {
        let name = non_empty(rule.default_response.as_deref()).or(scope.default_response);
        if let Some(name) = name {
            let key = qualify_schema(self.packages, scope.package, name);
            if !doc.components.schemas.contains_key(&key) {
                return Err(Error::UnresolvedReference {
                    referrer: full_method.to_string(),
                    type_name: key,
                });
            }
            operation.responses.insert(
                "default".to_string(),
                ResponseRef::Inline(Response {
                    description: String::new(),
                    content: media(content_type, SchemaRef::reference(&key)),
                }),
            );
        } else if doc.components.responses.contains_key("default") {
            operation
                .responses
                .insert("default".to_string(), ResponseRef::reference("default"));
        }
        Ok(())
    }
}

/// The verb and template of a method rule, when a route slot is set.
fn route(rule: &MethodRule) -> Option<(HttpVerb, &str)> {
    rule.pattern.as_ref().map(|pattern| match pattern {
        RoutePattern::Get(path) => (HttpVerb::Get, path.as_str()),
        RoutePattern::Put(path) => (HttpVerb::Put, path.as_str()),
        RoutePattern::Post(path) => (HttpVerb::Post, path.as_str()),
        RoutePattern::Delete(path) => (HttpVerb::Delete, path.as_str()),
        RoutePattern::Patch(path) => (HttpVerb::Patch, path.as_str()),
    })
}

/// Join a method template under the service prefix. Absolute templates
/// (leading `/`) win outright.
fn join_path(prefix: &str, template: &str) -> String {
    if template.starts_with('/') {
        return template.to_string();
    }
    let prefix = prefix.trim_end_matches('/');
    if template.is_empty() {
        return prefix.to_string();
    }
    format!("{prefix}/{template}")
}

/// Default-response names are schema-table keys. A bare name gets the
/// current package prepended unless it already starts with a known one.
fn qualify_schema(packages: &[String], package: &str, name: &str) -> String {
    let qualified = packages
        .iter()
        .any(|p| !p.is_empty() && name.starts_with(p.as_str()));
    if qualified || package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

/// Read one layer's entries: no entries defer, an empty-name entry clears,
/// named entries require.
fn security_policy(entries: &[SecurityRule]) -> SecurityPolicy {
    if entries.is_empty() {
        return SecurityPolicy::Inherit;
    }
    let mut requirements = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = entry.name.as_deref().unwrap_or("");
        if name.is_empty() {
            return SecurityPolicy::Clear;
        }
        requirements.push(requirement(name, &entry.scopes));
    }
    SecurityPolicy::Require(requirements)
}

/// Combine the service policy with a method's entries into the operation's
/// final tri-state security value.
fn resolve_security(
    service: &SecurityPolicy,
    entries: &[SecurityRule],
) -> Option<Vec<SecurityRequirement>> {
    let combined = match security_policy(entries) {
        SecurityPolicy::Inherit => service.clone(),
        SecurityPolicy::Clear => SecurityPolicy::Clear,
        SecurityPolicy::Require(method_list) => {
            let mut list = match service {
                SecurityPolicy::Require(base) => base.clone(),
                _ => Vec::new(),
            };
            list.extend(method_list);
            SecurityPolicy::Require(list)
        }
    };
    match combined {
        SecurityPolicy::Inherit => None,
        SecurityPolicy::Clear => Some(Vec::new()),
        SecurityPolicy::Require(list) => Some(list),
    }
}

/// A single-scheme requirement entry.
pub(crate) fn requirement(name: &str, scopes: &[String]) -> SecurityRequirement {
    let mut requirement = SecurityRequirement::new();
    requirement.insert(name.to_string(), scopes.to_vec());
    requirement
}

/// Unset and empty option strings are both treated as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

fn media(content_type: &str, schema: SchemaRef) -> IndexMap<String, MediaType> {
    let mut content = IndexMap::new();
    content.insert(content_type.to_string(), MediaType { schema });
    content
}
