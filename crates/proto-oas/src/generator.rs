//! Document assembly pipeline.
//!
//! Two phases: every included file is registered (messages and comments)
//! before any schema or path is built, so cross-file references resolve no
//! matter which file declares them.

use indexmap::IndexMap;
use prost::Message as _;

use proto_oas_core::descriptor::{FileDescriptorProto, FileDescriptorSet};

use crate::comment::CommentMap;
use crate::config::GenConfig;
use crate::document::{
    Document, Info, MediaType, Response, ResponseRef, SchemaRef, SecurityScheme, Server,
};
use crate::error::{Error, Result};
use crate::patch;
use crate::path::{non_empty, requirement, PathBuilder};
use crate::registry::Registry;
use crate::schema::SchemaBuilder;

/// The well-known package; its files are never part of the API surface.
const WELL_KNOWN_PACKAGE: &str = "google.protobuf";

/// Decode descriptor-set bytes, build the document and serialize it to YAML
/// (or JSON), normalizing empty content schemas on the way out.
pub fn generate(descriptor: &[u8], config: &GenConfig) -> Result<Vec<u8>> {
    let fdset = FileDescriptorSet::decode(descriptor)?;
    let document = build_document(&fdset, config)?;

    let serialized = if config.json_output {
        serde_json::to_vec(&document)?
    } else {
        serde_yaml_ng::to_string(&document)?.into_bytes()
    };
    patch::normalize_empty_schemas(&serialized, config.json_output)
}

/// Assemble the typed document from a decoded descriptor set.
pub fn build_document(fdset: &FileDescriptorSet, config: &GenConfig) -> Result<Document> {
    let files = included_files(fdset, config);

    let mut registry = Registry::default();
    for (index, file) in files.iter().enumerate() {
        registry.register_file(index, file);
    }
    let comments: Vec<CommentMap> = files
        .iter()
        .map(|file| CommentMap::from_file(file))
        .collect();
    let packages: Vec<String> = files
        .iter()
        .map(|file| file.package.clone().unwrap_or_default())
        .collect();

    let mut doc = Document::new(Info {
        title: config.title.clone(),
        description: config.description.clone(),
        version: config.version.clone(),
    });

    let schemas = SchemaBuilder::new(&registry, &comments, config.json_names);
    for (index, file) in files.iter().enumerate() {
        schemas.add_file_schemas(&mut doc, index, file)?;
    }

    add_default_response_component(&mut doc, config)?;

    let paths = PathBuilder::new(config, &schemas, &comments, &packages);
    for (index, file) in files.iter().enumerate() {
        add_file_servers(&mut doc, file);
        add_file_security(&mut doc, file);
        paths.add_file_paths(&mut doc, index, file)?;
    }

    doc.dedup_servers();
    doc.dedup_tags();

    Ok(doc)
}

/// Input files minus the well-known package and whatever the include and
/// ignore lists rule out. Ignore wins over include.
fn included_files<'a>(
    fdset: &'a FileDescriptorSet,
    config: &GenConfig,
) -> Vec<&'a FileDescriptorProto> {
    fdset
        .file
        .iter()
        .filter(|file| {
            let package = file.package.as_deref().unwrap_or("");
            if package == WELL_KNOWN_PACKAGE {
                return false;
            }
            if !config.include.is_empty() && !config.include.iter().any(|p| p == package) {
                return false;
            }
            !config.ignore.iter().any(|p| p == package)
        })
        .collect()
}

/// Register the shared `default` response when the config names a schema.
/// The name must match a generated schema key exactly.
fn add_default_response_component(doc: &mut Document, config: &GenConfig) -> Result<()> {
    let Some(name) = non_empty(config.default_response.as_deref()) else {
        return Ok(());
    };
    if !doc.components.schemas.contains_key(name) {
        return Err(Error::UnresolvedReference {
            referrer: "default response".to_string(),
            type_name: name.to_string(),
        });
    }

    let mut content = IndexMap::new();
    content.insert(
        config.content_type.clone(),
        MediaType {
            schema: SchemaRef::reference(name),
        },
    );
    doc.components.responses.insert(
        "default".to_string(),
        ResponseRef::Inline(Response {
            description: String::new(),
            content,
        }),
    );
    Ok(())
}

/// Append the file's host and declared server URLs to the document.
fn add_file_servers(doc: &mut Document, file: &FileDescriptorProto) {
    let Some(rule) = file.options.as_ref().and_then(|o| o.oas.as_ref()) else {
        return;
    };

    if let Some(host) = non_empty(rule.host.as_deref()) {
        doc.servers.push(Server::from_host(host));
    }
    for server in &rule.servers {
        if let Some(url) = non_empty(server.url.as_deref()) {
            doc.servers.push(Server::from_host(url));
        }
    }
}

/// Merge the file's declared security schemes (by name). Declared
/// document-wide requirements replace the current list, so the last
/// declaring file wins.
fn add_file_security(doc: &mut Document, file: &FileDescriptorProto) {
    let Some(rule) = file.options.as_ref().and_then(|o| o.oas.as_ref()) else {
        return;
    };

    for declared in &rule.security_schemes {
        let Some(name) = non_empty(declared.name.as_deref()) else {
            continue;
        };
        let scheme = declared.scheme.as_ref();
        doc.components.security_schemes.insert(
            name.to_string(),
            SecurityScheme {
                scheme_type: scheme.and_then(|s| s.r#type.clone()),
                name: scheme.and_then(|s| s.name.clone()),
                location: scheme.and_then(|s| s.r#in.clone()),
                scheme: scheme.and_then(|s| s.scheme.clone()),
                bearer_format: scheme.and_then(|s| s.bearer_format.clone()),
                open_id_connect_url: scheme.and_then(|s| s.open_id_connect_url.clone()),
            },
        );
    }

    let mut requirements = Vec::new();
    for entry in &rule.security {
        if let Some(name) = non_empty(entry.name.as_deref()) {
            requirements.push(requirement(name, &entry.scopes));
        }
    }
    if !requirements.is_empty() {
        doc.security = requirements;
    }
}
