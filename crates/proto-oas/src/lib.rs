#![allow(clippy::doc_markdown)] // README uses "OpenAPI" proper noun throughout
#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod comment;
mod config;
mod document;
mod error;
mod generator;
mod parameter;
mod patch;
mod path;
mod registry;
mod schema;

/// `info.version` used when the config leaves `version` unset.
pub const DEFAULT_VERSION: &str = "0.0.1";

/// Output file stem used when the config leaves `filename` unset.
pub const DEFAULT_FILENAME: &str = "openapi";

/// Media type used when no file, service or method option overrides it.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

pub use config::{parse_pipe_list, GenConfig};
pub use document::{
    Components, Document, HttpVerb, Info, MediaType, Operation, Parameter, ParameterLocation,
    PathItem, RequestBody, Response, ResponseRef, Schema, SchemaRef, SchemaType,
    SecurityRequirement, SecurityScheme, Server, Tag, TagGroup, OPENAPI_VERSION,
};
pub use error::{Error, Result};
pub use generator::{build_document, generate};
