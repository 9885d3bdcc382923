//! Error types for document generation.

use std::io;

/// Errors that can occur while building or writing an API document.
///
/// All build errors are fatal: generation stops at the first one and no
/// output file is written.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O failure reading input or writing output.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// YAML (de)serialization failure.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON (de)serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Failed to decode a protobuf file descriptor set.
    #[error("failed to decode proto descriptor set: {0}")]
    DescriptorDecode(#[from] prost::DecodeError),

    /// A field or a default-response option names a type that is neither a
    /// generated schema nor a registered message.
    #[error("'{referrer}' references '{type_name}' but no matching schema or message was found")]
    UnresolvedReference {
        /// Fully-qualified field, method or service doing the referencing.
        referrer: String,
        /// The type or schema name that could not be resolved.
        type_name: String,
    },

    /// A declared path parameter has no `{name}` placeholder in the template.
    #[error("parameter {{{parameter}}} is missing from path {path}")]
    MissingPathPlaceholder {
        /// The declared parameter name.
        parameter: String,
        /// The path template it was resolved against.
        path: String,
    },

    /// A method parameter duplicates a service parameter's location and name.
    #[error("{method} {location} parameter '{name}' is already defined in the service definition")]
    DuplicateParameter {
        /// Fully-qualified method name.
        method: String,
        /// Parameter location (`path`, `query`, `header` or `cookie`).
        location: String,
        /// The duplicated parameter name.
        name: String,
    },

    /// Two methods resolved to the same (path, verb) slot.
    #[error("duplicate method '{verb}' for path '{path}'")]
    DuplicateOperation {
        /// The HTTP verb of the colliding operation.
        verb: String,
        /// The templated path both methods resolved to.
        path: String,
    },

    /// A declared parameter type is outside the supported enum.
    #[error("invalid parameter type {value} for parameter '{parameter}'")]
    InvalidParameterType {
        /// The offending parameter name.
        parameter: String,
        /// The unrecognized type enum value.
        value: i32,
    },
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
