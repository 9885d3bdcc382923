//! Protobuf descriptor types for the proto-oas generator.
//!
//! This crate provides custom [`prost::Message`] types that preserve the
//! `oas.v1` option extensions (fields 50000–50002 on the standard option
//! messages) which stock `prost_types` drops during decoding, because prost
//! does not retain unknown fields.
//!
//! The `proto-oas` generator depends on these types. You should not need to
//! depend on this crate directly; use `proto-oas` instead.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod descriptor;
