//! Generation configuration loaded from YAML and/or CLI flags.
//!
//! Externalizes the document-level knobs (info fields, default content type,
//! global default response, package filters, output format) so they live
//! next to the proto files instead of being hardcoded.
//!
//! # File format
//!
//! ```yaml
//! # api/proto-oas.yaml
//! title: Shop API
//! description: Public storefront API.
//! version: 1.4.0
//!
//! # Output stem; extension follows the output format.
//! filename: openapi
//!
//! # Default media type for request/response content.
//! content_type: application/json
//!
//! # Schema name for the shared `default` error response.
//! default_response: shop.v1.Error
//!
//! # Fallback host when no file/service/method host option is set.
//! host: api.shop.example
//!
//! # Package filters: include restricts (when non-empty), ignore removes.
//! include:
//!   - shop.v1
//! ignore:
//!   - shop.internal
//!
//! # Output toggles.
//! json_output: false
//! json_names: false
//! ```

use std::path::Path;

use serde::Deserialize;

/// Document generation config.
///
/// Loaded from a YAML file via [`GenConfig::load`]; every field also maps to
/// a CLI flag which overrides the file value.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// `info.title` of the generated document.
    pub title: String,

    /// `info.description` of the generated document.
    pub description: String,

    /// `info.version` of the generated document.
    pub version: String,

    /// Output filename stem (extension is `.yaml` or `.json`).
    pub filename: String,

    /// Default media type for request and response content.
    pub content_type: String,

    /// Schema name backing the shared `components.responses.default` entry.
    ///
    /// Qualified with the declaring file's package when not already
    /// package-prefixed. Unset means no global default response.
    pub default_response: Option<String>,

    /// Fallback host when no file/service/method host option applies.
    pub host: Option<String>,

    /// Packages to generate for; empty means all.
    pub include: Vec<String>,

    /// Packages to exclude; applied after `include`, always wins.
    pub ignore: Vec<String>,

    /// Emit compact JSON instead of YAML.
    pub json_output: bool,

    /// Use camelCase field aliases as property and required names.
    pub json_names: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            version: crate::DEFAULT_VERSION.to_string(),
            filename: crate::DEFAULT_FILENAME.to_string(),
            content_type: crate::DEFAULT_CONTENT_TYPE.to_string(),
            default_response: None,
            host: None,
            include: Vec::new(),
            ignore: Vec::new(),
            json_output: false,
            json_names: false,
        }
    }
}

impl GenConfig {
    /// Load config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Output filename for the configured format, e.g. `openapi.yaml`.
    #[must_use]
    pub fn output_filename(&self) -> String {
        let ext = if self.json_output { "json" } else { "yaml" };
        format!("{}.{ext}", self.filename)
    }
}

/// Parse a pipe-delimited package list (`"shop.v1|crm.v1"`) as passed on the
/// command line. Blank segments are dropped.
#[must_use]
pub fn parse_pipe_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn deserialize_defaults() {
        let config: GenConfig = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(config.title, "");
        assert_eq!(config.version, "0.0.1");
        assert_eq!(config.filename, "openapi");
        assert_eq!(config.content_type, "application/json");
        assert!(config.default_response.is_none());
        assert!(config.host.is_none());
        assert!(config.include.is_empty());
        assert!(config.ignore.is_empty());
        assert!(!config.json_output);
        assert!(!config.json_names);
    }

    #[test]
    fn deserialize_full() {
        let yaml = indoc! {"
            title: Shop API
            description: Public storefront API.
            version: 1.4.0
            filename: shop-api
            content_type: application/vnd.api+json
            default_response: shop.v1.Error
            host: api.shop.example
            include:
              - shop.v1
            ignore:
              - shop.internal
            json_output: true
            json_names: true
        "};
        let config: GenConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.title, "Shop API");
        assert_eq!(config.description, "Public storefront API.");
        assert_eq!(config.version, "1.4.0");
        assert_eq!(config.filename, "shop-api");
        assert_eq!(config.content_type, "application/vnd.api+json");
        assert_eq!(config.default_response.as_deref(), Some("shop.v1.Error"));
        assert_eq!(config.host.as_deref(), Some("api.shop.example"));
        assert_eq!(config.include, vec!["shop.v1"]);
        assert_eq!(config.ignore, vec!["shop.internal"]);
        assert!(config.json_output);
        assert!(config.json_names);
    }

    #[test]
    fn output_filename_follows_format() {
        let mut config = GenConfig::default();
        assert_eq!(config.output_filename(), "openapi.yaml");

        config.json_output = true;
        assert_eq!(config.output_filename(), "openapi.json");

        config.filename = "shop-api".to_string();
        assert_eq!(config.output_filename(), "shop-api.json");
    }

    #[test]
    fn pipe_list_parsing() {
        assert_eq!(parse_pipe_list("shop.v1"), vec!["shop.v1"]);
        assert_eq!(parse_pipe_list("shop.v1|crm.v1"), vec!["shop.v1", "crm.v1"]);
        assert_eq!(parse_pipe_list(" shop.v1 | crm.v1 "), vec!["shop.v1", "crm.v1"]);
        assert!(parse_pipe_list("").is_empty());
        assert!(parse_pipe_list("||").is_empty());
    }

    #[test]
    fn load_from_file() {
        let dir = std::env::temp_dir().join("proto-oas-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test-config.yaml");
        std::fs::write(&path, "title: Shop API\nversion: 2.0.0\n").unwrap();

        let config = GenConfig::load(&path).unwrap();
        assert_eq!(config.title, "Shop API");
        assert_eq!(config.version, "2.0.0");
        // Defaults still apply
        assert_eq!(config.content_type, "application/json");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let result = GenConfig::load(Path::new("/nonexistent/proto-oas.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_invalid_yaml_returns_error() {
        let dir = std::env::temp_dir().join("proto-oas-config-test-invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.yaml");
        std::fs::write(&path, "include: [[[invalid").unwrap();

        let result = GenConfig::load(&path);
        assert!(result.is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
