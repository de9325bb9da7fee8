// Configuration file loaders

use crate::{ConfigError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
    Env,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            "env" => Some(FileFormat::Env),
            _ => None,
        }
    }

    /// Detect the format of `path` from its extension.
    ///
    /// A file literally named `.env` is treated as [`FileFormat::Env`].
    pub fn detect(path: &Path) -> Result<Self> {
        if path.file_name().and_then(|n| n.to_str()) == Some(".env") {
            return Ok(FileFormat::Env);
        }

        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::LoadError("No file extension found".to_string()))?;

        Self::from_extension(ext)
            .ok_or_else(|| ConfigError::LoadError(format!("Unsupported format: {}", ext)))
    }
}

/// Parses configuration files into a flat JSON object.
///
/// Nested tables (`[webhook]` in TOML, objects in JSON) are flattened with `_`
/// so `webhook.timeout_read_ms` and `WEBHOOK_TIMEOUT_READ_MS` land on the same key.
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Pick the format from the file extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        FileFormat::detect(path.as_ref()).map(Self::new)
    }

    /// Load configuration from a file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Map<String, Value>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse(&content)
    }

    /// Parse configuration from a string
    pub fn parse(&self, content: &str) -> Result<Map<String, Value>> {
        let value = match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?,
            FileFormat::Toml => {
                let table: toml::Table = toml::from_str(content)
                    .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
                serde_json::to_value(table)
                    .map_err(|e| ConfigError::SerializationError(e.to_string()))?
            }
            FileFormat::Env => Value::Object(parse_env(content)),
        };

        match value {
            Value::Object(map) => {
                let mut flat = Map::new();
                flatten("", map, &mut flat);
                Ok(flat)
            }
            other => Err(ConfigError::ParseError(format!(
                "Expected a table at the top level, found {}",
                type_name(&other)
            ))),
        }
    }
}

fn parse_env(content: &str) -> Map<String, Value> {
    let mut map = Map::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            map.insert(
                key.trim().to_lowercase(),
                Value::String(value.to_string()),
            );
        }
    }

    map
}

fn flatten(prefix: &str, map: Map<String, Value>, out: &mut Map<String, Value>) {
    for (key, value) in map {
        let key = if prefix.is_empty() {
            key.to_lowercase()
        } else {
            format!("{}_{}", prefix, key.to_lowercase())
        };

        match value {
            Value::Object(inner) => flatten(&key, inner, out),
            other => {
                out.insert(key, other);
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_json_flattens_nested_objects() {
        let loader = ConfigLoader::new(FileFormat::Json);
        let json = r#"{"webhook": {"retry": {"max_attempts": 4}}, "name": "paywire"}"#;

        let result = loader.parse(json).unwrap();
        assert_eq!(result["webhook_retry_max_attempts"], 4);
        assert_eq!(result["name"], "paywire");
    }

    #[test]
    fn test_parse_toml_tables() {
        let loader = ConfigLoader::new(FileFormat::Toml);
        let toml = r#"
            [webhook.timeout]
            connect_ms = 1000
            read_ms = 2000

            [encryption]
            secret_key = "s3cret"
        "#;

        let result = loader.parse(toml).unwrap();
        assert_eq!(result["webhook_timeout_connect_ms"], 1000);
        assert_eq!(result["webhook_timeout_read_ms"], 2000);
        assert_eq!(result["encryption_secret_key"], "s3cret");
    }

    #[test]
    fn test_parse_env() {
        let loader = ConfigLoader::new(FileFormat::Env);
        let env = r#"
            WEBHOOK_RETRY_MAX_ATTEMPTS=5
            # Comment
            export ENCRYPTION_SECRET_KEY="quoted value"
        "#;

        let result = loader.parse(env).unwrap();
        assert_eq!(result["webhook_retry_max_attempts"], "5");
        assert_eq!(result["encryption_secret_key"], "quoted value");
    }

    #[test]
    fn test_top_level_must_be_a_table() {
        let loader = ConfigLoader::new(FileFormat::Json);
        assert!(matches!(
            loader.parse("[1, 2, 3]"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("TOML"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("unknown"), None);
        assert_eq!(
            FileFormat::detect(Path::new("/etc/paywire/.env")).unwrap(),
            FileFormat::Env
        );
        assert!(FileFormat::detect(Path::new("paywire")).is_err());
    }

    #[test]
    fn test_load_file_auto() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "encryption_secret_key = \"from-file\"").unwrap();

        let loader = ConfigLoader::auto(file.path()).unwrap();
        let result = loader.load_file(file.path()).unwrap();
        assert_eq!(result["encryption_secret_key"], "from-file");
    }

    #[test]
    fn test_load_missing_file() {
        let loader = ConfigLoader::new(FileFormat::Json);
        assert!(matches!(
            loader.load_file("/definitely/not/here.json"),
            Err(ConfigError::LoadError(_))
        ));
    }
}
