//! Server configuration file (TOML).

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    pub jwt: JwtSection,
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSection {
    pub secret: String,
    #[serde(default = "default_ttl_minutes")]
    pub access_token_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    /// `sqlite` or `redb`.
    #[serde(default = "default_backend")]
    pub backend: String,
    pub data_dir: String,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_ttl_minutes() -> i64 {
    15
}

fn default_backend() -> String {
    "sqlite".to_string()
}

impl ServerConfig {
    /// A bare name resolves to `/etc/bookshelf/<name>.toml`; anything that
    /// looks like a path is used as is.
    pub fn resolve_path(name: &str) -> PathBuf {
        if name.contains('/') || name.contains('.') {
            PathBuf::from(name)
        } else {
            PathBuf::from(format!("/etc/bookshelf/{}.toml", name))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            ServerConfig::resolve_path("dev"),
            PathBuf::from("/etc/bookshelf/dev.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
    }

    #[test]
    fn test_parse_full() {
        let config = ServerConfig::parse(
            r#"
            [server]
            listen = "127.0.0.1:9090"

            [jwt]
            secret = "s3cret"
            access_token_ttl_minutes = 30

            [storage]
            backend = "redb"
            data_dir = "/var/lib/bookshelf"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.listen, "127.0.0.1:9090");
        assert_eq!(config.jwt.secret, "s3cret");
        assert_eq!(config.jwt.access_token_ttl_minutes, 30);
        assert_eq!(config.storage.backend, "redb");
    }

    #[test]
    fn test_parse_defaults() {
        let config = ServerConfig::parse(
            r#"
            [jwt]
            secret = "s3cret"

            [storage]
            data_dir = "/tmp/books"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.listen, "0.0.0.0:8080");
        assert_eq!(config.jwt.access_token_ttl_minutes, 15);
        assert_eq!(config.storage.backend, "sqlite");
    }

    #[test]
    fn test_missing_section_fails() {
        assert!(ServerConfig::parse("[jwt]\nsecret = \"x\"\n").is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookd.toml");
        std::fs::write(
            &path,
            "[jwt]\nsecret = \"x\"\n[storage]\ndata_dir = \"/tmp\"\n",
        )
        .unwrap();
        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.storage.data_dir, "/tmp");
        assert!(ServerConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
