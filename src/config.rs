use crate::storage::{DatabaseUri, DEFAULT_DATABASE_URI};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the database URI
pub const DATABASE_URI_ENV: &str = "BIBREF_DATABASE_URI";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BibrefConfig {
    pub database: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("bibref.toml")
}

pub fn load_config(path: Option<&Path>) -> Result<Option<BibrefConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: BibrefConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &BibrefConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Write a fresh config for `config init`.
///
/// The existing file is never parsed, so `force` can replace a broken one.
pub fn init_config(
    path: &Path,
    explicit: Option<&str>,
    env_value: Option<&str>,
    force: bool,
) -> Result<BibrefConfig> {
    let uri = resolve_database_uri(explicit, env_value, None)?;
    let config = BibrefConfig { database: Some(uri.to_uri_string()) };
    write_config(path, &config, force)?;
    Ok(config)
}

/// Load `.env` from the working directory (or a parent) if there is one.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env: {}", e),
    }
}

/// Pick the database URI: explicit flag, then environment, then config file,
/// then the default file store.
pub fn resolve_database_uri(
    explicit: Option<&str>,
    env_value: Option<&str>,
    config: Option<&BibrefConfig>,
) -> Result<DatabaseUri> {
    let raw = explicit
        .or(env_value)
        .or_else(|| config.and_then(|c| c.database.as_deref()))
        .unwrap_or(DEFAULT_DATABASE_URI);
    DatabaseUri::parse(raw)
}

pub fn ensure_db_dir(uri: &DatabaseUri) -> Result<()> {
    if let Some(parent) = uri.path().and_then(Path::parent) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_order() {
        let config = BibrefConfig { database: Some("sqlite:///from_config.db".into()) };

        let uri = resolve_database_uri(Some("sqlite:///flag.db"), Some("sqlite:///env.db"), Some(&config)).unwrap();
        assert_eq!(uri.path(), Some(Path::new("flag.db")));

        let uri = resolve_database_uri(None, Some("sqlite:///env.db"), Some(&config)).unwrap();
        assert_eq!(uri.path(), Some(Path::new("env.db")));

        let uri = resolve_database_uri(None, None, Some(&config)).unwrap();
        assert_eq!(uri.path(), Some(Path::new("from_config.db")));

        let uri = resolve_database_uri(None, None, None).unwrap();
        assert_eq!(uri, DatabaseUri::default());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bibref.toml");
        let config = BibrefConfig { database: Some("sqlite:///refs.db".into()) };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.database.as_deref(), Some("sqlite:///refs.db"));
    }

    #[test]
    fn test_forced_init_replaces_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bibref.toml");
        std::fs::write(&path, "database = [broken").unwrap();
        assert!(load_config(Some(&path)).is_err());

        assert!(init_config(&path, None, None, false).is_err());
        let written = init_config(&path, None, Some("sqlite:///env.db"), true).unwrap();
        assert_eq!(written.database.as_deref(), Some("sqlite:///env.db"));

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.database.as_deref(), Some("sqlite:///env.db"));
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).unwrap().is_none());
    }

    #[test]
    fn test_ensure_db_dir() {
        let dir = tempfile::tempdir().unwrap();
        let uri = DatabaseUri::File(dir.path().join("nested/dir/app.db"));
        ensure_db_dir(&uri).unwrap();
        assert!(dir.path().join("nested/dir").is_dir());
        ensure_db_dir(&DatabaseUri::Memory).unwrap();
    }
}
