//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::TutorialConfig;
use crate::error::{Result, TutorialError};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "YT_TUTORIAL_CONFIG";

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line; must exist.
    Explicit(PathBuf),
    /// Named by `YT_TUTORIAL_CONFIG`; must exist.
    Environment(PathBuf),
    /// The user config file; optional.
    UserDefault(PathBuf),
    /// No file to read.
    None,
}

impl ConfigSource {
    /// Pick the source in priority order: flag, environment, user default.
    pub fn discover(explicit: Option<&Path>) -> Self {
        Self::resolve(
            explicit,
            std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            dirs::config_dir(),
        )
    }

    /// Resolution with every input passed in.
    pub fn resolve(
        explicit: Option<&Path>,
        env_path: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = explicit {
            return Self::Explicit(path.to_path_buf());
        }

        if let Some(path) = env_path.filter(|p| !p.as_os_str().is_empty()) {
            return Self::Environment(path);
        }

        match config_dir {
            Some(dir) => Self::UserDefault(dir.join("yt-tutorial").join("config.yml")),
            None => Self::None,
        }
    }

    /// Path of the file to read, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Environment(p) | Self::UserDefault(p) => Some(p),
            Self::None => None,
        }
    }
}

/// Load configuration from a discovered source.
///
/// # Errors
///
/// Returns `ConfigNotFound` if an explicit or environment path is missing.
/// Returns `ConfigParseError` if the YAML is invalid.
/// Returns `InvalidModule` if a configured module breaks a content contract.
pub fn load_config(source: &ConfigSource) -> Result<TutorialConfig> {
    let config = match source {
        ConfigSource::Explicit(path) | ConfigSource::Environment(path) => load_config_file(path)?,
        ConfigSource::UserDefault(path) if path.exists() => load_config_file(path)?,
        ConfigSource::UserDefault(_) | ConfigSource::None => TutorialConfig::default(),
    };

    for module in &config.modules {
        module.validate()?;
    }

    tracing::debug!(
        "Loaded config from {:?} with {} extra module(s)",
        source.path(),
        config.modules.len()
    );

    Ok(config)
}

/// Load a single config file and parse it into `TutorialConfig`.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<TutorialConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TutorialError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TutorialError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into `TutorialConfig`.
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<TutorialConfig> {
    if content.trim().is_empty() {
        return Ok(TutorialConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| TutorialError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_wins() {
        let source = ConfigSource::resolve(
            Some(Path::new("/flag.yml")),
            Some(PathBuf::from("/env.yml")),
            Some(PathBuf::from("/home/me/.config")),
        );
        assert_eq!(source, ConfigSource::Explicit(PathBuf::from("/flag.yml")));
    }

    #[test]
    fn environment_beats_user_default() {
        let source = ConfigSource::resolve(
            None,
            Some(PathBuf::from("/env.yml")),
            Some(PathBuf::from("/home/me/.config")),
        );
        assert_eq!(source, ConfigSource::Environment(PathBuf::from("/env.yml")));
    }

    #[test]
    fn empty_environment_value_is_ignored() {
        let source = ConfigSource::resolve(
            None,
            Some(PathBuf::new()),
            Some(PathBuf::from("/home/me/.config")),
        );
        assert_eq!(
            source.path(),
            Some(Path::new("/home/me/.config/yt-tutorial/config.yml"))
        );
    }

    #[test]
    fn missing_user_default_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let source = ConfigSource::UserDefault(temp.path().join("config.yml"));
        assert_eq!(load_config(&source).unwrap(), TutorialConfig::default());
        assert_eq!(load_config(&ConfigSource::None).unwrap(), TutorialConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let source = ConfigSource::Explicit(temp.path().join("missing.yml"));
        assert!(matches!(
            load_config(&source),
            Err(TutorialError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "allowed_commands: [unclosed").unwrap();

        let err = load_config(&ConfigSource::Explicit(path.clone())).unwrap_err();
        assert!(matches!(err, TutorialError::ConfigParseError { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn invalid_module_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(
            &path,
            r#"
modules:
  - id: broken
    title: Broken
    steps:
      - title: Both
        action:
          run: "true"
        choices:
          - name: again
            run: "true"
"#,
        )
        .unwrap();

        assert!(matches!(
            load_config(&ConfigSource::Explicit(path)),
            Err(TutorialError::InvalidModule { .. })
        ));
    }

    #[test]
    fn empty_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "\n").unwrap();
        assert_eq!(load_config_file(&path).unwrap(), TutorialConfig::default());
    }
}
