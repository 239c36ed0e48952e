//! Client construction settings and the environment they are resolved from.

use crate::core::launcher::LaunchFlags;
use std::path::{Path, PathBuf};

pub mod defaults;
pub mod manager;

pub use defaults::{CONFIG_FILE_NAME, DEFAULT_BOX, DEFAULT_INSTALL_DIR, LAUNCHER_FILE_NAME};
pub use manager::{ConfigManager, Settings};

/// Options recognised when building a [`crate::SandboxClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Sandbox used when a request does not name one.
    pub default_box: String,
    /// Root of the engine installation. `None` defers to the environment.
    pub install_dir: Option<PathBuf>,
    /// Flags applied by the convenience wrappers (reload, terminate, ...).
    pub flags: LaunchFlags,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_box: defaults::default_box(),
            install_dir: None,
            flags: LaunchFlags::default(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_box(mut self, name: impl Into<String>) -> Self {
        self.default_box = name.into();
        self
    }

    pub fn with_install_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_dir = Some(path.into());
        self
    }

    pub fn with_flags(mut self, flags: LaunchFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Snapshot of the environment variables the client consults.
///
/// Read once at construction and never re-read, so tests can build one by
/// hand instead of mutating the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// The Windows system directory (`WinDir`, falling back to `SystemRoot`).
    pub windir: Option<PathBuf>,
    /// `SANDBOXIE_INSTALL_DIR`.
    pub install_dir: Option<PathBuf>,
}

impl Environment {
    pub fn from_process() -> Self {
        let var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            windir: var(defaults::ENV_WINDIR).or_else(|| var(defaults::ENV_SYSTEM_ROOT)),
            install_dir: var(defaults::ENV_INSTALL_DIR),
        }
    }

    pub fn with_windir(mut self, path: impl Into<PathBuf>) -> Self {
        self.windir = Some(path.into());
        self
    }

    pub fn with_install_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_dir = Some(path.into());
        self
    }
}

/// Picks the installation directory: explicit override, then the
/// environment, then [`DEFAULT_INSTALL_DIR`].
pub fn resolve_install_dir(env: &Environment, explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env.install_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INSTALL_DIR))
}

/// Directories searched for the config file, in order.
pub fn config_search_dirs(env: &Environment, install_dir: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::with_capacity(2);
    if let Some(windir) = &env.windir {
        dirs.push(windir.clone());
    }
    dirs.push(install_dir.to_path_buf());
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_install_dir_prefers_explicit() {
        let env = Environment::default().with_install_dir("from_env");
        let dir = resolve_install_dir(&env, Some(Path::new("explicit")));
        assert_eq!(dir, PathBuf::from("explicit"));
    }

    #[test]
    fn test_resolve_install_dir_from_env() {
        let env = Environment::default().with_install_dir("some_dir");
        assert_eq!(resolve_install_dir(&env, None), PathBuf::from("some_dir"));
    }

    #[test]
    fn test_resolve_install_dir_default() {
        let dir = resolve_install_dir(&Environment::default(), None);
        assert_eq!(dir, PathBuf::from(r"C:\Program Files\Sandboxie"));
    }

    #[test]
    fn test_search_dirs_order() {
        let env = Environment::default().with_windir("windows");
        let dirs = config_search_dirs(&env, Path::new("install"));
        assert_eq!(dirs, vec![PathBuf::from("windows"), PathBuf::from("install")]);
    }

    #[test]
    fn test_search_dirs_without_windir() {
        let dirs = config_search_dirs(&Environment::default(), Path::new("install"));
        assert_eq!(dirs, vec![PathBuf::from("install")]);
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_default_box("somebox")
            .with_install_dir("dir");
        assert_eq!(config.default_box, "somebox");
        assert_eq!(config.install_dir, Some(PathBuf::from("dir")));
        assert_eq!(config.flags, LaunchFlags::default());
    }
}
