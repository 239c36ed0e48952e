use super::encoding::{decode_utf16le, encode_utf16le};
use super::ini::Config;
use crate::config::{config_search_dirs, Environment, CONFIG_FILE_NAME};
use crate::utils::{Result, SbieError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads and rewrites the engine's profile file.
///
/// Nothing is cached: every read goes to disk, because the engine and other
/// tools edit the file behind our back. There is no file locking either, so
/// a concurrent writer in another process can still interleave with
/// [`ConfigStore::modify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Finds the config in the system directory, then the install directory.
    pub fn discover(env: &Environment, install_dir: &Path) -> Result<Self> {
        let path = locate(&config_search_dirs(env, install_dir))?;
        Ok(Self { path })
    }

    /// Uses `path` as-is without checking that it exists.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Config> {
        debug!(path = %self.path.display(), "reading sandbox config");
        let bytes = fs::read(&self.path).map_err(|source| self.io_error(source))?;

        let (text, bom) = decode_utf16le(&bytes).map_err(|e| SbieError::ConfigParse {
            path: self.path.clone(),
            line: None,
            message: e.to_string(),
        })?;

        let mut config = Config::parse(&text).map_err(|e| SbieError::ConfigParse {
            path: self.path.clone(),
            line: Some(e.line),
            message: e.message,
        })?;

        let mut format = config.format();
        format.bom = bom;
        config.set_format(format);
        Ok(config)
    }

    /// Reads the config, hands it to `f`, and writes it back only if `f`
    /// returns `Ok`. On error the file is left untouched.
    pub fn modify<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Config) -> std::result::Result<T, E>,
        E: From<SbieError>,
    {
        let mut config = self.read()?;
        let value = f(&mut config)?;
        self.write(&config)?;
        Ok(value)
    }

    /// Replaces the whole file.
    fn write(&self, config: &Config) -> Result<()> {
        let bytes = encode_utf16le(&config.render(), config.format().bom);
        debug!(path = %self.path.display(), bytes = bytes.len(), "writing sandbox config");

        let mut file = fs::File::create(&self.path).map_err(|source| self.io_error(source))?;
        file.write_all(&bytes).map_err(|source| self.io_error(source))?;
        file.sync_all().map_err(|source| self.io_error(source))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> SbieError {
        SbieError::ConfigIo {
            path: self.path.clone(),
            source,
        }
    }
}

/// First existing `Sandboxie.ini` among `dirs`.
pub fn locate(dirs: &[PathBuf]) -> Result<PathBuf> {
    let candidates: Vec<PathBuf> = dirs.iter().map(|d| d.join(CONFIG_FILE_NAME)).collect();
    match candidates.iter().find(|p| p.is_file()) {
        Some(path) => Ok(path.clone()),
        None => Err(SbieError::ConfigNotFound {
            searched: candidates,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoding::LineEnding;
    use tempfile::TempDir;

    fn write_utf16(path: &Path, text: &str, bom: bool) {
        fs::write(path, encode_utf16le(text, bom)).unwrap();
    }

    fn read_utf16(path: &Path) -> (String, bool) {
        decode_utf16le(&fs::read(path).unwrap()).unwrap()
    }

    fn store_with(text: &str, bom: bool) -> (TempDir, ConfigStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        write_utf16(&path, text, bom);
        (dir, ConfigStore::at(path))
    }

    #[test]
    fn test_locate_prefers_system_dir() {
        let windir = TempDir::new().unwrap();
        let install = TempDir::new().unwrap();
        fs::write(windir.path().join(CONFIG_FILE_NAME), b"").unwrap();
        fs::write(install.path().join(CONFIG_FILE_NAME), b"").unwrap();

        let env = Environment::default().with_windir(windir.path());
        let store = ConfigStore::discover(&env, install.path()).unwrap();
        assert_eq!(store.path(), windir.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_locate_falls_back_to_install_dir() {
        let windir = TempDir::new().unwrap();
        let install = TempDir::new().unwrap();
        fs::write(install.path().join(CONFIG_FILE_NAME), b"").unwrap();

        let env = Environment::default().with_windir(windir.path());
        let store = ConfigStore::discover(&env, install.path()).unwrap();
        assert_eq!(store.path(), install.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_locate_not_found() {
        let dir = TempDir::new().unwrap();
        let env = Environment::default().with_windir(dir.path().join("does_not_exist"));
        let err = ConfigStore::discover(&env, dir.path()).unwrap_err();
        match err {
            SbieError::ConfigNotFound { searched } => assert_eq!(searched.len(), 2),
            other => panic!("expected ConfigNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_read_empty_file() {
        let (_dir, store) = store_with("", false);
        assert!(store.read().unwrap().is_empty());
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::at(dir.path().join(CONFIG_FILE_NAME));
        assert!(matches!(store.read(), Err(SbieError::ConfigIo { .. })));
    }

    #[test]
    fn test_read_bad_encoding_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, b"[foo]").unwrap();
        let err = ConfigStore::at(path).read().unwrap_err();
        assert!(matches!(err, SbieError::ConfigParse { line: None, .. }));
    }

    #[test]
    fn test_read_malformed_is_parse_error_with_line() {
        let (_dir, store) = store_with("[foo]\r\nEnabled=yes\r\nbroken\r\n", false);
        let err = store.read().unwrap_err();
        assert!(matches!(err, SbieError::ConfigParse { line: Some(3), .. }));
    }

    #[test]
    fn test_modify_commits_and_preserves_encoding() {
        let original = "[GlobalSettings]\r\nFileRootPath=C:\\Sandbox\r\n";
        let (_dir, store) = store_with(original, true);

        store
            .modify(|config| -> Result<()> {
                config.insert("foo", [("Enabled", "yes")])?;
                Ok(())
            })
            .unwrap();

        let (text, bom) = read_utf16(store.path());
        assert!(bom);
        assert_eq!(text, format!("{original}\r\n[foo]\r\nEnabled=yes\r\n\r\n"));

        let config = store.read().unwrap();
        assert_eq!(config.format().line_ending, LineEnding::Crlf);
        assert_eq!(config.profile("foo").unwrap().get("Enabled"), Some("yes"));
    }

    #[test]
    fn test_modify_error_leaves_file_untouched() {
        let original = "[sandbox1]\r\nEnabled=yes\r\n";
        let (_dir, store) = store_with(original, false);
        let before = fs::read(store.path()).unwrap();

        let result = store.modify(|config| -> Result<()> {
            config.remove("sandbox1");
            Err(SbieError::validation("abort"))
        });

        assert!(matches!(result, Err(SbieError::Validation(_))));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_modify_returns_closure_value() {
        let (_dir, store) = store_with("[a]\r\n[b]\r\n", false);
        let removed = store
            .modify(|config| -> Result<bool> { Ok(config.remove("a").is_some()) })
            .unwrap();
        assert!(removed);
        let (text, bom) = read_utf16(store.path());
        assert!(!bom);
        assert_eq!(text, "[b]\r\n");
    }

    #[test]
    fn test_modify_with_custom_error_type() {
        #[derive(Debug)]
        enum AppError {
            Sbie(SbieError),
        }
        impl From<SbieError> for AppError {
            fn from(e: SbieError) -> Self {
                AppError::Sbie(e)
            }
        }

        let dir = TempDir::new().unwrap();
        let store = ConfigStore::at(dir.path().join("missing.ini"));
        let result: std::result::Result<(), AppError> = store.modify(|_| Ok(()));
        assert!(matches!(result, Err(AppError::Sbie(SbieError::ConfigIo { .. }))));
    }
}
