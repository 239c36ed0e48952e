use std::path::PathBuf;

/// Sandbox used when a request names none.
pub const DEFAULT_BOX: &str = "DefaultBox";

/// Installation directory used when neither an override nor the environment
/// provides one.
pub const DEFAULT_INSTALL_DIR: &str = r"C:\Program Files\Sandboxie";

/// File name of the engine's sandbox-profile configuration.
pub const CONFIG_FILE_NAME: &str = "Sandboxie.ini";

/// File name of the launcher executable inside the installation directory.
pub const LAUNCHER_FILE_NAME: &str = "Start.exe";

pub const ENV_INSTALL_DIR: &str = "SANDBOXIE_INSTALL_DIR";
pub const ENV_WINDIR: &str = "WinDir";
pub const ENV_SYSTEM_ROOT: &str = "SystemRoot";

/// Overrides the location of the CLI settings file (used in tests).
pub const ENV_SETTINGS_PATH: &str = "SBIECTL_CONFIG_PATH";

pub fn default_box() -> String {
    DEFAULT_BOX.to_string()
}

pub fn get_default_settings_dir() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "sbiectl") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".sbiectl")
    }
}

pub fn get_settings_file_path() -> PathBuf {
    if let Ok(settings_path) = std::env::var(ENV_SETTINGS_PATH) {
        return PathBuf::from(settings_path);
    }

    get_default_settings_dir().join("settings.json")
}
