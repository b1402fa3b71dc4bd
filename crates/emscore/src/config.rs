use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::args::LaunchOptions;
use crate::paths::AppPaths;

/// Resolved locations and launch options, assembled once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupConfig {
    defaults_dir: PathBuf,
    settings_dir: PathBuf,
    local_home_dir: PathBuf,
    settings_file: PathBuf,
    log_file: PathBuf,
    device_port: Option<String>,
    plugin_path: Option<String>,
    autoconnect: bool,
}

impl StartupConfig {
    /// A plugin given on the command line wins over the one saved in the settings file.
    pub fn assemble(paths: &AppPaths, options: LaunchOptions, saved_plugin: &str) -> Self {
        let device_port = options.device_port.filter(|port| !port.is_empty());
        let plugin_path = options
            .plugin_path
            .filter(|plugin| !plugin.is_empty())
            .or_else(|| (!saved_plugin.is_empty()).then(|| saved_plugin.to_string()));

        Self {
            defaults_dir: paths.defaults_dir().to_path_buf(),
            settings_dir: paths.settings_dir().to_path_buf(),
            local_home_dir: paths.local_home_dir().to_path_buf(),
            settings_file: paths.settings_file(),
            log_file: paths.log_file(),
            device_port,
            plugin_path,
            autoconnect: options.autoconnect,
        }
    }

    pub fn defaults_dir(&self) -> &Path {
        &self.defaults_dir
    }

    pub fn settings_dir(&self) -> &Path {
        &self.settings_dir
    }

    pub fn local_home_dir(&self) -> &Path {
        &self.local_home_dir
    }

    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    pub fn device_port(&self) -> Option<&str> {
        self.device_port.as_deref()
    }

    pub fn plugin_path(&self) -> Option<&str> {
        self.plugin_path.as_deref()
    }

    pub fn autoconnect(&self) -> bool {
        self.autoconnect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{EnvSnapshot, PathResolver, PosixLayout};

    fn paths() -> AppPaths {
        let env = EnvSnapshot {
            home: "/home/tuner".to_string(),
            ..EnvSnapshot::default()
        };
        PathResolver::new(Box::new(PosixLayout::new("/usr")), env).resolve()
    }

    #[test]
    fn copies_resolved_paths() {
        let config = StartupConfig::assemble(&paths(), LaunchOptions::default(), "");

        assert_eq!(config.defaults_dir(), Path::new("/usr/share/emstudio"));
        assert_eq!(config.settings_dir(), Path::new("/home/tuner/.EMStudio"));
        assert_eq!(config.local_home_dir(), Path::new("/home/tuner/EMStudio"));
        assert_eq!(
            config.settings_file(),
            Path::new("/home/tuner/.EMStudio/EMStudio-config.ini")
        );
        assert_eq!(
            config.log_file(),
            Path::new("/home/tuner/EMStudio/applogs/log.txt")
        );
        assert_eq!(config.device_port(), None);
        assert_eq!(config.plugin_path(), None);
        assert!(!config.autoconnect());
    }

    #[test]
    fn saved_plugin_seeds_missing_option() {
        let config = StartupConfig::assemble(&paths(), LaunchOptions::default(), "libms2.so");
        assert_eq!(config.plugin_path(), Some("libms2.so"));
    }

    #[test]
    fn command_line_plugin_overrides_saved_one() {
        let options = LaunchOptions {
            device_port: Some("/dev/ttyUSB0".to_string()),
            plugin_path: Some("libfreeems.so".to_string()),
            autoconnect: true,
        };
        let config = StartupConfig::assemble(&paths(), options, "libms2.so");

        assert_eq!(config.plugin_path(), Some("libfreeems.so"));
        assert_eq!(config.device_port(), Some("/dev/ttyUSB0"));
        assert!(config.autoconnect());
    }

    #[test]
    fn empty_device_is_treated_as_absent() {
        let options = LaunchOptions {
            device_port: Some(String::new()),
            ..LaunchOptions::default()
        };
        let config = StartupConfig::assemble(&paths(), options, "");
        assert_eq!(config.device_port(), None);
    }
}
