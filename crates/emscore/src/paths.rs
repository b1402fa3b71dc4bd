//! Resolves EMStudio's settings, defaults, home and log locations from a snapshot of the
//! process environment, with the POSIX or Windows naming picked once at startup instead of
//! being compiled in, so both layouts can be resolved (and tested) on any host.
//!
//! Types:
//!
//! - `EnvSnapshot` captures `HOME`, `UserProfile` and `AppData` as plain strings.
//! - `OsFamily` names the platform family; `PosixLayout` and `WindowsLayout` implement
//!   `PlatformLayout` for it.
//! - `AppPaths` holds the resolved layout and derives file and subdirectory locations.
//!
//! Functions:
//!
//! - `PathResolver::discover` snapshots the live environment for the running platform.
//! - `PathResolver::resolve` derives `AppPaths` without touching the filesystem.

use std::env;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "EMStudio";
pub const SETTINGS_FILE_NAME: &str = "EMStudio-config.ini";

/// Install prefix baked in at build time (`EMSTUDIO_INSTALL_PREFIX`).
pub const INSTALL_PREFIX: &str = match option_env!("EMSTUDIO_INSTALL_PREFIX") {
    Some(prefix) => prefix,
    None => "/usr/local",
};

pub const ENV_HOME: &str = "HOME";
pub const ENV_USER_PROFILE: &str = "UserProfile";
pub const ENV_APP_DATA: &str = "AppData";

const POSIX_SETTINGS_FOLDER: &str = ".EMStudio";
const SHARE_FOLDER: &str = "emstudio";
const APP_LOGS_FOLDER: &str = "applogs";
const PROFILES_FOLDER: &str = "profiles";
const LOGS_FOLDER: &str = "logs";
const LOG_FILE_NAME: &str = "log.txt";

/// The environment variables the resolver reads. Unset variables are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    pub home: String,
    pub user_profile: String,
    pub app_data: String,
}

impl EnvSnapshot {
    pub fn capture() -> Self {
        Self {
            home: env_value(ENV_HOME),
            user_profile: env_value(ENV_USER_PROFILE),
            app_data: env_value(ENV_APP_DATA),
        }
    }
}

fn env_value(name: &str) -> String {
    env::var_os(name)
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Posix,
    Windows,
}

impl OsFamily {
    pub fn detect() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Posix => "posix",
            Self::Windows => "windows",
        }
    }
}

/// Per-family naming rules consumed by `PathResolver`.
pub trait PlatformLayout {
    fn family(&self) -> OsFamily;

    /// Root every other location hangs off. Empty when the environment provides nothing.
    fn base_dir(&self, env: &EnvSnapshot) -> PathBuf;

    /// Folder name of the settings directory under the base directory.
    fn settings_folder(&self) -> &'static str;

    fn defaults_dir(&self) -> PathBuf;

    fn local_home_dir(&self, env: &EnvSnapshot, base: &Path) -> PathBuf;
}

#[derive(Debug, Clone)]
pub struct PosixLayout {
    install_prefix: PathBuf,
}

impl PosixLayout {
    pub fn new(install_prefix: impl Into<PathBuf>) -> Self {
        Self {
            install_prefix: install_prefix.into(),
        }
    }
}

impl Default for PosixLayout {
    fn default() -> Self {
        Self::new(INSTALL_PREFIX)
    }
}

impl PlatformLayout for PosixLayout {
    fn family(&self) -> OsFamily {
        OsFamily::Posix
    }

    fn base_dir(&self, env: &EnvSnapshot) -> PathBuf {
        PathBuf::from(&env.home)
    }

    fn settings_folder(&self) -> &'static str {
        POSIX_SETTINGS_FOLDER
    }

    fn defaults_dir(&self) -> PathBuf {
        self.install_prefix.join("share").join(SHARE_FOLDER)
    }

    fn local_home_dir(&self, _: &EnvSnapshot, base: &Path) -> PathBuf {
        base.join(APP_NAME)
    }
}

#[derive(Debug, Clone)]
pub struct WindowsLayout {
    executable_dir: PathBuf,
}

impl WindowsLayout {
    pub fn new(executable_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable_dir: executable_dir.into(),
        }
    }

    /// Uses the directory holding the running executable as the defaults directory.
    pub fn from_current_exe() -> Self {
        let executable_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        Self::new(executable_dir)
    }
}

impl PlatformLayout for WindowsLayout {
    fn family(&self) -> OsFamily {
        OsFamily::Windows
    }

    fn base_dir(&self, env: &EnvSnapshot) -> PathBuf {
        let root = if env.app_data.is_empty() {
            &env.user_profile
        } else {
            &env.app_data
        };
        PathBuf::from(normalise_separators(root))
    }

    fn settings_folder(&self) -> &'static str {
        APP_NAME
    }

    fn defaults_dir(&self) -> PathBuf {
        self.executable_dir.clone()
    }

    fn local_home_dir(&self, env: &EnvSnapshot, _: &Path) -> PathBuf {
        PathBuf::from(normalise_separators(&env.user_profile)).join(APP_NAME)
    }
}

fn normalise_separators(value: &str) -> String {
    value.replace('\\', "/")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    family: OsFamily,
    base_dir: PathBuf,
    defaults_dir: PathBuf,
    settings_dir: PathBuf,
    app_home_dir: PathBuf,
    local_home_dir: PathBuf,
}

impl AppPaths {
    pub fn family(&self) -> OsFamily {
        self.family
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// False when neither the primary nor the fallback variable was set.
    pub fn has_base_dir(&self) -> bool {
        !self.base_dir.as_os_str().is_empty()
    }

    pub fn defaults_dir(&self) -> &Path {
        &self.defaults_dir
    }

    pub fn settings_dir(&self) -> &Path {
        &self.settings_dir
    }

    /// `<base>/EMStudio` on both families; parent of `applogs` and `profiles`.
    pub fn app_home_dir(&self) -> &Path {
        &self.app_home_dir
    }

    pub fn local_home_dir(&self) -> &Path {
        &self.local_home_dir
    }

    pub fn settings_file(&self) -> PathBuf {
        self.settings_dir.join(SETTINGS_FILE_NAME)
    }

    pub fn app_logs_dir(&self) -> PathBuf {
        self.app_home_dir.join(APP_LOGS_FOLDER)
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.app_home_dir.join(PROFILES_FOLDER)
    }

    pub fn local_logs_dir(&self) -> PathBuf {
        self.local_home_dir.join(LOGS_FOLDER)
    }

    pub fn log_file(&self) -> PathBuf {
        self.app_logs_dir().join(LOG_FILE_NAME)
    }

    /// Directories bootstrap must ensure, in creation order, without duplicates.
    /// On Windows the settings directory and the app home coincide.
    pub fn required_directories(&self) -> Vec<PathBuf> {
        let candidates = [
            self.settings_dir.clone(),
            self.app_home_dir.clone(),
            self.app_logs_dir(),
            self.profiles_dir(),
            self.local_logs_dir(),
        ];
        let mut directories: Vec<PathBuf> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !directories.contains(&candidate) {
                directories.push(candidate);
            }
        }
        directories
    }
}

pub struct PathResolver {
    layout: Box<dyn PlatformLayout>,
    env: EnvSnapshot,
}

impl PathResolver {
    pub fn new(layout: Box<dyn PlatformLayout>, env: EnvSnapshot) -> Self {
        Self { layout, env }
    }

    pub fn for_family(family: OsFamily, env: EnvSnapshot) -> Self {
        let layout: Box<dyn PlatformLayout> = match family {
            OsFamily::Posix => Box::new(PosixLayout::default()),
            OsFamily::Windows => Box::new(WindowsLayout::from_current_exe()),
        };
        Self::new(layout, env)
    }

    pub fn discover() -> Self {
        Self::for_family(OsFamily::detect(), EnvSnapshot::capture())
    }

    pub fn resolve(&self) -> AppPaths {
        let base_dir = self.layout.base_dir(&self.env);
        let settings_dir = base_dir.join(self.layout.settings_folder());
        let app_home_dir = base_dir.join(APP_NAME);
        let local_home_dir = self.layout.local_home_dir(&self.env, &base_dir);

        AppPaths {
            family: self.layout.family(),
            defaults_dir: self.layout.defaults_dir(),
            base_dir,
            settings_dir,
            app_home_dir,
            local_home_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    struct EnvGuard {
        key: &'static str,
        previous: Option<OsString>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }

        fn clear(key: &'static str) -> Self {
            let previous = env::var_os(key);
            env::remove_var(key);
            Self { key, previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = self.previous.take() {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn posix(home: &str) -> AppPaths {
        let env = EnvSnapshot {
            home: home.to_string(),
            ..EnvSnapshot::default()
        };
        PathResolver::new(Box::new(PosixLayout::new("/opt/ems")), env).resolve()
    }

    fn windows(env: EnvSnapshot) -> AppPaths {
        PathResolver::new(Box::new(WindowsLayout::new("C:/Program Files/EMStudio")), env)
            .resolve()
    }

    #[test]
    fn posix_layout_hangs_off_home() {
        let paths = posix("/home/tuner");

        assert_eq!(paths.family(), OsFamily::Posix);
        assert_eq!(paths.defaults_dir(), Path::new("/opt/ems/share/emstudio"));
        assert_eq!(paths.settings_dir(), Path::new("/home/tuner/.EMStudio"));
        assert_eq!(paths.local_home_dir(), Path::new("/home/tuner/EMStudio"));
        assert_eq!(
            paths.settings_file(),
            Path::new("/home/tuner/.EMStudio/EMStudio-config.ini")
        );
        assert_eq!(
            paths.log_file(),
            Path::new("/home/tuner/EMStudio/applogs/log.txt")
        );
        assert_eq!(paths.required_directories().len(), 5);
    }

    #[test]
    fn windows_prefers_app_data() {
        let paths = windows(EnvSnapshot {
            home: String::new(),
            user_profile: "C:\\Users\\tuner".to_string(),
            app_data: "C:\\Users\\tuner\\AppData\\Roaming".to_string(),
        });

        assert_eq!(paths.family(), OsFamily::Windows);
        assert_eq!(paths.base_dir(), Path::new("C:/Users/tuner/AppData/Roaming"));
        assert_eq!(
            paths.settings_dir(),
            Path::new("C:/Users/tuner/AppData/Roaming/EMStudio")
        );
        assert_eq!(paths.local_home_dir(), Path::new("C:/Users/tuner/EMStudio"));
        assert_eq!(paths.defaults_dir(), Path::new("C:/Program Files/EMStudio"));
        assert_eq!(
            paths.log_file(),
            Path::new("C:/Users/tuner/AppData/Roaming/EMStudio/applogs/log.txt")
        );
        // settings dir and app home are the same folder on Windows
        assert_eq!(paths.required_directories().len(), 4);
    }

    #[test]
    fn windows_falls_back_to_user_profile() {
        let paths = windows(EnvSnapshot {
            home: "/ignored".to_string(),
            user_profile: "D:\\Profiles\\tuner".to_string(),
            app_data: String::new(),
        });

        assert_eq!(paths.base_dir(), Path::new("D:/Profiles/tuner"));
        assert_eq!(paths.settings_dir(), Path::new("D:/Profiles/tuner/EMStudio"));
    }

    #[test]
    fn settings_file_always_lives_in_settings_dir() {
        for paths in [
            posix("/home/a"),
            posix("/srv/ems/"),
            windows(EnvSnapshot {
                app_data: "E:\\data".to_string(),
                ..EnvSnapshot::default()
            }),
        ] {
            let settings_file = paths.settings_file();
            assert_eq!(settings_file.parent(), Some(paths.settings_dir()));
            assert_eq!(
                settings_file.file_name().and_then(|name| name.to_str()),
                Some(SETTINGS_FILE_NAME)
            );
        }
    }

    #[test]
    fn empty_home_yields_relative_layout() {
        let paths = posix("");

        assert!(!paths.has_base_dir());
        assert_eq!(paths.settings_dir(), Path::new(".EMStudio"));
        assert!(paths.settings_file().is_relative());
    }

    #[test]
    fn resolving_twice_is_stable() {
        let env = EnvSnapshot {
            home: "/home/tuner".to_string(),
            ..EnvSnapshot::default()
        };
        let resolver = PathResolver::new(Box::new(PosixLayout::default()), env);
        assert_eq!(resolver.resolve(), resolver.resolve());
    }

    #[test]
    fn capture_reads_process_environment() {
        let _guard = env_lock().lock().unwrap();
        let _home = EnvGuard::set(ENV_HOME, "/tmp/emstudio-home");
        let _profile = EnvGuard::clear(ENV_USER_PROFILE);
        let _app_data = EnvGuard::clear(ENV_APP_DATA);

        let snapshot = EnvSnapshot::capture();

        assert_eq!(snapshot.home, "/tmp/emstudio-home");
        assert!(snapshot.user_profile.is_empty());
        assert!(snapshot.app_data.is_empty());
    }
}
