//! Startup layer for EMStudio: resolves where settings, profiles and logs live, prepares
//! those directories, decodes the command line, reads the saved plugin choice and hands
//! the resulting `StartupConfig` to the main window.

pub mod args;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod paths;
pub mod settings;
pub mod window;

pub use args::{decode, ArgDecoder, ArgPair, LaunchOptions};
pub use bootstrap::{prepare_directories, DirectoryOutcome, DirectoryReport};
pub use config::StartupConfig;
pub use error::BootstrapError;
pub use paths::{
    AppPaths, EnvSnapshot, OsFamily, PathResolver, PlatformLayout, PosixLayout, WindowsLayout,
};
pub use settings::{read_saved_plugin, saved_plugin_path};
pub use window::{launch, MainWindow};
