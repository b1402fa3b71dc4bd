use tracing::info;

use crate::config::StartupConfig;

/// The application's main window, as far as startup is concerned.
pub trait MainWindow {
    fn set_device(&mut self, port: &str);
    fn set_plugin(&mut self, path: &str);
    fn show(&mut self);
}

/// Hands the configuration to the window: device first, then show, then the plugin.
/// An empty plugin path leaves the choice to the window's plugin chooser.
pub fn launch<W: MainWindow + ?Sized>(config: &StartupConfig, window: &mut W) {
    if let Some(port) = config.device_port() {
        window.set_device(port);
    }
    window.show();
    window.set_plugin(config.plugin_path().unwrap_or_default());
    info!(
        device = config.device_port().unwrap_or("-"),
        plugin = config.plugin_path().unwrap_or("-"),
        autoconnect = config.autoconnect(),
        "main window launched"
    );
}
