use clap::{Parser, Subcommand};
use emscore::LaunchOptions;

#[derive(Parser, Debug)]
#[command(name = "emstudio", author, version, about = "EMStudio ECU tuning front end")]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Serial device to open, connecting to the ECU on it.
    #[arg(short = 'd', long = "dev", value_name = "file", env = "EMSTUDIO_DEVICE")]
    pub device: Option<String>,

    /// Plugin to load instead of the one saved in the settings file.
    #[arg(short = 'p', long, value_name = "file", env = "EMSTUDIO_PLUGIN")]
    pub plugin: Option<String>,

    /// Connect to the device as soon as the main window is up.
    #[arg(short = 'a', long)]
    pub autoconnect: bool,
}

impl RunArgs {
    pub fn into_launch_options(self) -> LaunchOptions {
        LaunchOptions {
            device_port: self.device.filter(|port| !port.trim().is_empty()),
            plugin_path: self.plugin.filter(|plugin| !plugin.trim().is_empty()),
            autoconnect: self.autoconnect,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved settings, defaults, home and log locations.
    Where {
        /// Emit the startup configuration as JSON.
        #[arg(long)]
        json: bool,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
