use std::io::Write;

use emscore::MainWindow;

/// Text stand-in for the main window: reports what it was asked to do.
pub struct ConsoleWindow<W: Write> {
    out: W,
}

impl<W: Write> ConsoleWindow<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %err, "failed to write console output");
        }
    }
}

impl<W: Write> MainWindow for ConsoleWindow<W> {
    fn set_device(&mut self, port: &str) {
        self.line(&format!("device: {port}"));
    }

    fn set_plugin(&mut self, path: &str) {
        if path.is_empty() {
            self.line("plugin: (none saved, choose one in the plugin manager)");
        } else {
            self.line(&format!("plugin: {path}"));
        }
    }

    fn show(&mut self) {
        self.line(concat!("EMStudio ", env!("CARGO_PKG_VERSION")));
    }
}
