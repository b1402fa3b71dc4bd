//! Schema-free command-line decoding.
//!
//! `decode` turns raw tokens into ordered `(flag, value)` pairs with a two-state greedy
//! machine: every token starting with `-` opens a new flag and the tokens that follow it, up
//! to the next flag, become its space-joined value. `LaunchOptions::from_pairs` applies the
//! legacy interpretation of the decoded pairs.

use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgPair {
    pub flag: String,
    pub value: String,
}

impl ArgPair {
    pub fn new(flag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingFlag,
    AwaitingValue,
}

#[derive(Debug)]
pub struct ArgDecoder {
    state: State,
    flag: String,
    value: String,
    pairs: Vec<ArgPair>,
}

impl Default for ArgDecoder {
    fn default() -> Self {
        Self {
            state: State::AwaitingFlag,
            flag: String::new(),
            value: String::new(),
            pairs: Vec::new(),
        }
    }
}

impl ArgDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: &str) {
        if is_flag(token) {
            if self.state == State::AwaitingValue {
                self.emit();
            }
            self.flag = token.to_string();
            self.state = State::AwaitingValue;
            return;
        }

        match self.state {
            State::AwaitingValue => {
                self.value.push_str(token);
                self.value.push(' ');
            }
            State::AwaitingFlag => {
                warn!(token, "ignoring command-line value that does not follow a flag");
            }
        }
    }

    pub fn finish(mut self) -> Vec<ArgPair> {
        if self.state == State::AwaitingValue {
            self.emit();
        }
        self.pairs
    }

    fn emit(&mut self) {
        let flag = std::mem::take(&mut self.flag);
        let value = std::mem::take(&mut self.value).trim().to_string();
        self.pairs.push(ArgPair { flag, value });
        self.state = State::AwaitingFlag;
    }
}

fn is_flag(token: &str) -> bool {
    token.starts_with('-')
}

/// Decodes tokens that exclude the program name.
pub fn decode<I, S>(tokens: I) -> Vec<ArgPair>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut decoder = ArgDecoder::new();
    for token in tokens {
        decoder.push(token.as_ref());
    }
    decoder.finish()
}

/// Command-line values the startup sequence consumes, however they were parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    pub device_port: Option<String>,
    pub plugin_path: Option<String>,
    pub autoconnect: bool,
}

impl LaunchOptions {
    /// Reads decoded pairs the way the old hand-rolled command line did.
    pub fn from_pairs(pairs: &[ArgPair]) -> Self {
        let mut options = Self::default();
        for pair in pairs {
            match pair.flag.as_str() {
                "-d" | "--dev" => options.device_port = non_empty(&pair.value),
                "-p" | "--plugin" => options.plugin_path = non_empty(&pair.value),
                "-a" | "--autoconnect" => options.autoconnect = parse_switch(&pair.value),
                other => debug!(flag = other, "ignoring unrecognised flag"),
            }
        }
        options
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A bare switch enables; the old `-a <true/false>` form may disable it explicitly.
fn parse_switch(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_flag_with_value() {
        assert_eq!(decode(["-d", "COM3"]), vec![ArgPair::new("-d", "COM3")]);
    }

    #[test]
    fn multi_token_value_is_space_joined() {
        assert_eq!(decode(["-d", "COM", "3"]), vec![ArgPair::new("-d", "COM 3")]);
    }

    #[test]
    fn bare_flag_before_another_flag_has_empty_value() {
        assert_eq!(
            decode(["-a", "-d", "COM3"]),
            vec![ArgPair::new("-a", ""), ArgPair::new("-d", "COM3")]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(decode(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn leading_value_is_discarded() {
        assert_eq!(decode(["value", "-d", "x"]), vec![ArgPair::new("-d", "x")]);
    }

    #[test]
    fn trailing_bare_flag_is_emitted() {
        assert_eq!(
            decode(["--plugin", "/opt/ms2.so", "--autoconnect"]),
            vec![
                ArgPair::new("--plugin", "/opt/ms2.so"),
                ArgPair::new("--autoconnect", "")
            ]
        );
    }

    #[test]
    fn repeated_flags_keep_input_order() {
        let pairs = decode(["-d", "a", "-p", "b", "-d", "c"]);
        let flags: Vec<_> = pairs.iter().map(|pair| pair.flag.as_str()).collect();
        assert_eq!(flags, ["-d", "-p", "-d"]);
        assert_eq!(pairs[2].value, "c");
    }

    #[test]
    fn legacy_options_from_pairs() {
        let options = LaunchOptions::from_pairs(&decode([
            "-d",
            "/dev/ttyUSB0",
            "--plugin",
            "libms2.so",
            "-a",
            "--unknown",
            "x",
        ]));

        assert_eq!(
            options,
            LaunchOptions {
                device_port: Some("/dev/ttyUSB0".to_string()),
                plugin_path: Some("libms2.so".to_string()),
                autoconnect: true,
            }
        );
    }

    #[test]
    fn legacy_autoconnect_can_be_disabled() {
        let options = LaunchOptions::from_pairs(&decode(["--autoconnect", "false", "-d"]));
        assert!(!options.autoconnect);
        assert_eq!(options.device_port, None);
    }
}
