//! Reporter configuration and the line-oriented summary printer.
//!
//! Each setting remembers where it came from so explicit settings win over
//! environment variables, which win over defaults.

use std::fmt::Display;
use std::io::{self, Write};

/// Environment variable enabling pretty-printed reports.
pub const PRETTY_ENV: &str = "METAPERSIST_PRETTY";

/// Environment variable enabling debug lines on the printer.
pub const DEBUG_ENV: &str = "METAPERSIST_DEBUG";

// ============================================================================
// Configuration Sources
// ============================================================================

/// Configuration value source (for precedence tracking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    /// Built-in default value.
    Default = 0,
    /// From environment variable.
    EnvVar = 1,
    /// Set by the caller (highest precedence).
    Explicit = 2,
}

/// A configuration value with its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        ConfigValue { value, source }
    }

    /// Merge with another value, preferring higher precedence.
    pub fn merge(self, other: Self) -> Self {
        if other.source >= self.source {
            other
        } else {
            self
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Settings shared by the report writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    /// Pretty-print JSON reports instead of writing them compactly.
    pub pretty: ConfigValue<bool>,
    /// Let the printer emit debug lines.
    pub debug: ConfigValue<bool>,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            pretty: ConfigValue::new(false, ConfigSource::Default),
            debug: ConfigValue::new(false, ConfigSource::Default),
        }
    }
}

impl Configuration {
    /// Defaults overridden by `METAPERSIST_PRETTY` and `METAPERSIST_DEBUG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`Configuration::from_env`] with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Configuration::default();
        if let Some(pretty) = lookup(PRETTY_ENV).as_deref().and_then(parse_flag) {
            config.pretty = config
                .pretty
                .merge(ConfigValue::new(pretty, ConfigSource::EnvVar));
        }
        if let Some(debug) = lookup(DEBUG_ENV).as_deref().and_then(parse_flag) {
            config.debug = config
                .debug
                .merge(ConfigValue::new(debug, ConfigSource::EnvVar));
        }
        config
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = self
            .pretty
            .merge(ConfigValue::new(pretty, ConfigSource::Explicit));
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = self
            .debug
            .merge(ConfigValue::new(debug, ConfigSource::Explicit));
        self
    }

    pub fn pretty(&self) -> bool {
        self.pretty.value
    }

    pub fn debug(&self) -> bool {
        self.debug.value
    }

    /// A printer over `out` honoring the debug setting.
    pub fn printer<W: Write>(&self, out: W) -> Printer<W> {
        Printer::new(out, self.debug())
    }
}

/// Parse a boolean flag value. Unrecognized values yield `None`.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Printer
// ============================================================================

/// Line-oriented text sink for report summaries.
#[derive(Debug)]
pub struct Printer<W> {
    out: W,
    debug: bool,
}

impl Printer<io::Stdout> {
    pub fn stdout(debug: bool) -> Self {
        Printer::new(io::stdout(), debug)
    }
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, debug: bool) -> Self {
        Printer { out, debug }
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Write one line.
    pub fn println(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.out, "{line}")
    }

    /// Write one line when debug output is enabled.
    pub fn debug_println(&mut self, line: impl Display) -> io::Result<()> {
        if self.debug {
            self.println(line)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// ============================================================================
// Tests
// ============================================================================
