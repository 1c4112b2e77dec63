//! Parser configuration
//!
//! This module provides the configuration builder for the message parser.

/// Which bytes of the input end up in the parsed body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyMode {
    /// Bytes from the end of the header section to the end of the buffer
    #[default]
    FromBodyStart,
    /// The entire input buffer, start line and headers included
    WholeBuffer,
}

/// Parser configuration (immutable after building)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserConfig {
    strict: bool,
    body_mode: BodyMode,
}

impl ParserConfig {
    /// Create a new configuration builder
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::new()
    }

    /// Whether structural malformations are reported as errors
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Get the body capture mode
    pub fn body_mode(&self) -> BodyMode {
        self.body_mode
    }
}

/// Builder for parser configuration
#[derive(Debug, Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    /// Create a new builder with lenient defaults
    pub fn new() -> Self {
        ParserConfigBuilder {
            config: ParserConfig::default(),
        }
    }

    /// Report malformed request lines, header lines and truncated input
    ///
    /// When disabled, such input leaves the message partially populated
    /// without an error. A bad status code is always an error.
    pub fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// Set the body capture mode
    pub fn body_mode(mut self, mode: BodyMode) -> Self {
        self.config.body_mode = mode;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ParserConfig {
        self.config
    }
}
