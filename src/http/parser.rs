//! HTTP message parsing
//!
//! This module provides a single-pass state machine that reconstructs a
//! `Message` from a buffer holding exactly one complete HTTP/1.x message.
//!
//! The scan runs byte by byte. Line framing is trusted: whenever a CR ends a
//! token, the byte after it is skipped without inspection. The byte after the
//! `:` of a header name is skipped the same way.
//!
//! Once the blank line ending the header section is reached, the scan stops
//! and the rest of the buffer becomes the body. `Content-Length` is not
//! consulted.
//!
//! In lenient mode (the default) structural malformations other than a bad
//! status code leave the message partially populated without an error, and
//! invalid UTF-8 in tokens is replaced. Strict mode (see
//! `ParserConfigBuilder::strict`) checks the skipped bytes, the request line
//! token count and token encoding, and reports failures as errors.

use super::{BodyMode, Error, Message, Method, ParserConfig, Result};
use crate::log::{debug, trace, warning};

/// Version tokens that mark a start line as a status line
const RESPONSE_VERSIONS: [&str; 2] = ["HTTP/1.0", "HTTP/1.1"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    /// First token, before the role is known
    StartLine,
    /// After the method: path, then version
    RequestLine { path_seen: bool },
    /// After the version: status code, then reason phrase
    StatusLine { code_seen: bool },
    HeaderKey,
    HeaderValue,
    Body,
}

/// HTTP message parser
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a parser with the default (lenient) configuration
    pub fn new() -> Self {
        Parser {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with the given configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Parser { config }
    }

    /// Parse one complete message from `buf` into `message`
    ///
    /// The message is updated through its setters as tokens complete, so on
    /// error it holds whatever was parsed before the failure. The body is
    /// appended to any body the message already has.
    ///
    /// Returns `Error::MalformedStartLine` if a status code is not a valid
    /// `u16`. In strict mode, also returns `Error::MalformedRequestLine`,
    /// `Error::MalformedHeaderLine`, `Error::InvalidUtf8` or
    /// `Error::Incomplete`.
    pub fn parse(&self, message: &mut Message, buf: &[u8]) -> Result<()> {
        let strict = self.config.is_strict();
        let mut state = ParserState::StartLine;
        let mut token: Vec<u8> = Vec::new();
        let mut header_name = String::new();
        let mut body_start = None;

        let mut i = 0;
        while i < buf.len() {
            let byte = buf[i];

            match (state, byte) {
                (ParserState::StartLine, b' ') => {
                    let first = self.take_token(&mut token)?;
                    if RESPONSE_VERSIONS.contains(&first.as_str()) {
                        debug!("status line, version {}", first);
                        message.set_method(Method::None).set_version(first);
                        state = ParserState::StatusLine { code_seen: false };
                    } else {
                        let method = Method::from_token(&first);
                        if method == Method::None {
                            if strict {
                                return Err(Error::MalformedRequestLine(format!(
                                    "Unknown method: {}",
                                    first
                                )));
                            }
                            warning!("unknown method token {:?}, treating as no method", first);
                        }
                        debug!("request line, method {:?}", method);
                        message.set_method(method);
                        state = ParserState::RequestLine { path_seen: false };
                    }
                }

                (ParserState::RequestLine { path_seen }, b' ') => {
                    let path = self.take_token(&mut token)?;
                    if strict && path_seen {
                        return Err(Error::MalformedRequestLine(format!(
                            "Too many tokens, extra: {}",
                            path
                        )));
                    }
                    message.set_path(path);
                    state = ParserState::RequestLine { path_seen: true };
                }

                (ParserState::RequestLine { path_seen }, b'\r') => {
                    let version = self.take_token(&mut token)?;
                    if strict && !path_seen {
                        return Err(Error::MalformedRequestLine(format!(
                            "Missing path or version: {}",
                            version
                        )));
                    }
                    self.expect_next(buf, i, b'\n', || {
                        Error::MalformedRequestLine("Request line not ended by CRLF".to_string())
                    })?;
                    message.set_version(version);
                    state = ParserState::HeaderKey;
                    i += 1;
                }

                (ParserState::StatusLine { code_seen: false }, b' ') => {
                    message.set_status_code(parse_status_code(&self.take_token(&mut token)?)?);
                    state = ParserState::StatusLine { code_seen: true };
                }

                (ParserState::StatusLine { code_seen }, b'\r') => {
                    let last = self.take_token(&mut token)?;
                    if code_seen {
                        message.set_status_message(last);
                    } else {
                        // Status line without a reason phrase
                        message.set_status_code(parse_status_code(&last)?);
                    }
                    self.expect_next(buf, i, b'\n', || {
                        Error::MalformedStartLine("Status line not ended by CRLF".to_string())
                    })?;
                    state = ParserState::HeaderKey;
                    i += 1;
                }

                (ParserState::HeaderKey, b':') => {
                    header_name = self.take_token(&mut token)?;
                    self.expect_next(buf, i, b' ', || {
                        Error::MalformedHeaderLine(format!("No space after colon: {}", header_name))
                    })?;
                    state = ParserState::HeaderValue;
                    i += 1;
                }

                (ParserState::HeaderKey, b'\r') => {
                    if !token.is_empty() {
                        let line = self.take_token(&mut token)?;
                        if strict {
                            return Err(Error::MalformedHeaderLine(format!(
                                "No colon in header: {}",
                                line
                            )));
                        }
                        warning!("header line without colon {:?} ends the header section", line);
                    }
                    self.expect_next(buf, i, b'\n', || {
                        Error::MalformedHeaderLine("Header section not ended by CRLF".to_string())
                    })?;
                    state = ParserState::Body;
                    body_start = Some(i + 2);
                    break;
                }

                (ParserState::HeaderValue, b'\r') => {
                    let value = self.take_token(&mut token)?;
                    self.expect_next(buf, i, b'\n', || {
                        Error::MalformedHeaderLine(format!("Header not ended by CRLF: {}", header_name))
                    })?;
                    trace!("header {}: {}", header_name, value);
                    message.set_header(std::mem::take(&mut header_name), value);
                    state = ParserState::HeaderKey;
                    i += 1;
                }

                _ => token.push(byte),
            }

            i += 1;
        }

        match body_start {
            Some(start) => {
                let body = match self.config.body_mode() {
                    BodyMode::FromBodyStart => &buf[start.min(buf.len())..],
                    BodyMode::WholeBuffer => buf,
                };
                debug!("captured {} body bytes", body.len());
                message.extend_body(body);
                Ok(())
            }
            None => self.unterminated(state, token, header_name),
        }
    }

    /// Handle a buffer that ended before the header section was closed
    fn unterminated(&self, state: ParserState, token: Vec<u8>, header_name: String) -> Result<()> {
        warning!("message ended in state {:?}, result is incomplete", state);

        if !self.config.is_strict() {
            return Ok(());
        }

        let token = String::from_utf8_lossy(&token).into_owned();
        Err(match state {
            ParserState::StartLine | ParserState::RequestLine { .. } => {
                Error::MalformedRequestLine(format!("Unterminated request line: {}", token))
            }
            ParserState::StatusLine { .. } => {
                Error::MalformedStartLine(format!("Unterminated status line: {}", token))
            }
            ParserState::HeaderValue => {
                Error::MalformedHeaderLine(format!("Unterminated header: {}", header_name))
            }
            ParserState::HeaderKey if !token.is_empty() => {
                Error::MalformedHeaderLine(format!("No colon in header: {}", token))
            }
            ParserState::HeaderKey | ParserState::Body => Error::Incomplete,
        })
    }

    /// Flush the accumulated token as a string
    ///
    /// Invalid UTF-8 is an error in strict mode and is replaced with
    /// U+FFFD otherwise.
    fn take_token(&self, token: &mut Vec<u8>) -> Result<String> {
        match String::from_utf8(std::mem::take(token)) {
            Ok(s) => Ok(s),
            Err(err) if self.config.is_strict() => Err(err.into()),
            Err(err) => {
                let s = String::from_utf8_lossy(err.as_bytes()).into_owned();
                warning!("token {:?} is not valid UTF-8, invalid bytes replaced", s);
                Ok(s)
            }
        }
    }

    /// In strict mode, require `expected` right after position `i`
    ///
    /// Lenient parsing skips that byte without looking at it.
    fn expect_next(
        &self,
        buf: &[u8],
        i: usize,
        expected: u8,
        err: impl FnOnce() -> Error,
    ) -> Result<()> {
        if self.config.is_strict() && buf.get(i + 1) != Some(&expected) {
            return Err(err());
        }
        Ok(())
    }
}

/// Parse one complete message from `buf` into `message` with the default parser
pub fn parse(message: &mut Message, buf: &[u8]) -> Result<()> {
    Parser::new().parse(message, buf)
}

fn parse_status_code(token: &str) -> Result<u16> {
    token
        .parse::<u16>()
        .map_err(|_| Error::MalformedStartLine(format!("Invalid status code: {}", token)))
}
