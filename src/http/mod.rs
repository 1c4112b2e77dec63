//! HTTP/1.x message model and parser
//!
//! This module provides the message type used for both requests and
//! responses, its wire serialization, and the byte-scanning parser.
//!
//! # Architecture
//!
//! The two directions are independent of each other:
//!
//! - Building: `Message` setters → `Message::serialize` → wire bytes
//! - Parsing: wire bytes → `Parser` state machine → `Message` setters
//!
//! The parser only touches the message through its public mutators, and the
//! serializer only reads the message through its public accessors.
//!
//! # Examples
//!
//! ```
//! use h1wire::http::{Message, Method};
//!
//! let mut request = Message::new();
//! request
//!     .set_method(Method::Get)
//!     .set_path("/")
//!     .set_header("Host", "example.com");
//!
//! let wire = request.serialize();
//! assert!(wire.starts_with(b"GET / HTTP/1.1\r\n"));
//!
//! let parsed = Message::parse(&wire).unwrap();
//! assert_eq!(parsed.method(), Method::Get);
//! assert_eq!(parsed.header("Host").unwrap(), "example.com");
//! ```

pub mod config;
pub mod headers;
pub mod message;
pub mod parser;
pub mod status;

pub use config::{BodyMode, ParserConfig, ParserConfigBuilder};
pub use headers::Headers;
pub use message::{Message, Method};
pub use parser::{parse, Parser};
pub use status::reason_phrase;

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP operation errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Status code token of a response start line is not a valid `u16`
    #[error("Malformed start line: {0}")]
    MalformedStartLine(String),

    /// Requested header was never set
    #[error("Header not found: {0}")]
    KeyNotFound(String),

    /// Request line could not be resolved (strict parsing only)
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// Header line without a name/value separator (strict parsing only)
    #[error("Malformed header line: {0}")]
    MalformedHeaderLine(String),

    /// Buffer ended before the end of the header section (strict parsing only)
    #[error("Incomplete message")]
    Incomplete,

    /// Token or serialized message is not valid UTF-8
    #[error("Message is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Version token assigned to new messages
pub const DEFAULT_VERSION: &str = "HTTP/1.1";

/// CRLF line ending
pub const CRLF: &str = "\r\n";
