//! HTTP message types
//!
//! This module defines the message model shared by requests and responses,
//! and its serialization to wire format.

use super::{parser, status, Error, Headers, Result, CRLF, DEFAULT_VERSION};
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// HTTP methods
///
/// `Method::None` marks a message as a response rather than a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    None,
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Trace,
    Patch,
}

impl Method {
    /// Resolve a method token
    ///
    /// Unrecognized tokens resolve to `Method::None`.
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "CONNECT" => Method::Connect,
            "TRACE" => Method::Trace,
            "PATCH" => Method::Patch,
            _ => Method::None,
        }
    }

    /// Convert method to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::None => "",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Trace => "TRACE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// HTTP message
///
/// A single type covers both roles: the message is a request when its
/// method is set, and a response when the method is `Method::None`. Only the
/// fields of the active role are serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    method: Method,
    path: String,
    version: String,
    status_code: u16,
    status_message: String,
    headers: Headers,
    body: Vec<u8>,
}

impl Message {
    /// Create a new empty message
    pub fn new() -> Self {
        Message {
            method: Method::None,
            path: String::new(),
            version: DEFAULT_VERSION.to_string(),
            status_code: 0,
            status_message: String::new(),
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Create a request with the given method and path
    pub fn request(method: Method, path: impl Into<String>) -> Self {
        let mut message = Message::new();
        message.set_method(method).set_path(path);
        message
    }

    /// Create a response with the given status code
    pub fn response(code: u16) -> Self {
        let mut message = Message::new();
        message.set_status_code(code);
        message
    }

    /// Parse a complete wire buffer into a new message
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let mut message = Message::new();
        parser::parse(&mut message, buf)?;
        Ok(message)
    }

    /// Set the method; `Method::None` marks a response
    pub fn set_method(&mut self, method: Method) -> &mut Self {
        self.method = method;
        self
    }

    /// Get the method
    pub fn method(&self) -> Method {
        self.method
    }

    /// Check if this message is a request
    pub fn is_request(&self) -> bool {
        self.method != Method::None
    }

    /// Check if this message is a response
    pub fn is_response(&self) -> bool {
        self.method == Method::None
    }

    pub fn set_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = path.into();
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Set the version token; it is not validated
    pub fn set_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = version.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_status_code(&mut self, code: u16) -> &mut Self {
        self.status_code = code;
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Set the reason phrase; an empty one falls back to the status table
    pub fn set_status_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.status_message = message.into();
        self
    }

    /// Get the reason phrase
    ///
    /// When none was set, the canonical phrase for the current status code
    /// is looked up on every call.
    pub fn status_message(&self) -> &str {
        if self.status_message.is_empty() {
            status::reason_phrase(self.status_code)
        } else {
            &self.status_message
        }
    }

    /// Set a header, replacing any previous value under the same name
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    /// Merge headers, replacing values on collision
    pub fn set_headers<K, V, I>(&mut self, headers: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.headers.extend(headers);
        self
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Result<&str> {
        self.headers
            .get(name)
            .ok_or_else(|| Error::KeyNotFound(name.to_string()))
    }

    /// Check if a header exists
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    /// Remove a header, returning its value
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.headers.remove(name)
    }

    /// Get the headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Replace the body
    ///
    /// Strings are stored as their raw UTF-8 bytes.
    pub fn set_message_body(&mut self, body: impl Into<Vec<u8>>) -> &mut Self {
        self.body = body.into();
        self
    }

    /// Append bytes to the body
    pub fn extend_body(&mut self, bytes: &[u8]) -> &mut Self {
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn message_body(&self) -> &[u8] {
        &self.body
    }

    /// Body length in bytes
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Convert the message to wire format
    ///
    /// A `Content-Length` line is appended after the stored headers whenever
    /// the body is non-empty, regardless of any `Content-Length` header set
    /// by the caller.
    pub fn serialize(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_size_hint());

        // Start line
        if self.is_response() {
            buf.put_slice(self.version.as_bytes());
            buf.put_u8(b' ');
            buf.put_slice(self.status_code.to_string().as_bytes());
            buf.put_u8(b' ');
            buf.put_slice(self.status_message().as_bytes());
        } else {
            buf.put_slice(self.method.as_str().as_bytes());
            buf.put_u8(b' ');
            buf.put_slice(self.path.as_bytes());
            buf.put_u8(b' ');
            buf.put_slice(self.version.as_bytes());
        }
        buf.put_slice(CRLF.as_bytes());

        // Headers
        for (name, value) in self.headers.iter() {
            buf.put_slice(name.as_bytes());
            buf.put_slice(b": ");
            buf.put_slice(value.as_bytes());
            buf.put_slice(CRLF.as_bytes());
        }

        if !self.body.is_empty() {
            buf.put_slice(b"Content-Length: ");
            buf.put_slice(self.content_length().to_string().as_bytes());
            buf.put_slice(CRLF.as_bytes());
        }

        // Empty line
        buf.put_slice(CRLF.as_bytes());

        // Body
        buf.put_slice(&self.body);

        buf.freeze()
    }

    /// Convert the message to wire format as text
    ///
    /// Fails with `Error::InvalidUtf8` when the body (or any field) is not
    /// valid UTF-8.
    pub fn serialize_to_string(&self) -> Result<String> {
        Ok(String::from_utf8(self.serialize().to_vec())?)
    }

    fn wire_size_hint(&self) -> usize {
        let headers: usize = self
            .headers
            .iter()
            .map(|(n, v)| n.len() + v.len() + 4)
            .sum();
        64 + self.path.len() + self.status_message.len() + headers + self.body.len()
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_method_from_token() {
        assert_eq!(Method::from_token("GET"), Method::Get);
        assert_eq!(Method::from_token("PATCH"), Method::Patch);
        assert_eq!(Method::from_token("OPTIONS"), Method::None);
        assert_eq!(Method::from_token("get"), Method::None);
    }

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Delete.as_str(), "DELETE");
        assert_eq!(Method::Connect.to_string(), "CONNECT");
    }

    #[test]
    fn test_new_message_defaults() {
        let message = Message::new();
        assert_eq!(message.method(), Method::None);
        assert!(message.is_response());
        assert_eq!(message.path(), "");
        assert_eq!(message.version(), "HTTP/1.1");
        assert_eq!(message.status_code(), 0);
        assert!(message.headers().is_empty());
        assert_eq!(message.content_length(), 0);
    }

    #[test]
    fn test_setters_chain() {
        let mut message = Message::new();
        message
            .set_method(Method::Post)
            .set_path("/upload")
            .set_version("HTTP/1.0")
            .set_header("Content-Type", "text/plain")
            .set_message_body("Hello");

        assert!(message.is_request());
        assert_eq!(message.method(), Method::Post);
        assert_eq!(message.path(), "/upload");
        assert_eq!(message.version(), "HTTP/1.0");
        assert_eq!(message.header("Content-Type").unwrap(), "text/plain");
        assert_eq!(message.message_body(), b"Hello");
        assert_eq!(message.content_length(), 5);
    }

    #[test]
    fn test_status_message_fallback() {
        let mut message = Message::response(404);
        assert_eq!(message.status_message(), "Not Found");

        message.set_status_code(999);
        assert_eq!(message.status_message(), "Undefined");

        message.set_status_message("Custom");
        assert_eq!(message.status_message(), "Custom");

        message.set_status_message("");
        message.set_status_code(200);
        assert_eq!(message.status_message(), "OK");
    }

    #[test]
    fn test_header_missing() {
        let message = Message::new();
        match message.header("Host") {
            Err(Error::KeyNotFound(name)) => assert_eq!(name, "Host"),
            other => panic!("expected KeyNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_set_headers_merge() {
        let mut message = Message::new();
        message.set_header("Host", "old.example.com");

        let mut extra = HashMap::new();
        extra.insert("Host".to_string(), "example.com".to_string());
        extra.insert("Accept".to_string(), "*/*".to_string());
        message.set_headers(extra);

        assert_eq!(message.headers().len(), 2);
        assert_eq!(message.header("Host").unwrap(), "example.com");
        assert_eq!(message.header("Accept").unwrap(), "*/*");
    }

    #[test]
    fn test_remove_header() {
        let mut message = Message::new();
        message.set_header("Host", "example.com");

        assert_eq!(message.remove_header("Host"), Some("example.com".to_string()));
        assert!(!message.has_header("Host"));
    }

    #[test]
    fn test_body_replace_and_extend() {
        let mut message = Message::new();
        message.set_message_body(vec![0u8, 1, 2]);
        message.set_message_body(&b"\xff\xfe"[..]);
        assert_eq!(message.message_body(), b"\xff\xfe");

        message.extend_body(b"ab");
        assert_eq!(message.message_body(), b"\xff\xfeab");
    }

    #[test]
    fn test_request_serialize() {
        let mut message = Message::request(Method::Get, "/");
        message.set_header("Host", "example.com");

        assert_eq!(
            message.serialize_to_string().unwrap(),
            "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n"
        );
    }

    #[test]
    fn test_response_serialize_with_body() {
        let mut message = Message::response(200);
        message
            .set_header("Content-Type", "text/plain")
            .set_message_body("Hello world!");

        assert_eq!(
            message.serialize_to_string().unwrap(),
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 12\r\n\r\nHello world!"
        );
    }

    #[test]
    fn test_serialize_duplicates_user_content_length() {
        let mut message = Message::response(200);
        message
            .set_header("Content-Length", "99")
            .set_message_body("abc");

        let wire = message.serialize_to_string().unwrap();
        assert!(wire.contains("Content-Length: 99\r\n"));
        assert!(wire.contains("Content-Length: 3\r\n"));
    }

    #[test]
    fn test_serialize_only_active_role() {
        let mut message = Message::new();
        message.set_path("/ignored").set_status_code(204);

        assert_eq!(
            message.serialize_to_string().unwrap(),
            "HTTP/1.1 204 No Content\r\n\r\n"
        );

        message.set_method(Method::Delete);
        assert_eq!(
            message.serialize_to_string().unwrap(),
            "DELETE /ignored HTTP/1.1\r\n\r\n"
        );
    }

    #[test]
    fn test_serialize_empty_message() {
        let message = Message::new();
        assert_eq!(&message.serialize()[..], b"HTTP/1.1 0 Undefined\r\n\r\n");
    }

    #[test]
    fn test_serialize_binary_body() {
        let mut message = Message::response(200);
        message.set_message_body(vec![0xde, 0xad, 0xbe, 0xef]);

        let wire = message.serialize();
        assert!(wire.ends_with(b"\r\n\r\n\xde\xad\xbe\xef"));
        assert!(message.serialize_to_string().is_err());
    }
}
