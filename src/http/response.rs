//! HTTP response handling

use crate::http::error::HttpError;

use serde::Serialize;
use std::io::Write;

/// Represents an HTTP response that can be sent to a client
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// Status code, e.g. 200 or 404
    pub status: u16,
    /// Value of the Content-Type header
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new HTTP response
    pub fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// Create a 200 response with a JSON body
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HttpError> {
        let mut body = serde_json::to_vec(value)?;
        body.push(b'\n');
        Ok(Self::new(200, "application/json", body))
    }

    /// Create a plain-text error response
    pub fn error(status: u16, message: &str) -> Self {
        Self::new(status, "text/plain; charset=utf-8", format!("{message}\n"))
    }

    /// Create a 404 response
    pub fn not_found() -> Self {
        Self::error(404, "404 page not found")
    }

    /// Create a 405 response
    pub fn method_not_allowed() -> Self {
        Self::error(405, "Method not allowed")
    }

    /// Write the status line, headers and body
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), HttpError> {
        write!(
            writer,
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len()
        )?;
        writer.write_all(&self.body)?;
        writer.flush()?;
        Ok(())
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "",
    }
}
