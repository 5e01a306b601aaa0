//! Reading HTTP requests

use crate::http::error::HttpError;

use std::io::{self, BufRead, Read};

/// Longest request line or header line accepted
const MAX_LINE_LENGTH: usize = 8 * 1024;

/// The parts of a request the query API routes on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method, e.g. `GET`
    pub method: String,
    /// Request path without the query string
    pub path: String,
}

impl HttpRequest {
    /// Read one request from `reader`.
    ///
    /// Headers other than `Content-Length` are skipped, and any request body
    /// is read and thrown away so the connection can be closed cleanly.
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Self, HttpError> {
        let request_line = read_line(reader)?;
        let mut parts = request_line.split_whitespace();
        let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(HttpError::MalformedRequest(format!(
                "bad request line: {request_line:?}"
            )));
        };
        if !version.starts_with("HTTP/") || parts.next().is_some() {
            return Err(HttpError::MalformedRequest(format!(
                "bad request line: {request_line:?}"
            )));
        }

        let path = target.split_once('?').map_or(target, |(path, _)| path);
        let request = Self {
            method: method.to_owned(),
            path: path.to_owned(),
        };

        let mut content_length = 0u64;
        loop {
            let header = read_line(reader)?;
            if header.is_empty() {
                break;
            }
            let Some((name, value)) = header.split_once(':') else {
                return Err(HttpError::MalformedRequest(format!("bad header: {header:?}")));
            };
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().map_err(|_| {
                    HttpError::MalformedRequest(format!("bad content length: {value:?}"))
                })?;
            }
        }

        io::copy(&mut reader.take(content_length), &mut io::sink())?;
        Ok(request)
    }
}

fn read_line<R: BufRead>(reader: &mut R) -> Result<String, HttpError> {
    let mut buffer = Vec::new();
    let read = reader
        .take(MAX_LINE_LENGTH as u64)
        .read_until(b'\n', &mut buffer)?;
    if read == 0 {
        return Err(HttpError::MalformedRequest(
            "connection closed before request ended".to_owned(),
        ));
    }
    if buffer.last() != Some(&b'\n') {
        return Err(HttpError::MalformedRequest("line too long".to_owned()));
    }

    let line = String::from_utf8(buffer)
        .map_err(|_| HttpError::MalformedRequest("non UTF-8 request".to_owned()))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}
