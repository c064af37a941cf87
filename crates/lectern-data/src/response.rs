//! HTTP response handling.

use crate::FetchError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Get the raw response body.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Take the body.
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// Get a header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        // Case-insensitive header lookup
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// File name announced by `Content-Disposition`, if any.
    ///
    /// Only the last path component is kept, so the result is always a bare
    /// file name. Empty and dot-prefixed names are rejected.
    pub fn filename(&self) -> Option<String> {
        let disposition = self.header("Content-Disposition")?;
        let raw = disposition.split(';').map(str::trim).find_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("filename")
                .then(|| value.trim().trim_matches('"'))
        })?;
        let name = raw.rsplit(|c: char| c == '/' || c == '\\').next()?.trim();
        (!name.is_empty() && !name.starts_with('.')).then(|| name.to_string())
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::from_status(self.status, &self.body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, body: &[u8]) -> Response {
        Response::new(status, HashMap::new(), body.to_vec())
    }

    fn make_response_with_headers(
        status: u16,
        headers: Vec<(&str, &str)>,
        body: &[u8],
    ) -> Response {
        let headers: HashMap<String, String> = headers
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Response::new(status, headers, body.to_vec())
    }

    #[test]
    fn test_response_is_success() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(204, b"").is_success());
        assert!(!make_response(199, b"").is_success());
        assert!(!make_response(401, b"").is_success());
    }

    #[test]
    fn test_response_json() {
        use serde::Deserialize;

        #[derive(Deserialize, Debug, PartialEq)]
        struct Created {
            order_id: i64,
        }

        let resp = make_response(201, br#"{"order_id": 42}"#);
        let data: Created = resp.json().unwrap();
        assert_eq!(data, Created { order_id: 42 });
        assert!(make_response(200, b"not json").json::<Created>().is_err());
    }

    #[test]
    fn test_response_text_invalid_utf8() {
        let resp = make_response(200, &[0xff, 0xfe]);
        assert!(resp.text().is_err());
    }

    #[test]
    fn test_response_header_case_insensitive() {
        let resp = make_response_with_headers(200, vec![("content-type", "text/csv")], b"");
        assert_eq!(resp.content_type(), Some("text/csv"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("text/csv"));
        assert_eq!(resp.header("X-Missing"), None);
    }

    #[test]
    fn test_filename_from_disposition() {
        let resp = make_response_with_headers(
            200,
            vec![("Content-Disposition", "attachment; filename=\"report.docx\"")],
            b"",
        );
        assert_eq!(resp.filename().as_deref(), Some("report.docx"));

        let bare = make_response_with_headers(
            200,
            vec![("content-disposition", "attachment; filename=orders.docx")],
            b"",
        );
        assert_eq!(bare.filename().as_deref(), Some("orders.docx"));

        assert_eq!(make_response(200, b"").filename(), None);
    }

    #[test]
    fn test_filename_drops_directories() {
        let with_dir = |value: &str| {
            make_response_with_headers(200, vec![("Content-Disposition", value)], b"").filename()
        };

        assert_eq!(
            with_dir("attachment; filename=\"/srv/tables/report-1f2e-2026-10-18T10:00:00.docx\"")
                .as_deref(),
            Some("report-1f2e-2026-10-18T10:00:00.docx")
        );
        assert_eq!(
            with_dir("attachment; filename=tables/report.docx").as_deref(),
            Some("report.docx")
        );
        assert_eq!(
            with_dir("attachment; filename=\"..\\..\\boot.ini\"").as_deref(),
            Some("boot.ini")
        );
        assert_eq!(with_dir("attachment; filename=\"/srv/tables/\""), None);
        assert_eq!(with_dir("attachment; filename=\"../..\""), None);
        assert_eq!(with_dir("attachment; filename=.bashrc"), None);
        assert_eq!(with_dir("attachment; filename=\"\""), None);
    }

    #[test]
    fn test_error_for_status_carries_server_message() {
        let err = make_response(403, br#"{"detail":"Not enough permissions"}"#)
            .error_for_status()
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.user_message(), "Not enough permissions");
        assert!(make_response(200, b"OK").error_for_status().is_ok());
    }
}
