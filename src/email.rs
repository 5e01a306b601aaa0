//! Captured email data structures

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Represents an email message captured by the SMTP server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Email {
    /// Store-assigned identifier, empty until the email is added to a store
    pub id: String,

    /// Raw `MAIL FROM` argument, e.g. `<sender@example.com>`
    pub from: String,

    /// Raw `RCPT TO` arguments, in the order they were given
    pub to: Vec<String>,

    /// Value of the `Subject:` header, empty when absent
    pub subject: String,

    /// The data section after the header block
    pub body: String,

    /// Whether a header declared `Content-Type: text/html`
    #[serde(rename = "html")]
    pub is_html: bool,

    /// When the email was committed to the store
    pub timestamp: Option<DateTime<Utc>>,
}

impl Email {
    /// Create an email from an envelope and the raw DATA section.
    ///
    /// The identifier and timestamp are left unset; the store fills them in.
    pub fn new(from: String, to: Vec<String>, data: &str) -> Self {
        let parsed = ParsedData::parse(data);
        Self {
            id: String::new(),
            from,
            to,
            subject: parsed.subject,
            body: parsed.body,
            is_html: parsed.is_html,
            timestamp: None,
        }
    }

    /// Check if this email was sent to a specific recipient
    pub fn has_recipient(&self, recipient: &str) -> bool {
        self.to.iter().any(|addr| addr == recipient)
    }
}

/// Header fields and body extracted from a DATA section
#[derive(Debug, Default, PartialEq)]
pub struct ParsedData {
    pub subject: String,
    pub is_html: bool,
    pub body: String,
}

impl ParsedData {
    const SEPARATOR: &'static str = "\r\n\r\n";

    /// Split the data on the first blank line and scan the header block.
    ///
    /// Without a blank line the whole data section is the body.
    pub fn parse(data: &str) -> Self {
        let Some((headers, body)) = data.split_once(Self::SEPARATOR) else {
            return Self {
                body: data.to_owned(),
                ..Self::default()
            };
        };

        let mut parsed = Self {
            body: body.to_owned(),
            ..Self::default()
        };

        for line in headers.split("\r\n") {
            if let Some(subject) = strip_prefix_ignore_case(line, "subject:") {
                parsed.subject = subject.trim_start().to_owned();
            }
            if line
                .to_ascii_lowercase()
                .contains("content-type: text/html")
            {
                parsed.is_html = true;
            }
        }

        parsed
    }
}

/// ASCII case-insensitive `str::strip_prefix`
pub(crate) fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    match line.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&line[prefix.len()..]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_creation() {
        let email = Email::new(
            "<sender@example.com>".to_string(),
            vec!["<recipient@example.com>".to_string()],
            "Subject: Test\r\n\r\nHello World\r\n",
        );

        assert!(email.id.is_empty());
        assert!(email.timestamp.is_none());
        assert_eq!(email.from, "<sender@example.com>");
        assert_eq!(email.to, vec!["<recipient@example.com>"]);
        assert_eq!(email.subject, "Test");
        assert_eq!(email.body, "Hello World\r\n");
        assert!(!email.is_html);
    }

    #[test]
    fn test_has_recipient() {
        let email = Email::new(
            "<sender@example.com>".to_string(),
            vec![
                "<user1@example.com>".to_string(),
                "<user2@example.com>".to_string(),
            ],
            "Test email\r\n",
        );

        assert!(email.has_recipient("<user1@example.com>"));
        assert!(email.has_recipient("<user2@example.com>"));
        assert!(!email.has_recipient("<user3@example.com>"));
    }

    #[test]
    fn test_parse_without_separator() {
        let parsed = ParsedData::parse("Subject: Not a header\r\nplain text\r\n");
        assert_eq!(parsed.subject, "");
        assert!(!parsed.is_html);
        assert_eq!(parsed.body, "Subject: Not a header\r\nplain text\r\n");
    }

    #[test]
    fn test_parse_empty_data() {
        assert_eq!(ParsedData::parse(""), ParsedData::default());
    }

    #[test]
    fn test_subject_is_case_insensitive() {
        let parsed = ParsedData::parse("SUBJECT:   Shouting\r\n\r\nbody\r\n");
        assert_eq!(parsed.subject, "Shouting");

        let parsed = ParsedData::parse("subject:quiet\r\n\r\nbody\r\n");
        assert_eq!(parsed.subject, "quiet");
    }

    #[test]
    fn test_last_subject_wins() {
        let parsed = ParsedData::parse("Subject: first\r\nSubject: second\r\n\r\nbody\r\n");
        assert_eq!(parsed.subject, "second");
    }

    #[test]
    fn test_html_content_type() {
        let parsed = ParsedData::parse(
            "From: a@x\r\nContent-Type: text/html; charset=utf-8\r\n\r\n<p>hi</p>\r\n",
        );
        assert!(parsed.is_html);
        assert_eq!(parsed.body, "<p>hi</p>\r\n");

        let parsed = ParsedData::parse("Content-Type: text/plain\r\n\r\nhi\r\n");
        assert!(!parsed.is_html);
    }

    #[test]
    fn test_html_marker_in_body_is_ignored() {
        let parsed = ParsedData::parse("Subject: x\r\n\r\nContent-Type: text/html\r\n");
        assert!(!parsed.is_html);
    }

    #[test]
    fn test_body_keeps_later_blank_lines() {
        let parsed = ParsedData::parse("Subject: x\r\n\r\npara one\r\n\r\npara two\r\n");
        assert_eq!(parsed.body, "para one\r\n\r\npara two\r\n");
    }

    #[test]
    fn test_json_field_names() {
        let mut email = Email::new(
            "<a@x>".to_string(),
            vec!["<b@y>".to_string()],
            "Subject: Hi\r\n\r\nhello\r\n",
        );
        email.id = "7".to_string();

        let value = serde_json::to_value(&email).unwrap();
        assert_eq!(value["id"], "7");
        assert_eq!(value["from"], "<a@x>");
        assert_eq!(value["to"][0], "<b@y>");
        assert_eq!(value["subject"], "Hi");
        assert_eq!(value["body"], "hello\r\n");
        assert_eq!(value["html"], false);
        assert!(value.get("timestamp").is_some());
    }

    #[test]
    fn test_strip_prefix_ignore_case() {
        assert_eq!(strip_prefix_ignore_case("Mail From:<a>", "MAIL FROM:"), Some("<a>"));
        assert_eq!(strip_prefix_ignore_case("MAIL", "MAIL FROM:"), None);
        assert_eq!(strip_prefix_ignore_case("ça va", "ca"), None);
    }
}
