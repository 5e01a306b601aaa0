//! SMTP response handling

/// Represents an SMTP response that can be sent to a client
#[derive(Debug, Clone, PartialEq)]
pub struct SmtpResponse {
    /// The SMTP response code (e.g., "250", "354", "500")
    pub code: String,
    /// The human-readable message
    pub message: String,
}

impl SmtpResponse {
    /// Create a new SMTP response
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a success response (250 OK)
    pub fn ok() -> Self {
        Self::new("250", "OK")
    }

    /// Create a greeting response (220)
    pub fn greeting() -> Self {
        Self::new("220", "localhost SMTP server ready")
    }

    /// Create a HELO/EHLO response (250)
    pub fn hello() -> Self {
        Self::new("250", "Hello")
    }

    /// Create a MAIL FROM response (250)
    pub fn sender_ok() -> Self {
        Self::new("250", "Sender OK")
    }

    /// Create a RCPT TO response (250)
    pub fn recipient_ok() -> Self {
        Self::new("250", "Recipient OK")
    }

    /// Create a DATA intermediate response (354)
    pub fn data_start() -> Self {
        Self::new("354", "Start mail input; end with <CRLF>.<CRLF>")
    }

    /// Create the end-of-data response (250)
    pub fn mail_accepted() -> Self {
        Self::new("250", "Mail accepted")
    }

    /// Create a QUIT response (221)
    pub fn quit() -> Self {
        Self::new("221", "Bye")
    }

    /// Create the reply to an unrecognised command (500)
    pub fn unknown_command() -> Self {
        Self::new("500", "Unknown command")
    }

    /// Format the response for sending over the wire
    pub fn format(&self) -> String {
        format!("{} {}\r\n", self.code, self.message)
    }

    /// Check if this is the reply that ends the session
    pub fn closes_session(&self) -> bool {
        self.code == "221"
    }
}
