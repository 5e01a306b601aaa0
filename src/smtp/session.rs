//! SMTP session state management

use crate::email::Email;

/// Represents the current state of an SMTP session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpState {
    /// Reading commands
    Idle,
    /// DATA command received - collecting email data
    InData,
}

/// What a data line did to the session
#[derive(Debug, PartialEq, Eq)]
pub enum DataLine {
    /// The line was appended to the data buffer
    Appended,
    /// The line was the lone `.` that ends the data phase
    End,
}

/// Manages the state and the pending transaction for a single SMTP session.
///
/// No sequencing is enforced: `DATA` is accepted without `MAIL FROM` or
/// `RCPT TO`, in which case the captured email has an empty sender and no
/// recipients.
#[derive(Debug)]
pub struct SmtpSession {
    /// Current state of the session
    pub state: SmtpState,
    /// Sender from the last MAIL FROM command
    pub from: String,
    /// Recipients from RCPT TO commands
    pub to: Vec<String>,
    /// Data collected during DATA mode, CRLF-terminated lines
    pub data: String,
}

impl SmtpSession {
    /// Create a new SMTP session
    pub fn new() -> Self {
        Self {
            state: SmtpState::Idle,
            from: String::new(),
            to: Vec::new(),
            data: String::new(),
        }
    }

    /// Discard the pending transaction and return to command mode
    pub fn reset(&mut self) {
        self.state = SmtpState::Idle;
        self.from.clear();
        self.to.clear();
        self.data.clear();
    }

    /// Set the sender address
    pub fn set_sender(&mut self, sender: String) {
        self.from = sender;
    }

    /// Add a recipient address
    pub fn add_recipient(&mut self, recipient: String) {
        self.to.push(recipient);
    }

    /// Start data collection mode
    pub fn start_data_mode(&mut self) {
        self.state = SmtpState::InData;
    }

    /// Whether the session is collecting data
    pub fn in_data_mode(&self) -> bool {
        self.state == SmtpState::InData
    }

    /// Add a line of data during data collection.
    ///
    /// `line` has its line terminator already removed. A lone `.` ends the
    /// data phase; otherwise one leading dot is removed before the line is
    /// stored with a CRLF terminator.
    pub fn add_data_line(&mut self, line: &str) -> DataLine {
        if line == "." {
            return DataLine::End;
        }

        let line = line.strip_prefix('.').unwrap_or(line);
        self.data.push_str(line);
        self.data.push_str("\r\n");
        DataLine::Appended
    }

    /// Build the email from the pending transaction and reset the session
    pub fn finish_data_collection(&mut self) -> Email {
        let email = Email::new(
            std::mem::take(&mut self.from),
            std::mem::take(&mut self.to),
            &self.data,
        );
        self.reset();
        email
    }
}

impl Default for SmtpSession {
    fn default() -> Self {
        Self::new()
    }
}
