//! Implementation of SMTP commands

use crate::email::strip_prefix_ignore_case;
use crate::smtp::response::SmtpResponse;
use crate::smtp::session::SmtpSession;
use tracing::debug;

/// A parsed command line.
///
/// Keywords are matched case-insensitively; arguments keep their case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmtpCommand {
    /// `MAIL FROM:<addr>` with the raw argument
    Mail(String),
    /// `RCPT TO:<addr>` with the raw argument
    Rcpt(String),
    Data,
    Hello,
    Rset,
    Noop,
    Quit,
    Unknown,
}

impl SmtpCommand {
    /// Parse a command line with its terminator removed.
    ///
    /// `DATA`, `RSET` and `QUIT` must make up the whole line, so trailing
    /// whitespace turns them into [`SmtpCommand::Unknown`].
    pub fn parse(line: &str) -> Self {
        if let Some(sender) = strip_prefix_ignore_case(line, "MAIL FROM:") {
            return SmtpCommand::Mail(sender.trim().to_owned());
        }
        if let Some(recipient) = strip_prefix_ignore_case(line, "RCPT TO:") {
            return SmtpCommand::Rcpt(recipient.trim().to_owned());
        }

        let (verb, argument) = match line.split_once(' ') {
            Some((verb, argument)) => (verb, Some(argument)),
            None => (line, None),
        };

        match (verb.to_ascii_uppercase().as_str(), argument) {
            ("HELO" | "EHLO", _) => SmtpCommand::Hello,
            ("NOOP", _) => SmtpCommand::Noop,
            ("DATA", None) => SmtpCommand::Data,
            ("RSET", None) => SmtpCommand::Rset,
            ("QUIT", None) => SmtpCommand::Quit,
            _ => SmtpCommand::Unknown,
        }
    }
}

/// Handles SMTP commands and returns appropriate responses
#[derive(Debug, Default)]
pub struct SmtpCommandHandler;

impl SmtpCommandHandler {
    /// Create a new command handler
    pub fn new() -> Self {
        Self
    }

    /// Process a command line and return the reply.
    ///
    /// Unknown commands get `500 Unknown command` and leave the session
    /// untouched.
    pub fn process_command(&self, command_line: &str, session: &mut SmtpSession) -> SmtpResponse {
        match SmtpCommand::parse(command_line) {
            SmtpCommand::Mail(sender) => {
                session.set_sender(sender);
                SmtpResponse::sender_ok()
            }
            SmtpCommand::Rcpt(recipient) => {
                session.add_recipient(recipient);
                SmtpResponse::recipient_ok()
            }
            SmtpCommand::Data => {
                session.start_data_mode();
                SmtpResponse::data_start()
            }
            SmtpCommand::Hello => SmtpResponse::hello(),
            SmtpCommand::Rset => {
                session.reset();
                SmtpResponse::ok()
            }
            SmtpCommand::Noop => SmtpResponse::ok(),
            SmtpCommand::Quit => SmtpResponse::quit(),
            SmtpCommand::Unknown => {
                debug!("Unknown SMTP command: {command_line}");
                SmtpResponse::unknown_command()
            }
        }
    }
}
