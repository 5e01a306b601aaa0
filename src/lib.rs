//! # MailSim
//!
//! MailSim is an SMTP server for development that never delivers anything.
//!
//! Point an application's outgoing mail settings at it, and every message
//! it sends is captured in memory and listed on a small web inbox.
//!
//! ## Quick Start
//!
//! ```rust
//! use mailsim::{EmailStore, HttpServer, SmtpServer};
//!
//! let store = EmailStore::new();
//!
//! let smtp = SmtpServer::new(store.clone()).start("127.0.0.1:0").unwrap();
//! let http = HttpServer::new(store.clone()).start("127.0.0.1:0").unwrap();
//!
//! // Application sends email to smtp.local_addr()
//! // ...
//!
//! // Check what was captured
//! for email in store.list() {
//!     println!("{} -> {:?}: {}", email.from, email.to, email.subject);
//! }
//!
//! smtp.shutdown();
//! http.shutdown();
//! ```
//!
//! ## Supported SMTP commands
//!
//! - `HELO` / `EHLO` - Greet the server
//! - `MAIL FROM` - Specify the sender's address
//! - `RCPT TO` - Specify the destination (multiple destinations are supported)
//! - `DATA` - Send the email content
//! - `RSET` - Reset the current transaction
//! - `NOOP` - Do nothing
//! - `QUIT` - Close connection
//!
//! Commands are not checked for order, and addresses are stored exactly as
//! the client sent them.
//!
//! ## HTTP API
//!
//! - `GET /api/emails` - All captured emails, newest first
//! - `GET /api/emails/{id}` - A single email
//! - `POST /api/clear` - Remove all captured emails
//!
//! `GET /` serves a browser inbox built on these endpoints.
//!
//! ## Notes
//!
//! - Runs in-memory only. Email persistence is not supported.
//! - Only the `Subject` and `Content-Type` headers are interpreted.
//! - SMTP authentication and TLS are not supported.
//! - Mail relay is not supported.

pub mod cli;
pub mod email;
pub mod http;
pub mod shutdown;
pub mod smtp;
pub mod store;

pub use email::Email;
pub use http::{HttpError, HttpServer};
pub use shutdown::ServerHandle;
pub use smtp::{SmtpError, SmtpResponse, SmtpServer, SmtpSession, SmtpState};
pub use store::EmailStore;
