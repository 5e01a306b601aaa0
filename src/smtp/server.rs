//! SMTP server implementation

use crate::shutdown::{ServerHandle, StopFlag};
use crate::smtp::commands::SmtpCommandHandler;
use crate::smtp::error::SmtpError;
use crate::smtp::response::SmtpResponse;
use crate::smtp::session::{DataLine, SmtpSession};
use crate::store::EmailStore;

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Longest command or data line accepted, terminator included
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// SMTP server that captures every completed message into an [`EmailStore`]
#[derive(Debug, Clone)]
pub struct SmtpServer {
    /// Where captured emails go
    store: EmailStore,
    /// Close a session after this long without a line from the client
    idle_timeout: Option<Duration>,
}

impl SmtpServer {
    /// Create a new SMTP server writing into `store`
    pub fn new(store: EmailStore) -> Self {
        Self {
            store,
            idle_timeout: None,
        }
    }

    /// Set the per-connection idle read timeout. `None` waits forever.
    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Bind to `addr` and accept connections on a background thread
    pub fn start(self, addr: impl ToSocketAddrs) -> Result<ServerHandle, SmtpError> {
        let listener = TcpListener::bind(addr)?;
        self.start_with_listener(listener)
    }

    /// Accept connections from an existing listener on a background thread.
    ///
    /// Each accepted connection gets its own session thread.
    pub fn start_with_listener(self, listener: TcpListener) -> Result<ServerHandle, SmtpError> {
        info!("SMTP server listening on {}", listener.local_addr()?);
        let handle = ServerHandle::spawn(listener, move |listener, stop| {
            self.accept_loop(&listener, &stop)
        })?;
        Ok(handle)
    }

    fn accept_loop(&self, listener: &TcpListener, stop: &StopFlag) {
        for stream in listener.incoming() {
            if stop.is_stopped() {
                break;
            }

            match stream {
                Ok(stream) => self.spawn_session(stream),
                Err(e) => {
                    warn!("Error accepting SMTP connection: {e}");
                }
            }
        }
        info!("SMTP server stopped");
    }

    fn spawn_session(&self, stream: TcpStream) {
        let server = self.clone();
        let peer = stream
            .peer_addr()
            .map_or_else(|_| "unknown peer".to_owned(), |addr| addr.to_string());
        debug!("Accepted SMTP connection from {peer}");

        let spawned = thread::Builder::new()
            .name("smtp-session".to_owned())
            .spawn(move || match server.handle_client(stream) {
                Ok(()) => debug!("SMTP connection from {peer} closed"),
                Err(e) if e.is_timeout() => debug!("SMTP connection from {peer} idle, closing"),
                Err(e) => warn!("Error handling SMTP client {peer}: {e}"),
            });

        if let Err(e) = spawned {
            warn!("Failed to start SMTP session thread: {e}");
        }
    }

    /// Handle a client connection
    fn handle_client(&self, stream: TcpStream) -> Result<(), SmtpError> {
        stream.set_read_timeout(self.idle_timeout)?;
        let reader = BufReader::new(stream.try_clone()?);
        self.run_session(reader, stream)
    }

    /// Drive one session until QUIT or end of input.
    ///
    /// A transaction that is still open when the input ends, or when an I/O
    /// error occurs, is dropped without being stored. A line longer than
    /// [`MAX_LINE_LENGTH`] ends the session with [`SmtpError::LineTooLong`].
    pub fn run_session<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), SmtpError>
    where
        R: BufRead,
        W: Write,
    {
        let command_handler = SmtpCommandHandler::new();
        let mut session = SmtpSession::new();

        self.send_response(&mut writer, &SmtpResponse::greeting())?;

        let mut line_buffer = Vec::new();
        loop {
            line_buffer.clear();
            let read = (&mut reader)
                .take(MAX_LINE_LENGTH as u64)
                .read_until(b'\n', &mut line_buffer)?;
            if read == 0 {
                break;
            }
            if read == MAX_LINE_LENGTH && line_buffer.last() != Some(&b'\n') {
                return Err(SmtpError::LineTooLong {
                    max: MAX_LINE_LENGTH,
                });
            }

            let line = String::from_utf8_lossy(&line_buffer);
            let line = strip_line_ending(&line);

            if session.in_data_mode() {
                if session.add_data_line(line) == DataLine::End {
                    self.send_response(&mut writer, &SmtpResponse::mail_accepted())?;
                    let email = self.store.add(session.finish_data_collection());
                    info!("Email received: {} -> {:?} (id {})", email.from, email.to, email.id);
                }
                continue;
            }

            let response = command_handler.process_command(line, &mut session);
            self.send_response(&mut writer, &response)?;
            if response.closes_session() {
                break;
            }
        }

        Ok(())
    }

    /// Send a response to the client
    fn send_response<W: Write>(
        &self,
        writer: &mut W,
        response: &SmtpResponse,
    ) -> Result<(), SmtpError> {
        writer.write_all(response.format().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Remove a trailing LF and the CR before it, if any
fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
