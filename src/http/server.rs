//! Query API server

use crate::http::error::HttpError;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::http::routes;
use crate::shutdown::{ServerHandle, StopFlag};
use crate::store::EmailStore;

use std::io::{BufReader, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long a client may take to send its request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP server exposing the captured emails of an [`EmailStore`]
#[derive(Debug, Clone)]
pub struct HttpServer {
    store: EmailStore,
}

impl HttpServer {
    /// Create a new HTTP server reading from `store`
    pub fn new(store: EmailStore) -> Self {
        Self { store }
    }

    /// Bind to `addr` and accept connections on a background thread
    pub fn start(self, addr: impl ToSocketAddrs) -> Result<ServerHandle, HttpError> {
        let listener = TcpListener::bind(addr)?;
        self.start_with_listener(listener)
    }

    /// Accept connections from an existing listener on a background thread
    pub fn start_with_listener(self, listener: TcpListener) -> Result<ServerHandle, HttpError> {
        info!("Web interface available at http://{}", listener.local_addr()?);
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
                Ok(stream) => {
                    let server = self.clone();
                    let spawned = thread::Builder::new()
                        .name("http-connection".to_owned())
                        .spawn(move || {
                            if let Err(e) = server.handle_client(stream) {
                                warn!("Error handling HTTP client: {e}");
                            }
                        });
                    if let Err(e) = spawned {
                        warn!("Failed to start HTTP connection thread: {e}");
                    }
                }
                Err(e) => {
                    warn!("Error accepting HTTP connection: {e}");
                }
            }
        }
        info!("HTTP server stopped");
    }

    /// Serve a single request, then close the connection
    fn handle_client(&self, mut stream: TcpStream) -> Result<(), HttpError> {
        stream.set_read_timeout(Some(REQUEST_TIMEOUT))?;
        let mut reader = BufReader::new(stream.try_clone()?);

        let response = match HttpRequest::read_from(&mut reader) {
            Ok(request) => {
                debug!("{} {}", request.method, request.path);
                routes::route(&request, &self.store).unwrap_or_else(|e| {
                    warn!("Failed to answer {} {}: {e}", request.method, request.path);
                    HttpResponse::error(e.status(), "Internal server error")
                })
            }
            Err(HttpError::MalformedRequest(reason)) => {
                debug!("Rejecting malformed request: {reason}");
                HttpResponse::error(400, "Bad request")
            }
            Err(e) => return Err(e),
        };

        response.write_to(&mut stream)?;
        stream.flush()?;
        Ok(())
    }
}
