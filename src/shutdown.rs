//! Stopping running accept loops, on demand or on SIGINT/SIGTERM

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

/// Shutdown signal sender
pub type ShutdownTx = mpsc::Sender<()>;

/// Shutdown signal receiver
pub type ShutdownRx = mpsc::Receiver<()>;

/// Create a shutdown channel
pub fn shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    mpsc::channel()
}

/// Send on `tx` whenever the process gets SIGINT or SIGTERM (Ctrl+C on Windows).
///
/// Only one handler can be installed per process.
pub fn forward_signals(tx: ShutdownTx) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        tracing::info!("Received termination signal, initiating shutdown...");
        // The receiver is gone once shutdown has already started.
        let _ = tx.send(());
    })
}

/// Block until a shutdown signal arrives, then stop every server in turn.
///
/// Also returns when all senders have been dropped.
pub fn wait_and_stop<I>(rx: &ShutdownRx, servers: I)
where
    I: IntoIterator<Item = ServerHandle>,
{
    if rx.recv().is_err() {
        tracing::debug!("Shutdown channel closed");
    }

    tracing::info!("Shutting down MailSim...");
    for server in servers {
        server.shutdown();
    }
    tracing::info!("Goodbye!");
}

/// Stop flag shared between a [`ServerHandle`] and its accept loop
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    /// Create a flag that is not raised
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag for every clone
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether [`StopFlag::stop`] has been called on any clone
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle to an accept loop running on its own thread
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    stop: StopFlag,
    thread: JoinHandle<()>,
}

impl ServerHandle {
    /// Run `accept_loop` on a new thread.
    ///
    /// The loop receives the listener and the stop flag, and must return once
    /// it accepts a connection after the flag has been raised.
    pub fn spawn<F>(listener: TcpListener, accept_loop: F) -> io::Result<Self>
    where
        F: FnOnce(TcpListener, StopFlag) + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        let stop = StopFlag::new();
        let loop_stop = stop.clone();
        let thread = thread::Builder::new()
            .name(format!("accept-{}", local_addr.port()))
            .spawn(move || accept_loop(listener, loop_stop))?;

        Ok(Self {
            local_addr,
            stop,
            thread,
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for the accept loop to end.
    ///
    /// Sessions that are already running finish on their own threads.
    pub fn shutdown(self) {
        self.stop.stop();
        // Wake the blocking accept so the loop sees the flag.
        if let Err(e) = TcpStream::connect(wake_addr(self.local_addr)) {
            tracing::warn!("Failed to wake listener on {}: {e}", self.local_addr);
        }
        self.join();
    }

    /// Block until the accept loop ends
    pub fn join(self) {
        if self.thread.join().is_err() {
            tracing::error!("Accept loop on {} panicked", self.local_addr);
        }
    }
}

fn wake_addr(addr: SocketAddr) -> SocketAddr {
    match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port())
        }
        IpAddr::V6(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), addr.port())
        }
        _ => addr,
    }
}
