//! Command-line argument parsing.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;

/// Development SMTP server that captures mail and shows it in a web inbox.
#[derive(Parser, Debug, Clone)]
#[command(name = "mailsim")]
#[command(version)]
pub struct Cli {
    /// SMTP server port.
    #[arg(long = "smtp", default_value_t = 1025)]
    pub smtp_port: u16,

    /// HTTP server port.
    #[arg(long = "http", default_value_t = 8025)]
    pub http_port: u16,

    /// Interface both servers listen on.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// Seconds an SMTP connection may stay silent before it is closed (0 disables).
    #[arg(long, default_value_t = 300)]
    pub idle_timeout: u64,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value_t = tracing::Level::INFO)]
    pub log_level: tracing::Level,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Address of the SMTP listener.
    pub fn smtp_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.smtp_port)
    }

    /// Address of the HTTP listener.
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.http_port)
    }

    /// Idle timeout for SMTP sessions, `None` when disabled.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout > 0).then(|| Duration::from_secs(self.idle_timeout))
    }
}
