use mailsim::cli::Cli;
use mailsim::shutdown::{forward_signals, shutdown_channel, wait_and_stop};
use mailsim::{EmailStore, HttpServer, SmtpServer};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse_args();
    tracing_subscriber::fmt().with_max_level(cli.log_level).init();

    info!("Starting MailSim - Email Testing Server");
    info!("SMTP server on port: {}", cli.smtp_port);
    info!("Web interface on:    http://localhost:{}", cli.http_port);

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    if let Err(e) = forward_signals(shutdown_tx) {
        error!("Failed to install signal handler: {e}");
        std::process::exit(1);
    }

    let store = EmailStore::new();

    let smtp = match SmtpServer::new(store.clone())
        .with_idle_timeout(cli.idle_timeout())
        .start(cli.smtp_addr())
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start SMTP server on {}: {e}", cli.smtp_addr());
            std::process::exit(1);
        }
    };

    let http = match HttpServer::new(store).start(cli.http_addr()) {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start HTTP server on {}: {e}", cli.http_addr());
            smtp.shutdown();
            std::process::exit(1);
        }
    };

    wait_and_stop(&shutdown_rx, [smtp, http]);
}
