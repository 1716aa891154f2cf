//! CLI argument parsing with clap.

use std::net::{IpAddr, SocketAddr};

use clap::Parser;

/// Clothing analysis and extraction API for uploaded photos.
#[derive(Parser, Debug)]
#[command(name = "personfi", version, about)]
pub struct Cli {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Address to bind (an IP address).
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    /// Verbose logging (debug level by default).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Socket address built from `--host` and `--port`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| format!("Invalid --host '{}': {e}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
