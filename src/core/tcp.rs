use crate::args::Config;
use crate::core::exchange::Grabber;
use crate::dns::DNSResolver;
use crate::error::{ScanError, ScanStatus, classify_io_error};
use crate::output::OutputHandler;
use crate::utils::valid_ip;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use serde::Serialize;
use std::error::Error;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Semaphore;

pub struct TCPScanner {
    /// The configuration for the current scan
    pub config: Config,
    /// A local DNS resolver
    pub dns: DNSResolver,
}

/// One scanned target: a status plus the hex-encoded banner pair. Empty
/// banners are omitted from serialized output.
#[derive(Debug, Serialize)]
pub struct GrabResult {
    pub target: String,
    pub ip: String,
    pub port: u16,
    pub status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn encode_nonempty(data: &[u8]) -> Option<String> {
    if data.is_empty() {
        None
    } else {
        Some(hex::encode(data))
    }
}

impl TCPScanner {
    pub fn new(config: Config) -> TCPScanner {
        TCPScanner { config, dns: DNSResolver::new() }
    }

    // Static so it can move into spawned tasks without borrowing self
    async fn grab_target(
        grabber: Arc<Grabber>,
        target: String,
        ip: IpAddr,
        port: u16,
        connect_timeout: u64,
    ) -> GrabResult {
        let mut result = GrabResult {
            target,
            ip: ip.to_string(),
            port,
            status: ScanStatus::UnknownError,
            banner1: None,
            banner2: None,
            error: None,
        };

        let addr = SocketAddr::new(ip, port);
        let mut stream = match tokio::time::timeout(
            Duration::from_millis(connect_timeout),
            TcpStream::connect(addr),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                result.status = classify_io_error(&e);
                result.error = Some(e.to_string());
                return result;
            }
            Err(_) => {
                let e = ScanError::ConnectTimeout;
                result.status = e.status();
                result.error = Some(e.to_string());
                return result;
            }
        };

        let exchange = grabber.exchange(&mut stream).await;
        drop(stream); // the connection is scoped to this grab

        match exchange {
            Ok(exchange) => {
                result.status = ScanStatus::Success;
                result.banner1 = encode_nonempty(&exchange.banner1);
                result.banner2 = encode_nonempty(&exchange.banner2);
            }
            Err(e) => {
                debug!("{}:{} exchange failed: {}", result.ip, port, e);
                result.status = e.status();
                result.error = Some(e.to_string());
            }
        }

        result
    }

    /// Execute the grab against every configured target
    ///
    /// # Arguments
    ///
    /// * `self` - The scanner to execute
    ///
    /// # Returns
    ///
    /// A `Result` that is `Ok` once all targets were attempted and results
    /// were written, or an error if setup fails before any scanning starts
    pub async fn exec(&self) -> Result<(), Box<dyn Error>> {
        let port = self.config.port;
        let timeout = self.config.timeout;
        let threads = self.config.threads;
        let verbose = self.config.verbose;

        // Probe strings are parsed exactly once; a malformed escape aborts
        // here, before any connection is opened
        let grabber = Arc::new(Grabber::new(&self.config)?);

        if verbose {
            println!("Starting grab with {} thread{}", threads, if threads == 1 { "" } else { "s" });
            println!("Target(s): {:?}", self.config.target);
            println!("Port: {}", port);
            println!("Connect timeout: {}ms, read timeout: {}ms", timeout, self.config.read_timeout);
        }

        // Resolve targets to IPs, keeping the original names for display
        let mut targets: Vec<(String, IpAddr)> = Vec::new();

        for original_target in &self.config.target {
            if valid_ip(original_target) {
                targets.push((original_target.clone(), original_target.parse()?));
            } else {
                match self.dns.resolve(original_target, port).await {
                    Ok(addrs) => {
                        // Multiple A records resolve to the first one
                        targets.push((original_target.clone(), addrs[0]));
                    }
                    Err(e) => {
                        warn!("skipping {}: {}", original_target, e);
                        eprintln!("Error resolving target {}: {}", original_target, e);
                    }
                }
            }
        }

        if verbose {
            println!("Resolved targets: {:?}", targets);
        }

        // Spawn one task per target with global thread limiting
        let global_semaphore = Arc::new(Semaphore::new(threads as usize));
        let pb = ProgressBar::new(targets.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{percent:>3}%|{bar:25.cyan/blue}| {pos}/{len} [{elapsed_precise}<{eta_precise}, {per_sec}]")
                .unwrap()
                .progress_chars("█▉▊▋▌▍▎▏ "),
        );

        let mut handles = vec![];

        for (target, ip) in targets {
            let grabber_clone = grabber.clone();
            let sem_clone = global_semaphore.clone();

            let handle = tokio::spawn(async move {
                let _permit = sem_clone.acquire().await.unwrap();
                Self::grab_target(grabber_clone, target, ip, port, timeout).await
            });
            handles.push(handle);
        }

        let mut results = Vec::new();
        for handle in handles {
            if let Ok(result) = handle.await {
                pb.inc(1);
                results.push(result);
            }
        }
        pb.finish_and_clear();

        let output_handler = OutputHandler::new();
        if let Some(json_file) = &self.config.json {
            if let Err(e) = output_handler.out_json(&results, json_file) {
                eprintln!("Error writing JSON output: {}", e);
            }
        } else {
            output_handler.out_results(&results);
        }

        Ok(())
    }
}
