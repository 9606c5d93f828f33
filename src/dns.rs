use std::error::Error;
use std::net::IpAddr;
use tokio::net::lookup_host;

pub struct DNSResolver;

impl DNSResolver {
    pub fn new() -> DNSResolver {
        DNSResolver
    }

    /// Resolve a hostname to its IP addresses
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname to resolve
    /// * `port` - The port the caller intends to connect to
    ///
    /// # Returns
    ///
    /// A `Result` containing the resolved IP addresses, or an error if the
    /// resolution fails or yields nothing
    pub async fn resolve(&self, host: &str, port: u16) -> Result<Vec<IpAddr>, Box<dyn Error>> {
        // Use Tokio's built-in DNS resolution to avoid runtime conflicts
        let addrs: Vec<IpAddr> = lookup_host(format!("{}:{}", host, port))
            .await?
            .map(|addr| addr.ip())
            .collect();

        if addrs.is_empty() {
            Err(format!("No IP addresses found for host: {}", host).into())
        } else {
            Ok(addrs)
        }
    }
}
