use clap::Parser;
use num_cpus;

#[derive(Parser, Debug)]
#[command(name = "rgrab")]
#[command(about = "Fetch raw banners by sending two static probes over a varint-framed exchange")]
#[command(version)]
pub struct Args {
    /// Configuration file path. Note that CLI arguments override configuration file settings.
    #[arg(long = "config")]
    pub config: Option<String>,

    /// Target IP address or domain
    #[arg(short = 't', long = "target")]
    pub target: Vec<String>,

    /// Target port
    #[arg(short = 'p', long = "port", default_value = "25565")]
    pub port: u16,

    /// Probe to send to the server. Backslash escapes are decoded, e.g. \n is a newline.
    #[arg(long = "probe1", default_value = "\\n")]
    pub probe1: String,

    /// Second probe to send to the server. Backslash escapes are decoded.
    #[arg(long = "probe2", default_value = "\\n")]
    pub probe2: String,

    /// Connect timeout in milliseconds
    #[arg(long = "timeout", default_value = "2000")]
    pub timeout: u64,

    /// Read deadline per response round in milliseconds
    #[arg(long = "read-timeout", default_value = "5000")]
    pub read_timeout: u64,

    /// Number of concurrent tasks/threads
    #[arg(long = "threads", default_value_t = num_cpus::get())]
    pub threads: usize,

    /// Write results as JSON to the given file path
    #[arg(long = "json")]
    pub json: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
