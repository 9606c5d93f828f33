use crate::core::GrabResult;
use crate::error::ScanStatus;
use colored::{ColoredString, Colorize};
use std::fs::File;
use std::io::Write;

pub struct OutputHandler;

impl OutputHandler {
    pub fn new() -> OutputHandler {
        OutputHandler
    }

    fn status_label(status: ScanStatus) -> ColoredString {
        match status {
            ScanStatus::Success => "success".green(),
            ScanStatus::ProtocolError => "protocol-error".yellow(),
            ScanStatus::ConnectionRefused => "connection-refused".red(),
            ScanStatus::ConnectionTimeout => "connection-timeout".red(),
            ScanStatus::IoTimeout => "io-timeout".red(),
            ScanStatus::UnknownError => "unknown-error".red(),
        }
    }

    /// Shorten long hex blobs for table display; JSON output keeps them whole
    fn display_hex(banner: Option<&String>) -> String {
        match banner {
            Some(hex) if hex.len() > 32 => format!("{}..", &hex[..32]),
            Some(hex) => hex.clone(),
            None => "-".to_string(),
        }
    }

    pub fn out_results(&self, results: &[GrabResult]) {
        if results.is_empty() {
            println!("No targets scanned");
            return;
        }

        // Print table header
        println!("\nGrab Results:");
        println!("{:-<100}", "");
        println!(
            "{:<26} {:<20} {:<36} {:<16}",
            "TARGET", "STATUS", "BANNER1", "BANNER2"
        );
        println!("{:-<100}", "");

        for result in results {
            println!(
                "{:<26} {:<20} {:<36} {:<16}",
                format!("{}:{}", result.target, result.port),
                Self::status_label(result.status),
                Self::display_hex(result.banner1.as_ref()),
                Self::display_hex(result.banner2.as_ref()),
            );
        }

        println!("{:-<100}", "");

        // Print summary
        let success_count = results.iter().filter(|r| r.status == ScanStatus::Success).count();
        let protocol_count = results
            .iter()
            .filter(|r| r.status == ScanStatus::ProtocolError)
            .count();
        let failed_count = results.len() - success_count - protocol_count;

        println!(
            "Summary: {} success, {} protocol errors, {} failed",
            success_count, protocol_count, failed_count
        );

        // Per-target errors below the table
        for result in results {
            if let Some(error) = &result.error {
                println!("  {}:{} - {}", result.target, result.port, error);
            }
        }
    }

    pub fn out_json(&self, results: &[GrabResult], file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut file = File::create(file_path)?;
        writeln!(file, "{}", serde_json::to_string_pretty(results)?)?;

        println!("JSON output written to: {}", file_path);
        Ok(())
    }
}
