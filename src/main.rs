use rgrab::args::get_config;
use rgrab::core::Scanner;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let config = get_config();
    let scanner = Scanner::new(config);
    scanner.exec().await?;
    Ok(())
}
