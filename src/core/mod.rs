use crate::args::Config;
use std::error::Error;

mod exchange;
mod probe;
mod tcp;
mod varint;

pub use exchange::{Exchange, Grabber, MAX_BANNER_LEN, PONG_LEN};
pub use tcp::{GrabResult, TCPScanner};
pub use varint::{MAX_VARINT_BYTES, encode_varint, read_varint};

pub struct Scanner {
    pub config: Config,
}

impl Scanner {
    pub fn new(config: Config) -> Scanner {
        Scanner { config }
    }

    pub async fn exec(&self) -> Result<(), Box<dyn Error>> {
        TCPScanner::new(self.config.clone()).exec().await?;
        Ok(())
    }
}
