use anyhow::Result;
use clap::Args;
use colored::Colorize;
use cri_usm::crypt::CipherKeys;

/// Print the video and audio keys derived from a numeric key.
#[derive(Debug, Clone, Args)]
pub struct Keys {
    /// Numeric key, as decimal, 0x prefixed hex or bare hex.
    #[arg(short, long, value_parser = super::parse_key)]
    key: u64,
}

impl Keys {
    pub fn execute(self) -> Result<()> {
        let keys = CipherKeys::derive(self.key);

        println!("{} {:#018x}", "key  ".bold(), self.key);
        println!("{} {}", "video".bold().green(), keys.video_hex());
        println!("{} {}", "audio".bold().green(), keys.audio_hex());
        Ok(())
    }
}
