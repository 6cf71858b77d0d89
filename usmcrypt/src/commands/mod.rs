mod crypt;
mod decrypt;
mod encrypt;
mod extract;
mod keys;
mod probe;

pub use decrypt::Decrypt;
pub use encrypt::Encrypt;
pub use extract::Extract;
pub use keys::Keys;
pub use probe::Probe;

use clap::{ArgAction, ColorChoice, Parser, Subcommand};
use log::LevelFilter;

/// Decrypt, encrypt, extract and inspect CRI Middleware USM video files.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// When to output colored text.
    #[arg(long, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Print debug messages, twice for trace messages.
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only print errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }

        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    Decrypt(Decrypt),
    Encrypt(Encrypt),
    Extract(Extract),
    Keys(Keys),
    Probe(Probe),
}

fn parse_key(value: &str) -> Result<u64, String> {
    cri_usm::parse_key(value).map_err(|e| e.to_string())
}
