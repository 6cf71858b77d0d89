use crate::utils;
use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use cri_usm::{
    CryptSummary,
    crypt::{CipherKeys, OpMode},
};
use log::{debug, info};
use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

/// Arguments shared by `decrypt` and `encrypt`.
#[derive(Debug, Clone, Args)]
pub struct CryptArgs {
    /// USM files, directories containing .usm files or glob patterns.
    #[arg(required = true)]
    input: Vec<String>,

    /// Numeric key, as decimal, 0x prefixed hex or bare hex.
    #[arg(short, long, value_parser = super::parse_key)]
    key: u64,

    /// Directory for output files. Defaults to writing next to each input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of files processed in parallel.
    #[arg(short, long, default_value_t = 4)]
    workers: usize,
}

impl CryptArgs {
    pub fn run(self, mode: OpMode) -> Result<()> {
        let files = utils::find_usm_files(&self.input)?;

        if files.is_empty() {
            bail!("no USM files found.");
        }

        let outputs: Vec<PathBuf> = files
            .iter()
            .map(|x| utils::output_path(x, self.output.as_deref(), mode))
            .collect();
        utils::ensure_distinct_outputs(&files, &outputs)?;

        if let Some(output) = &self.output {
            fs::create_dir_all(output)?;
        }

        let keys = CipherKeys::derive(self.key);

        info!(
            "{} {} file(s) on {} worker(s)",
            verb(mode).bold().green(),
            files.len(),
            self.workers.max(1)
        );

        utils::process_parallel(&files, self.workers, |i, file| {
            let output = &outputs[i];
            let summary = crypt_file(file, output, mode, &keys)?;

            info!(
                "{} {} {} ({} video, {} audio packets)",
                "Saved".bold().green(),
                output.display(),
                utils::format_bytes(fs::metadata(output).map_or(0, |x| x.len())),
                summary.video_packets,
                summary.audio_packets,
            );
            debug!("{}: {:?}", file.display(), summary);
            Ok(())
        })
    }
}

fn crypt_file(input: &Path, output: &Path, mode: OpMode, keys: &CipherKeys) -> Result<CryptSummary> {
    if output.exists() && fs::canonicalize(input)? == fs::canonicalize(output)? {
        bail!("output would overwrite the input file.");
    }

    let reader = BufReader::new(File::open(input)?);
    utils::write_atomic(output, |writer| {
        Ok(cri_usm::crypt_container(reader, writer, mode, keys)?)
    })
}

fn verb(mode: OpMode) -> &'static str {
    match mode {
        OpMode::Decrypt => "Decrypting",
        OpMode::Encrypt => "Encrypting",
        OpMode::None => "Copying",
    }
}
