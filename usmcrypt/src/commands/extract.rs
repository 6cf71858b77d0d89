use crate::utils;
use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use cri_usm::{ChunkSignature, StreamInfo, crypt::CipherKeys};
use log::{debug, info};
use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// Split USM files into their video, audio and alpha streams.
#[derive(Debug, Clone, Args)]
pub struct Extract {
    /// USM files, directories containing .usm files or glob patterns.
    #[arg(required = true)]
    input: Vec<String>,

    /// Numeric key of encrypted files. Without it packets are written as stored.
    #[arg(short, long, value_parser = super::parse_key)]
    key: Option<u64>,

    /// Directory receiving one folder of streams per input file.
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Also save the @UTF metadata pages of every stream.
    #[arg(short, long)]
    pages: bool,

    /// Number of files processed in parallel.
    #[arg(short, long, default_value_t = 4)]
    workers: usize,
}

impl Extract {
    pub fn execute(self) -> Result<()> {
        let files = utils::find_usm_files(&self.input)?;

        if files.is_empty() {
            bail!("no USM files found.");
        }

        let dirs: Vec<PathBuf> = files
            .iter()
            .map(|x| self.output.join(x.file_stem().unwrap_or_default()))
            .collect();
        utils::ensure_distinct_outputs(&files, &dirs)?;

        let keys = self.key.map(CipherKeys::derive);

        info!(
            "{} {} file(s) on {} worker(s)",
            "Extracting".bold().green(),
            files.len(),
            self.workers.max(1)
        );

        utils::process_parallel(&files, self.workers, |i, file| {
            extract_file(file, &dirs[i], keys.as_ref(), self.pages)
        })
    }
}

fn extract_file(input: &Path, dir: &Path, keys: Option<&CipherKeys>, pages: bool) -> Result<()> {
    let streams = cri_usm::scan_streams(BufReader::new(File::open(input)?))?;
    let source = Arc::new(Mutex::new(BufReader::new(File::open(input)?)));
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();

    fs::create_dir_all(dir)?;

    for stream in &streams {
        let name = stream_name(&stem, stream);

        if !stream.packets.is_empty() {
            // Named once the first packet shows what the stream holds.
            let unnamed = dir.join(&name);
            let summary = utils::write_atomic(&unnamed, |writer| {
                Ok(cri_usm::demux_stream(source.clone(), stream, keys, writer)?)
            })?;
            let path = dir.join(format!("{}.{}", name, summary.extension));
            fs::rename(&unnamed, &path)?;

            info!(
                "{} {} ({} packets, {})",
                "Saved".bold().green(),
                path.display(),
                summary.frames,
                utils::format_bytes(summary.bytes)
            );
        }

        if pages && !stream.pages.is_empty() {
            let pages_dir = dir.join("pages");
            fs::create_dir_all(&pages_dir)?;

            for (i, page) in cri_usm::read_pages(source.clone(), stream).enumerate() {
                let path = pages_dir.join(format!("{}_{}.utf", name, i));
                fs::write(&path, page?)?;
                debug!("saved {}", path.display());
            }
        }
    }

    Ok(())
}

fn stream_name(stem: &str, stream: &StreamInfo) -> String {
    let kind = match stream.signature {
        ChunkSignature::Crid => "crid",
        ChunkSignature::Video => "video",
        ChunkSignature::Audio => "audio",
        ChunkSignature::Alpha => "alpha",
    };

    format!("{}_{}_{}", stem, kind, stream.channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cri_usm::frames::FrameIndex;

    #[test]
    fn test_stream_name() {
        let stream = StreamInfo {
            signature: ChunkSignature::Audio,
            channel: 2,
            packets: FrameIndex::default(),
            pages: FrameIndex::default(),
        };

        assert_eq!(stream_name("op.v2", &stream), "op.v2_audio_2");
    }
}
