use std::path::PathBuf;

use clap::Parser;

pub fn get_args() -> CliOpts {
    CliOpts::parse()
}

/// Convert an Autel SRT file to DJI format
///
/// The converted subtitles are written beside the input, e.g.
/// `MAX_0001.srt` becomes `MAX_0001.a2d.srt`.
#[derive(Parser, Debug)]
#[clap(version = clap::crate_version!())]
pub struct CliOpts {
    /// Increase log output, repeat for more detail
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the input Autel SRT file
    pub input_srt: PathBuf,
}
