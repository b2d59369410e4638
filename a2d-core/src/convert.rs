use std::{
    io::Read,
    path::{Path, PathBuf},
};

use crate::{
    error::{ConvertError, TelemetryError},
    srt::{self, SrtDocument},
    telemetry, Subtitle,
};

/// Inserted before the `.srt` extension of the converted file.
pub const OUTPUT_MARKER: &str = "a2d";

/// A subtitle left out of the output because its telemetry did not match.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSubtitle {
    pub idx: u32,
    pub content: String,
    pub reason: TelemetryError,
}

/// Result of converting a whole document.
#[derive(Debug)]
pub struct Conversion {
    /// Converted subtitles, in source order, with their original indices.
    pub subtitles: Vec<Subtitle>,
    pub skipped: Vec<SkippedSubtitle>,
}

impl Conversion {
    pub fn render(&self) -> String {
        SrtDocument(&self.subtitles).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    pub output: PathBuf,
    pub converted: usize,
    pub skipped: usize,
}

/// `flight.srt` -> `flight.a2d.srt`
pub fn output_path_for<P: AsRef<Path>>(source: P) -> PathBuf {
    source
        .as_ref()
        .with_extension(format!("{}.srt", OUTPUT_MARKER))
}

fn convert_subtitle(mut sub: Subtitle) -> Result<Subtitle, SkippedSubtitle> {
    match telemetry::extract(&sub.text) {
        Ok(record) => {
            sub.text = record.to_string();
            log::debug!("subtitle {}: {}", sub.idx, sub.text);
            Ok(sub)
        }
        Err(reason) => Err(SkippedSubtitle {
            idx: sub.idx,
            content: sub.text,
            reason,
        }),
    }
}

/// Convert an Autel SRT document into DJI telemetry subtitles.
///
/// Subtitles without both telemetry fragments are logged and dropped; only a
/// malformed SRT container fails the conversion.
pub fn convert_str(document: &str) -> Result<Conversion, ConvertError> {
    let subs = srt::parse_document(document)?;
    let total = subs.len();

    let mut skipped = Vec::new();
    let subtitles: Vec<Subtitle> = subs
        .into_iter()
        .filter_map(|sub| match convert_subtitle(sub) {
            Ok(sub) => Some(sub),
            Err(skip) => {
                log::warn!(
                    "skipping subtitle {}, {}. Contents: {:?}",
                    skip.idx,
                    skip.reason,
                    skip.content
                );
                skipped.push(skip);
                None
            }
        })
        .collect();

    log::info!(
        "converted {} of {} subtitles ({} skipped)",
        subtitles.len(),
        total,
        skipped.len()
    );
    Ok(Conversion { subtitles, skipped })
}

/// Convert the Autel SRT file at `source`, writing the result beside it.
pub fn convert_file<P: AsRef<Path>>(source: P) -> Result<ConvertSummary, ConvertError> {
    let source = source.as_ref();
    let document = read_path_to_string(source)?;
    let conversion = convert_str(&document)?;

    let output = output_path_for(source);
    log::debug!("writing {:?}", output);
    std::fs::write(&output, conversion.render()).map_err(|e| ConvertError::Write {
        path: output.clone(),
        source: e,
    })?;

    Ok(ConvertSummary {
        output,
        converted: conversion.subtitles.len(),
        skipped: conversion.skipped.len(),
    })
}

fn read_path_to_string(tpath: &Path) -> Result<String, ConvertError> {
    let read_err = |e| ConvertError::Read {
        path: tpath.to_path_buf(),
        source: e,
    };
    let mut f = std::fs::File::open(tpath).map_err(read_err)?;
    let mut v = Vec::new();
    f.read_to_end(&mut v).map_err(read_err)?;

    Ok(match String::from_utf8(v) {
        Ok(s) => s,
        Err(e) => {
            let v = e.into_bytes();
            // SRT files are WINDOWS_1252 by default, but there is no requirement, so who knows
            let (text, encoding, replacements) = encoding_rs::WINDOWS_1252.decode(v.as_slice());
            if replacements {
                log::warn!(
                    "could not decode {:?} accurately with {}",
                    tpath,
                    encoding.name()
                );
            }
            text.to_string()
        }
    })
}
