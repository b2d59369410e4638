use anyhow::Context;

pub mod argparse;

pub use argparse::get_args;

impl argparse::CliOpts {
    pub fn run(&self) -> anyhow::Result<()> {
        let summary = a2d_core::convert_file(&self.input_srt)
            .with_context(|| format!("failed to convert {:?}", self.input_srt))?;

        if summary.skipped != 0 {
            log::info!(
                "{} subtitles without GPS/camera telemetry were left out",
                summary.skipped
            );
        }
        println!("Conversion complete. Output file: {}", summary.output.display());
        Ok(())
    }
}
