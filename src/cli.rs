use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{parse_log_level, Options};
use crate::logging::LogLevel;
use crate::riff;
use crate::sound;

/// RIFF chunk inspector and PCM to mu-law transcoder
#[derive(Parser, Debug)]
#[command(name = "riffkit")]
#[command(version)]
#[command(about = "Inspect RIFF files and transcode PCM WAVE audio to mu-law", long_about = None)]
pub struct Cli {
    /// Configuration file (key = value lines)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (nothing, error, warning, info, debug, all)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Same as --log-level debug
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the chunk tree of a RIFF file
    Describe {
        file: PathBuf,

        /// Leading indent for the description
        #[arg(short, long, value_name = "N")]
        indent: Option<usize>,
    },

    /// Transcode a 16-bit PCM WAVE file to 8-bit mu-law
    ToUlaw {
        input: PathBuf,
        output: PathBuf,

        /// Replace OUTPUT if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// List tags with registered decoders
    Tags,
}

impl Cli {
    /// Merge CLI arguments into the options struct
    pub fn merge_into_options(&self, mut opts: Options) -> Result<Options> {
        if let Some(ref level) = self.log_level {
            opts.log_level = parse_log_level(level).context("Invalid --log-level")?;
        }
        if self.verbose {
            opts.log_level = opts.log_level.max(LogLevel::Debug);
        }
        match &self.command {
            Command::Describe {
                indent: Some(indent),
                ..
            } => opts.indent = *indent,
            Command::ToUlaw { force: true, .. } => opts.overwrite = true,
            _ => {}
        }
        Ok(opts)
    }

    /// Run the selected subcommand, writing its report to `out`.
    pub fn execute(&self, opts: &Options, out: &mut dyn Write) -> Result<()> {
        match &self.command {
            Command::Describe { file, .. } => describe_file(file, opts.indent, out),
            Command::ToUlaw { input, output, .. } => {
                convert_file(input, output, opts.overwrite)?;
                writeln!(out, "Wrote {}", output.display())?;
                Ok(())
            }
            Command::Tags => {
                for tag in riff::registered_tags() {
                    writeln!(out, "{}", tag)?;
                }
                Ok(())
            }
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    let buffer =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    log::info!("Read {} bytes from {}", buffer.len(), path.display());
    Ok(buffer)
}

/// Decode `path` and write its description.
pub fn describe_file(path: &Path, indent: usize, out: &mut dyn Write) -> Result<()> {
    let buffer = read_input(path)?;
    let chunk = riff::decode(&buffer);
    writeln!(
        out,
        "{}{}",
        " ".repeat(indent),
        riff::describe(&chunk, indent)
    )?;
    Ok(())
}

/// Transcode `input` into a mu-law WAVE file at `output`.
pub fn convert_file(input: &Path, output: &Path, overwrite: bool) -> Result<()> {
    if output.exists() && !overwrite {
        bail!(
            "{} already exists (use --force to replace it)",
            output.display()
        );
    }
    let buffer = read_input(input)?;
    let encoded = sound::convert_to_mu_law(&buffer)
        .with_context(|| format!("Failed to transcode {}", input.display()))?;
    fs::write(output, &encoded)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("Wrote {} bytes to {}", encoded.len(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::riff::{riff_form, Chunk, FormatChunk};

    fn pcm_wave() -> Vec<u8> {
        riff_form(
            "WAVE",
            [
                FormatChunk::default().to_chunk(),
                Chunk::new("data", vec![0x00, 0x00, 0xFF, 0x7F]),
            ],
        )
        .to_bytes()
    }

    #[test]
    fn test_parse_describe() {
        let cli = Cli::try_parse_from(["riffkit", "describe", "in.wav", "--indent", "4"]).unwrap();
        let opts = cli.merge_into_options(Options::default()).unwrap();
        assert_eq!(opts.indent, 4);
        assert!(matches!(cli.command, Command::Describe { .. }));
    }

    #[test]
    fn test_merge_log_level() {
        let cli = Cli::try_parse_from(["riffkit", "--log-level", "error", "tags"]).unwrap();
        let opts = cli.merge_into_options(Options::default()).unwrap();
        assert_eq!(opts.log_level, LogLevel::Error);

        let cli = Cli::try_parse_from(["riffkit", "-v", "tags"]).unwrap();
        let opts = cli.merge_into_options(Options::default()).unwrap();
        assert_eq!(opts.log_level, LogLevel::Debug);

        let cli = Cli::try_parse_from(["riffkit", "--log-level", "bogus", "tags"]).unwrap();
        assert!(cli.merge_into_options(Options::default()).is_err());
    }

    #[test]
    fn test_merge_force() {
        let cli = Cli::try_parse_from(["riffkit", "to-ulaw", "a.wav", "b.wav", "--force"]).unwrap();
        let opts = cli.merge_into_options(Options::default()).unwrap();
        assert!(opts.overwrite);
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["riffkit"]).is_err());
    }

    #[test]
    fn test_describe_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.wav");
        fs::write(&path, pcm_wave()).unwrap();

        let mut out = Vec::new();
        describe_file(&path, 0, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "RIFF('WAVE'  fmt (1, 1, 8000, 8000, 1, 8, 0)\n             data())\n"
        );
    }

    #[test]
    fn test_convert_file_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        fs::write(&input, pcm_wave()).unwrap();
        fs::write(&output, b"keep").unwrap();

        assert!(convert_file(&input, &output, false).is_err());
        assert_eq!(fs::read(&output).unwrap(), b"keep");

        convert_file(&input, &output, true).unwrap();
        let form = riff::ChunkRegistry::with_builtins().decode(&fs::read(&output).unwrap());
        assert_eq!(form.find_by_tag("data").unwrap().payload(), &[0xFF, 0x80]);
    }

    #[test]
    fn test_convert_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_file(&dir.path().join("nope.wav"), &dir.path().join("o.wav"), false)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
