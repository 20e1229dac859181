use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dctar::compression;
use dctar::{Codec, Format};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod settings;
use settings::Settings;

#[derive(Parser)]
#[command(name = "dctar", version, about = "In-memory gzip and zlib compression")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true, env = "DCTAR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Files {
    /// Input file (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Compress the whole input
    Compress {
        /// gzip or zlib (default: from config, else gzip)
        #[arg(short, long)]
        format: Option<Format>,

        #[command(flatten)]
        files: Files,
    },

    /// Decompress the whole input
    Decompress {
        /// gzip or zlib (default: detect from the input)
        #[arg(short, long)]
        format: Option<Format>,

        /// Refuse to produce more than this many bytes
        #[arg(long)]
        max_size: Option<usize>,

        #[command(flatten)]
        files: Files,
    },

    /// Print the format of the input: gzip, zlib or unknown
    Detect {
        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => {
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    let mut ofile: Box<dyn Write> = match path {
        Some(path) if path != Path::new("-") => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        _ => Box::new(io::stdout().lock()),
    };

    ofile.write_all(data)?;
    ofile.flush()?;
    Ok(())
}

fn cmd_compress(settings: &Settings, format: Option<Format>, files: &Files) -> Result<()> {
    let format = format.or(settings.format).unwrap_or(Format::Gzip);
    let codec = Codec::new(settings.limits);

    let data = read_input(files.input.as_deref())?;
    let packed = codec
        .compress(format, &data)
        .with_context(|| format!("{} compression failed", format))?;
    info!(%format, input_len = data.len(), output_len = packed.len(), "compressed");

    write_output(files.output.as_deref(), &packed)
}

fn cmd_decompress(
    settings: &Settings,
    format: Option<Format>,
    max_size: Option<usize>,
    files: &Files,
) -> Result<()> {
    let mut limits = settings.limits;
    if let Some(max_size) = max_size {
        limits.max_output_len = max_size;
    }
    let codec = Codec::new(limits);

    let data = read_input(files.input.as_deref())?;
    let (format, out) = match format {
        Some(format) => (format, codec.decompress_as(format, &data)?),
        None => codec.decompress(&data)?,
    };
    info!(%format, input_len = data.len(), output_len = out.len(), "decompressed");

    write_output(files.output.as_deref(), &out)
}

fn cmd_detect(input: Option<&Path>) -> Result<()> {
    let data = read_input(input)?;
    match compression::detect_format(&data) {
        Some(format) => {
            println!("{}", format);
            Ok(())
        }
        None => {
            println!("unknown");
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match &cli.command {
        Command::Compress { format, files } => cmd_compress(&settings, *format, files),
        Command::Decompress {
            format,
            max_size,
            files,
        } => cmd_decompress(&settings, *format, *max_size, files),
        Command::Detect { input } => cmd_detect(input.as_deref()),
    }
}
