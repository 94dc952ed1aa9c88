use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

mod bmp;

#[derive(Debug, ClapParser)]
#[command(
    name       = env!("CARGO_PKG_NAME"),
    version    = env!("CARGO_PKG_VERSION"),
    about      = "Convert between bitonal BMP (*.bmp) and ISBIC (*.isb) files",
    long_about = None,
)]
struct Cli {
    /// Input file, a `.bmp` is compressed, anything else is decoded as ISBIC.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

fn is_bmp(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init()?;

    if is_bmp(&cli.input) {
        cmd_compress(&cli.input, &cli.output)
    } else {
        cmd_decompress(&cli.input, &cli.output)
    }
}

fn cmd_compress(input: &Path, output: &Path) -> Result<()> {
    let bitmap = bmp::read(input)?;
    log::info!(
        "Compressing a {} x {} bitmap as ISBIC data",
        bitmap.width(),
        bitmap.height()
    );

    let file = File::create(output)
        .with_context(|| format!("Error opening file {}", output.display()))?;
    let raster = bitmap.as_raster();
    let size = isbic::compress_to(&raster, BufWriter::new(file))
        .with_context(|| format!("Error writing file {}", output.display()))?;

    let raw = raster.pitch() * raster.height() as usize;
    log::info!(
        "ISBIC image successfully created. {} bytes = {:.1}:1 compression",
        size,
        raw as f64 / size as f64
    );
    Ok(())
}

fn cmd_decompress(input: &Path, output: &Path) -> Result<()> {
    log::info!("Converting from ISBIC to BMP");
    let data = fs::read(input)
        .with_context(|| format!("Error opening input file {}", input.display()))?;
    let decoder = isbic::Decoder::new(&data).context("The ISBIC file has a problem")?;

    log::info!(
        "Creating {} x {} bitonal BMP file",
        decoder.width(),
        decoder.height()
    );
    let (width, height) = (decoder.width(), decoder.height());
    bmp::write(output, width, height, decoder)
}
