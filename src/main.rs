//! # tspl CLI
//!
//! Command-line interface for TSPL label printers.
//!
//! ## Usage
//!
//! ```bash
//! # Print an image over the network, scaled to 384 dots
//! tspl --host 192.168.1.50 image --width 384 logo.png
//!
//! # Print text on a USB printer with a custom label setup
//! tspl --device /dev/usb/lp0 --setup label.json text --x 20 --y 20 "Hello"
//!
//! # Show the bytes a job would send
//! tspl --dry-run text "Hello"
//!
//! # Beep / feed one label
//! tspl --host printer.local beep
//! tspl --host printer.local home
//! ```
//!
//! Set `RUST_LOG=debug` for pipeline details.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

use log::info;

use tspl::{
    Connector, TsplError,
    printer::{LabelSetup, Printer, Resolution},
    protocol::{
        commands::BitmapMode,
        text::{Alignment, Rotation, Text},
        units::Unit,
    },
    raster::{Binarizer, DecodeLimits, ImageSource, RasterPath},
    transport::{FileConnector, MemoryConnector, NetworkConnector},
};

/// tspl - TSPL label printer utility
#[derive(Parser, Debug)]
#[command(name = "tspl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Printer device path (e.g. /dev/usb/lp0)
    #[arg(long, global = true, conflicts_with_all = ["host", "out"])]
    device: Option<PathBuf>,

    /// Network printer, HOST or HOST:PORT (port defaults to 9100)
    #[arg(long, global = true, conflicts_with = "out")]
    host: Option<String>,

    /// Write the job to a file instead of a printer
    #[arg(long, value_name = "FILE", global = true)]
    out: Option<PathBuf>,

    /// Print the job to stdout with control and binary bytes escaped
    #[arg(long, global = true)]
    dry_run: bool,

    /// Label setup JSON file
    #[arg(long, value_name = "FILE", global = true)]
    setup: Option<PathBuf>,

    /// Default unit for measurements without one
    #[arg(long, value_enum, global = true)]
    unit: Option<CliUnit>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print an image file
    Image {
        /// Image file (PNG, JPEG, GIF, BMP, ...)
        file: PathBuf,

        /// Target width in dots (floored to a multiple of 8)
        #[arg(long, conflicts_with = "fit")]
        width: Option<u32>,

        /// Target height in dots (source height when omitted)
        #[arg(long)]
        height: Option<u32>,

        /// Scale to the label width from the setup
        #[arg(long)]
        fit: bool,

        /// Print head resolution used by --fit
        #[arg(long, value_enum, default_value = "203")]
        dpi: CliResolution,

        /// X position in dots
        #[arg(long, default_value = "0")]
        x: u32,

        /// Y position in dots
        #[arg(long, default_value = "0")]
        y: u32,

        /// Bitmap drawing mode
        #[arg(long, value_enum, default_value = "overwrite")]
        mode: CliBitmapMode,

        /// Binarization path
        #[arg(long, value_enum, default_value = "auto")]
        path: CliRasterPath,

        /// Worker threads for binarization
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Print one line of text
    Text {
        /// Text to print
        content: String,

        /// X position in dots
        #[arg(long, default_value = "0")]
        x: u32,

        /// Y position in dots
        #[arg(long, default_value = "0")]
        y: u32,

        /// Font name ("1".."8", or a downloaded font)
        #[arg(long, default_value = "3")]
        font: String,

        /// Clockwise rotation in degrees
        #[arg(long, value_enum, default_value = "0")]
        rotation: CliRotation,

        /// Horizontal multiplication
        #[arg(long, default_value = "1")]
        x_mul: u32,

        /// Vertical multiplication
        #[arg(long, default_value = "1")]
        y_mul: u32,

        /// Alignment (omitted from the directive when not given)
        #[arg(long, value_enum)]
        align: Option<CliAlignment>,
    },

    /// Sound the buzzer
    Beep,

    /// Feed to the start of the next label
    Home,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliUnit {
    Inch,
    Mm,
    Dot,
}

impl From<CliUnit> for Unit {
    fn from(unit: CliUnit) -> Self {
        match unit {
            CliUnit::Inch => Unit::Inch,
            CliUnit::Mm => Unit::Millimeter,
            CliUnit::Dot => Unit::Dot,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliResolution {
    #[value(name = "203")]
    Dpi203,
    #[value(name = "300")]
    Dpi300,
}

impl From<CliResolution> for Resolution {
    fn from(dpi: CliResolution) -> Self {
        match dpi {
            CliResolution::Dpi203 => Resolution::Dpi203,
            CliResolution::Dpi300 => Resolution::Dpi300,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliBitmapMode {
    Overwrite,
    Or,
    Xor,
}

impl From<CliBitmapMode> for BitmapMode {
    fn from(mode: CliBitmapMode) -> Self {
        match mode {
            CliBitmapMode::Overwrite => BitmapMode::Overwrite,
            CliBitmapMode::Or => BitmapMode::Or,
            CliBitmapMode::Xor => BitmapMode::Xor,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliRasterPath {
    Auto,
    Generic,
    Codec,
}

impl From<CliRasterPath> for RasterPath {
    fn from(path: CliRasterPath) -> Self {
        match path {
            CliRasterPath::Auto => RasterPath::Auto,
            CliRasterPath::Generic => RasterPath::Generic,
            CliRasterPath::Codec => RasterPath::Codec,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliRotation {
    #[value(name = "0")]
    R0,
    #[value(name = "90")]
    R90,
    #[value(name = "180")]
    R180,
    #[value(name = "270")]
    R270,
}

impl From<CliRotation> for Rotation {
    fn from(rotation: CliRotation) -> Self {
        match rotation {
            CliRotation::R0 => Rotation::None,
            CliRotation::R90 => Rotation::Cw90,
            CliRotation::R180 => Rotation::Cw180,
            CliRotation::R270 => Rotation::Cw270,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliAlignment {
    Default,
    Left,
    Center,
    Right,
}

impl From<CliAlignment> for Alignment {
    fn from(align: CliAlignment) -> Self {
        match align {
            CliAlignment::Default => Alignment::Default,
            CliAlignment::Left => Alignment::Left,
            CliAlignment::Center => Alignment::Center,
            CliAlignment::Right => Alignment::Right,
        }
    }
}

fn main() {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), TsplError> {
    let cli = Cli::parse();

    let mut setup = match &cli.setup {
        Some(path) => LabelSetup::load(path)?,
        None => LabelSetup::default(),
    };
    if let Some(unit) = cli.unit {
        setup = setup.with_default_unit(Some(unit.into()));
    }

    if cli.dry_run {
        return dry_run(setup, &cli.command, &mut std::io::stdout().lock());
    }

    let connector: Box<dyn Connector> = if let Some(host) = &cli.host {
        Box::new(NetworkConnector::connect(host)?)
    } else if let Some(out) = &cli.out {
        Box::new(FileConnector::create(out)?)
    } else if let Some(device) = &cli.device {
        Box::new(FileConnector::open(device)?)
    } else {
        Box::new(FileConnector::open(tspl::transport::file::DEFAULT_DEVICE)?)
    };

    let mut printer = Printer::new(connector, setup);
    execute(&mut printer, &cli.command)?;
    printer.close()?;
    info!("done");
    Ok(())
}

fn execute<C: Connector>(printer: &mut Printer<C>, command: &Commands) -> Result<(), TsplError> {
    match command {
        Commands::Image {
            file,
            width,
            height,
            fit,
            dpi,
            x,
            y,
            mode,
            path,
            threads,
        } => {
            let mut binarizer = Binarizer::new()
                .raster_path((*path).into())
                .limits(DecodeLimits {
                    threads: *threads,
                    ..DecodeLimits::default()
                });
            let target_width = if *fit {
                Some(printer.setup().width_dots((*dpi).into()))
            } else {
                *width
            };
            if let Some(w) = target_width {
                binarizer = binarizer.target_width(w);
            }
            if let Some(h) = height {
                binarizer = binarizer.target_height(*h);
            }

            let image = binarizer.binarize(ImageSource::Path(file))?;
            info!(
                "printing {} ({}x{} dots)",
                file.display(),
                image.width(),
                image.height()
            );
            printer.print_image_with_mode(&image, *x, *y, (*mode).into())
        }
        Commands::Text {
            content,
            x,
            y,
            font,
            rotation,
            x_mul,
            y_mul,
            align,
        } => {
            let mut text = Text::new(*x, *y, content.as_str())
                .font(font.as_str())
                .rotation((*rotation).into())
                .scale(*x_mul, *y_mul);
            if let Some(align) = align {
                text = text.align((*align).into());
            }
            printer.print_text(&text)
        }
        Commands::Beep => printer.beep(),
        Commands::Home => printer.home(),
    }
}

/// Run `command` against a memory connector and write only the escaped job
/// bytes to `out`.
fn dry_run(setup: LabelSetup, command: &Commands, out: &mut impl Write) -> Result<(), TsplError> {
    let mut printer = Printer::new(MemoryConnector::new(), setup);
    execute(&mut printer, command)?;
    let conn = printer.close()?;
    for job in conn.writes() {
        out.write_all(escape(job).as_bytes())?;
    }
    Ok(())
}

/// Render job bytes for a terminal: CR and LF are shown as `\r\n` followed
/// by a real newline, other non-printable bytes as `\xNN`.
fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\n' => out.push_str("\\n\n"),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(b as char),
            b'\r' => out.push_str("\\r"),
            _ => out.push_str(&format!("\\x{:02X}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(b"CLS\r\n"), "CLS\\r\\n\n");
        assert_eq!(escape(&[b'A', 0x00, 0xFF]), "A\\x00\\xFF");
        assert_eq!(escape(b"a\\b"), "a\\\\b");
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["tspl", "--dry-run", "text", "--x", "5", "hi"]).unwrap();
        assert!(cli.dry_run);
        assert!(matches!(cli.command, Commands::Text { x: 5, .. }));
    }

    #[test]
    fn test_dry_run_output_is_only_the_job() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("black.png");
        image::GrayImage::from_pixel(8, 1, image::Luma([0]))
            .save(&path)
            .unwrap();

        let cli = Cli::try_parse_from(["tspl", "--dry-run", "image", path.to_str().unwrap()])
            .unwrap();
        let mut out = Vec::new();
        dry_run(LabelSetup::default(), &cli.command, &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("SIZE 35,25\\r\\n\n"), "{out}");
        assert!(out.contains("BITMAP 0,0,1,1,0,\\x00\\r\\n\n"), "{out}");
        assert!(out.ends_with("EOP\\r\\n\n"), "{out}");
    }

    #[test]
    fn test_cli_rejects_two_targets() {
        assert!(Cli::try_parse_from(["tspl", "--host", "a", "--out", "b", "beep"]).is_err());
    }
}
