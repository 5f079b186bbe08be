//! Stitchprep: BigStitcher input preparation for tiled microscopy scans.
//!
//! Stitchprep turns scan-acquisition metadata into a BigStitcher dataset
//! description and renders the ImageJ macros that register and fuse the
//! tiles. It never touches pixel data; every output is text.
//!
//! # Modules
//!
//! - [`tiles`]: Tile records, per-channel arrangement and dataset XML
//! - [`macros`]: Stitching/fusion parameters and macro rendering
//! - [`pipeline`]: Metadata file to dataset description in one call
//! - [`error`]: Error types for stitchprep operations

pub mod error;
pub mod macros;
pub mod pipeline;
pub mod tiles;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::StitchPrepError;

/// The stitchprep CLI application.
#[derive(Parser)]
#[command(name = "stitchprep")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Arrange tiles from acquisition metadata and write the dataset description.
    Arrange(ArrangeArgs),
    /// Write the BigStitcher stitching macro from a parameter file.
    StitchMacro(StitchMacroArgs),
    /// Write the BigStitcher fusion macro.
    FuseMacro(FuseMacroArgs),
}

/// Arguments for the arrange subcommand.
#[derive(clap::Args)]
struct ArrangeArgs {
    /// Acquisition metadata XML file.
    metadata: PathBuf,

    /// Tile file name pattern, e.g. 'scan_m{xxx}_DAPI_ORG.tif'.
    #[arg(long)]
    pattern: String,

    /// Channel whose tiles are arranged.
    #[arg(long, default_value_t = 0)]
    channel: u32,

    /// Dataset description output file.
    #[arg(long, default_value = "dataset_gen.xml")]
    output: PathBuf,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

/// Arguments for the stitch-macro subcommand.
#[derive(clap::Args)]
struct StitchMacroArgs {
    /// Stitching parameters (.yaml/.yml or .json).
    #[arg(long, env = "STITCHPREP_CONFIG")]
    config: PathBuf,

    /// Override the region number used in the macro file name.
    #[arg(long)]
    region: Option<u32>,
}

/// Arguments for the fuse-macro subcommand.
#[derive(clap::Args)]
struct FuseMacroArgs {
    /// Channel directory containing the dataset description.
    #[arg(long)]
    img_dir: PathBuf,

    /// Directory for the fused TIFF stacks.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Dataset description file name inside the image directory.
    #[arg(long, default_value = "dataset.xml")]
    xml_file_name: String,
}

/// Run the stitchprep CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), StitchPrepError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Arrange(args)) => run_arrange(args),
        Some(Commands::StitchMacro(args)) => run_stitch_macro(args),
        Some(Commands::FuseMacro(args)) => run_fuse_macro(args),
        None => {
            println!("stitchprep {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("BigStitcher input preparation for tiled microscopy scans.");
            println!();
            println!("Run 'stitchprep --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the arrange subcommand.
fn run_arrange(args: ArrangeArgs) -> Result<(), StitchPrepError> {
    if !matches!(args.report.as_str(), "text" | "json") {
        return Err(StitchPrepError::ConfigValidation {
            field: "report",
            message: format!("'{}' (supported: text, json)", args.report),
        });
    }

    let layout = pipeline::describe_acquisition(
        &args.metadata,
        tiles::ChannelId::new(args.channel),
        &args.pattern,
        &args.output,
    )?;

    if args.report == "json" {
        let json =
            serde_json::to_string_pretty(&layout).map_err(StitchPrepError::ReportSerialize)?;
        println!("{json}");
    } else {
        print!("{layout}");
        println!("Wrote {}", args.output.display());
    }
    Ok(())
}

/// Execute the stitch-macro subcommand.
fn run_stitch_macro(args: StitchMacroArgs) -> Result<(), StitchPrepError> {
    let mut config = macros::MacroConfig::load(&args.config)?;
    if let Some(region) = args.region {
        config.region = region;
    }

    let path = macros::generate_stitch_macro(&config)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Execute the fuse-macro subcommand.
fn run_fuse_macro(args: FuseMacroArgs) -> Result<(), StitchPrepError> {
    let config = macros::FuseConfig {
        img_dir: args.img_dir,
        out_dir: args.out_dir,
        xml_file_name: args.xml_file_name,
    };

    let path = macros::generate_fuse_macro(&config)?;
    println!("Wrote {}", path.display());
    Ok(())
}
