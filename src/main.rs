use anyhow::Result;
use clap::{ArgAction, Parser};
use playlist_converter::export::{BatchReport, OutputFormat};
use playlist_converter::validation::{validate_export, validate_json, validate_xml};
use playlist_converter::{ConvertConfig, ConvertPipeline};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "playlist-converter")]
#[command(
    about = "Convert Rekordbox m3u8/KUVO txt playlist exports to Rekordbox 5 XML and Tribe XR JSON",
    long_about = None
)]
struct Args {
    /// Directory containing the playlist(s) exported from Rekordbox
    #[arg(short = 's', long, default_value = ".")]
    source: String,

    /// Directory to write the converted playlist(s) to
    #[arg(short = 'd', long, default_value = ".")]
    dest: String,

    /// Convert a single playlist (file name without extension) instead of
    /// every playlist in the source directory
    #[arg(short = 'p', long)]
    playlist: Option<String>,

    /// Produce Tribe XR JSON
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    json: bool,

    /// Produce Rekordbox 5 XML (needs the KUVO .txt next to the .m3u8)
    #[arg(long, value_name = "BOOL", default_value_t = false, action = ArgAction::Set)]
    xml: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Only validate existing output (don't convert)
    #[arg(long)]
    validate: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Expand ~ in paths
    let source = shellexpand::tilde(&args.source);
    let dest = shellexpand::tilde(&args.dest);

    let config = ConvertConfig::new(
        PathBuf::from(source.as_ref()),
        PathBuf::from(dest.as_ref()),
    )
    .with_playlist(args.playlist)
    .with_json(args.json)
    .with_xml(args.xml);

    if !config.json && !config.xml {
        log::warn!("Both --json and --xml are false, nothing to do");
        return Ok(());
    }

    // If validate-only mode, just validate and exit
    if args.validate {
        log::info!("Validation mode - checking existing output...");
        let count = validate_export(&config)?;
        log::info!("✅ Validated {} playlist file(s)", count);
        return Ok(());
    }

    let pipeline = ConvertPipeline::new(config);
    let report = pipeline.run()?;

    log::info!("Running post-conversion validation...");
    validate_written(&report)?;

    let failed = report.failed_count();
    if failed > 0 {
        anyhow::bail!(
            "{} of {} conversion(s) failed",
            failed,
            report.outcomes.len()
        );
    }

    Ok(())
}

fn validate_written(report: &BatchReport) -> Result<()> {
    for (outcome, path) in report.written() {
        match outcome.format {
            OutputFormat::Xml => {
                validate_xml(path)?;
            }
            OutputFormat::Json => {
                validate_json(path)?;
            }
        }
    }
    if report.written_count() > 0 {
        log::info!("✅ Validation passed!");
    }
    Ok(())
}
