//! # inkcrate CLI Application
//!
//! Command-line interface driving the harvest one stage at a time. Each
//! stage reads the previous stage's output from disk, so a run can be
//! inspected and resumed between stages.
//!
//! ## Subcommands
//!
//! - `list`: request the catalog's results table and write a listing manifest
//! - `gather`: download the detail data of every listed record
//! - `collect`: turn downloaded detail data into a collection manifest
//! - `package`: write an RO-Crate for a collection
//! - `validate`: check a written RO-Crate

mod telemetry;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, instrument, warn};

use inkcrate::config::{PipelineOptions, user_agent};
use inkcrate::gather::{self, GatherOptions};
use inkcrate::http::HttpFetcher;
use inkcrate::lister::{self, ListerConfig, SearchQuery};
use inkcrate::package::{self, PackageOptions};
use inkcrate::storage::LocalFilesystem;

#[derive(Parser)]
#[command(author, version, about = "Harvest INK Mediathek records into RO-Crates", long_about = None)]
struct Cli {
    /// Emit extra diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List catalog records for a search term or collection
    List(ListArgs),

    /// Download the detail data of listed records
    Gather(GatherArgs),

    /// Build a collection manifest from downloaded detail data
    Collect(CollectArgs),

    /// Package a collection as an RO-Crate
    Package(PackageArgs),

    /// Validate an RO-Crate
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Search term
    #[arg(short, long, conflicts_with = "collection")]
    search: Option<String>,

    /// Catalog collection number
    #[arg(short, long, default_value = "0")]
    collection: u32,

    /// Language of the results table
    #[arg(short, long, default_value = lister::config::DEFAULT_LANGUAGE)]
    language: String,

    /// Number of results to request
    #[arg(short, long, default_value = "10")]
    results: u32,

    /// Also write a checklist of titles and URLs
    #[arg(long)]
    checklist: bool,

    /// Write `<OUTPUT>.manifest` instead of printing to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GatherArgs {
    /// Listing manifest written by `list`
    #[arg(short, long)]
    manifest: PathBuf,

    /// Directory to download detail data into
    #[arg(short, long, default_value = gather::DEFAULT_DATA_DIR)]
    data: PathBuf,

    /// Pause between requests in milliseconds
    #[arg(short, long, default_value = "1000")]
    pause_ms: u64,
}

#[derive(Args, Debug)]
struct CollectArgs {
    /// Directory holding downloaded detail data
    #[arg(short, long, default_value = gather::DEFAULT_DATA_DIR)]
    data: PathBuf,

    /// Write `<OUTPUT>.collection` instead of printing to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PackageArgs {
    /// Collection manifest written by `collect`
    #[arg(short, long)]
    collection: PathBuf,

    /// User metadata describing the crate
    #[arg(short, long)]
    meta: PathBuf,

    /// Directory to create the crate in
    #[arg(short, long, default_value = package::build::DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Name of the ancillary directory
    #[arg(short, long, default_value = package::layout::DEFAULT_ANCILLARY_DIR)]
    ancillary: String,

    /// Do not download media files and posters
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Crate directory or its ro-crate-metadata.json
    #[arg(short, long)]
    path: PathBuf,

    /// Check that every file listed in the crate exists
    #[arg(short, long)]
    check_paths: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _otel = telemetry::init_tracing_subscriber(cli.verbose);

    match cli.command {
        Some(Commands::List(args)) => {
            list_command(args, PipelineOptions::new(false, cli.verbose)).await?;
        }
        Some(Commands::Gather(args)) => {
            gather_command(args, PipelineOptions::new(false, cli.verbose)).await?;
        }
        Some(Commands::Collect(args)) => {
            collect_command(args, PipelineOptions::new(false, cli.verbose)).await?;
        }
        Some(Commands::Package(args)) => {
            let pipeline = PipelineOptions::new(args.dry_run, cli.verbose);
            package_command(args, pipeline).await?;
        }
        Some(Commands::Validate(args)) => {
            validate_command(args).await?;
        }
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["inkcrate", "--help"]);
        }
    }

    Ok(())
}

fn progress_bar(len: usize) -> anyhow::Result<ProgressBar> {
    let progress_bar = ProgressBar::new(len as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")?
            .progress_chars("##-"),
    );
    Ok(progress_bar)
}

#[instrument]
async fn list_command(args: ListArgs, pipeline: PipelineOptions) -> anyhow::Result<()> {
    let query = SearchQuery::from_args(args.search.as_deref(), args.collection)?;
    let config = ListerConfig::builder()
        .language(args.language)
        .results(args.results)
        .build();

    let fetcher = HttpFetcher::new(&user_agent())?;
    let records = lister::list_records(&fetcher, &config, &query, pipeline).await?;

    match args.output {
        Some(output) => {
            let written =
                lister::write_listing(&LocalFilesystem::new(), &records, &output, args.checklist).await?;
            for path in written {
                println!("Wrote {}", path.display());
            }
        }
        None => {
            print!("{}", lister::manifest::to_json_lines(&records)?);
            if args.checklist {
                println!("{}", lister::manifest::checklist(&records)?);
            }
        }
    }

    Ok(())
}

#[instrument]
async fn gather_command(args: GatherArgs, pipeline: PipelineOptions) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(&args.manifest).await?;
    let records = lister::read_manifest(&text)?;
    println!("Gathering {} records into {}...", records.len(), args.data.display());

    let options = GatherOptions {
        data_dir: args.data,
        pause: Duration::from_millis(args.pause_ms),
    };
    let fetcher = HttpFetcher::new(&user_agent())?;

    let progress = progress_bar(records.len())?;
    let written = gather::download_records(
        &fetcher,
        &LocalFilesystem::new(),
        &records,
        &options,
        pipeline,
        Some(&progress),
    )
    .await?;
    progress.finish_with_message("Gathering completed");

    println!("Downloaded {} detail records", written.len());
    Ok(())
}

#[instrument]
async fn collect_command(args: CollectArgs, pipeline: PipelineOptions) -> anyhow::Result<()> {
    let records = gather::load_records(&args.data).await?;
    let normalized = gather::make_collection(&records, pipeline);

    for diagnostic in &normalized.diagnostics {
        warn!("{}", diagnostic);
    }
    info!(
        "Collected {} items, skipped {}",
        normalized.collection.items().len(),
        normalized.skipped().count()
    );

    match args.output {
        Some(output) => {
            let path = gather::write_collection(&LocalFilesystem::new(), &normalized.collection, &output)
                .await?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", gather::collection_json(&normalized.collection)?),
    }

    Ok(())
}

#[instrument]
async fn package_command(args: PackageArgs, pipeline: PipelineOptions) -> anyhow::Result<()> {
    let collection = package::read_collection(&args.collection).await?;
    let metadata = package::read_metadata(&args.meta).await?;
    if pipeline.verbose {
        info!("User metadata:\n{}", metadata);
    }

    let options = PackageOptions::new(args.output).with_ancillary_dir(args.ancillary);
    let fetcher = HttpFetcher::new(&user_agent())?;

    let downloads = collection.media_urls().len() + collection.poster_urls().len();
    let progress = progress_bar(if pipeline.dry_run { 0 } else { downloads })?;
    let summary = package::build_package(
        &fetcher,
        &LocalFilesystem::new(),
        &collection,
        &metadata,
        &options,
        pipeline,
        Some(&progress),
    )
    .await?;
    progress.finish_with_message("Packaging completed");

    println!(
        "Packaged {} files ({} downloaded) into {}",
        summary.parts.len(),
        summary.downloaded,
        summary.layout.root.display()
    );
    println!("Metadata: {}", summary.metadata_path.display());
    Ok(())
}

#[instrument]
async fn validate_command(args: ValidateArgs) -> anyhow::Result<()> {
    let report = package::validate_package(&args.path, args.check_paths).await?;

    if !report.is_valid() {
        for issue in &report.issues {
            eprintln!("{}", issue);
        }
        bail!("RO-Crate is invalid: {} issues", report.issues.len());
    }

    if args.check_paths {
        println!("{} files correctly added to RO-Crate", report.checked_parts);
    }
    println!("RO-Crate is valid!");
    Ok(())
}
