use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use weekly_bars::{
    config::Config,
    dataset::build_dataset,
    db,
    import::{ImportReport, import_stock_info_path, import_weekly_path},
    suspension::{fill_suspensions, repo::SqliteBarRepo},
};

#[derive(Parser)]
#[command(version, about = "Weekly bar store CLI")]
struct Cli {
    /// Optional TOML config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// SQLite path or sqlite:// URL; overrides the config file and DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Create or upgrade the schema
    Migrate,
    /// Load CSV files into the store
    Import(ImportCmd),
    /// Insert flat rows for suspended weeks
    Fill,
    /// Export the per-instrument dataset as JSON
    Dataset {
        /// Write JSON here instead of printing a preview
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Override `dataset.min_weeks`
        #[arg(long)]
        min_weeks: Option<usize>,
        /// Keep ST instruments
        #[arg(long)]
        include_st: bool,
    },
}

#[derive(Args)]
struct ImportCmd {
    #[command(subcommand)]
    sub: ImportSub,
}

#[derive(Subcommand)]
enum ImportSub {
    /// Weekly bars into weekly_qfq
    Weekly {
        #[arg(long = "file", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
    /// Company metadata into stock_info
    StockInfo {
        #[arg(long = "file", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => Config::load_path(path)?,
        None => Config::default(),
    };
    let db_url = cfg.database_url(cli.database_url.as_deref())?;

    match cli.cmd {
        Cmd::Migrate => {
            let applied = db::migrate::run_sqlite(&db_url)?;
            info!(applied, "migrations complete");
        }
        Cmd::Import(ImportCmd { sub }) => {
            let mut conn = db::open(&db_url)?;
            let mut total = ImportReport::default();
            let (files, weekly) = match sub {
                ImportSub::Weekly { files } => (files, true),
                ImportSub::StockInfo { files } => (files, false),
            };
            for file in &files {
                let r = if weekly {
                    import_weekly_path(&mut conn, file)?
                } else {
                    import_stock_info_path(&mut conn, file)?
                };
                total.read += r.read;
                total.imported += r.imported;
                total.dropped += r.dropped;
            }
            info!(files = files.len(), %total, "import complete");
        }
        Cmd::Fill => {
            let mut conn = db::open(&db_url)?;
            let summary = fill_suspensions(&SqliteBarRepo::new(), &mut conn)?;
            eprint!("{summary}");
        }
        Cmd::Dataset {
            out,
            min_weeks,
            include_st,
        } => {
            let mut conn = db::open(&db_url)?;
            let mut dcfg = cfg.dataset.clone();
            if let Some(n) = min_weeks {
                dcfg.min_weeks = n;
            }
            if include_st {
                dcfg.exclude_st = false;
            }
            dcfg.validate()?;
            let dataset = build_dataset(&mut conn, &dcfg)?;

            match out {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    serde_json::to_writer_pretty(BufWriter::new(file), &dataset)?;
                    info!(
                        instruments = dataset.instruments.len(),
                        file = %path.display(),
                        "dataset written"
                    );
                }
                None => {
                    println!("instruments: {}", dataset.instruments.len());
                    for (code, item) in dataset.instruments.iter().take(3) {
                        let info = &item.stock_info.info;
                        println!("{code}");
                        println!(
                            "  name: {}  exchange: {:?}",
                            info.name.as_deref().unwrap_or("unknown"),
                            item.stock_info.exchange
                        );
                        println!(
                            "  industry: {}  listed: {}",
                            info.industry.as_deref().unwrap_or("unknown"),
                            info.list_date.as_deref().unwrap_or("unknown")
                        );
                        if let (Some(first), Some(last)) =
                            (item.weekly_qfq.first(), item.weekly_qfq.last())
                        {
                            println!(
                                "  weeks: {}  first: {}  last: {}",
                                item.weekly_qfq.len(),
                                first.trade_date,
                                last.trade_date
                            );
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
