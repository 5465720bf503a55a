extern crate serde;

mod encoder;
mod error;
mod model;
mod pages;
mod records;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use env_logger::{Builder, Env};
use log::{debug, info, warn, LevelFilter};
use polars::frame::DataFrame;
use polars::prelude::*;

use encoder::ExpectedSchema;
use error::AppError;
use model::{load_model, PredictionService};
use pages::SessionContext;
use records::HeartRecord;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(short, long, parse(from_os_str), default_value = "data/Random_forest_model.json",
    help = "Trained model artifact")]
    model: PathBuf,
    #[clap(short, long, parse(from_os_str), default_value = "data/heart.csv",
    help = "Reference dataset")]
    data: PathBuf,
    #[clap(short, long, parse(from_occurrences),
    help = "Verbose level")]
    verbose: usize,
}

pub async fn read_dataset<P: AsRef<Path>>(path: P) -> Result<DataFrame, AppError> {
    let path = path.as_ref();
    let missing = |detail: String| AppError::MissingArtifact {
        path: path.to_path_buf(),
        detail,
    };

    let file = File::open(path).map_err(|e| missing(e.to_string()))?;
    CsvReader::new(file)
        .has_header(true)
        .with_dtypes(Option::from(Arc::new(HeartRecord::raw_schema())))
        .finish()
        .map_err(|e| missing(e.to_string()))
}

fn check_dataset(df: &DataFrame) {
    info!("reference dataset: {} rows, {} columns", df.height(), df.width());
    for name in HeartRecord::RAW_COLUMNS {
        if !df.get_column_names().contains(&name) {
            warn!("reference dataset is missing column '{name}'");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = match args.verbose {
        1 => LevelFilter::Debug,
        2 => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    let env = Env::new().filter("HEARTBEATS_LOG");
    Builder::new()
        .filter(Some("heartbeats"), log_level)
        .parse_env(env)
        .init();

    // Startup failures are fatal: nothing is served without both artifacts.
    let forest = load_model(&args.model).await?;
    let schema = ExpectedSchema::from_columns(forest.feature_names.clone());
    if schema.is_empty() {
        return Err(AppError::SchemaMismatch.into());
    }
    info!(
        "model loaded: {} trees, {} expected feature columns",
        forest.trees.len(),
        schema.len()
    );
    debug!("expected columns: {:?}", schema.columns());

    let df = read_dataset(&args.data).await?;
    check_dataset(&df);

    let service = PredictionService::new(forest);
    let mut ctx = SessionContext::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    pages::run_session(&mut ctx, &service, &schema, &mut input, &mut out)?;

    Ok(())
}
