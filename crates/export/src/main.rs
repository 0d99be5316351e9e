use std::env;
use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let input_path = env::var("EXPORT_INPUT").unwrap_or_else(|_| "posts.csv".to_string());
    let output_path = env::var("EXPORT_OUTPUT").unwrap_or_else(|_| "inserts.txt".to_string());
    let table = env::var("EXPORT_TABLE").unwrap_or_else(|_| export::DEFAULT_TABLE.to_string());

    let input = File::open(&input_path).with_context(|| format!("opening {}", input_path))?;
    let output =
        File::create(&output_path).with_context(|| format!("creating {}", output_path))?;

    let count = export::export_inserts(input, BufWriter::new(output), &table)?;
    info!(
        "Wrote {} INSERT statements for {} to {}",
        count, table, output_path
    );
    Ok(())
}
