use std::path::PathBuf;

use anyhow::{Context, Result};
use calltrie_core::ingest;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 && args.len() != 4 {
        eprintln!("Usage: calltrie <samples.json> [start end]");
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    let data =
        std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let records = ingest::parse_records(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    log::info!("ingesting {} stack traces", records.len());

    let tree = ingest::build_tree(&records);

    let (start, end) = if args.len() == 4 {
        let start: f64 = args[2].parse().context("start is not a number")?;
        let end: f64 = args[3].parse().context("end is not a number")?;
        (start, end)
    } else {
        // Default to the full ingested range.
        let timestamps = tree.root().timestamps();
        match (timestamps.first(), timestamps.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => (0.0, 0.0),
        }
    };
    log::debug!("profile window [{start}, {end}]");

    let payload = tree.to_cpu_profile_payload(start, end);
    let stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(stdout, &payload).context("failed to write payload")?;
    Ok(())
}
