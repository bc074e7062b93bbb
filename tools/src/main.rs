//! dataset-runner: headless dataset generator for the poverty-risk model.
//!
//! Usage:
//!   dataset-runner --profiles 1000 --seed 12345 --out ./data
//!   dataset-runner --config dataset.json --db profiles.db

use anyhow::Result;
use echowealth_core::{
    config::DatasetConfig,
    error::DatasetError,
    pipeline::{new_run_id, publish, DatasetPipeline, GenerationRun},
    writer::{DatasetMetadata, DatasetWriter, WrittenArtifacts},
};
use std::env;

const KNOWN_FLAGS: [&str; 5] = ["--profiles", "--seed", "--out", "--db", "--config"];

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    for flag in args.iter().skip(1).filter(|a| a.starts_with("--")) {
        if !KNOWN_FLAGS.contains(&flag.as_str()) {
            log::warn!("Unknown flag: {flag}");
        }
    }

    let mut config = match flag_value(&args, "--config") {
        Some(path) => DatasetConfig::load(path)?,
        None => DatasetConfig::default(),
    };
    if let Some(raw) = flag_value(&args, "--profiles") {
        let requested: i64 = raw.parse()?;
        config.profile_count = usize::try_from(requested)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(DatasetError::InvalidProfileCount { requested })?;
    }
    if let Some(seed) = flag_value(&args, "--seed").map(str::parse::<u64>).transpose()? {
        config.seed = Some(seed);
    }
    if let Some(out) = flag_value(&args, "--out") {
        config.output_dir = out.to_string();
    }
    if let Some(db) = flag_value(&args, "--db") {
        config.db_path = Some(db.to_string());
    }

    // Unseeded runs still get a recorded seed so they can be replayed.
    let seed = config.seed.unwrap_or_else(clock_seed);
    let run_id = new_run_id();

    println!("EchoWealth dataset-runner");
    println!("  run_id:    {run_id}");
    println!("  seed:      {seed}");
    println!("  profiles:  {}", config.profile_count);
    println!("  out:       {}", config.output_dir);
    println!();

    let pipeline = DatasetPipeline::new(run_id, seed);
    let run = pipeline.run(config.profile_count)?;
    let generated_at = chrono::Utc::now();

    let writer = DatasetWriter::new(&config.output_dir);
    let (metadata, artifacts) = publish(
        &run,
        &writer,
        config.db_path.as_deref(),
        env!("CARGO_PKG_VERSION"),
        generated_at,
    )?;

    print_summary(&run, &metadata, &artifacts);
    Ok(())
}

fn print_summary(run: &GenerationRun, metadata: &DatasetMetadata, artifacts: &WrittenArtifacts) {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:        {}", run.run_id);
    println!("  samples:       {}", metadata.sample_count);
    println!("  features:      {}", metadata.feature_count);
    println!(
        "  label range:   {:.3} - {:.3}",
        metadata.label_min, metadata.label_max
    );
    println!("  label mean:    {:.3}", metadata.label_mean);
    println!("  features file: {}", artifacts.features.display());
    println!("  labels file:   {}", artifacts.labels.display());
    println!("  metadata file: {}", artifacts.metadata.display());
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
