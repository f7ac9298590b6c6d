mod activity;

use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::{Context, Result};
use chainring::{
    avec::{encoder::Encoder, writer::WriterSink},
    profile,
};
use chrono::{Local, Utc};
use clap::Parser;
use rand::{Rng, SeedableRng, rngs::StdRng};

use activity::Settings;

#[derive(Parser)]
#[command(
    name = "encode-activity",
    about = "Encode a synthetic activity, with developer fields, into a FIT file"
)]
struct Cli {
    /// Output file path
    #[arg(short, long, default_value = "ActivityEncodeRecipe.fit")]
    output: PathBuf,

    /// Number of record messages, one per second
    #[arg(short = 'n', long, default_value_t = 5601)]
    samples: u32,

    /// Seed for the generated heart rate (random if not specified)
    #[arg(long)]
    seed: Option<u64>,

    /// Offset of local time from UTC in seconds (the system's offset if not specified)
    #[arg(long, allow_hyphen_values = true)]
    utc_offset: Option<i32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let start = profile::timestamp_from_unix(Utc::now().timestamp())
        .context("Current time is outside the range of FIT timestamps")?;

    let utc_offset = cli
        .utc_offset
        .unwrap_or_else(|| Local::now().offset().local_minus_utc());

    let settings = Settings {
        samples: cli.samples,
        start,
        utc_offset,
        serial_number: rng.random(),
    };

    let messages = activity::messages(&settings, &mut rng)?;

    let file = File::create(&cli.output)
        .with_context(|| format!("Error opening file {}", cli.output.display()))?;

    let mut encoder = Encoder::open(WriterSink::new(BufWriter::new(file))?)?;

    for message in &messages {
        encoder.write(message)?;
    }

    encoder.close().context("Error closing encoder")?;

    println!(
        "Encoded FIT Activity file {} ({} messages, {} bytes)",
        cli.output.display(),
        messages.len(),
        encoder.bytes_written()
    );

    Ok(())
}
