use std::env;

use medsynth_generate::{ArtifactFormat, Collection, GenerateOptions, GenerationEngine};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut rows = 5_usize;
    let mut seed: Option<u64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--rows" => rows = args.next().ok_or("missing --rows value")?.parse()?,
            "--seed" => seed = Some(args.next().ok_or("missing --seed value")?.parse()?),
            _ => return Err(format!("unexpected argument '{arg}'").into()),
        }
    }

    let mut options = GenerateOptions::for_today()?;
    options.seed = seed;
    let dataset = GenerationEngine::new(options).generate_counts("preview", rows, rows, rows)?;

    let patients = Collection::Patients(&dataset.patients).encode(ArtifactFormat::Csv)?;
    let encounters = Collection::Encounters(&dataset.encounters).encode(ArtifactFormat::NdJson)?;
    let claims = Collection::Claims(&dataset.claims).encode(ArtifactFormat::Csv)?;

    println!("{}", String::from_utf8_lossy(&patients));
    println!("{}", String::from_utf8_lossy(&encounters));
    println!("{}", String::from_utf8_lossy(&claims));
    Ok(())
}
