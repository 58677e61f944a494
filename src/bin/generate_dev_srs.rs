//! Generate development SRS files (NOT FOR PRODUCTION)
//!
//! ```text
//! generate_dev_srs --degree 128 --output-g1 G1.bin --output-g2 G2.bin
//! ```

use anyhow::{Context, Result};
use membership_kzg::Bn254Srs;
use std::path::PathBuf;

fn parse_flag(args: &[String], key: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == key {
            return it.next().cloned();
        }
        if let Some(v) = a.strip_prefix(key).and_then(|rest| rest.strip_prefix('=')) {
            return Some(v.to_string());
        }
    }
    None
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "membership_kzg=info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let args: Vec<String> = std::env::args().collect();
    let degree: usize = match parse_flag(&args, "--degree") {
        Some(s) => s.parse().with_context(|| format!("--degree {s}"))?,
        None => 128,
    };
    let g1_path = parse_flag(&args, "--output-g1").map(PathBuf::from).unwrap_or_else(|| "G1.bin".into());
    let g2_path = parse_flag(&args, "--output-g2").map(PathBuf::from).unwrap_or_else(|| "G2.bin".into());

    println!("WARNING: DEVELOPMENT SRS (seed=42, the secret is PUBLIC).");
    println!("Anyone can forge membership proofs against it. Never deploy it.");

    let srs = Bn254Srs::dev(degree)?;
    srs.save_g1_powers(&g1_path)
        .with_context(|| format!("writing {}", g1_path.display()))?;
    srs.save_g2_powers(&g2_path)
        .with_context(|| format!("writing {}", g2_path.display()))?;

    println!("Saved {} powers per group:", srs.len());
    println!("  {}  blake3={}", g1_path.display(), hex::encode(srs.g1_digest()?));
    println!("  {}  blake3={}", g2_path.display(), hex::encode(srs.g2_digest()?));
    Ok(())
}
