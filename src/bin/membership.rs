//! Hidden-set membership demo
//!
//! Encodes the configured members as the roots of a polynomial, commits to
//! it, opens at the configured point and verifies the opening twice: once
//! with the quotient in the configured group and once in the other group.
//! `y == 0` means the point is a member.
//!
//! ```text
//! membership --members 1,2 --point 5            # y = 12, not a member
//! membership --members 1,2 --point 2 --json     # y = 0, member
//! membership --srs-g1 G1.bin --srs-g2 G2.bin    # use saved parameters
//! ```
//!
//! Logging follows `RUST_LOG`; set `KZG_LOG_JSON=1` for JSON log lines.

use anyhow::{Context, Result};
use ark_serialize::CanonicalSerialize;
use serde::Serialize;

use membership_kzg::config::{MembershipConfig, SrsSource};
use membership_kzg::{
    commit, open, verify, Bn254Srs, Field, FieldElement, OpeningProof, Polynomial,
};

#[derive(Serialize)]
struct Report {
    members: usize,
    point: String,
    value: String,
    is_member: bool,
    polynomial_degree: usize,
    srs_max_degree: usize,
    srs_g1_digest: String,
    commitment: String,
    proof_group: String,
    proof: String,
    verified: bool,
    verified_swapped_group: bool,
}

fn init_logging() {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "membership=info,membership_kzg=info".into());
    let json = matches!(std::env::var("KZG_LOG_JSON").ok().as_deref(), Some("1" | "true"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn load_srs(cfg: &MembershipConfig, field: &Field) -> Result<Bn254Srs> {
    match &cfg.srs {
        SrsSource::Random => {
            Bn254Srs::setup(field.clone(), &mut rand::rngs::OsRng, cfg.max_degree)
                .context("SRS setup failed")
        }
        SrsSource::Files { g1, g2 } => Bn254Srs::load(field.clone(), g1, g2, cfg.max_degree)
            .with_context(|| format!("loading SRS from {} / {}", g1.display(), g2.display())),
    }
}

fn to_hex<T: CanonicalSerialize>(v: &T) -> Result<String> {
    let mut bytes = Vec::new();
    v.serialize_compressed(&mut bytes).context("serialize")?;
    Ok(hex::encode(bytes))
}

fn main() -> Result<()> {
    init_logging();
    let cfg = MembershipConfig::from_env_and_args()?;
    tracing::debug!(?cfg, "configuration resolved");

    let field = Field::bn254();
    let srs = load_srs(&cfg, &field)?;

    let members: Vec<FieldElement> = cfg.members.iter().map(|&m| field.reduce_i64(m)).collect();
    let p = Polynomial::from_roots(&members, &field);
    let z = field.reduce_i64(cfg.point);

    let commitment = commit(&srs, &p).context("commit")?;
    let opening = open(&srs, &p, &z, cfg.quotient_group).context("open")?;
    let (y, proof) = (&opening.claim.value, &opening.proof);
    let verified = verify(&srs, &commitment, &z, y, proof);

    let swapped_group = cfg.quotient_group.swapped();
    let swapped = open(&srs, &p, &z, swapped_group).context("open (swapped group)")?;
    let verified_swapped_group = verify(&srs, &commitment, &z, &swapped.claim.value, &swapped.proof);
    if verified != verified_swapped_group {
        tracing::warn!(%swapped_group, "verification outcome differs between quotient groups");
    }

    let report = Report {
        members: members.len(),
        point: z.to_string(),
        value: y.to_string(),
        is_member: y == &FieldElement::from(0u8),
        polynomial_degree: p.degree(),
        srs_max_degree: srs.max_degree(),
        srs_g1_digest: hex::encode(srs.g1_digest()?),
        commitment: to_hex(&commitment)?,
        proof_group: proof.group().to_string(),
        proof: match proof {
            OpeningProof::G1(pi) => to_hex(pi)?,
            OpeningProof::G2(pi) => to_hex(pi)?,
        },
        verified,
        verified_swapped_group,
    };

    if cfg.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("p(v) = {p}");
        println!("z = {}, y = p(z) = {}", report.point, report.value);
        println!("member: {}", report.is_member);
        println!("commitment: {}", report.commitment);
        println!(
            "verify ({}): {}   verify ({}): {}",
            report.proof_group,
            report.verified,
            swapped_group,
            report.verified_swapped_group
        );
    }

    if !verified || !verified_swapped_group {
        anyhow::bail!("opening proof rejected");
    }
    Ok(())
}
