//! Runtime configuration for the `membership` driver
//!
//! Every setting comes from a CLI flag first, then an environment variable,
//! then a default:
//!
//! | flag                | env                   | default |
//! |---------------------|-----------------------|---------|
//! | `--members 1,2`     | `KZG_MEMBERS`         | `1,2`   |
//! | `--point 5`         | `KZG_POINT`           | `5`     |
//! | `--max-degree N`    | `KZG_MAX_DEGREE`      | `100`   |
//! | `--quotient-group`  | `KZG_QUOTIENT_GROUP`  | `g2`    |
//! | `--srs-g1 PATH`     | `KZG_SRS_G1_PATH`     | none    |
//! | `--srs-g2 PATH`     | `KZG_SRS_G2_PATH`     | none    |
//! | `--json`            | `KZG_JSON=1`          | off     |
//!
//! Without SRS paths the driver runs a fresh random setup.

#![forbid(unsafe_code)]

use std::path::PathBuf;

use crate::kzg::QuotientGroup;

/// Default hidden set.
pub const DEFAULT_MEMBERS: &[i64] = &[1, 2];
/// Default evaluation point.
pub const DEFAULT_POINT: i64 = 5;
/// Default SRS capacity.
pub const DEFAULT_MAX_DEGREE: usize = 100;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A flag or variable could not be parsed.
    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidValue {
        /// Flag or variable name.
        key: String,
        /// Raw value.
        value: String,
        /// What was expected.
        reason: String,
    },
    /// The set needs a larger SRS than configured.
    #[error("{members} members need max degree >= {members}, got {max_degree}")]
    SetTooLarge {
        /// Number of members.
        members: usize,
        /// Configured SRS capacity.
        max_degree: usize,
    },
    /// Only one of the two SRS files was given.
    #[error("SRS files must be given together (--srs-g1 and --srs-g2)")]
    IncompleteSrs,
}

/// Where the SRS comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SrsSource {
    /// Fresh setup from the OS RNG.
    Random,
    /// Previously saved powers.
    Files {
        /// Compressed G1 powers.
        g1: PathBuf,
        /// Compressed G2 powers.
        g2: PathBuf,
    },
}

/// Resolved driver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipConfig {
    /// Hidden set; reduced into the field by the caller.
    pub members: Vec<i64>,
    /// Evaluation point `z`.
    pub point: i64,
    /// SRS capacity.
    pub max_degree: usize,
    /// Group carrying the opening proof.
    pub quotient_group: QuotientGroup,
    /// SRS origin.
    pub srs: SrsSource,
    /// Emit a JSON report instead of text.
    pub json: bool,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            members: DEFAULT_MEMBERS.to_vec(),
            point: DEFAULT_POINT,
            max_degree: DEFAULT_MAX_DEGREE,
            quotient_group: QuotientGroup::default(),
            srs: SrsSource::Random,
            json: false,
        }
    }
}

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

fn parse_bool(s: &str) -> bool {
    matches!(s, "1" | "true" | "True" | "TRUE" | "yes" | "y")
}

fn invalid(key: &str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue { key: key.into(), value: value.into(), reason: reason.into() }
}

fn parse_members(key: &str, raw: &str) -> Result<Vec<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().map_err(|e| invalid(key, s, e.to_string())))
        .collect()
}

impl MembershipConfig {
    /// Resolve from process arguments and environment.
    pub fn from_env_and_args() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().collect();
        Self::from_sources(&args, |k| std::env::var(k).ok())
    }

    /// Resolve from explicit sources; `env` looks up a variable by name.
    pub fn from_sources<F>(args: &[String], env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |flag: &str, var: &str| -> Option<(String, String)> {
            parse_flag(args, flag)
                .map(|v| (flag.to_string(), v))
                .or_else(|| env(var).map(|v| (var.to_string(), v)))
        };

        let mut cfg = Self::default();

        if let Some((key, raw)) = lookup("--members", "KZG_MEMBERS") {
            cfg.members = parse_members(&key, &raw)?;
        }
        if let Some((key, raw)) = lookup("--point", "KZG_POINT") {
            cfg.point = raw.trim().parse().map_err(|e| invalid(&key, &raw, format!("{e}")))?;
        }
        if let Some((key, raw)) = lookup("--max-degree", "KZG_MAX_DEGREE") {
            cfg.max_degree =
                raw.trim().parse().map_err(|e| invalid(&key, &raw, format!("{e}")))?;
            if cfg.max_degree == 0 {
                return Err(invalid(&key, &raw, "must be at least 1"));
            }
        }
        if let Some((key, raw)) = lookup("--quotient-group", "KZG_QUOTIENT_GROUP") {
            cfg.quotient_group = raw.trim().parse().map_err(|e: String| invalid(&key, &raw, e))?;
        }

        let g1 = lookup("--srs-g1", "KZG_SRS_G1_PATH").map(|(_, v)| PathBuf::from(v));
        let g2 = lookup("--srs-g2", "KZG_SRS_G2_PATH").map(|(_, v)| PathBuf::from(v));
        cfg.srs = match (g1, g2) {
            (Some(g1), Some(g2)) => SrsSource::Files { g1, g2 },
            (None, None) => SrsSource::Random,
            _ => return Err(ConfigError::IncompleteSrs),
        };

        cfg.json = args.iter().any(|a| a == "--json")
            || env("KZG_JSON").map(|v| parse_bool(&v)).unwrap_or(false);

        if cfg.members.len() > cfg.max_degree {
            return Err(ConfigError::SetTooLarge {
                members: cfg.members.len(),
                max_degree: cfg.max_degree,
            });
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(xs: &[&str]) -> Vec<String> {
        std::iter::once("membership").chain(xs.iter().copied()).map(String::from).collect()
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_apply_without_input() {
        let cfg = MembershipConfig::from_sources(&args(&[]), env_of(&[])).unwrap();
        assert_eq!(cfg, MembershipConfig::default());
        assert_eq!(cfg.members, vec![1, 2]);
        assert_eq!(cfg.quotient_group, QuotientGroup::G2);
    }

    #[test]
    fn flags_override_environment() {
        let env = env_of(&[("KZG_MEMBERS", "7,8,9"), ("KZG_POINT", "3"), ("KZG_JSON", "1")]);
        let cfg = MembershipConfig::from_sources(
            &args(&["--members", "4, -5", "--quotient-group=G1", "--max-degree", "8"]),
            env,
        )
        .unwrap();
        assert_eq!(cfg.members, vec![4, -5]);
        assert_eq!(cfg.point, 3);
        assert_eq!(cfg.max_degree, 8);
        assert_eq!(cfg.quotient_group, QuotientGroup::G1);
        assert!(cfg.json);
    }

    #[test]
    fn srs_paths_must_come_in_pairs() {
        let cfg = MembershipConfig::from_sources(
            &args(&["--srs-g1", "a.bin"]),
            env_of(&[("KZG_SRS_G2_PATH", "b.bin")]),
        )
        .unwrap();
        assert_eq!(cfg.srs, SrsSource::Files { g1: "a.bin".into(), g2: "b.bin".into() });

        let err = MembershipConfig::from_sources(&args(&["--srs-g2", "b.bin"]), env_of(&[]));
        assert_eq!(err.unwrap_err(), ConfigError::IncompleteSrs);
    }

    #[test]
    fn malformed_values_are_reported() {
        let err = MembershipConfig::from_sources(&args(&["--members", "1,x"]), env_of(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, ref value, .. } if key == "--members" && value == "x"));

        let err = MembershipConfig::from_sources(&args(&[]), env_of(&[("KZG_QUOTIENT_GROUP", "gt")]))
            .unwrap_err();
        assert!(err.to_string().contains("KZG_QUOTIENT_GROUP"));

        let err = MembershipConfig::from_sources(&args(&["--max-degree", "0"]), env_of(&[]));
        assert!(err.is_err());
    }

    #[test]
    fn set_must_fit_the_srs() {
        let err = MembershipConfig::from_sources(
            &args(&["--members", "1,2,3", "--max-degree", "2"]),
            env_of(&[]),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::SetTooLarge { members: 3, max_degree: 2 });

        let cfg = MembershipConfig::from_sources(&args(&["--members", ""]), env_of(&[])).unwrap();
        assert!(cfg.members.is_empty());
    }
}
