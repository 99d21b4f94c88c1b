use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::quiz::QuizConfig;

/// Runtime settings, read from the environment (and a `.env` file if present).
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) db_path: PathBuf,
    pub(crate) log_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive, e.g. `kitbag=debug`.
    pub(crate) log_filter: String,
    pub(crate) currency: String,
    pub(crate) quiz: QuizConfig,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = match get("KITBAG_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        let db_path = get("KITBAG_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("kitbag.db"));
        let log_path = data_dir.join("kitbag.log");

        let defaults = QuizConfig::default();
        let quiz = QuizConfig {
            questions: parse_var(&get, "KITBAG_QUIZ_QUESTIONS")?.unwrap_or(defaults.questions),
            max_operand: parse_var(&get, "KITBAG_QUIZ_MAX_OPERAND")?
                .unwrap_or(defaults.max_operand),
        };
        quiz.validate()?;

        Ok(Self {
            data_dir,
            db_path,
            log_path,
            log_filter: get("KITBAG_LOG").unwrap_or_else(|| "kitbag=info".into()),
            currency: get("KITBAG_CURRENCY").unwrap_or_else(|| "₹".into()),
            quiz,
        })
    }

    /// Defaults rooted at a scratch directory, for tests.
    #[cfg(test)]
    pub(crate) fn for_tests(data_dir: &std::path::Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            db_path: data_dir.join("kitbag.db"),
            log_path: data_dir.join("kitbag.log"),
            log_filter: "kitbag=info".into(),
            currency: "₹".into(),
            quiz: QuizConfig::default(),
        }
    }

    pub(crate) fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory: {}", self.data_dir.display())
        })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "kitbag", "Kitbag")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

fn parse_var<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{key} must be a number, got '{raw}'")),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_under_data_dir() {
        let cfg = Config::from_lookup(lookup(&[("KITBAG_DATA_DIR", "/tmp/kb")])).unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/kb/kitbag.db"));
        assert_eq!(cfg.log_path, PathBuf::from("/tmp/kb/kitbag.log"));
        assert_eq!(cfg.log_filter, "kitbag=info");
        assert_eq!(cfg.currency, "₹");
        assert_eq!(cfg.quiz, QuizConfig::default());
    }

    #[test]
    fn test_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("KITBAG_DATA_DIR", "/tmp/kb"),
            ("KITBAG_DB", "/var/data/other.db"),
            ("KITBAG_LOG", "kitbag=debug"),
            ("KITBAG_CURRENCY", "$"),
            ("KITBAG_QUIZ_QUESTIONS", "10"),
            ("KITBAG_QUIZ_MAX_OPERAND", " 14 "),
        ]))
        .unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/var/data/other.db"));
        assert_eq!(cfg.log_filter, "kitbag=debug");
        assert_eq!(cfg.currency, "$");
        assert_eq!(cfg.quiz.questions, 10);
        assert_eq!(cfg.quiz.max_operand, 14);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("KITBAG_DATA_DIR", "/tmp/kb"),
            ("KITBAG_QUIZ_QUESTIONS", "many"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("KITBAG_QUIZ_QUESTIONS"));

        assert!(Config::from_lookup(lookup(&[
            ("KITBAG_DATA_DIR", "/tmp/kb"),
            ("KITBAG_QUIZ_QUESTIONS", "0"),
        ]))
        .is_err());

        assert!(Config::from_lookup(lookup(&[
            ("KITBAG_DATA_DIR", "/tmp/kb"),
            ("KITBAG_QUIZ_MAX_OPERAND", "10000000000"),
        ]))
        .is_err());
    }

    #[test]
    fn test_ensure_data_dir_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let cfg = Config::from_lookup(lookup(&[(
            "KITBAG_DATA_DIR",
            nested.to_str().unwrap(),
        )]))
        .unwrap();
        cfg.ensure_data_dir().unwrap();
        assert!(nested.is_dir());
    }
}
