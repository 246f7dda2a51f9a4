//! AI tuning loader.

use std::path::Path;

use game_ai::AiTuning;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`AiTuning`] from TOML files.
///
/// Every key is optional; missing keys keep their defaults.
///
/// ```toml
/// persistence_minimum = 0.15
/// flee_safe_distance = 10
/// hostile_baseline = -90
/// ```
pub struct TuningLoader;

impl TuningLoader {
    pub fn load(path: &Path) -> LoadResult<AiTuning> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tuning TOML at {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<AiTuning> {
        let tuning: AiTuning = toml::from_str(content)?;
        if tuning.distance_scale.is_nan() || tuning.distance_scale <= 0.0 {
            anyhow::bail!("distance_scale must be positive");
        }
        if tuning.persistence_minimum < 0.0 || tuning.persistence_weight < 0.0 {
            anyhow::bail!("persistence bonus terms must be non-negative");
        }
        Ok(tuning)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tuning.toml");
        fs::write(&path, "flee_safe_distance = 12\nhostile_baseline = -90\n").unwrap();

        let tuning = TuningLoader::load(&path).unwrap();
        assert_eq!(tuning.flee_safe_distance, 12);
        assert_eq!(tuning.hostile_baseline, -90);
        assert_eq!(tuning.persistence_minimum, AiTuning::DEFAULT_PERSISTENCE_MINIMUM);
    }

    #[test]
    fn rejects_zero_distance_scale() {
        assert!(TuningLoader::parse("distance_scale = 0.0").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = TuningLoader::load(Path::new("/nonexistent/tuning.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tuning.toml"));
    }
}
