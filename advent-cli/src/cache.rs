//! Input cache for storing puzzle inputs locally

use crate::error::CacheError;
use std::fs;
use std::path::PathBuf;

/// File-based cache for puzzle inputs
///
/// Directory structure: `{base_dir}/{year}/day{day:02}.txt`
pub struct InputCache {
    base_dir: PathBuf,
}

impl InputCache {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the cache path for a specific year/day
    pub fn cache_path(&self, year: u16, day: u8) -> PathBuf {
        self.base_dir
            .join(year.to_string())
            .join(format!("day{:02}.txt", day))
    }

    /// Check if input is cached
    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.cache_path(year, day).is_file()
    }

    /// Get cached input or None if not cached
    pub fn get(&self, year: u16, day: u8) -> Result<Option<String>, CacheError> {
        let path = self.cache_path(year, day);
        if path.is_file() {
            Ok(Some(fs::read_to_string(&path)?))
        } else {
            Ok(None)
        }
    }

    /// Store input in cache, creating the year directory as needed
    pub fn put(&self, year: u16, day: u8, input: &str) -> Result<(), CacheError> {
        let path = self.cache_path(year, day);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                CacheError::DirCreation(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }

        fs::write(&path, input)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cache_path_format() {
        let temp = TempDir::new().unwrap();
        let cache = InputCache::new(temp.path().to_path_buf());

        assert_eq!(
            cache.cache_path(2020, 1),
            temp.path().join("2020").join("day01.txt")
        );
        assert_eq!(
            cache.cache_path(2015, 25),
            temp.path().join("2015").join("day25.txt")
        );
    }

    #[test]
    fn test_cache_roundtrip() {
        let temp = TempDir::new().unwrap();
        let cache = InputCache::new(temp.path().join("nested"));

        assert!(!cache.contains(2020, 9));
        assert!(cache.get(2020, 9).unwrap().is_none());

        let input = "35\n20\n15\n";
        cache.put(2020, 9, input).unwrap();

        assert!(cache.contains(2020, 9));
        assert_eq!(cache.get(2020, 9).unwrap().as_deref(), Some(input));
        assert!(!cache.contains(2020, 10));
    }

    #[test]
    fn test_put_fails_when_year_dir_is_a_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("2020"), "not a directory").unwrap();
        let cache = InputCache::new(temp.path().to_path_buf());

        assert!(matches!(
            cache.put(2020, 1, "x"),
            Err(CacheError::DirCreation(_))
        ));
    }
}
