//! Fixture file loading.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{parse_fixture, SpecError, SrlFixture};

fn load_error(path: &Path, error: impl Display) -> SpecError {
    SpecError::Load {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

/// Load a single fixture file.
pub fn load_fixture(path: &Path) -> Result<SrlFixture, SpecError> {
    let content = fs::read_to_string(path).map_err(|e| load_error(path, e))?;
    parse_fixture(&content).map_err(|e| load_error(path, e))
}

/// Every `.toml` file under `dir`, nested directories included, sorted.
/// A missing directory holds no fixtures.
fn fixture_paths(dir: &Path) -> Result<Vec<PathBuf>, SpecError> {
    let mut pending = vec![dir.to_path_buf()];
    let mut paths = Vec::new();

    while let Some(current) = pending.pop() {
        if !current.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&current).map_err(|e| load_error(&current, e))? {
            let path = entry.map_err(|e| load_error(&current, e))?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().map_or(false, |ext| ext == "toml") {
                paths.push(path);
            }
        }
    }

    paths.sort();
    Ok(paths)
}

/// Load every fixture under `dir`, named by its path relative to `dir`.
pub fn load_all_fixtures(dir: &Path) -> Result<Vec<(String, SrlFixture)>, SpecError> {
    fixture_paths(dir)?
        .into_iter()
        .map(|path| {
            let fixture = load_fixture(&path)?;
            let name = path.strip_prefix(dir).unwrap_or(&path).display().to_string();
            Ok((name, fixture))
        })
        .collect()
}
