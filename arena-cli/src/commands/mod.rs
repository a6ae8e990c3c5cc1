pub mod bracket;
pub mod run;

use anyhow::{Context, Result};
use arena_core::Match;
use std::path::Path;

/// Read a bracket from a JSON file, or fall back to the demo tournament.
pub fn load_bracket(file: Option<&Path>) -> Result<Vec<Match>> {
    let Some(path) = file else {
        return Ok(arena_core::demo::tournament());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bracket file {}", path.display()))?;
    arena_core::bracket::parse_bracket(&raw)
        .with_context(|| format!("failed to load bracket file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_demo_tournament() {
        let bracket = load_bracket(None).unwrap();
        assert_eq!(bracket.len(), 7);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_bracket(Some(Path::new("/nonexistent/bracket.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bracket.json"));
    }
}
