//! Loading cassettes from disk.

use std::path::Path;

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Read a YAML cassette and prepare it for replay.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a cassette.
pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, String> {
    let cassette = read_cassette(path)?;
    tracing::debug!(
        path = %path.display(),
        name = %cassette.name,
        interactions = cassette.interactions.len(),
        "cassette loaded"
    );
    Ok(CassetteReplayer::new(&cassette))
}

fn read_cassette(path: &Path) -> Result<Cassette, String> {
    let yaml = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
    serde_yaml::from_str(&yaml)
        .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures").join(name)
    }

    #[test]
    fn fixtures_parse() {
        for name in [
            "analyze_tshirt.cassette.yaml",
            "generate_url.cassette.yaml",
            "vision_outage.cassette.yaml",
        ] {
            let cassette = read_cassette(&fixture(name)).unwrap();
            assert!(!cassette.interactions.is_empty(), "{name} has no interactions");
        }
    }

    #[test]
    fn loaded_cassette_replays_each_port() {
        let mut replayer = load_cassette(&fixture("generate_url.cassette.yaml")).unwrap();
        assert_eq!(replayer.remaining(), 2);
        assert_eq!(replayer.next_interaction("image_editor", "edit").unwrap().seq, 0);
        assert_eq!(replayer.next_interaction("image_fetcher", "fetch").unwrap().seq, 1);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_cassette(Path::new("/nonexistent/providers.cassette.yaml")).err().unwrap();
        assert!(err.starts_with("Failed to read cassette file"));
    }

    #[test]
    fn non_cassette_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("providers.cassette.yaml");
        std::fs::write(&path, "name: only-a-name\n").unwrap();
        let err = load_cassette(&path).err().unwrap();
        assert!(err.starts_with("Failed to parse cassette file"));
    }
}
