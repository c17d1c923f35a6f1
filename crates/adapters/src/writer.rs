// crates/adapters/src/writer.rs
use common::*;
use serde::Serialize;
use std::path::Path;

/// Write the `userWallet,credit_score` table
pub fn write_scores(path: &Path, scores: &[ScoredWallet]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for score in scores {
        writer.serialize(score)?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} wallet scores to {}", scores.len(), path.display());
    Ok(())
}

/// Pretty JSON side report (score summary and the like)
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let scores = vec![
            ScoredWallet { wallet: "0xa".into(), credit_score: 1000 },
            ScoredWallet { wallet: "0xb".into(), credit_score: 0 },
        ];

        write_scores(&path, &scores).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "userWallet,credit_score\n0xa,1000\n0xb,0\n");
    }

    #[test]
    fn test_empty_table_has_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        write_scores(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&path, &serde_json::json!({"wallets": 2})).unwrap();
        let back: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back["wallets"], 2);
    }
}
