//! Persisting synthesized audio under the public asset directory.

use std::path::Path;

use tracing::info;

/// Generate a unique artifact filename.
///
/// Timestamp plus a UUID suffix so concurrent calls in the same second
/// cannot collide.
fn artifact_filename() -> String {
    let ts = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("reply_{ts}_{}.mp3", &id[..8])
}

/// Write the audio bytes under `dir` and return the bare filename.
///
/// The caller builds the playback URL from the filename; files are never
/// cleaned up afterwards.
pub async fn write_artifact(dir: &Path, audio: &[u8]) -> anyhow::Result<String> {
    let filename = artifact_filename();

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(&filename), audio).await?;

    info!(%filename, size_kb = audio.len() / 1024, dir = %dir.display(), "Audio artifact written");

    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_generation_unique() {
        let f1 = artifact_filename();
        let f2 = artifact_filename();
        assert_ne!(f1, f2);
        assert!(f1.starts_with("reply_"));
        assert!(f1.ends_with(".mp3"));
    }

    #[tokio::test]
    async fn test_write_artifact_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("public");

        let filename = write_artifact(&nested, b"mp3-bytes").await.unwrap();

        let written = nested.join(&filename);
        assert!(written.exists());
        assert_eq!(std::fs::read(&written).unwrap(), b"mp3-bytes");
    }
}
