use std::path::PathBuf;

use uuid::Uuid;
use voxrelay::domain::AudioArtifact;

fn scratch_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("voxrelay-test-{}-{}", label, Uuid::new_v4()))
}

#[tokio::test]
async fn given_memory_artifact_when_reading_then_returns_bytes() {
    let artifact = AudioArtifact::from_bytes(b"ogg bytes".to_vec(), "audio/ogg");

    assert_eq!(artifact.media_type(), "audio/ogg");
    assert_eq!(artifact.size_bytes(), 9);
    assert!(!artifact.is_empty());
    assert_eq!(artifact.read_bytes().await.unwrap(), b"ogg bytes");
}

#[tokio::test]
async fn given_memory_artifact_when_released_then_reading_fails() {
    let mut artifact = AudioArtifact::from_bytes(b"ogg bytes".to_vec(), "audio/ogg");

    artifact.release().await;

    assert!(artifact.is_released());
    assert!(artifact.read_bytes().await.is_err());
}

#[tokio::test]
async fn given_file_artifact_when_released_then_file_is_deleted() {
    let path = scratch_path("release");
    tokio::fs::write(&path, b"wav bytes").await.unwrap();

    let mut artifact = AudioArtifact::from_temp_file(path.clone(), "audio/wav", 9);
    assert_eq!(artifact.path(), Some(path.as_path()));

    artifact.release().await;

    assert!(!path.exists());
    assert!(artifact.is_released());
}

#[tokio::test]
async fn given_released_artifact_when_released_again_then_no_panic() {
    let path = scratch_path("double-release");
    tokio::fs::write(&path, b"wav bytes").await.unwrap();

    let mut artifact = AudioArtifact::from_temp_file(path.clone(), "audio/wav", 9);
    artifact.release().await;
    artifact.release().await;

    assert!(!path.exists());
}

#[tokio::test]
async fn given_file_already_gone_when_released_then_treated_as_success() {
    let path = scratch_path("already-gone");

    let mut artifact = AudioArtifact::from_temp_file(path.clone(), "audio/wav", 0);
    artifact.release().await;

    assert!(artifact.is_released());
}

#[tokio::test]
async fn given_file_artifact_when_dropped_then_file_is_deleted() {
    let path = scratch_path("drop");
    tokio::fs::write(&path, b"wav bytes").await.unwrap();

    let artifact = AudioArtifact::from_temp_file(path.clone(), "audio/wav", 9);
    drop(artifact);

    assert!(!path.exists());
}

#[tokio::test]
async fn given_zero_byte_artifact_when_checked_then_is_empty() {
    let artifact = AudioArtifact::from_bytes(Vec::new(), "audio/ogg");

    assert!(artifact.is_empty());
    assert_eq!(artifact.size_bytes(), 0);
}
