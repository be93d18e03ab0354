//! Per-invocation job context.
//!
//! Every pipeline run gets its own uuid-named directory under
//! `.dublingo/jobs/` carrying all intermediate artifacts. Filenames inside
//! the directory are fixed, so re-running the same job directory overwrites
//! the previous artifacts, while distinct jobs never collide.

use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;

pub struct JobContext {
    id: Uuid,
    dir: PathBuf,
}

impl JobContext {
    /// Create a fresh job rooted under `base_dir/.dublingo/jobs/<uuid>`.
    pub fn create<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let id = Uuid::new_v4();
        let dir = base_dir
            .as_ref()
            .join(".dublingo")
            .join("jobs")
            .join(id.to_string());
        std::fs::create_dir_all(&dir)?;
        debug!("Created job directory: {}", dir.display());
        Ok(Self { id, dir })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ingested copy of the uploaded video, keeping its original extension.
    pub fn source_video(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("uploaded_video.{}", extension))
    }

    /// Waveform extracted from the source video.
    pub fn extracted_audio(&self) -> PathBuf {
        self.dir.join("audio.wav")
    }

    /// Compressed synthesized speech as returned by the TTS endpoint.
    pub fn synthesized_compressed(&self) -> PathBuf {
        self.dir.join("translated_audio.mp3")
    }

    /// Canonical uncompressed synthesized speech expected by the remux stage.
    pub fn synthesized_audio(&self) -> PathBuf {
        self.dir.join("translated_audio.wav")
    }

    /// Remuxed video with the synthesized audio track.
    pub fn remuxed_video(&self) -> PathBuf {
        self.dir.join("translated_video.mp4")
    }

    /// Remove intermediate artifacts after a successful run.
    ///
    /// The ingested source video is retained. Missing files are ignored so
    /// cleanup stays idempotent.
    pub fn cleanup_intermediates(&self) {
        for path in [
            self.extracted_audio(),
            self.synthesized_compressed(),
            self.synthesized_audio(),
            self.remuxed_video(),
        ] {
            if std::fs::remove_file(&path).is_ok() {
                debug!("Removed intermediate artifact: {}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_directories_are_unique() {
        let base = tempfile::tempdir().unwrap();
        let a = JobContext::create(base.path()).unwrap();
        let b = JobContext::create(base.path()).unwrap();
        assert_ne!(a.dir(), b.dir());
        assert!(a.dir().exists());
        assert!(b.dir().exists());
    }

    #[test]
    fn test_artifact_paths_live_inside_the_job_directory() {
        let base = tempfile::tempdir().unwrap();
        let job = JobContext::create(base.path()).unwrap();
        for path in [
            job.source_video("mp4"),
            job.extracted_audio(),
            job.synthesized_compressed(),
            job.synthesized_audio(),
            job.remuxed_video(),
        ] {
            assert!(path.starts_with(job.dir()));
        }
    }

    #[test]
    fn test_cleanup_removes_intermediates_but_keeps_source() {
        let base = tempfile::tempdir().unwrap();
        let job = JobContext::create(base.path()).unwrap();

        let source = job.source_video("mp4");
        std::fs::write(&source, b"video").unwrap();
        std::fs::write(job.extracted_audio(), b"wav").unwrap();
        std::fs::write(job.synthesized_compressed(), b"mp3").unwrap();
        std::fs::write(job.synthesized_audio(), b"wav").unwrap();
        std::fs::write(job.remuxed_video(), b"mp4").unwrap();

        job.cleanup_intermediates();

        assert!(source.exists());
        assert!(!job.extracted_audio().exists());
        assert!(!job.synthesized_compressed().exists());
        assert!(!job.synthesized_audio().exists());
        assert!(!job.remuxed_video().exists());
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let base = tempfile::tempdir().unwrap();
        let job = JobContext::create(base.path()).unwrap();
        job.cleanup_intermediates();
        job.cleanup_intermediates();
    }
}
