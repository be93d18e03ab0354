//! Pipeline orchestration.
//!
//! The dubbing workflow is a strictly linear state machine: each stage must
//! fully complete before the next starts, and the first failing stage halts
//! the run without invoking anything downstream. Failures are carried as
//! explicit tagged outcomes rather than propagated errors, so nothing a
//! stage does is fatal to the hosting process.

use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::Config;
use crate::error::{DubError, Result};
use crate::ingest;
use crate::job::JobContext;
use crate::languages;
use crate::media::{MediaProcessor, MediaProcessorFactory};
use crate::synthesize::{SpeechSynthesizer, SynthesizerFactory};
use crate::transcribe::{Transcriber, TranscriberFactory};
use crate::translate::{Translator, TranslatorFactory};

/// States of the dubbing pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineState {
    Idle,
    Uploaded,
    AudioExtracted,
    Transcribed,
    Translated,
    SpeechSynthesized,
    Remuxed,
    Presented,
    Aborted,
}

/// The stage a failure was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    ExtractAudio,
    Transcribe,
    Translate,
    Synthesize,
    Remux,
    Present,
}

/// How a stage failed, independent of which stage detected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The input lacks required content (e.g. no audio track)
    MissingContent,
    /// The request names something the static configuration cannot serve
    UnsupportedConfiguration,
    /// An external collaborator (model, codec, endpoint) failed
    UpstreamFailure,
}

/// Tagged failure reason returned by a stage instead of a panic or a
/// propagated error.
#[derive(Debug, Clone)]
pub struct StageFailure {
    pub stage: Stage,
    pub kind: FailureKind,
    pub message: String,
}

impl StageFailure {
    fn from_error(stage: Stage, error: &DubError) -> Self {
        let kind = match error {
            DubError::NoAudioTrack => FailureKind::MissingContent,
            DubError::UnsupportedLanguage(_)
            | DubError::UnsupportedFormat(_)
            | DubError::Config(_) => FailureKind::UnsupportedConfiguration,
            _ => FailureKind::UpstreamFailure,
        };

        Self {
            stage,
            kind,
            message: error.to_string(),
        }
    }
}

/// Outcome of a full pipeline run.
///
/// Partial artifacts produced before a failure (transcript, translation) are
/// reported as-is; on failure nothing is cleaned up and `failure` carries
/// the single user-facing message.
#[derive(Debug)]
pub struct PipelineReport {
    pub state: PipelineState,
    pub transcript: Option<String>,
    pub translation: Option<String>,
    pub output_video: Option<PathBuf>,
    pub failure: Option<StageFailure>,
}

impl PipelineReport {
    pub fn succeeded(&self) -> bool {
        self.state == PipelineState::Presented
    }
}

pub struct Pipeline {
    media: Box<dyn MediaProcessor>,
    transcriber: Box<dyn Transcriber>,
    translator: Box<dyn Translator>,
    synthesizer: Box<dyn SpeechSynthesizer>,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let media = MediaProcessorFactory::create_processor(config.media.clone());
        let transcriber = TranscriberFactory::create_default(config.transcriber.clone());
        let translator = TranslatorFactory::create_translator(config.translate.clone());
        let synthesizer = SynthesizerFactory::create_synthesizer(config.synthesis.clone());

        // Check dependencies
        media.check_availability()?;

        Ok(Self {
            media,
            transcriber,
            translator,
            synthesizer,
        })
    }

    /// Assemble a pipeline from explicit stage implementations.
    pub fn with_components(
        media: Box<dyn MediaProcessor>,
        transcriber: Box<dyn Transcriber>,
        translator: Box<dyn Translator>,
        synthesizer: Box<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            media,
            transcriber,
            translator,
            synthesizer,
        }
    }

    /// Run the full dubbing pipeline for one video.
    ///
    /// A fresh job context is created under `base_dir`; the final video is
    /// copied to `output_path` on success, after which intermediate
    /// artifacts are deleted. On failure the job directory is left as-is.
    pub async fn run(
        &mut self,
        input_path: &Path,
        target_language: &str,
        output_path: &Path,
        base_dir: &Path,
    ) -> PipelineReport {
        let mut report = PipelineReport {
            state: PipelineState::Idle,
            transcript: None,
            translation: None,
            output_video: None,
            failure: None,
        };

        let job = match JobContext::create(base_dir) {
            Ok(job) => job,
            Err(e) => return self.abort(report, Stage::Ingest, &e),
        };
        info!("Started dubbing job {}", job.id());

        // Ingest
        let source_video = match ingest::ingest_video(&job, input_path) {
            Ok(path) => path,
            Err(e) => return self.abort(report, Stage::Ingest, &e),
        };
        report.state = PipelineState::Uploaded;

        // Extract audio
        let audio_path = match self.extract_audio(&job, &source_video).await {
            Ok(path) => path,
            Err(e) => return self.abort(report, Stage::ExtractAudio, &e),
        };
        report.state = PipelineState::AudioExtracted;

        // Transcribe
        info!("Extracting speech from audio and converting it into text");
        let transcript = match self.transcriber.transcribe(&audio_path).await {
            Ok(transcript) => transcript,
            Err(e) => return self.abort(report, Stage::Transcribe, &e),
        };
        report.transcript = Some(transcript.text.clone());
        report.state = PipelineState::Transcribed;

        // Translate
        info!("Translating transcript to {}", target_language);
        let translation = match self
            .translator
            .translate(&transcript.text, target_language)
            .await
        {
            Ok(translation) => translation,
            Err(e) => return self.abort(report, Stage::Translate, &e),
        };
        report.translation = Some(translation.clone());
        report.state = PipelineState::Translated;

        // Synthesize
        info!("Converting translated text to speech");
        let speech_path = match self.synthesize(&job, &translation, target_language).await {
            Ok(path) => path,
            Err(e) => return self.abort(report, Stage::Synthesize, &e),
        };
        report.state = PipelineState::SpeechSynthesized;

        // Remux
        info!("Merging translated audio with video");
        let remuxed_path = match self.remux(&job, &source_video, &speech_path).await {
            Ok(path) => path,
            Err(e) => return self.abort(report, Stage::Remux, &e),
        };
        report.state = PipelineState::Remuxed;

        // Present: hand the final video to the caller, then clean up
        if let Err(e) = std::fs::copy(&remuxed_path, output_path) {
            return self.abort(report, Stage::Present, &DubError::Io(e));
        }
        job.cleanup_intermediates();
        report.output_video = Some(output_path.to_path_buf());
        report.state = PipelineState::Presented;

        info!("Dubbing job {} completed: {}", job.id(), output_path.display());
        report
    }

    async fn extract_audio(&self, job: &JobContext, source_video: &Path) -> Result<PathBuf> {
        if !self.media.has_audio_stream(source_video).await? {
            return Err(DubError::NoAudioTrack);
        }

        let audio_path = job.extracted_audio();
        self.media.extract_audio(source_video, &audio_path).await?;
        Ok(audio_path)
    }

    async fn synthesize(
        &self,
        job: &JobContext,
        translation: &str,
        target_language: &str,
    ) -> Result<PathBuf> {
        let voice = languages::voice_code(target_language).ok_or_else(|| {
            DubError::UnsupportedLanguage(target_language.to_string())
        })?;

        let compressed_path = job.synthesized_compressed();
        self.synthesizer
            .synthesize(translation, voice, &compressed_path)
            .await?;

        let wav_path = job.synthesized_audio();
        self.media
            .transcode_to_wav(&compressed_path, &wav_path)
            .await?;
        Ok(wav_path)
    }

    async fn remux(
        &self,
        job: &JobContext,
        source_video: &Path,
        speech_path: &Path,
    ) -> Result<PathBuf> {
        let duration = self.media.probe_duration(source_video).await?;

        let remuxed_path = job.remuxed_video();
        self.media
            .replace_audio(source_video, speech_path, &remuxed_path, duration)
            .await?;
        Ok(remuxed_path)
    }

    fn abort(&self, mut report: PipelineReport, stage: Stage, cause: &DubError) -> PipelineReport {
        let failure = StageFailure::from_error(stage, cause);
        error!(
            "Pipeline aborted at {:?} ({:?}): {}",
            failure.stage, failure.kind, failure.message
        );
        report.failure = Some(failure);
        report.state = PipelineState::Aborted;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MockMediaProcessor;
    use crate::synthesize::MockSpeechSynthesizer;
    use crate::transcribe::{MockTranscriber, Transcript};
    use crate::translate::MockTranslator;

    fn write_fixture_video(dir: &Path) -> PathBuf {
        let path = dir.join("clip.mp4");
        std::fs::write(&path, b"fixture video bytes").unwrap();
        path
    }

    /// The single job directory created by a run under `base`.
    fn job_dir(base: &Path) -> PathBuf {
        let jobs = base.join(".dublingo").join("jobs");
        let mut entries: Vec<_> = std::fs::read_dir(jobs)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1, "expected exactly one job directory");
        entries.pop().unwrap()
    }

    fn happy_media() -> MockMediaProcessor {
        let mut media = MockMediaProcessor::new();
        media.expect_has_audio_stream().returning(|_| Ok(true));
        media.expect_extract_audio().returning(|_, audio| {
            std::fs::write(audio, b"extracted wav").unwrap();
            Ok(())
        });
        media.expect_transcode_to_wav().returning(|_, wav| {
            std::fs::write(wav, b"speech wav").unwrap();
            Ok(())
        });
        media.expect_probe_duration().returning(|_| Ok(5.0));
        media
            .expect_replace_audio()
            .withf(|_, _, _, duration| *duration == 5.0)
            .returning(|_, _, out, _| {
                std::fs::write(out, b"remuxed video").unwrap();
                Ok(())
            });
        media
    }

    fn happy_transcriber() -> MockTranscriber {
        let mut transcriber = MockTranscriber::new();
        transcriber.expect_transcribe().returning(|_| {
            Ok(Transcript {
                text: "Hello world".to_string(),
                language: Some("en".to_string()),
            })
        });
        transcriber
    }

    fn happy_translator() -> MockTranslator {
        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .returning(|_, _| Ok("Bonjour le monde".to_string()));
        translator
    }

    fn happy_synthesizer() -> MockSpeechSynthesizer {
        let mut synthesizer = MockSpeechSynthesizer::new();
        synthesizer
            .expect_synthesize()
            .withf(|_, voice, _| voice == "fr")
            .returning(|_, _, out| {
                std::fs::write(out, b"speech mp3").unwrap();
                Ok(())
            });
        synthesizer
    }

    #[tokio::test]
    async fn test_successful_run_reaches_presented_and_cleans_up() {
        let base = tempfile::tempdir().unwrap();
        let input = write_fixture_video(base.path());
        let output = base.path().join("dubbed.mp4");

        let mut pipeline = Pipeline::with_components(
            Box::new(happy_media()),
            Box::new(happy_transcriber()),
            Box::new(happy_translator()),
            Box::new(happy_synthesizer()),
        );

        let report = pipeline
            .run(&input, "french", &output, base.path())
            .await;

        assert!(report.succeeded());
        assert_eq!(report.state, PipelineState::Presented);
        assert_eq!(report.transcript.as_deref(), Some("Hello world"));
        assert_eq!(report.translation.as_deref(), Some("Bonjour le monde"));
        assert!(report.failure.is_none());

        // Final video presented at the caller's path, non-empty
        assert_eq!(std::fs::read(&output).unwrap(), b"remuxed video");

        // Intermediates removed, ingested source retained
        let job = job_dir(base.path());
        assert!(!job.join("audio.wav").exists());
        assert!(!job.join("translated_audio.mp3").exists());
        assert!(!job.join("translated_audio.wav").exists());
        assert!(!job.join("translated_video.mp4").exists());
        assert!(job.join("uploaded_video.mp4").exists());
    }

    #[tokio::test]
    async fn test_repeated_runs_with_the_same_input_both_succeed() {
        let base = tempfile::tempdir().unwrap();
        let input = write_fixture_video(base.path());
        let output = base.path().join("dubbed.mp4");

        for _ in 0..2 {
            let mut pipeline = Pipeline::with_components(
                Box::new(happy_media()),
                Box::new(happy_transcriber()),
                Box::new(happy_translator()),
                Box::new(happy_synthesizer()),
            );

            let report = pipeline
                .run(&input, "french", &output, base.path())
                .await;
            assert!(report.succeeded());
            assert!(std::fs::metadata(&output).unwrap().len() > 0);
        }
    }

    #[tokio::test]
    async fn test_missing_audio_track_stops_before_transcription() {
        let base = tempfile::tempdir().unwrap();
        let input = write_fixture_video(base.path());
        let output = base.path().join("dubbed.mp4");

        let mut media = MockMediaProcessor::new();
        media.expect_has_audio_stream().returning(|_| Ok(false));
        media.expect_extract_audio().times(0);

        let mut transcriber = MockTranscriber::new();
        transcriber.expect_transcribe().times(0);
        let mut translator = MockTranslator::new();
        translator.expect_translate().times(0);
        let mut synthesizer = MockSpeechSynthesizer::new();
        synthesizer.expect_synthesize().times(0);

        let mut pipeline = Pipeline::with_components(
            Box::new(media),
            Box::new(transcriber),
            Box::new(translator),
            Box::new(synthesizer),
        );

        let report = pipeline
            .run(&input, "french", &output, base.path())
            .await;

        assert_eq!(report.state, PipelineState::Aborted);
        let failure = report.failure.unwrap();
        assert_eq!(failure.stage, Stage::ExtractAudio);
        assert_eq!(failure.kind, FailureKind::MissingContent);
        assert!(failure.message.contains("audio"));

        // No audio file was written and nothing was presented
        let job = job_dir(base.path());
        assert!(!job.join("audio.wav").exists());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_unsupported_translation_language_aborts_at_translate() {
        let base = tempfile::tempdir().unwrap();
        let input = write_fixture_video(base.path());
        let output = base.path().join("dubbed.mp4");

        let mut translator = MockTranslator::new();
        translator.expect_translate().returning(|_, language| {
            Err(DubError::UnsupportedLanguage(language.to_string()))
        });
        let mut synthesizer = MockSpeechSynthesizer::new();
        synthesizer.expect_synthesize().times(0);

        let mut pipeline = Pipeline::with_components(
            Box::new(happy_media()),
            Box::new(happy_transcriber()),
            Box::new(translator),
            Box::new(synthesizer),
        );

        let report = pipeline
            .run(&input, "klingon", &output, base.path())
            .await;

        assert_eq!(report.state, PipelineState::Aborted);
        let failure = report.failure.unwrap();
        assert_eq!(failure.stage, Stage::Translate);
        assert_eq!(failure.kind, FailureKind::UnsupportedConfiguration);

        // The transcript produced before the failure is still reported
        assert_eq!(report.transcript.as_deref(), Some("Hello world"));
        assert!(report.translation.is_none());
    }

    #[tokio::test]
    async fn test_language_without_voice_aborts_before_synthesis_call() {
        // "german" has a translation model but no synthesis voice.
        let base = tempfile::tempdir().unwrap();
        let input = write_fixture_video(base.path());
        let output = base.path().join("dubbed.mp4");

        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .returning(|_, _| Ok("Hallo Welt".to_string()));
        let mut synthesizer = MockSpeechSynthesizer::new();
        synthesizer.expect_synthesize().times(0);

        let mut pipeline = Pipeline::with_components(
            Box::new(happy_media()),
            Box::new(happy_transcriber()),
            Box::new(translator),
            Box::new(synthesizer),
        );

        let report = pipeline
            .run(&input, "german", &output, base.path())
            .await;

        assert_eq!(report.state, PipelineState::Aborted);
        let failure = report.failure.unwrap();
        assert_eq!(failure.stage, Stage::Synthesize);
        assert_eq!(failure.kind, FailureKind::UnsupportedConfiguration);
    }

    #[tokio::test]
    async fn test_failure_skips_cleanup_and_leaves_artifacts() {
        let base = tempfile::tempdir().unwrap();
        let input = write_fixture_video(base.path());
        let output = base.path().join("dubbed.mp4");

        let mut media = MockMediaProcessor::new();
        media.expect_has_audio_stream().returning(|_| Ok(true));
        media.expect_extract_audio().returning(|_, audio| {
            std::fs::write(audio, b"extracted wav").unwrap();
            Ok(())
        });

        let mut transcriber = MockTranscriber::new();
        transcriber
            .expect_transcribe()
            .returning(|_| Err(DubError::Transcribe("model exploded".to_string())));

        let mut translator = MockTranslator::new();
        translator.expect_translate().times(0);
        let mut synthesizer = MockSpeechSynthesizer::new();
        synthesizer.expect_synthesize().times(0);

        let mut pipeline = Pipeline::with_components(
            Box::new(media),
            Box::new(transcriber),
            Box::new(translator),
            Box::new(synthesizer),
        );

        let report = pipeline
            .run(&input, "french", &output, base.path())
            .await;

        assert_eq!(report.state, PipelineState::Aborted);
        let failure = report.failure.unwrap();
        assert_eq!(failure.stage, Stage::Transcribe);
        assert_eq!(failure.kind, FailureKind::UpstreamFailure);

        // No cleanup on failure: the extracted audio is left behind
        let job = job_dir(base.path());
        assert!(job.join("audio.wav").exists());
        assert!(job.join("uploaded_video.mp4").exists());
    }

    #[tokio::test]
    async fn test_rejected_upload_aborts_at_ingest() {
        let base = tempfile::tempdir().unwrap();
        let input = base.path().join("document.pdf");
        std::fs::write(&input, b"pdf").unwrap();
        let output = base.path().join("dubbed.mp4");

        let mut media = MockMediaProcessor::new();
        media.expect_has_audio_stream().times(0);

        let mut pipeline = Pipeline::with_components(
            Box::new(media),
            Box::new(MockTranscriber::new()),
            Box::new(MockTranslator::new()),
            Box::new(MockSpeechSynthesizer::new()),
        );

        let report = pipeline
            .run(&input, "french", &output, base.path())
            .await;

        assert_eq!(report.state, PipelineState::Aborted);
        let failure = report.failure.unwrap();
        assert_eq!(failure.stage, Stage::Ingest);
        assert_eq!(failure.kind, FailureKind::UnsupportedConfiguration);
    }

    #[test]
    fn test_states_are_strictly_ordered() {
        use PipelineState::*;
        let order = [
            Idle,
            Uploaded,
            AudioExtracted,
            Transcribed,
            Translated,
            SpeechSynthesized,
            Remuxed,
            Presented,
        ];
        for pair in order.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
