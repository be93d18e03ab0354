use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::error::{DubError, Result};

/// Abstract media processing command representation
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media processing command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Set video codec
    pub fn video_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Set audio codec
    pub fn audio_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Copy video stream
    pub fn copy_video(self) -> Self {
        self.video_codec("copy")
    }

    /// Disable video
    pub fn no_video(self) -> Self {
        self.arg("-vn")
    }

    /// Set audio sample rate
    pub fn audio_sample_rate(self, rate: u32) -> Self {
        self.arg("-ar").arg(rate.to_string())
    }

    /// Set audio channels
    pub fn audio_channels(self, channels: u32) -> Self {
        self.arg("-ac").arg(channels.to_string())
    }

    /// Select a stream from an input
    pub fn map<S: Into<String>>(self, specifier: S) -> Self {
        self.arg("-map").arg(specifier)
    }

    /// Bound output duration in seconds
    pub fn duration(self, seconds: f64) -> Self {
        self.arg("-t").arg(seconds.to_string())
    }

    /// Execute the command, discarding stdout
    pub async fn execute(&self) -> Result<()> {
        self.execute_with_output().await.map(|_| ())
    }

    /// Execute the command and return captured stdout
    pub async fn execute_with_output(&self) -> Result<String> {
        debug!(
            "Executing media processing command: {} {:?}",
            self.binary_path, self.args
        );
        debug!("Description: {}", self.description);

        let mut cmd = Command::new(&self.binary_path);
        cmd.args(&self.args);

        let output = cmd
            .output()
            .map_err(|e| DubError::Media(format!("Failed to execute media processor: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DubError::Media(format!(
                "{} failed: {}",
                self.description, stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Builder for the pipeline's ffmpeg/ffprobe invocations
pub struct MediaCommandBuilder {
    binary_path: String,
    probe_binary_path: String,
}

impl MediaCommandBuilder {
    /// Create a new command builder
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, probe_binary_path: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            probe_binary_path: probe_binary_path.into(),
        }
    }

    /// Build audio extraction command (mono PCM waveform)
    pub fn extract_audio<P: AsRef<Path>>(
        &self,
        video_path: P,
        audio_path: P,
        sample_rate: u32,
    ) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Audio extraction")
            .input(video_path)
            .no_video()
            .audio_codec("pcm_s16le")
            .audio_sample_rate(sample_rate)
            .audio_channels(1)
            .overwrite()
            .output(audio_path)
    }

    /// Build MP3 to PCM waveform transcode command
    pub fn transcode_to_wav<P: AsRef<Path>>(
        &self,
        compressed_path: P,
        wav_path: P,
        sample_rate: u32,
    ) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Audio transcode")
            .input(compressed_path)
            .audio_codec("pcm_s16le")
            .audio_sample_rate(sample_rate)
            .audio_channels(1)
            .overwrite()
            .output(wav_path)
    }

    /// Build remux command replacing the video's audio track.
    ///
    /// The video stream is copied untouched and the output is bounded by the
    /// probed video duration, so the video track governs the final length;
    /// the synthesized speech is never trimmed or padded to fit.
    pub fn replace_audio<P: AsRef<Path>>(
        &self,
        video_path: P,
        audio_path: P,
        output_path: P,
        video_duration: f64,
    ) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Audio replacement")
            .overwrite()
            .input(video_path)
            .input(audio_path)
            .map("0:v:0")
            .map("1:a:0")
            .copy_video()
            .audio_codec("aac")
            .duration(video_duration)
            .output(output_path)
    }

    /// Build audio stream probe command (prints one line per audio stream)
    pub fn probe_audio_streams<P: AsRef<Path>>(&self, video_path: P) -> MediaCommand {
        MediaCommand::new(&self.probe_binary_path, "Audio stream probe")
            .arg("-v")
            .arg("error")
            .arg("-select_streams")
            .arg("a")
            .arg("-show_entries")
            .arg("stream=index")
            .arg("-of")
            .arg("csv=p=0")
            .output(video_path)
    }

    /// Build container duration probe command (prints seconds)
    pub fn probe_duration<P: AsRef<Path>>(&self, video_path: P) -> MediaCommand {
        MediaCommand::new(&self.probe_binary_path, "Duration probe")
            .arg("-v")
            .arg("error")
            .arg("-show_entries")
            .arg("format=duration")
            .arg("-of")
            .arg("default=noprint_wrappers=1:nokey=1")
            .output(video_path)
    }

    /// Build version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Version check").arg("-version")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> MediaCommandBuilder {
        MediaCommandBuilder::new("ffmpeg", "ffprobe")
    }

    #[test]
    fn test_extract_audio_command_strips_video_and_downsamples() {
        let cmd = builder().extract_audio("in.mp4", "out.wav", 16000);
        assert_eq!(cmd.binary_path, "ffmpeg");
        assert_eq!(
            cmd.args,
            vec![
                "-i", "in.mp4", "-vn", "-c:a", "pcm_s16le", "-ar", "16000", "-ac", "1", "-y",
                "out.wav"
            ]
        );
    }

    #[test]
    fn test_replace_audio_copies_video_and_bounds_duration() {
        let cmd = builder().replace_audio("in.mp4", "speech.wav", "out.mp4", 5.2);
        assert!(cmd.args.contains(&"-map".to_string()));
        assert!(cmd.args.contains(&"0:v:0".to_string()));
        assert!(cmd.args.contains(&"1:a:0".to_string()));
        let copy_pos = cmd.args.iter().position(|a| a == "-c:v").unwrap();
        assert_eq!(cmd.args[copy_pos + 1], "copy");
        let t_pos = cmd.args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(cmd.args[t_pos + 1], "5.2");
    }

    #[test]
    fn test_probe_commands_use_ffprobe() {
        let streams = builder().probe_audio_streams("in.mp4");
        assert_eq!(streams.binary_path, "ffprobe");
        assert!(streams.args.contains(&"-select_streams".to_string()));

        let duration = builder().probe_duration("in.mp4");
        assert_eq!(duration.binary_path, "ffprobe");
        assert!(duration.args.contains(&"format=duration".to_string()));
    }

    #[test]
    fn test_transcode_to_wav_uses_pcm() {
        let cmd = builder().transcode_to_wav("speech.mp3", "speech.wav", 24000);
        assert!(cmd.args.contains(&"pcm_s16le".to_string()));
        assert!(cmd.args.contains(&"24000".to_string()));
    }
}
