use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full dubbing pipeline on a video file
    Run {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Target language for the dub (see `languages`)
        #[arg(short, long)]
        language: String,

        /// Output video file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Extract the audio track from a video file
    Extract {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Output audio file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Transcribe an audio file to text
    Transcribe {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,

        /// Output transcript file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Translate a text file into a target language
    Translate {
        /// Input text file
        #[arg(short, long)]
        input: PathBuf,

        /// Target language
        #[arg(short, long)]
        language: String,

        /// Output text file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Synthesize speech for a text file
    Synthesize {
        /// Input text file
        #[arg(short, long)]
        input: PathBuf,

        /// Target language (selects the synthesis voice)
        #[arg(short, long)]
        language: String,

        /// Output waveform audio file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Replace a video's audio track with a waveform file
    Remux {
        /// Input video file
        #[arg(long)]
        video: PathBuf,

        /// Replacement audio file
        #[arg(long)]
        audio: PathBuf,

        /// Output video file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the languages the dubbing pipeline can target
    Languages,
}
