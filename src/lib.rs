//! Dublingo - Automated Video Dubbing Workflow
//!
//! A Rust implementation of a video dubbing pipeline: transcribe a video's
//! speech with whisper, translate the transcript, synthesize speech for the
//! translation, and remux the synthesized track onto the original video
//! using ffmpeg.

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod job;
pub mod languages;
pub mod media;
pub mod pipeline;
pub mod synthesize;
pub mod transcribe;
pub mod translate;
