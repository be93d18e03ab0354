//! Dublingo - Automated Video Dubbing Workflow
//!
//! This is the main entry point for the Dublingo application: transcribe a
//! video's speech with whisper, translate the transcript, synthesize speech
//! for the translation, and remux the synthesized track onto the original
//! video using ffmpeg.

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dublingo::cli::{Args, Commands};
use dublingo::config::Config;
use dublingo::error::DubError;
use dublingo::languages;
use dublingo::media::MediaProcessorFactory;
use dublingo::pipeline::Pipeline;
use dublingo::synthesize::SynthesizerFactory;
use dublingo::transcribe::TranscriberFactory;
use dublingo::translate::TranslatorFactory;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    // Execute command
    match args.command {
        Commands::Run {
            input,
            language,
            output,
        } => {
            info!("Dubbing {} into {}", input.display(), language);

            let mut pipeline = Pipeline::new(config)?;
            let base_dir = std::env::current_dir()?;

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
            spinner.set_message(format!("Dubbing {} into {}", input.display(), language));
            spinner.enable_steady_tick(Duration::from_millis(120));

            let report = pipeline.run(&input, &language, &output, &base_dir).await;
            spinner.finish_and_clear();

            if let Some(transcript) = &report.transcript {
                println!("Transcript:\n{}\n", transcript);
            }
            if let Some(translation) = &report.translation {
                println!("Translation ({}):\n{}\n", language, translation);
            }

            match report.failure {
                None => {
                    println!("Translated video written to {}", output.display());
                }
                Some(failure) => {
                    eprintln!("Error: {}", failure.message);
                    std::process::exit(1);
                }
            }
        }
        Commands::Extract { input, output } => {
            info!("Extracting audio from: {}", input.display());

            let media = MediaProcessorFactory::create_processor(config.media.clone());
            media.check_availability()?;

            if !media.has_audio_stream(&input).await? {
                return Err(DubError::NoAudioTrack.into());
            }
            media.extract_audio(&input, &output).await?;
            println!("Audio written to {}", output.display());
        }
        Commands::Transcribe { input, output } => {
            info!("Transcribing audio: {}", input.display());

            let transcriber = TranscriberFactory::create_default(config.transcriber.clone());
            let transcript = transcriber.transcribe(&input).await?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &transcript.text)?;
                    println!("Transcript written to {}", path.display());
                }
                None => println!("{}", transcript.text),
            }
        }
        Commands::Translate {
            input,
            language,
            output,
        } => {
            info!("Translating {} to {}", input.display(), language);

            let text = std::fs::read_to_string(&input)?;
            let mut translator = TranslatorFactory::create_translator(config.translate.clone());
            let translation = translator.translate(&text, &language).await?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &translation)?;
                    println!("Translation written to {}", path.display());
                }
                None => println!("{}", translation),
            }
        }
        Commands::Synthesize {
            input,
            language,
            output,
        } => {
            info!("Synthesizing speech for {} in {}", input.display(), language);

            let voice = languages::voice_code(&language)
                .ok_or_else(|| DubError::UnsupportedLanguage(language.clone()))?;

            let text = std::fs::read_to_string(&input)?;
            let synthesizer = SynthesizerFactory::create_synthesizer(config.synthesis.clone());
            let media = MediaProcessorFactory::create_processor(config.media.clone());

            let compressed = output.with_extension("mp3");
            synthesizer.synthesize(&text, voice, &compressed).await?;
            media.transcode_to_wav(&compressed, &output).await?;
            println!("Synthesized speech written to {}", output.display());
        }
        Commands::Remux {
            video,
            audio,
            output,
        } => {
            info!(
                "Replacing audio in {} with {}",
                video.display(),
                audio.display()
            );

            let media = MediaProcessorFactory::create_processor(config.media.clone());
            let duration = media.probe_duration(&video).await?;
            media
                .replace_audio(&video, &audio, &output, duration)
                .await?;
            println!("Remuxed video written to {}", output.display());
        }
        Commands::Languages => {
            println!("Supported dubbing languages:");
            for language in languages::offered_languages() {
                println!("  {}", language);
            }
        }
    }

    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let app_dir = std::env::current_dir()?.join(".dublingo");
    let log_dir = app_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "dublingo.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
