//! Alert sound playback. Playback is started and left to finish on its own.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use hubbell_common::error::AppError;
use hubbell_engine::ports::SoundPlayer;

/// Plays the sound file through an external player such as `paplay` or `afplay`.
pub struct CommandSoundPlayer {
    command: String,
    sound_path: PathBuf,
}

impl CommandSoundPlayer {
    pub fn new(command: &str, sound_path: impl Into<PathBuf>) -> Self {
        Self {
            command: command.to_string(),
            sound_path: sound_path.into(),
        }
    }
}

#[async_trait]
impl SoundPlayer for CommandSoundPlayer {
    async fn play(&self) -> Result<(), AppError> {
        if !self.sound_path.exists() {
            return Err(AppError::Sound(format!(
                "sound file {} not found",
                self.sound_path.display()
            )));
        }

        Command::new(&self.command)
            .arg(&self.sound_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AppError::Sound(format!("failed to run {}: {}", self.command, e)))?;

        Ok(())
    }
}

/// Decodes and plays the sound file in-process.
#[cfg(feature = "audio")]
pub struct RodioSoundPlayer {
    sound_path: PathBuf,
}

#[cfg(feature = "audio")]
impl RodioSoundPlayer {
    pub fn new(sound_path: impl Into<PathBuf>) -> Self {
        Self {
            sound_path: sound_path.into(),
        }
    }
}

#[cfg(feature = "audio")]
#[async_trait]
impl SoundPlayer for RodioSoundPlayer {
    async fn play(&self) -> Result<(), AppError> {
        if !self.sound_path.exists() {
            return Err(AppError::Sound(format!(
                "sound file {} not found",
                self.sound_path.display()
            )));
        }

        let path = self.sound_path.clone();
        // The output stream is not Send; it lives and dies on the blocking thread.
        tokio::task::spawn_blocking(move || {
            if let Err(e) = play_file(&path) {
                tracing::warn!(error = %e, path = %path.display(), "Alert sound failed");
            }
        });

        Ok(())
    }
}

#[cfg(feature = "audio")]
fn play_file(path: &std::path::Path) -> Result<(), AppError> {
    let (_stream, handle) =
        rodio::OutputStream::try_default().map_err(|e| AppError::Sound(e.to_string()))?;
    let sink = rodio::Sink::try_new(&handle).map_err(|e| AppError::Sound(e.to_string()))?;

    let file = std::fs::File::open(path).map_err(|e| AppError::Sound(e.to_string()))?;
    let source = rodio::Decoder::new(std::io::BufReader::new(file))
        .map_err(|e| AppError::Sound(e.to_string()))?;

    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
