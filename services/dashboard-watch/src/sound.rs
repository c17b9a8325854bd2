//! Alert sound playback

use std::io::Write;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use crate::config::SoundConfig;

/// Trait for playing the emergency sound
#[async_trait]
pub trait AlertSound: Send + Sync + std::fmt::Debug {
    /// Start playback from the beginning
    async fn play(&self) -> crate::Result<()>;

    /// Stop playback and rewind
    async fn stop(&self) -> crate::Result<()>;
}

/// Build the configured sound, falling back to the terminal bell
pub fn from_config(config: Option<&SoundConfig>) -> Arc<dyn AlertSound> {
    match config {
        Some(sound) => Arc::new(CommandSound::new(sound)),
        None => Arc::new(TerminalBell),
    }
}

/// Plays the alert through an external player process
#[derive(Debug)]
pub struct CommandSound {
    command: String,
    args: Vec<String>,
    child: Mutex<Option<Child>>,
}

impl CommandSound {
    pub fn new(config: &SoundConfig) -> Self {
        tracing::debug!(
            "Created CommandSound '{}' with args {:?}",
            config.command,
            config.args
        );
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            child: Mutex::new(None),
        }
    }
}

async fn stop_child(slot: &mut Option<Child>) -> crate::Result<()> {
    let Some(mut child) = slot.take() else {
        return Ok(());
    };
    if let Ok(Some(_)) = child.try_wait() {
        return Ok(());
    }
    child
        .kill()
        .await
        .map_err(|e| crate::WatchError::Sound(format!("Stopping player: {}", e)))
}

#[async_trait]
impl AlertSound for CommandSound {
    async fn play(&self) -> crate::Result<()> {
        let mut slot = self.child.lock().await;
        stop_child(&mut slot).await?;

        let child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                crate::WatchError::Sound(format!("Starting player '{}': {}", self.command, e))
            })?;

        tracing::debug!("Playing alert sound via '{}'", self.command);
        *slot = Some(child);
        Ok(())
    }

    async fn stop(&self) -> crate::Result<()> {
        let mut slot = self.child.lock().await;
        stop_child(&mut slot).await
    }
}

/// Rings the terminal bell
#[derive(Debug, Default)]
pub struct TerminalBell;

#[async_trait]
impl AlertSound for TerminalBell {
    async fn play(&self) -> crate::Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(b"\x07")?;
        stdout.flush()?;
        Ok(())
    }

    async fn stop(&self) -> crate::Result<()> {
        Ok(())
    }
}
