//! Driver for the external native player process.
//!
//! One child at a time: `play` replaces any running child, `stop` kills it.
//! Lifecycle events flow back to the app core through an mpsc channel. A
//! manual stop (or replacement) produces no `Finished` event; the core
//! already knows why playback ended.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// The player was handed a new address.
    Opening(String),
    /// The player exited cleanly on its own.
    Finished,
    Error(String),
}

pub struct PlayerDriver {
    binary: Option<PathBuf>,
    /// Signals the waiter task to kill the current child.
    kill_tx: Option<oneshot::Sender<()>>,
    event_tx: mpsc::Sender<PlayerEvent>,
    /// Volume passed to the next spawn, 0.0–1.0.
    pub volume: f32,
}

impl PlayerDriver {
    pub fn new(binary: Option<PathBuf>, volume: f32, event_tx: mpsc::Sender<PlayerEvent>) -> Self {
        match &binary {
            Some(b) => info!("player binary: {}", b.display()),
            None => warn!("no player binary found; playback will be logged only"),
        }
        Self {
            binary,
            kill_tx: None,
            event_tx,
            volume,
        }
    }

    pub fn has_binary(&self) -> bool {
        self.binary.is_some()
    }

    /// Stop whatever is playing and start the given address.
    pub async fn play(&mut self, url: &str) -> anyhow::Result<()> {
        self.stop();

        let Some(binary) = self.binary.clone() else {
            info!("would play {} (no player binary)", url);
            let _ = self
                .event_tx
                .send(PlayerEvent::Opening(url.to_string()))
                .await;
            return Ok(());
        };

        let mut cmd = tokio::process::Command::new(&binary);
        if is_mpv(&binary) {
            cmd.arg(format!(
                "--volume={}",
                (self.volume * 100.0).clamp(0.0, 100.0).round() as i64
            ));
        }
        cmd.arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let mut child = cmd.spawn()?;
        info!("player spawned for {}", url);
        let _ = self
            .event_tx
            .send(PlayerEvent::Opening(url.to_string()))
            .await;

        let (kill_tx, kill_rx) = oneshot::channel::<()>();
        self.kill_tx = Some(kill_tx);

        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                status = child.wait() => {
                    let event = match status {
                        Ok(s) if s.success() => PlayerEvent::Finished,
                        Ok(s) => PlayerEvent::Error(format!("player exited with {}", s)),
                        Err(e) => PlayerEvent::Error(format!("player wait failed: {}", e)),
                    };
                    let _ = event_tx.send(event).await;
                }
                _ = kill_rx => {
                    let _ = child.kill().await;
                }
            }
        });

        Ok(())
    }

    /// Kill the current child, if any. No event is emitted.
    pub fn stop(&mut self) {
        if let Some(kill_tx) = self.kill_tx.take() {
            let _ = kill_tx.send(());
        }
    }
}

impl Drop for PlayerDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn is_mpv(binary: &PathBuf) -> bool {
    binary
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.starts_with("mpv"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binaryless_driver_still_reports_opening() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut driver = PlayerDriver::new(None, 0.5, tx);
        assert!(!driver.has_binary());

        driver.play("http://example.com/stream").await.unwrap();
        match rx.recv().await {
            Some(PlayerEvent::Opening(url)) => assert_eq!(url, "http://example.com/stream"),
            other => panic!("expected Opening, got {:?}", other),
        }
    }

    #[test]
    fn mpv_detection_by_file_stem() {
        assert!(is_mpv(&PathBuf::from("/usr/bin/mpv")));
        assert!(is_mpv(&PathBuf::from("mpv.exe")));
        assert!(!is_mpv(&PathBuf::from("/usr/bin/vlc")));
    }
}
