//! Minimal stdin console. Stands in for the presentation layer by turning
//! typed lines into `AppCommand`s.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::warn;

use crate::command::{self, AppCommand};
use crate::core::AppEvent;

pub fn spawn_stdin_reader(event_tx: mpsc::Sender<AppEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match command::parse_line(line) {
                        Ok(cmd) => {
                            if event_tx.send(AppEvent::Command(cmd)).await.is_err() {
                                break;
                            }
                        }
                        Err(message) => println!("? {}", message),
                    }
                }
                // EOF: treat like quit so the loop shuts down cleanly.
                Ok(None) => {
                    let _ = event_tx.send(AppEvent::Command(AppCommand::Quit)).await;
                    break;
                }
                Err(e) => {
                    warn!("stdin read error: {}", e);
                    break;
                }
            }
        }
    })
}
