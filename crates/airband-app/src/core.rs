//! AppCore: the single consumer of every mutable-state input.
//!
//! Console commands, loader progress and player lifecycle events all
//! funnel into one mpsc channel of `AppEvent`. AppCore owns the view-model,
//! the session state and the player driver exclusively; commands are
//! consumed synchronously, one at a time.

use std::path::PathBuf;

use airband_core::session::SessionState;
use airband_core::store::DirectoryStore;
use airband_core::view::DirectoryView;
use rand::Rng;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::command::{AppCommand, HELP_TEXT};
use crate::player::{PlayerDriver, PlayerEvent};
use crate::watch::{LinkDecision, WatchList};

/// All inputs into the AppCore loop.
#[derive(Debug)]
pub enum AppEvent {
    Command(AppCommand),
    SourceLoaded { label: String, count: usize },
    SourceFailed { label: String, error: String },
    Player(PlayerEvent),
}

#[derive(Debug, Clone)]
pub struct NowPlaying {
    pub name: String,
    pub url: String,
}

pub struct AppCore {
    store: DirectoryStore,
    view: DirectoryView,
    session: SessionState,
    state_file: PathBuf,
    player: PlayerDriver,
    watch: WatchList,
    now_playing: Option<NowPlaying>,
    should_quit: bool,
}

impl AppCore {
    pub fn new(
        store: DirectoryStore,
        session: SessionState,
        state_file: PathBuf,
        player: PlayerDriver,
        watch: WatchList,
    ) -> Self {
        Self {
            store,
            view: DirectoryView::new(),
            session,
            state_file,
            player,
            watch,
            now_playing: None,
            should_quit: false,
        }
    }

    /// Run the event loop until `Quit` or the channel closes.
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<AppEvent>) -> anyhow::Result<()> {
        info!("AppCore: starting event loop");

        while let Some(event) = event_rx.recv().await {
            self.handle_event(event).await;
            if self.should_quit {
                break;
            }
        }

        self.player.stop();
        self.save_session();
        info!("AppCore: event loop finished");
        Ok(())
    }

    pub async fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Command(cmd) => self.handle_command(cmd).await,
            AppEvent::SourceLoaded { label, count } => {
                println!("loaded {} stations from {}", count, label);
                self.refresh_view().await;
            }
            AppEvent::SourceFailed { label, error } => {
                // Already logged by the loader; surface it on the console too.
                println!("directory {} unavailable: {}", label, error);
            }
            AppEvent::Player(event) => self.handle_player_event(event),
        }
    }

    async fn handle_command(&mut self, cmd: AppCommand) {
        match cmd {
            AppCommand::Activate { row } => {
                if let Some(row) = row {
                    self.view.select_row(row);
                }
                self.activate_selected().await;
            }
            AppCommand::ActivateCustom(address) => self.activate_custom(&address).await,
            AppCommand::Stop => {
                self.player.stop();
                self.now_playing = None;
                println!("stopped");
            }
            AppCommand::Filter(field, pattern) => {
                self.view.set_filter_field(field, &pattern);
                println!(
                    "filter {}={:?}: {} of {} visible",
                    field.label(),
                    self.view.filter().pattern(field).unwrap_or(""),
                    self.view.len(),
                    self.view.total_len()
                );
            }
            AppCommand::ClearFilter => {
                self.view.clear_filter();
                println!("filters cleared: {} visible", self.view.len());
            }
            AppCommand::Sort(key) => {
                self.view.set_sort(key);
                println!("sorted by {}", key.label());
            }
            AppCommand::CycleSort => {
                let key = self.view.cycle_sort();
                println!("sorted by {}", key.label());
            }
            AppCommand::SelectUp(n) => self.view.select_up(n),
            AppCommand::SelectDown(n) => self.view.select_down(n),
            AppCommand::SelectFirst => self.view.select_first(),
            AppCommand::SelectLast => self.view.select_last(),
            AppCommand::Random => {
                if self.view.is_empty() {
                    println!("nothing to play");
                } else {
                    let row = rand::thread_rng().gen_range(0..self.view.len());
                    self.view.select_row(row);
                    self.activate_selected().await;
                }
            }
            AppCommand::Volume(percent) => {
                let volume = percent as f32 / 100.0;
                self.session.set_volume(volume);
                self.player.volume = self.session.volume;
                self.save_session();
                println!("volume {}% (applies to the next station)", percent);
            }
            AppCommand::List => self.print_table(),
            AppCommand::Help => println!("{}", HELP_TEXT),
            AppCommand::Quit => self.should_quit = true,
        }
    }

    fn handle_player_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Opening(url) => info!("player opening {}", url),
            PlayerEvent::Finished => {
                info!("player finished");
                if let Some(np) = self.now_playing.take() {
                    println!("finished: {}", np.name);
                }
            }
            PlayerEvent::Error(message) => {
                warn!("player error: {}", message);
                self.now_playing = None;
                println!("player error: {}", message);
            }
        }
    }

    /// Re-snapshot the store if it moved past the view's revision.
    async fn refresh_view(&mut self) {
        if self.store.rev().await != self.view.seen_rev() {
            let (entries, rev) = self.store.snapshot().await;
            self.view.set_entries(entries, rev);
        }
    }

    async fn activate_selected(&mut self) {
        let Some(entry) = self.view.selected_entry().cloned() else {
            println!("nothing selected");
            return;
        };
        self.play(&entry.name, &entry.url).await;
    }

    async fn activate_custom(&mut self, address: &str) {
        match self.watch.decide(address) {
            LinkDecision::Intercept => {
                info!("intercepted watch link: {}", address);
                self.play(address, address).await;
            }
            LinkDecision::PassThrough => {
                self.play(address, address).await;
            }
            LinkDecision::Reject => {
                println!("not a playable address: {}", address.trim());
            }
        }
    }

    async fn play(&mut self, name: &str, url: &str) {
        match self.player.play(url).await {
            Ok(()) => {
                self.now_playing = Some(NowPlaying {
                    name: name.to_string(),
                    url: url.to_string(),
                });
                self.session.record_play(name, url);
                self.save_session();
                println!("playing: {}", name);
            }
            Err(e) => {
                warn!("failed to start player for {}: {}", url, e);
                println!("failed to play {}: {}", name, e);
            }
        }
    }

    fn save_session(&self) {
        if let Err(e) = self.session.save(&self.state_file) {
            warn!("failed to save session state: {}", e);
        }
    }

    fn print_table(&self) {
        if self.view.total_len() == 0 {
            println!("no stations loaded yet");
            return;
        }
        if self.view.is_empty() {
            println!("no stations match the current filters");
            return;
        }

        println!(
            "{:>4}  {:<12} {:<32} {:<16} {:<8} address",
            "", "directory", "name", "genre", "type"
        );
        for (row, entry) in self.view.visible_entries().enumerate() {
            let marker = if row == self.view.selected_index() {
                '>'
            } else {
                ' '
            };
            println!(
                "{} {:>2}  {:<12} {:<32} {:<16} {:<8} {}",
                marker,
                row,
                clip(&entry.directory, 12),
                clip(&entry.name, 32),
                clip(&entry.genre, 16),
                clip(&entry.kind, 8),
                entry.url
            );
        }
        println!(
            "{} visible of {} (sort: {})",
            self.view.len(),
            self.view.total_len(),
            self.view.sort().label()
        );
        if let Some(np) = &self.now_playing {
            println!("now playing: {} ({})", np.name, np.url);
        }
    }
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airband_core::entry::DirectoryEntry;
    use airband_core::filter::FilterField;
    use airband_core::view::SortKey;

    fn entry(name: &str, genre: &str) -> DirectoryEntry {
        DirectoryEntry::new(
            "test",
            name,
            format!("http://example.com/{}", name.to_lowercase()),
            "MP3",
            genre,
        )
    }

    async fn core_with(entries: Vec<DirectoryEntry>) -> (AppCore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state_file = dir.path().join("state.json");
        let store = DirectoryStore::new();
        store.append_batch(entries).await;

        let (player_tx, _player_rx) = mpsc::channel(16);
        let player = PlayerDriver::new(None, 0.5, player_tx);
        let mut core = AppCore::new(
            store,
            SessionState::default(),
            state_file,
            player,
            WatchList::with_defaults().unwrap(),
        );
        core.refresh_view().await;
        (core, dir)
    }

    #[tokio::test]
    async fn activate_records_play_and_now_playing() {
        let (mut core, _dir) = core_with(vec![entry("Alpha", "Rock"), entry("Beta", "Jazz")]).await;

        core.handle_event(AppEvent::Command(AppCommand::Activate { row: Some(1) }))
            .await;

        let np = core.now_playing.as_ref().expect("now playing set");
        assert_eq!(np.name, "Beta");
        assert_eq!(core.session.recent.len(), 1);
        assert_eq!(
            core.session.last_url.as_deref(),
            Some("http://example.com/beta")
        );
    }

    #[tokio::test]
    async fn stop_clears_now_playing() {
        let (mut core, _dir) = core_with(vec![entry("Alpha", "Rock")]).await;
        core.handle_event(AppEvent::Command(AppCommand::Activate { row: None }))
            .await;
        assert!(core.now_playing.is_some());

        core.handle_event(AppEvent::Command(AppCommand::Stop)).await;
        assert!(core.now_playing.is_none());
    }

    #[tokio::test]
    async fn filter_and_sort_commands_drive_the_view() {
        let (mut core, _dir) = core_with(vec![
            entry("Zeta", "Rock"),
            entry("Alpha", "Rocksteady"),
            entry("Mid", "Jazz"),
        ])
        .await;

        core.handle_event(AppEvent::Command(AppCommand::Filter(
            FilterField::Genre,
            "roc".to_string(),
        )))
        .await;
        core.handle_event(AppEvent::Command(AppCommand::Sort(SortKey::Name)))
            .await;

        let names: Vec<String> = core.view.visible_entries().map(|e| e.name.clone()).collect();
        assert_eq!(names, ["Alpha", "Zeta"]);

        core.handle_event(AppEvent::Command(AppCommand::ClearFilter))
            .await;
        assert_eq!(core.view.len(), 3);
    }

    #[tokio::test]
    async fn source_loaded_event_refreshes_the_view() {
        let (mut core, _dir) = core_with(vec![entry("Alpha", "Rock")]).await;
        assert_eq!(core.view.len(), 1);

        core.store.append_batch(vec![entry("Beta", "Jazz")]).await;
        core.handle_event(AppEvent::SourceLoaded {
            label: "second".to_string(),
            count: 1,
        })
        .await;
        assert_eq!(core.view.len(), 2);
    }

    #[tokio::test]
    async fn rejected_custom_address_does_not_play() {
        let (mut core, _dir) = core_with(vec![]).await;
        core.handle_event(AppEvent::Command(AppCommand::ActivateCustom(
            "definitely not a url".to_string(),
        )))
        .await;
        assert!(core.now_playing.is_none());
        assert!(core.session.recent.is_empty());
    }

    #[tokio::test]
    async fn custom_watch_link_plays() {
        let (mut core, _dir) = core_with(vec![]).await;
        core.handle_event(AppEvent::Command(AppCommand::ActivateCustom(
            "https://www.youtube.com/watch?v=abc".to_string(),
        )))
        .await;
        assert!(core.now_playing.is_some());
    }

    #[tokio::test]
    async fn player_finish_clears_now_playing() {
        let (mut core, _dir) = core_with(vec![entry("Alpha", "Rock")]).await;
        core.handle_event(AppEvent::Command(AppCommand::Activate { row: None }))
            .await;
        core.handle_event(AppEvent::Player(PlayerEvent::Finished))
            .await;
        assert!(core.now_playing.is_none());
    }

    #[tokio::test]
    async fn volume_command_updates_session_and_driver() {
        let (mut core, _dir) = core_with(vec![]).await;
        core.handle_event(AppEvent::Command(AppCommand::Volume(35)))
            .await;
        assert!((core.session.volume - 0.35).abs() < f32::EPSILON);
    }
}
