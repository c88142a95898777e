mod command;
mod console;
mod core;
mod player;
mod watch;

use airband_core::config::Config;
use airband_core::platform;
use airband_core::session::SessionState;
use airband_core::source::load_directories;
use airband_core::store::DirectoryStore;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to a file under the data dir; stdout belongs to the console.
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("airband.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("log file: {}", log_path.display());

    let config = Config::load()?;
    info!("config loaded from {}", Config::config_path().display());

    let session = SessionState::load(&config.paths.state_file);

    let player_binary = config
        .player
        .binary
        .clone()
        .or_else(platform::find_player_binary);

    // Every external input funnels into one channel consumed by AppCore.
    let (event_tx, event_rx) = mpsc::channel::<core::AppEvent>(256);

    // Player lifecycle events get forwarded into the same funnel.
    let (player_tx, mut player_rx) = mpsc::channel::<player::PlayerEvent>(32);
    {
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            while let Some(event) = player_rx.recv().await {
                if event_tx.send(core::AppEvent::Player(event)).await.is_err() {
                    break;
                }
            }
        });
    }

    let player = player::PlayerDriver::new(player_binary, session.volume, player_tx);
    if !player.has_binary() {
        println!("no media player found on PATH; playback will be logged only");
    }
    let watch = watch::WatchList::with_defaults()?;

    let store = DirectoryStore::new();

    // Background loader: one source at a time, continue on error, posting
    // progress so the view refreshes as each directory lands.
    {
        let sources = config.station_sources();
        let store = store.clone();
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            println!("loading {} station directories…", sources.len());
            for source in sources {
                let report = load_directories(std::slice::from_ref(&source), &store).await;
                for (label, count) in report.loaded {
                    let _ = event_tx
                        .send(core::AppEvent::SourceLoaded { label, count })
                        .await;
                }
                for (label, error) in report.failed {
                    let _ = event_tx
                        .send(core::AppEvent::SourceFailed { label, error })
                        .await;
                }
            }
        });
    }

    console::spawn_stdin_reader(event_tx.clone());

    println!("airband (type 'help' for commands)");
    let app = core::AppCore::new(
        store,
        session,
        config.paths.state_file.clone(),
        player,
        watch,
    );
    app.run(event_rx).await?;

    Ok(())
}
