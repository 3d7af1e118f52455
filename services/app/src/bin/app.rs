//! services/app/src/bin/app.rs
//!
//! Thin launcher: loads configuration, wires the adapters into a reader
//! session for the novel id given on the command line, and drives it from
//! stdin. All behavior lives in the library crates.

use app_lib::{
    adapters::{FileStore, NullSynthesizer, RestGateway},
    config::Config,
    error::AppError,
    reader::{navigation::PAGE_TURN_ANIMATION_MS, ReaderSession},
};
use novelink_core::ports::{ContentGateway, KeyValueStore, SpeechSynthesizer};
use std::io::BufRead;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

fn print_page(session: &ReaderSession) {
    println!(
        "\n== {} | page {}/{} | {} ==",
        session.novel().title,
        session.current_page() + 1,
        session.page_count().max(1),
        session.created_date(),
    );
    for fragment in session.current_fragments() {
        println!("{}", fragment.spoken_text());
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting reader...");

    let novel_id = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<Uuid>().ok())
        .ok_or_else(|| AppError::Internal("usage: app <novel-uuid>".to_string()))?;

    // --- 2. Initialize Adapters ---
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.store_path));
    let gateway: Arc<dyn ContentGateway> = Arc::new(RestGateway::new(
        reqwest::Client::new(),
        config.gateway_url.clone(),
        config.gateway_api_key.clone(),
    ));
    // No audio device on a headless host; speech requests are logged.
    let synth: Arc<dyn SpeechSynthesizer> = Arc::new(NullSynthesizer::new());

    // --- 3. Open the Reading Session ---
    let mut session = ReaderSession::open(
        store,
        gateway,
        synth,
        novel_id,
        false,
        &config.speech_locale,
    )
    .await?;
    print_page(&session);

    // --- 4. Drive It From Stdin ---
    let started = Instant::now();
    println!("(a/d page, home/end jump, s speech, m dark mode, q quit)");
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let now_ms = started.elapsed().as_millis() as u64;
        let code = match line.trim() {
            "a" => "ArrowLeft",
            "d" => "ArrowRight",
            "home" => "Home",
            "end" => "End",
            "s" => {
                let speaking = session.toggle_speech();
                println!("(speech {})", if speaking { "on" } else { "off" });
                continue;
            }
            "m" => {
                session.toggle_dark_mode();
                println!("(dark mode {})", if session.dark_mode() { "on" } else { "off" });
                continue;
            }
            "q" => break,
            _ => continue,
        };

        if session.handle_key(code, false, now_ms, 0.0) {
            // Run the page-turn animation to completion before redrawing.
            session.tick(now_ms + PAGE_TURN_ANIMATION_MS);
            print_page(&session);
        }
    }

    info!("Reader closed.");
    Ok(())
}
