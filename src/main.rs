mod app;

use app::MyApp;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use verse_memory::config::Config;
use verse_memory::database::db::SqliteStore;
use verse_memory::models::{Clock, NewMemoryItem, SystemClock};
use verse_memory::ItemStore;

const SAMPLE_VERSES: [(&str, &str); 3] = [
    (
        "John 3:16",
        "For God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life.",
    ),
    (
        "Psalm 119:105",
        "Thy word is a lamp unto my feet, and a light unto my path.",
    ),
    (
        "Philippians 4:13",
        "I can do all things through Christ which strengtheneth me.",
    ),
];

fn main() -> eframe::Result<()> {
    // Config comes first so the log filter can be taken from it
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Verse Memory v{} starting...", env!("CARGO_PKG_VERSION"));

    let store = match SqliteStore::open(&config.storage.database_path) {
        Ok(store) => store,
        Err(e) => {
            error!(
                "Failed to open database {}: {}",
                config.storage.database_path.display(),
                e
            );
            std::process::exit(1);
        }
    };

    let user_id = config.practice.user_id.clone();
    match store.items_for_user(&user_id) {
        Ok(items) if items.is_empty() => {
            let now = SystemClock.now();
            for (reference, content) in SAMPLE_VERSES {
                if let Err(e) = store.add_item(&user_id, NewMemoryItem::new(reference, content), now) {
                    error!("Failed to add sample verse {}: {}", reference, e);
                }
            }
            info!("Sample verses created for '{}'", user_id);
        }
        Ok(items) => info!("Loaded {} verses for '{}'", items.len(), user_id),
        Err(e) => error!("Failed to load verses: {}", e),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Verse Memory",
        options,
        Box::new(move |_cc| Ok(Box::new(MyApp::new(store, user_id, config.practice.session_limit)))),
    )
}
