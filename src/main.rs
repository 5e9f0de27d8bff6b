use std::sync::Arc;

use academy::scheme::{self, FixedSchemeSource, HostColorScheme, OsSchemeSource, SchemeSource};
use academy::storage::{FileStore, KeyValueStore, MemoryStore};
use academy::{AppConfig, AuthStore, ThemeStore, ThemeStoreConfig, categories, load_catalog};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();

    let storage: Arc<dyn KeyValueStore> = match &config.data_dir {
        Some(dir) => {
            info!(path = %dir.display(), "using file storage");
            Arc::new(FileStore::new(dir))
        }
        None => {
            warn!("no data directory available; preferences will not survive restart");
            Arc::new(MemoryStore::new())
        }
    };

    let source: Arc<dyn SchemeSource> = if config.detect_scheme {
        Arc::new(OsSchemeSource)
    } else {
        Arc::new(FixedSchemeSource(HostColorScheme::Light))
    };
    let host = scheme::probe(source.clone()).await;

    let theme = ThemeStore::new(
        storage.clone(),
        host,
        ThemeStoreConfig { key: config.theme_key.clone(), init_timeout: config.init_timeout },
    );
    let auth = AuthStore::new(storage, config.init_timeout);

    // Both reads are bounded by init_timeout, so first render is never held up indefinitely.
    let (theme_outcome, auth_outcome) = tokio::join!(theme.initialize(), auth.hydrate());
    let appearance = theme.appearance();
    info!(
        preference = %appearance.preference,
        host = ?appearance.host,
        is_dark = appearance.is_dark,
        theme = ?theme_outcome,
        auth = ?auth_outcome,
        signed_in = auth.is_authenticated(),
        "academy ready"
    );

    theme.subscribe(|a| info!(preference = %a.preference, is_dark = a.is_dark, "appearance changed"));
    auth.subscribe(|s| info!(signed_in = s.is_authenticated, "session changed"));

    if let Some(path) = &config.catalog_path {
        match load_catalog(path).await {
            Ok(courses) => info!(count = courses.len(), categories = ?categories(&courses), "catalog available"),
            Err(e) => error!(error = %e, path = %path.display(), "catalog unavailable"),
        }
    }

    let watcher = scheme::spawn_scheme_watcher(source, theme.clone(), config.scheme_poll_interval);

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }

    info!("shutting down");
    watcher.abort();
    theme.flush().await;
    auth.flush().await;
}
