//! # State Module
//!
//! Shared application state handed to every handler.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  Arc<AppState>                                                          │
//! │  ├── store: Arc<dyn SalesStore>   SQLite, or demo memory when offline  │
//! │  ├── connected: bool              false once the fallback is active    │
//! │  ├── catalog: RwLock<ProductCatalog>                                    │
//! │  ├── company: RwLock<CompanyInfo>                                       │
//! │  ├── notifier: Notifier                                                 │
//! │  ├── settings: Option<SettingsStore>                                    │
//! │  └── edit_lock: Mutex<()>         one catalog/company edit at a time   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • store: each backend serializes its own writes                       │
//! │  • catalog / company: tokio RwLock, many readers or one editor         │
//! │  • edits change a copy, persist it, then swap it in; a failed write    │
//! │    leaves the live value untouched                                     │
//! │  • everything else is read-only after bootstrap                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod settings;

pub use settings::{Settings, SettingsError, SettingsStore};

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use uriage_core::catalog::ProductCatalog;
use uriage_core::company::CompanyInfo;
use uriage_core::TaxRate;
use uriage_db::{Database, DbConfig, MemorySalesStore, SalesStore};
use uriage_notify::Notifier;

use crate::config::{ConfigError, ServerConfig};

/// Handle type used by the router.
pub type SharedState = Arc<AppState>;

/// Everything a request may touch.
pub struct AppState {
    store: Arc<dyn SalesStore>,
    connected: bool,
    database: Option<Database>,
    catalog: RwLock<ProductCatalog>,
    company: RwLock<CompanyInfo>,
    notifier: Notifier,
    settings: Option<SettingsStore>,
    edit_lock: Mutex<()>,
    notify_on_save: bool,
    default_tax_rate: TaxRate,
}

impl AppState {
    /// Builds state around an already chosen store.
    ///
    /// Catalog and company info start at their defaults and nothing is
    /// persisted until [`with_settings`](Self::with_settings) is called.
    pub fn new(store: Arc<dyn SalesStore>, connected: bool, notifier: Notifier) -> Self {
        Self {
            store,
            connected,
            database: None,
            catalog: RwLock::new(ProductCatalog::default()),
            company: RwLock::new(CompanyInfo::default()),
            notifier,
            settings: None,
            edit_lock: Mutex::new(()),
            notify_on_save: true,
            default_tax_rate: TaxRate::Standard,
        }
    }

    /// Loads catalog and company info from `settings` and saves edits back.
    pub fn with_settings(mut self, settings: SettingsStore) -> Result<Self, SettingsError> {
        let loaded = settings.load()?;
        self.apply_settings(loaded);
        self.settings = Some(settings);
        Ok(self)
    }

    fn apply_settings(&mut self, loaded: Settings) {
        if let Some(company) = loaded.company_info {
            self.company = RwLock::new(company);
        }
        if let Some(products) = loaded.products {
            self.catalog = RwLock::new(products);
        }
    }

    pub fn with_notify_on_save(mut self, enabled: bool) -> Self {
        self.notify_on_save = enabled;
        self
    }

    pub fn with_default_tax_rate(mut self, rate: TaxRate) -> Self {
        self.default_tax_rate = rate;
        self
    }

    /// Connects everything described by `config`.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  1. Open SQLite + run migrations                                    │
    /// │     └── fails? ──► warn!, MemorySalesStore::demo(), connected=false │
    /// │  2. Load settings.toml                                              │
    /// │     └── unreadable? ──► warn!, defaults, edits still saved          │
    /// │  3. Build the notifier (token from config / env only)               │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn bootstrap(config: &ServerConfig) -> Result<Self, StartupError> {
        let db_path = config.resolved_db_path()?;
        let notifier = Notifier::new(config.notify.clone())?;
        if !notifier.is_configured() {
            warn!("URIAGE_LINE_TOKEN is not set; save notifications will report failure");
        }

        let mut state = match Database::new(DbConfig::new(&db_path)).await {
            Ok(db) => {
                info!(?db_path, "Database connected and migrations applied");
                let mut state = AppState::new(Arc::new(db.sales()), true, notifier);
                state.database = Some(db);
                state
            }
            Err(err) => {
                warn!(
                    error = %err,
                    ?db_path,
                    "Record store unavailable, serving demo data in offline mode"
                );
                AppState::new(Arc::new(MemorySalesStore::demo()), false, notifier)
            }
        };

        let settings = SettingsStore::new(config.resolved_settings_path()?);
        match settings.load() {
            Ok(loaded) => state.apply_settings(loaded),
            Err(err) => warn!(error = %err, "Settings file unreadable, starting from defaults"),
        }
        state.settings = Some(settings);

        Ok(state
            .with_notify_on_save(config.notify_on_save)
            .with_default_tax_rate(config.default_tax_rate))
    }

    pub fn store(&self) -> &dyn SalesStore {
        self.store.as_ref()
    }

    /// False when running on the demo fallback store.
    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn database(&self) -> Option<&Database> {
        self.database.as_ref()
    }

    pub fn catalog(&self) -> &RwLock<ProductCatalog> {
        &self.catalog
    }

    pub fn company(&self) -> &RwLock<CompanyInfo> {
        &self.company
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notify_on_save(&self) -> bool {
        self.notify_on_save
    }

    pub fn default_tax_rate(&self) -> TaxRate {
        self.default_tax_rate
    }

    /// Applies `edit` to a copy of the catalog, saves the copy and only
    /// then makes it live.
    ///
    /// If `edit` fails or the settings file can't be written, the catalog
    /// readers see is unchanged.
    pub async fn edit_catalog<T, E>(
        &self,
        edit: impl FnOnce(&mut ProductCatalog) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<SettingsError>,
    {
        let _guard = self.edit_lock.lock().await;

        let mut catalog = self.catalog.read().await.clone();
        let out = edit(&mut catalog)?;
        let company = self.company.read().await.clone();

        self.write_settings(company, catalog.clone()).await?;
        *self.catalog.write().await = catalog;
        Ok(out)
    }

    /// Saves `company` and then makes it live. Same guarantees as
    /// [`edit_catalog`](Self::edit_catalog).
    pub async fn replace_company(&self, company: CompanyInfo) -> Result<(), SettingsError> {
        let _guard = self.edit_lock.lock().await;

        let catalog = self.catalog.read().await.clone();
        self.write_settings(company.clone(), catalog).await?;
        *self.company.write().await = company;
        Ok(())
    }

    /// Writes the current catalog and company info as they are.
    pub async fn persist_settings(&self) -> Result<(), SettingsError> {
        let _guard = self.edit_lock.lock().await;

        let company = self.company.read().await.clone();
        let catalog = self.catalog.read().await.clone();
        self.write_settings(company, catalog).await
    }

    async fn write_settings(
        &self,
        company: CompanyInfo,
        catalog: ProductCatalog,
    ) -> Result<(), SettingsError> {
        let Some(store) = self.settings.clone() else {
            return Ok(());
        };

        let settings = Settings {
            company_info: Some(company),
            products: Some(catalog),
        };
        let path = store.path().to_path_buf();
        tokio::task::spawn_blocking(move || store.save(&settings)).await??;
        info!(?path, "Settings saved");
        Ok(())
    }

    /// Closes the database pool if there is one.
    pub async fn shutdown(&self) {
        if let Some(db) = &self.database {
            db.close().await;
        }
    }
}

/// Errors that stop the server from starting.
///
/// A failing record store is NOT one of them; that falls back to offline
/// mode instead.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot build notifier: {0}")]
    Notifier(#[from] uriage_notify::NotifyError),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use uriage_notify::NotifyConfig;

    fn config_in(dir: &TempDir) -> ServerConfig {
        ServerConfig {
            db_path: Some(dir.path().join("uriage.db")),
            settings_path: Some(dir.path().join("settings.toml")),
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_bootstrap_connects_to_sqlite() {
        let dir = TempDir::new().unwrap();
        let state = AppState::bootstrap(&config_in(&dir)).await.unwrap();

        assert!(state.connected());
        assert_eq!(state.store().backend(), "sqlite");
        assert!(state.store().list().await.unwrap().is_empty());
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_bootstrap_falls_back_to_demo_store() {
        let dir = TempDir::new().unwrap();
        // A directory where the database file should be cannot be opened
        let blocked = dir.path().join("blocked.db");
        std::fs::create_dir(&blocked).unwrap();

        let config = ServerConfig {
            db_path: Some(blocked),
            ..config_in(&dir)
        };
        let state = AppState::bootstrap(&config).await.unwrap();

        assert!(!state.connected());
        assert_eq!(state.store().backend(), "memory");
        assert_eq!(state.store().list().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_persist_settings_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        let notifier = Notifier::new(NotifyConfig::default()).unwrap();

        let state = AppState::new(Arc::new(MemorySalesStore::new()), true, notifier.clone())
            .with_settings(SettingsStore::new(&path))
            .unwrap();
        state.company().write().await.name = "株式会社保存".to_string();
        state.persist_settings().await.unwrap();

        let reloaded = AppState::new(Arc::new(MemorySalesStore::new()), true, notifier)
            .with_settings(SettingsStore::new(&path))
            .unwrap();
        assert_eq!(reloaded.company().read().await.name, "株式会社保存");
        assert_eq!(reloaded.catalog().read().await.len(), 17);
    }

    fn unwritable_state(dir: &TempDir) -> AppState {
        let blocker = dir.path().join("not-a-dir");
        let notifier = Notifier::new(NotifyConfig::default()).unwrap();
        let state = AppState::new(Arc::new(MemorySalesStore::new()), true, notifier)
            .with_settings(SettingsStore::new(blocker.join("settings.toml")))
            .unwrap();

        // Loaded as defaults; from now on the parent is a regular file
        std::fs::write(&blocker, "").unwrap();
        state
    }

    #[tokio::test]
    async fn test_failed_company_write_keeps_old_value() {
        let dir = TempDir::new().unwrap();
        let state = unwritable_state(&dir);
        let before = state.company().read().await.clone();

        let mut company = before.clone();
        company.name = "株式会社未保存".to_string();
        let result = state.replace_company(company).await;

        assert!(matches!(result, Err(SettingsError::Write { .. })));
        assert_eq!(*state.company().read().await, before);
    }

    #[tokio::test]
    async fn test_failed_catalog_write_keeps_old_catalog() {
        let dir = TempDir::new().unwrap();
        let state = unwritable_state(&dir);

        let result: Result<_, SettingsError> = state
            .edit_catalog(|catalog| {
                catalog.remove(1).ok();
                Ok(())
            })
            .await;

        assert!(result.is_err());
        let catalog = state.catalog().read().await;
        assert_eq!(catalog.len(), 17);
        assert!(catalog.get(1).is_some());
    }

    #[tokio::test]
    async fn test_catalog_edit_is_saved_and_applied() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        let notifier = Notifier::new(NotifyConfig::default()).unwrap();
        let state = AppState::new(Arc::new(MemorySalesStore::new()), true, notifier)
            .with_settings(SettingsStore::new(&path))
            .unwrap();

        let removed: Result<_, SettingsError> =
            state.edit_catalog(|catalog| Ok(catalog.remove(1).ok())).await;

        assert_eq!(removed.unwrap().map(|p| p.id), Some(1));
        assert_eq!(state.catalog().read().await.len(), 16);
        let saved = SettingsStore::new(&path).load().unwrap();
        assert_eq!(saved.products.unwrap().len(), 16);
    }
}
