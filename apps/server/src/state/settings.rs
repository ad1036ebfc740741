//! # Settings File
//!
//! Local key-value persistence for data the operator edits at runtime.
//!
//! ```toml
//! [company_info]
//! name = "株式会社キムチ工房"
//! postalCode = "123-4567"
//! # ...
//!
//! [[products]]
//! id = 1
//! name = "中辛"
//! unitPrice = 175
//! taxRate = 8
//! ```
//!
//! A missing file or a missing key means "use the defaults". Writes go to a
//! sibling temp file first and are renamed into place.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uriage_core::catalog::ProductCatalog;
use uriage_core::company::CompanyInfo;

/// Everything stored in the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_info: Option<CompanyInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<ProductCatalog>,
}

/// Reads and writes [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file. A file that does not exist yet is empty settings.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes the whole file, creating the parent directory if needed.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let text = toml::to_string_pretty(settings)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.write_error(source))?;
        }

        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, text).map_err(|source| self.write_error(source))?;
        fs::rename(&tmp, &self.path).map_err(|source| self.write_error(source))?;

        Ok(())
    }

    fn write_error(&self, source: io::Error) -> SettingsError {
        SettingsError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

/// Settings file errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Cannot read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// ## When This Occurs
    /// - The file was edited by hand and is no longer valid TOML
    /// - A product row carries a tax rate other than 8 or 10
    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Cannot write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Settings write task did not finish: {0}")]
    Task(#[from] tokio::task::JoinError),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use uriage_core::catalog::ProductDraft;
    use uriage_core::{TaxRate, Yen};

    #[test]
    fn test_missing_file_is_empty_settings() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.toml"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("settings.toml"));

        let mut company = CompanyInfo::default();
        company.name = "株式会社テスト".to_string();
        let mut catalog = ProductCatalog::default();
        catalog
            .add(ProductDraft {
                name: "白菜キムチ".to_string(),
                unit_price: Yen::new(300),
                tax_rate: TaxRate::Reduced,
            })
            .unwrap();

        let settings = Settings {
            company_info: Some(company),
            products: Some(catalog),
        };
        store.save(&settings).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.products.unwrap().len(), 18);
    }

    #[test]
    fn test_company_only_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[company_info]\nname = \"手書き商店\"\n").unwrap();

        let loaded = SettingsStore::new(&path).load().unwrap();
        let company = loaded.company_info.unwrap();
        assert_eq!(company.name, "手書き商店");
        // missing fields fall back to defaults
        assert_eq!(company.registration_number, CompanyInfo::default().registration_number);
        assert!(loaded.products.is_none());
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "company_info = [[[").unwrap();

        assert!(matches!(
            SettingsStore::new(&path).load(),
            Err(SettingsError::Parse { .. })
        ));
    }
}
