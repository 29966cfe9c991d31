//! Seed the catalog with reference product types.
//!
//! Reads a YAML list of product types (or uses the built-in set) and creates
//! every entry whose name is not already taken. Running it twice is a no-op.
//!
//! ```yaml
//! - name: Food
//!   supportsAddons: true
//! - name: Apparel
//! - name: Electronics
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info};

use printfuse_core::{ProductTypeDraft, Rounding};
use printfuse_storefront::config::StorefrontConfig;
use printfuse_storefront::db::{self, PgCatalogStore};
use printfuse_storefront::services::CatalogService;

/// One product type entry in a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedProductType {
    pub name: String,
    #[serde(default)]
    pub supports_addons: Option<bool>,
}

impl From<SeedProductType> for ProductTypeDraft {
    fn from(entry: SeedProductType) -> Self {
        Self {
            name: Some(entry.name),
            supports_addons: entry.supports_addons,
        }
    }
}

/// Outcome of a seeding run.
#[derive(Debug, Default)]
pub struct SeedResult {
    pub inserted: usize,
    pub skipped: usize,
    pub errors: Vec<(String, String)>,
}

/// The reference product types.
#[must_use]
pub fn default_product_types() -> Vec<SeedProductType> {
    [("Food", Some(true)), ("Apparel", None), ("Electronics", None)]
        .into_iter()
        .map(|(name, supports_addons)| SeedProductType {
            name: name.to_string(),
            supports_addons,
        })
        .collect()
}

/// Check a seed list for blank and repeated names.
#[must_use]
pub fn validate_seed(entries: &[SeedProductType]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        let name = entry.name.trim();
        if name.is_empty() {
            errors.push(format!("entry {}: name cannot be empty", i + 1));
        } else if !seen.insert(name) {
            errors.push(format!("entry {}: duplicate name {name:?}", i + 1));
        }
    }

    errors
}

/// Create every entry whose name does not exist yet.
///
/// Per-entry failures are collected in the result rather than aborting.
///
/// # Errors
///
/// Returns an error if the existing product types cannot be listed.
pub async fn seed(
    catalog: &CatalogService,
    entries: Vec<SeedProductType>,
) -> Result<SeedResult, Box<dyn std::error::Error>> {
    let existing: HashSet<String> = catalog
        .list_product_types()
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect();

    let mut result = SeedResult::default();
    for entry in entries {
        if existing.contains(entry.name.trim()) {
            result.skipped += 1;
            continue;
        }

        let name = entry.name.clone();
        match catalog.create_product_type(entry.into()).await {
            Ok(_) => result.inserted += 1,
            Err(e) => result.errors.push((name, e.to_string())),
        }
    }

    Ok(result)
}

/// Seed product types from `file_path`, or the built-in set.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the file cannot be read
/// or fails validation, or the database is unreachable.
pub async fn product_types(file_path: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let database_url = config.require_database_url()?;

    let entries = match file_path {
        Some(file_path) => {
            let path = Path::new(file_path);
            if !path.exists() {
                return Err(format!("File not found: {file_path}").into());
            }
            info!(path = %file_path, "Loading product types from file");
            let content = tokio::fs::read_to_string(path).await?;
            serde_yaml::from_str::<Vec<SeedProductType>>(&content)?
        }
        None => default_product_types(),
    };

    // Validate before connecting to the database
    let errors = validate_seed(&entries);
    if !errors.is_empty() {
        error!("Seed validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let pool = db::create_pool(database_url).await?;
    info!("Connected to database");

    let catalog = CatalogService::new(Arc::new(PgCatalogStore::new(pool)), Rounding::Exact);
    let result = seed(&catalog, entries).await?;

    info!("Seeding complete!");
    info!("  Product types inserted: {}", result.inserted);
    info!("  Product types skipped (already exist): {}", result.skipped);

    if !result.errors.is_empty() {
        error!("  Errors: {}", result.errors.len());
        for (name, err) in &result.errors {
            error!("    - {name}: {err}");
        }
        return Err(format!("{} product types failed", result.errors.len()).into());
    }

    Ok(())
}
