//! Load stat catalogs from JSON or YAML files. Built-in default when no file is given.

use std::fs;
use std::path::Path;

use crate::catalog::stat::{CatalogFile, StatCard, StatCatalog, StatDefinition};
use crate::error::CatalogError;

pub const DEFAULT_CATALOG_PATH: &str = "data/catalog.json";

/// Read and validate a catalog. `.yaml`/`.yml` files are parsed as YAML, anything else as JSON.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<StatCatalog, CatalogError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let file = if is_yaml(path) {
        parse_yaml(&raw)?
    } else {
        parse_json(&raw)?
    };
    StatCatalog::try_from(file)
}

/// Load `path` if given, else [DEFAULT_CATALOG_PATH] when it exists, else [default_catalog].
pub fn load_catalog_or_default(path: Option<&str>) -> Result<StatCatalog, CatalogError> {
    match path {
        Some(path) => load_catalog(path),
        None if Path::new(DEFAULT_CATALOG_PATH).exists() => load_catalog(DEFAULT_CATALOG_PATH),
        None => Ok(default_catalog()),
    }
}

pub fn parse_json(raw: &str) -> Result<CatalogFile, CatalogError> {
    serde_json::from_str(raw).map_err(|err| CatalogError::Parse(err.to_string()))
}

pub fn parse_yaml(raw: &str) -> Result<CatalogFile, CatalogError> {
    serde_yaml::from_str(raw).map_err(|err| CatalogError::Parse(err.to_string()))
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Combat stats the reference duel simulator understands.
pub fn default_catalog() -> StatCatalog {
    let stats = vec![
        StatDefinition::new("hp", 1.0, 100.0).with_label("Health"),
        StatDefinition::new("damage", 2.0, 50.0).with_label("Damage"),
        StatDefinition::new("defense", 1.5, 25.0).with_label("Defense"),
        StatDefinition::new("crit_chance", 0.4, 5.0).with_label("Crit Chance"),
        StatDefinition::new("speed", 0.8, 10.0).with_label("Speed"),
    ];
    let cards = vec![
        StatCard {
            id: "survivability".to_string(),
            label: "Survivability".to_string(),
            stat_ids: vec!["hp".to_string(), "defense".to_string()],
        },
        StatCard {
            id: "offense".to_string(),
            label: "Offense".to_string(),
            stat_ids: vec![
                "damage".to_string(),
                "crit_chance".to_string(),
                "speed".to_string(),
            ],
        },
    ];
    match StatCatalog::new(stats, cards) {
        Ok(catalog) => catalog,
        Err(err) => unreachable!("built-in catalog is valid: {err}"),
    }
}
