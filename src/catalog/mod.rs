pub mod loader;
pub mod stat;

pub use loader::{
    default_catalog, load_catalog, load_catalog_or_default, parse_json, parse_yaml,
    DEFAULT_CATALOG_PATH,
};
pub use stat::{CatalogFile, StatCard, StatCatalog, StatDefinition};
