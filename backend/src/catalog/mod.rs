//! Outlet catalog - the fixed, ordered list of tracked outlets.
//!
//! The catalog is built once at startup (default list or a JSON file) and
//! shared read-only behind an `Arc` for the lifetime of the process.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::error::CatalogError;

/// Outlets tracked by the performance spreadsheet, in reporting order.
pub const DEFAULT_OUTLETS: [&str; 33] = [
    "Heraldo",
    "Televisa",
    "Milenio",
    "Universal",
    "As",
    "Infobae",
    "NyTimes",
    "Terra",
    "Azteca 7",
    "Azteca UNO",
    "ADN40",
    "Deportes",
    "A+",
    "Noticias",
    "Quintana Roo",
    "Bajío",
    "Ciudad Juárez",
    "Yúcatan",
    "Jalisco",
    "Puebla",
    "Veracruz",
    "Baja California",
    "Morelos",
    "Guerrero",
    "Chiapas",
    "Sinaloa",
    "Aguascalientes",
    "Queretaro",
    "Chihuahua",
    "Laguna",
    "img.Azteca7",
    "img.AztecaUNO",
    "img.AztecaNoticias",
];

static DEFAULT_CATALOG: Lazy<Arc<OutletCatalog>> = Lazy::new(|| {
    Arc::new(OutletCatalog {
        outlets: DEFAULT_OUTLETS.iter().map(|s| s.to_string()).collect(),
    })
});

/// Ordered, immutable list of outlet names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutletCatalog {
    outlets: Vec<String>,
}

impl OutletCatalog {
    /// Build a catalog from names, rejecting blanks and duplicates.
    pub fn new<I, S>(names: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut outlets = Vec::new();
        let mut seen = HashSet::new();

        for (i, name) in names.into_iter().enumerate() {
            let name = name.into().trim().to_string();
            if name.is_empty() {
                return Err(CatalogError::BlankName(i));
            }
            if !seen.insert(name.clone()) {
                return Err(CatalogError::Duplicate(name));
            }
            outlets.push(name);
        }

        if outlets.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { outlets })
    }

    /// Shared handle to the built-in catalog.
    pub fn shared_default() -> Arc<Self> {
        Arc::clone(&DEFAULT_CATALOG)
    }

    /// Load a catalog from a JSON array of names.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let names: Vec<String> = serde_json::from_str(&content)?;
        Self::new(names)
    }

    pub fn outlets(&self) -> &[String] {
        &self.outlets
    }

    pub fn len(&self) -> usize {
        self.outlets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outlets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.outlets.iter().map(String::as_str)
    }
}

impl Default for OutletCatalog {
    fn default() -> Self {
        (**DEFAULT_CATALOG).clone()
    }
}
