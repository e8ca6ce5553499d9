//! Catalog data: typed relation records, named value lists and snapshots.
//!
//! Relation records keep the wire field names of the catalog service
//! (`series_id`, `car_class_id`, ...) so a `/catalogs/relationships` payload
//! deserializes directly. Category codes are validated on the way in; every
//! other facet value is an integer catalog id.

use crate::engine::ValueSet;
use crate::{Facet, FacetValue, Relation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

static DEFAULT_CATEGORIES: Lazy<Vec<CategoryItem>> = Lazy::new(|| {
    [
        ("sports_car", "Sports Car"),
        ("formula", "Formula"),
        ("oval", "Oval"),
        ("dirt_road", "Dirt Road"),
        ("dirt_oval", "Dirt Oval"),
    ]
    .into_iter()
    .map(|(code, label)| CategoryItem { code: CategoryCode(code.to_string()), label: label.to_string() })
    .collect()
});

// --- Category codes -----------------------------------------------------------

/// A lowercase category code such as `sports_car`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryCode(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid category code {0:?} (expected lowercase letters, digits and underscores)")]
pub struct InvalidCategoryCode(pub String);

impl CategoryCode {
    pub fn parse(code: &str) -> Result<Self, InvalidCategoryCode> {
        let trimmed = code.trim();
        if regex!(r"^[a-z][a-z0-9_]*$").is_match(trimmed) {
            Ok(CategoryCode(trimmed.to_string()))
        } else {
            Err(InvalidCategoryCode(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CategoryCode {
    type Error = InvalidCategoryCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CategoryCode::parse(&value)
    }
}

impl From<CategoryCode> for String {
    fn from(code: CategoryCode) -> Self {
        code.0
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Relation records -----------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesCategory {
    pub series_id: i64,
    pub category: CategoryCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesCarClass {
    pub series_id: i64,
    pub car_class_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarClassCar {
    pub car_class_id: i64,
    pub car_id: i64,
}

/// The three relation lists of a catalog. Missing lists decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Relationships {
    pub series_categories: Vec<SeriesCategory>,
    pub series_car_classes: Vec<SeriesCarClass>,
    pub car_class_cars: Vec<CarClassCar>,
}

impl Relationships {
    /// Edges of `relation` as `(left, right)` pairs, oriented like
    /// [`Relation::endpoints`].
    pub(crate) fn pairs(&self, relation: Relation) -> Vec<(FacetValue, FacetValue)> {
        match relation {
            Relation::SeriesCategory => self
                .series_categories
                .iter()
                .map(|r| (FacetValue::Series(r.series_id), FacetValue::Category(r.category.clone())))
                .collect(),
            Relation::SeriesCarClass => self
                .series_car_classes
                .iter()
                .map(|r| (FacetValue::Series(r.series_id), FacetValue::CarClass(r.car_class_id)))
                .collect(),
            Relation::CarClassCar => self
                .car_class_cars
                .iter()
                .map(|r| (FacetValue::CarClass(r.car_class_id), FacetValue::Car(r.car_id)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series_categories.is_empty() && self.series_car_classes.is_empty() && self.car_class_cars.is_empty()
    }
}

// --- Named catalog lists --------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub code: CategoryCode,
    pub label: String,
}

/// Every value a column can show, with display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub categories: Vec<CategoryItem>,
    pub series: Vec<CatalogItem>,
    pub car_classes: Vec<CatalogItem>,
    pub cars: Vec<CatalogItem>,
    pub tracks: Vec<CatalogItem>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            categories: DEFAULT_CATEGORIES.clone(),
            series: Vec::new(),
            car_classes: Vec::new(),
            cars: Vec::new(),
            tracks: Vec::new(),
        }
    }
}

impl Catalog {
    /// The built-in category list used when a snapshot does not carry one.
    pub fn default_categories() -> &'static [CategoryItem] {
        &DEFAULT_CATEGORIES
    }

    /// Items of `facet` in catalog order, as `(value, display name)`.
    pub fn items(&self, facet: Facet) -> Vec<(FacetValue, &str)> {
        match facet {
            Facet::Category => {
                self.categories.iter().map(|c| (FacetValue::Category(c.code.clone()), c.label.as_str())).collect()
            }
            Facet::Series => numbered(&self.series, FacetValue::Series),
            Facet::CarClass => numbered(&self.car_classes, FacetValue::CarClass),
            Facet::Car => numbered(&self.cars, FacetValue::Car),
            Facet::Track => numbered(&self.tracks, FacetValue::Track),
        }
    }

    /// All values of `facet`, i.e. what "unconstrained" expands to.
    pub fn values(&self, facet: Facet) -> ValueSet {
        self.items(facet).into_iter().map(|(value, _)| value).collect()
    }

    pub fn name_of(&self, value: &FacetValue) -> Option<&str> {
        self.items(value.facet()).into_iter().find(|(v, _)| v == value).map(|(_, name)| name)
    }
}

fn numbered(items: &[CatalogItem], wrap: fn(i64) -> FacetValue) -> Vec<(FacetValue, &str)> {
    items.iter().map(|item| (wrap(item.id), item.name.as_str())).collect()
}

// --- Snapshots ------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Catalog lists plus relationships, as loaded together by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    pub catalogs: Catalog,
    pub relationships: Relationships,
}

impl CatalogSnapshot {
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let snapshot: CatalogSnapshot = serde_json::from_str(json)?;
        tracing::debug!(
            series = snapshot.catalogs.series.len(),
            car_classes = snapshot.catalogs.car_classes.len(),
            cars = snapshot.catalogs.cars.len(),
            tracks = snapshot.catalogs.tracks.len(),
            "loaded catalog snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&json)
    }
}
