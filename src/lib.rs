//! Bidirectional multi-facet filtering for racing catalogs.
//!
//! A selector offers five linked facets (category, series, car class, car,
//! track). Picking values in one facet narrows what stays valid in every
//! other facet, following the catalog's relationship graph. The engine
//! computes that visibility and prunes selections that became invalid.
//!
//! ```
//! use paddock::{CarClassCar, FacetValue, FilterEngine, FilterSession, Mode, Relationships, SeriesCarClass};
//!
//! let relationships = Relationships {
//!     series_car_classes: vec![SeriesCarClass { series_id: 10, car_class_id: 5 }],
//!     car_class_cars: vec![CarClassCar { car_class_id: 5, car_id: 100 }],
//!     ..Default::default()
//! };
//! let engine = FilterEngine::from_relationships(&relationships, Mode::Normal);
//! let mut session = FilterSession::new(engine, &Default::default());
//!
//! session.toggle(FacetValue::CarClass(5));
//! assert!(session.visibility().allows(&FacetValue::Car(100)));
//! assert!(session.visibility().allows(&FacetValue::Series(10)));
//! ```

#[macro_use]
mod macros;
mod api;
mod catalog;
mod engine;
mod matching;
mod selection;

use std::fmt;

pub use api::{ColumnItem, ColumnView, FilterSession, Options, PassSummary, SettleReport};
pub use catalog::{
    CarClassCar, Catalog, CatalogError, CatalogItem, CatalogSnapshot, CategoryCode, CategoryItem,
    InvalidCategoryCode, Relationships, SeriesCarClass, SeriesCategory,
};
pub use engine::{
    Adjacency, FacetSet, FilterEngine, Hop, PassMetrics, RelationshipGraph, RoutePlan, SettleMetrics, Settled,
    ValueSet, Visibility, VisibilityMap, expand, expand_chain, expand_chain3, intersect,
};
pub use matching::{PostContent, PostFilter, PostTab};
pub use selection::{ContentSelection, Selection, SelectionSpecError, parse_search_spec, parse_selection_spec};

// --- Facets -------------------------------------------------------------------

/// One selectable dimension of the filter.
///
/// The declaration order is the canonical column order and drives every
/// ordered iteration in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facet {
    Category,
    Series,
    CarClass,
    Car,
    Track,
}

impl Facet {
    pub const ALL: [Facet; 5] = [Facet::Category, Facet::Series, Facet::CarClass, Facet::Car, Facet::Track];

    /// Machine name, as used in CLI specs and wire field prefixes.
    pub fn name(self) -> &'static str {
        match self {
            Facet::Category => "category",
            Facet::Series => "series",
            Facet::CarClass => "car_class",
            Facet::Car => "car",
            Facet::Track => "track",
        }
    }

    /// Column title shown above the facet's options.
    pub fn label(self) -> &'static str {
        match self {
            Facet::Category => "Category",
            Facet::Series => "Series",
            Facet::CarClass => "Car Class",
            Facet::Car => "Car",
            Facet::Track => "Track",
        }
    }

    /// Parse a machine name. Dashes are accepted in place of underscores.
    pub fn from_name(name: &str) -> Option<Facet> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        Facet::ALL.into_iter().find(|facet| facet.name() == normalized)
    }

    pub fn flag(self) -> FacetSet {
        match self {
            Facet::Category => FacetSet::CATEGORY,
            Facet::Series => FacetSet::SERIES,
            Facet::CarClass => FacetSet::CAR_CLASS,
            Facet::Car => FacetSet::CAR,
            Facet::Track => FacetSet::TRACK,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value within a facet. The variant is the facet, so a series id can
/// never end up in the car column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacetValue {
    Category(CategoryCode),
    Series(i64),
    CarClass(i64),
    Car(i64),
    Track(i64),
}

impl FacetValue {
    pub fn facet(&self) -> Facet {
        match self {
            FacetValue::Category(_) => Facet::Category,
            FacetValue::Series(_) => Facet::Series,
            FacetValue::CarClass(_) => Facet::CarClass,
            FacetValue::Car(_) => Facet::Car,
            FacetValue::Track(_) => Facet::Track,
        }
    }

    /// Catalog id for the numeric facets, `None` for categories.
    pub fn id(&self) -> Option<i64> {
        match self {
            FacetValue::Category(_) => None,
            FacetValue::Series(id) | FacetValue::CarClass(id) | FacetValue::Car(id) | FacetValue::Track(id) => {
                Some(*id)
            }
        }
    }

    /// Build a numeric value for `facet`. Returns `None` for `Facet::Category`.
    pub fn with_id(facet: Facet, id: i64) -> Option<FacetValue> {
        match facet {
            Facet::Category => None,
            Facet::Series => Some(FacetValue::Series(id)),
            Facet::CarClass => Some(FacetValue::CarClass(id)),
            Facet::Car => Some(FacetValue::Car(id)),
            Facet::Track => Some(FacetValue::Track(id)),
        }
    }

    /// Parse and validate a category code into a value.
    pub fn category(code: &str) -> Result<FacetValue, InvalidCategoryCode> {
        CategoryCode::parse(code).map(FacetValue::Category)
    }
}

impl fmt::Display for FacetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetValue::Category(code) => write!(f, "{}={}", Facet::Category, code),
            other => write!(f, "{}={}", other.facet(), other.id().unwrap_or_default()),
        }
    }
}

// --- Relations and modes ------------------------------------------------------

/// A many-to-many association recorded in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    SeriesCategory,
    SeriesCarClass,
    CarClassCar,
}

impl Relation {
    /// The two facets joined by the relation, in record field order.
    pub fn endpoints(self) -> (Facet, Facet) {
        match self {
            Relation::SeriesCategory => (Facet::Series, Facet::Category),
            Relation::SeriesCarClass => (Facet::Series, Facet::CarClass),
            Relation::CarClassCar => (Facet::CarClass, Facet::Car),
        }
    }
}

/// Operating mode of a selector instance.
///
/// Event posts are tied to a special event rather than a series, so the
/// category and series columns do not exist there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Normal,
    Event,
}

impl Mode {
    pub fn facets(self) -> FacetSet {
        match self {
            Mode::Normal => FacetSet::all(),
            Mode::Event => FacetSet::CAR_CLASS | FacetSet::CAR | FacetSet::TRACK,
        }
    }

    pub fn relations(self) -> &'static [Relation] {
        match self {
            Mode::Normal => &[Relation::SeriesCategory, Relation::SeriesCarClass, Relation::CarClassCar],
            Mode::Event => &[Relation::CarClassCar],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Event => "event",
        }
    }
}
