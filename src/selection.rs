//! Selection state and its wire shape.
//!
//! [`Selection`] is the set of checked values per facet that the engine
//! reads and prunes. [`ContentSelection`] is the per-facet array shape a
//! form submits (`categories`, `series_ids`, ...), used both to seed a
//! selector when editing and to read the confirmed choice back out.

use crate::catalog::{CategoryCode, InvalidCategoryCode};
use crate::engine::ValueSet;
use crate::{Facet, FacetValue, Mode};
use serde::{Deserialize, Serialize};

/// Checked values per facet. Values are unique and kept in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    sets: [ValueSet; 5],
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `value`. Returns false if it was already checked.
    pub fn insert(&mut self, value: FacetValue) -> bool {
        self.sets[value.facet().index()].insert(value)
    }

    /// Uncheck `value`. Returns false if it was not checked.
    pub fn remove(&mut self, value: &FacetValue) -> bool {
        self.sets[value.facet().index()].remove(value)
    }

    /// Flip `value` and return its new checked state.
    pub fn toggle(&mut self, value: FacetValue) -> bool {
        if self.remove(&value) {
            false
        } else {
            self.insert(value);
            true
        }
    }

    pub fn set_checked(&mut self, value: FacetValue, checked: bool) {
        if checked {
            self.insert(value);
        } else {
            self.remove(&value);
        }
    }

    pub fn contains(&self, value: &FacetValue) -> bool {
        self.sets[value.facet().index()].contains(value)
    }

    pub fn get(&self, facet: Facet) -> &ValueSet {
        &self.sets[facet.index()]
    }

    pub fn clear(&mut self, facet: Facet) {
        self.sets[facet.index()].clear();
    }

    pub fn clear_all(&mut self) {
        self.sets.iter_mut().for_each(ValueSet::clear);
    }

    pub fn len(&self) -> usize {
        self.sets.iter().map(ValueSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.iter().all(ValueSet::is_empty)
    }

    /// All checked values, facet by facet in column order.
    pub fn iter(&self) -> impl Iterator<Item = &FacetValue> {
        self.sets.iter().flatten()
    }

    /// Read out the per-facet arrays. Facets outside `mode` come back empty.
    pub fn to_content(&self, mode: Mode) -> ContentSelection {
        let facets = mode.facets();
        let ids = |facet: Facet| -> Vec<i64> {
            if facets.has(facet) { self.get(facet).iter().filter_map(FacetValue::id).collect() } else { Vec::new() }
        };
        let categories = if facets.has(Facet::Category) {
            self.get(Facet::Category)
                .iter()
                .filter_map(|value| match value {
                    FacetValue::Category(code) => Some(code.clone()),
                    _ => None,
                })
                .collect()
        } else {
            Vec::new()
        };

        ContentSelection {
            categories,
            series_ids: ids(Facet::Series),
            car_class_ids: ids(Facet::CarClass),
            car_ids: ids(Facet::Car),
            track_ids: ids(Facet::Track),
        }
    }
}

impl FromIterator<FacetValue> for Selection {
    fn from_iter<I: IntoIterator<Item = FacetValue>>(iter: I) -> Self {
        let mut selection = Selection::new();
        selection.extend(iter);
        selection
    }
}

impl Extend<FacetValue> for Selection {
    fn extend<I: IntoIterator<Item = FacetValue>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl From<&ContentSelection> for Selection {
    fn from(content: &ContentSelection) -> Self {
        content.values().collect()
    }
}

/// Per-facet value arrays, as submitted with a post or a filter query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSelection {
    pub categories: Vec<CategoryCode>,
    pub series_ids: Vec<i64>,
    pub car_class_ids: Vec<i64>,
    pub car_ids: Vec<i64>,
    pub track_ids: Vec<i64>,
}

impl ContentSelection {
    pub fn values(&self) -> impl Iterator<Item = FacetValue> + '_ {
        let categories = self.categories.iter().cloned().map(FacetValue::Category);
        let series = self.series_ids.iter().copied().map(FacetValue::Series);
        let car_classes = self.car_class_ids.iter().copied().map(FacetValue::CarClass);
        let cars = self.car_ids.iter().copied().map(FacetValue::Car);
        let tracks = self.track_ids.iter().copied().map(FacetValue::Track);
        categories.chain(series).chain(car_classes).chain(cars).chain(tracks)
    }

    pub fn is_empty(&self) -> bool {
        self.values().next().is_none()
    }
}

// --- Textual specs --------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionSpecError {
    #[error("expected <facet>=<values>, got {0:?}")]
    Malformed(String),
    #[error("unknown facet {0:?} (expected category, series, car_class, car or track)")]
    UnknownFacet(String),
    #[error("invalid {facet} id {value:?}")]
    InvalidId { facet: Facet, value: String },
    #[error(transparent)]
    Category(#[from] InvalidCategoryCode),
}

fn split_spec(spec: &str) -> Result<(Facet, &str), SelectionSpecError> {
    let caps = regex!(r"^\s*([A-Za-z][A-Za-z_-]*)\s*=(.*)$")
        .captures(spec)
        .ok_or_else(|| SelectionSpecError::Malformed(spec.to_string()))?;
    let (Some(name), Some(rest)) = (caps.get(1), caps.get(2)) else {
        return Err(SelectionSpecError::Malformed(spec.to_string()));
    };
    let facet =
        Facet::from_name(name.as_str()).ok_or_else(|| SelectionSpecError::UnknownFacet(name.as_str().to_string()))?;
    Ok((facet, rest.as_str()))
}

/// Parse `<facet>=<v1>,<v2>,...`, e.g. `car_class=5,6` or `category=oval`.
/// Blank entries are skipped.
pub fn parse_selection_spec(spec: &str) -> Result<Vec<FacetValue>, SelectionSpecError> {
    let (facet, values) = split_spec(spec)?;
    values
        .split(',')
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| -> Result<FacetValue, SelectionSpecError> {
            match facet {
                Facet::Category => Ok(FacetValue::category(raw)?),
                _ => raw
                    .parse::<i64>()
                    .ok()
                    .and_then(|id| FacetValue::with_id(facet, id))
                    .ok_or_else(|| SelectionSpecError::InvalidId { facet, value: raw.to_string() }),
            }
        })
        .collect()
}

/// Parse `<facet>=<text>` for a column search box.
pub fn parse_search_spec(spec: &str) -> Result<(Facet, String), SelectionSpecError> {
    let (facet, text) = split_spec(spec)?;
    Ok((facet, text.trim().to_string()))
}
