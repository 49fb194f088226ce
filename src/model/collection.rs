//! All geographies attached to a match or a coordinate lookup.
//!
//! The collection has one slot per [`GeographyType`]. A slot only ever holds
//! areas of its own type; [`GeographyCollection::set`] rejects anything else
//! and [`GeographyCollection::push`] routes each area to its slot.

use serde_json::{Map, Value};
use tracing::debug;

use super::geography::GeographicArea;
use super::taxonomy::GeographyType;
use super::{CensusEntity, FromWire, ModelError};

/// Geographies grouped by type.
#[derive(Debug, Clone, PartialEq)]
pub struct GeographyCollection {
    slots: Vec<Vec<GeographicArea>>,
    extensions: Map<String, Value>,
}

impl Default for GeographyCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl GeographyCollection {
    pub fn new() -> Self {
        Self {
            slots: vec![Vec::new(); GeographyType::ALL.len()],
            extensions: Map::new(),
        }
    }

    /// Areas of one type.
    pub fn get(&self, geography_type: GeographyType) -> &[GeographicArea] {
        &self.slots[geography_type.index()]
    }

    /// Areas in the named slot, `None` for an unknown slot name.
    pub fn get_by_slot(&self, slot: &str) -> Option<&[GeographicArea]> {
        GeographyType::from_slot(slot).map(|ty| self.get(ty))
    }

    /// Replace the areas of one type.
    ///
    /// Every area must carry exactly `geography_type`; nothing is changed
    /// otherwise.
    pub fn set(
        &mut self,
        geography_type: GeographyType,
        areas: Vec<GeographicArea>,
    ) -> Result<(), ModelError> {
        if let Some(wrong) = areas
            .iter()
            .find(|area| area.geography_type() != geography_type)
        {
            return Err(ModelError::GeographyMismatch {
                slot: geography_type.slot(),
                expected: geography_type,
                actual: wrong.geography_type(),
            });
        }
        self.slots[geography_type.index()] = areas;
        Ok(())
    }

    pub fn set_by_slot(&mut self, slot: &str, areas: Vec<GeographicArea>) -> Result<(), ModelError> {
        let ty = GeographyType::from_slot(slot).ok_or_else(|| ModelError::UnknownSlot(slot.to_string()))?;
        self.set(ty, areas)
    }

    /// Add one area to the slot for its type.
    pub fn push(&mut self, area: GeographicArea) {
        self.slots[area.geography_type().index()].push(area);
    }

    /// Total number of areas across all slots.
    pub fn len(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }

    /// Non-empty slots in table order.
    pub fn iter(&self) -> impl Iterator<Item = (GeographyType, &[GeographicArea])> {
        GeographyType::ALL
            .iter()
            .map(|ty| (*ty, self.get(*ty)))
            .filter(|(_, areas)| !areas.is_empty())
    }

    /// Every area, in table order.
    pub fn areas(&self) -> impl Iterator<Item = &GeographicArea> {
        self.slots.iter().flatten()
    }

    /// Categories the model does not know, with their raw values.
    pub fn extensions(&self) -> &Map<String, Value> {
        &self.extensions
    }
}

impl FromWire for GeographyCollection {
    /// Parse a `geographies` object keyed by category name.
    ///
    /// Categories missing from the payload are skipped; categories the
    /// model does not know are kept verbatim in the extensions.
    fn from_dict(value: &Value) -> Result<Self, ModelError> {
        let mut collection = Self::new();
        let obj = match value {
            Value::Null => return Ok(collection),
            Value::Object(obj) => obj,
            _ => return Err(ModelError::NotAnObject("geographies".to_string())),
        };

        for ty in GeographyType::ALL {
            let Some(entries) = obj.get(ty.category()) else {
                continue;
            };
            let entries = match entries {
                Value::Null => continue,
                Value::Array(entries) => entries,
                _ => {
                    return Err(ModelError::invalid(
                        ty.category(),
                        "expected a list of geographies",
                    ));
                }
            };
            let areas = entries
                .iter()
                .map(|entry| ty.parse(entry))
                .collect::<Result<Vec<_>, _>>()?;
            collection.slots[ty.index()] = areas;
        }

        for (key, value) in obj {
            if GeographyType::from_category(key).is_none() {
                debug!(category = %key, "Keeping unrecognized geography category");
                collection.extensions.insert(key.clone(), value.clone());
            }
        }
        Ok(collection)
    }

    fn from_csv_record(_record: &[String]) -> Result<Self, ModelError> {
        Err(ModelError::Unsupported("GeographyCollection"))
    }
}

impl CensusEntity for GeographyCollection {
    fn entity_type(&self) -> &'static str {
        "collection"
    }

    fn to_dict(&self) -> Value {
        let mut map = Map::new();
        for (ty, areas) in self.iter() {
            map.insert(
                ty.category().to_string(),
                Value::Array(areas.iter().map(CensusEntity::to_dict).collect()),
            );
        }
        for (key, value) in &self.extensions {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }

    fn inspect(&self, as_census_fields: bool) -> Vec<String> {
        self.iter()
            .map(|(ty, _)| {
                if as_census_fields {
                    ty.category().to_string()
                } else {
                    ty.slot().to_string()
                }
            })
            .chain(self.extensions.keys().cloned())
            .collect()
    }
}
