//! Region boundaries and the name to region-id join index.
//!
//! The geography file is a `GeoJSON` feature collection whose features carry
//! `NAME` and `STATEFP` in their `properties`. Geometry is never inspected,
//! only handed back to whoever draws the map.

use crate::error::DashboardError;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

/// One region boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub name: String,
    pub region_id: String,
    pub geometry: Value,
    pub properties: Map<String, Value>,
}

/// All boundaries from the geography file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoCollection {
    pub features: Vec<GeoFeature>,
}

impl GeoCollection {
    /// Read and parse a `GeoJSON` file.
    ///
    /// # Errors
    ///
    /// [`DashboardError::SourceUnavailable`] if the file cannot be read,
    /// [`DashboardError::Json`] / [`DashboardError::GeoFormat`] if it is not
    /// a feature collection with `NAME` and `STATEFP` on every feature.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|source| DashboardError::SourceUnavailable {
                path: path.display().to_string(),
                source,
            })?;
        let collection = Self::from_json_str(&text)?;
        log::info!(
            "Loaded {} region boundaries from {}",
            collection.features.len(),
            path.display()
        );
        Ok(collection)
    }

    /// Parse a `GeoJSON` feature collection held in memory.
    ///
    /// # Errors
    ///
    /// See [`GeoCollection::from_path`].
    pub fn from_json_str(text: &str) -> Result<Self, DashboardError> {
        let json: Value = serde_json::from_str(text)?;
        let features = json["features"]
            .as_array()
            .ok_or_else(|| DashboardError::GeoFormat {
                message: "no features array".to_string(),
            })?;

        let features = features
            .iter()
            .enumerate()
            .map(|(idx, feature)| parse_feature(idx, feature))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { features })
    }

    /// Render back to `GeoJSON` with each feature's top-level `id` set to its
    /// region id, which is what choropleth renderers match `locations` on.
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .features
            .iter()
            .map(|f| {
                serde_json::json!({
                    "type": "Feature",
                    "id": f.region_id,
                    "properties": f.properties,
                    "geometry": f.geometry,
                })
            })
            .collect();
        serde_json::json!({ "type": "FeatureCollection", "features": features })
    }
}

fn parse_feature(idx: usize, feature: &Value) -> Result<GeoFeature, DashboardError> {
    let properties = feature["properties"]
        .as_object()
        .ok_or_else(|| DashboardError::GeoFormat {
            message: format!("feature {idx} has no properties"),
        })?;
    let name = properties
        .get("NAME")
        .and_then(Value::as_str)
        .ok_or_else(|| DashboardError::GeoFormat {
            message: format!("feature {idx} has no NAME property"),
        })?;
    let region_id = match properties.get("STATEFP") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(DashboardError::GeoFormat {
                message: format!("feature {idx} ({name}) has no STATEFP property"),
            })
        }
    };
    Ok(GeoFeature {
        name: name.to_string(),
        region_id,
        geometry: feature.get("geometry").cloned().unwrap_or(Value::Null),
        properties: properties.clone(),
    })
}

/// `name -> region id` lookup built once from a [`GeoCollection`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoIndex {
    by_name: HashMap<String, String>,
}

impl GeoIndex {
    /// # Errors
    ///
    /// [`DashboardError::DuplicateName`] when two features share a name but
    /// not a code. Exact repeats are tolerated.
    pub fn build(features: &[GeoFeature]) -> Result<Self, DashboardError> {
        let mut by_name: HashMap<String, String> = HashMap::with_capacity(features.len());
        for f in features {
            match by_name.get(&f.name) {
                Some(existing) if *existing != f.region_id => {
                    return Err(DashboardError::DuplicateName {
                        name: f.name.clone(),
                        first: existing.clone(),
                        second: f.region_id.clone(),
                    });
                }
                Some(_) => log::debug!("Ignoring repeated region entry for {}", f.name),
                None => {
                    by_name.insert(f.name.clone(), f.region_id.clone());
                }
            }
        }
        Ok(Self { by_name })
    }

    /// # Errors
    ///
    /// [`DashboardError::UnknownRegion`] if `name` is not in the index.
    pub fn lookup(&self, name: &str) -> Result<&str, DashboardError> {
        self.by_name
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| DashboardError::UnknownRegion {
                name: name.to_string(),
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
