use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::utils::error::{MapError, Result};

/// `[longitude, latitude]`, GeoJSON axis order.
pub type Position = [f64; 2];
pub type Ring = Vec<Position>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryGeometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl BoundaryGeometry {
    /// Every vertex of every ring of every part.
    pub fn positions(&self) -> Box<dyn Iterator<Item = &Position> + '_> {
        match self {
            BoundaryGeometry::Polygon(rings) => Box::new(rings.iter().flatten()),
            BoundaryGeometry::MultiPolygon(polygons) => {
                Box::new(polygons.iter().flatten().flatten())
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions().next().is_none()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            BoundaryGeometry::Polygon(_) => "Polygon",
            BoundaryGeometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// GeoJSON `coordinates` member for this geometry.
    pub fn coordinates_json(&self) -> serde_json::Value {
        match self {
            BoundaryGeometry::Polygon(rings) => serde_json::json!(rings),
            BoundaryGeometry::MultiPolygon(polygons) => serde_json::json!(polygons),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub district_name: String,
    pub geometry: BoundaryGeometry,
}

/// Immutable set of district boundaries, shared for the lifetime of a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryCollection {
    features: Vec<BoundaryFeature>,
}

impl BoundaryCollection {
    pub fn new(features: Vec<BoundaryFeature>) -> Result<Self> {
        for (index, feature) in features.iter().enumerate() {
            if feature.district_name.trim().is_empty() {
                return Err(MapError::InvalidBoundary {
                    message: format!("feature {} has an empty district name", index),
                });
            }
            if feature.geometry.is_empty() {
                return Err(MapError::InvalidBoundary {
                    message: format!(
                        "feature {} ({}) has an empty geometry",
                        index, feature.district_name
                    ),
                });
            }
        }
        Ok(Self { features })
    }

    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn district_names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.district_name.as_str())
    }
}

/// One row of the uploaded branch table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerRow {
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "Branch_Name")]
    pub branch_name: String,
    #[serde(rename = "Sol ID")]
    pub sol_id: String,
    #[serde(rename = "Block_Name")]
    pub block_name: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
}

impl MarkerRow {
    pub fn location(&self) -> Option<LatLng> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(LatLng::new(lat, lon)),
            _ => None,
        }
    }
}

/// Districts chosen in the multi-select. Order never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(BTreeSet<String>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, district: &str) -> bool {
        self.0.contains(district)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub southwest: LatLng,
    pub northeast: LatLng,
}

impl BoundingBox {
    /// Leaflet `[[south, west], [north, east]]` form.
    pub fn to_leaflet(&self) -> [[f64; 2]; 2] {
        [
            [self.southwest.lat, self.southwest.lon],
            [self.northeast.lat, self.northeast.lon],
        ]
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.southwest.lat
            && point.lat <= self.northeast.lat
            && point.lon >= self.southwest.lon
            && point.lon <= self.northeast.lon
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryStyle {
    pub fill_color: String,
    pub color: String,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl Default for BoundaryStyle {
    fn default() -> Self {
        Self {
            fill_color: "orange".to_string(),
            color: "black".to_string(),
            weight: 1.0,
            fill_opacity: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub title: String,
    pub center: LatLng,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    pub style: BoundaryStyle,
}

pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 27.0238,
    lon: 74.2179,
};
pub const DEFAULT_ZOOM: u8 = 7;

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Rajasthan District Map".to_string(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            width: 900,
            height: 800,
            style: BoundaryStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewableMap {
    pub html: String,
}
