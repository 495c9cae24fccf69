use crate::core::{BoundaryCollection, Selection};
use crate::domain::model::{BoundaryGeometry, BoundingBox, LatLng};

/// Axis-aligned extent in (longitude, latitude) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Extent {
    /// Vertex extrema over every part of the geometry. `None` when there are
    /// no vertices.
    pub fn of_geometry(geometry: &BoundaryGeometry) -> Option<Self> {
        geometry.positions().fold(None, |extent, &[lon, lat]| {
            let point = Extent {
                min_lon: lon,
                min_lat: lat,
                max_lon: lon,
                max_lat: lat,
            };
            Some(match extent {
                Some(extent) => extent.union(point),
                None => point,
            })
        })
    }

    pub fn union(self, other: Extent) -> Extent {
        Extent {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    pub fn into_bounding_box(self) -> BoundingBox {
        BoundingBox {
            southwest: LatLng::new(self.min_lat, self.min_lon),
            northeast: LatLng::new(self.max_lat, self.max_lon),
        }
    }
}

/// Smallest box covering every selected district's geometry.
///
/// Names that have no boundary feature contribute nothing. Returns `None`
/// when nothing matched, including for an empty selection.
pub fn compute_bounds(collection: &BoundaryCollection, selection: &Selection) -> Option<BoundingBox> {
    if selection.is_empty() {
        return None;
    }

    collection
        .features()
        .iter()
        .filter(|feature| selection.contains(&feature.district_name))
        .filter_map(|feature| Extent::of_geometry(&feature.geometry))
        .reduce(Extent::union)
        .map(Extent::into_bounding_box)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BoundaryFeature, Ring};

    fn rect(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Ring {
        vec![
            [min_lon, min_lat],
            [max_lon, min_lat],
            [max_lon, max_lat],
            [min_lon, max_lat],
            [min_lon, min_lat],
        ]
    }

    fn feature(name: &str, geometry: BoundaryGeometry) -> BoundaryFeature {
        BoundaryFeature {
            district_name: name.to_string(),
            geometry,
        }
    }

    fn two_districts() -> BoundaryCollection {
        BoundaryCollection::new(vec![
            feature("A", BoundaryGeometry::Polygon(vec![rect(70.0, 26.0, 71.0, 27.0)])),
            feature("B", BoundaryGeometry::Polygon(vec![rect(72.0, 28.0, 73.0, 29.0)])),
        ])
        .unwrap()
    }

    fn select(names: &[&str]) -> Selection {
        names.iter().copied().collect()
    }

    #[test]
    fn test_empty_selection_has_no_bounds() {
        assert_eq!(compute_bounds(&two_districts(), &Selection::new()), None);
        assert_eq!(
            compute_bounds(&BoundaryCollection::default(), &Selection::new()),
            None
        );
    }

    #[test]
    fn test_single_district_bounds() {
        let bounds = compute_bounds(&two_districts(), &select(&["A"])).unwrap();
        assert_eq!(bounds.southwest, LatLng::new(26.0, 70.0));
        assert_eq!(bounds.northeast, LatLng::new(27.0, 71.0));
    }

    #[test]
    fn test_two_district_union() {
        let bounds = compute_bounds(&two_districts(), &select(&["A", "B"])).unwrap();
        assert_eq!(bounds.southwest, LatLng::new(26.0, 70.0));
        assert_eq!(bounds.northeast, LatLng::new(29.0, 73.0));
    }

    #[test]
    fn test_unknown_district_is_ignored() {
        assert_eq!(compute_bounds(&two_districts(), &select(&["C"])), None);

        let bounds = compute_bounds(&two_districts(), &select(&["C", "B"])).unwrap();
        assert_eq!(bounds.southwest, LatLng::new(28.0, 72.0));
        assert_eq!(bounds.northeast, LatLng::new(29.0, 73.0));
    }

    #[test]
    fn test_bounds_contain_every_vertex() {
        let irregular = vec![
            [74.31, 26.02],
            [75.12, 25.71],
            [75.44, 26.38],
            [74.9, 26.91],
            [74.05, 26.55],
            [74.31, 26.02],
        ];
        let hole = vec![[74.6, 26.2], [74.7, 26.2], [74.7, 26.3], [74.6, 26.2]];
        let collection = BoundaryCollection::new(vec![feature(
            "Ajmer",
            BoundaryGeometry::Polygon(vec![irregular.clone(), hole]),
        )])
        .unwrap();

        let bounds = compute_bounds(&collection, &select(&["Ajmer"])).unwrap();

        for [lon, lat] in &irregular {
            assert!(bounds.contains(LatLng::new(*lat, *lon)));
        }
        assert_eq!(bounds.southwest, LatLng::new(25.71, 74.05));
        assert_eq!(bounds.northeast, LatLng::new(26.91, 75.44));
    }

    #[test]
    fn test_multipolygon_covers_all_parts() {
        let collection = BoundaryCollection::new(vec![feature(
            "Islands",
            BoundaryGeometry::MultiPolygon(vec![
                vec![rect(70.0, 26.0, 70.5, 26.5)],
                vec![rect(72.0, 27.5, 72.5, 28.0)],
            ]),
        )])
        .unwrap();

        let bounds = compute_bounds(&collection, &select(&["Islands"])).unwrap();
        assert_eq!(bounds.southwest, LatLng::new(26.0, 70.0));
        assert_eq!(bounds.northeast, LatLng::new(28.0, 72.5));
    }

    #[test]
    fn test_degenerate_polygon_still_counts() {
        let line = vec![[73.0, 27.0], [73.0, 27.0], [73.0, 27.0]];
        let collection =
            BoundaryCollection::new(vec![feature("Dot", BoundaryGeometry::Polygon(vec![line]))])
                .unwrap();

        let bounds = compute_bounds(&collection, &select(&["Dot"])).unwrap();
        assert_eq!(bounds.southwest, bounds.northeast);
        assert_eq!(bounds.southwest, LatLng::new(27.0, 73.0));
    }

    #[test]
    fn test_selection_order_does_not_matter() {
        let collection = BoundaryCollection::new(vec![
            feature("A", BoundaryGeometry::Polygon(vec![rect(70.0, 26.0, 71.0, 27.0)])),
            feature("B", BoundaryGeometry::Polygon(vec![rect(72.0, 28.0, 73.0, 29.0)])),
            feature("C", BoundaryGeometry::Polygon(vec![rect(69.0, 27.5, 69.5, 30.0)])),
        ])
        .unwrap();

        let expected = compute_bounds(&collection, &select(&["A", "B", "C"]));
        assert_eq!(compute_bounds(&collection, &select(&["C", "A", "B"])), expected);
        assert_eq!(compute_bounds(&collection, &select(&["B", "C", "A"])), expected);

        let bounds = expected.unwrap();
        assert_eq!(bounds.southwest, LatLng::new(26.0, 69.0));
        assert_eq!(bounds.northeast, LatLng::new(30.0, 73.0));
    }

    #[test]
    fn test_union_equals_componentwise_extrema() {
        let a = Extent {
            min_lon: 70.0,
            min_lat: 26.0,
            max_lon: 71.0,
            max_lat: 27.0,
        };
        let b = Extent {
            min_lon: 72.0,
            min_lat: 25.0,
            max_lon: 73.0,
            max_lat: 26.5,
        };
        assert_eq!(a.union(b), b.union(a));
        assert_eq!(
            a.union(b),
            Extent {
                min_lon: 70.0,
                min_lat: 25.0,
                max_lon: 73.0,
                max_lat: 27.0,
            }
        );
    }
}
