//! Occurrence point extraction and validation.

use geojson::{FeatureCollection, Value};

use crate::{GeoBounds, LatLng};

/// A validated occurrence point, derived from one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrencePoint {
    /// Latitude (finite, inside the configured bound).
    pub latitude: f64,
    /// Longitude (finite, inside the configured bound).
    pub longitude: f64,
    /// Raw crime-type attribute from the feature's `delito` property.
    pub crime_type: String,
}

impl OccurrencePoint {
    /// The point's position.
    #[must_use]
    pub const fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Tooltip label: underscores replaced by spaces, upper-cased.
    #[must_use]
    pub fn tooltip_label(&self) -> String {
        self.crime_type.replace('_', " ").to_uppercase()
    }
}

/// Extracts the valid points of a feature collection.
///
/// A feature contributes a point only if it has a `Point` geometry with
/// both coordinates finite and, when a guard is configured, inside the
/// guard box. Invalid features are dropped, never defaulted to (0, 0).
#[must_use]
pub fn extract_points(
    collection: &FeatureCollection,
    guard: Option<&GeoBounds>,
) -> Vec<OccurrencePoint> {
    let mut points = Vec::with_capacity(collection.features.len());
    let mut dropped = 0_usize;

    for feature in &collection.features {
        let Some(geometry) = &feature.geometry else {
            dropped += 1;
            continue;
        };
        let Value::Point(coordinates) = &geometry.value else {
            dropped += 1;
            continue;
        };
        // GeoJSON coordinate order is [longitude, latitude].
        let (Some(&longitude), Some(&latitude)) = (coordinates.first(), coordinates.get(1)) else {
            dropped += 1;
            continue;
        };
        if !latitude.is_finite() || !longitude.is_finite() {
            dropped += 1;
            continue;
        }
        if let Some(guard) = guard {
            if !guard.contains(latitude, longitude) {
                dropped += 1;
                continue;
            }
        }

        let crime_type = feature
            .property("delito")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("N/A")
            .to_string();

        points.push(OccurrencePoint {
            latitude,
            longitude,
            crime_type,
        });
    }

    if dropped > 0 {
        log::debug!("Dropped {dropped} features failing point validation");
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SAO_PAULO_STATE_BOUNDS;
    use geojson::{Feature, Geometry, JsonObject};

    fn feature(longitude: f64, latitude: f64, delito: Option<&str>) -> Feature {
        let mut properties = JsonObject::new();
        if let Some(delito) = delito {
            properties.insert("delito".into(), delito.into());
        }
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![longitude, latitude]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }

    fn collection(features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    #[test]
    fn extracts_valid_points_with_crime_type() {
        let fc = collection(vec![feature(-46.63, -23.55, Some("roubo_de_veiculo"))]);
        let points = extract_points(&fc, Some(&SAO_PAULO_STATE_BOUNDS));

        assert_eq!(points.len(), 1);
        assert!((points[0].latitude - -23.55).abs() < 1e-9);
        assert_eq!(points[0].tooltip_label(), "ROUBO DE VEICULO");
    }

    #[test]
    fn excludes_out_of_bounds_points() {
        // Zero-zero island and a coordinate outside São Paulo state.
        let fc = collection(vec![
            feature(0.0, 0.0, Some("furto")),
            feature(-43.2, -22.9, Some("furto")),
            feature(-46.63, -23.55, Some("furto")),
        ]);
        let points = extract_points(&fc, Some(&SAO_PAULO_STATE_BOUNDS));

        assert_eq!(points.len(), 1);
        assert!(!points.iter().any(|p| p.latitude == 0.0));
    }

    #[test]
    fn excludes_nonfinite_coordinates() {
        let fc = collection(vec![
            feature(f64::NAN, -23.55, Some("furto")),
            feature(-46.63, f64::INFINITY, Some("furto")),
        ]);
        assert!(extract_points(&fc, None).is_empty());
    }

    #[test]
    fn skips_features_without_point_geometry() {
        let mut no_geometry = feature(-46.63, -23.55, Some("furto"));
        no_geometry.geometry = None;
        let fc = collection(vec![no_geometry]);
        assert!(extract_points(&fc, None).is_empty());
    }

    #[test]
    fn missing_crime_type_gets_placeholder() {
        let fc = collection(vec![feature(-46.63, -23.55, None)]);
        let points = extract_points(&fc, None);
        assert_eq!(points[0].crime_type, "N/A");
    }
}
