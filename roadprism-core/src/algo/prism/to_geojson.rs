use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::{Map, Value as JsonValue, json};

use super::{ChainResult, PrismFeature, PrismResult};
use crate::Error;

impl PrismFeature {
    /// Converts the segment to a `GeoJSON` `LineString` feature carrying `score` and `time_cost`
    pub fn to_feature(&self) -> Result<Feature, Error> {
        let geometry = Geometry::new(GeoJsonValue::from(&self.geometry));

        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "score": self.score,
                "time_cost": self.time_cost,
            }
        });

        serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

impl PrismResult {
    /// Converts the leg to a `FeatureCollection`; the summed length, when computed,
    /// is attached as `properties.total_length_m`
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let summary = self
            .total_length
            .map(|meters| ("total_length_m", json!(meters)));
        feature_collection(&self.features, summary)
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        to_string(&self.to_geojson()?)
    }
}

impl ChainResult {
    /// Converts the chain to a `FeatureCollection`; the summed length, when computed,
    /// is attached as `properties.total_length_km`
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let summary = self
            .total_length_km
            .map(|km| ("total_length_km", json!(km)));
        feature_collection(&self.features, summary)
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        to_string(&self.to_geojson()?)
    }
}

fn to_string(collection: &FeatureCollection) -> Result<String, Error> {
    serde_json::to_string(collection).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn feature_collection(
    features: &[PrismFeature],
    summary: Option<(&str, JsonValue)>,
) -> Result<FeatureCollection, Error> {
    let features = features
        .iter()
        .map(PrismFeature::to_feature)
        .collect::<Result<Vec<_>, _>>()?;

    let foreign_members = summary.map(|(name, value)| {
        let mut properties = Map::new();
        properties.insert(name.to_string(), value);

        let mut members = Map::new();
        members.insert("properties".to_string(), JsonValue::Object(properties));
        members
    });

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members,
    })
}
