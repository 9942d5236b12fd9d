//! COMPATIBILITY SHIM — legacy response-shape normalization
//!
//! The pre-consolidation server variants disagreed on the response
//! envelope (bare array, `{data, total}`, `{rows, total}`,
//! `{postes, total}`, GeoJSON) and on record field names (Portuguese
//! column names, a single `empresa` string, a `"lat,lon"` coordinate
//! string). The canonical server emits exactly one shape; this module
//! exists only so the fetch loop can still talk to old deployments and
//! must not grow beyond that. A page that cannot be fully normalized
//! is an error — never partially applied.

use serde_json::{Map, Value};

use super::fetch::PageEnvelope;
use super::FetchError;
use crate::api::dto::PoleRecord;

/// Normalize any known legacy body into the canonical envelope.
pub fn normalize(value: Value) -> Result<PageEnvelope, FetchError> {
    match value {
        Value::Array(items) => envelope_from_items(items, None),
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("FeatureCollection") {
                let features = map
                    .get("features")
                    .and_then(Value::as_array)
                    .cloned()
                    .ok_or_else(|| decode("FeatureCollection without features array"))?;
                let items = features
                    .into_iter()
                    .map(feature_to_record_value)
                    .collect::<Result<Vec<_>, _>>()?;
                let total = map.get("total").and_then(Value::as_u64);
                return envelope_from_items(items, total);
            }
            for key in ["data", "rows", "postes"] {
                if let Some(items) = map.get(key).and_then(Value::as_array) {
                    let total = map.get("total").and_then(Value::as_u64);
                    return envelope_from_items(items.clone(), total);
                }
            }
            Err(decode("unrecognized response object shape"))
        }
        _ => Err(decode("response is neither array nor object")),
    }
}

fn decode(message: &str) -> FetchError {
    FetchError::Decode(message.to_string())
}

fn envelope_from_items(items: Vec<Value>, total: Option<u64>) -> Result<PageEnvelope, FetchError> {
    let records = items
        .into_iter()
        .map(record_from_value)
        .collect::<Result<Vec<PoleRecord>, _>>()?;
    // A bare array carries no count; its length is the best available total.
    let total = total.unwrap_or(records.len() as u64);
    Ok(PageEnvelope { total, records })
}

/// GeoJSON feature -> flat record value (properties + point coordinates)
fn feature_to_record_value(feature: Value) -> Result<Value, FetchError> {
    let Value::Object(mut feature) = feature else {
        return Err(decode("feature is not an object"));
    };
    let mut properties = match feature.remove("properties") {
        Some(Value::Object(props)) => props,
        _ => return Err(decode("feature without properties object")),
    };
    if let Some(Value::Object(geometry)) = feature.remove("geometry") {
        if let Some(coords) = geometry.get("coordinates").and_then(Value::as_array) {
            // GeoJSON order is [longitude, latitude]
            if let (Some(lng), Some(lat)) = (
                coords.first().and_then(Value::as_f64),
                coords.get(1).and_then(Value::as_f64),
            ) {
                properties.entry("longitude").or_insert(lng.into());
                properties.entry("latitude").or_insert(lat.into());
            }
        }
    }
    Ok(Value::Object(properties))
}

fn record_from_value(value: Value) -> Result<PoleRecord, FetchError> {
    let Value::Object(mut obj) = value else {
        return Err(decode("record is not an object"));
    };

    // Legacy Portuguese column names
    rename(&mut obj, "nome_municipio", "municipality");
    rename(&mut obj, "nome_bairro", "neighborhood");
    rename(&mut obj, "nome_logradouro", "street");
    rename(&mut obj, "altura", "height");
    rename(&mut obj, "tensao_mecanica", "mechanicalTension");
    rename(&mut obj, "empresas", "companies");
    rename(&mut obj, "qtd_empresas", "companyCount");

    // Oldest variant: a single `empresa` string column
    if !obj.contains_key("companies") {
        if let Some(Value::String(company)) = obj.remove("empresa") {
            obj.insert("companies".to_string(), Value::Array(vec![company.into()]));
        }
    }
    if !obj.contains_key("companyCount") {
        if let Some(companies) = obj.get("companies").and_then(Value::as_array) {
            obj.insert("companyCount".to_string(), (companies.len() as u64).into());
        }
    }

    // Legacy `"lat,lon"` coordinate string
    if !obj.contains_key("latitude") || !obj.contains_key("longitude") {
        if let Some(coords) = obj.get("coordenadas").and_then(Value::as_str) {
            if let Some((lat, lng)) = split_coordinates(coords) {
                obj.insert("latitude".to_string(), lat.into());
                obj.insert("longitude".to_string(), lng.into());
            }
        }
    }
    obj.remove("coordenadas");

    // Some variants serialized numerics as strings
    for key in ["height", "mechanicalTension", "latitude", "longitude"] {
        coerce_number(&mut obj, key);
    }

    serde_json::from_value(Value::Object(obj)).map_err(|e| FetchError::Decode(e.to_string()))
}

fn rename(obj: &mut Map<String, Value>, from: &str, to: &str) {
    if !obj.contains_key(to) {
        if let Some(value) = obj.remove(from) {
            obj.insert(to.to_string(), value);
        }
    }
}

fn coerce_number(obj: &mut Map<String, Value>, key: &str) {
    if let Some(Value::String(raw)) = obj.get(key) {
        if let Ok(parsed) = raw.trim().parse::<f64>() {
            if let Some(number) = serde_json::Number::from_f64(parsed) {
                obj.insert(key.to_string(), Value::Number(number));
            }
        }
    }
}

fn split_coordinates(raw: &str) -> Option<(f64, f64)> {
    let (lat, lng) = raw.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    (lat.is_finite() && lng.is_finite()).then_some((lat, lng))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn canonical_record() -> Value {
        json!({
            "id": 1,
            "municipality": "São Paulo",
            "neighborhood": "Centro",
            "street": "Rua A",
            "material": "concreto",
            "height": 9.0,
            "mechanicalTension": 300.0,
            "latitude": -23.2,
            "longitude": -46.6,
            "companies": ["CPFL"],
            "companyCount": 1
        })
    }

    #[test]
    fn normalizes_data_total_envelope() {
        let envelope = normalize(json!({"total": 42, "data": [canonical_record()]})).unwrap();
        assert_eq!(envelope.total, 42);
        assert_eq!(envelope.records.len(), 1);
        assert_eq!(envelope.records[0].id, 1);
    }

    #[test]
    fn normalizes_rows_and_postes_keys() {
        for key in ["rows", "postes"] {
            let envelope = normalize(json!({"total": 7, key: [canonical_record()]})).unwrap();
            assert_eq!(envelope.total, 7);
            assert_eq!(envelope.records.len(), 1);
        }
    }

    #[test]
    fn bare_array_uses_length_as_total() {
        let envelope = normalize(json!([canonical_record(), canonical_record()])).unwrap();
        assert_eq!(envelope.total, 2);
    }

    #[test]
    fn normalizes_portuguese_field_names_and_coordinate_string() {
        let legacy = json!({"total": 1, "data": [{
            "id": 9,
            "nome_municipio": "Osasco",
            "nome_bairro": "Centro",
            "nome_logradouro": "Rua B",
            "material": "madeira",
            "altura": "11.5",
            "tensao_mecanica": "600",
            "coordenadas": "-23.53,-46.79",
            "empresas": ["Claro", "Vivo"],
            "qtd_empresas": 2
        }]});
        let envelope = normalize(legacy).unwrap();
        let record = &envelope.records[0];
        assert_eq!(record.municipality, "Osasco");
        assert_eq!(record.height, 11.5);
        assert_eq!(record.mechanical_tension, 600.0);
        assert_eq!(record.latitude, -23.53);
        assert_eq!(record.longitude, -46.79);
        assert_eq!(record.company_count, 2);
    }

    #[test]
    fn single_empresa_string_becomes_company_list() {
        let legacy = json!([{
            "id": 3,
            "nome_municipio": "Osasco",
            "nome_bairro": "Centro",
            "nome_logradouro": "Rua C",
            "material": "concreto",
            "altura": 9.0,
            "tensao_mecanica": 300.0,
            "latitude": -23.5,
            "longitude": -46.7,
            "empresa": "CPFL"
        }]);
        let envelope = normalize(legacy).unwrap();
        assert_eq!(envelope.records[0].companies, vec!["CPFL"]);
        assert_eq!(envelope.records[0].company_count, 1);
    }

    #[test]
    fn normalizes_geojson_feature_collection() {
        let geojson = json!({
            "type": "FeatureCollection",
            "total": 1,
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-46.6, -23.2]},
                "properties": {
                    "id": 5,
                    "municipality": "São Paulo",
                    "neighborhood": "Centro",
                    "street": "Rua D",
                    "material": "concreto",
                    "height": 9.0,
                    "mechanicalTension": 300.0,
                    "companies": [],
                    "companyCount": 0
                }
            }]
        });
        let envelope = normalize(geojson).unwrap();
        assert_eq!(envelope.records[0].latitude, -23.2);
        assert_eq!(envelope.records[0].longitude, -46.6);
    }

    #[test]
    fn unrecognized_shape_is_an_error_not_a_partial_page() {
        assert!(normalize(json!({"weird": true})).is_err());
        assert!(normalize(json!("nope")).is_err());
        assert!(normalize(json!({"data": [{"id": "garbage"}]})).is_err());
    }
}
