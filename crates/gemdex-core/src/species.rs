use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SpeciesError;

/// Display fields derived from a PokeAPI detail payload, plus the payload itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesRecord {
    pub name: String,
    /// Raw PokeAPI units (decimetres), shown unconverted.
    pub height: i64,
    /// Raw PokeAPI units (hectograms), shown unconverted.
    pub weight: i64,
    pub types: Vec<String>,
    pub image_url: Option<String>,
    pub raw: Value,
}

/// One `{name, url}` entry of the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesPage {
    #[serde(default)]
    pub results: Vec<SpeciesRef>,
}

#[derive(Deserialize)]
struct DetailPayload {
    name: String,
    height: i64,
    weight: i64,
    #[serde(default)]
    sprites: Sprites,
    #[serde(default)]
    types: Vec<TypeSlot>,
}

#[derive(Deserialize, Default)]
struct Sprites {
    front_default: Option<String>,
}

#[derive(Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Deserialize)]
struct NamedResource {
    name: String,
}

impl SpeciesRecord {
    pub fn from_payload(raw: Value) -> Result<Self, SpeciesError> {
        let payload = DetailPayload::deserialize(&raw)?;

        Ok(Self {
            name: payload.name,
            height: payload.height,
            weight: payload.weight,
            types: payload.types.into_iter().map(|slot| slot.kind.name).collect(),
            image_url: payload.sprites.front_default,
            raw,
        })
    }

    pub fn heading(&self) -> String {
        self.name.to_uppercase()
    }

    pub fn types_joined(&self) -> String {
        self.types.join(", ")
    }

    pub fn raw_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }

    /// The detail endpoint this record is served from.
    pub fn endpoint(&self, base_url: &str) -> String {
        detail_endpoint(base_url, &self.name)
    }
}

pub fn detail_endpoint(base_url: &str, name: &str) -> String {
    format!("{}/pokemon/{}", base_url.trim_end_matches('/'), name.to_lowercase())
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pikachu_fields_verbatim() {
        let record = SpeciesRecord::from_payload(fixtures::payload("pikachu", 4, 60, &["electric"])).unwrap();
        assert_eq!(record.heading(), "PIKACHU");
        assert_eq!(record.height, 4);
        assert_eq!(record.weight, 60);
        assert_eq!(record.types_joined(), "electric");
        assert_eq!(record.image_url.as_deref(), Some("https://img.example/pikachu.png"));
    }

    #[test]
    fn test_types_keep_payload_order() {
        let record =
            SpeciesRecord::from_payload(fixtures::payload("bulbasaur", 7, 69, &["grass", "poison"])).unwrap();
        assert_eq!(record.types, vec!["grass", "poison"]);
        assert_eq!(record.types_joined(), "grass, poison");
    }

    #[test]
    fn test_raw_payload_is_kept_whole() {
        let raw = fixtures::payload("pikachu", 4, 60, &["electric"]);
        let record = SpeciesRecord::from_payload(raw.clone()).unwrap();
        assert_eq!(record.raw, raw);
        assert!(record.raw_pretty().contains("\"abilities\""));
        assert!(record.raw_pretty().contains('\n'));
    }

    #[test]
    fn test_missing_sprite_is_none() {
        let raw = json!({ "name": "missingno", "height": 10, "weight": 0, "sprites": { "front_default": null }, "types": [] });
        let record = SpeciesRecord::from_payload(raw).unwrap();
        assert_eq!(record.image_url, None);
        assert_eq!(record.types_joined(), "");
    }

    #[test]
    fn test_payload_without_required_fields_is_decode_error() {
        let err = SpeciesRecord::from_payload(json!({ "count": 1302, "results": [] })).unwrap_err();
        assert!(matches!(err, SpeciesError::Decode(_)));
    }

    #[test]
    fn test_endpoint_lowercases_name() {
        assert_eq!(
            detail_endpoint("https://pokeapi.co/api/v2/", "PikaChu"),
            "https://pokeapi.co/api/v2/pokemon/pikachu"
        );
    }
}
