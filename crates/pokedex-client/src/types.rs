//! Response types for the PokeAPI endpoints the shell uses.
//!
//! Only the fields that get printed are modeled; everything else in the
//! payload is ignored on decode.

use serde::{Deserialize, Serialize};

/// A named link to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    /// Resource name.
    pub name: String,
    /// Absolute URL of the resource.
    #[serde(default)]
    pub url: String,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResourcePage {
    /// Total number of resources across all pages.
    #[serde(default)]
    pub count: u64,
    /// URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page, if any.
    #[serde(default)]
    pub previous: Option<String>,
    /// Resources on this page.
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

/// A location area and the Pokemon that can be encountered there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationArea {
    /// Area name.
    #[serde(default)]
    pub name: String,
    /// Encounters available in the area.
    #[serde(default)]
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

impl LocationArea {
    /// Names of the Pokemon found in this area, in payload order.
    pub fn pokemon_names(&self) -> impl Iterator<Item = &str> {
        self.pokemon_encounters
            .iter()
            .map(|encounter| encounter.pokemon.name.as_str())
    }
}

/// A single encounter entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonEncounter {
    /// The Pokemon that can be encountered.
    pub pokemon: NamedResource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_ignores_unknown_fields() {
        let json = r#"{
            "count": 1089,
            "next": "https://pokeapi.co/api/v2/location-area/?offset=20&limit=20",
            "previous": null,
            "results": [
                {"name": "canalave-city-area", "url": "https://pokeapi.co/api/v2/location-area/1/"}
            ],
            "extra": true
        }"#;

        let page: NamedResourcePage = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 1089);
        assert!(page.previous.is_none());
        assert_eq!(page.results[0].name, "canalave-city-area");
    }

    #[test]
    fn test_location_area_pokemon_names() {
        let json = r#"{
            "name": "pastoria-city-area",
            "encounter_method_rates": [],
            "pokemon_encounters": [
                {"pokemon": {"name": "tentacool", "url": ""}, "version_details": []},
                {"pokemon": {"name": "magikarp", "url": ""}, "version_details": []}
            ]
        }"#;

        let area: LocationArea = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = area.pokemon_names().collect();
        assert_eq!(names, vec!["tentacool", "magikarp"]);
    }
}
