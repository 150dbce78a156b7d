use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One navigable city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// Unique key; also the control's `data-section` attribute.
    pub section: String,
    /// Display text. Doubles as the zone location when `api` is absent.
    pub label: String,
    /// IANA area, e.g. `America`.
    pub area: String,
    /// IANA location, e.g. `New_York`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
}

impl City {
    /// `area/location`, where location is `api` or the label with spaces
    /// turned into underscores.
    pub fn zone_id(&self) -> String {
        match &self.api {
            Some(api) => format!("{}/{}", self.area, api),
            None => format!("{}/{}", self.area, self.label.replace(' ', "_")),
        }
    }
}

/// The JSON document served alongside the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationDocument {
    pub cities: Vec<City>,
}

#[derive(Debug)]
pub enum RegistryError {
    Json(serde_json::Error),
    EmptySection { index: usize },
    DuplicateSection(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Json(e) => write!(f, "invalid navigation document: {e}"),
            RegistryError::EmptySection { index } => {
                write!(f, "city #{index} has an empty section")
            }
            RegistryError::DuplicateSection(section) => {
                write!(f, "section '{section}' appears more than once")
            }
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        RegistryError::Json(e)
    }
}

/// Ordered, validated list of cities. Loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityRegistry {
    cities: Vec<City>,
}

impl CityRegistry {
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let doc: NavigationDocument = serde_json::from_str(json)?;
        Self::from_cities(doc.cities)
    }

    pub fn from_cities(cities: Vec<City>) -> Result<Self, RegistryError> {
        let mut seen = BTreeSet::new();
        for (index, city) in cities.iter().enumerate() {
            if city.section.is_empty() {
                return Err(RegistryError::EmptySection { index });
            }
            if !seen.insert(city.section.as_str()) {
                return Err(RegistryError::DuplicateSection(city.section.clone()));
            }
        }
        Ok(Self { cities })
    }

    pub fn get(&self, section: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.section == section)
    }

    pub fn iter(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(|c| c.section.as_str())
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
