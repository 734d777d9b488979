use serde::{Deserialize, Serialize};

/// Represents a food truck in the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl Truck {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lng?))
    }
}

/// Params for creating a new truck.
#[derive(Debug, Clone, PartialEq)]
pub struct TruckCreate {
    pub name: String,
    pub city: Option<String>,
    pub note: Option<String>,
    pub active: bool,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Params for updating an existing truck.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TruckPatch {
    pub name: Option<String>,
    pub city: Option<Option<String>>,
    pub note: Option<Option<String>>,
    pub active: Option<bool>,
    pub lat: Option<Option<f64>>,
    pub lng: Option<Option<f64>>,
}

/// Raw truck form input. Coordinates are typed as text.
#[derive(Debug, Clone)]
pub struct TruckDraft {
    pub name: String,
    pub city: String,
    pub note: String,
    pub active: bool,
    pub lat: String,
    pub lng: String,
}

impl Default for TruckDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            city: String::new(),
            note: String::new(),
            active: true,
            lat: String::new(),
            lng: String::new(),
        }
    }
}

impl TruckDraft {
    /// `None` when the name is blank. Unparseable coordinates are dropped.
    pub fn to_create(&self) -> Option<TruckCreate> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(TruckCreate {
            name: name.to_string(),
            city: optional(&self.city),
            note: optional(&self.note),
            active: self.active,
            lat: parse_coordinate(&self.lat),
            lng: parse_coordinate(&self.lng),
        })
    }

    pub fn to_patch(&self) -> TruckPatch {
        TruckPatch {
            name: Some(self.name.clone()),
            city: Some(optional(&self.city)),
            note: Some(optional(&self.note)),
            active: Some(self.active),
            lat: Some(parse_coordinate(&self.lat)),
            lng: Some(parse_coordinate(&self.lng)),
        }
    }
}

pub fn parse_coordinate(text: &str) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

fn optional(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Case-insensitive search over name, city and note, sorted by name.
pub fn search_trucks(trucks: &[Truck], query: &str) -> Vec<Truck> {
    let needle = query.to_lowercase();
    let mut list: Vec<Truck> = trucks
        .iter()
        .filter(|t| {
            format!(
                "{} {} {}",
                t.name,
                t.city.as_deref().unwrap_or_default(),
                t.note.as_deref().unwrap_or_default()
            )
            .to_lowercase()
            .contains(&needle)
        })
        .cloned()
        .collect();
    list.sort_by_key(|t| t.name.to_lowercase());
    list
}
