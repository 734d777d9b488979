/// Cities the truck serves, in display order.
pub const CITIES: [&str; 12] = [
    "Orange",
    "Bagnols-sur-Cèze",
    "Uzès",
    "Rochefort-du-Gard",
    "Remoulins",
    "Saint-Victor-la-Coste",
    "Villeneuve-lès-Avignon",
    "Saint-Julien-de-Peyrolas",
    "Châteauneuf-du-Pape",
    "Tavel",
    "Courthézon",
    "Tricastin",
];

/// Label used when an order or truck has no city.
pub const UNKNOWN_CITY: &str = "—";

pub fn cities() -> Vec<String> {
    CITIES.iter().map(|c| c.to_string()).collect()
}

pub fn is_served(city: &str) -> bool {
    CITIES.contains(&city)
}
