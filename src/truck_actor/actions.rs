/// Custom actions for Truck entities.
#[derive(Debug, Clone)]
pub enum TruckAction {
    /// Flips the active flag.
    ToggleActive,
    SetActive(bool),
}

/// Results from TruckActions - variants match 1:1 with TruckAction
#[derive(Debug, Clone, PartialEq)]
pub enum TruckActionResult {
    /// The new value of the active flag.
    ToggleActive(bool),
    SetActive(bool),
}
