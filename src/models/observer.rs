/// Where and in which timezone the user observes prayers. An absent profile
/// yields the default (0, 0, empty timezone) — a degraded but defined state,
/// not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObserverContext {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

impl ObserverContext {
    pub fn new(latitude: f64, longitude: f64, timezone: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            timezone: timezone.into(),
        }
    }
}
