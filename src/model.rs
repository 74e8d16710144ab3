use serde::{Deserialize, Serialize};

/// Location fix delivered by the SDK
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy in meters
    pub accuracy: f64,
    /// Seconds since epoch, when the SDK supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            timestamp: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(rename = "externalId", default)]
    pub external_id: Option<String>,
}

impl Geofence {
    pub fn new(description: &str) -> Self {
        Self {
            id: String::new(),
            description: description.to_string(),
            tag: None,
            external_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub chain: Option<Chain>,
}

impl Place {
    pub fn new(name: &str) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            categories: Vec::new(),
            chain: None,
        }
    }
}

/// Country, state or DMA region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// User tracking snapshot delivered alongside events and locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub stopped: bool,
    #[serde(default)]
    pub geofences: Vec<Geofence>,
    #[serde(default)]
    pub place: Option<Place>,
}

/// Event type, keyed by the SDK's wire name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    EnteredGeofence,
    ExitedGeofence,
    EnteredHome,
    ExitedHome,
    EnteredOffice,
    ExitedOffice,
    StartedTraveling,
    StoppedTraveling,
    EnteredPlace,
    ExitedPlace,
    NearbyPlaceChain,
    EnteredRegionCountry,
    ExitedRegionCountry,
    EnteredRegionState,
    ExitedRegionState,
    EnteredRegionDma,
    ExitedRegionDma,
    Other(String),
}

impl EventType {
    pub fn from_wire(name: &str) -> Self {
        match name {
            "user.entered_geofence" => EventType::EnteredGeofence,
            "user.exited_geofence" => EventType::ExitedGeofence,
            "user.entered_home" => EventType::EnteredHome,
            "user.exited_home" => EventType::ExitedHome,
            "user.entered_office" => EventType::EnteredOffice,
            "user.exited_office" => EventType::ExitedOffice,
            "user.started_traveling" => EventType::StartedTraveling,
            "user.stopped_traveling" => EventType::StoppedTraveling,
            "user.entered_place" => EventType::EnteredPlace,
            "user.exited_place" => EventType::ExitedPlace,
            "user.nearby_place_chain" => EventType::NearbyPlaceChain,
            "user.entered_region_country" => EventType::EnteredRegionCountry,
            "user.exited_region_country" => EventType::ExitedRegionCountry,
            "user.entered_region_state" => EventType::EnteredRegionState,
            "user.exited_region_state" => EventType::ExitedRegionState,
            "user.entered_region_dma" => EventType::EnteredRegionDma,
            "user.exited_region_dma" => EventType::ExitedRegionDma,
            other => EventType::Other(other.to_string()),
        }
    }

    pub fn wire_name(&self) -> &str {
        match self {
            EventType::EnteredGeofence => "user.entered_geofence",
            EventType::ExitedGeofence => "user.exited_geofence",
            EventType::EnteredHome => "user.entered_home",
            EventType::ExitedHome => "user.exited_home",
            EventType::EnteredOffice => "user.entered_office",
            EventType::ExitedOffice => "user.exited_office",
            EventType::StartedTraveling => "user.started_traveling",
            EventType::StoppedTraveling => "user.stopped_traveling",
            EventType::EnteredPlace => "user.entered_place",
            EventType::ExitedPlace => "user.exited_place",
            EventType::NearbyPlaceChain => "user.nearby_place_chain",
            EventType::EnteredRegionCountry => "user.entered_region_country",
            EventType::ExitedRegionCountry => "user.exited_region_country",
            EventType::EnteredRegionState => "user.entered_region_state",
            EventType::ExitedRegionState => "user.exited_region_state",
            EventType::EnteredRegionDma => "user.entered_region_dma",
            EventType::ExitedRegionDma => "user.exited_region_dma",
            EventType::Other(name) => name,
        }
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        EventType::from_wire(&name)
    }
}

impl From<EventType> for String {
    fn from(kind: EventType) -> Self {
        kind.wire_name().to_string()
    }
}

/// How sure the SDK is about an event (wire value 0-3)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub enum EventConfidence {
    #[default]
    Unknown,
    Low,
    Medium,
    High,
}

impl From<i64> for EventConfidence {
    fn from(value: i64) -> Self {
        match value {
            1 => EventConfidence::Low,
            2 => EventConfidence::Medium,
            3 => EventConfidence::High,
            _ => EventConfidence::Unknown,
        }
    }
}

impl From<EventConfidence> for u8 {
    fn from(confidence: EventConfidence) -> Self {
        match confidence {
            EventConfidence::Unknown => 0,
            EventConfidence::Low => 1,
            EventConfidence::Medium => 2,
            EventConfidence::High => 3,
        }
    }
}

/// User location transition reported by the SDK
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(default)]
    pub geofence: Option<Geofence>,
    #[serde(default)]
    pub place: Option<Place>,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub confidence: EventConfidence,
}

impl Event {
    pub fn new(kind: EventType) -> Self {
        Self {
            id: String::new(),
            kind,
            geofence: None,
            place: None,
            region: None,
            confidence: EventConfidence::Unknown,
        }
    }

    pub fn with_geofence(mut self, geofence: Geofence) -> Self {
        self.geofence = Some(geofence);
        self
    }

    pub fn with_place(mut self, place: Place) -> Self {
        self.place = Some(place);
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_confidence(mut self, confidence: EventConfidence) -> Self {
        self.confidence = confidence;
        self
    }
}

/// Where a client-side location update came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationSource {
    ForegroundLocation,
    BackgroundLocation,
    ManualLocation,
    GeofenceEnter,
    GeofenceDwell,
    GeofenceExit,
    #[serde(other)]
    Unknown,
}
