use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotelStatus {
    /// Listed by an owner, waiting for an admin.
    Pending,
    Approved,
    Suspended,
}

/// A property listed on the platform. Only approved hotels are bookable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotel {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub city: String,
    pub address: String,
    pub description: String,
    pub amenities: Vec<String>,
    pub status: HotelStatus,
    pub created_at: DateTime<Utc>,
}

impl Hotel {
    pub fn is_bookable(&self) -> bool {
        self.status == HotelStatus::Approved
    }

    /// Case-insensitive substring match on the city.
    pub fn in_city(&self, city: &str) -> bool {
        self.city.to_lowercase().contains(&city.trim().to_lowercase())
    }
}

#[derive(Debug, Clone)]
pub struct HotelCreate {
    pub owner_id: String,
    pub name: String,
    pub city: String,
    pub address: String,
    pub description: String,
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelPatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
}
