use chrono::Utc;

use super::actions::HotelAction;
use crate::actor_framework::Entity;
use crate::domain::{Hotel, HotelCreate, HotelPatch, HotelStatus};

fn required(field: &str, value: String) -> Result<String, String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(value)
}

fn clean_amenities(amenities: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = amenities
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();
    out.dedup();
    out
}

impl Entity for Hotel {
    type Id = String;
    type CreateParams = HotelCreate;
    type Patch = HotelPatch;
    type Action = HotelAction;
    type ActionResult = Hotel;

    fn id(&self) -> &String {
        &self.id
    }

    /// New listings start out pending until an admin approves them.
    fn from_create_params(id: String, params: HotelCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            owner_id: params.owner_id,
            name: required("Name", params.name)?,
            city: required("City", params.city)?,
            address: required("Address", params.address)?,
            description: params.description.trim().to_string(),
            amenities: clean_amenities(params.amenities),
            status: HotelStatus::Pending,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, patch: HotelPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            self.name = required("Name", name)?;
        }
        if let Some(city) = patch.city {
            self.city = required("City", city)?;
        }
        if let Some(address) = patch.address {
            self.address = required("Address", address)?;
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(amenities) = patch.amenities {
            self.amenities = clean_amenities(amenities);
        }
        Ok(())
    }

    fn handle_action(&mut self, action: HotelAction) -> Result<Hotel, String> {
        match action {
            HotelAction::SetStatus(status) => {
                self.status = status;
                Ok(self.clone())
            }
        }
    }
}
