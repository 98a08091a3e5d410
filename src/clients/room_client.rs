use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{RoomCategory, RoomCategoryCreate, RoomCategoryPatch, StayRange};
use crate::hotel_actor::HotelError;
use crate::room_actor::{RoomAction, RoomActionResult};

/// Client for interacting with the RoomCategory actor.
///
/// Access control lives in `HotelClient`; this client only talks to the actor.
#[derive(Clone)]
pub struct RoomClient {
    inner: ResourceClient<RoomCategory>,
}

/// Room lookups report a missing category, not a missing hotel.
fn room_error(e: FrameworkError) -> HotelError {
    match e {
        FrameworkError::NotFound(id) => HotelError::RoomNotFound(id),
        other => HotelError::from(other),
    }
}

impl RoomClient {
    pub fn new(inner: ResourceClient<RoomCategory>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn get_room(&self, id: String) -> Result<Option<RoomCategory>, HotelError> {
        debug!("Sending request");
        self.inner.get(id).await.map_err(room_error)
    }

    #[instrument(skip(self))]
    pub async fn require_room(&self, id: String) -> Result<RoomCategory, HotelError> {
        self.get_room(id.clone()).await?.ok_or(HotelError::RoomNotFound(id))
    }

    #[instrument(skip(self, params), fields(hotel_id = %params.hotel_id))]
    pub async fn create_room(&self, params: RoomCategoryCreate) -> Result<RoomCategory, HotelError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(room_error)
    }

    #[instrument(skip(self))]
    pub async fn update_room(&self, id: String, patch: RoomCategoryPatch) -> Result<RoomCategory, HotelError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(room_error)
    }

    #[instrument(skip(self))]
    pub async fn delete_room(&self, id: String) -> Result<(), HotelError> {
        debug!("Sending request");
        self.inner.delete(id).await.map_err(|e| match e {
            FrameworkError::Rejected(msg) => HotelError::Conflict(msg),
            other => room_error(other),
        })
    }

    #[instrument(skip(self))]
    pub async fn rooms_for_hotel(&self, hotel_id: String) -> Result<Vec<RoomCategory>, HotelError> {
        debug!("Sending request");
        self.inner.list_where(move |r| r.hotel_id == hotel_id).await.map_err(room_error)
    }

    #[instrument(skip(self))]
    pub async fn all_rooms(&self) -> Result<Vec<RoomCategory>, HotelError> {
        debug!("Sending request");
        self.inner.list().await.map_err(room_error)
    }

    /// Holds rooms for a stay and returns the reservation id.
    #[instrument(skip(self))]
    pub async fn reserve(&self, id: String, stay: StayRange, rooms: u32) -> Result<u64, HotelError> {
        debug!("Sending request");
        let result = self
            .inner
            .perform_action(id.clone(), RoomAction::Reserve { stay, rooms })
            .await
            .map_err(|e| match e {
                FrameworkError::Rejected(msg) => HotelError::Unavailable(msg),
                other => room_error(other),
            })?;
        match result {
            RoomActionResult::Reserved { reservation_id } => {
                info!(room_id = %id, reservation_id, rooms, "Rooms reserved");
                Ok(reservation_id)
            }
            other => Err(unexpected(other)),
        }
    }

    /// Gives back a reservation's rooms. Returns how many were released.
    #[instrument(skip(self))]
    pub async fn release(&self, id: String, reservation_id: u64) -> Result<u32, HotelError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id.clone(), RoomAction::Release { reservation_id })
            .await
            .map_err(room_error)?
        {
            RoomActionResult::Released { rooms } => {
                info!(room_id = %id, reservation_id, rooms, "Rooms released");
                Ok(rooms)
            }
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn free_rooms(&self, id: String, stay: StayRange) -> Result<u32, HotelError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, RoomAction::Availability { stay })
            .await
            .map_err(room_error)?
        {
            RoomActionResult::Availability { free_rooms } => Ok(free_rooms),
            other => Err(unexpected(other)),
        }
    }

    /// Subtotal for the stay together with the rooms still free for it.
    #[instrument(skip(self))]
    pub async fn quote(
        &self,
        id: String,
        guests: u32,
        rooms: u32,
        stay: StayRange,
    ) -> Result<(Decimal, u32), HotelError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, RoomAction::Quote { guests, rooms, stay })
            .await
            .map_err(room_error)?
        {
            RoomActionResult::Quoted { subtotal, free_rooms } => Ok((subtotal, free_rooms)),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: RoomActionResult) -> HotelError {
    warn!(?result, "Unexpected room action result");
    HotelError::ActorCommunicationError(format!("unexpected room action result: {result:?}"))
}
