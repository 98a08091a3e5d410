use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

use super::RoomClient;
use crate::actor_framework::ResourceClient;
use crate::domain::{
    Caller, Hotel, HotelCreate, HotelPatch, HotelStatus, Price, Role, RoomAvailability, RoomCategory,
    RoomCategoryCreate, RoomCategoryPatch, StayRange,
};
use crate::hotel_actor::{HotelAction, HotelError};

/// Filters for the public hotel search.
#[derive(Debug, Clone, Default)]
pub struct HotelSearch {
    pub city: Option<String>,
    pub stay: Option<StayRange>,
    pub guests: Option<u32>,
}

/// A search hit with the cheapest nightly rate among matching categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelSummary {
    #[serde(flatten)]
    pub hotel: Hotel,
    pub from_rate: Option<Decimal>,
}

/// Client for hotel listings and their room categories.
#[derive(Clone)]
pub struct HotelClient {
    inner: ResourceClient<Hotel>,
    rooms: RoomClient,
}

impl_client_methods!(HotelClient, Hotel, HotelError, hotel);

impl HotelClient {
    pub fn new(inner: ResourceClient<Hotel>, rooms: RoomClient) -> Self {
        Self { inner, rooms }
    }

    pub fn rooms(&self) -> &RoomClient {
        &self.rooms
    }

    /// Owners and admins may manage a hotel.
    fn ensure_manager(caller: &Caller, hotel: &Hotel) -> Result<(), HotelError> {
        if caller.can_act_for(&hotel.owner_id) {
            Ok(())
        } else {
            Err(HotelError::Forbidden(format!("{} does not manage {}", caller.user_id, hotel.id)))
        }
    }

    /// Loads a hotel the caller manages.
    #[instrument(skip(self))]
    pub async fn managed_hotel(&self, caller: &Caller, id: String) -> Result<Hotel, HotelError> {
        let hotel = self.require_hotel(id).await?;
        Self::ensure_manager(caller, &hotel)?;
        Ok(hotel)
    }

    /// Lists a new hotel owned by the caller, waiting for approval.
    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_hotel(&self, caller: &Caller, mut params: HotelCreate) -> Result<Hotel, HotelError> {
        debug!("Sending request");
        if caller.role != Role::HotelOwner && !caller.is_admin() {
            return Err(HotelError::Forbidden("only hotel owners can list hotels".to_string()));
        }
        params.owner_id = caller.user_id.clone();
        let hotel = self.inner.create(params).await?;
        info!(hotel_id = %hotel.id, owner_id = %hotel.owner_id, "Hotel listed");
        Ok(hotel)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_hotel(&self, caller: &Caller, id: String, patch: HotelPatch) -> Result<Hotel, HotelError> {
        debug!("Sending request");
        self.managed_hotel(caller, id.clone()).await?;
        Ok(self.inner.update(id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn set_status(&self, caller: &Caller, id: String, status: HotelStatus) -> Result<Hotel, HotelError> {
        debug!("Sending request");
        if !caller.is_admin() {
            return Err(HotelError::Forbidden("only admins approve or suspend hotels".to_string()));
        }
        let hotel = self.inner.perform_action(id, HotelAction::SetStatus(status)).await?;
        info!(hotel_id = %hotel.id, status = ?hotel.status, "Hotel status changed");
        Ok(hotel)
    }

    /// Removes a hotel and its room categories. Refused while any category
    /// still holds reservations.
    #[instrument(skip(self))]
    pub async fn delete_hotel(&self, caller: &Caller, id: String) -> Result<(), HotelError> {
        debug!("Sending request");
        if !caller.is_admin() {
            return Err(HotelError::Forbidden("only admins delete hotels".to_string()));
        }
        self.require_hotel(id.clone()).await?;
        let rooms = self.rooms.rooms_for_hotel(id.clone()).await?;
        if let Some(busy) = rooms.iter().find(|r| !r.reservations.is_empty()) {
            return Err(HotelError::Conflict(format!(
                "room category {} still has active reservations",
                busy.id
            )));
        }
        for room in rooms {
            self.rooms.delete_room(room.id).await?;
        }
        self.inner.delete(id.clone()).await?;
        info!(hotel_id = %id, "Hotel deleted");
        Ok(())
    }

    /// Approved hotels matching the filters, in listing order.
    ///
    /// With guests or a stay, a hotel only matches when one of its
    /// categories fits the party and has a free room for the whole stay.
    #[instrument(skip(self))]
    pub async fn search(&self, query: HotelSearch) -> Result<Vec<HotelSummary>, HotelError> {
        debug!("Sending request");
        let city = query.city.clone().filter(|c| !c.trim().is_empty());
        let hotels = self
            .inner
            .list_where(move |h| h.is_bookable() && city.as_deref().map_or(true, |c| h.in_city(c)))
            .await?;

        let mut by_hotel: HashMap<String, Vec<RoomCategory>> = HashMap::new();
        for room in self.rooms.all_rooms().await? {
            by_hotel.entry(room.hotel_id.clone()).or_default().push(room);
        }

        let filtered = query.stay.is_some() || query.guests.is_some();
        let guests = query.guests.unwrap_or(1).max(1);
        let results = hotels
            .into_iter()
            .filter_map(|hotel| {
                let rooms = by_hotel.get(&hotel.id).map(Vec::as_slice).unwrap_or_default();
                let from_rate = rooms
                    .iter()
                    .filter(|r| query.stay.map_or(true, |stay| r.free_rooms(&stay) > 0))
                    .filter_map(|r| r.tier_for(guests).map(|p| p.nightly_rate))
                    .min();
                if filtered && from_rate.is_none() {
                    return None;
                }
                Some(HotelSummary { hotel, from_rate })
            })
            .collect();
        Ok(results)
    }

    /// Hotels owned by the caller, any status.
    #[instrument(skip(self))]
    pub async fn owned_hotels(&self, caller: &Caller) -> Result<Vec<Hotel>, HotelError> {
        let owner = caller.user_id.clone();
        Ok(self.inner.list_where(move |h| h.owner_id == owner).await?)
    }

    #[instrument(skip(self))]
    pub async fn hotels_with_status(&self, caller: &Caller, status: HotelStatus) -> Result<Vec<Hotel>, HotelError> {
        if !caller.is_admin() {
            return Err(HotelError::Forbidden("only admins list hotels by status".to_string()));
        }
        Ok(self.inner.list_where(move |h| h.status == status).await?)
    }

    #[instrument(skip(self, prices))]
    pub async fn add_room(
        &self,
        caller: &Caller,
        hotel_id: String,
        name: String,
        total_rooms: u32,
        prices: Vec<Price>,
    ) -> Result<RoomCategory, HotelError> {
        self.managed_hotel(caller, hotel_id.clone()).await?;
        let room = self
            .rooms
            .create_room(RoomCategoryCreate {
                hotel_id,
                name,
                total_rooms,
                prices,
            })
            .await?;
        info!(room_id = %room.id, hotel_id = %room.hotel_id, total_rooms, "Room category added");
        Ok(room)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_room(
        &self,
        caller: &Caller,
        room_id: String,
        patch: RoomCategoryPatch,
    ) -> Result<RoomCategory, HotelError> {
        let room = self.rooms.require_room(room_id.clone()).await?;
        self.managed_hotel(caller, room.hotel_id).await?;
        self.rooms.update_room(room_id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn delete_room(&self, caller: &Caller, room_id: String) -> Result<(), HotelError> {
        let room = self.rooms.require_room(room_id.clone()).await?;
        self.managed_hotel(caller, room.hotel_id).await?;
        self.rooms.delete_room(room_id).await
    }

    /// Room categories of a hotel. Unapproved hotels are only visible to
    /// their managers.
    #[instrument(skip(self))]
    pub async fn rooms_for(&self, caller: Option<&Caller>, hotel_id: String) -> Result<Vec<RoomCategory>, HotelError> {
        self.visible_hotel(caller, hotel_id.clone()).await?;
        self.rooms.rooms_for_hotel(hotel_id).await
    }

    /// Free rooms and prices per category for a stay.
    #[instrument(skip(self))]
    pub async fn availability(
        &self,
        hotel_id: String,
        stay: StayRange,
        guests: u32,
        rooms: u32,
    ) -> Result<Vec<RoomAvailability>, HotelError> {
        let hotel = self.require_hotel(hotel_id.clone()).await?;
        if !hotel.is_bookable() {
            return Err(HotelError::NotFound(hotel_id));
        }
        let rooms = rooms.max(1);
        let per_room = guests.max(1).div_ceil(rooms);
        let categories = self.rooms.rooms_for_hotel(hotel_id).await?;
        Ok(categories
            .iter()
            .map(|r| RoomAvailability {
                room_category_id: r.id.clone(),
                name: r.name.clone(),
                free_rooms: r.free_rooms(&stay),
                nightly_rate: r.tier_for(per_room).map(|p| p.nightly_rate),
                quote: r.quote(guests.max(1), rooms, &stay),
            })
            .collect())
    }

    /// A hotel as seen by `caller`: approved hotels are public, others only
    /// visible to their owner and admins.
    #[instrument(skip(self))]
    pub async fn visible_hotel(&self, caller: Option<&Caller>, id: String) -> Result<Hotel, HotelError> {
        let hotel = self.require_hotel(id.clone()).await?;
        let manages = caller.is_some_and(|c| c.can_act_for(&hotel.owner_id));
        if hotel.is_bookable() || manages {
            Ok(hotel)
        } else {
            Err(HotelError::NotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
        let counter = Arc::new(AtomicU64::new(1));
        move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
    }

    fn start() -> HotelClient {
        let (hotel_actor, hotels) = ResourceActor::new("hotels", 8, ids("hotel"));
        let (room_actor, rooms) = ResourceActor::new("rooms", 8, ids("room"));
        tokio::spawn(hotel_actor.run());
        tokio::spawn(room_actor.run());
        HotelClient::new(hotels, RoomClient::new(rooms))
    }

    fn listing(name: &str, city: &str) -> HotelCreate {
        HotelCreate {
            owner_id: String::new(),
            name: name.into(),
            city: city.into(),
            address: "Road 1".into(),
            description: String::new(),
            amenities: vec![],
        }
    }

    fn stay(from: u32, to: u32) -> StayRange {
        StayRange::new(
            NaiveDate::from_ymd_opt(2026, 12, from).unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, to).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_only_owners_list_and_only_admins_approve() {
        let hotels = start();
        let owner = Caller::new("user_2", Role::HotelOwner);
        let customer = Caller::new("user_3", Role::Customer);
        let admin = Caller::new("user_1", Role::Admin);

        let denied = hotels.create_hotel(&customer, listing("Sea Pearl", "Cox's Bazar")).await;
        assert!(matches!(denied, Err(HotelError::Forbidden(_))));

        let hotel = hotels.create_hotel(&owner, listing("Sea Pearl", "Cox's Bazar")).await.unwrap();
        assert_eq!(hotel.owner_id, "user_2");
        assert_eq!(hotel.status, HotelStatus::Pending);

        let denied = hotels.set_status(&owner, hotel.id.clone(), HotelStatus::Approved).await;
        assert!(matches!(denied, Err(HotelError::Forbidden(_))));
        let approved = hotels.set_status(&admin, hotel.id, HotelStatus::Approved).await.unwrap();
        assert!(approved.is_bookable());
    }

    #[tokio::test]
    async fn test_search_filters_by_city_and_free_rooms() {
        let hotels = start();
        let owner = Caller::new("user_2", Role::HotelOwner);
        let admin = Caller::new("user_1", Role::Admin);

        let dhaka = hotels.create_hotel(&owner, listing("Pan Pacific", "Dhaka")).await.unwrap();
        let coxs = hotels.create_hotel(&owner, listing("Sea Pearl", "Cox's Bazar")).await.unwrap();
        let _pending = hotels.create_hotel(&owner, listing("Unlisted", "Dhaka")).await.unwrap();
        for id in [&dhaka.id, &coxs.id] {
            hotels.set_status(&admin, id.clone(), HotelStatus::Approved).await.unwrap();
        }
        let prices = vec![
            Price { max_guests: 2, nightly_rate: dec!(6000) },
            Price { max_guests: 4, nightly_rate: dec!(9000) },
        ];
        let room = hotels.add_room(&owner, dhaka.id.clone(), "Deluxe".into(), 1, prices.clone()).await.unwrap();
        hotels.add_room(&owner, coxs.id.clone(), "Suite".into(), 2, prices).await.unwrap();

        let in_dhaka = hotels
            .search(HotelSearch { city: Some("dhaka".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(in_dhaka.len(), 1);
        assert_eq!(in_dhaka[0].from_rate, Some(dec!(6000)));

        hotels.rooms().reserve(room.id, stay(10, 12), 1).await.unwrap();
        let query = HotelSearch { city: None, stay: Some(stay(11, 13)), guests: Some(3) };
        let hits = hotels.search(query).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].hotel.id, coxs.id);
        assert_eq!(hits[0].from_rate, Some(dec!(9000)));
    }

    #[tokio::test]
    async fn test_delete_refused_while_rooms_are_held() {
        let hotels = start();
        let owner = Caller::new("user_2", Role::HotelOwner);
        let admin = Caller::new("user_1", Role::Admin);
        let hotel = hotels.create_hotel(&owner, listing("Sea Pearl", "Cox's Bazar")).await.unwrap();
        let prices = vec![Price { max_guests: 2, nightly_rate: dec!(5000) }];
        let room = hotels.add_room(&owner, hotel.id.clone(), "Twin".into(), 2, prices).await.unwrap();
        let reservation = hotels.rooms().reserve(room.id.clone(), stay(1, 3), 1).await.unwrap();

        assert!(matches!(hotels.delete_hotel(&owner, hotel.id.clone()).await, Err(HotelError::Forbidden(_))));
        assert!(matches!(hotels.delete_hotel(&admin, hotel.id.clone()).await, Err(HotelError::Conflict(_))));

        hotels.rooms().release(room.id.clone(), reservation).await.unwrap();
        hotels.delete_hotel(&admin, hotel.id.clone()).await.unwrap();
        assert_eq!(hotels.get_hotel(hotel.id).await.unwrap(), None);
        assert_eq!(hotels.rooms().get_room(room.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_other_owner_cannot_touch_rooms() {
        let hotels = start();
        let owner = Caller::new("user_2", Role::HotelOwner);
        let rival = Caller::new("user_9", Role::HotelOwner);
        let hotel = hotels.create_hotel(&owner, listing("Sea Pearl", "Cox's Bazar")).await.unwrap();
        let prices = vec![Price { max_guests: 2, nightly_rate: dec!(5000) }];
        let denied = hotels.add_room(&rival, hotel.id.clone(), "Twin".into(), 2, prices.clone()).await;
        assert!(matches!(denied, Err(HotelError::Forbidden(_))));

        let room = hotels.add_room(&owner, hotel.id, "Twin".into(), 2, prices).await.unwrap();
        let patch = RoomCategoryPatch { total_rooms: Some(5), ..Default::default() };
        assert!(matches!(
            hotels.update_room(&rival, room.id.clone(), patch.clone()).await,
            Err(HotelError::Forbidden(_))
        ));
        assert_eq!(hotels.update_room(&owner, room.id, patch).await.unwrap().total_rooms, 5);
    }
}
