use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::clients::{BookingClient, HotelClient};
use crate::domain::{Caller, HotelRating, Review, ReviewCreate, ReviewStatus};
use crate::hotel_actor::HotelError;
use crate::review_actor::{ReviewAction, ReviewError};

/// Client for guest reviews. Only guests with a confirmed or completed
/// stay may review a hotel, once.
#[derive(Clone)]
pub struct ReviewClient {
    inner: ResourceClient<Review>,
    hotels: HotelClient,
    bookings: BookingClient,
}

impl_client_methods!(ReviewClient, Review, ReviewError, review);

impl ReviewClient {
    pub fn new(inner: ResourceClient<Review>, hotels: HotelClient, bookings: BookingClient) -> Self {
        Self { inner, hotels, bookings }
    }

    #[instrument(skip(self, comment))]
    pub async fn create_review(
        &self,
        caller: &Caller,
        hotel_id: String,
        rating: u8,
        comment: String,
    ) -> Result<Review, ReviewError> {
        info!("Processing create_review request (Client Side)");
        self.hotels.require_hotel(hotel_id.clone()).await.map_err(|e| match e {
            HotelError::NotFound(id) => ReviewError::HotelNotFound(id),
            other => ReviewError::ActorCommunicationError(other.to_string()),
        })?;

        let stayed = self
            .bookings
            .has_stayed(caller.user_id.clone(), hotel_id.clone())
            .await
            .map_err(|e| ReviewError::ActorCommunicationError(e.to_string()))?;
        if !stayed {
            return Err(ReviewError::NotEligible(format!(
                "{} has no confirmed stay at {}",
                caller.user_id, hotel_id
            )));
        }

        let review = self
            .inner
            .create(ReviewCreate {
                user_id: caller.user_id.clone(),
                hotel_id,
                rating,
                comment,
            })
            .await?;
        info!(review_id = %review.id, rating, "Review submitted for moderation");
        Ok(review)
    }

    #[instrument(skip(self))]
    pub async fn moderate(&self, caller: &Caller, id: String, status: ReviewStatus) -> Result<Review, ReviewError> {
        debug!("Sending request");
        if !caller.is_admin() {
            return Err(ReviewError::Forbidden("only admins moderate reviews".to_string()));
        }
        let review = self.inner.perform_action(id, ReviewAction::Moderate(status)).await?;
        info!(review_id = %review.id, status = ?review.status, "Review moderated");
        Ok(review)
    }

    /// Approved reviews of a hotel, newest first.
    #[instrument(skip(self))]
    pub async fn for_hotel(&self, hotel_id: String) -> Result<Vec<Review>, ReviewError> {
        let mut reviews = self
            .inner
            .list_where(move |r| r.hotel_id == hotel_id && r.status == ReviewStatus::Approved)
            .await?;
        reviews.reverse();
        Ok(reviews)
    }

    #[instrument(skip(self))]
    pub async fn rating(&self, hotel_id: String) -> Result<HotelRating, ReviewError> {
        let lookup = hotel_id.clone();
        let reviews = self.inner.list_where(move |r| r.hotel_id == lookup).await?;
        Ok(HotelRating::from_reviews(&hotel_id, &reviews))
    }

    #[instrument(skip(self))]
    pub async fn pending(&self, caller: &Caller) -> Result<Vec<Review>, ReviewError> {
        if !caller.is_admin() {
            return Err(ReviewError::Forbidden("only admins see the moderation queue".to_string()));
        }
        Ok(self.inner.list_where(|r| r.status == ReviewStatus::Pending).await?)
    }
}
