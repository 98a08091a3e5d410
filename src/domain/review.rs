use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

/// A guest's rating of a hotel. Hidden from the public until approved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub hotel_id: String,
    pub rating: u8,
    pub comment: String,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ReviewCreate {
    pub user_id: String,
    pub hotel_id: String,
    pub rating: u8,
    pub comment: String,
}

/// Aggregate of approved reviews for one hotel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelRating {
    pub hotel_id: String,
    /// Mean rating rounded to one decimal, `None` without approved reviews.
    pub average: Option<f64>,
    pub count: usize,
}

impl HotelRating {
    pub fn from_reviews<'a>(hotel_id: &str, reviews: impl IntoIterator<Item = &'a Review>) -> Self {
        let (sum, count) = reviews
            .into_iter()
            .filter(|r| r.hotel_id == hotel_id && r.status == ReviewStatus::Approved)
            .fold((0u32, 0usize), |(sum, count), r| (sum + u32::from(r.rating), count + 1));
        let average = (count > 0).then(|| (f64::from(sum) / count as f64 * 10.0).round() / 10.0);
        Self {
            hotel_id: hotel_id.to_string(),
            average,
            count,
        }
    }
}
