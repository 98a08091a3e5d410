use crate::domain::HotelStatus;

#[derive(Debug, Clone)]
pub enum HotelAction {
    /// Approve, suspend or return a listing to review.
    SetStatus(HotelStatus),
}
