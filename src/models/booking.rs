use crate::error::BookingError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: Option<i64>,
    pub movie_id: i64,
    /// Upper-case seat label, e.g. "A7".
    pub seat: String,
    pub user: String,
    pub created_at: String,
}

impl Booking {
    pub fn new(movie_id: i64, seat: &str, user: &str) -> Result<Self, BookingError> {
        let seat = normalize_seat(seat);
        if seat.is_empty() {
            return Err(BookingError::EmptySeat);
        }
        let user = user.trim();
        if user.is_empty() {
            return Err(BookingError::EmptyUser);
        }
        Ok(Self {
            id: None,
            movie_id,
            seat,
            user: user.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

pub fn normalize_seat(seat: &str) -> String {
    seat.trim().to_uppercase()
}
