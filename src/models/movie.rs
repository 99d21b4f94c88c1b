use crate::error::BookingError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: Option<i64>,
    pub name: String,
    pub seats: u32,
}

impl Movie {
    pub fn new(name: &str, seats: u32) -> Result<Self, BookingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BookingError::InvalidMovie("name must not be empty".into()));
        }
        if seats == 0 {
            return Err(BookingError::InvalidMovie(format!(
                "'{name}' needs at least one seat"
            )));
        }
        Ok(Self {
            id: None,
            name: name.to_string(),
            seats,
        })
    }

    /// Find a movie by ID in a slice.
    pub fn find_by_id(movies: &[Movie], id: i64) -> Option<&Movie> {
        movies.iter().find(|m| m.id == Some(id))
    }
}

impl std::fmt::Display for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
