//! The inference-side movie description.
//!
//! This is the shape a caller submits to get a prediction: a handful of
//! typed attributes rather than a raw CSV row. It doubles as the HTTP
//! request body and is echoed back verbatim in the response, so every
//! field is required and strictly typed; a request with `year` as a
//! string never reaches the model.

use dataset::TAG_SEPARATOR;
use serde::{Deserialize, Serialize};

/// A single movie as described by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieInput {
    pub title: String,
    pub year: i32,
    pub runtime: i64,
    pub tagline: String,
    pub description: String,
    /// Genre tags, comma-plus-space separated like the training data
    /// (`"Horror"` or `"Horror, Thriller"`)
    pub genre: String,
    pub revenue: f64,
    pub budget: f64,
    pub adult: bool,
}

impl MovieInput {
    /// Split the genre field the same way the training side splits its
    /// genre strings. Tags not in the model's vocabulary simply light up
    /// no indicator column.
    pub fn genre_tokens(&self) -> impl Iterator<Item = &str> {
        self.genre
            .split(TAG_SEPARATOR)
            .filter(|token| !token.is_empty())
    }
}
