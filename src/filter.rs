// Show filtering by title text and genre selection
use crate::models::{genre_by_id, Show};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub query: String,
    pub genre_ids: Vec<u32>,
}

impl FilterCriteria {
    pub fn new(query: impl Into<String>, genre_ids: Vec<u32>) -> Self {
        Self {
            query: query.into(),
            genre_ids,
        }
    }

    pub fn matches(&self, show: &Show) -> bool {
        title_matches(show, &self.query) && genres_match(show, &self.genre_ids)
    }
}

// Case-insensitive substring match on the title. Empty query matches all.
pub fn title_matches(show: &Show, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    show.title.to_lowercase().contains(&query.to_lowercase())
}

// Any selected genre must appear as one of the show's genre tokens.
// Ids missing from the genre table never match.
pub fn genres_match(show: &Show, selected_genre_ids: &[u32]) -> bool {
    if selected_genre_ids.is_empty() {
        return true;
    }

    let wanted: Vec<String> = selected_genre_ids
        .iter()
        .filter_map(|id| genre_by_id(*id))
        .map(|genre| genre.genre.to_lowercase())
        .collect();

    show.genre_tokens().any(|token| wanted.contains(&token))
}

// Keeps shows matching both predicates, in feed order
pub fn filter_shows(shows: &[Show], query: &str, selected_genre_ids: &[u32]) -> Vec<Show> {
    let criteria = FilterCriteria::new(query, selected_genre_ids.to_vec());
    shows
        .iter()
        .filter(|show| criteria.matches(show))
        .cloned()
        .collect()
}
