use serde::Serialize;

// Theatre area as listed by the TheatreAreas feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TheatreArea {
    pub id: String,
    pub name: String,
}

// Film-level record, only used to look up a synopsis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: String,
    pub synopsis: String,
}

// One scheduled screening. Fields stay as feed strings until displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Show {
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub theatre: String,
    pub date_time: String,
    pub start_time: String,
    pub genres: String, // comma separated, e.g. "Komedia, Draama"
    pub length_minutes: String,
    pub image_url: String,
}

impl Show {
    // Lowercased, trimmed genre tokens
    pub fn genre_tokens(&self) -> impl Iterator<Item = String> + '_ {
        self.genres
            .split(',')
            .map(|token| token.trim().to_lowercase())
            .filter(|token| !token.is_empty())
    }
}

// A filtered show as displayed, with the synopsis of its event if known
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    #[serde(flatten)]
    pub show: Show,
    pub synopsis: Option<String>,
}

impl Listing {
    pub fn new(show: Show, events: &[Event]) -> Self {
        let synopsis = events
            .iter()
            .find(|event| event.id == show.event_id)
            .map(|event| event.synopsis.clone())
            .filter(|synopsis| !synopsis.is_empty());
        Self { show, synopsis }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub id: u32,
    pub genre: &'static str,
}

// Hand-authored genre table. The feed has no genre ids, so these labels are
// matched against the free-text Genres field.
pub const GENRES: &[Genre] = &[
    Genre { id: 1, genre: "Komedia" },
    Genre { id: 2, genre: "Draama" },
    Genre { id: 3, genre: "Sci-fi" },
    Genre { id: 4, genre: "Kauhu" },
    Genre { id: 5, genre: "Toiminta" },
    Genre { id: 6, genre: "Animaatio" },
    Genre { id: 7, genre: "Jännitys" },
    Genre { id: 8, genre: "Fantasia" },
    Genre { id: 9, genre: "Seikkailu" },
    Genre { id: 10, genre: "Romantiikka" },
    Genre { id: 11, genre: "Dokumentti" },
    Genre { id: 12, genre: "Perhe" },
    Genre { id: 13, genre: "Rikos" },
    Genre { id: 14, genre: "Musikaali" },
];

pub fn genre_by_id(id: u32) -> Option<&'static Genre> {
    GENRES.iter().find(|genre| genre.id == id)
}
