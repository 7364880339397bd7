// Plain-text rendering of the session for the terminal
use crate::controller::{SessionContext, View};
use crate::format::{format_date, format_start_time};
use crate::models::{Listing, GENRES};

pub const LOADING_TEXT: &str = "Haetaan näytöksiä...";
pub const NO_RESULTS_TEXT: &str = "Hakuehdoilla ei löytynyt näytöksiä.";
pub const ALL_AREAS_TEXT: &str = "Kaikki alueet";

pub fn render_listing(listing: &Listing) -> String {
    let show = &listing.show;
    let mut out = String::new();

    out.push_str(&format!("{}\n", show.title));
    out.push_str(&format!("  {}\n", format_date(&show.date_time)));
    out.push_str(&format!("  Kesto: {} min\n", show.length_minutes));
    out.push_str(&format!("  klo: {}\n", format_start_time(&show.start_time)));
    out.push_str(&format!("  Teatteri: {}\n", show.theatre));
    if !show.genres.is_empty() {
        out.push_str(&format!("  Lajityyppi: {}\n", show.genres));
    }
    if !show.image_url.is_empty() {
        out.push_str(&format!("  Kuva: {}\n", show.image_url));
    }
    if let Some(synopsis) = &listing.synopsis {
        out.push_str(&format!("  {}\n", synopsis));
    }
    out
}

pub fn render_view(session: &SessionContext) -> String {
    match session.view() {
        View::Unsubmitted => String::new(),
        View::Loading => format!("{LOADING_TEXT}\n"),
        View::NoResults => format!("{NO_RESULTS_TEXT}\n"),
        View::Results(listings) => listings
            .iter()
            .map(render_listing)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

// Header naming the searched area. Without a selection the feed's own
// placeholder name is used when areas have loaded.
pub fn render_selection(session: &SessionContext) -> String {
    let name = match &session.form().theatre {
        Some(id) => session.theatre_name(id).unwrap_or(id.as_str()),
        None => session
            .theatres()
            .first()
            .map(|area| area.name.as_str())
            .unwrap_or(ALL_AREAS_TEXT),
    };
    format!("Alue: {name}\n")
}

pub fn render_theatres(session: &SessionContext) -> String {
    session
        .selectable_theatres()
        .iter()
        .map(|area| format!("{:>6}  {}\n", area.id, area.name))
        .collect()
}

pub fn render_genres() -> String {
    GENRES
        .iter()
        .map(|genre| format!("{:>3}  {}\n", genre.id, genre.genre))
        .collect()
}
