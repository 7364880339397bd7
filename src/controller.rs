// Search controller and the session state it owns. The controller is the
// only writer of SessionContext; views read it through session().

use std::collections::BTreeSet;

use chrono::NaiveDate;
use parking_lot::{RwLock, RwLockReadGuard};
use tracing::{error, info};

use crate::error::FeedError;
use crate::feed::{FeedSource, ScheduleQuery};
use crate::filter::filter_shows;
use crate::models::{Event, Listing, Show, TheatreArea};
use crate::xml::{parse_events, parse_schedule, parse_theatre_areas};

// Form inputs captured at submission time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchForm {
    pub query: String,
    pub theatre: Option<String>,
    pub genre_ids: BTreeSet<u32>,
    pub date: Option<NaiveDate>,
}

impl SearchForm {
    pub fn schedule_query(&self) -> ScheduleQuery {
        ScheduleQuery::new(self.theatre.clone().unwrap_or_default()).with_date(self.date)
    }

    pub fn genre_list(&self) -> Vec<u32> {
        self.genre_ids.iter().copied().collect()
    }
}

// What the result area should display
#[derive(Debug, PartialEq)]
pub enum View<'a> {
    Unsubmitted,
    Loading,
    NoResults,
    Results(&'a [Listing]),
}

#[derive(Debug, Default)]
pub struct SessionContext {
    theatres: Vec<TheatreArea>,
    events: Vec<Event>,
    form: SearchForm,
    shows: Vec<Show>,
    results: Vec<Listing>,
    submitted: bool,
    in_flight: usize,
}

impl SessionContext {
    pub fn theatres(&self) -> &[TheatreArea] {
        &self.theatres
    }

    // The first area is the feed's "all areas" placeholder
    pub fn selectable_theatres(&self) -> &[TheatreArea] {
        self.theatres.get(1..).unwrap_or(&[])
    }

    pub fn theatre_name(&self, id: &str) -> Option<&str> {
        self.theatres
            .iter()
            .find(|area| area.id == id)
            .map(|area| area.name.as_str())
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    // Unfiltered shows from the last schedule response
    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    pub fn results(&self) -> &[Listing] {
        &self.results
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn view(&self) -> View<'_> {
        if !self.submitted {
            View::Unsubmitted
        } else if self.is_loading() {
            View::Loading
        } else if self.results.is_empty() {
            View::NoResults
        } else {
            View::Results(&self.results)
        }
    }
}

pub struct SearchController<F: FeedSource> {
    feed: F,
    session: RwLock<SessionContext>,
}

impl<F: FeedSource> SearchController<F> {
    pub fn new(feed: F) -> Self {
        Self {
            feed,
            session: RwLock::new(SessionContext::default()),
        }
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    // Read access for views. Do not hold the guard across an await.
    pub fn session(&self) -> RwLockReadGuard<'_, SessionContext> {
        self.session.read()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.session.write().form.query = query.into();
    }

    pub fn select_theatre(&self, theatre: Option<String>) {
        self.session.write().form.theatre = theatre.filter(|id| !id.is_empty());
    }

    pub fn set_date(&self, date: Option<NaiveDate>) {
        self.session.write().form.date = date;
    }

    // Adds the genre to the selection, or removes it if already selected.
    pub fn toggle_genre(&self, genre_id: u32) {
        let mut session = self.session.write();
        if !session.form.genre_ids.remove(&genre_id) {
            session.form.genre_ids.insert(genre_id);
        }
    }

    // Loads theatre areas and events concurrently.
    // Network failures are logged and leave the list empty. A normalization
    // failure is returned once both feeds have settled; it never keeps the
    // other feed from being stored.
    pub async fn mount(&self) -> Result<(), FeedError> {
        let (areas, events) = futures::join!(self.load_areas(), self.load_events());
        areas?;
        events?;
        Ok(())
    }

    async fn load_areas(&self) -> Result<(), FeedError> {
        let xml = match self.feed.fetch_areas().await {
            Ok(xml) => xml,
            Err(e) if e.is_network() => {
                error!(error = %e, "Error fetching theatres");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let areas = parse_theatre_areas(&xml).map_err(|e| {
            error!(error = %e, "Error normalizing theatres");
            e
        })?;
        info!(count = areas.len(), "theatre areas loaded");
        self.session.write().theatres = areas;
        Ok(())
    }

    async fn load_events(&self) -> Result<(), FeedError> {
        let xml = match self.feed.fetch_events().await {
            Ok(xml) => xml,
            Err(e) if e.is_network() => {
                error!(error = %e, "Error fetching events");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let events = parse_events(&xml).map_err(|e| {
            error!(error = %e, "Error normalizing events");
            e
        })?;
        info!(count = events.len(), "events loaded");
        self.session.write().events = events;
        Ok(())
    }

    // Submits the form as currently filled in.
    pub async fn submit(&self) -> Result<usize, FeedError> {
        let form = self.session.read().form.clone();
        self.submit_search(form).await
    }

    // Fetches the schedule for the form's theatre and replaces the result
    // list with the filtered shows. Returns the number of listings.
    // Overlapping submissions are not serialized: whichever response arrives
    // last overwrites the results.
    pub async fn submit_search(&self, form: SearchForm) -> Result<usize, FeedError> {
        {
            let mut session = self.session.write();
            session.submitted = true;
            session.in_flight += 1;
        }

        let query = form.schedule_query();
        let outcome = match self.feed.fetch_schedule(&query).await {
            Ok(xml) => parse_schedule(&xml),
            Err(e) => Err(e),
        };

        let mut session = self.session.write();
        session.in_flight = session.in_flight.saturating_sub(1);

        match outcome {
            Ok(shows) => {
                let filtered = filter_shows(&shows, &form.query, &form.genre_list());
                let results: Vec<Listing> = filtered
                    .into_iter()
                    .map(|show| Listing::new(show, &session.events))
                    .collect();
                info!(
                    area = %query.area,
                    fetched = shows.len(),
                    matched = results.len(),
                    "schedule search finished"
                );
                let count = results.len();
                session.shows = shows;
                session.results = results;
                Ok(count)
            }
            Err(e) if e.is_network() => {
                error!(error = %e, "Error fetching shows");
                session.shows.clear();
                session.results.clear();
                Ok(0)
            }
            Err(e) => {
                error!(error = %e, "Error normalizing shows");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::mock_feed::MockFeed;
    use std::time::Duration;

    const AREAS_XML: &str = r#"<TheatreAreas>
        <TheatreArea><ID>1029</ID><Name>Valitse alue/teatteri</Name></TheatreArea>
        <TheatreArea><ID>1014</ID><Name>Pääkaupunkiseutu</Name></TheatreArea>
        <TheatreArea><ID>1018</ID><Name>Oulu: PLAZA</Name></TheatreArea>
    </TheatreAreas>"#;

    const EVENTS_XML: &str = r#"<Events>
        <Event><ID>300</ID><ShortSynopsis>Kaksi ystävää nauraa.</ShortSynopsis></Event>
        <Event><ID>301</ID><ShortSynopsis>Avaruus on suuri.</ShortSynopsis></Event>
    </Events>"#;

    fn show_xml(id: &str, event_id: &str, title: &str, genres: &str) -> String {
        format!(
            "<Show><ID>{id}</ID><dtAccounting>2024-05-01T00:00:00</dtAccounting>\
             <dttmShowStart>2024-05-01T18:30:00</dttmShowStart><EventID>{event_id}</EventID>\
             <Title>{title}</Title><LengthInMinutes>100</LengthInMinutes>\
             <Theatre>Tennispalatsi, Helsinki</Theatre><Genres>{genres}</Genres></Show>"
        )
    }

    fn schedule_xml(shows: &[String]) -> String {
        format!("<Schedule><Shows>{}</Shows></Schedule>", shows.concat())
    }

    fn all_areas_schedule() -> String {
        schedule_xml(&[
            show_xml("1", "300", "Naurun tasapaino", "Komedia, Draama"),
            show_xml("2", "301", "Tähtien takaa", "Sci-fi, Toiminta"),
            show_xml("3", "302", "Hiljainen talo", "Kauhu"),
        ])
    }

    fn listing_ids(session: &SessionContext) -> Vec<String> {
        session
            .results()
            .iter()
            .map(|l| l.show.id.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_mount_populates_areas_and_events() {
        let feed = MockFeed::new()
            .with_areas(AREAS_XML)
            .with_events(EVENTS_XML);
        let controller = SearchController::new(feed);

        controller.mount().await.unwrap();

        let session = controller.session();
        assert_eq!(session.theatres().len(), 3);
        assert_eq!(session.events().len(), 2);
        let selectable: Vec<&str> = session
            .selectable_theatres()
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(selectable, vec!["1014", "1018"]);
        assert_eq!(session.theatre_name("1018"), Some("Oulu: PLAZA"));
    }

    #[tokio::test]
    async fn test_events_failure_does_not_block_areas_or_search() {
        let feed = MockFeed::new()
            .with_areas(AREAS_XML)
            .with_schedule("", &all_areas_schedule());
        let controller = SearchController::new(feed);

        assert!(controller.mount().await.is_ok());
        {
            let session = controller.session();
            assert_eq!(session.selectable_theatres().len(), 2);
            assert!(session.events().is_empty());
        }

        let count = controller.submit().await.unwrap();
        assert_eq!(count, 3);
        let session = controller.session();
        assert!(session.results().iter().all(|l| l.synopsis.is_none()));
    }

    #[tokio::test]
    async fn test_malformed_areas_still_store_events() {
        let feed = MockFeed::new()
            .with_areas("<TheatreAreas><TheatreArea><ID>1</ID></TheatreArea></TheatreAreas>")
            .with_events(EVENTS_XML);
        let controller = SearchController::new(feed);

        let result = controller.mount().await;
        assert!(matches!(
            result,
            Err(FeedError::MissingRequiredField { .. })
        ));
        let session = controller.session();
        assert!(session.theatres().is_empty());
        assert_eq!(session.events().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_without_theatre_returns_all_shows() {
        let feed = MockFeed::new()
            .with_areas(AREAS_XML)
            .with_events(EVENTS_XML)
            .with_schedule("", &all_areas_schedule());
        let controller = SearchController::new(feed);
        controller.mount().await.unwrap();

        assert_eq!(controller.session().view(), View::Unsubmitted);

        controller.submit().await.unwrap();

        let queries = controller.feed().schedule_queries();
        assert_eq!(queries, vec![ScheduleQuery::new("")]);

        let session = controller.session();
        assert_eq!(listing_ids(&session), vec!["1", "2", "3"]);
        assert_eq!(
            session.results()[0].synopsis.as_deref(),
            Some("Kaksi ystävää nauraa.")
        );
        assert_eq!(session.results()[2].synopsis, None);
        assert!(matches!(session.view(), View::Results(r) if r.len() == 3));
    }

    #[tokio::test]
    async fn test_submit_uses_selected_theatre_and_date() {
        let feed = MockFeed::new().with_schedule("1018", &all_areas_schedule());
        let controller = SearchController::new(feed);

        let date = NaiveDate::from_ymd_opt(2024, 5, 1);
        controller.select_theatre(Some("1018".to_string()));
        controller.set_date(date);
        controller.submit().await.unwrap();

        let queries = controller.feed().schedule_queries();
        assert_eq!(queries, vec![ScheduleQuery::new("1018").with_date(date)]);
    }

    #[tokio::test]
    async fn test_second_submit_replaces_results() {
        let feed = MockFeed::new().with_schedule("", &all_areas_schedule());
        let controller = SearchController::new(feed);

        controller.set_query("naurun");
        controller.submit().await.unwrap();
        assert_eq!(listing_ids(&controller.session()), vec!["1"]);

        controller.set_query("talo");
        controller.submit().await.unwrap();
        assert_eq!(listing_ids(&controller.session()), vec!["3"]);
    }

    #[tokio::test]
    async fn test_genre_selection_filters_results() {
        let feed = MockFeed::new().with_schedule("", &all_areas_schedule());
        let controller = SearchController::new(feed);

        controller.toggle_genre(1); // Komedia
        controller.toggle_genre(3); // Sci-fi
        controller.submit().await.unwrap();

        assert_eq!(listing_ids(&controller.session()), vec!["1", "2"]);
    }

    #[test]
    fn test_toggle_genre_twice_restores_selection() {
        let controller = SearchController::new(MockFeed::new());
        controller.toggle_genre(2);
        let before = controller.session().form().genre_ids.clone();

        controller.toggle_genre(7);
        controller.toggle_genre(7);
        assert_eq!(controller.session().form().genre_ids, before);

        controller.toggle_genre(2);
        assert!(controller.session().form().genre_ids.is_empty());
    }

    #[tokio::test]
    async fn test_no_results_view_is_distinct_from_unsubmitted() {
        let feed = MockFeed::new().with_schedule("", &all_areas_schedule());
        let controller = SearchController::new(feed);

        controller.set_query("ei tällaista elokuvaa");
        let count = controller.submit().await.unwrap();

        assert_eq!(count, 0);
        let session = controller.session();
        assert!(session.is_submitted());
        assert_eq!(session.view(), View::NoResults);
        assert_eq!(session.shows().len(), 3);
    }

    #[tokio::test]
    async fn test_schedule_network_failure_empties_results() {
        let feed = MockFeed::new().with_schedule("", &all_areas_schedule());
        let controller = SearchController::new(feed);
        controller.submit().await.unwrap();
        assert_eq!(controller.session().results().len(), 3);

        // no schedule registered for this area, the mock answers 503
        controller.select_theatre(Some("9999".to_string()));
        let count = controller.submit().await.unwrap();

        assert_eq!(count, 0);
        let session = controller.session();
        assert_eq!(session.view(), View::NoResults);
        assert!(session.shows().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_schedule_propagates() {
        let broken = "<Schedule><Shows><Show><ID>1</ID></Show></Shows></Schedule>";
        let feed = MockFeed::new()
            .with_areas(AREAS_XML)
            .with_schedule("", broken);
        let controller = SearchController::new(feed);
        controller.mount().await.unwrap();

        let result = controller.submit().await;
        assert!(matches!(
            result,
            Err(FeedError::MissingRequiredField { .. })
        ));
        let session = controller.session();
        assert!(!session.is_loading());
        assert_eq!(session.theatres().len(), 3);
    }

    #[tokio::test]
    async fn test_loading_view_while_schedule_in_flight() {
        let feed = MockFeed::new()
            .with_schedule("", &all_areas_schedule())
            .with_schedule_delay("", Duration::from_millis(50));
        let controller = SearchController::new(feed);

        let (result, observed) = tokio::join!(controller.submit(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let session = controller.session();
            let loading = session.view() == View::Loading;
            loading
        });

        assert!(observed);
        assert_eq!(result.unwrap(), 3);
        assert!(matches!(controller.session().view(), View::Results(_)));
    }

    #[tokio::test]
    async fn test_overlapping_submissions_last_response_wins() {
        let slow = schedule_xml(&[show_xml("slow", "300", "Hidas", "Draama")]);
        let fast = schedule_xml(&[show_xml("fast", "301", "Nopea", "Draama")]);
        let feed = MockFeed::new()
            .with_schedule("1014", &slow)
            .with_schedule_delay("1014", Duration::from_millis(40))
            .with_schedule("1018", &fast);
        let controller = SearchController::new(feed);

        let first = SearchForm {
            theatre: Some("1014".to_string()),
            ..Default::default()
        };
        let second = SearchForm {
            theatre: Some("1018".to_string()),
            ..Default::default()
        };

        let (a, b) = tokio::join!(
            controller.submit_search(first),
            controller.submit_search(second)
        );
        assert_eq!(a.unwrap(), 1);
        assert_eq!(b.unwrap(), 1);

        // the earlier submission answered last and overwrote the later one
        assert_eq!(listing_ids(&controller.session()), vec!["slow"]);
        assert!(!controller.session().is_loading());
    }
}
