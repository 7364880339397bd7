// Feed client: single-shot HTTP GETs against the showtime XML feed
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::format::format_query_date;

pub const THEATRE_AREAS_PATH: &str = "TheatreAreas/";
pub const EVENTS_PATH: &str = "Events/";
pub const SCHEDULE_PATH: &str = "Schedule";

// Schedule scope. An empty area means all areas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub area: String,
    pub date: Option<NaiveDate>,
}

impl ScheduleQuery {
    pub fn new(area: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            date: None,
        }
    }

    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("area", self.area.clone())];
        if let Some(date) = self.date {
            params.push(("dt", format_query_date(date)));
        }
        params
    }
}

// Source of raw feed documents
#[async_trait]
pub trait FeedSource: Send + Sync + 'static {
    async fn fetch_areas(&self) -> Result<String, FeedError>;

    async fn fetch_events(&self) -> Result<String, FeedError>;

    async fn fetch_schedule(&self, query: &ScheduleQuery) -> Result<String, FeedError>;
}

pub struct FeedClient {
    config: FeedConfig,
    http: reqwest::Client,
}

impl FeedClient {
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FeedError::ClientError(e.to_string()))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    async fn get_text(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<String, FeedError> {
        let url = self.config.endpoint(path);
        debug!(%url, ?params, "fetching feed");

        let response = self.http.get(&url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::StatusError {
                status_code: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch_areas(&self) -> Result<String, FeedError> {
        self.get_text(THEATRE_AREAS_PATH, &[]).await
    }

    async fn fetch_events(&self) -> Result<String, FeedError> {
        self.get_text(EVENTS_PATH, &[]).await
    }

    async fn fetch_schedule(&self, query: &ScheduleQuery) -> Result<String, FeedError> {
        self.get_text(SCHEDULE_PATH, &query.params()).await
    }
}
