use std::ffi::OsString;

use chrono::NaiveDate;
pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Search cinema showtimes from the public XML feed", long_about = None)]
struct ClapArgs {
    /// Free-text title search, case-insensitive
    #[clap(short = 'q', long, default_value = "", help = "title search text")]
    query: String,

    /// Theatre area id, see --list-areas. Omit for all areas.
    #[clap(short = 'a', long, help = "theatre area id")]
    area: Option<String>,

    /// Genre id, see --list-genres. Repeat to select several; giving the
    /// same id twice deselects it.
    #[clap(short = 'g', long = "genre", help = "genre id (repeatable)")]
    genres: Vec<u32>,

    #[clap(short = 'd', long, value_parser = parse_date, help = "show date (YYYY-MM-DD)")]
    date: Option<NaiveDate>,

    #[clap(long, help = "feed base URL, overrides FEED_BASE_URL")]
    base_url: Option<String>,

    #[clap(long, help = "list selectable theatre areas and exit")]
    list_areas: bool,

    #[clap(long, help = "list genre ids and exit")]
    list_genres: bool,

    #[clap(long, help = "print results as JSON")]
    json: bool,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("invalid date {value}: {e}"))
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    query: String,
    area: Option<String>,
    genres: Vec<u32>,
    date: Option<NaiveDate>,
    base_url: Option<String>,
    list_areas: bool,
    list_genres: bool,
    json: bool,
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            query: args.query,
            area: args.area,
            genres: args.genres,
            date: args.date,
            base_url: args.base_url,
            list_areas: args.list_areas,
            list_genres: args.list_genres,
            json: args.json,
        }
    }
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        ClapArgs::parse().into()
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::parse_from(itr).into()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn area(&self) -> Option<&String> {
        self.area.as_ref()
    }

    pub fn genres(&self) -> &[u32] {
        &self.genres
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn base_url(&self) -> Option<&String> {
        self.base_url.as_ref()
    }

    pub fn list_areas(&self) -> bool {
        self.list_areas
    }

    pub fn list_genres(&self) -> bool {
        self.list_genres
    }

    pub fn json(&self) -> bool {
        self.json
    }
}
