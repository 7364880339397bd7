use anyhow::Result;
use showtime_search::cmd_args::CommandLineArgs;
use showtime_search::render::{render_genres, render_selection, render_theatres, render_view};
use showtime_search::{FeedClient, FeedConfig, SearchController};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr, results to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "showtime_search=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CommandLineArgs::parse();

    if args.list_genres() {
        print!("{}", render_genres());
        return Ok(());
    }

    let config = match args.base_url() {
        Some(url) => FeedConfig::default().with_base_url(url.as_str()),
        None => FeedConfig::from_env(),
    };
    let controller = SearchController::new(FeedClient::new(config)?);

    // A broken areas or events feed must not stop the schedule search
    if let Err(e) = controller.mount().await {
        tracing::warn!(error = %e, "continuing without a complete mount");
    }

    if args.list_areas() {
        print!("{}", render_theatres(&controller.session()));
        return Ok(());
    }

    controller.set_query(args.query());
    controller.select_theatre(args.area().cloned());
    controller.set_date(args.date());
    for genre_id in args.genres() {
        controller.toggle_genre(*genre_id);
    }

    controller.submit().await?;

    let session = controller.session();
    if args.json() {
        println!("{}", serde_json::to_string_pretty(session.results())?);
    } else {
        print!("{}", render_selection(&session));
        print!("{}", render_view(&session));
    }
    Ok(())
}
