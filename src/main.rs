use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use cinelist::catalog::links::{default_poster_url, detail_route, poster_url};
use cinelist::catalog::{
    FeedQuery, FetchOutcome, FilterSelection, InfiniteFeed, PlayTarget, PosterSize,
};
use cinelist::favorites::storage::JsonFileStore;
use cinelist::ledger::{Ledger, SubmitOutcome};
use cinelist::tmdb::{genre_names, CatalogItem, MediaType, TmdbClient};
use cinelist::{AppConfig, AppError, FavoriteItem, FavoritesStore};

#[derive(Parser)]
#[command(name = "cinelist", version, about = "Browse TMDB and keep a list of titles to watch")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Page through a listing
    Browse {
        #[arg(value_enum)]
        feed: Listing,
        #[command(flatten)]
        args: ListingArgs,
    },
    /// Search movies and series
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show a movie and its player link
    Movie { id: u64 },
    /// Show a series, its seasons and a player link
    Series {
        id: u64,
        #[arg(long)]
        season: Option<u32>,
        #[arg(long)]
        episode: Option<u32>,
    },
    /// List genres usable with --genre
    Genres {
        #[arg(default_value = "movie")]
        media: MediaType,
    },
    /// Show or edit My List
    List {
        #[command(subcommand)]
        action: Option<ListAction>,
    },
    /// Interactive block ledger demo
    Ledger,
}

#[derive(Clone, Copy, ValueEnum)]
enum Listing {
    Home,
    Movies,
    Series,
    Trending,
}

#[derive(Args)]
struct ListingArgs {
    #[arg(long, default_value_t = 1)]
    pages: u32,
    /// Genre id (see `cinelist genres`)
    #[arg(long)]
    genre: Option<String>,
    /// Sort key, e.g. vote_average.desc
    #[arg(long)]
    sort: Option<String>,
}

#[derive(Subcommand)]
enum ListAction {
    Add {
        id: u64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        poster: Option<String>,
        /// Save as a series instead of a movie
        #[arg(long)]
        tv: bool,
    },
    Remove {
        id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    log::debug!("Data directory: {:?}", config.data_dir());

    match cli.command {
        Command::Browse { feed, args } => {
            let mut selection = FilterSelection::new(args.sort.clone());
            if let Some(genre) = &args.genre {
                selection.select_genre(genre);
            }
            let query = match feed {
                Listing::Home => FeedQuery::Home,
                Listing::Movies => FeedQuery::Movies(selection.to_filters()),
                Listing::Series => FeedQuery::Series(selection.to_filters()),
                Listing::Trending => FeedQuery::Trending,
            };
            if selection.has_active() {
                println!("Filters: {}", selection.summary());
            }
            browse(&config, query, args.pages).await
        }
        Command::Search { query, pages } => browse(&config, FeedQuery::Search(query), pages).await,
        Command::Movie { id } => show_movie(&config, id).await,
        Command::Series { id, season, episode } => {
            show_series(&config, id, season, episode).await
        }
        Command::Genres { media } => {
            let client = connect(&config)?;
            for genre in client.genres(media).await? {
                println!("{:>6}  {}", genre.id, genre.name);
            }
            Ok(())
        }
        Command::List { action } => edit_list(&config, action),
        Command::Ledger => run_ledger(),
    }
}

fn connect(config: &AppConfig) -> Result<TmdbClient, AppError> {
    Ok(TmdbClient::new(&config.tmdb())?)
}

fn open_favorites(config: &AppConfig) -> Result<FavoritesStore> {
    let backend = Arc::new(JsonFileStore::new(config.data_dir()));
    Ok(FavoritesStore::load(backend)?)
}

fn print_item(item: &CatalogItem, favorites: &FavoritesStore) {
    let saved = if favorites.contains(item.id) { "+" } else { " " };
    let kind = item.media().map(|m| m.as_str()).unwrap_or("-");
    let year = item.year().unwrap_or("----");
    let rating = item
        .vote_average
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{} {:>8}  {:<5} {}  {:>4}  {}",
        saved,
        item.id,
        kind,
        year,
        rating,
        item.display_title()
    );
}

async fn browse(config: &AppConfig, query: FeedQuery, pages: u32) -> Result<()> {
    let client = connect(config)?;
    let favorites = open_favorites(config)?;
    let feed = InfiniteFeed::new(Arc::new(client), query, config.page_cap);

    for _ in 0..pages.max(1) {
        match feed.fetch_next().await {
            Ok(FetchOutcome::Loaded { page, added }) => {
                log::debug!("Page {} added {} titles", page, added)
            }
            Ok(FetchOutcome::Exhausted) => break,
            Ok(other) => log::debug!("Fetch skipped: {:?}", other),
            Err(e) => {
                eprintln!("Could not load listing: {:#}", e);
                break;
            }
        }
    }

    if let Some(headline) = feed.headline() {
        println!("== {} ==", headline.display_title());
        if let Some(overview) = headline.overview.as_deref().filter(|o| !o.is_empty()) {
            println!("{}", overview);
        }
        if let Some(path) = &headline.poster_path {
            println!("{}", poster_url(&config.image_base_url, path, PosterSize::Original));
        }
        println!();
    }

    let items = feed.items();
    if items.is_empty() {
        println!("Nothing to show.");
    }
    for item in &items {
        print_item(item, &favorites);
    }
    if feed.has_next() {
        println!("(more available, pass --pages {})", feed.pages_loaded() + 1);
    }
    Ok(())
}

async fn show_movie(config: &AppConfig, id: u64) -> Result<()> {
    let client = connect(config)?;
    let movie = match client.movie(id).await.map_err(AppError::from) {
        Ok(movie) => movie,
        Err(AppError::NotFound(_)) => {
            println!("Movie {} not found.", id);
            return Ok(());
        }
        Err(e) => return Err(e).context("fetching movie"),
    };
    let favorites = open_favorites(config)?;

    println!("== {} ==", movie.title);
    let year = movie.release_date.as_deref().and_then(|d| d.get(..4));
    println!(
        "{}  |  {:.1}  |  {}",
        year.unwrap_or("----"),
        movie.vote_average,
        genre_names(&movie.genres)
    );
    if !movie.overview.is_empty() {
        println!("{}", movie.overview);
    }
    if let Some(path) = &movie.poster_path {
        println!("Poster: {}", poster_url(&config.image_base_url, path, PosterSize::Original));
    }
    println!(
        "Play:   {}",
        PlayTarget::Movie { id }.player_url(&config.player_base_url)
    );
    println!(
        "{}",
        if favorites.contains(id) { "In My List" } else { "Not in My List" }
    );
    Ok(())
}

async fn show_series(
    config: &AppConfig,
    id: u64,
    season: Option<u32>,
    episode: Option<u32>,
) -> Result<()> {
    let client = connect(config)?;
    let series = match client.series(id).await.map_err(AppError::from) {
        Ok(series) => series,
        Err(AppError::NotFound(_)) => {
            println!("Series {} not found.", id);
            return Ok(());
        }
        Err(e) => return Err(e).context("fetching series"),
    };
    let favorites = open_favorites(config)?;
    let seasons = client.seasons(&series).await;

    println!("== {} ==", series.name);
    let year = series.first_air_date.as_deref().and_then(|d| d.get(..4));
    println!(
        "{}  |  {:.1}  |  {}",
        year.unwrap_or("----"),
        series.vote_average,
        genre_names(&series.genres)
    );
    if !series.overview.is_empty() {
        println!("{}", series.overview);
    }

    for s in &seasons {
        println!("\n{} ({} episodes)", s.name, s.episodes.len());
        for ep in &s.episodes {
            println!("  {:>2}. {}", ep.episode_number, ep.name);
        }
    }

    let target = PlayTarget::series(
        id,
        season,
        episode,
        seasons.first().map(|s| s.season_number),
    );
    println!("\nPlay:   {}", target.player_url(&config.player_base_url));
    println!(
        "{}",
        if favorites.contains(id) { "In My List" } else { "Not in My List" }
    );
    Ok(())
}

fn edit_list(config: &AppConfig, action: Option<ListAction>) -> Result<()> {
    let favorites = open_favorites(config)?;

    match action {
        None => {
            if favorites.is_empty() {
                println!("No movies in your list");
            }
            for item in favorites.items().iter() {
                let poster = item
                    .poster_path
                    .as_deref()
                    .map(|p| default_poster_url(p, PosterSize::Card))
                    .unwrap_or_default();
                println!(
                    "{:>8}  {:<28}  {:<14}  {}",
                    item.id,
                    item.title,
                    detail_route(item.media(), item.id),
                    poster
                );
            }
        }
        Some(ListAction::Add {
            id,
            title,
            poster,
            tv,
        }) => {
            let mut item = FavoriteItem::new(id, title);
            if let Some(poster) = poster {
                item = item.with_poster(poster);
            }
            if tv {
                item = item.with_media(MediaType::Tv);
            }
            println!("{}", favorites.add(item)?);
        }
        Some(ListAction::Remove { id }) => {
            println!("{}", favorites.remove(id)?);
        }
    }
    Ok(())
}

fn run_ledger() -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut ledger = Ledger::new();

    println!("Enter block data (Ctrl-D to quit).");
    loop {
        print!("data> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let data = line?;

        let mut ask = |prompt: &str| -> bool {
            print!("{} [y/N] ", prompt);
            let _ = io::stdout().flush();
            matches!(
                lines.next().and_then(|l| l.ok()).as_deref().map(str::trim),
                Some("y") | Some("Y") | Some("yes")
            )
        };

        match ledger.submit(&data, &mut ask) {
            SubmitOutcome::Appended(_) => print!("{}", ledger.render()),
            SubmitOutcome::Rejected(notice) => println!("{}", notice),
            SubmitOutcome::Declined => {}
        }
    }
    Ok(())
}
