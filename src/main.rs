//! # textmine
//!
//! Collects text for mining: news documents from NewsAPI and the NYT
//! article search, article bodies scraped from a dozen publishers, and
//! top-level comments from YouTube videos. Comment files can then be
//! cleaned with a configurable pipeline and summarized as n-gram tables.
//!
//! ## Usage
//!
//! ```sh
//! textmine comments keys/youtube.txt -C videos.csv -D out -m 500
//! textmine clean -I out -D cleaned -abplnw
//! textmine ngrams -d cleaned
//! textmine news headlines --newsapi-key-file keys/newsapi.txt --country us --scrape
//! ```
//!
//! ## Architecture
//!
//! Everything runs sequentially on a single-threaded runtime:
//! 1. **Collection**: API request builders ([`api`]) and per-publisher scrape
//!    adapters ([`scrapers`])
//! 2. **Comments**: paged comment download to one CSV per video ([`youtube`])
//! 3. **Cleaning**: flag-gated text steps over comment CSVs ([`clean`])
//! 4. **Output**: JSON documents and n-gram tables ([`outputs`])

use clap::Parser;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod clean;
mod cli;
mod config;
mod models;
mod outputs;
mod scrapers;
#[cfg(test)]
mod test_support;
mod utils;
mod youtube;

use api::{
    ApiGetRequest, ApiOutcome, NewsApiEverything, NewsApiHeadlines, NewsApiParser,
    NytArticleSearch, NytParser, Payload, YouTubeCommentThreads, read_api_key_from_file,
};
use cli::{
    CleanArgs, Cli, Command, CommentsArgs, NewsArgs, NewsEndpoint, NgramArgs, ScrapeArgs,
    SearchArgs,
};
use config::{Config, prefer_cli};
use models::Document;
use scrapers::Publisher;
use utils::{InputSource, ensure_writable_dir, truncate_for_log};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    if let Err(e) = run(args).await {
        error!(error = %e, "textmine failed");
        std::process::exit(1);
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), millis = elapsed.subsec_millis(), "Execution complete");
}

async fn run(args: Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::load(args.config.as_deref())?;
    match args.command {
        Command::Clean(clean_args) => run_clean(clean_args, &config),
        Command::Comments(comment_args) => run_comments(comment_args, &config).await,
        Command::News(news_args) => run_news(news_args, &config).await,
        Command::Scrape(scrape_args) => run_scrape(scrape_args).await,
        Command::Search(search_args) => run_search(search_args).await,
        Command::Ngrams(ngram_args) => run_ngrams(ngram_args).await,
    }
}

#[instrument(level = "info", skip_all)]
fn run_clean(args: CleanArgs, config: &Config) -> Result<(), Box<dyn Error>> {
    let input = InputSource::from_args(args.input_file.clone(), args.input_dir.clone())?;
    let options = args.options(config)?;
    let save_dir = config.save_dir(args.save_dir.clone());
    ensure_writable_dir(&save_dir)?;

    let written = clean::clean_comments(&input, &save_dir, &options)?;
    info!(files = written.len(), code = %options.process_code(), "Cleaning complete");
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn run_comments(args: CommentsArgs, config: &Config) -> Result<(), Box<dyn Error>> {
    let key_file = prefer_cli(args.api_key_file, &config.api_keys.youtube)
        .ok_or("a YouTube API key file is required (argument, YOUTUBE_API_KEY_FILE, or config)")?;
    let videos = youtube::resolve_videos(
        args.video_url.as_deref(),
        args.source_csv.as_deref(),
        args.song_name,
        args.artist,
        args.ids,
    )?;
    let save_dir = config.save_dir(args.save_dir);
    ensure_writable_dir(&save_dir)?;

    let mut request = YouTubeCommentThreads::new(read_api_key_from_file(&key_file)?);
    let written = youtube::scrape_youtube_comments(&mut request, &videos, &save_dir, args.max_comments).await?;
    info!(videos = videos.len(), files = written.len(), "Comment collection complete");
    Ok(())
}

fn key_for(cli: Option<PathBuf>, configured: &Option<PathBuf>, name: &str) -> Result<String, Box<dyn Error>> {
    let path = prefer_cli(cli, configured).ok_or_else(|| format!("a {name} API key file is required"))?;
    Ok(read_api_key_from_file(path)?)
}

async fn fetch_documents<R: ApiGetRequest>(request: &mut R) -> Result<Vec<Document>, Box<dyn Error>> {
    let outcome = request.get().await?;
    info!(
        url = %truncate_for_log(request.last_request().unwrap_or_default(), 200),
        success = outcome.is_success(),
        "News request finished"
    );
    match outcome {
        ApiOutcome::Success(Payload::Documents(documents)) => Ok(documents),
        ApiOutcome::Success(Payload::Json(_)) => Err("news request returned unparsed JSON".into()),
        ApiOutcome::Failure(failed) => {
            warn!(url = %failed.url, body = %truncate_for_log(&failed.body, 300), "News API error body");
            Err(format!("news request failed: {failed}").into())
        }
    }
}

#[instrument(level = "info", skip_all, fields(endpoint = ?args.endpoint))]
async fn run_news(args: NewsArgs, config: &Config) -> Result<(), Box<dyn Error>> {
    let mut documents = match args.endpoint {
        NewsEndpoint::Everything => {
            let key = key_for(args.newsapi_key_file.clone(), &config.api_keys.newsapi, "NewsAPI")?;
            let mut request = NewsApiEverything::new(key).with_parser(NewsApiParser);
            if let Some(q) = &args.query {
                request.q(q);
            }
            if let Some(fields) = &args.search_in {
                request.search_in(fields);
            }
            if let Some(sources) = &args.sources {
                request.sources(sources);
            }
            if let Some(domains) = &args.domains {
                request.domains(domains);
            }
            if let Some(domains) = &args.exclude_domains {
                request.exclude_domains(domains);
            }
            if let Some(from) = args.from {
                request.from_date(from);
            }
            if let Some(to) = args.to {
                request.to_date(to);
            }
            if let Some(language) = &args.language {
                request.language(language);
            }
            if let Some(sort) = &args.sort_by {
                request.sort_by(sort);
            }
            if let Some(size) = args.page_size {
                request.page_size(size);
            }
            if let Some(page) = args.page {
                request.page(page);
            }
            fetch_documents(&mut request).await?
        }
        NewsEndpoint::Headlines => {
            let key = key_for(args.newsapi_key_file.clone(), &config.api_keys.newsapi, "NewsAPI")?;
            let mut request = NewsApiHeadlines::new(key).with_parser(NewsApiParser);
            if let Some(country) = &args.country {
                request.country(country);
            }
            if let Some(category) = &args.category {
                request.category(category);
            }
            if let Some(sources) = &args.sources {
                request.sources(sources);
            }
            if let Some(q) = &args.query {
                request.q(q);
            }
            if let Some(size) = args.page_size {
                request.page_size(size);
            }
            if let Some(page) = args.page {
                request.page(page);
            }
            fetch_documents(&mut request).await?
        }
        NewsEndpoint::Nyt => {
            let key = key_for(args.nyt_key_file.clone(), &config.api_keys.nyt, "NYT")?;
            let mut request = NytArticleSearch::new(key).with_parser(NytParser);
            if let Some(q) = &args.query {
                request.q(q);
            }
            if let Some(from) = args.from {
                request.begin_date(from);
            }
            if let Some(to) = args.to {
                request.end_date(to);
            }
            if let Some(sort) = &args.sort_by {
                request.sort(sort);
            }
            if let Some(page) = args.page {
                request.page(page);
            }
            fetch_documents(&mut request).await?
        }
    };
    info!(count = documents.len(), "Received documents");

    if args.scrape {
        let filled = scrapers::fill_documents(&mut documents).await;
        info!(filled, total = documents.len(), "Scraped article content");
    }

    write_output(&documents, args.output.as_deref()).await
}

async fn write_output(documents: &[Document], output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => outputs::json::write_documents(documents, path).await,
        None => outputs::json::print_documents(documents),
    }
}

#[instrument(level = "info", skip_all, fields(url = %args.url))]
async fn run_scrape(args: ScrapeArgs) -> Result<(), Box<dyn Error>> {
    let publisher = Publisher::for_url(&args.url)
        .ok_or_else(|| format!("no scrape adapter for {}", args.url))?;
    let article = publisher.scrape(&args.url).await?;
    info!(publisher = ?publisher, title = %article.title, chars = article.content.len(), "Scraped article");
    println!("{}", serde_json::to_string_pretty(&article)?);
    Ok(())
}

#[instrument(level = "info", skip_all, fields(publisher = ?args.publisher, query = %args.query))]
async fn run_search(args: SearchArgs) -> Result<(), Box<dyn Error>> {
    if !args.publisher.supports_search() {
        let supported: Vec<_> = Publisher::ALL.into_iter().filter(|p| p.supports_search()).collect();
        return Err(format!("{:?} has no search support; try one of {supported:?}", args.publisher).into());
    }
    let links = args.publisher.search(&args.query, args.max_results).await?;
    info!(count = links.len(), "Search complete");
    for link in links {
        println!("{link}");
    }
    Ok(())
}

async fn run_ngrams(args: NgramArgs) -> Result<(), Box<dyn Error>> {
    let input = match InputSource::from_args(args.filename, args.dirname) {
        Ok(input) => input,
        Err(_) => {
            warn!("Nothing passed; exiting");
            return Ok(());
        }
    };
    let written = outputs::ngrams::write_ngram_tables(&input).await?;
    info!(files = written.len(), "N-gram tables written");
    Ok(())
}
