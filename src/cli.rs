//! Command-line interface definitions for textmine.
//!
//! One subcommand per pipeline stage. API key files can also be supplied via
//! environment variables or the YAML config file passed with `--config`.

use crate::clean::{CleanOptions, stopwords};
use crate::config::{Config, prefer_cli};
use crate::scrapers::{DEFAULT_MAX_RESULTS, Publisher};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::path::PathBuf;

/// Collect news articles and YouTube comments, then clean them for text mining.
///
/// # Examples
///
/// ```sh
/// # Comments for one video, then every cleaning step
/// textmine comments keys/youtube.txt -U "https://www.youtube.com/watch?v=dQw4w9WgXcQ" -D out
/// textmine clean -I out -D cleaned -abplnswSL
///
/// # NewsAPI search with article bodies filled in
/// textmine news everything --newsapi-key-file keys/newsapi.txt -q "climate" --scrape -o news.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(long, global = true, env = "TEXTMINE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Clean comment CSV files
    Clean(CleanArgs),
    /// Download YouTube comments for one or more videos
    Comments(CommentsArgs),
    /// Query a news API
    News(NewsArgs),
    /// Scrape a single article
    Scrape(ScrapeArgs),
    /// List article links from a publisher's site search
    Search(SearchArgs),
    /// Count bigrams and trigrams in comment CSV files
    Ngrams(NgramArgs),
}

#[derive(Args, Debug, Default)]
pub struct CleanArgs {
    /// CSV file of comments to clean
    #[arg(short = 'i', long)]
    pub input_file: Option<PathBuf>,

    /// Directory of CSV files to clean (ignored when --input-file is given)
    #[arg(short = 'I', long)]
    pub input_dir: Option<PathBuf>,

    /// Where cleaned files are written [default: current directory]
    #[arg(short = 'D', long)]
    pub save_dir: Option<PathBuf>,

    /// Fold characters to ASCII (a)
    #[arg(short = 'a', long)]
    pub convert_to_ascii: bool,

    /// Remove line breaks (b)
    #[arg(short = 'b', long)]
    pub remove_line_breaks: bool,

    /// Remove punctuation (p)
    #[arg(short = 'p', long)]
    pub remove_punctuation: bool,

    /// Lowercase everything (l)
    #[arg(short = 'l', long)]
    pub lowercase: bool,

    /// Remove digits (n)
    #[arg(short = 'n', long)]
    pub remove_numbers: bool,

    /// Spell-correct every word (s)
    #[arg(short = 's', long)]
    pub spell_check: bool,

    /// Remove stopwords (w)
    #[arg(short = 'w', long)]
    pub remove_stopwords: bool,

    /// Stem every word (S)
    #[arg(short = 'S', long)]
    pub stem: bool,

    /// Lemmatize every word (L)
    #[arg(short = 'L', long)]
    pub lemmatize: bool,

    /// Comma-separated stopwords replacing the English list
    #[arg(short = 'W', long)]
    pub custom_stop_words: Option<String>,

    /// Treat the --custom-stop-words value as a path to a comma-separated file
    #[arg(short = 'f', long)]
    pub stop_words_file_path: bool,

    /// Word list, one word per line, for spell correction and lemma lookup
    #[arg(long)]
    pub dictionary: Option<PathBuf>,
}

impl CleanArgs {
    /// Resolve the cleaning options, reading stopword files as needed.
    ///
    /// A configured `stopwords_file` applies only when no `-W` was given.
    pub fn options(&self, config: &Config) -> Result<CleanOptions, Box<dyn Error>> {
        let custom_stopwords = match (&self.custom_stop_words, &config.stopwords_file) {
            (Some(path), _) if self.stop_words_file_path => Some(stopwords::parse_list(&std::fs::read_to_string(path)?)),
            (Some(list), _) => Some(stopwords::parse_list(list)),
            (None, Some(path)) => Some(stopwords::parse_list(&std::fs::read_to_string(path)?)),
            (None, None) => None,
        };

        Ok(CleanOptions {
            convert_to_ascii: self.convert_to_ascii,
            remove_line_breaks: self.remove_line_breaks,
            remove_punctuation: self.remove_punctuation,
            lowercase: self.lowercase,
            remove_numbers: self.remove_numbers,
            spell_check: self.spell_check,
            remove_stopwords: self.remove_stopwords,
            stem: self.stem,
            lemmatize: self.lemmatize,
            custom_stopwords,
            dictionary: prefer_cli(self.dictionary.clone(), &config.dictionary_file),
        })
    }
}

#[derive(Args, Debug)]
pub struct CommentsArgs {
    /// Text file holding the YouTube Data API key
    #[arg(env = "YOUTUBE_API_KEY_FILE")]
    pub api_key_file: Option<PathBuf>,

    /// URL (or id with --ids) of a single video; wins over --source-csv
    #[arg(short = 'U', long)]
    pub video_url: Option<String>,

    /// CSV of `url_or_id[,song[,artist]]` rows, no header
    #[arg(short = 'C', long)]
    pub source_csv: Option<PathBuf>,

    /// Where comment files are written [default: current directory]
    #[arg(short = 'D', long)]
    pub save_dir: Option<PathBuf>,

    /// Song name, used in the output filename
    #[arg(short = 's', long)]
    pub song_name: Option<String>,

    /// Artist, used in the output filename
    #[arg(short = 'a', long)]
    pub artist: Option<String>,

    /// Maximum number of comments per video
    #[arg(short = 'm', long, default_value_t = 100)]
    pub max_comments: usize,

    /// Inputs are video ids rather than URLs
    #[arg(short = 'i', long)]
    pub ids: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NewsEndpoint {
    /// NewsAPI `everything`
    Everything,
    /// NewsAPI `top-headlines`
    Headlines,
    /// NYT article search
    Nyt,
}

#[derive(Args, Debug)]
pub struct NewsArgs {
    /// Which API to query
    #[arg(value_enum)]
    pub endpoint: NewsEndpoint,

    /// Text file holding the NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY_FILE")]
    pub newsapi_key_file: Option<PathBuf>,

    /// Text file holding the NYT API key
    #[arg(long, env = "NYT_API_KEY_FILE")]
    pub nyt_key_file: Option<PathBuf>,

    /// Search keywords
    #[arg(short, long)]
    pub query: Option<String>,

    /// Fields to search, comma-separated (everything)
    #[arg(long)]
    pub search_in: Option<String>,

    /// Source ids, comma-separated (everything, headlines)
    #[arg(long)]
    pub sources: Option<String>,

    /// Domains to include, comma-separated (everything)
    #[arg(long)]
    pub domains: Option<String>,

    /// Domains to exclude, comma-separated (everything)
    #[arg(long)]
    pub exclude_domains: Option<String>,

    /// Oldest publication date, YYYY-MM-DD (everything, nyt)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Newest publication date, YYYY-MM-DD (everything, nyt)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// 2-letter language code (everything)
    #[arg(long)]
    pub language: Option<String>,

    /// Result order: relevancy, popularity, publishedAt; newest, oldest, relevance for nyt
    #[arg(long)]
    pub sort_by: Option<String>,

    /// 2-letter country code (headlines)
    #[arg(long)]
    pub country: Option<String>,

    /// Category (headlines)
    #[arg(long)]
    pub category: Option<String>,

    /// Results per page (everything, headlines)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Result page
    #[arg(long)]
    pub page: Option<u32>,

    /// Fill in article bodies with the matching scrape adapter
    #[arg(long)]
    pub scrape: bool,

    /// Write the documents to this JSON file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// Article URL
    pub url: String,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[arg(value_enum)]
    pub publisher: Publisher,

    pub query: String,

    /// Stop after this many links
    #[arg(short, long, default_value_t = DEFAULT_MAX_RESULTS)]
    pub max_results: usize,
}

#[derive(Args, Debug)]
pub struct NgramArgs {
    /// Comment CSV file
    #[arg(short, long)]
    pub filename: Option<PathBuf>,

    /// Directory of comment CSV files (ignored when --filename is given)
    #[arg(short, long)]
    pub dirname: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_short_flags() {
        let cli = Cli::parse_from(["textmine", "clean", "-i", "comments.csv", "-D", "out", "-abplnswSL"]);
        let Command::Clean(args) = cli.command else {
            panic!("expected clean");
        };
        assert_eq!(args.input_file, Some(PathBuf::from("comments.csv")));
        assert_eq!(args.save_dir, Some(PathBuf::from("out")));
        let options = args.options(&Config::default()).unwrap();
        assert_eq!(options.process_code(), "abplnswSL");
        assert!(options.custom_stopwords.is_none());
    }

    #[test]
    fn test_clean_case_sensitive_flags() {
        let cli = Cli::parse_from(["textmine", "clean", "-I", "in", "-s", "-L"]);
        let Command::Clean(args) = cli.command else {
            panic!("expected clean");
        };
        assert_eq!(args.input_dir, Some(PathBuf::from("in")));
        assert!(args.spell_check && args.lemmatize);
        assert!(!args.stem && !args.lowercase);
    }

    #[test]
    fn test_custom_stop_words_inline_and_file() {
        let args = CleanArgs {
            custom_stop_words: Some("song, Video".to_string()),
            ..CleanArgs::default()
        };
        let words = args.options(&Config::default()).unwrap().custom_stopwords.unwrap();
        assert!(words.contains("song") && words.contains("video"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.txt");
        std::fs::write(&path, "lol,omg\n").unwrap();
        let args = CleanArgs {
            custom_stop_words: Some(path.to_string_lossy().to_string()),
            stop_words_file_path: true,
            ..CleanArgs::default()
        };
        let words = args.options(&Config::default()).unwrap().custom_stopwords.unwrap();
        assert_eq!(words.len(), 2);
        assert!(words.contains("omg"));
    }

    #[test]
    fn test_comments_args() {
        let cli = Cli::parse_from([
            "textmine",
            "--config",
            "textmine.yaml",
            "comments",
            "key.txt",
            "-U",
            "https://www.youtube.com/watch?v=abc",
            "-s",
            "Song",
            "-a",
            "Artist",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("textmine.yaml")));
        let Command::Comments(args) = cli.command else {
            panic!("expected comments");
        };
        assert_eq!(args.api_key_file, Some(PathBuf::from("key.txt")));
        assert_eq!(args.max_comments, 100);
        assert!(!args.ids);
        assert_eq!(args.song_name.as_deref(), Some("Song"));
    }

    #[test]
    fn test_news_args() {
        let cli = Cli::parse_from([
            "textmine",
            "news",
            "nyt",
            "--nyt-key-file",
            "nyt.txt",
            "-q",
            "election",
            "--from",
            "2024-01-01",
            "--scrape",
        ]);
        let Command::News(args) = cli.command else {
            panic!("expected news");
        };
        assert_eq!(args.endpoint, NewsEndpoint::Nyt);
        assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert!(args.scrape);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_search_and_ngrams_args() {
        let cli = Cli::parse_from(["textmine", "search", "ap-news", "storm", "-m", "20"]);
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.publisher, Publisher::ApNews);
        assert_eq!(args.max_results, 20);

        let cli = Cli::parse_from(["textmine", "ngrams", "-d", "out"]);
        let Command::Ngrams(args) = cli.command else {
            panic!("expected ngrams");
        };
        assert_eq!(args.dirname, Some(PathBuf::from("out")));
        assert!(args.filename.is_none());
    }
}
