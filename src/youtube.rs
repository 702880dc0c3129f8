//! YouTube comment collection.
//!
//! Pages through the `commentThreads` endpoint for each requested video,
//! keeps the original text of every top-level comment (commas stripped so
//! the single-column CSV stays unambiguous for downstream tools), and writes
//! one CSV per video named
//! `<count>[_<song>][_<artist>]_<video_id>.csv`.

use crate::api::{ApiGetRequest, ApiOutcome, Payload, YouTubeCommentThreads};
use crate::models::VideoRequest;
use crate::utils::{filename_slug, read_rows, single_to_multi, write_rows};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Largest page the API serves.
const MAX_PAGE_SIZE: usize = 100;

static VIDEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"v=([^&]*)").expect("video id pattern is valid"));

#[derive(Deserialize)]
struct CommentThreadList {
    #[serde(default)]
    items: Vec<CommentThread>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct CommentThread {
    snippet: ThreadSnippet,
}

#[derive(Deserialize)]
struct ThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: TopLevelComment,
}

#[derive(Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Deserialize)]
struct CommentSnippet {
    #[serde(rename = "textOriginal")]
    text_original: String,
}

/// Pull the `v=` query value out of a watch URL.
pub fn extract_video_id(url: &str) -> Result<String, Box<dyn Error>> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| format!("no video id (v=...) in {url}").into())
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// Read videos from a CSV of `url_or_id[,song[,artist]]` rows (no header).
pub fn read_video_csv(path: impl AsRef<Path>, ids_passed: bool) -> Result<Vec<VideoRequest>, Box<dyn Error>> {
    let mut videos = Vec::new();
    for row in read_rows(path, b',')? {
        let Some(first) = row.first().filter(|v| !v.is_empty()) else {
            continue;
        };
        let video_id = if ids_passed {
            first.clone()
        } else {
            extract_video_id(first)?
        };
        videos.push(VideoRequest {
            video_id,
            song: non_empty(row.get(1)),
            artist: non_empty(row.get(2)),
        });
    }
    Ok(videos)
}

/// Work out which videos to collect from the CLI inputs.
///
/// A single video wins over a CSV when both are given.
pub fn resolve_videos(
    video_url: Option<&str>,
    source_csv: Option<&Path>,
    song: Option<String>,
    artist: Option<String>,
    ids_passed: bool,
) -> Result<Vec<VideoRequest>, Box<dyn Error>> {
    match (video_url, source_csv) {
        (None, None) => Err("either a video URL or a source CSV must be given".into()),
        (Some(video), csv) => {
            if csv.is_some() {
                warn!("Both video and source CSV were passed; defaulting to video");
            }
            let video_id = if ids_passed {
                video.to_string()
            } else {
                extract_video_id(video)?
            };
            Ok(vec![VideoRequest { video_id, song, artist }])
        }
        (None, Some(csv)) => read_video_csv(csv, ids_passed),
    }
}

/// Output file for a video's comments.
pub fn output_path(save_dir: &Path, count: usize, video: &VideoRequest) -> PathBuf {
    let mut name = count.to_string();
    if let Some(song) = &video.song {
        name.push('_');
        name.push_str(&filename_slug(song));
    }
    if let Some(artist) = &video.artist {
        name.push('_');
        name.push_str(&filename_slug(artist));
    }
    name.push('_');
    name.push_str(&video.video_id);
    name.push_str(".csv");
    save_dir.join(name)
}

/// Collect up to `max_comments` distinct top-level comments for one video.
///
/// Stops early on a non-200 response or when there is no next page.
///
/// # Arguments
///
/// * `request` - Comment-threads builder carrying the API key
/// * `video_id` - Id of the video, the `v=` value of its URL
/// * `max_comments` - Cap on the comments kept
///
/// # Returns
///
/// Comment texts with commas removed, in the order first seen, without
/// duplicates. Transport and JSON errors are returned as `Err`.
#[instrument(level = "info", skip(request))]
pub async fn collect_video_comments(
    request: &mut YouTubeCommentThreads,
    video_id: &str,
    max_comments: usize,
) -> Result<Vec<String>, Box<dyn Error>> {
    let mut seen = HashSet::new();
    let mut comments = Vec::new();
    let mut page_token: Option<String> = None;

    while comments.len() < max_comments {
        let remaining = max_comments - comments.len();
        request
            .part("snippet")
            .video_id(video_id)
            .max_results(remaining.min(MAX_PAGE_SIZE) as u32);
        if let Some(token) = &page_token {
            request.page_token(token);
        }

        let json = match request.get().await? {
            ApiOutcome::Success(Payload::Json(json)) => json,
            ApiOutcome::Success(Payload::Documents(_)) => {
                return Err("comment threads request returned parsed documents".into());
            }
            ApiOutcome::Failure(failed) => {
                warn!(status = failed.status, reason = %failed.reason, "Comment request failed; stopping");
                break;
            }
        };

        let page = CommentThreadList::deserialize(&json)?;
        for thread in page.items {
            let text = thread.snippet.top_level_comment.snippet.text_original.replace(',', "");
            if seen.insert(text.clone()) {
                comments.push(text);
            }
        }
        info!(
            collected = comments.len(),
            max = max_comments,
            percent = format!("{:.2}", 100.0 * comments.len() as f64 / max_comments as f64),
            "Status"
        );

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => {
                info!("No next page; stopping early");
                break;
            }
        }
    }

    comments.truncate(max_comments);
    Ok(comments)
}

/// Collect and save comments for every video.
///
/// # Arguments
///
/// * `request` - Comment-threads builder, reused for every page of every video
/// * `videos` - Videos to collect, with optional song and artist for the filename
/// * `save_dir` - Directory receiving one CSV per video
/// * `max_comments` - Per-video cap
///
/// # Returns
///
/// The paths written. Videos without comments produce no file.
#[instrument(level = "info", skip_all, fields(videos = videos.len(), save_dir = %save_dir.display()))]
pub async fn scrape_youtube_comments(
    request: &mut YouTubeCommentThreads,
    videos: &[VideoRequest],
    save_dir: &Path,
    max_comments: usize,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut written = Vec::new();
    for video in videos {
        let comments = collect_video_comments(request, &video.video_id, max_comments).await?;
        if comments.is_empty() {
            warn!(video_id = %video.video_id, "No comments collected");
            continue;
        }
        let path = output_path(save_dir, comments.len(), video);
        write_rows(&single_to_multi(comments), &path)?;
        info!(path = %path.display(), "Wrote comments");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_stub;
    use crate::utils::load_comments;
    use serde_json::json;

    fn page(texts: &[&str], next: Option<&str>) -> String {
        let items: Vec<_> = texts
            .iter()
            .map(|t| json!({"snippet": {"topLevelComment": {"snippet": {"textOriginal": t}}}}))
            .collect();
        let mut body = json!({"kind": "youtube#commentThreadListResponse", "items": items});
        if let Some(token) = next {
            body["nextPageToken"] = json!(token);
        }
        body.to_string()
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert!(extract_video_id("https://youtu.be/abc").is_err());
    }

    #[test]
    fn test_read_video_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("videos.csv");
        std::fs::write(
            &path,
            "https://www.youtube.com/watch?v=aaa,Bohemian Rhapsody,Queen\nhttps://www.youtube.com/watch?v=bbb\n",
        )
        .unwrap();
        let videos = read_video_csv(&path, false).unwrap();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].video_id, "aaa");
        assert_eq!(videos[0].song.as_deref(), Some("Bohemian Rhapsody"));
        assert_eq!(videos[0].artist.as_deref(), Some("Queen"));
        assert_eq!(videos[1].video_id, "bbb");
        assert!(videos[1].song.is_none());
    }

    #[test]
    fn test_resolve_videos_requires_a_source() {
        assert!(resolve_videos(None, None, None, None, false).is_err());
        let videos = resolve_videos(Some("xyz"), Some(Path::new("ignored.csv")), None, None, true).unwrap();
        assert_eq!(videos[0].video_id, "xyz");
    }

    #[test]
    fn test_output_path() {
        let video = VideoRequest {
            video_id: "aaa".to_string(),
            song: Some("Bohemian Rhapsody".to_string()),
            artist: Some("Queen".to_string()),
        };
        assert_eq!(
            output_path(Path::new("/tmp"), 42, &video),
            PathBuf::from("/tmp/42_bohemian-rhapsody_queen_aaa.csv")
        );
        let bare = VideoRequest { video_id: "bbb".to_string(), song: None, artist: None };
        assert_eq!(output_path(Path::new("out"), 3, &bare), PathBuf::from("out/3_bbb.csv"));
    }

    #[tokio::test]
    async fn test_collect_pages_and_deduplicates() {
        let (base, urls, handle) = spawn_stub(vec![
            (200, page(&["great song", "hello, world"], Some("NEXT"))),
            (200, page(&["great song", "third"], None)),
        ]);
        let mut request = YouTubeCommentThreads::new("key").with_endpoint(&base);
        let comments = collect_video_comments(&mut request, "vid", 10).await.unwrap();
        assert_eq!(comments, vec!["great song", "hello world", "third"]);

        let first = urls.recv().unwrap();
        assert!(first.contains("maxResults=10"));
        assert!(first.contains("videoId=vid"));
        assert!(!first.contains("pageToken"));
        let second = urls.recv().unwrap();
        assert!(second.contains("pageToken=NEXT"));
        assert!(second.contains("maxResults=8"));
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn test_collect_stops_at_cap() {
        let (base, _urls, handle) = spawn_stub(vec![(200, page(&["a", "b", "c"], Some("MORE")))]);
        let mut request = YouTubeCommentThreads::new("key").with_endpoint(&base);
        let comments = collect_video_comments(&mut request, "vid", 2).await.unwrap();
        assert_eq!(comments.len(), 2);
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn test_scrape_writes_file_and_skips_failures() {
        let (base, _urls, handle) = spawn_stub(vec![
            (200, page(&["one", "two"], None)),
            (403, r#"{"error":{"code":403}}"#.to_string()),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let videos = vec![
            VideoRequest { video_id: "ok".to_string(), song: Some("Song".to_string()), artist: None },
            VideoRequest { video_id: "disabled".to_string(), song: None, artist: None },
        ];
        let mut request = YouTubeCommentThreads::new("key").with_endpoint(&base);
        let written = scrape_youtube_comments(&mut request, &videos, dir.path(), 100)
            .await
            .unwrap();
        assert_eq!(written, vec![dir.path().join("2_song_ok.csv")]);
        assert_eq!(load_comments(&written[0]).unwrap(), vec!["one", "two"]);
        handle.join().unwrap();
    }
}
