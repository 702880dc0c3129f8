//! Page fetching: plain HTTP and headless-browser sessions.
//!
//! Most publishers serve their article markup directly, so a single shared
//! `reqwest` client with a desktop User-Agent is enough. Sites that render
//! with JavaScript or put a modal in front of the article are loaded in a
//! headless Chromium via `chromiumoxide`; every such call opens its own
//! session and closes it before returning.

use super::ScrapeError;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use once_cell::sync::Lazy;
use rand::Rng;
use std::error::Error;
use std::ops::Range;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/50.0.2661.102 Safari/537.36";

/// Class of the NYT registration modal.
const MODAL_SELECTOR: &str = ".css-j07ljx";

static CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_default()
});

/// GET `url` and return the body. The status code is not checked; error
/// pages simply fail extraction later.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_html(url: &str) -> Result<String, Box<dyn Error>> {
    let response = CLIENT.get(url).send().await?;
    let status = response.status();
    let body = response.text().await?;
    info!(status = status.as_u16(), bytes = body.len(), "Fetched page");
    Ok(body)
}

/// Sleep for a random duration within `seconds`.
pub async fn pause(seconds: Range<f64>) {
    let secs = rand::rng().random_range(seconds);
    debug!(secs, "Pausing");
    sleep(Duration::from_secs_f64(secs)).await;
}

fn browser_error(e: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Browser(e.to_string())
}

/// A running headless browser and the task driving its event handler.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    #[instrument(level = "info")]
    pub async fn launch() -> Result<Self, ScrapeError> {
        let config = BrowserConfig::builder().build().map_err(ScrapeError::Browser)?;
        let (browser, mut handler) = Browser::launch(config).await.map_err(browser_error)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });
        info!("Browser session started");
        Ok(Self { browser, handler })
    }

    /// Open `url` in a new tab and wait for it to load.
    pub async fn open(&self, url: &str) -> Result<Page, ScrapeError> {
        let page = self.browser.new_page(url).await.map_err(browser_error)?;
        page.wait_for_navigation().await.map_err(browser_error)?;
        Ok(page)
    }

    pub async fn close(mut self) -> Result<(), ScrapeError> {
        self.browser.close().await.map_err(browser_error)?;
        let _ = self.browser.wait().await;
        self.handler.abort();
        info!("Browser session closed");
        Ok(())
    }
}

/// Load `url` in a fresh browser session and return the rendered HTML.
///
/// With `check_for_modal`, waits 5-10 s for the registration modal and
/// clicks it away when it shows up.
#[instrument(level = "info", skip_all, fields(%url, check_for_modal))]
pub async fn browser_html(url: &str, check_for_modal: bool) -> Result<String, ScrapeError> {
    let session = BrowserSession::launch().await?;
    let result = render(&session, url, check_for_modal).await;
    if let Err(e) = &result {
        warn!(error = %e, "Error during page load");
    }
    session.close().await?;
    result
}

async fn render(session: &BrowserSession, url: &str, check_for_modal: bool) -> Result<String, ScrapeError> {
    let page = session.open(url).await?;
    if check_for_modal {
        dismiss_modal(&page).await;
    }
    let html = page.content().await.map_err(browser_error)?;
    pause(2.0..5.0).await;
    Ok(html)
}

async fn dismiss_modal(page: &Page) {
    let wait = Duration::from_secs_f64(rand::rng().random_range(5.0..10.0));
    let found = timeout(wait, async {
        loop {
            if let Ok(modal) = page.find_element(MODAL_SELECTOR).await {
                return modal;
            }
            sleep(Duration::from_millis(250)).await;
        }
    })
    .await;

    match found {
        Ok(modal) => {
            pause(0.5..1.5).await;
            match modal.click().await {
                Ok(_) => debug!("Dismissed modal"),
                Err(e) => debug!(error = %e, "Modal click failed"),
            }
        }
        Err(_) => debug!("No modal appeared"),
    }
}
