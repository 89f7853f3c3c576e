//! Page client: the single point of entry for all text-tv service calls.
//!
//! Other modules only see `PageSource`; the reqwest-backed `PageClient` is
//! constructed once in `main`. A failed fetch is reported to the caller as a
//! `FetchError` and never retried here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("service reported status '{0}'")]
    Status(String),
}

/// One text/image variant within a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subpage {
    /// Monospace page content, one entry per line.
    pub raw_text: Vec<String>,
    /// Base64-encoded GIF, only used by the graphical frontend.
    pub image_base64: Option<String>,
    /// Image-map markup listing the clickable regions of the bitmap.
    pub hotspot_descriptor: Option<String>,
}

/// A successfully fetched page. Replaced wholesale on every re-fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFetch {
    pub status: String,
    pub subpages: Vec<Subpage>,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

impl PageFetch {
    /// Reachable service, no usable content.
    pub fn empty(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            subpages: Vec::new(),
            prev_page: None,
            next_page: None,
        }
    }
}

/// Anything that can produce pages by number.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, page: u32) -> Result<PageFetch, FetchError>;
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: Option<ApiPage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPage {
    #[serde(default, deserialize_with = "page_ref")]
    prev_page: Option<u32>,
    #[serde(default, deserialize_with = "page_ref")]
    next_page: Option<u32>,
    #[serde(default)]
    sub_pages: Option<Vec<ApiSubPage>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSubPage {
    #[serde(default)]
    alt_text: Option<String>,
    #[serde(default)]
    gif_as_base64: Option<String>,
    #[serde(default)]
    image_map: Option<String>,
}

/// The service sends neighbouring pages as decimal strings, empty when absent.
/// Numbers are accepted too; anything else means "no page".
fn page_ref<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let page = match value {
        Value::String(s) => s.trim().parse::<u32>().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    };
    Ok(page.filter(|&p| p > 0))
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Decodes a response body into a `PageFetch`.
pub fn parse_page_body(body: &str) -> Result<PageFetch, FetchError> {
    let response: ApiResponse = serde_json::from_str(body)?;

    if response.status != SUCCESS_STATUS {
        return Err(FetchError::Status(response.status));
    }

    let Some(data) = response.data else {
        return Ok(PageFetch::empty(response.status));
    };

    let subpages = data
        .sub_pages
        .unwrap_or_default()
        .into_iter()
        .map(|sp| Subpage {
            raw_text: sp.alt_text.as_deref().map(split_lines).unwrap_or_default(),
            image_base64: sp.gif_as_base64.filter(|s| !s.is_empty()),
            hotspot_descriptor: sp.image_map.filter(|s| !s.is_empty()),
        })
        .collect();

    Ok(PageFetch {
        status: response.status,
        subpages,
        prev_page: data.prev_page,
        next_page: data.next_page,
    })
}

/// reqwest-backed client for `GET {base_url}/{page}`.
#[derive(Clone)]
pub struct PageClient {
    client: Client,
    base_url: String,
}

impl PageClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}/{}", self.base_url, page)
    }
}

#[async_trait]
impl PageSource for PageClient {
    async fn fetch(&self, page: u32) -> Result<PageFetch, FetchError> {
        let url = self.page_url(page);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("{url} returned {status}");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let fetched = parse_page_body(&body)?;

        debug!(
            "fetched page {page} ({}): {} subpages, prev={:?}, next={:?}",
            fetched.status,
            fetched.subpages.len(),
            fetched.prev_page,
            fetched.next_page
        );

        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_100: &str = r#"{
        "status": "success",
        "data": {
            "pageNumber": "100",
            "prevPage": "",
            "nextPage": "101",
            "subPages": [
                {
                    "subPageNumber": "100",
                    "altText": "  SVT Text   Måndag 19 okt\n\nInrikes 101\nUtrikes 104\n\nNästa sida 101\n ",
                    "gifAsBase64": "R0lGODlhAQABAAAAACw=",
                    "imageMap": "<AREA SHAPE=\"RECT\" COORDS=\"1,1,10,10\" HREF=\"101\">"
                },
                { "altText": "second\r\nsubpage" }
            ]
        }
    }"#;

    #[test]
    fn test_parse_success_page() {
        let page = parse_page_body(PAGE_100).unwrap();
        assert_eq!(page.status, "success");
        assert_eq!(page.prev_page, None);
        assert_eq!(page.next_page, Some(101));
        assert_eq!(page.subpages.len(), 2);
        assert_eq!(page.subpages[0].raw_text[0], "  SVT Text   Måndag 19 okt");
        assert_eq!(page.subpages[0].raw_text[1], "");
        assert!(page.subpages[0].image_base64.is_some());
        assert!(page.subpages[0].hotspot_descriptor.is_some());
    }

    #[test]
    fn test_parse_strips_carriage_returns() {
        let page = parse_page_body(PAGE_100).unwrap();
        assert_eq!(page.subpages[1].raw_text, vec!["second", "subpage"]);
        assert_eq!(page.subpages[1].image_base64, None);
    }

    #[test]
    fn test_non_success_status_is_an_error() {
        let err = parse_page_body(r#"{"status": "error", "data": null}"#).unwrap_err();
        assert!(matches!(err, FetchError::Status(s) if s == "error"));
    }

    #[test]
    fn test_missing_status_is_an_error() {
        let err = parse_page_body(r#"{"data": {"subPages": []}}"#).unwrap_err();
        assert!(matches!(err, FetchError::Status(_)));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err = parse_page_body("<html>502</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_success_without_data_is_empty_page() {
        let page = parse_page_body(r#"{"status": "success"}"#).unwrap();
        assert_eq!(page, PageFetch::empty("success"));
    }

    #[test]
    fn test_success_with_missing_fields_is_degenerate() {
        let page = parse_page_body(r#"{"status": "success", "data": {}}"#).unwrap();
        assert!(page.subpages.is_empty());
        assert_eq!(page.prev_page, None);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_null_fields_are_treated_as_absent() {
        let body = r#"{"status": "success", "data": {"prevPage": null, "subPages": null}}"#;
        let page = parse_page_body(body).unwrap();
        assert!(page.subpages.is_empty());
        assert_eq!(page.prev_page, None);

        let body = r#"{"status": "success", "data": {"subPages": [{"altText": null}]}}"#;
        let page = parse_page_body(body).unwrap();
        assert!(page.subpages[0].raw_text.is_empty());
    }

    #[test]
    fn test_page_refs_accept_numbers_and_reject_garbage() {
        let body = r#"{"status": "success", "data": {"prevPage": 99, "nextPage": "abc"}}"#;
        let page = parse_page_body(body).unwrap();
        assert_eq!(page.prev_page, Some(99));
        assert_eq!(page.next_page, None);

        let body = r#"{"status": "success", "data": {"prevPage": "0", "nextPage": " 200 "}}"#;
        let page = parse_page_body(body).unwrap();
        assert_eq!(page.prev_page, None);
        assert_eq!(page.next_page, Some(200));
    }

    #[test]
    fn test_page_url_joins_base_and_number() {
        let client = PageClient::new("http://localhost:9/api", Duration::from_secs(1)).unwrap();
        assert_eq!(client.page_url(377), "http://localhost:9/api/377");
    }
}
