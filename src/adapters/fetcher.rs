use crate::domain::ports::ContentFetcher;
use crate::utils::error::{FetchFailure, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Node};
use std::time::Duration;

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub const DEFAULT_USER_AGENT: &str = concat!("site-watch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchFailure> {
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchFailure::unreachable(url, e.to_string()))?;

        let status = response.status();
        tracing::debug!("{} responded with {}", url, status);
        if !status.is_success() {
            return Err(FetchFailure::http_status(url, status.as_u16()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchFailure::unreachable(url, e.to_string()))?;

        Ok(extract_visible_text(&html))
    }
}

/// 把 HTML 攤平成單一段可見文字，空白一律壓成一個空格
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut words: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            matches!(ancestor.value(), Node::Element(el) if HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_extract_drops_markup_scripts_and_styles() {
        let html = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Jane Doe</title>
    <style>body { color: red; }</style>
    <script>var tracking = "accepted";</script>
  </head>
  <body>
    <!-- hidden note -->
    <h1>Research</h1>
    <p>Trade and   growth,
       <em>forthcoming</em> in the AER.</p>
    <noscript>Enable JavaScript</noscript>
  </body>
</html>"#;

        let text = extract_visible_text(html);
        assert_eq!(
            text,
            "Jane Doe Research Trade and growth, forthcoming in the AER."
        );
    }

    #[test]
    fn test_extract_keeps_unicode() {
        let text = extract_visible_text("<p>Économie\u{00a0}appliquée — 経済学</p>");
        assert!(text.contains("Économie"));
        assert!(text.contains("経済学"));
    }

    #[tokio::test]
    async fn test_fetch_success_returns_text() {
        let server = MockServer::start();
        let page = server.mock(|when, then| {
            when.method(GET).path("/cv");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<html><body><p>Working papers</p></body></html>");
        });

        let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT, None).unwrap();
        let text = fetcher.fetch(&server.url("/cv")).await.unwrap();

        page.assert();
        assert_eq!(text, "Working papers");
    }

    #[tokio::test]
    async fn test_fetch_http_error_carries_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT, None).unwrap();
        let failure = fetcher.fetch(&server.url("/missing")).await.unwrap_err();
        assert_eq!(failure.status_code, 404);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_status_zero() {
        let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT, Some(Duration::from_secs(5))).unwrap();
        let failure = fetcher.fetch("http://127.0.0.1:1/").await.unwrap_err();
        assert_eq!(failure.status_code, 0);
    }
}
