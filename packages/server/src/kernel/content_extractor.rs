//! HTTP content extractor - fetches a site's key pages as plain text
//!
//! This implementation:
//! - Uses reqwest for HTTP requests
//! - Uses scraper crate for HTML parsing
//! - Follows about/contact/products links from the homepage
//!
//! Limitations:
//! - No JavaScript rendering (static HTML sites only)

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::traits::{BaseContentExtractor, SiteContent, MAX_SECTION_CHARS};

/// Homepage links inspected when hunting for sub-pages.
const MAX_LINKS_SCANNED: usize = 20;

/// HTTP content extractor using reqwest + scraper.
pub struct HttpContentExtractor {
    client: reqwest::Client,
}

impl HttpContentExtractor {
    pub fn new() -> Result<Self> {
        // Use a browser-like User-Agent to avoid bot detection
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .parse()
                .context("invalid Accept header")?,
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            "en-US,en;q=0.5".parse().context("invalid header")?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch raw HTML from a URL
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("HTTP request failed for {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response.text().await.context("Failed to read response body")
    }

    /// Strip boilerplate elements and flatten a document to plain text.
    fn visible_text(html: &str) -> String {
        let document = Html::parse_document(html);
        let unwanted = [
            "script", "style", "noscript", "iframe", "nav", "header", "footer", "aside",
        ];

        // scraper offers no node removal, so cut the elements out of the
        // serialized document and re-parse what remains.
        let mut cleaned = document.html();
        for selector_str in unwanted {
            if let Ok(selector) = Selector::parse(selector_str) {
                for element in document.select(&selector) {
                    let element_html = element.html();
                    cleaned = cleaned.replace(&element_html, "");
                }
            }
        }

        let stripped = Html::parse_document(&cleaned);
        let text: Vec<&str> = stripped.root_element().text().collect();
        text.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Find the first homepage link whose href or text mentions one of
    /// the keywords, resolved against the base URL.
    fn find_linked_page(document: &Html, base_url: &Url, keywords: &[&str]) -> Option<String> {
        let link_selector = Selector::parse("a[href]").ok()?;

        for element in document.select(&link_selector).take(MAX_LINKS_SCANNED) {
            let href = element.value().attr("href")?.to_lowercase();
            let link_text = element.text().collect::<String>().to_lowercase();

            if keywords
                .iter()
                .any(|k| href.contains(k) || link_text.contains(k))
            {
                if let Ok(resolved) = base_url.join(element.value().attr("href")?) {
                    return Some(resolved.to_string());
                }
            }
        }
        None
    }

    /// Fetch a linked sub-page as plain text; failures yield None.
    async fn fetch_page_text(&self, url: &str) -> Option<String> {
        match self.fetch_html(url).await {
            Ok(html) => Some(Self::visible_text(&html)),
            Err(e) => {
                debug!(url = %url, error = %e, "sub-page fetch failed");
                None
            }
        }
    }

    /// Normalize URL by adding https:// if no scheme is present
    fn normalize_url(url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{}", url)
        }
    }

    fn cap(text: String) -> String {
        if text.chars().count() > MAX_SECTION_CHARS {
            text.chars().take(MAX_SECTION_CHARS).collect()
        } else {
            text
        }
    }
}

#[async_trait]
impl BaseContentExtractor for HttpContentExtractor {
    async fn extract(&self, url: &str) -> Result<SiteContent> {
        let url = Self::normalize_url(url);
        debug!(url = %url, "fetching website content");

        let html = self.fetch_html(&url).await?;
        let base_url = Url::parse(&url).with_context(|| format!("invalid URL: {}", url))?;

        let homepage = Self::visible_text(&html);
        if homepage.trim().len() < 100 {
            warn!(url = %url, "homepage has minimal content");
        }

        // Sub-page discovery is best-effort; a dead link never fails
        // the extraction.
        let (about_url, contact_url, products_url) = {
            let document = Html::parse_document(&html);
            (
                Self::find_linked_page(&document, &base_url, &["about"]),
                Self::find_linked_page(&document, &base_url, &["contact"]),
                Self::find_linked_page(&document, &base_url, &["product", "service", "offer"]),
            )
        };

        let mut about = String::new();
        if let Some(page_url) = about_url {
            about = self.fetch_page_text(&page_url).await.unwrap_or_default();
        }
        let mut contact = String::new();
        if let Some(page_url) = contact_url {
            contact = self.fetch_page_text(&page_url).await.unwrap_or_default();
        }
        let mut products = String::new();
        if let Some(page_url) = products_url {
            products = self.fetch_page_text(&page_url).await.unwrap_or_default();
        }

        debug!(
            url = %url,
            homepage_chars = homepage.len(),
            about_chars = about.len(),
            contact_chars = contact.len(),
            products_chars = products.len(),
            "content extraction complete"
        );

        Ok(SiteContent {
            homepage: Self::cap(homepage),
            about: Self::cap(about),
            contact: Self::cap(contact),
            products: Self::cap(products),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_text_strips_boilerplate() {
        let html = r#"<html><head><script>var x = 1;</script></head>
            <body><nav>Menu</nav><p>Welcome to Acme</p><footer>legal</footer></body></html>"#;
        let text = HttpContentExtractor::visible_text(html);
        assert!(text.contains("Welcome to Acme"));
        assert!(!text.contains("Menu"));
        assert!(!text.contains("var x"));
        assert!(!text.contains("legal"));
    }

    #[test]
    fn finds_contact_link_by_href() {
        let html = r#"<html><body><a href="/contact-us">Get in touch</a></body></html>"#;
        let document = Html::parse_document(html);
        let base = Url::parse("https://example.com").unwrap();
        let found = HttpContentExtractor::find_linked_page(&document, &base, &["contact"]);
        assert_eq!(found, Some("https://example.com/contact-us".to_string()));
    }

    #[test]
    fn finds_about_link_by_text() {
        let html = r#"<html><body><a href="/who-we-are">About our company</a></body></html>"#;
        let document = Html::parse_document(html);
        let base = Url::parse("https://example.com").unwrap();
        let found = HttpContentExtractor::find_linked_page(&document, &base, &["about"]);
        assert_eq!(found, Some("https://example.com/who-we-are".to_string()));
    }

    #[test]
    fn normalize_url_adds_scheme() {
        assert_eq!(
            HttpContentExtractor::normalize_url("example.com"),
            "https://example.com"
        );
        assert_eq!(
            HttpContentExtractor::normalize_url("http://example.com"),
            "http://example.com"
        );
    }
}
