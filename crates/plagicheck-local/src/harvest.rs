//! Harvests candidate source links from raw search-result HTML.
//!
//! - Keeps only absolute http(s) anchors with non-empty visible text.
//! - Filters the search provider's own service/redirect links.
//! - Dedupes by URL authority (domain), first seen wins.
//! - Returns at most `max_links`; malformed markup yields a partial or
//!   empty result, never a panic.

use plagicheck_core::CandidateSource;
use std::collections::BTreeSet;

/// Hosts belonging to the search provider itself. Result pages are littered
/// with service links back into the engine; surfacing those as "sources"
/// would be nonsense.
const SERVICE_HOST_MARKERS: &[&str] = &["yandex", "yastatic"];

fn is_service_host(host: &str) -> bool {
    SERVICE_HOST_MARKERS.iter().any(|m| host.contains(m))
}

/// Extract up to `max_links` deduplicated (title, url) candidates from
/// result markup.
pub fn extract_sources(html: &str, max_links: usize) -> Vec<CandidateSource> {
    if max_links == 0 {
        return Vec::new();
    }

    let doc = html_scraper::Html::parse_document(html);
    let sel = match html_scraper::Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut seen_domains = BTreeSet::<String>::new();
    let mut out: Vec<CandidateSource> = Vec::new();
    for el in doc.select(&sel) {
        if out.len() >= max_links {
            break;
        }
        let href = match el.value().attr("href") {
            Some(h) => h.trim(),
            None => continue,
        };
        if href.is_empty() {
            continue;
        }

        let parsed = match url::Url::parse(href) {
            Ok(u) => u,
            Err(_) => continue,
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            continue;
        }
        let host = match parsed.host_str() {
            Some(h) => h.to_ascii_lowercase(),
            None => continue,
        };
        if is_service_host(&host) {
            continue;
        }

        // Visible title: inner markup stripped, whitespace collapsed.
        let title = el
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if title.is_empty() {
            continue;
        }

        if !seen_domains.insert(host) {
            continue;
        }
        out.push(CandidateSource {
            title,
            url: href.to_string(),
        });
    }

    out
}
