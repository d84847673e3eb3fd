//! Renders a check report to a self-contained HTML document.
//!
//! The byte-blob contract is format-agnostic; HTML keeps the renderer
//! dependency-free and printable. Unknown report ids render with the
//! historical demo percentages instead of failing.

use chrono::Utc;
use plagicheck_core::{CandidateSource, ReportMeta, ReportRecord};

/// Percentages shown when a report id is unknown or carries no result yet.
pub const ORIGINALITY_DEFAULT: f64 = 83.3;
pub const PLAGIARISM_DEFAULT: f64 = 100.0 - ORIGINALITY_DEFAULT;

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a report for `report_id`. `record` may be `None` (expired or
/// never existed); the document still renders, with defaults.
pub fn render_report(report_id: &str, record: Option<&ReportRecord>) -> Vec<u8> {
    let (originality, plagiarism, sources, meta) = match record {
        Some(rec) => match &rec.result {
            Some(r) => (
                r.originality,
                r.plagiarism,
                r.sources.as_slice(),
                Some(&rec.meta),
            ),
            None => (
                ORIGINALITY_DEFAULT,
                PLAGIARISM_DEFAULT,
                &[] as &[CandidateSource],
                Some(&rec.meta),
            ),
        },
        None => (
            ORIGINALITY_DEFAULT,
            PLAGIARISM_DEFAULT,
            &[] as &[CandidateSource],
            None,
        ),
    };

    let sources_html = if sources.is_empty() {
        "<p class=\"muted\">No matching sources were found.</p>".to_string()
    } else {
        let items: String = sources
            .iter()
            .map(|s| {
                format!(
                    "<li><a href=\"{url}\">{title}</a> <span class=\"muted\">{url}</span></li>",
                    url = escape_html(&s.url),
                    title = escape_html(&s.title),
                )
            })
            .collect();
        format!("<ol>{items}</ol>")
    };

    let meta_html = meta.map(render_meta).unwrap_or_default();
    let created = Utc::now().format("%d.%m.%Y %H:%M");

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>PlagiCheck report {id}</title>
<style>
  body {{ font-family: sans-serif; margin: 2em; color: #222; }}
  .muted {{ color: #777; font-size: 0.85em; }}
  .score {{ font-size: 1.6em; }}
</style>
</head>
<body>
<h1>PlagiCheck — originality report</h1>
<p class="muted">Report {id} · generated {created}</p>
<p class="score">Originality: <strong>{originality:.1}%</strong><br>
Matched content: <strong>{plagiarism:.1}%</strong></p>
<h2>Sources</h2>
{sources_html}
{meta_html}
</body>
</html>
"#,
        id = escape_html(report_id),
    );
    html.into_bytes()
}

fn render_meta(meta: &ReportMeta) -> String {
    let mut rows = vec![
        format!("<tr><td>Words</td><td>{}</td></tr>", meta.word_count),
        format!("<tr><td>Characters</td><td>{}</td></tr>", meta.char_count),
        format!(
            "<tr><td>Document hash</td><td><code>{}</code></td></tr>",
            escape_html(&meta.doc_hash)
        ),
    ];
    if let Some(name) = &meta.filename {
        rows.push(format!(
            "<tr><td>File</td><td>{}</td></tr>",
            escape_html(name)
        ));
    }
    if let Some(size) = meta.size_bytes {
        rows.push(format!("<tr><td>Size</td><td>{size} bytes</td></tr>"));
    }
    format!(
        "<h2>Document</h2><table>{}</table>",
        rows.concat()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use plagicheck_core::{ReportKind, ScoreResult};
    use uuid::Uuid;

    fn record_with(result: Option<ScoreResult>) -> ReportRecord {
        ReportRecord {
            id: Uuid::new_v4(),
            kind: ReportKind::Text,
            created_at: Utc::now(),
            meta: ReportMeta {
                word_count: 250,
                char_count: 1500,
                doc_hash: "deadbeef".into(),
                ..Default::default()
            },
            result,
        }
    }

    #[test]
    fn renders_percentages_and_sources() {
        let rec = record_with(Some(ScoreResult {
            originality: 74.0,
            plagiarism: 26.0,
            sources: vec![CandidateSource {
                title: "An <b>Example</b>".into(),
                url: "https://example.com/a?x=1&y=2".into(),
            }],
        }));
        let html = String::from_utf8(render_report(&rec.id.to_string(), Some(&rec))).unwrap();
        assert!(html.contains("74.0%"));
        assert!(html.contains("26.0%"));
        assert!(html.contains("https://example.com/a?x=1&amp;y=2"));
        // Titles are escaped, not injected.
        assert!(html.contains("An &lt;b&gt;Example&lt;/b&gt;"));
        assert!(html.contains("deadbeef"));
    }

    #[test]
    fn unknown_report_renders_demo_defaults() {
        let html = String::from_utf8(render_report("missing-id", None)).unwrap();
        assert!(html.contains("83.3%"));
        assert!(html.contains("16.7%"));
        assert!(html.contains("No matching sources"));
    }

    #[test]
    fn pending_result_renders_defaults_with_meta() {
        let rec = record_with(None);
        let html = String::from_utf8(render_report("r", Some(&rec))).unwrap();
        assert!(html.contains("83.3%"));
        assert!(html.contains("1500"));
    }
}
