// crates/mm_report/src/render_html.rs
//
// Deterministic, offline HTML renderer. Single self-contained page: inline
// CSS, no scripts, no external assets. Every content field is escaped.
// Section order: Cover → Snapshot → Summary → Matchups → Strengths →
// Weaknesses → Suggestions → Integrity.

use std::fmt::Write as _;

use crate::structure::{InsightRow, MatchupRow, ReportModel};

// ------------------------- formatting helpers -------------------------

/// Escape text for HTML (minimal, deterministic).
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

// ------------------------- HTML builder -------------------------

pub struct HtmlBuilder {
    buf: String,
}

impl Default for HtmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlBuilder {
    pub fn new() -> Self {
        Self { buf: String::with_capacity(16 * 1024) }
    }

    /// Start document with minimal head.
    pub fn start(&mut self, title: &str) {
        let _ = write!(
            self.buf,
            "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\
             <title>{}</title>\
             <style>\
             body{{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu,Arial,sans-serif;margin:24px;}}\
             h1,h2,h3{{margin:0.2em 0;}}\
             .kv ul{{list-style:none;padding-left:0}}\
             .kv li{{margin:2px 0}}\
             .muted{{opacity:0.8}}\
             .pill{{display:inline-block;padding:.2em .6em;border-radius:9999px;background:#eee}}\
             .observed{{background:#d9f2d9}}.heuristic{{background:#fff1c2}}.baseline{{background:#eee}}\
             table{{border-collapse:collapse}}\
             td,th{{padding:4px 8px;border-bottom:1px solid #ddd;text-align:left}}\
             </style></head><body>",
            esc(title)
        );
    }

    pub fn finish(mut self) -> String {
        self.buf.push_str("</body></html>");
        self.buf
    }

    pub fn section_cover(&mut self, title: &str, archetype: &str, similarity: &str) {
        let _ = write!(
            self.buf,
            "<h1>{}</h1><p class=\"muted\">Archetype: <b>{}</b> (similarity {})</p>",
            esc(title),
            esc(archetype),
            esc(similarity)
        );
    }

    pub fn section_kv<'b, I>(&mut self, heading: &str, items: I)
    where
        I: IntoIterator<Item = (&'b str, &'b str)>,
    {
        let _ = write!(self.buf, "<h3>{}</h3><div class=\"kv\"><ul>", esc(heading));
        for (k, v) in items {
            let _ = write!(self.buf, "<li><b>{}</b>: {}</li>", esc(k), esc(v));
        }
        self.buf.push_str("</ul></div>");
    }

    pub fn section_matchups(&mut self, rows: &[MatchupRow]) {
        self.buf.push_str("<h3>Matchups</h3>");
        if rows.is_empty() {
            self.buf.push_str("<p class=\"muted\">No opponents.</p>");
            return;
        }
        self.buf.push_str(
            "<table><thead><tr><th>Opponent</th><th>Win rate</th><th>Confidence</th>\
             <th>Source</th><th>Notes</th></tr></thead><tbody>",
        );
        for r in rows {
            let _ = write!(
                self.buf,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td><span class=\"pill {}\">{}</span></td><td>{}</td></tr>",
                esc(&r.opponent),
                esc(&r.win_rate_pct),
                esc(&r.confidence_pct),
                esc(&r.rationale),
                esc(&r.rationale),
                esc(&r.notes)
            );
        }
        self.buf.push_str("</tbody></table>");
    }

    pub fn section_insights(&mut self, heading: &str, rows: &[InsightRow]) {
        let _ = write!(self.buf, "<h3>{}</h3>", esc(heading));
        if rows.is_empty() {
            self.buf.push_str("<p class=\"muted\">None.</p>");
            return;
        }
        self.buf.push_str("<ol>");
        for r in rows {
            let _ = write!(
                self.buf,
                "<li><b>{}</b>: {} win rate, {} of the meta <span class=\"pill {}\">{}</span></li>",
                esc(&r.opponent),
                esc(&r.win_rate_pct),
                esc(&r.meta_share_pct),
                esc(&r.rationale),
                esc(&r.rationale)
            );
        }
        self.buf.push_str("</ol>");
    }

    pub fn section_suggestions(&mut self, suggestions: &[String]) {
        self.buf.push_str("<h3>Suggestions</h3>");
        if suggestions.is_empty() {
            self.buf.push_str("<p class=\"muted\">Nothing actionable.</p>");
            return;
        }
        self.buf.push_str("<ul>");
        for s in suggestions {
            let _ = write!(self.buf, "<li>{}</li>", esc(s));
        }
        self.buf.push_str("</ul>");
    }
}

// ------------------------- top-level entry -------------------------

pub fn render_html(model: &ReportModel) -> String {
    let mut h = HtmlBuilder::new();
    h.start(&model.cover.title);
    h.section_cover(&model.cover.title, &model.cover.archetype, &model.cover.similarity_pct);
    h.section_kv("Snapshot", model.snapshot.items.iter().map(|it| (it.key.as_str(), it.value.as_str())));

    let s = &model.summary;
    let counts = format!(
        "{} opponents: {} observed, {} heuristic, {} baseline",
        s.opponents, s.observed, s.heuristic, s.baseline
    );
    h.section_kv(
        "Summary",
        [
            ("Overall meta score", s.overall_meta_score_pct.as_str()),
            ("Position", s.position.as_str()),
            ("Estimates", counts.as_str()),
        ],
    );

    h.section_matchups(&model.matchups);
    h.section_insights("Strengths", &model.strengths);
    h.section_insights("Weaknesses", &model.weaknesses);
    h.section_suggestions(&model.suggestions);

    let i = &model.integrity;
    h.section_kv(
        "Integrity",
        [
            ("Comparison", i.comparison_id.as_str()),
            ("Snapshot", i.snapshot_id.as_str()),
            ("Snapshot SHA-256", i.snapshot_sha256.as_str()),
        ],
    );
    h.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(esc("<b>\"Tom & Jerry's\"</b>"), "&lt;b&gt;&quot;Tom &amp; Jerry&#x27;s&quot;&lt;/b&gt;");
    }

    #[test]
    fn empty_sections_say_so() {
        let mut h = HtmlBuilder::new();
        h.section_matchups(&[]);
        h.section_suggestions(&[]);
        let html = h.finish();
        assert!(html.contains("No opponents."));
        assert!(html.contains("Nothing actionable."));
    }
}
