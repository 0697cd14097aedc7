//! Posting Text Normalizer — turns raw job-posting HTML into structured
//! fields ready for requirement extraction.
//!
//! Recognized boards (Greenhouse, Lever) get host-specific handling; anything
//! else falls through to generic metadata extraction. Normalization never
//! fails: missing structure lowers `confidence` and appends a warning, and
//! unfound fields default to "Unknown".

use std::collections::HashMap;

use regex::Regex;
use tracing::debug;

/// Structured fields recovered from one posting page, before requirement
/// extraction.
#[derive(Debug, Clone, Default)]
pub struct NormalizedPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub responsibilities: Vec<String>,
    pub qualifications: Vec<String>,
    pub benefits: Vec<String>,
    pub salary_range: Option<String>,
    pub employment_type: Option<String>,
    pub remote_policy: Option<String>,
    pub confidence: f32,
    pub warnings: Vec<String>,
    /// Which extractor produced the fields ("greenhouse", "lever", "generic").
    pub source: String,
}

const BASE_CONFIDENCE_RECOGNIZED: f32 = 0.8;
const BASE_CONFIDENCE_GENERIC: f32 = 0.6;
const MISSING_FIELD_PENALTY: f32 = 0.1;

/// Section headings that mark a qualifications block.
const QUALIFICATION_HEADINGS: &[&str] = &[
    "requirement",
    "qualification",
    "looking for",
    "what you",
    "must have",
    "about you",
];

const RESPONSIBILITY_HEADINGS: &[&str] =
    &["responsibilit", "what you'll do", "the role", "day to day"];

const BENEFIT_HEADINGS: &[&str] = &["benefit", "perk", "what we offer", "compensation"];

pub struct PostingNormalizer {
    script_re: Regex,
    style_re: Regex,
    noscript_re: Regex,
    comment_re: Regex,
    tag_re: Regex,
    title_re: Regex,
    h1_re: Regex,
    app_title_re: Regex,
    // Meta tags come in both attribute orders in the wild.
    meta_name_first_re: Regex,
    meta_content_first_re: Regex,
    li_re: Regex,
    heading_re: Regex,
    salary_re: Regex,
    location_class_re: Regex,
    whitespace_re: Regex,
}

impl Default for PostingNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PostingNormalizer {
    pub fn new() -> Self {
        PostingNormalizer {
            script_re: re(r"(?is)<script[^>]*>.*?</script>"),
            style_re: re(r"(?is)<style[^>]*>.*?</style>"),
            noscript_re: re(r"(?is)<noscript[^>]*>.*?</noscript>"),
            comment_re: re(r"(?s)<!--.*?-->"),
            tag_re: re(r"(?s)<[^>]+>"),
            title_re: re(r"(?is)<title[^>]*>(.*?)</title>"),
            h1_re: re(r"(?is)<h1[^>]*>(.*?)</h1>"),
            app_title_re: re(r#"(?is)<h1[^>]*class="[^"]*app-title[^"]*"[^>]*>(.*?)</h1>"#),
            meta_name_first_re: re(
                r#"(?is)<meta\s+(?:property|name)="([^"]+)"\s+content="([^"]*)"[^>]*>"#,
            ),
            meta_content_first_re: re(
                r#"(?is)<meta\s+content="([^"]*)"\s+(?:property|name)="([^"]+)"[^>]*>"#,
            ),
            li_re: re(r"(?is)<li[^>]*>(.*?)</li>"),
            heading_re: re(r"(?is)<h[2-4][^>]*>(.*?)</h[2-4]>"),
            salary_re: re(r"(?i)\$\s?\d{2,3}(?:,\d{3})?(?:k)?\s*(?:-|to|–)\s*\$?\s?\d{2,3}(?:,\d{3})?(?:k)?"),
            location_class_re: re(
                r#"(?is)<[^>]+class="[^"]*location[^"]*"[^>]*>(.*?)</[a-z0-9]+>"#,
            ),
            whitespace_re: re(r"\s+"),
        }
    }

    /// Normalizes one page. Never errors; degraded extraction surfaces as
    /// lowered confidence plus warnings.
    pub fn normalize(&self, url: &str, html: &str) -> NormalizedPosting {
        let source = detect_source(url);
        debug!(source, url, "normalizing posting");

        let mut posting = match source {
            "greenhouse" => self.normalize_greenhouse(url, html),
            "lever" => self.normalize_lever(url, html),
            _ => self.normalize_generic(html),
        };
        posting.source = source.to_string();

        let visible = self.visible_text(html);
        if posting.description.is_empty() {
            posting.description = visible.clone();
        }
        if posting.salary_range.is_none() {
            posting.salary_range = self
                .salary_re
                .find(&visible)
                .map(|m| m.as_str().trim().to_string());
        }
        posting.employment_type = detect_employment_type(&visible);
        posting.remote_policy = detect_remote_policy(&visible);

        self.finalize(posting)
    }

    fn normalize_greenhouse(&self, url: &str, html: &str) -> NormalizedPosting {
        let mut posting = NormalizedPosting {
            confidence: BASE_CONFIDENCE_RECOGNIZED,
            ..Default::default()
        };

        // Greenhouse puts the job title in an `app-title` heading; the
        // company name is the board slug in the URL path.
        posting.title = self
            .capture(&self.app_title_re, html)
            .or_else(|| self.capture(&self.h1_re, html))
            .unwrap_or_default();
        posting.company = board_slug(url, "boards.greenhouse.io")
            .or_else(|| self.meta_value(html, "og:site_name"))
            .unwrap_or_default();
        posting.location = self.capture(&self.location_class_re, html).unwrap_or_default();

        self.fill_sections(html, &mut posting);
        posting
    }

    fn normalize_lever(&self, url: &str, html: &str) -> NormalizedPosting {
        let mut posting = NormalizedPosting {
            confidence: BASE_CONFIDENCE_RECOGNIZED,
            ..Default::default()
        };

        posting.title = self
            .capture(&self.h1_re, html)
            .or_else(|| self.meta_value(html, "og:title"))
            .unwrap_or_default();
        posting.company = board_slug(url, "jobs.lever.co")
            .or_else(|| self.meta_value(html, "og:site_name"))
            .unwrap_or_default();
        posting.location = self.capture(&self.location_class_re, html).unwrap_or_default();

        self.fill_sections(html, &mut posting);
        posting
    }

    fn normalize_generic(&self, html: &str) -> NormalizedPosting {
        let mut posting = NormalizedPosting {
            confidence: BASE_CONFIDENCE_GENERIC,
            ..Default::default()
        };

        posting.title = self
            .meta_value(html, "og:title")
            .or_else(|| self.capture(&self.h1_re, html))
            .or_else(|| self.capture(&self.title_re, html))
            .unwrap_or_default();
        posting.company = self
            .meta_value(html, "og:site_name")
            .or_else(|| title_suffix_company(&posting.title))
            .unwrap_or_default();
        posting.location = self.capture(&self.location_class_re, html).unwrap_or_default();
        if let Some(desc) = self.meta_value(html, "description") {
            posting.description = desc;
        }

        self.fill_sections(html, &mut posting);
        posting
    }

    /// Splits the page at h2-h4 headings and routes each heading's `li`
    /// items into qualifications/responsibilities/benefits. When no heading
    /// matches but the page has a sizable list, all items are treated as
    /// qualifications rather than dropped.
    fn fill_sections(&self, html: &str, posting: &mut NormalizedPosting) {
        let headings: Vec<(usize, usize, String)> = self
            .heading_re
            .captures_iter(html)
            .filter_map(|c| {
                let whole = c.get(0)?;
                let text = self.clean_fragment(c.get(1)?.as_str()).to_lowercase();
                Some((whole.start(), whole.end(), text))
            })
            .collect();

        for (i, (_, body_start, heading)) in headings.iter().enumerate() {
            let body_end = headings
                .get(i + 1)
                .map(|(next_start, _, _)| *next_start)
                .unwrap_or(html.len());
            let body = &html[*body_start..body_end];
            let items = self.list_items(body);
            if items.is_empty() {
                continue;
            }

            // Responsibilities first: "what you'll do" would otherwise hit
            // the looser "what you" qualification keyword.
            if RESPONSIBILITY_HEADINGS.iter().any(|k| heading.contains(k)) {
                posting.responsibilities.extend(items);
            } else if QUALIFICATION_HEADINGS.iter().any(|k| heading.contains(k)) {
                posting.qualifications.extend(items);
            } else if BENEFIT_HEADINGS.iter().any(|k| heading.contains(k)) {
                posting.benefits.extend(items);
            }
        }

        if posting.qualifications.is_empty() {
            let all_items = self.list_items(html);
            if all_items.len() > 2 {
                posting
                    .warnings
                    .push("no qualifications heading found; using all list items".to_string());
                posting.qualifications = all_items;
            }
        }
    }

    fn list_items(&self, html: &str) -> Vec<String> {
        self.li_re
            .captures_iter(html)
            .filter_map(|c| c.get(1))
            .map(|m| self.clean_fragment(m.as_str()))
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Applies missing-field penalties and defaults after extraction.
    fn finalize(&self, mut posting: NormalizedPosting) -> NormalizedPosting {
        if posting.title.is_empty() {
            posting.title = "Unknown".to_string();
            posting.warnings.push("could not extract job title".to_string());
            posting.confidence -= MISSING_FIELD_PENALTY;
        }
        if posting.company.is_empty() {
            posting.company = "Unknown".to_string();
            posting.warnings.push("could not extract company".to_string());
            posting.confidence -= MISSING_FIELD_PENALTY;
        }
        if posting.location.is_empty() {
            posting.location = "Unknown".to_string();
            posting.warnings.push("could not extract location".to_string());
            posting.confidence -= MISSING_FIELD_PENALTY;
        }
        if posting.qualifications.is_empty() {
            posting
                .warnings
                .push("no qualification lines found".to_string());
            posting.confidence -= MISSING_FIELD_PENALTY;
        }
        posting.confidence = posting.confidence.clamp(0.0, 1.0);
        posting
    }

    /// Page text with scripts, styles, comments, and tags removed.
    fn visible_text(&self, html: &str) -> String {
        let text = self.script_re.replace_all(html, " ");
        let text = self.style_re.replace_all(&text, " ");
        let text = self.noscript_re.replace_all(&text, " ");
        let text = self.comment_re.replace_all(&text, " ");
        let text = self.tag_re.replace_all(&text, " ");
        self.whitespace_re
            .replace_all(&decode_entities(&text), " ")
            .trim()
            .to_string()
    }

    fn clean_fragment(&self, fragment: &str) -> String {
        let text = self.tag_re.replace_all(fragment, " ");
        self.whitespace_re
            .replace_all(&decode_entities(&text), " ")
            .trim()
            .to_string()
    }

    fn capture(&self, regex: &Regex, html: &str) -> Option<String> {
        regex
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| self.clean_fragment(m.as_str()))
            .filter(|s| !s.is_empty())
    }

    /// Value of a meta tag by property/name, tolerating both attribute orders.
    fn meta_value(&self, html: &str, key: &str) -> Option<String> {
        let mut map: HashMap<String, String> = HashMap::new();
        for c in self.meta_name_first_re.captures_iter(html) {
            if let (Some(name), Some(content)) = (c.get(1), c.get(2)) {
                map.entry(name.as_str().to_lowercase())
                    .or_insert_with(|| content.as_str().to_string());
            }
        }
        for c in self.meta_content_first_re.captures_iter(html) {
            if let (Some(content), Some(name)) = (c.get(1), c.get(2)) {
                map.entry(name.as_str().to_lowercase())
                    .or_insert_with(|| content.as_str().to_string());
            }
        }
        map.get(key)
            .map(|v| decode_entities(v).trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex must compile")
}

/// Board-specific handling is keyed off the URL host.
fn detect_source(url: &str) -> &'static str {
    let lower = url.to_lowercase();
    if lower.contains("boards.greenhouse.io") || lower.contains("greenhouse.io/") {
        "greenhouse"
    } else if lower.contains("jobs.lever.co") {
        "lever"
    } else {
        "generic"
    }
}

/// First path segment after the board host, title-cased: the company slug on
/// Greenhouse/Lever URLs.
fn board_slug(url: &str, host: &str) -> Option<String> {
    let idx = url.find(host)?;
    let rest = &url[idx + host.len()..];
    let slug = rest
        .trim_start_matches('/')
        .split(['/', '?', '#'])
        .next()
        .filter(|s| !s.is_empty())?;
    let mut chars = slug.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().collect::<String>() + chars.as_str())
}

/// "Senior Engineer - Acme" / "Senior Engineer | Acme" → "Acme".
fn title_suffix_company(title: &str) -> Option<String> {
    for sep in [" | ", " - ", " – ", " at "] {
        if let Some((_, suffix)) = title.rsplit_once(sep) {
            let suffix = suffix.trim();
            if !suffix.is_empty() && suffix.len() < 60 {
                return Some(suffix.to_string());
            }
        }
    }
    None
}

fn detect_employment_type(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    for (signal, label) in [
        ("full-time", "Full-time"),
        ("full time", "Full-time"),
        ("part-time", "Part-time"),
        ("part time", "Part-time"),
        ("contract", "Contract"),
        ("internship", "Internship"),
    ] {
        if lower.contains(signal) {
            return Some(label.to_string());
        }
    }
    None
}

fn detect_remote_policy(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    // Hybrid before remote: hybrid postings usually mention both words.
    for (signal, label) in [
        ("hybrid", "Hybrid"),
        ("remote", "Remote"),
        ("on-site", "Onsite"),
        ("onsite", "Onsite"),
        ("in office", "Onsite"),
    ] {
        if lower.contains(signal) {
            return Some(label.to_string());
        }
    }
    None
}

/// Minimal entity decoding for the handful that show up in posting text.
fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
}
