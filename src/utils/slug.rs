// src/utils/slug.rs

use regex::Regex;
use std::sync::OnceLock;

fn non_slug_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap())
}

/// Normalizes a tag name into its slug form: lowercased, any run of
/// non-alphanumeric characters collapsed into a single dash.
/// "Pop Music" and "pop   music" both resolve to "pop-music", so a
/// `#pop music` search finds articles tagged "Pop Music".
pub fn slugify(tag: &str) -> String {
    let lowered = tag.trim().to_lowercase();
    let slug = non_slug_chars().replace_all(&lowered, "-");
    slug.trim_matches('-').to_string()
}
