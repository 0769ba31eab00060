//! Video source URL normalization.

const EMBED_PREFIX: &str = "https://www.youtube.com/embed/";

/// Normalize YouTube share/watch/shorts/live/embed links to an embed URL.
///
/// Anything else (direct MP4 links, other hosts) is returned trimmed.
pub fn normalize_video_url(url: &str) -> String {
    let url = url.trim();
    youtube_id(url)
        .map(|id| format!("{EMBED_PREFIX}{id}"))
        .unwrap_or_else(|| url.to_owned())
}

fn youtube_id(url: &str) -> Option<&str> {
    const PATH_MARKERS: [&str; 3] = [
        "youtube.com/shorts/",
        "youtube.com/live/",
        "youtube.com/embed/",
    ];

    after(url, "youtu.be/")
        .or_else(|| after(url, "?v="))
        .or_else(|| after(url, "&v="))
        .or_else(|| PATH_MARKERS.iter().find_map(|marker| after(url, marker)))
        .and_then(id_prefix)
}

fn after<'a>(haystack: &'a str, marker: &str) -> Option<&'a str> {
    haystack
        .find(marker)
        .map(|start| &haystack[start + marker.len()..])
}

fn id_prefix(rest: &str) -> Option<&str> {
    let end = rest
        .find(|c| matches!(c, '?' | '&' | '#' | '/'))
        .unwrap_or(rest.len());
    let id = &rest[..end];
    (!id.is_empty()).then_some(id)
}
