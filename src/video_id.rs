//! Canonical video identifier extraction.
//!
//! Turns a YouTube URL in any of its common shapes into the 11-character
//! video token used as a style identifier.

use regex::Regex;

/// Resolves video references (bare IDs or URLs) to canonical video IDs.
pub struct VideoIdResolver {
    bare_id: Regex,
    url_patterns: Vec<Regex>,
}

impl VideoIdResolver {
    pub fn new() -> Self {
        let bare_id = Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("Invalid regex");

        // Tried in order; the first capture wins.
        let url_patterns = [
            r"(?x)
            (?:
                youtube\.com/watch\?v=
              | youtu\.be/
              | youtube\.com/embed/
              | youtube\.com/v/
              | youtube\.com/e/
              | youtube\.com/user/[^/]+/[^/]+/
              | youtube\.com/[^/]+/[^/]+/
              | youtube\.com/verify_age\?next_url=/watch%3Fv%3D
              | youtube\.com/get_video_info\?video_id=
              | youtube\.com/shorts/
            )
            ([A-Za-z0-9_-]{11})
            ",
            r"youtube\.com/watch\?.*?v=([A-Za-z0-9_-]{11})",
            r"youtube\.com/.*?\?.*?v=([A-Za-z0-9_-]{11})",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid regex"))
        .collect();

        Self {
            bare_id,
            url_patterns,
        }
    }

    /// Resolve a reference to a canonical video ID.
    ///
    /// Input that matches no known shape is returned unchanged, leaving it to
    /// the transcript provider to reject.
    pub fn resolve(&self, reference: &str) -> String {
        if self.bare_id.is_match(reference) {
            return reference.to_string();
        }

        self.url_patterns
            .iter()
            .find_map(|pattern| pattern.captures(reference))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| reference.to_string())
    }
}

impl Default for VideoIdResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_ids_unchanged() {
        let resolver = VideoIdResolver::new();
        for id in ["dQw4w9WgXcQ", "ABCDEFGHIJK", "a-b_c-d_e-f", "___________", "01234567890"] {
            assert_eq!(resolver.resolve(id), id);
        }
    }

    #[test]
    fn test_url_shapes() {
        let resolver = VideoIdResolver::new();
        let urls = [
            "https://www.youtube.com/watch?v=ABCDEFGHIJK",
            "https://youtube.com/watch?v=ABCDEFGHIJK&t=42s",
            "https://youtu.be/ABCDEFGHIJK",
            "https://youtu.be/ABCDEFGHIJK?si=share",
            "https://www.youtube.com/embed/ABCDEFGHIJK",
            "https://www.youtube.com/v/ABCDEFGHIJK",
            "https://www.youtube.com/e/ABCDEFGHIJK",
            "https://www.youtube.com/user/someone/u/ABCDEFGHIJK",
            "https://www.youtube.com/verify_age?next_url=/watch%3Fv%3DABCDEFGHIJK",
            "https://www.youtube.com/get_video_info?video_id=ABCDEFGHIJK",
            "https://www.youtube.com/shorts/ABCDEFGHIJK",
            "https://www.youtube.com/watch?feature=share&v=ABCDEFGHIJK",
            "https://www.youtube.com/attribution_link?a=x&v=ABCDEFGHIJK",
        ];

        for url in urls {
            assert_eq!(resolver.resolve(url), "ABCDEFGHIJK", "url: {}", url);
        }
    }

    #[test]
    fn test_unrecognized_input_unchanged() {
        let resolver = VideoIdResolver::new();
        for input in ["not-a-url", "", "https://vimeo.com/12345", "tooshort", "ABCDEFGHIJ!"] {
            assert_eq!(resolver.resolve(input), input);
        }
    }
}
