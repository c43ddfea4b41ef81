//! Content-type inference from file extensions.

/// Fallback content type for anything without a known extension.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extension (with leading dot, lower-case) to content type.
const CONTENT_TYPES: &[(&str, &str)] = &[
    (".html", "text/html; charset=utf-8"),
    (".htm", "text/html; charset=utf-8"),
    (".js", "application/javascript"),
    (".mjs", "application/javascript"),
    (".css", "text/css"),
    (".json", "application/json"),
    (".map", "application/json"),
    (".webmanifest", "application/manifest+json"),
    (".svg", "image/svg+xml"),
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".gif", "image/gif"),
    (".webp", "image/webp"),
    (".avif", "image/avif"),
    (".ico", "image/x-icon"),
    (".woff", "font/woff"),
    (".woff2", "font/woff2"),
    (".ttf", "font/ttf"),
    (".otf", "font/otf"),
    (".wasm", "application/wasm"),
    (".txt", "text/plain; charset=utf-8"),
    (".xml", "application/xml"),
    (".pdf", "application/pdf"),
    (".mp4", "video/mp4"),
    (".webm", "video/webm"),
    (".mp3", "audio/mpeg"),
];

/// Returns the content type for a path based on its last `.` suffix.
///
/// The suffix is taken from the last `.` anywhere in the path, so a dotted
/// directory name with an extensionless file falls back to the default.
pub fn resolve(path: &str) -> &'static str {
    let Some(idx) = path.rfind('.') else {
        return DEFAULT_CONTENT_TYPE;
    };

    let extension = path[idx..].to_ascii_lowercase();
    CONTENT_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_extensions() {
        let expected = [
            ("/index.html", "text/html; charset=utf-8"),
            ("/app.js", "application/javascript"),
            ("/mod.mjs", "application/javascript"),
            ("/site.css", "text/css"),
            ("/data.json", "application/json"),
            ("/logo.svg", "image/svg+xml"),
            ("/a.png", "image/png"),
            ("/a.jpg", "image/jpeg"),
            ("/a.jpeg", "image/jpeg"),
            ("/a.gif", "image/gif"),
            ("/a.webp", "image/webp"),
            ("/favicon.ico", "image/x-icon"),
            ("/f.woff", "font/woff"),
            ("/f.woff2", "font/woff2"),
            ("/f.ttf", "font/ttf"),
            ("/pkg.wasm", "application/wasm"),
            ("/robots.txt", "text/plain; charset=utf-8"),
            ("/sitemap.xml", "application/xml"),
        ];

        for (path, content_type) in expected {
            assert_eq!(resolve(path), content_type, "path {}", path);
        }
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(resolve("/INDEX.HTML"), "text/html; charset=utf-8");
        assert_eq!(resolve("/Photo.JPG"), "image/jpeg");
    }

    #[test]
    fn test_no_extension_falls_back() {
        assert_eq!(resolve("/"), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolve("/LICENSE"), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(resolve("/archive.tar.zst"), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolve("/v1.2/readme"), DEFAULT_CONTENT_TYPE);
    }
}
