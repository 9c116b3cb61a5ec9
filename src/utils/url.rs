//! URL helpers for building backend endpoint addresses.

/// Normalize a base URL by removing trailing slashes
///
/// ```
/// use mcpdeck::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://apps.example.com"), "https://apps.example.com");
/// assert_eq!(normalize_base_url("https://apps.example.com///"), "https://apps.example.com");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash between them.
///
/// ```
/// use mcpdeck::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://apps.example.com/", "/api/prompts"),
///     "https://apps.example.com/api/prompts"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

/// Percent-encode a single path segment so names containing `/`, spaces or
/// other reserved characters cannot escape their position in the URL.
///
/// ```
/// use mcpdeck::utils::url::encode_path_segment;
///
/// assert_eq!(encode_path_segment("summary"), "summary");
/// assert_eq!(encode_path_segment("a b/c"), "a%20b%2Fc");
/// ```
pub fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
