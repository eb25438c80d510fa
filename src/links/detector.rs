/// Find HTTP/HTTPS URLs in free text, in order of appearance.
///
/// A URL is the `scheme://` marker plus everything up to the next
/// whitespace. Duplicates are kept: every occurrence is classified and
/// reported independently downstream.
pub fn detect_urls(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(url_in_token)
        .map(str::to_string)
        .collect()
}

fn url_in_token(token: &str) -> Option<&str> {
    let start = token
        .find("https://")
        .or_else(|| token.find("http://"))?;
    Some(&token[start..])
}
