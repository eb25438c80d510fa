/// Split a reply into chunks that fit a channel's message-length cap.
///
/// Splits on line boundaries (the consolidated summary keeps one link per
/// line) and falls back to a hard character split for a single oversized
/// line. Concatenating the chunks reproduces the input exactly.
#[must_use]
pub fn chunk_message(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() || max_chars == 0 {
        return Vec::new();
    }
    if char_count(text) <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split_inclusive('\n') {
        if !current.is_empty() && char_count(&current) + char_count(line) > max_chars {
            chunks.push(std::mem::take(&mut current));
        }

        if char_count(line) > max_chars {
            for piece in hard_split(line, max_chars) {
                if char_count(&piece) == max_chars {
                    chunks.push(piece);
                } else {
                    // Shorter tail keeps accumulating with following lines.
                    current = piece;
                }
            }
        } else {
            current.push_str(line);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn char_count(text: &str) -> usize {
    text.chars().count()
}

fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut len = 0;

    for ch in text.chars() {
        if len == max_chars {
            pieces.push(std::mem::take(&mut piece));
            len = 0;
        }
        piece.push(ch);
        len += 1;
    }

    if !piece.is_empty() {
        pieces.push(piece);
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::chunk_message;

    #[test]
    fn empty_message() {
        assert!(chunk_message("", 10).is_empty());
    }

    #[test]
    fn short_message_untouched() {
        assert_eq!(chunk_message("hello", 10), vec!["hello"]);
    }

    #[test]
    fn splits_on_line_boundaries() {
        let text = "first line\nsecond line\nthird line\n";
        let chunks = chunk_message(text, 24);
        assert!(chunks.iter().all(|c| c.chars().count() <= 24));
        assert_eq!(chunks.concat(), text);
        assert!(chunks[0].ends_with('\n'));
    }

    #[test]
    fn oversized_line_hard_split() {
        let text = "https://example.com/".repeat(20);
        let chunks = chunk_message(&text, 30);
        assert!(chunks.iter().all(|c| c.chars().count() <= 30));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn unicode_counted_by_character() {
        let text = "🦀🦀🦀🦀🦀🦀🦀";
        let chunks = chunk_message(text, 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 3));
        assert_eq!(chunks.concat(), text);
    }
}
