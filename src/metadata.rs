use std::collections::BTreeMap;

/// the line that opens and closes a metadata block
pub const DELIMITER: &str = "---";

/// the metadata associated with a page, every value is a plain string
pub type Metadata = BTreeMap<String, String>;

/// split a page source into its metadata and the body that follows it
///
/// a source without a complete metadata block is all body, with no metadata
pub fn parse(text: &str) -> (Metadata, &str) {
    let Some((block, body)) = split(text) else {
        return (Metadata::new(), text);
    };

    let mut metadata = Metadata::new();
    for line in block.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match line.split_once(':') {
            Some((key, value)) => {
                metadata.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => log::debug!("Skipping metadata line without a `:`: {line}"),
        }
    }
    (metadata, body)
}

/// find the text between the delimiters and the text after the closing one
fn split(text: &str) -> Option<(&str, &str)> {
    let (first, rest) = next_line(text)?;
    if first != DELIMITER {
        return None;
    }

    let mut offset = 0;
    while offset < rest.len() {
        let (line, remaining) = next_line(&rest[offset..])?;
        if line.trim() == DELIMITER {
            return Some((&rest[..offset], remaining));
        }
        offset = rest.len() - remaining.len();
    }
    None
}

/// the first line without its line ending, and everything after it
fn next_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    let (line, rest) = match text.find('\n') {
        Some(end) => (&text[..end], &text[end + 1..]),
        None => (text, ""),
    };
    Some((line.strip_suffix('\r').unwrap_or(line), rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block() {
        let (meta, body) = parse("---\ntitle:  Hi  \nlayout: custom\n---\n<p>Hello</p>");
        assert_eq!(meta.len(), 2);
        assert_eq!(meta["title"], "Hi");
        assert_eq!(meta["layout"], "custom");
        assert_eq!(body, "<p>Hello</p>");
    }

    #[test]
    fn test_value_splits_on_first_colon() {
        let (meta, _) = parse("---\nlink: https://example.com:8080/a\n---\n");
        assert_eq!(meta["link"], "https://example.com:8080/a");
    }

    #[test]
    fn test_no_block_is_all_body() {
        let text = "# Just markdown\n\nno metadata here";
        let (meta, body) = parse(text);
        assert!(meta.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_unclosed_block_is_all_body() {
        let text = "---\ntitle: Hi\n<p>never closed</p>";
        let (meta, body) = parse(text);
        assert!(meta.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_delimiter_must_start_text() {
        let text = "\n---\ntitle: Hi\n---\nbody";
        let (meta, body) = parse(text);
        assert!(meta.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_crlf_and_junk_lines() {
        let (meta, body) = parse("---\r\ntitle: Hi\r\n\r\nnot a pair\r\n---\r\nbody\r\n");
        assert_eq!(meta.len(), 1);
        assert_eq!(meta["title"], "Hi");
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn test_empty_block() {
        let (meta, body) = parse("---\n---\nbody");
        assert!(meta.is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_later_delimiters_stay_in_body() {
        let (meta, body) = parse("---\na: 1\n---\nbefore\n---\nafter");
        assert_eq!(meta["a"], "1");
        assert_eq!(body, "before\n---\nafter");
    }

    #[test]
    fn test_closing_delimiter_is_whole_line() {
        // a line that only starts with or contains the delimiter doesn't close the block
        let text = "---\na: 1\n----\nb: x --- y\n--- end\n";
        let (meta, body) = parse(text);
        assert!(meta.is_empty());
        assert_eq!(body, text);

        let (meta, body) = parse("---\na: 1\n  ---  \nbody");
        assert_eq!(meta["a"], "1");
        assert_eq!(body, "body");
    }
}
