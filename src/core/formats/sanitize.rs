//! Markup stripping and single-line flattening for merged cue text.
//!
//! The merged cue format reserves its one newline for the boundary between
//! the two languages, so every fragment must become a single line first.
//! Markup removal is total: everything between `<` and `>` goes, without
//! pulling in an HTML parser for what subtitle files actually contain.

/// Remove every `<...>` run from the text. An unterminated `<` swallows the
/// rest of the line, which matches how players treat broken tags.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' if !in_tag => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Strip markup and replace every line break (`\r\n`, `\n`, or lone `\r`)
/// with a single space, trimming the ends.
pub fn flatten(text: &str) -> String {
    let stripped = strip_markup(text);
    let mut out = String::with_capacity(stripped.len());
    let mut chars = stripped.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
            }
            '\n' => out.push(' '),
            c => out.push(c),
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_simple_tags() {
        assert_eq!(strip_markup("<i>Hello</i>"), "Hello");
        assert_eq!(strip_markup("<b>Bold</b> and <u>under</u>"), "Bold and under");
    }

    #[test]
    fn test_strip_tags_with_attributes() {
        assert_eq!(
            strip_markup(r##"<font color="#ff0000">Red</font>"##),
            "Red"
        );
    }

    #[test]
    fn test_unterminated_tag_swallows_rest() {
        assert_eq!(strip_markup("before <broken rest"), "before ");
    }

    #[test]
    fn test_flatten_newlines() {
        assert_eq!(flatten("line one\nline two"), "line one line two");
        assert_eq!(flatten("a\r\nb\rc"), "a b c");
    }

    #[test]
    fn test_flatten_combined() {
        assert_eq!(
            flatten("<i>First line</i>\n<i>Second line</i>"),
            "First line Second line"
        );
    }

    #[test]
    fn test_flatten_trims() {
        assert_eq!(flatten("  padded  \n"), "padded");
    }
}
