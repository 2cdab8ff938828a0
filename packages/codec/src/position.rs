/// Convert a character offset to a 1-indexed (line, column) pair
///
/// Lines are counted by cumulative newlines before `offset`. Offsets past the
/// end clamp to the position just after the last character.
pub fn offset_to_line_col(text: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;

    for (index, ch) in text.chars().enumerate() {
        if index >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

/// Convert a 1-indexed (line, column) pair to a character offset
///
/// A column past the end of its line clamps to the line's newline; a line past
/// the end of the text returns the text's character count.
pub fn line_col_to_offset(text: &str, target_line: usize, target_column: usize) -> usize {
    let target_line = target_line.max(1);
    let target_column = target_column.max(1);
    let mut line = 1;
    let mut column = 1;
    let mut count = 0;

    for (index, ch) in text.chars().enumerate() {
        count = index + 1;
        if line == target_line && (column == target_column || ch == '\n') {
            return index;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    count
}

/// Text of a 1-indexed line, without its line terminator
pub fn line_text(text: &str, line: usize) -> Option<&str> {
    if line == 0 {
        return None;
    }
    text.split('\n')
        .nth(line - 1)
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_line_col() {
        let text = "line 1\nline 2\nline 3";

        assert_eq!(offset_to_line_col(text, 0), (1, 1));
        assert_eq!(offset_to_line_col(text, 7), (2, 1));
        assert_eq!(offset_to_line_col(text, 10), (2, 4));
        assert_eq!(offset_to_line_col(text, 14), (3, 1));
    }

    #[test]
    fn test_line_col_to_offset() {
        let text = "line 1\nline 2\nline 3";

        assert_eq!(line_col_to_offset(text, 1, 1), 0);
        assert_eq!(line_col_to_offset(text, 2, 1), 7);
        assert_eq!(line_col_to_offset(text, 2, 4), 10);
        assert_eq!(line_col_to_offset(text, 3, 1), 14);
    }

    #[test]
    fn test_roundtrip() {
        let text = "name: test\nconfig:\n  host: localhost";
        for offset in [0, 5, 11, 20, 25] {
            let (line, column) = offset_to_line_col(text, offset);
            assert_eq!(line_col_to_offset(text, line, column), offset);
        }
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "日本語\ntext";
        assert_eq!(offset_to_line_col(text, 4), (2, 1));
        assert_eq!(line_col_to_offset(text, 2, 1), 4);
    }

    #[test]
    fn test_out_of_bounds() {
        let text = "short";
        assert_eq!(offset_to_line_col(text, 1000), (1, 6));
        assert_eq!(line_col_to_offset(text, 10, 1), 5);
        assert_eq!(line_col_to_offset(text, 1, 99), 5);
    }

    #[test]
    fn test_line_text() {
        let text = "a: 1\r\nb: 2\n";
        assert_eq!(line_text(text, 1), Some("a: 1"));
        assert_eq!(line_text(text, 2), Some("b: 2"));
        assert_eq!(line_text(text, 3), Some(""));
        assert_eq!(line_text(text, 4), None);
        assert_eq!(line_text(text, 0), None);
    }
}
