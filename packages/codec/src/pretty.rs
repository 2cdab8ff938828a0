//! Human-readable parse error reports

use crate::error::ParseError;
use ariadne::{Color, Config, Label, Report, ReportKind, Source};

/// Render `error` as an annotated source excerpt
///
/// Falls back to the plain `Display` form if the report cannot be written.
pub fn render(error: &ParseError, name: &str, text: &str, color: bool) -> String {
    let len = text.chars().count();
    let start = error.offset.min(len);
    let end = (start + 1).min(len).max(start);

    let report = Report::build(ReportKind::Error, name, start)
        .with_config(Config::default().with_color(color))
        .with_message(&error.message)
        .with_label(
            Label::new((name, start..end))
                .with_message(format!("line {}, column {}", error.line, error.column))
                .with_color(Color::Red),
        )
        .finish();

    let mut out = Vec::new();
    match report.write((name, Source::from(text)), &mut out) {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, Format};

    #[test]
    fn test_render_mentions_message_and_name() {
        let text = "{\n  \"a\": \n}";
        let err = parse(text, Format::Flow).unwrap_err();
        let rendered = render(&err, "doc.json", text, false);
        assert!(rendered.contains("doc.json"));
        assert!(rendered.contains(&err.message));
    }
}
