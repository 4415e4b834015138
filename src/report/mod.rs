//! HTML report composition.

use html_escape::encode_text;

use crate::models::SummaryEntry;

/// Compose one HTML document from the summaries and the error messages.
///
/// Every summary gets its own `<section>`; blank-line separated paragraphs
/// become `<p>` elements. An "Errors" section follows only when `errors` is
/// non-empty. All dynamic text is escaped.
pub fn compose_html(summaries: &[SummaryEntry], errors: &[String]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>PDF Summaries</title>\n</head>\n<body>\n",
    );

    for entry in summaries {
        html.push_str("<section class=\"summary\">\n<h2>");
        html.push_str(&encode_text(&entry.title));
        html.push_str("</h2>\n");
        let summary = normalize_newlines(&entry.summary);
        for paragraph in paragraphs(&summary) {
            html.push_str("<p>");
            html.push_str(&encode_text(paragraph).replace('\n', "<br>\n"));
            html.push_str("</p>\n");
        }
        html.push_str("</section>\n");
    }

    if !errors.is_empty() {
        html.push_str("<section class=\"errors\">\n<h2>Errors</h2>\n<ul>\n");
        for error in errors {
            html.push_str("<li>");
            html.push_str(&encode_text(error));
            html.push_str("</li>\n");
        }
        html.push_str("</ul>\n</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Model output may use CRLF or bare CR line endings.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_and_errors_sections() {
        let html = compose_html(
            &[SummaryEntry::new("a.pdf", "S1")],
            &["E1".to_string()],
        );

        assert_eq!(html.matches("<section class=\"summary\">").count(), 1);
        assert!(html.contains("<h2>a.pdf</h2>"));
        assert!(html.contains("<p>S1</p>"));
        assert!(html.contains("<h2>Errors</h2>"));
        assert!(html.contains("<li>E1</li>"));
        assert!(html.find("S1").unwrap() < html.find("Errors").unwrap());
    }

    #[test]
    fn test_no_errors_section_when_empty() {
        let html = compose_html(&[SummaryEntry::new("a.pdf", "S1")], &[]);
        assert!(!html.contains("Errors"));
        assert!(!html.contains("<ul>"));
    }

    #[test]
    fn test_summaries_keep_order() {
        let html = compose_html(
            &[
                SummaryEntry::new("first.pdf", "one"),
                SummaryEntry::new("second.pdf", "two"),
            ],
            &[],
        );
        assert!(html.find("first.pdf").unwrap() < html.find("second.pdf").unwrap());
    }

    #[test]
    fn test_dynamic_content_is_escaped() {
        let html = compose_html(
            &[SummaryEntry::new("<b>.pdf", "x < y & <script>alert(1)</script>")],
            &["bad <file>".to_string()],
        );

        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("x &lt; y &amp; &lt;script&gt;"));
        assert!(html.contains("<li>bad &lt;file&gt;</li>"));
    }

    #[test]
    fn test_paragraphs_and_line_breaks() {
        let html = compose_html(
            &[SummaryEntry::new("a.pdf", "First line\nsecond line\n\n\nNext paragraph")],
            &[],
        );
        assert!(html.contains("<p>First line<br>\nsecond line</p>"));
        assert!(html.contains("<p>Next paragraph</p>"));
    }

    #[test]
    fn test_crlf_summaries_split_into_paragraphs() {
        let html = compose_html(
            &[SummaryEntry::new("a.pdf", "First line\r\nsecond line\r\n\r\nNext paragraph\r\n")],
            &[],
        );
        assert!(html.contains("<p>First line<br>\nsecond line</p>"));
        assert!(html.contains("<p>Next paragraph</p>"));
        assert!(!html.contains('\r'));
    }
}
