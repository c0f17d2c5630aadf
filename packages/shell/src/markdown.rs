//! The Markdown subset `cat` renders for `.md` files.
//!
//! Substitutions run in a fixed order, one pass each, so the output for
//! nested or overlapping markup follows from that order alone.

use lazy_static::lazy_static;
use regex::Regex;

// CRLF mode keeps `.` and the line anchors off `\r`, so files saved with
// Windows line endings render like their `\n` counterparts.
lazy_static! {
    static ref H1: Regex = Regex::new(r"(?mR)^# (.+)").unwrap();
    static ref H2: Regex = Regex::new(r"(?mR)^## (.+)").unwrap();
    static ref H3: Regex = Regex::new(r"(?mR)^### (.+)").unwrap();
    static ref BOLD: Regex = Regex::new(r"(?R)\*\*(.+?)\*\*").unwrap();
    static ref ITALIC: Regex = Regex::new(r"(?R)\*(.+?)\*").unwrap();
    static ref IMAGE: Regex = Regex::new(r"(?R)!\[(.*?)\]\((.+?)\)").unwrap();
    static ref LINK: Regex = Regex::new(r"(?R)\[(.+?)\]\((.+?)\)").unwrap();
}

/// Render Markdown to an HTML fragment.
pub fn render(source: &str) -> String {
    let html = H1.replace_all(source, "<h1>${1}</h1>");
    let html = H2.replace_all(&html, "<h2>${1}</h2>");
    let html = H3.replace_all(&html, "<h3>${1}</h3>");
    let html = BOLD.replace_all(&html, "<strong>${1}</strong>");
    let html = ITALIC.replace_all(&html, "<em>${1}</em>");
    let html = IMAGE.replace_all(&html, r#"<img alt="${1}" src="${2}" />"#);
    let html = LINK.replace_all(&html, r#"<a href="${2}" target="_blank">${1}</a>"#);
    line_breaks(&html)
}

/// Plain text with newlines turned into `<br>`.
pub fn line_breaks(text: &str) -> String {
    text.replace('\n', "<br>")
}
