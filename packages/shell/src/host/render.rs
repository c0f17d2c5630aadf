//! Scrollback HTML to terminal text.
//!
//! Only the tags the shell itself produces are understood; anything else
//! is printed as-is.

use lazy_static::lazy_static;
use nu_ansi_term::{Color, Style};
use regex::{Captures, Regex};

lazy_static! {
    static ref H1: Regex = Regex::new(r"<h1>(.*?)</h1>").unwrap();
    static ref H2: Regex = Regex::new(r"<h2>(.*?)</h2>").unwrap();
    static ref H3: Regex = Regex::new(r"<h3>(.*?)</h3>").unwrap();
    static ref STRONG: Regex = Regex::new(r"<strong>(.*?)</strong>").unwrap();
    static ref EM: Regex = Regex::new(r"<em>(.*?)</em>").unwrap();
    static ref IMG: Regex = Regex::new(r#"<img alt="(.*?)" src="(.*?)" />"#).unwrap();
    static ref LINK: Regex = Regex::new(r#"<a href="(.*?)" target="_blank">(.*?)</a>"#).unwrap();
    static ref LIST_ITEM: Regex = Regex::new(r"<li>(.*?)</li>").unwrap();
    static ref LIST: Regex = Regex::new(r"</?ul>").unwrap();
}

fn styled(re: &Regex, text: &str, style: Style) -> String {
    re.replace_all(text, |caps: &Captures| style.paint(&caps[1]).to_string())
        .into_owned()
}

/// Convert an HTML fragment from the scrollback to ANSI-styled text.
pub fn html_to_ansi(html: &str) -> String {
    let text = LIST_ITEM.replace_all(html, "\n  ${1}");
    let text = LIST.replace_all(&text, "");
    let text = styled(&H1, &text, Color::Magenta.bold().underline());
    let text = styled(&H2, &text, Color::Cyan.bold());
    let text = styled(&H3, &text, Style::new().bold());
    let text = styled(&STRONG, &text, Style::new().bold());
    let text = styled(&EM, &text, Style::new().italic());
    let text = IMG.replace_all(&text, |caps: &Captures| {
        Style::new()
            .dimmed()
            .paint(format!("[image: {}]({})", &caps[1], &caps[2]))
            .to_string()
    });
    let text = LINK.replace_all(&text, |caps: &Captures| {
        format!(
            "{} ({})",
            Color::Blue.underline().paint(&caps[2]),
            &caps[1]
        )
    });
    text.replace("<br>", "\n")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}
