//! HTML formatting helpers for [`ParseMode::Html`](crate::types::ParseMode) text.

pub fn bold(text: &str) -> String {
    format!("<b>{}</b>", text)
}

pub fn italic(text: &str) -> String {
    format!("<i>{}</i>", text)
}

pub fn underline(text: &str) -> String {
    format!("<u>{}</u>", text)
}

pub fn strikethrough(text: &str) -> String {
    format!("<s>{}</s>", text)
}

pub fn blockquote(text: &str) -> String {
    format!("<blockquote>{}</blockquote>", text)
}

pub fn code(text: &str) -> String {
    format!("<code>{}</code>", text)
}

pub fn pre_code(lang: &str, text: &str) -> String {
    format!("<pre><code class=\"{}\">{}</code></pre>", lang, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrappers() {
        assert_eq!(bold("x"), "<b>x</b>");
        assert_eq!(pre_code("rust", "fn"), "<pre><code class=\"rust\">fn</code></pre>");
    }
}
