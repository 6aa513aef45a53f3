//! Fenced code block rendering with a pluggable highlighter.

use std::fmt::Write;

use crate::renderer::escape_html;

/// Syntax-highlighting hook for fenced code blocks.
///
/// Highlighting itself lives outside this crate; implementations return the
/// HTML body for the `<code>` element, or `None` to fall back to plain
/// escaping. The language passed in is already canonicalized via the alias
/// table (`latte` → `html`, `javascript` → `js`, ...).
pub trait Highlighter: Send + Sync {
    /// Produce highlighted HTML for `source`, or `None` when the language is
    /// not supported.
    fn highlight(&self, lang: &str, source: &str) -> Option<String>;
}

/// Map an authored fence language onto its canonical highlight name.
pub(crate) fn canonical_lang(lang: &str) -> String {
    let lang = lang.to_ascii_lowercase();
    match lang.as_str() {
        "htmlcb" | "latte" => "html".to_owned(),
        "javascript" => "js".to_owned(),
        _ => lang,
    }
}

/// Render one fenced code block into `out`.
pub(crate) fn render(
    lang: Option<&str>,
    source: &str,
    highlighter: Option<&dyn Highlighter>,
    out: &mut String,
) {
    match lang {
        Some(lang) => {
            let lang = canonical_lang(lang);
            let body = highlighter
                .and_then(|h| h.highlight(&lang, source))
                .unwrap_or_else(|| escape_html(source));
            write!(
                out,
                r#"<pre class="src-{}"><code>{body}</code></pre>"#,
                escape_html(&lang)
            )
            .unwrap();
        }
        None => {
            write!(out, "<pre><code>{}</code></pre>", escape_html(source)).unwrap();
        }
    }
}
