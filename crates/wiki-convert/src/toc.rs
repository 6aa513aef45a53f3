//! Heading anchors and table-of-contents assembly.

use std::collections::HashMap;

use wiki_link::webalize;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (1-6) as rendered.
    pub level: u8,
    /// Heading text without inline markup.
    pub title: String,
    /// Anchor id, `toc-` prefixed.
    pub id: String,
}

/// How the table of contents is produced for a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TocMode {
    /// Decide from the rendered length: long documents get one.
    #[default]
    Auto,
    /// Never emit a table of contents.
    Off,
    /// Always emit one.
    Full,
    /// Keep the page-title heading as the first entry, demoted one level.
    Title,
}

impl TocMode {
    /// Interpret a `{{toc}}` directive payload.
    pub(crate) fn from_directive(raw: &str) -> Self {
        match raw {
            "" | "no" => Self::Off,
            "title" => Self::Title,
            _ => Self::Full,
        }
    }
}

/// Rendered length above which [`TocMode::Auto`] turns the TOC on.
const AUTO_THRESHOLD: usize = 4000;

/// Assemble the final table of contents from the collected headings.
///
/// The first heading is the page title: every mode drops it except
/// [`TocMode::Title`], which keeps it with its level bumped.
pub(crate) fn assemble(headings: Vec<TocEntry>, mode: TocMode, html_len: usize) -> Vec<TocEntry> {
    let enabled = match mode {
        TocMode::Auto => html_len > AUTO_THRESHOLD,
        TocMode::Off => false,
        TocMode::Full | TocMode::Title => true,
    };
    if !enabled {
        return Vec::new();
    }

    let mut toc: Vec<TocEntry> = headings
        .into_iter()
        .filter(|entry| !entry.title.is_empty())
        .collect();
    if mode == TocMode::Title {
        if let Some(first) = toc.first_mut() {
            first.level += 1;
        }
    } else if !toc.is_empty() {
        toc.remove(0);
    }
    toc
}

/// Generates unique `toc-` anchor ids for headings.
///
/// Repeated heading texts get a numeric suffix so every anchor stays
/// addressable (`toc-faq`, `toc-faq-1`, ...).
#[derive(Default)]
pub(crate) struct AnchorIds {
    counts: HashMap<String, usize>,
}

impl AnchorIds {
    pub(crate) fn generate(&mut self, text: &str) -> String {
        let base = format!("toc-{}", webalize(text));
        let count = self.counts.entry(base.clone()).or_default();
        let id = match *count {
            0 => base,
            n => format!("{base}-{n}"),
        };
        *count += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(level: u8, title: &str) -> TocEntry {
        TocEntry {
            level,
            title: title.to_owned(),
            id: format!("toc-{}", webalize(title)),
        }
    }

    #[test]
    fn test_mode_from_directive() {
        assert_eq!(TocMode::from_directive("no"), TocMode::Off);
        assert_eq!(TocMode::from_directive(""), TocMode::Off);
        assert_eq!(TocMode::from_directive("title"), TocMode::Title);
        assert_eq!(TocMode::from_directive("yes"), TocMode::Full);
    }

    #[test]
    fn test_auto_mode_follows_length() {
        let headings = vec![entry(1, "Title"), entry(2, "Section")];
        assert!(assemble(headings.clone(), TocMode::Auto, 100).is_empty());

        let toc = assemble(headings, TocMode::Auto, 5000);
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].title, "Section");
    }

    #[test]
    fn test_full_mode_drops_the_title_heading() {
        let toc = assemble(
            vec![entry(1, "Title"), entry(2, "A"), entry(2, "B")],
            TocMode::Full,
            0,
        );
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].title, "A");
    }

    #[test]
    fn test_title_mode_keeps_and_demotes_the_first_entry() {
        let toc = assemble(vec![entry(1, "Title"), entry(2, "A")], TocMode::Title, 0);
        assert_eq!(toc.len(), 2);
        assert_eq!((toc[0].level, toc[0].title.as_str()), (2, "Title"));
    }

    #[test]
    fn test_untitled_headings_are_skipped() {
        let toc = assemble(
            vec![entry(1, "Title"), entry(2, ""), entry(2, "A")],
            TocMode::Full,
            0,
        );
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].title, "A");
    }

    #[test]
    fn test_off_mode_is_empty() {
        let toc = assemble(vec![entry(1, "Title"), entry(2, "A")], TocMode::Off, 100_000);
        assert!(toc.is_empty());
    }

    #[test]
    fn test_anchor_ids_deduplicate() {
        let mut ids = AnchorIds::default();
        assert_eq!(ids.generate("FAQ"), "toc-faq");
        assert_eq!(ids.generate("FAQ"), "toc-faq-1");
        assert_eq!(ids.generate("FAQ"), "toc-faq-2");
        assert_eq!(ids.generate("Other"), "toc-other");
    }
}
