//! Document conversion session.

use std::sync::Arc;

use wiki_link::{
    AttachmentStore, FsAttachmentStore, LinkResolver, PageContext, PageRef, Resolved, SitePaths,
};

use crate::code_block::Highlighter;
use crate::renderer::{RenderOptions, WikiRenderer};
use crate::script::{self, Script};
use crate::toc::{self, TocEntry, TocMode};

/// Session-owned accumulation lists, passed by reference into resolution
/// calls and read once when the conversion completes. Never shared between
/// documents.
#[derive(Default)]
pub(crate) struct ConvertState {
    pub errors: Vec<String>,
    pub links: Vec<PageRef>,
    pub langs: Vec<PageRef>,
    pub tags: Vec<String>,
}

/// Per-document settings collected from `{{command}}` scripts.
struct DocMeta {
    title_override: Option<String>,
    main_title: Option<String>,
    theme: Option<String>,
    theme_icon: Option<String>,
    sidebar: Option<bool>,
    toc_mode: TocMode,
    nofollow: bool,
    heading_top: u8,
}

impl Default for DocMeta {
    fn default() -> Self {
        Self {
            title_override: None,
            main_title: None,
            theme: None,
            theme_icon: None,
            sidebar: None,
            toc_mode: TocMode::Auto,
            nofollow: false,
            heading_top: 1,
        }
    }
}

/// Everything produced by converting one document.
#[derive(Clone, Debug)]
pub struct ConvertResult {
    /// Rendered HTML body.
    pub html: String,
    /// Page title: `{{title}}` override or the first heading's text.
    pub title: Option<String>,
    /// Site-level title from `{{maintitle}}`.
    pub main_title: Option<String>,
    /// Page theme from `{{theme}}`.
    pub theme: Option<String>,
    /// Resolved theme icon URL from `{{themeicon}}`.
    pub theme_icon: Option<String>,
    /// Sidebar visibility from `{{sidebar}}`; `None` when not set.
    pub sidebar: Option<bool>,
    /// Assembled table of contents.
    pub toc: Vec<TocEntry>,
    /// Cross-page references found in the document, normalized for
    /// dead-link checking and reverse indexes.
    pub links: Vec<PageRef>,
    /// Language-variant pages recorded by `{{lang}}`.
    pub langs: Vec<PageRef>,
    /// Tags recorded by `{{tags}}`.
    pub tags: Vec<String>,
    /// Non-fatal problems, in document order.
    pub errors: Vec<String>,
}

/// Converts one wiki page from markup to HTML.
///
/// Holds the current-page context and the site configuration; each
/// [`convert`](Self::convert) call owns its session state, so a `Convertor`
/// can be reused across revisions of the same page but never shares
/// bookkeeping between documents.
///
/// # Example
///
/// ```
/// use wiki_convert::Convertor;
///
/// let result = Convertor::new("doc", "en", "homepage")
///     .convert("{{tags: intro}}\n# Welcome\n");
/// assert_eq!(result.tags, vec!["intro".to_owned()]);
/// ```
pub struct Convertor {
    current: PageContext,
    paths: SitePaths,
    store: Arc<dyn AttachmentStore>,
    highlighter: Option<Arc<dyn Highlighter>>,
}

impl Convertor {
    /// Create a convertor for the page identified by `book`/`lang`/`name`.
    #[must_use]
    pub fn new(book: impl Into<String>, lang: impl Into<String>, name: impl Into<String>) -> Self {
        let paths = SitePaths::default();
        Self {
            store: Arc::new(FsAttachmentStore::new(&paths.attachment_dir)),
            current: PageContext::new(book, lang, name),
            paths,
            highlighter: None,
        }
    }

    /// Set the site paths and re-root the attachment store at
    /// `paths.attachment_dir`. Call before [`with_store`](Self::with_store)
    /// if both are used.
    #[must_use]
    pub fn with_paths(mut self, paths: SitePaths) -> Self {
        self.store = Arc::new(FsAttachmentStore::new(&paths.attachment_dir));
        self.paths = paths;
        self
    }

    /// Replace the attachment store (e.g. with a test double).
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn AttachmentStore>) -> Self {
        self.store = store;
        self
    }

    /// Install a syntax highlighter for fenced code blocks.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: Arc<dyn Highlighter>) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    /// Convert one document.
    ///
    /// Never fails: problems accumulate in [`ConvertResult::errors`] while
    /// the rest of the document still renders.
    #[must_use]
    pub fn convert(&self, text: &str) -> ConvertResult {
        let mut state = ConvertState::default();
        let mut meta = DocMeta::default();
        let resolver = LinkResolver::new(&self.current, &self.paths, self.store.as_ref());

        let (cleaned, scripts) = script::extract(text);
        for script in &scripts {
            self.apply_script(script, &resolver, &mut meta, &mut state);
        }

        let renderer = WikiRenderer::new(
            &resolver,
            &self.current,
            &self.paths,
            RenderOptions {
                nofollow: meta.nofollow,
                heading_top: meta.heading_top,
            },
            self.highlighter.as_deref(),
            &mut state,
        );
        let rendered = renderer.render(&cleaned);

        let toc = toc::assemble(rendered.headings, meta.toc_mode, rendered.html.len());

        ConvertResult {
            html: rendered.html,
            title: meta.title_override.or(rendered.title),
            main_title: meta.main_title,
            theme: meta.theme,
            theme_icon: meta.theme_icon,
            sidebar: meta.sidebar,
            toc,
            links: state.links,
            langs: state.langs,
            tags: state.tags,
            errors: state.errors,
        }
    }

    fn apply_script(
        &self,
        script: &Script,
        resolver: &LinkResolver<'_>,
        meta: &mut DocMeta,
        state: &mut ConvertState,
    ) {
        match script.cmd.as_str() {
            "nofollow" => {
                let args = script.args();
                meta.nofollow = args.is_empty() || args[0] != "no";
            }
            "title" => meta.title_override = Some(script.raw.clone()),
            "maintitle" => meta.main_title = Some(script.raw.clone()),
            "lang" => {
                if let Some(&token) = script.args().first()
                    && let Resolved::Page(page) = resolver.resolve(token, &mut state.errors)
                {
                    state.langs.push(page.normalized());
                }
            }
            "tags" => {
                for tag in script.args() {
                    if !tag.is_empty() {
                        state.tags.push(tag.to_owned());
                    }
                }
            }
            "toc" => meta.toc_mode = TocMode::from_directive(&script.raw),
            "sidebar" => meta.sidebar = Some(script.raw != "no"),
            "theme" => {
                // The homepage theme demotes every heading one level.
                if script.raw == "homepage" {
                    meta.heading_top = 2;
                }
                meta.theme = Some(script.raw.clone());
            }
            "themeicon" => {
                meta.theme_icon = (!script.raw.is_empty()).then(|| {
                    format!(
                        "{}/{}/{}",
                        self.paths.media_url, self.current.book, script.raw
                    )
                });
            }
            _ => {
                tracing::debug!(cmd = %script.cmd, "unknown script command");
                state.errors.push(format!("Unknown {{{{{}}}}}", script.cmd));
            }
        }
    }
}
