//! Markdown to HTML rendering with wiki link resolution.
//!
//! An event-driven walk over the pulldown-cmark stream. Every link href and
//! image src goes through the `wiki-link` resolver; resolved page references
//! are rendered to canonical URLs and recorded in the session's link list.
//! Headings get `toc-` anchor ids and feed the table of contents.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use wiki_link::{LinkResolver, PageContext, Resolved, SitePaths, build_url};

use crate::code_block::{self, Highlighter};
use crate::convertor::ConvertState;
use crate::toc::{AnchorIds, TocEntry};

/// Per-document rendering settings fixed by the script pass.
pub(crate) struct RenderOptions {
    /// Add `rel="nofollow"` to external links.
    pub nofollow: bool,
    /// Output level of the document's top heading (2 on homepage themes).
    pub heading_top: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            nofollow: false,
            heading_top: 1,
        }
    }
}

/// Output of one rendering pass.
pub(crate) struct RenderOutput {
    pub html: String,
    /// Text of the first heading.
    pub title: Option<String>,
    /// Every heading in document order, first one included.
    pub headings: Vec<TocEntry>,
}

struct HeadingCapture {
    level: u8,
    /// Plain text, for the anchor id and the TOC title.
    text: String,
    /// Inline HTML, for the rendered element.
    html: String,
}

struct CodeCapture {
    lang: Option<String>,
    buffer: String,
}

struct ImageCapture {
    src: String,
    title: String,
    alt: String,
}

/// Link whose target is bare `api:`/`php:`; the symbol comes from the link
/// text, so resolution waits for the closing tag.
struct LinkCapture {
    book: String,
    /// Plain text, the symbol to resolve.
    text: String,
    /// Inline HTML, the rendered anchor body.
    html: String,
}

pub(crate) struct WikiRenderer<'a> {
    resolver: &'a LinkResolver<'a>,
    current: &'a PageContext,
    paths: &'a SitePaths,
    options: RenderOptions,
    highlighter: Option<&'a dyn Highlighter>,
    state: &'a mut ConvertState,
    out: String,
    title: Option<String>,
    headings: Vec<TocEntry>,
    ids: AnchorIds,
    heading: Option<HeadingCapture>,
    code: Option<CodeCapture>,
    image: Option<ImageCapture>,
    link: Option<LinkCapture>,
    in_table_head: bool,
    body_row: usize,
}

impl<'a> WikiRenderer<'a> {
    pub(crate) fn new(
        resolver: &'a LinkResolver<'a>,
        current: &'a PageContext,
        paths: &'a SitePaths,
        options: RenderOptions,
        highlighter: Option<&'a dyn Highlighter>,
        state: &'a mut ConvertState,
    ) -> Self {
        Self {
            resolver,
            current,
            paths,
            options,
            highlighter,
            state,
            out: String::with_capacity(4096),
            title: None,
            headings: Vec::new(),
            ids: AnchorIds::default(),
            heading: None,
            code: None,
            image: None,
            link: None,
            in_table_head: false,
            body_row: 0,
        }
    }

    /// Render the document and return the HTML with the collected headings.
    pub(crate) fn render(mut self, markdown: &str) -> RenderOutput {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        for event in Parser::new_ext(markdown, options) {
            self.event(event);
        }
        RenderOutput {
            html: self.out,
            title: self.title,
            headings: self.headings,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(&tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            // Raw HTML is not allowed in wiki sources; escape it.
            Event::Html(html) | Event::InlineHtml(html) => self.push_inline(&escape_html(&html)),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.out.push_str("<hr>"),
            Event::TaskListMarker(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {}
        }
    }

    #[allow(clippy::too_many_lines)]
    fn start_tag(&mut self, tag: &Tag<'_>) {
        match tag {
            Tag::Paragraph => self.out.push_str("<p>"),
            Tag::Heading { level, .. } => {
                self.heading = Some(HeadingCapture {
                    level: heading_level_num(*level),
                    text: String::new(),
                    html: String::new(),
                });
            }
            Tag::BlockQuote(_) => self.out.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .filter(|l| !l.is_empty())
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeCapture {
                    lang,
                    buffer: String::new(),
                });
            }
            Tag::List(start) => match start {
                Some(1) => self.out.push_str("<ol>"),
                Some(n) => write!(self.out, r#"<ol start="{n}">"#).unwrap(),
                None => self.out.push_str("<ul>"),
            },
            Tag::Item => self.out.push_str("<li>"),
            Tag::Table(_) => {
                self.body_row = 0;
                self.out.push_str("<table>");
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.out.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                // Even body rows carry the `alt` class for striping.
                self.body_row += 1;
                if self.body_row % 2 == 0 {
                    self.out.push_str(r#"<tr class="alt">"#);
                } else {
                    self.out.push_str("<tr>");
                }
            }
            Tag::TableCell => {
                self.out
                    .push_str(if self.in_table_head { "<th>" } else { "<td>" });
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link { dest_url, .. } => self.link_start(dest_url),
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image = Some(ImageCapture {
                    src: dest_url.to_string(),
                    title: title.to_string(),
                    alt: String::new(),
                });
            }
            Tag::FootnoteDefinition(_)
            | Tag::HtmlBlock
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.out.push_str("</p>"),
            TagEnd::Heading(_) => self.heading_end(),
            TagEnd::BlockQuote(_) => self.out.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    code_block::render(
                        code.lang.as_deref(),
                        &code.buffer,
                        self.highlighter,
                        &mut self.out,
                    );
                }
            }
            TagEnd::List(ordered) => {
                self.out.push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.out.push_str("</li>"),
            TagEnd::Table => self.out.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.in_table_head = false;
                self.out.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => self.out.push_str("</tr>"),
            TagEnd::TableCell => {
                self.out
                    .push_str(if self.in_table_head { "</th>" } else { "</td>" });
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.link_end(),
            TagEnd::Image => self.image_end(),
            TagEnd::FootnoteDefinition
            | TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition => {}
        }
    }

    /// Resolve the href and open the anchor element.
    fn link_start(&mut self, dest: &str) {
        if matches!(dest, "api:" | "php:") {
            self.link = Some(LinkCapture {
                book: dest.trim_end_matches(':').to_owned(),
                text: String::new(),
                html: String::new(),
            });
            return;
        }
        let href = self.resolve_href(dest);
        let tag = self.anchor_open(&href);
        self.push_inline(&tag);
    }

    fn link_end(&mut self) {
        let Some(capture) = self.link.take() else {
            self.push_inline("</a>");
            return;
        };
        let token = format!("{}:{}", capture.book, capture.text);
        let href = self.resolve_href(&token);
        let mut tag = self.anchor_open(&href);
        tag.push_str(&capture.html);
        tag.push_str("</a>");
        if let Some(heading) = &mut self.heading {
            heading.text.push_str(&capture.text);
        }
        self.push_inline(&tag);
    }

    fn resolve_href(&mut self, token: &str) -> String {
        match self.resolver.resolve(token, &mut self.state.errors) {
            Resolved::Page(page) => {
                let url = build_url(&page, self.current, self.paths);
                // Record the bookkeeping copy only after the URL is built.
                self.state.links.push(page.normalized());
                url
            }
            Resolved::Url(url) => url,
        }
    }

    fn anchor_open(&self, href: &str) -> String {
        let mut tag = format!(r#"<a href="{}""#, escape_html(href));
        if self.options.nofollow && is_external_href(href) {
            tag.push_str(r#" rel="nofollow""#);
        }
        tag.push('>');
        tag
    }

    fn image_end(&mut self) {
        if let Some(capture) = self.image.take() {
            let src = self
                .resolver
                .resolve_media(&capture.src, &mut self.state.errors);
            let mut tag = format!(r#"<img src="{}""#, escape_html(&src));
            if !capture.title.is_empty() {
                write!(tag, r#" title="{}""#, escape_html(&capture.title)).unwrap();
            }
            write!(tag, r#" alt="{}">"#, escape_html(&capture.alt)).unwrap();
            self.push_inline(&tag);
        }
    }

    fn heading_end(&mut self) {
        if let Some(capture) = self.heading.take() {
            let level = (capture.level + self.options.heading_top - 1).min(6);
            let text = capture.text.trim().to_owned();
            let id = self.ids.generate(&text);
            if self.title.is_none() {
                self.title = Some(text.clone());
            }
            self.headings.push(TocEntry {
                level,
                title: text,
                id: id.clone(),
            });
            write!(
                self.out,
                r#"<h{level} id="{id}">{}</h{level}>"#,
                capture.html.trim()
            )
            .unwrap();
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = &mut self.code {
            code.buffer.push_str(text);
        } else if let Some(image) = &mut self.image {
            image.alt.push_str(text);
        } else if let Some(link) = &mut self.link {
            link.text.push_str(text);
            link.html.push_str(&escape_html(text));
        } else if let Some(heading) = &mut self.heading {
            heading.text.push_str(text);
            heading.html.push_str(&escape_html(text));
        } else {
            self.out.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(link) = &mut self.link {
            link.text.push_str(code);
            write!(link.html, "<code>{}</code>", escape_html(code)).unwrap();
        } else if let Some(heading) = &mut self.heading {
            heading.text.push_str(code);
            write!(heading.html, "<code>{}</code>", escape_html(code)).unwrap();
        } else {
            write!(self.out, "<code>{}</code>", escape_html(code)).unwrap();
        }
    }

    fn soft_break(&mut self) {
        if let Some(code) = &mut self.code {
            code.buffer.push('\n');
        } else {
            self.push_inline("\n");
        }
    }

    /// Push inline content to the innermost open capture or the output.
    fn push_inline(&mut self, content: &str) {
        if let Some(link) = &mut self.link {
            link.html.push_str(content);
        } else if let Some(heading) = &mut self.heading {
            heading.html.push_str(content);
        } else {
            self.out.push_str(content);
        }
    }
}

fn heading_level_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Hrefs that count as external for the nofollow directive.
fn is_external_href(href: &str) -> bool {
    ["http://", "https://", "ftp://", "mailto:"]
        .iter()
        .any(|scheme| {
            href.get(..scheme.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
        })
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
