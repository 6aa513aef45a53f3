//! `{{command}}` script extraction.
//!
//! Scripts carry per-document settings and metadata (`{{toc: no}}`,
//! `{{tags: forms, validation}}`, `{{lang: cs:homepage}}`). They are stripped
//! from the source before rendering and handed to the conversion session in
//! document order; fenced code blocks are left untouched.

use std::sync::LazyLock;

use regex::Regex;

/// `{{cmd}}` or `{{cmd: payload}}`, payload up to the closing braces.
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z]+)\s*(?::\s*([^{}\n]*?)\s*)?\}\}").unwrap());

/// One extracted script directive.
pub(crate) struct Script {
    /// Command name, lowercased.
    pub cmd: String,
    /// Raw payload after the `:`, empty when absent.
    pub raw: String,
}

impl Script {
    /// Comma-separated arguments of the payload.
    pub(crate) fn args(&self) -> Vec<&str> {
        if self.raw.is_empty() {
            Vec::new()
        } else {
            self.raw.split(',').map(str::trim).collect()
        }
    }
}

/// Strip scripts from `input`, returning the cleaned text and the scripts in
/// document order.
pub(crate) fn extract(input: &str) -> (String, Vec<Script>) {
    let mut fence = FenceTracker::default();
    let mut scripts = Vec::new();
    let mut output = String::with_capacity(input.len());

    let lines: Vec<&str> = input.lines().collect();
    let line_count = lines.len();
    for (idx, line) in lines.iter().enumerate() {
        fence.update(line);
        if fence.in_fence() {
            output.push_str(line);
        } else {
            let cleaned = SCRIPT_RE.replace_all(line, |caps: &regex::Captures<'_>| {
                scripts.push(Script {
                    cmd: caps[1].to_lowercase(),
                    raw: caps
                        .get(2)
                        .map_or_else(String::new, |m| m.as_str().to_owned()),
                });
                ""
            });
            output.push_str(&cleaned);
        }
        if idx < line_count - 1 || input.ends_with('\n') {
            output.push('\n');
        }
    }

    (output, scripts)
}

/// Tracks fenced code blocks so scripts inside them stay untouched.
#[derive(Default)]
struct FenceTracker {
    fence: Option<(char, usize)>,
}

impl FenceTracker {
    fn update(&mut self, line: &str) {
        let trimmed = line.trim_start();
        let Some(first) = trimmed.chars().next() else {
            return;
        };
        if first != '`' && first != '~' {
            return;
        }
        let run = trimmed.chars().take_while(|&c| c == first).count();
        if run < 3 {
            return;
        }
        match self.fence {
            None => self.fence = Some((first, run)),
            Some((ch, len)) if ch == first && run >= len => self.fence = None,
            Some(_) => {}
        }
    }

    fn in_fence(&self) -> bool {
        self.fence.is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_extract_bare_command() {
        let (output, scripts) = extract("{{nofollow}}\ntext");
        assert_eq!(output, "\ntext");
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].cmd, "nofollow");
        assert_eq!(scripts[0].raw, "");
    }

    #[test]
    fn test_extract_command_with_payload() {
        let (_, scripts) = extract("{{title: Quick Start}}");
        assert_eq!(scripts[0].cmd, "title");
        assert_eq!(scripts[0].raw, "Quick Start");
    }

    #[test]
    fn test_args_split_on_commas() {
        let (_, scripts) = extract("{{tags: forms, validation , }}");
        assert_eq!(scripts[0].args(), vec!["forms", "validation", ""]);
    }

    #[test]
    fn test_command_name_is_lowercased() {
        let (_, scripts) = extract("{{TOC: no}}");
        assert_eq!(scripts[0].cmd, "toc");
        assert_eq!(scripts[0].raw, "no");
    }

    #[test]
    fn test_multiple_scripts_in_document_order() {
        let (_, scripts) = extract("{{theme: homepage}}\nbody\n{{sidebar: no}}");
        let cmds: Vec<&str> = scripts.iter().map(|s| s.cmd.as_str()).collect();
        assert_eq!(cmds, vec!["theme", "sidebar"]);
    }

    #[test]
    fn test_scripts_inside_fences_are_kept() {
        let input = "```\n{{toc: no}}\n```\n{{sidebar: no}}";
        let (output, scripts) = extract(input);
        assert!(output.contains("{{toc: no}}"));
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].cmd, "sidebar");
    }

    #[test]
    fn test_tilde_fences_are_tracked() {
        let input = "~~~\n{{toc: no}}\n~~~";
        let (output, scripts) = extract(input);
        assert!(output.contains("{{toc: no}}"));
        assert!(scripts.is_empty());
    }

    #[test]
    fn test_surrounding_text_survives() {
        let (output, _) = extract("before {{nofollow}} after");
        assert_eq!(output, "before  after");
    }

    #[test]
    fn test_trailing_newline_is_preserved() {
        let (output, _) = extract("line\n");
        assert_eq!(output, "line\n");
    }

    #[test]
    fn test_non_script_braces_pass_through() {
        let (output, scripts) = extract("a {not a script} and {{123}}");
        assert_eq!(output, "a {not a script} and {{123}}");
        assert!(scripts.is_empty());
    }
}
