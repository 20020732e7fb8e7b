//! Markdown to HTML for entry bodies.
//!
//! Code blocks (fenced or indented) are emitted inside a
//! `<div class="codehilite">` container. Blocks tagged with a language syntect
//! knows are tokenized into `<span class="...">` runs (space-separated scope
//! names, e.g. `keyword control flow python`); anything else is escaped as-is.
//!
//! ATX headings written without the space after the hashes (`#Title`) are
//! accepted as headings, matching how existing entries were authored.

use maud::{PreEscaped, html};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html as md_html};
use std::borrow::Cow;
use std::sync::LazyLock;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::debug;

pub const HIGHLIGHT_CLASS: &str = "codehilite";

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Render Markdown source to an HTML fragment.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let source = normalize_atx_headings(markdown);
    let parser = Parser::new_ext(&source, options);
    let mut html_output = String::with_capacity(markdown.len() * 2);
    md_html::push_html(&mut html_output, highlight_code_blocks(parser));
    html_output.truncate(html_output.trim_end().len());
    html_output
}

/// Insert the missing space in `#Heading` lines outside code blocks.
fn normalize_atx_headings(markdown: &str) -> Cow<'_, str> {
    let mut out = String::with_capacity(markdown.len() + 8);
    let mut fence: Option<char> = None;
    let mut changed = false;

    for line in markdown.split_inclusive('\n') {
        let trimmed = line.trim_start_matches(' ');
        let indent = line.len() - trimmed.len();
        if indent > 3 {
            out.push_str(line);
            continue;
        }

        if let Some(c) = fence_char(trimmed) {
            fence = match fence {
                None => Some(c),
                Some(open) if open == c => None,
                other => other,
            };
            out.push_str(line);
            continue;
        }

        let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
        let glued = fence.is_none()
            && (1..=6).contains(&hashes)
            && trimmed[hashes..].chars().next().is_some_and(|c| !c.is_whitespace());
        if glued {
            out.push_str(&line[..indent + hashes]);
            out.push(' ');
            out.push_str(&trimmed[hashes..]);
            changed = true;
        } else {
            out.push_str(line);
        }
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(markdown)
    }
}

fn fence_char(line: &str) -> Option<char> {
    if line.starts_with("```") {
        Some('`')
    } else if line.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}

fn highlight_code_blocks<'a>(
    events: impl Iterator<Item = Event<'a>>,
) -> impl Iterator<Item = Event<'a>> {
    // Some(lang) while inside a code block
    let mut open: Option<Option<String>> = None;
    let mut code = String::new();

    events.filter_map(move |event| match event {
        Event::Start(Tag::CodeBlock(kind)) => {
            let lang = match kind {
                CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_owned),
                CodeBlockKind::Indented => None,
            };
            open = Some(lang);
            code.clear();
            None
        }
        Event::Text(text) if open.is_some() => {
            code.push_str(&text);
            None
        }
        Event::End(TagEnd::CodeBlock) => {
            let lang = open.take().flatten();
            Some(Event::Html(code_block(lang.as_deref(), &code).into()))
        }
        other => Some(other),
    })
}

fn code_block(lang: Option<&str>, code: &str) -> String {
    let class = lang.map(|l| format!("language-{l}"));
    let highlighted = lang.and_then(|l| highlight(l, code));
    html! {
        div class=(HIGHLIGHT_CLASS) {
            pre {
                code class=[class] {
                    @if let Some(spans) = highlighted {
                        (PreEscaped(spans))
                    } @else {
                        (code)
                    }
                }
            }
        }
    }
    .into_string()
}

/// Tokenize `code` into classed spans. `None` for languages syntect does not
/// know, or if the grammar fails part way.
fn highlight(lang: &str, code: &str) -> Option<String> {
    let syntax = SYNTAXES.find_syntax_by_token(lang)?;
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAXES, ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            debug!(lang, error = %e, "highlighting failed; falling back to plain code");
            return None;
        }
    }
    Some(generator.finalize())
}
