//! HTML to readable text.
//!
//! The extractor walks the parsed DOM once, dropping page chrome (navigation, ads,
//! cookie notices, forms) and rendering what is left as plain text:
//!
//! - headings become `#` markers followed by the heading text, one `#` per level
//! - list items become `- item` or `1. item`, nested lists indented by two spaces
//! - table rows become one line each, cells separated by ` | `
//! - other block elements are separated by a blank line
//!
//! The output never contains anything shaped like an HTML tag.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub source_url: String,
}

static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("main, [role=main]").expect("Failed to parse main selector")
});

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body").expect("Failed to parse body selector")
});

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("title").expect("Failed to parse title selector")
});

static DESCRIPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name=description]").expect("Failed to parse description selector")
});

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr").expect("Failed to parse row selector")
});

/// Elements that never carry readable page content.
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "svg", "canvas", "object", "embed",
    "head", "link", "meta", "nav", "aside", "form", "button", "input", "select", "textarea",
    "label", "dialog", "footer",
];

const NOISE_ROLES: &[&str] = &[
    "navigation", "banner", "contentinfo", "menu", "menubar", "dialog", "alertdialog", "search",
];

/// class/id tokens that mark ads, menus, consent banners and similar chrome.
const NOISE_TOKENS: &[&str] = &[
    "ad", "ads", "advert", "advertisement", "banner", "cookie", "cookies", "consent", "gdpr",
    "menu", "nav", "navbar", "popup", "modal", "login", "signin", "signup", "newsletter",
    "promo", "sponsored", "breadcrumb", "breadcrumbs", "share", "social", "subscribe",
];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "blockquote", "address", "figure", "figcaption",
    "dl", "dt", "dd", "details", "summary", "li", "center", "body", "html", "hr",
];

/// Extracts the human-readable text of `raw_html`.
///
/// Never fails: when `<main>` renders nothing the whole body is tried, and a page
/// with no recognisable content falls back to its title and description, then to
/// every visible text node.
pub fn extract(raw_html: &str, source_url: &str) -> ExtractedText {
    let document = Html::parse_document(raw_html);
    let body = document.select(&BODY_SELECTOR).next();

    let mut text = document
        .select(&MAIN_SELECTOR)
        .next()
        .map(render)
        .unwrap_or_default();

    if text.is_empty() {
        text = render(body.unwrap_or_else(|| document.root_element()));
    }

    if text.is_empty() {
        tracing::debug!(url = %source_url, "no structured content found, using fallback text");
        text = tidy(&scrub_markup(&fallback_text(&document)));
    }

    ExtractedText {
        text,
        source_url: source_url.to_string(),
    }
}

fn render(root: ElementRef) -> String {
    let mut renderer = Renderer::default();
    renderer.walk(root, root.value().name() == "article");
    tidy(&scrub_markup(&renderer.finish()))
}

#[derive(Default)]
struct Renderer {
    blocks: Vec<String>,
    inline: String,
    seen: HashSet<String>,
    pre_depth: usize,
}

impl Renderer {
    fn walk(&mut self, element: ElementRef, in_article: bool) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push_text(text),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.visit(child, in_article);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit(&mut self, element: ElementRef, in_article: bool) {
        if is_noise(element, in_article) {
            return;
        }

        let name = element.value().name();
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush();
                let level = usize::from(name.as_bytes()[1] - b'0');
                let text = inline_text(element, in_article);
                if !text.is_empty() {
                    self.push_block(format!("{} {}", "#".repeat(level), text));
                }
            }
            "ul" | "ol" => {
                self.flush();
                let mut lines = Vec::new();
                render_list(element, name == "ol", 0, in_article, &mut lines);
                self.push_block(lines.join("\n"));
            }
            "table" => {
                self.flush();
                self.push_block(render_table(element, in_article));
            }
            "br" => self.inline.push('\n'),
            "pre" => {
                self.flush();
                self.pre_depth += 1;
                self.walk(element, in_article);
                self.pre_depth -= 1;
                self.flush();
            }
            _ if BLOCK_TAGS.contains(&name) => {
                self.flush();
                self.walk(element, in_article || name == "article");
                self.flush();
            }
            _ => self.walk(element, in_article),
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.pre_depth > 0 {
            self.inline.push_str(text);
        } else {
            self.inline
                .extend(text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
        }
    }

    fn flush(&mut self) {
        if self.inline.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.inline);
        let block = pending
            .split('\n')
            .map(collapse_whitespace)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        self.push_block(block);
    }

    fn push_block(&mut self, block: String) {
        if block.trim().is_empty() {
            return;
        }
        // Repeated blocks are boilerplate (cookie lines, repeated taglines).
        if self.seen.insert(block.clone()) {
            self.blocks.push(block);
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.blocks.join("\n\n")
    }
}

fn is_noise(element: ElementRef, in_article: bool) -> bool {
    let value = element.value();
    let name = value.name();

    if SKIP_TAGS.contains(&name) || (name == "header" && !in_article) {
        return true;
    }
    if value.attr("hidden").is_some()
        || value
            .attr("aria-hidden")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    {
        return true;
    }
    if let Some(role) = value.attr("role") {
        if NOISE_ROLES.contains(&role.trim().to_ascii_lowercase().as_str()) {
            return true;
        }
    }

    value.classes().chain(value.id()).any(is_noise_token)
}

fn is_noise_token(value: &str) -> bool {
    value
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .any(|token| NOISE_TOKENS.contains(&token.to_ascii_lowercase().as_str()))
}

fn inline_text(element: ElementRef, in_article: bool) -> String {
    let mut out = String::new();
    collect_inline(element, in_article, &mut out);
    collapse_whitespace(&out)
}

fn collect_inline(element: ElementRef, in_article: bool, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    append_inline(child, in_article, out);
                }
            }
            _ => {}
        }
    }
}

fn append_inline(element: ElementRef, in_article: bool, out: &mut String) {
    if is_noise(element, in_article) {
        return;
    }
    let name = element.value().name();
    if name == "br" {
        out.push(' ');
        return;
    }
    let spaced = BLOCK_TAGS.contains(&name) || matches!(name, "td" | "th" | "tr" | "pre");
    if spaced {
        out.push(' ');
    }
    collect_inline(element, in_article, out);
    if spaced {
        out.push(' ');
    }
}

fn render_list(
    list: ElementRef,
    ordered: bool,
    depth: usize,
    in_article: bool,
    lines: &mut Vec<String>,
) {
    let mut index = 0;
    for item in list.children().filter_map(ElementRef::wrap) {
        if is_noise(item, in_article) {
            continue;
        }
        match item.value().name() {
            "li" => {
                index += 1;
                let mut text = String::new();
                let mut nested = Vec::new();
                for part in item.children() {
                    match part.value() {
                        Node::Text(t) => text.push_str(t),
                        Node::Element(_) => {
                            if let Some(part) = ElementRef::wrap(part) {
                                match part.value().name() {
                                    "ul" | "ol" if !is_noise(part, in_article) => nested.push(part),
                                    _ => append_inline(part, in_article, &mut text),
                                }
                            }
                        }
                        _ => {}
                    }
                }

                let text = collapse_whitespace(&text);
                if !text.is_empty() {
                    let marker = if ordered {
                        format!("{}.", index)
                    } else {
                        "-".to_string()
                    };
                    lines.push(format!("{}{} {}", "  ".repeat(depth), marker, text));
                }
                for sublist in nested {
                    let sub_ordered = sublist.value().name() == "ol";
                    render_list(sublist, sub_ordered, depth + 1, in_article, lines);
                }
            }
            name @ ("ul" | "ol") => render_list(item, name == "ol", depth + 1, in_article, lines),
            _ => {
                let text = inline_text(item, in_article);
                if !text.is_empty() {
                    lines.push(format!("{}{}", "  ".repeat(depth), text));
                }
            }
        }
    }
}

fn render_table(table: ElementRef, in_article: bool) -> String {
    let mut lines = Vec::new();

    for caption in table
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "caption")
    {
        let text = inline_text(caption, in_article);
        if !text.is_empty() {
            lines.push(text);
        }
    }

    for row in table.select(&ROW_SELECTOR) {
        if is_noise(row, in_article) {
            continue;
        }
        let cells: Vec<String> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| matches!(cell.value().name(), "td" | "th"))
            .filter(|cell| !is_noise(*cell, in_article))
            .map(|cell| inline_text(cell, in_article))
            .collect();

        if cells.iter().any(|cell| !cell.is_empty()) {
            lines.push(cells.join(" | "));
        }
    }

    lines.join("\n")
}

/// Best-effort text for pages whose structured walk produced nothing.
fn fallback_text(document: &Html) -> String {
    let mut parts = Vec::new();

    if let Some(title) = document.select(&TITLE_SELECTOR).next() {
        let title = collapse_whitespace(&title.text().collect::<String>());
        if !title.is_empty() {
            parts.push(title);
        }
    }
    if let Some(content) = document
        .select(&DESCRIPTION_SELECTOR)
        .next()
        .and_then(|meta| meta.value().attr("content"))
    {
        let content = collapse_whitespace(content);
        if !content.is_empty() {
            parts.push(content);
        }
    }
    if !parts.is_empty() {
        return parts.join("\n\n");
    }

    let visible: Vec<&str> = document
        .root_element()
        .descendants()
        .filter(|node| {
            node.parent()
                .and_then(ElementRef::wrap)
                .is_none_or(|parent| {
                    !matches!(
                        parent.value().name(),
                        "script" | "style" | "noscript" | "template"
                    )
                })
        })
        .filter_map(|node| node.value().as_text().map(|text| &**text))
        .collect();

    collapse_whitespace(&visible.join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Breaks up every tag-shaped sequence by turning its angle brackets into spaces.
/// The text between the brackets is kept.
pub(crate) fn scrub_markup(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = strip_tags_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_tags_once(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let opens_tag = after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));

        match after.find(['<', '>']) {
            Some(end) if opens_tag && after[end..].starts_with('>') => {
                out.push(' ');
                out.push_str(&after[..end]);
                out.push(' ');
                rest = &after[end + 1..];
            }
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Normalizes line whitespace and collapses blank-line runs to one.
fn tidy(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_blank = false;

    for line in text.lines() {
        let body = collapse_whitespace(line);
        if body.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        pending_blank = false;

        if is_list_line(&body) {
            let indent = line.len() - line.trim_start_matches(' ').len();
            out.push_str(&line[..indent]);
        }
        out.push_str(&body);
    }

    out
}

fn is_list_line(body: &str) -> bool {
    if body.starts_with("- ") {
        return true;
    }
    let digits = body.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && body[digits..].starts_with(". ")
}
