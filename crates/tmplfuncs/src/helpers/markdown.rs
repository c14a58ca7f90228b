//! Markdown to HTML.
//!
//! Both helpers enable tables, strikethrough, footnotes, task lists and
//! explicit heading ids (`# Title {#id}`). `markdown2` additionally gives every
//! heading without an explicit id one derived from its text.

use std::collections::HashMap;

use minijinja::Value;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

use super::{fail_soft, Entries};

pub(crate) fn define(entries: &mut Entries) {
    entries.insert("markdown", Value::from_function(markdown));
    entries.insert("markdown2", Value::from_function(markdown2));
}

pub fn markdown(value: Value) -> Value {
    match value.as_str() {
        Some(source) => Value::from_safe_string(render(source, false)),
        None => fail_soft(
            "markdown",
            "expected a string",
            Value::from_safe_string(String::new()),
        ),
    }
}

pub fn markdown2(value: Value) -> Value {
    match value.as_str() {
        Some(source) => Value::from_safe_string(render(source, true)),
        None => fail_soft(
            "markdown2",
            "expected a string",
            Value::from_safe_string(String::new()),
        ),
    }
}

fn extensions() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

fn render(source: &str, heading_ids: bool) -> String {
    let events: Vec<Event<'_>> = Parser::new_ext(source, extensions()).collect();
    let events = if heading_ids {
        with_heading_ids(events)
    } else {
        events
    };
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

fn with_heading_ids(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(events.len());

    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading {
                level,
                id: None,
                classes,
                attrs,
            }) => {
                let text = heading_text(&events[i + 1..]);
                let id = unique_anchor(&mut seen, anchor_name(&text));
                out.push(Event::Start(Tag::Heading {
                    level: *level,
                    id: Some(CowStr::from(id)),
                    classes: classes.clone(),
                    attrs: attrs.clone(),
                }));
            }
            other => out.push(other.clone()),
        }
    }
    out
}

fn heading_text(rest: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in rest {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Lower-cased letters and digits, with each other run collapsed to `-`.
fn anchor_name(text: &str) -> String {
    let mut anchor = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !anchor.is_empty() {
                anchor.push('-');
            }
            pending_dash = false;
            anchor.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if anchor.is_empty() {
        anchor.push_str("section");
    }
    anchor
}

fn unique_anchor(seen: &mut HashMap<String, usize>, anchor: String) -> String {
    let count = seen.entry(anchor.clone()).or_insert(0);
    let id = if *count == 0 {
        anchor
    } else {
        format!("{anchor}-{count}")
    };
    *count += 1;
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html_of(v: Value) -> String {
        v.as_str().unwrap_or_default().to_string()
    }

    #[test]
    fn test_markdown_renders_basic_blocks() {
        let out = markdown(Value::from("# Title\n\nSome *text*."));
        assert!(out.is_safe());
        let html = html_of(out);
        assert!(html.contains("<h1>Title</h1>"), "{html}");
        assert!(html.contains("<p>Some <em>text</em>.</p>"), "{html}");
    }

    #[test]
    fn test_markdown_tables_and_strikethrough() {
        let html = html_of(markdown(Value::from("| a |\n|---|\n| 1 |\n\n~~gone~~")));
        assert!(html.contains("<table>"), "{html}");
        assert!(html.contains("<del>gone</del>"), "{html}");
    }

    #[test]
    fn test_markdown2_adds_heading_ids() {
        let html = html_of(markdown2(Value::from("## Getting Started!\n\n## Getting Started")));
        assert!(html.contains(r#"<h2 id="getting-started">"#), "{html}");
        assert!(html.contains(r#"<h2 id="getting-started-1">"#), "{html}");
    }

    #[test]
    fn test_explicit_ids_win() {
        let html = html_of(markdown2(Value::from("# Intro {#start}")));
        assert!(html.contains(r#"id="start""#), "{html}");
    }

    #[test]
    fn test_markdown_rejects_non_strings() {
        assert_eq!(html_of(markdown(Value::from(3))), "");
        assert_eq!(html_of(markdown2(Value::from(()))), "");
    }

    #[test]
    fn test_anchor_name() {
        assert_eq!(anchor_name("Hello, World"), "hello-world");
        assert_eq!(anchor_name("  API v2 "), "api-v2");
        assert_eq!(anchor_name("!!!"), "section");
    }
}
