//! Event-stream to tree folding.
//!
//! `pulldown-cmark` yields a flat stream of start/end events; [`TreeBuilder`]
//! folds that stream into nested [`Node`]s with mdast-style kind names.

use pulldown_cmark::{CodeBlockKind, Event, Tag};

use blogcards_shared::{BlogCardsError, Node, Result, kind};

/// Kinds whose text events accumulate into `value` instead of child nodes.
const LITERAL_KINDS: [&str; 3] = ["code", kind::YAML, "html"];

/// Stack-based builder; the bottom of the stack is always the `root`.
pub(crate) struct TreeBuilder {
    stack: Vec<Node>,
}

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        Self {
            stack: vec![Node::new(kind::ROOT)],
        }
    }

    /// Feed one parser event.
    pub(crate) fn push_event(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::Start(tag) => self.stack.push(open_node(tag)),
            Event::End(_) => self.close()?,
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => self.append(Node {
                value: Some(code.into_string()),
                ..Node::new("inlineCode")
            }),
            Event::Html(html) | Event::InlineHtml(html) => {
                if self.top_is_literal() {
                    self.push_text(&html);
                } else {
                    self.append(Node {
                        value: Some(html.into_string()),
                        ..Node::new("html")
                    });
                }
            }
            Event::SoftBreak => self.push_text("\n"),
            Event::HardBreak => self.append(Node::new("break")),
            Event::Rule => self.append(Node::new("thematicBreak")),
            Event::FootnoteReference(label) => {
                self.append(Node::new("footnoteReference").with_attr("identifier", label.as_ref()));
            }
            Event::TaskListMarker(checked) => self.mark_task(checked),
            _ => {}
        }
        Ok(())
    }

    /// Consume the builder, returning the `root`.
    pub(crate) fn finish(mut self) -> Result<Node> {
        if self.stack.len() != 1 {
            return Err(BlogCardsError::parse(format!(
                "unterminated markup: {} open node(s) at end of input",
                self.stack.len() - 1
            )));
        }
        self.stack
            .pop()
            .ok_or_else(|| BlogCardsError::parse("empty tree stack"))
    }

    fn close(&mut self) -> Result<()> {
        if self.stack.len() < 2 {
            return Err(BlogCardsError::parse("unbalanced end event"));
        }
        let Some(node) = self.stack.pop() else {
            return Err(BlogCardsError::parse("unbalanced end event"));
        };
        self.append(finish_node(node));
        Ok(())
    }

    fn top(&mut self) -> &mut Node {
        // The root is never popped, so the stack is non-empty here.
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn top_is_literal(&self) -> bool {
        self.stack
            .last()
            .is_some_and(|n| LITERAL_KINDS.contains(&n.kind.as_str()))
    }

    fn append(&mut self, node: Node) {
        self.top().children.push(node);
    }

    /// Append text, merging with a preceding `text` sibling.
    fn push_text(&mut self, text: &str) {
        if self.top_is_literal() {
            self.top().value.get_or_insert_with(String::new).push_str(text);
            return;
        }

        let top = self.top();
        if let Some(last) = top.children.last_mut() {
            if last.is(kind::TEXT) {
                last.value.get_or_insert_with(String::new).push_str(text);
                return;
            }
        }
        top.children.push(Node::text(text));
    }

    fn mark_task(&mut self, checked: bool) {
        if let Some(item) = self.stack.iter_mut().rev().find(|n| n.is("listItem")) {
            item.attrs.insert("checked".into(), checked.into());
        }
    }
}

/// Map an opening tag to an (empty) node.
fn open_node(tag: Tag<'_>) -> Node {
    match tag {
        Tag::Paragraph => Node::new(kind::PARAGRAPH),
        Tag::Heading { level, .. } => Node::new("heading").with_attr("depth", level as u8),
        Tag::BlockQuote(_) => Node::new("blockquote"),
        Tag::CodeBlock(block) => {
            let node = Node::new("code");
            match block {
                CodeBlockKind::Fenced(info) => match info.split_whitespace().next() {
                    Some(lang) => node.with_attr("lang", lang),
                    None => node,
                },
                CodeBlockKind::Indented => node,
            }
        }
        Tag::HtmlBlock => Node::new("html"),
        Tag::List(start) => {
            let node = Node::new("list").with_attr("ordered", start.is_some());
            match start {
                Some(n) => node.with_attr("start", n),
                None => node,
            }
        }
        Tag::Item => Node::new("listItem"),
        Tag::FootnoteDefinition(label) => {
            Node::new("footnoteDefinition").with_attr("identifier", label.as_ref())
        }
        Tag::Table(_) => Node::new("table"),
        Tag::TableHead | Tag::TableRow => Node::new("tableRow"),
        Tag::TableCell => Node::new("tableCell"),
        Tag::Emphasis => Node::new("emphasis"),
        Tag::Strong => Node::new("strong"),
        Tag::Strikethrough => Node::new("delete"),
        Tag::Link {
            dest_url, title, ..
        } => titled(Node::new("link").with_url(dest_url.into_string()), &title),
        Tag::Image {
            dest_url, title, ..
        } => titled(Node::new("image").with_url(dest_url.into_string()), &title),
        Tag::MetadataBlock(_) => Node::new(kind::YAML),
        _ => Node::new("unknown"),
    }
}

fn titled(node: Node, title: &str) -> Node {
    if title.is_empty() {
        node
    } else {
        node.with_attr("title", title)
    }
}

/// Normalize a node once all of its events have been seen.
fn finish_node(mut node: Node) -> Node {
    match node.kind.as_str() {
        "code" | kind::YAML => {
            if let Some(value) = node.value.as_mut() {
                if value.ends_with('\n') {
                    value.pop();
                }
            }
            node.value.get_or_insert_with(String::new);
        }
        "image" => {
            let alt = node.text_content();
            node.children.clear();
            if !alt.is_empty() {
                node.attrs.insert("alt".into(), alt.into());
            }
        }
        _ => {}
    }
    node
}
