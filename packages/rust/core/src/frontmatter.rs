//! Frontmatter reading.
//!
//! The parser hands back a post's leading metadata block as a `yaml` node;
//! this module deserializes it and keeps the recognized fields. A post that
//! declares no `title` takes it from a leading level-one heading.

use serde_yaml::{Mapping, Value};

use blogcards_shared::{BlogCardsError, Frontmatter, Node, Result, kind};

/// Read the frontmatter of a parsed document.
///
/// Only a `yaml` node in first position counts as frontmatter. A document
/// without one yields an empty [`Frontmatter`], apart from a lifted title.
///
/// When the block has no `title` key, a depth-1 heading that directly
/// follows it (or opens a document without frontmatter) supplies the title.
/// `title: null` keeps the title empty.
pub fn from_tree(root: &Node) -> Result<Frontmatter> {
    let (mut frontmatter, title_declared, body) = match root.children.split_first() {
        Some((first, rest)) if first.is(kind::YAML) => {
            let (frontmatter, declared) = read_block(first.value.as_deref().unwrap_or_default())?;
            (frontmatter, declared, rest)
        }
        _ => (Frontmatter::default(), false, root.children.as_slice()),
    };

    if !title_declared {
        if let Some(heading) = body.first().filter(|n| is_title_heading(n)) {
            let text = heading.text_content();
            frontmatter.title = (!text.is_empty()).then_some(text);
        }
    }

    Ok(frontmatter)
}

/// Deserialize a raw YAML frontmatter block.
pub fn from_yaml(text: &str) -> Result<Frontmatter> {
    read_block(text).map(|(frontmatter, _)| frontmatter)
}

/// Deserialize a block, reporting whether it has a `title` key at all.
fn read_block(text: &str) -> Result<(Frontmatter, bool)> {
    let value: Value = serde_yaml::from_str(text)
        .map_err(|e| BlogCardsError::parse(format!("malformed frontmatter: {e}")))?;

    let map = match value {
        Value::Null => return Ok((Frontmatter::default(), false)),
        Value::Mapping(map) => map,
        _ => return Err(BlogCardsError::parse("frontmatter is not a mapping")),
    };

    let frontmatter = Frontmatter {
        title: field(&map, "title")?,
        subtitle: field(&map, "subtitle")?,
        description: field(&map, "description")?,
        date: field(&map, "date")?,
    };
    Ok((frontmatter, map.contains_key("title")))
}

fn is_title_heading(node: &Node) -> bool {
    node.is("heading") && node.attrs.get("depth").and_then(serde_json::Value::as_u64) == Some(1)
}

/// Stringify a scalar field; `null` and absence are both `None`.
fn field(map: &Mapping, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(BlogCardsError::parse(format!(
            "frontmatter field '{key}' must be a scalar"
        ))),
    }
}
