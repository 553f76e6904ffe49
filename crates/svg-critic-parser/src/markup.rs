//! Markup reading: XML text into an owned [`SvgTree`].
//!
//! The XML itself is read by `roxmltree`; this module copies the element
//! structure into the arena, qualifying foreign-namespace names with their
//! prefixes so the tree can be written back out. Comments, processing
//! instructions and whitespace-only text are dropped.

use indexmap::IndexMap;
use log::{debug, trace};
use roxmltree::{Node as XmlNode, ParsingOptions};

use svg_critic_core::tree::{NodeId, SvgTree};

use crate::error::ParseError;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Reads `source` into an element tree.
///
/// # Errors
///
/// Returns [`ParseError::Malformed`] if the text is not well-formed XML.
pub fn read_tree(source: &str) -> Result<SvgTree, ParseError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let xml = roxmltree::Document::parse_with_options(source, options).map_err(|err| {
        let pos = err.pos();
        ParseError::malformed(err.to_string(), source, pos.row, pos.col)
    })?;

    let root = xml.root_element();
    let mut tree = SvgTree::new(qualified_element_name(root));
    copy_attributes(root, &mut tree, NodeId::ROOT);
    declare_namespaces(root, &mut tree);

    let mut stack: Vec<(XmlNode<'_, '_>, NodeId)> = vec![(root, NodeId::ROOT)];
    while let Some((xml_node, id)) = stack.pop() {
        // Children are appended in document order; the stack only decides
        // when each element's own children get visited.
        let mut pending = Vec::new();
        for child in xml_node.children() {
            if child.is_element() {
                let child_id = tree.append_element(
                    id,
                    qualified_element_name(child),
                    IndexMap::new(),
                );
                copy_attributes(child, &mut tree, child_id);
                declare_namespaces(child, &mut tree);
                pending.push((child, child_id));
            } else if child.is_text() {
                match child.text() {
                    Some(text) if !text.trim().is_empty() => tree.append_text(id, text),
                    _ => {}
                }
            }
        }
        stack.extend(pending.into_iter().rev());
    }

    debug!(elements = tree.len(); "Markup read");
    trace!(tree:?; "Element tree");
    Ok(tree)
}

fn qualified_element_name(node: XmlNode<'_, '_>) -> String {
    let tag = node.tag_name();
    qualify(node, tag.namespace(), tag.name())
}

fn copy_attributes(node: XmlNode<'_, '_>, tree: &mut SvgTree, id: NodeId) {
    let target = tree.node_mut(id);
    for attribute in node.attributes() {
        let name = qualify(node, attribute.namespace(), attribute.name());
        target.set_attribute(name, attribute.value());
    }
}

fn declare_namespaces(node: XmlNode<'_, '_>, tree: &mut SvgTree) {
    for namespace in node.namespaces() {
        match namespace.name() {
            Some("xml") => {}
            Some(prefix) => tree.declare_namespace(prefix, namespace.uri()),
            None => tree.declare_namespace("", namespace.uri()),
        }
    }
}

/// Prefixes `local` with the namespace prefix in scope at `node`, unless the
/// namespace is SVG, absent, or the default namespace.
fn qualify(node: XmlNode<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace {
        None | Some(SVG_NAMESPACE) => local.to_string(),
        Some(XML_NAMESPACE) => format!("xml:{local}"),
        Some(uri) => match node.lookup_prefix(uri) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
            _ => local.to_string(),
        },
    }
}
