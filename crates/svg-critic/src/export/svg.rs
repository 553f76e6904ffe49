//! SVG markup for a [`Document`].
//!
//! The element tree is rebuilt with [`svg::node::element::Element`] from the
//! leaves up: the arena hands out child ids after their parent's id, so walking
//! ids in reverse guarantees every child is finished before its parent needs
//! it. Attribute and text escaping is left to the `svg` crate.

use std::{fs::File, io::Write, path::Path};

use log::{debug, error, info};
use svg::{
    Node,
    node::{Text as SvgText, element::Element},
};

use svg_critic_core::{
    document::Document,
    tree::{Child, NodeId},
};

use crate::export::Error;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Renders `document` to SVG markup.
///
/// Namespace declarations recorded while parsing are written on the root
/// element. A root `svg` element without a default namespace gets the SVG
/// namespace.
///
/// # Errors
///
/// Returns [`Error::Render`] if the element tree is inconsistent.
pub fn render(document: &Document) -> Result<String, Error> {
    let tree = document.tree();
    let mut built: Vec<Option<Element>> = vec![None; tree.len()];

    for id in tree.ids().rev() {
        let node = tree.node(id);
        let mut element = Element::new(node.name());
        if id == NodeId::ROOT {
            declare_namespaces(document, &mut element);
        }
        for (name, value) in node.attributes() {
            element.assign(name.as_str(), value.as_str());
        }
        for child in node.children() {
            match child {
                Child::Element(child_id) => {
                    let child_element = built
                        .get_mut(child_id.index())
                        .and_then(Option::take)
                        .ok_or_else(|| {
                            Error::Render(format!(
                                "element {} is not a descendant of {}",
                                child_id.index(),
                                id.index()
                            ))
                        })?;
                    element.append(child_element);
                }
                Child::Text(text) => element.append(SvgText::new(text.as_str())),
            }
        }
        built[id.index()] = Some(element);
    }

    let root = built
        .first_mut()
        .and_then(Option::take)
        .ok_or_else(|| Error::Render("document has no root element".to_string()))?;
    let markup = root.to_string();
    debug!(elements = tree.len(), bytes = markup.len(); "SVG document rendered");
    Ok(markup)
}

fn declare_namespaces(document: &Document, root: &mut Element) {
    let tree = document.tree();
    for (prefix, uri) in tree.namespaces() {
        let attribute = if prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{prefix}")
        };
        if tree.root().attribute(&attribute).is_none() {
            root.assign(attribute, uri.as_str());
        }
    }
    if tree.root().name() == "svg" && !tree.namespaces().contains_key("") {
        root.assign("xmlns", SVG_NAMESPACE);
    }
}

/// Renders `document` and writes it to `path`.
///
/// # Errors
///
/// Returns [`Error::Render`] if rendering fails, or [`Error::Io`] if the file
/// cannot be created or written.
pub fn write_file(document: &Document, path: &Path) -> Result<(), Error> {
    let markup = render(document)?;
    info!(path:? = path; "Creating SVG file");

    let mut file = match File::create(path) {
        Ok(file) => file,
        Err(err) => {
            error!(path:? = path, err:err; "Failed to create SVG file");
            return Err(Error::Io(err));
        }
    };

    if let Err(err) = file.write_all(markup.as_bytes()) {
        error!(path:? = path, err:err; "Failed to write SVG content");
        return Err(Error::Io(err));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{evaluation::evaluate, mutation::MutationEngine};
    use svg_critic_parser::parse;

    const SOURCE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg"
        xmlns:xlink="http://www.w3.org/1999/xlink" width="400" height="300">
        <defs><marker id="m"><path d="M0 0 L10 5 L0 10 z"/></marker></defs>
        <g id="boxes" transform="translate(5,5)">
            <rect id="a" x="10" y="10" width="120" height="80" fill="#ff4141"/>
            <rect id="b" x="60" y="40" width="120" height="80" fill="purple"/>
        </g>
        <g id="other"><circle id="c" cx="100" cy="100" r="30" fill="#19aeff"/></g>
        <use xlink:href="#a"/>
        <text x="20" y="280" font-size="8">Tom &amp; Jerry</text>
    </svg>"##;

    #[test]
    fn test_render_keeps_structure_and_text() {
        let document = parse(SOURCE).expect("valid document");
        let markup = render(&document).expect("renderable");

        assert!(markup.starts_with("<svg"));
        assert!(markup.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
        assert!(markup.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(markup.contains("<marker"));
        assert!(markup.contains(r##"xlink:href="#a""##));
        assert!(markup.contains("Tom &amp; Jerry"));

        let reparsed = parse(&markup).expect("rendered markup parses");
        assert_eq!(reparsed.tree().len(), document.tree().len());
        assert_eq!(reparsed.shapes(), document.shapes());
    }

    #[test]
    fn test_round_trip_preserves_evaluation() {
        let document = parse(SOURCE).expect("valid document");
        let reparsed = parse(&render(&document).expect("renderable")).expect("reparsable");
        assert_eq!(evaluate(&reparsed), evaluate(&document));
    }

    #[test]
    fn test_mutated_document_round_trips() {
        let document = parse(SOURCE).expect("valid document");
        let improved = MutationEngine::new().apply(&document, &evaluate(&document));

        let reparsed = parse(&render(&improved).expect("renderable")).expect("reparsable");
        assert_eq!(reparsed.shapes(), improved.shapes());
        assert_eq!(evaluate(&reparsed), evaluate(&improved));
    }

    #[test]
    fn test_default_namespace_added() {
        let document = parse(r#"<svg><rect width="1" height="1"/></svg>"#).expect("valid");
        let markup = render(&document).expect("renderable");
        assert!(markup.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.svg");
        let document = parse(SOURCE).expect("valid document");

        write_file(&document, &path).expect("written");
        let written = std::fs::read_to_string(&path).expect("readable");
        assert_eq!(written, render(&document).expect("renderable"));
    }

    #[test]
    fn test_write_file_to_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("out.svg");
        let document = parse(SOURCE).expect("valid document");
        assert!(matches!(write_file(&document, &path), Err(Error::Io(_))));
    }
}
