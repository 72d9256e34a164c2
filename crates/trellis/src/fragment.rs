//! Identifier masking for embedded SVG fragments.
//!
//! Every `<y:SVGNode>` embeds a complete SVG document taken from the
//! resource table. Those documents routinely define gradients, clip paths
//! or symbols with identifiers like `linearGradient1` and reference them
//! with `fill="url(#linearGradient1)"`. Two nodes sharing one resource, or
//! two resources exported by the same tool, would collide once merged into
//! a single output document. [`mask_identifiers`] prefixes every identifier
//! and every local reference inside one fragment with a mask that is unique
//! to the owning element, as produced by
//! [`Id::to_mask`](trellis_core::identifier::Id::to_mask).
//!
//! ```
//! use trellis::fragment::{mask_identifiers, parse_fragment};
//!
//! let mut root = parse_fragment(
//!     r##"<svg xmlns="http://www.w3.org/2000/svg">
//!       <defs><linearGradient id="g"/></defs>
//!       <rect fill="url(#g)"/>
//!     </svg>"##,
//! )
//! .unwrap();
//! mask_identifiers(&mut root, "n3");
//!
//! let svg = root.to_svg().to_string();
//! assert!(svg.contains(r#"id="n3_g""#));
//! assert!(svg.contains("url(#n3_g)"));
//! ```

use std::collections::HashSet;

use log::trace;
use roxmltree::{Document, Node, NodeType, ParsingOptions};
use thiserror::Error;

use trellis_core::draw::{XmlElement, XmlNode};
use trellis_markup::markup::ns;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
/// Joins a mask and the original identifier.
const SEPARATOR: &str = "_";

/// Why a resource payload could not be turned into an SVG tree.
#[derive(Debug, Error)]
pub enum FragmentError {
    #[error("resource is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("resource has no <svg> root element")]
    MissingRoot,
}

/// Parses a resource payload and returns its outermost `<svg>` element.
///
/// Elements of foreign namespaces (editor metadata, `sodipodi:`, `inkscape:`)
/// are dropped together with their subtrees. Namespaced attributes survive
/// only for `xlink:` and `xml:`.
pub fn parse_fragment(payload: &str) -> Result<XmlElement, FragmentError> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let document = Document::parse_with_options(payload.trim_start(), options)?;
    let root = document
        .descendants()
        .find(|node| node.is_element() && node.tag_name().name() == "svg" && is_svg(*node))
        .ok_or(FragmentError::MissingRoot)?;
    Ok(convert(root))
}

fn is_svg(node: Node<'_, '_>) -> bool {
    matches!(node.tag_name().namespace(), None | Some(ns::SVG))
}

fn convert(node: Node<'_, '_>) -> XmlElement {
    let mut element = XmlElement::new(node.tag_name().name());
    for attribute in node.attributes() {
        let name = match attribute.namespace() {
            None => attribute.name().to_string(),
            Some(ns::XLINK) => format!("xlink:{}", attribute.name()),
            Some(XML_NS) => format!("xml:{}", attribute.name()),
            Some(_) => continue,
        };
        element.set_attribute(name, attribute.value());
    }
    for child in node.children() {
        match child.node_type() {
            NodeType::Element if is_svg(child) => element.push(XmlNode::Element(convert(child))),
            NodeType::Text => {
                if let Some(text) = child.text() {
                    element.push(XmlNode::Text(text.to_string()));
                }
            }
            _ => {}
        }
    }
    element
}

/// Prefixes every identifier in `root` and every local reference to one with `mask + "_"`.
///
/// Rewritten are `id` attributes, `url(#...)` occurrences in any attribute
/// value (including `style`), `href`/`xlink:href` values starting with `#`,
/// and the text of `<style>` elements. In stylesheets both `url(#...)` and
/// `#id` selectors naming an identifier of the fragment are rewritten.
/// External references are left alone.
pub fn mask_identifiers(root: &mut XmlElement, mask: &str) {
    let mut defined = HashSet::new();
    root.walk(&mut |element| {
        if let Some(id) = element.attribute("id") {
            defined.insert(id.to_string());
        }
    });

    let mut rewritten = 0usize;
    root.walk_mut(&mut |element| {
        for (name, value) in element.attributes_mut().iter_mut() {
            let masked = match name.as_str() {
                "id" => Some(format!("{mask}{SEPARATOR}{value}")),
                "href" | "xlink:href" => value
                    .strip_prefix('#')
                    .map(|target| format!("#{mask}{SEPARATOR}{target}")),
                _ => mask_urls(value, mask),
            };
            if let Some(masked) = masked {
                *value = masked;
                rewritten += 1;
            }
        }
        if element.name() != "style" {
            return;
        }
        for child in element.children_mut() {
            if let XmlNode::Text(text) = child {
                if let Some(masked) = mask_stylesheet(text, mask, &defined) {
                    *text = masked;
                    rewritten += 1;
                }
            }
        }
    });
    trace!(mask = mask, rewritten = rewritten; "Masked fragment identifiers");
}

/// Rewrites `#name` in CSS text when it is a `url()` target or names an id in `defined`.
///
/// Hex colors such as `#fff` are kept unless an element is literally named `fff`.
fn mask_stylesheet(text: &str, mask: &str, defined: &HashSet<String>) -> Option<String> {
    if !text.contains('#') {
        return None;
    }

    let mut output = String::with_capacity(text.len() + mask.len() + SEPARATOR.len());
    let mut rest = text;
    let mut changed = false;
    while let Some(start) = rest.find('#') {
        output.push_str(&rest[..start]);
        let target = &rest[start + 1..];
        let len = target
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(target.len());
        let name = &target[..len];
        let in_url = output
            .trim_end_matches(|c: char| c.is_whitespace() || c == '\'' || c == '"')
            .ends_with("url(");

        output.push('#');
        if !name.is_empty() && (in_url || defined.contains(name)) {
            output.push_str(mask);
            output.push_str(SEPARATOR);
            changed = true;
        }
        output.push_str(name);
        rest = &target[len..];
    }
    output.push_str(rest);
    changed.then_some(output)
}

/// Rewrites every `url(#target)` in `value`, or returns None when there is none.
///
/// The target may be wrapped in single or double quotes.
fn mask_urls(value: &str, mask: &str) -> Option<String> {
    if !value.contains("url(") {
        return None;
    }

    let mut output = String::with_capacity(value.len() + mask.len() + 1);
    let mut rest = value;
    let mut changed = false;
    while let Some(start) = rest.find("url(") {
        let (head, tail) = rest.split_at(start + "url(".len());
        output.push_str(head);

        let trimmed = tail.trim_start();
        output.push_str(&tail[..tail.len() - trimmed.len()]);
        let (quote, body) = match trimmed.chars().next() {
            Some(q @ ('"' | '\'')) => (Some(q), &trimmed[1..]),
            _ => (None, trimmed),
        };
        if let Some(q) = quote {
            output.push(q);
        }
        match body.strip_prefix('#') {
            Some(target) => {
                output.push('#');
                output.push_str(mask);
                output.push_str(SEPARATOR);
                rest = target;
                changed = true;
            }
            None => rest = body,
        }
    }
    output.push_str(rest);
    changed.then_some(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"
     xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
     width="40" height="40" sodipodi:docname="cloud.svg">
  <sodipodi:namedview pagecolor="#ffffff"/>
  <defs>
    <linearGradient id="paint"><stop offset="0" stop-color="#fff"/></linearGradient>
    <radialGradient id="glow" xlink:href="#paint"/>
    <clipPath id="clip"><rect width="40" height="40"/></clipPath>
  </defs>
  <g clip-path="url(#clip)">
    <circle id="body" r="10" fill="url(#paint)" style="stroke:url('#glow');opacity:0.5"/>
    <use href="#body"/>
    <image xlink:href="picture.png"/>
  </g>
</svg>"##;

    fn identifiers(root: &XmlElement) -> HashSet<String> {
        let mut ids = HashSet::new();
        root.walk(&mut |element| {
            if let Some(id) = element.attribute("id") {
                ids.insert(id.to_string());
            }
        });
        ids
    }

    /// Every `#target` mentioned in a reference, including urls.
    fn references(root: &XmlElement) -> Vec<String> {
        let mut refs = Vec::new();
        root.walk(&mut |element| {
            for (name, value) in element.attributes() {
                if name.ends_with("href") {
                    if let Some(target) = value.strip_prefix('#') {
                        refs.push(target.to_string());
                    }
                    continue;
                }
                for piece in value.split("url(").skip(1) {
                    let target = piece
                        .trim_start_matches(['\'', '"', '#'])
                        .split(['\'', '"', ')'])
                        .next()
                        .unwrap_or_default();
                    refs.push(target.to_string());
                }
            }
        });
        refs
    }

    #[test]
    fn test_parse_drops_foreign_content() {
        let root = parse_fragment(FRAGMENT).unwrap();
        assert_eq!(root.name(), "svg");
        assert_eq!(root.attribute("width"), Some("40"));
        assert_eq!(root.attribute("docname"), None);
        let names: Vec<_> = root.child_elements().map(|e| e.name().to_string()).collect();
        assert_eq!(names, ["defs", "g"]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_fragment("<svg"), Err(FragmentError::Xml(_))));
        assert!(matches!(
            parse_fragment("<html><body/></html>"),
            Err(FragmentError::MissingRoot)
        ));
    }

    #[test]
    fn test_mask_rewrites_ids_and_references() {
        let mut root = parse_fragment(FRAGMENT).unwrap();
        mask_identifiers(&mut root, "n0");

        assert_eq!(
            identifiers(&root),
            HashSet::from(["n0_paint", "n0_glow", "n0_clip", "n0_body"].map(String::from))
        );
        let mut styles = Vec::new();
        root.walk(&mut |element| {
            if let Some(style) = element.attribute("style") {
                styles.push(style.to_string());
            }
        });
        assert_eq!(styles, ["stroke:url('#n0_glow');opacity:0.5"]);

        let svg = root.to_svg().to_string();
        assert!(svg.contains("url(#n0_clip)"));
        assert!(svg.contains("href=\"#n0_body\""));
        assert!(svg.contains("xlink:href=\"picture.png\""));
    }

    #[test]
    fn test_mask_rewrites_stylesheets() {
        let mut root = parse_fragment(
            r##"<svg xmlns="http://www.w3.org/2000/svg">
  <style>.a{fill:url(#g);stroke:#fff} #g stop{stop-color:#000} url( '#h' )</style>
  <linearGradient id="g"/>
</svg>"##,
        )
        .unwrap();
        mask_identifiers(&mut root, "A");

        let style = root.child_elements().next().unwrap();
        assert_eq!(style.name(), "style");
        let [XmlNode::Text(text)] = style.children() else {
            panic!("expected a single text child");
        };
        assert_eq!(
            text,
            ".a{fill:url(#A_g);stroke:#fff} #A_g stop{stop-color:#000} url( '#A_h' )"
        );
        assert_eq!(identifiers(&root), HashSet::from(["A_g".to_string()]));
    }

    #[test]
    fn test_masked_copies_are_disjoint_and_self_contained() {
        let mut a = parse_fragment(FRAGMENT).unwrap();
        let mut b = a.clone();
        mask_identifiers(&mut a, "A");
        mask_identifiers(&mut b, "B");

        let (ids_a, ids_b) = (identifiers(&a), identifiers(&b));
        let (refs_a, refs_b) = (references(&a), references(&b));
        assert!(ids_a.is_disjoint(&ids_b));
        assert!(refs_a.iter().all(|r| !refs_b.contains(r) && !ids_b.contains(r)));
        assert!(refs_a.iter().all(|r| ids_a.contains(r)));
        assert!(refs_b.iter().all(|r| ids_b.contains(r)));
        assert_eq!(refs_a.len(), 5);
    }

    #[test]
    fn test_mask_urls() {
        assert_eq!(mask_urls("none", "m"), None);
        assert_eq!(mask_urls("url(image.png)", "m"), None);
        assert_eq!(
            mask_urls("url( \"#a\") url(#b)", "m").as_deref(),
            Some("url( \"#m_a\") url(#m_b)")
        );
    }
}
