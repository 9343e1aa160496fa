//! Accessors over decoded XMI nodes.
//!
//! Vendors spell the same thing several ways (`xmi:id` vs `id`, a `name`
//! attribute vs a `<name>` child, `type="id"` vs `<type xmi:idref="id"/>`
//! vs `<type href="file#id"/>`). XMI 1.x adds its own: `xmi.id`,
//! `xmi.idref`, and references wrapped in property elements such as
//! `<UML:Dependency.client>`. These helpers hide the spelling so the
//! extractor and resolver can ask one question per concept.

use serde_json::{Map, Value};

use super::decode::{ATTR_PREFIX, TEXT_KEY};

/// A decoded XML element.
pub type Node = Map<String, Value>;

/// Get an attribute value by its qualified XML name (without the `@`).
pub fn attr<'a>(node: &'a Node, name: &str) -> Option<&'a str> {
    node.iter()
        .find(|(k, _)| k.strip_prefix(ATTR_PREFIX) == Some(name))
        .and_then(|(_, v)| v.as_str())
}

/// Iterate over attribute `(name, value)` pairs, without the `@` prefix.
pub fn attrs(node: &Node) -> impl Iterator<Item = (&str, &str)> {
    node.iter().filter_map(|(k, v)| {
        let name = k.strip_prefix(ATTR_PREFIX)?;
        Some((name, v.as_str()?))
    })
}

/// Iterate over the child objects stored under `key`, whether one or many.
pub fn children<'a>(node: &'a Node, key: &str) -> impl Iterator<Item = &'a Node> + use<'a> {
    objects(node.get(key))
}

/// Flatten an optional object-or-array value into its objects.
pub fn objects(value: Option<&Value>) -> impl Iterator<Item = &Node> {
    let items: &[Value] = match value {
        Some(Value::Array(items)) => items,
        Some(v @ Value::Object(_)) => std::slice::from_ref(v),
        _ => &[],
    };
    items.iter().filter_map(Value::as_object)
}

/// Element id: `xmi:id`, then XMI 1.x `xmi.id`, then plain `id`, then the
/// uuid in either spelling.
pub fn id_of(node: &Node) -> Option<&str> {
    attr(node, "xmi:id")
        .or_else(|| attr(node, "xmi.id"))
        .or_else(|| attr(node, "id"))
        .or_else(|| attr(node, "xmi:uuid"))
        .or_else(|| attr(node, "xmi.uuid"))
        .filter(|s| !s.is_empty())
}

/// Element name from the `name`/`declaredName` attribute or a `<name>` child.
pub fn name_of(node: &Node) -> Option<&str> {
    attr(node, "name")
        .or_else(|| attr(node, "declaredName"))
        .or_else(|| {
            children(node, "name")
                .next()
                .and_then(|n| n.get(TEXT_KEY))
                .and_then(Value::as_str)
        })
}

/// The local part of a possibly namespaced name (`uml:Class` -> `Class`).
pub fn local_name(qname: &str) -> &str {
    qname.rsplit(':').next().unwrap_or(qname)
}

/// Kind tag of a node: `xmi:type`/`xsi:type` when present, else the tag.
pub fn kind_of<'a>(tag: &'a str, node: &'a Node) -> &'a str {
    let raw = attr(node, "xmi:type")
        .or_else(|| attr(node, "xsi:type"))
        .unwrap_or(tag);
    local_name(raw)
}

/// Reference ids carried by a node's `key`, in either encoding.
///
/// `key="a b"` (whitespace-separated IDREFS) and
/// `<key xmi:idref="a"/><key href="file#b"/>` both yield `["a", "b"]`, as
/// does the XMI 1.x `<UML:Owner.key><UML:Class xmi.idref="a"/>...`.
pub fn refs<'a>(node: &'a Node, key: &str) -> Vec<&'a str> {
    let mut out: Vec<&str> = attr(node, key)
        .map(|v| v.split_whitespace().collect())
        .unwrap_or_default();
    out.extend(children(node, key).filter_map(idref_of));
    let wrappers = node
        .iter()
        .filter(|(tag, _)| feature_of(tag) == Some(key))
        .flat_map(|(_, value)| objects(Some(value)));
    for wrapper in wrappers {
        out.extend(wrapper.values().flat_map(|v| objects(Some(v))).filter_map(idref_of));
    }
    out
}

/// First reference id carried by a node's `key`.
pub fn first_ref<'a>(node: &'a Node, key: &str) -> Option<&'a str> {
    refs(node, key).into_iter().next()
}

/// The id a reference-only node points at.
pub fn idref_of(node: &Node) -> Option<&str> {
    attr(node, "xmi:idref")
        .or_else(|| attr(node, "xmi.idref"))
        .or_else(|| attr(node, "idref"))
        .or_else(|| attr(node, "href").map(href_fragment))
        .filter(|s| !s.is_empty())
}

/// Fragment of an href (`path/File.xmi#id` -> `id`).
pub fn href_fragment(href: &str) -> &str {
    href.rsplit('#').next().unwrap_or(href)
}

/// Feature named by an XMI 1.x property tag (`UML:Dependency.client` ->
/// `client`). Attribute keys never match.
fn feature_of(tag: &str) -> Option<&str> {
    if tag.starts_with(ATTR_PREFIX) {
        return None;
    }
    local_name(tag).split_once('.').map(|(_, feature)| feature)
}

/// XMI 1.x property element: a dotted tag (`UML:Namespace.ownedElement`)
/// carrying no attributes, whose children are the property's values.
pub fn is_property_element(tag: &str, node: &Node) -> bool {
    feature_of(tag).is_some() && attrs(node).next().is_none()
}

/// XMI 1.x reference stub (`<UML:Class xmi.idref="c1"/>`). It names an
/// element declared elsewhere.
pub fn is_reference_stub(node: &Node) -> bool {
    attr(node, "xmi.idref").is_some() && id_of(node).is_none()
}

/// Does any attribute name start with `base_` (a stereotype application)?
pub fn is_stereotype_application(node: &Node) -> bool {
    attrs(node).any(|(k, _)| local_name(k).starts_with("base_"))
}
