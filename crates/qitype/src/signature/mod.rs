// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical string descriptors for runtime types.
//!
//! A signature is the compact, wire-portable description of a type:
//! one ASCII code per primitive, `[E]` for a list of `E`, `{KV}` for a
//! map from `K` to `V`, `(E1E2...)` for a tuple, and an optional
//! `<Name,elt1,elt2,...>` annotation right after a tuple carrying the
//! record name and per-element names.
//!
//! A signature may hold several top-level elements (e.g. a call
//! argument list); [`Signature::size`] reports the count and
//! [`Signature::iter`] walks them.
//!
//! Malformed input produces the *invalid* sentinel signature rather
//! than an error; reconciliation failures during inference produce the
//! same sentinel. [`Signature::is_valid`] distinguishes it.

mod convert;
mod infer;

pub use infer::signature_of;

use crate::logging::SIGNATURE_TARGET;
use serde::de::Error as _;
use std::fmt;

/// One-character codes of the signature grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeCode {
    /// Placeholder for "no type" (empty collection element).
    None = b'_',
    /// Unit.
    Void = b'v',
    /// Boolean.
    Bool = b'b',
    /// Signed 8-bit integer.
    Int8 = b'c',
    /// Unsigned 8-bit integer.
    UInt8 = b'C',
    /// Signed 16-bit integer.
    Int16 = b'w',
    /// Unsigned 16-bit integer.
    UInt16 = b'W',
    /// Signed 32-bit integer.
    Int32 = b'i',
    /// Unsigned 32-bit integer.
    UInt32 = b'I',
    /// Signed 64-bit integer.
    Int64 = b'l',
    /// Unsigned 64-bit integer.
    UInt64 = b'L',
    /// 32-bit float.
    Float = b'f',
    /// 64-bit float.
    Double = b'd',
    /// UTF-8 string.
    String = b's',
    /// Dynamic wrapper.
    Dynamic = b'm',
    /// Opaque byte buffer.
    Raw = b'r',
    /// Remote object.
    Object = b'o',
    /// Unknown type.
    Unknown = b'X',
    /// List composite (opening bracket).
    List = b'[',
    /// Map composite (opening brace).
    Map = b'{',
    /// Tuple composite (opening parenthesis).
    Tuple = b'(',
}

impl TypeCode {
    /// Code for a leaf character, if any.
    fn from_leaf(c: u8) -> Option<TypeCode> {
        Some(match c {
            b'_' => TypeCode::None,
            b'v' => TypeCode::Void,
            b'b' => TypeCode::Bool,
            b'c' => TypeCode::Int8,
            b'C' => TypeCode::UInt8,
            b'w' => TypeCode::Int16,
            b'W' => TypeCode::UInt16,
            b'i' => TypeCode::Int32,
            b'I' => TypeCode::UInt32,
            b'l' => TypeCode::Int64,
            b'L' => TypeCode::UInt64,
            b'f' => TypeCode::Float,
            b'd' => TypeCode::Double,
            b's' => TypeCode::String,
            b'm' => TypeCode::Dynamic,
            b'r' => TypeCode::Raw,
            b'o' => TypeCode::Object,
            b'X' => TypeCode::Unknown,
            _ => return None,
        })
    }

    /// ASCII character of this code.
    pub fn as_char(self) -> char {
        self as u8 as char
    }
}

/// One element of a signature tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Node {
    Leaf(TypeCode),
    List(Box<Node>),
    Map(Box<Node>, Box<Node>),
    Tuple {
        members: Vec<Node>,
        annotation: Option<String>,
    },
}

/// A parsed, canonical type signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    nodes: Vec<Node>,
}

impl Signature {
    /// Parse a signature string.
    ///
    /// Malformed input yields the invalid sentinel (with a debug log),
    /// not an error.
    pub fn parse(text: &str) -> Signature {
        match parse_all(text) {
            Some(nodes) => Signature { nodes },
            None => {
                if !text.is_empty() {
                    log::debug!(target: SIGNATURE_TARGET, "malformed signature '{}'", text);
                }
                Signature::invalid()
            }
        }
    }

    /// The invalid sentinel.
    pub fn invalid() -> Signature {
        Signature { nodes: Vec::new() }
    }

    /// True unless this is the invalid sentinel.
    pub fn is_valid(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Single-element signature from a leaf code.
    ///
    /// Composite codes cannot stand alone; they yield the invalid
    /// sentinel.
    pub fn from_code(code: TypeCode) -> Signature {
        match code {
            TypeCode::List | TypeCode::Map | TypeCode::Tuple => Signature::invalid(),
            leaf => Signature {
                nodes: vec![Node::Leaf(leaf)],
            },
        }
    }

    /// `[E]`: list of the given element signature.
    pub fn list_of(element: &Signature) -> Signature {
        match element.single_node() {
            Some(node) => Signature {
                nodes: vec![Node::List(Box::new(node.clone()))],
            },
            None => Signature::invalid(),
        }
    }

    /// `{KV}`: map from the key signature to the value signature.
    pub fn map_of(key: &Signature, value: &Signature) -> Signature {
        match (key.single_node(), value.single_node()) {
            (Some(k), Some(v)) => Signature {
                nodes: vec![Node::Map(Box::new(k.clone()), Box::new(v.clone()))],
            },
            _ => Signature::invalid(),
        }
    }

    /// `(E1E2...)`: tuple of the given member signatures, with an
    /// optional raw annotation (`Name,elt1,elt2,...`).
    pub fn tuple_of(members: &[Signature], annotation: Option<String>) -> Signature {
        let mut nodes = Vec::with_capacity(members.len());
        for m in members {
            match m.single_node() {
                Some(node) => nodes.push(node.clone()),
                None => return Signature::invalid(),
            }
        }
        Signature {
            nodes: vec![Node::Tuple {
                members: nodes,
                annotation,
            }],
        }
    }

    /// Number of top-level elements (1 for a single-type signature).
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// First top-level element.
    pub fn first(&self) -> Option<SignatureItem<'_>> {
        self.nodes.first().map(|node| SignatureItem { node })
    }

    /// Iterate over the top-level elements.
    pub fn iter(&self) -> impl Iterator<Item = SignatureItem<'_>> {
        self.nodes.iter().map(|node| SignatureItem { node })
    }

    fn single_node(&self) -> Option<&Node> {
        if self.nodes.len() == 1 {
            self.nodes.first()
        } else {
            None
        }
    }

    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write_node(f, node)?;
        }
        Ok(())
    }
}

impl serde::Serialize for Signature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Signature {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        let sig = Signature::parse(&text);
        if sig.is_valid() {
            Ok(sig)
        } else {
            Err(D::Error::custom(format!("invalid signature '{}'", text)))
        }
    }
}

/// Borrowed view of one signature element.
#[derive(Debug, Clone, Copy)]
pub struct SignatureItem<'a> {
    node: &'a Node,
}

impl<'a> SignatureItem<'a> {
    /// Code of this element (composites report `List`/`Map`/`Tuple`).
    pub fn code(&self) -> TypeCode {
        match self.node {
            Node::Leaf(code) => *code,
            Node::List(_) => TypeCode::List,
            Node::Map(_, _) => TypeCode::Map,
            Node::Tuple { .. } => TypeCode::Tuple,
        }
    }

    /// Children of a composite: the list element, the map key and
    /// value, or the tuple members. Leaves have none.
    pub fn children(&self) -> Vec<SignatureItem<'a>> {
        match self.node {
            Node::Leaf(_) => Vec::new(),
            Node::List(e) => vec![SignatureItem { node: e }],
            Node::Map(k, v) => vec![SignatureItem { node: k }, SignatureItem { node: v }],
            Node::Tuple { members, .. } => {
                members.iter().map(|node| SignatureItem { node }).collect()
            }
        }
    }

    /// Raw annotation of an annotated tuple (`Name,elt1,elt2,...`).
    pub fn annotation(&self) -> Option<&'a str> {
        match self.node {
            Node::Tuple { annotation, .. } => annotation.as_deref(),
            _ => None,
        }
    }

    /// This element as a standalone signature.
    pub fn to_signature(&self) -> Signature {
        Signature {
            nodes: vec![self.node.clone()],
        }
    }
}

/// Build the raw annotation string for a tuple signature.
///
/// The suffix is present when the tuple has a class name or a complete
/// element-name list; element names are only included when there is one
/// for every member.
pub(crate) fn tuple_annotation(
    class_name: &str,
    element_names: &[String],
    member_count: usize,
) -> Option<String> {
    if class_name.is_empty() && element_names.len() < member_count {
        return None;
    }
    if class_name.is_empty() && member_count == 0 && element_names.is_empty() {
        return None;
    }
    let mut annotation = String::from(class_name);
    if element_names.len() >= member_count {
        for name in element_names.iter().take(member_count) {
            annotation.push(',');
            annotation.push_str(name);
        }
    }
    Some(annotation)
}

fn parse_all(text: &str) -> Option<Vec<Node>> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    let mut nodes = Vec::new();
    while pos < bytes.len() {
        nodes.push(parse_node(text, bytes, &mut pos)?);
    }
    if nodes.is_empty() {
        None
    } else {
        Some(nodes)
    }
}

fn parse_node(text: &str, bytes: &[u8], pos: &mut usize) -> Option<Node> {
    match *bytes.get(*pos)? {
        b'[' => {
            *pos += 1;
            let element = parse_node(text, bytes, pos)?;
            expect(bytes, pos, b']')?;
            Some(Node::List(Box::new(element)))
        }
        b'{' => {
            *pos += 1;
            let key = parse_node(text, bytes, pos)?;
            let value = parse_node(text, bytes, pos)?;
            expect(bytes, pos, b'}')?;
            Some(Node::Map(Box::new(key), Box::new(value)))
        }
        b'(' => {
            *pos += 1;
            let mut members = Vec::new();
            while *bytes.get(*pos)? != b')' {
                members.push(parse_node(text, bytes, pos)?);
            }
            *pos += 1; // consume ')'
            let annotation = parse_annotation(text, bytes, pos)?;
            Some(Node::Tuple {
                members,
                annotation,
            })
        }
        c => {
            let code = TypeCode::from_leaf(c)?;
            *pos += 1;
            Some(Node::Leaf(code))
        }
    }
}

/// An annotation binds to the tuple whose `)` it directly follows.
/// `<` nests, so annotations can carry template-like names.
fn parse_annotation(text: &str, bytes: &[u8], pos: &mut usize) -> Option<Option<String>> {
    if bytes.get(*pos) != Some(&b'<') {
        return Some(None);
    }
    let start = *pos + 1;
    let mut depth = 1usize;
    let mut end = start;
    while depth > 0 {
        match bytes.get(end)? {
            b'<' => depth += 1,
            b'>' => depth -= 1,
            _ => {}
        }
        end += 1;
    }
    *pos = end;
    // end - 1 is the matching '>'; delimiters are ASCII so slicing is safe
    Some(Some(text[start..end - 1].to_string()))
}

fn expect(bytes: &[u8], pos: &mut usize, c: u8) -> Option<()> {
    if bytes.get(*pos) == Some(&c) {
        *pos += 1;
        Some(())
    } else {
        None
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    match node {
        Node::Leaf(code) => write!(f, "{}", code.as_char()),
        Node::List(e) => {
            write!(f, "[")?;
            write_node(f, e)?;
            write!(f, "]")
        }
        Node::Map(k, v) => {
            write!(f, "{{")?;
            write_node(f, k)?;
            write_node(f, v)?;
            write!(f, "}}")
        }
        Node::Tuple {
            members,
            annotation,
        } => {
            write!(f, "(")?;
            for m in members {
                write_node(f, m)?;
            }
            write!(f, ")")?;
            if let Some(a) = annotation {
                write!(f, "<{}>", a)?;
            }
            Ok(())
        }
    }
}
