//! Tag-length-value encoding as used by EMV merchant-presented QR codes.
//!
//! Every field is a two digit tag, a two digit decimal length and the value.
//! Lengths count characters, so the longest value a field can carry is 99.
//! Groups nest: the value of a group is the concatenation of its encoded
//! children.

use crate::error::{PixError, Result};
use crate::payload::constants::MAX_VALUE_LEN;
use std::fmt;
use std::str::FromStr;

/// Two ASCII digit field identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag([u8; 2]);

impl Tag {
    /// Build a tag at compile time. Panics (at compile time for consts) on non-digits.
    pub const fn from_digits(digits: [u8; 2]) -> Self {
        assert!(
            digits[0].is_ascii_digit() && digits[1].is_ascii_digit(),
            "tag must be two ASCII digits"
        );
        Self(digits)
    }

    pub fn new(tag: &str) -> Result<Self> {
        match tag.as_bytes() {
            [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => Ok(Self([*a, *b])),
            _ => Err(PixError::InvalidTag(tag.to_string())),
        }
    }
}

impl FromStr for Tag {
    type Err = PixError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
    }
}

/// Encode a single field: `tag ++ zero padded length ++ value`
pub fn encode_field(tag: Tag, value: &str) -> Result<String> {
    let mut out = String::with_capacity(value.len() + 4);
    write_field(&mut out, tag, value)?;
    Ok(out)
}

fn write_field(out: &mut String, tag: Tag, value: &str) -> Result<()> {
    let len = value.chars().count();
    if len > MAX_VALUE_LEN {
        return Err(PixError::FieldTooLong {
            tag: tag.to_string(),
            len,
        });
    }

    out.push_str(&format!("{tag}{len:02}"));
    out.push_str(value);
    Ok(())
}

/// A node of the payload tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf { tag: Tag, value: String },
    Group { tag: Tag, children: Vec<Node> },
}

impl Node {
    pub fn leaf(tag: Tag, value: impl Into<String>) -> Self {
        Node::Leaf {
            tag,
            value: value.into(),
        }
    }

    pub fn group(tag: Tag, children: Vec<Node>) -> Self {
        Node::Group { tag, children }
    }

    pub fn tag(&self) -> Tag {
        match self {
            Node::Leaf { tag, .. } | Node::Group { tag, .. } => *tag,
        }
    }

    pub fn serialize(&self) -> Result<String> {
        let mut out = String::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    fn write_to(&self, out: &mut String) -> Result<()> {
        match self {
            Node::Leaf { tag, value } => write_field(out, *tag, value),
            Node::Group { tag, children } => {
                let mut inner = String::new();
                for child in children {
                    child.write_to(&mut inner)?;
                }
                write_field(out, *tag, &inner)
            }
        }
    }
}

/// Serialize a sequence of sibling nodes in order
pub fn serialize_all(nodes: &[Node]) -> Result<String> {
    let mut out = String::new();
    for node in nodes {
        node.write_to(&mut out)?;
    }
    Ok(out)
}

/// One decoded field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    pub tag: Tag,
    pub value: String,
}

impl TlvField {
    /// Decode this field's value as a nested group
    pub fn children(&self) -> Result<Vec<TlvField>> {
        parse_fields(&self.value)
    }
}

/// Decode one level of fields. Only meant for payloads this crate produced.
pub fn parse_fields(input: &str) -> Result<Vec<TlvField>> {
    let chars: Vec<char> = input.chars().collect();
    let mut fields = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if pos + 4 > chars.len() {
            return Err(PixError::Malformed(format!(
                "truncated field header at offset {pos}"
            )));
        }

        let tag_str: String = chars[pos..pos + 2].iter().collect();
        let tag = Tag::new(&tag_str)
            .map_err(|_| PixError::Malformed(format!("bad tag {tag_str:?} at offset {pos}")))?;

        let len_str: String = chars[pos + 2..pos + 4].iter().collect();
        if !len_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PixError::Malformed(format!(
                "bad length {len_str:?} for tag {tag}"
            )));
        }
        let len: usize = len_str
            .parse()
            .map_err(|_| PixError::Malformed(format!("bad length {len_str:?} for tag {tag}")))?;

        let start = pos + 4;
        let end = start + len;
        if end > chars.len() {
            return Err(PixError::Malformed(format!(
                "value of tag {tag} runs past end of input"
            )));
        }

        fields.push(TlvField {
            tag,
            value: chars[start..end].iter().collect(),
        });
        pos = end;
    }

    Ok(fields)
}
