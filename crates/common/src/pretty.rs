//! Human readable rendering of node trees, for logs and the CLI.

use std::fmt;

use serde_json::Value;

use crate::jose::json::encode_b64;
use crate::linked_data::Ipld;

const INDENT: &str = "    ";

/// Render `node` as indented, JSON-like text.
///
/// Bytes are shown as quoted unpadded base64url and links as quoted CID
///  strings, so a JWS reads the same as its JSON serialization would.
pub fn to_string(node: &Ipld) -> String {
    Pretty(node).to_string()
}

/// [`fmt::Display`] adapter behind [`to_string`], handy in `tracing` fields.
pub struct Pretty<'a>(pub &'a Ipld);

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self.0, 0)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Ipld, depth: usize) -> fmt::Result {
    match node {
        Ipld::Null => write!(f, "null"),
        Ipld::Bool(b) => write!(f, "{b}"),
        Ipld::Integer(i) => write!(f, "{i}"),
        Ipld::Float(x) => write!(f, "{x:?}"),
        Ipld::String(s) => write_json_string(f, s),
        Ipld::Bytes(bytes) => write!(f, "\"{}\"", encode_b64(bytes)),
        Ipld::Link(cid) => write!(f, "\"{cid}\""),
        Ipld::List(nodes) if nodes.is_empty() => write!(f, "[]"),
        Ipld::List(nodes) => {
            writeln!(f, "[")?;
            for node in nodes {
                indent(f, depth + 1)?;
                write_node(f, node, depth + 1)?;
                writeln!(f, ",")?;
            }
            indent(f, depth)?;
            write!(f, "]")
        }
        Ipld::Map(map) if map.is_empty() => write!(f, "{{}}"),
        Ipld::Map(map) => {
            writeln!(f, "{{")?;
            for (key, node) in map {
                indent(f, depth + 1)?;
                write_json_string(f, key)?;
                write!(f, ": ")?;
                write_node(f, node, depth + 1)?;
                writeln!(f, ",")?;
            }
            indent(f, depth)?;
            write!(f, "}}")
        }
    }
}

// JSON escaping, not Rust's Debug escaping
fn write_json_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "{}", Value::from(s))
}

fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}
