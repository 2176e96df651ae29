//! Structural emitter: a deterministic Python-literal rendering of the
//! tree, used for golden-file comparison. Maps print as `{'k' : v, ...}`,
//! sequences as `[v, ...]`, absent or empty scalars as `None`; comments are
//! not representable and are skipped.

use smallvec::{smallvec, SmallVec};

use super::writer::Writer;
use crate::context::Context;
use crate::element::{EltId, NodeKind, NO_ELT};

#[derive(Debug, Clone, Copy)]
struct DumpItem {
    id: EltId,
    indent: i32,
    /// Second visit of a container, emitting its closing bracket.
    is_end: bool,
    /// Break the line before this item when indentation is on.
    with_prefix: bool,
    /// Last child of its parent: no trailing comma.
    is_last: bool,
}

pub(crate) fn emit(ctx: &Context, with_indent: bool) -> String {
    let mut w = Writer::with_capacity(16 * 1024);
    let mut stack: SmallVec<[DumpItem; 32]> = smallvec![DumpItem {
        id: 0,
        indent: 0,
        is_end: false,
        with_prefix: false,
        is_last: true,
    }];

    while let Some(item) = stack.pop() {
        let elt = ctx.element(item.id);
        let with_prefix = with_indent && item.with_prefix;

        match elt.kind() {
            NodeKind::Key => {
                if !elt.text().is_empty() {
                    if with_prefix {
                        w.newline();
                        w.push_indent(item.indent);
                    }
                    w.push_byte(b'\'');
                    w.push_str(ctx.get_str(elt.text()));
                    w.push_str("' : ");
                }
                if elt.key_child() != NO_ELT {
                    stack.push(DumpItem {
                        id: elt.key_child(),
                        indent: item.indent,
                        is_end: false,
                        with_prefix: false,
                        is_last: item.is_last,
                    });
                } else {
                    w.push_str("None");
                    if !item.is_last {
                        w.push_byte(b',');
                    }
                }
            }

            NodeKind::Sequence | NodeKind::Map => {
                let (open, close) = if elt.kind() == NodeKind::Sequence {
                    (b'[', b']')
                } else {
                    (b'{', b'}')
                };
                if item.is_end {
                    if with_prefix {
                        w.newline();
                        w.push_indent(item.indent);
                    }
                    w.push_byte(close);
                    if !item.is_last {
                        w.push_byte(b',');
                    }
                } else {
                    // Containers with at most one child stay on one line.
                    let one_liner = elt.child_count() <= 1;
                    stack.push(DumpItem {
                        id: item.id,
                        indent: item.indent,
                        is_end: true,
                        with_prefix: !one_liner,
                        is_last: item.is_last,
                    });
                    if with_prefix {
                        w.newline();
                        w.push_indent(item.indent);
                    }
                    w.push_byte(open);
                    let children = elt.children();
                    for (i, &child) in children.iter().enumerate().rev() {
                        stack.push(DumpItem {
                            id: child,
                            indent: item.indent + 1,
                            is_end: false,
                            with_prefix: !one_liner,
                            is_last: i == children.len() - 1,
                        });
                    }
                }
            }

            NodeKind::Value => {
                if with_prefix {
                    w.newline();
                    w.push_indent(item.indent);
                }
                if elt.text().is_empty() {
                    w.push_str("None");
                } else {
                    w.push_byte(b'"');
                    super::escape_double_quoted(&mut w, ctx.arena.get_bytes(elt.text()));
                    w.push_byte(b'"');
                }
                if !item.is_last {
                    w.push_byte(b',');
                }
            }

            NodeKind::Comment => {}

            NodeKind::Unknown => {
                if with_prefix {
                    w.newline();
                    w.push_indent(item.indent);
                }
                w.push_str("None");
                if !item.is_last {
                    w.push_byte(b',');
                }
            }
        }
    }

    // A skipped trailing comment can leave a dangling separator.
    if w.last_byte() == Some(b',') {
        w.pop_byte();
    }
    w.finish()
}

#[cfg(test)]
mod tests {
    use crate::decode::parse;

    fn flat(input: &str) -> String {
        parse(input).unwrap().as_py_struct(false)
    }

    fn indented(input: &str) -> String {
        parse(input).unwrap().as_py_struct(true)
    }

    #[rstest::rstest]
    fn test_flat_form() {
        assert_eq!(flat("a: 1\nb: 2\n"), "{'a' : \"1\",'b' : \"2\"}");
        assert_eq!(flat("- x\n- y\n"), "[\"x\",\"y\"]");
        assert_eq!(flat("a:\n"), "{'a' : None}");
    }

    #[rstest::rstest]
    fn test_empty_scalars_are_none() {
        assert_eq!(flat("a: ''\n"), "{'a' : None}");
        assert_eq!(flat("-\n- x\n"), "[None,\"x\"]");
    }

    #[rstest::rstest]
    fn test_escaping() {
        assert_eq!(flat("a: |-\n  x\n  y\n"), "{'a' : \"x\\ny\"}");
        assert_eq!(flat("a: \"tab\\there\"\n"), "{'a' : \"tab\\there\"}");
    }

    #[rstest::rstest]
    fn test_comments_are_skipped() {
        // The comment is a map child, so the value keeps its separator.
        assert_eq!(flat("a: 1 # note\n"), "{'a' : \"1\",}");
        assert_eq!(flat("# standalone\na: 1\n"), "{'a' : \"1\"}");
    }

    #[rstest::rstest]
    fn test_indented_form() {
        assert_eq!(
            indented("a: 1\nb: 2\n"),
            "{\n  'a' : \"1\",\n  'b' : \"2\"\n}"
        );
        // One-child containers stay inline.
        assert_eq!(indented("a: 1\n"), "{'a' : \"1\"}");
    }
}
