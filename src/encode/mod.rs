//! Emitters: read-only walks over a document's element tree.
//!
//! Both emitters drive an explicit work stack instead of recursing, so
//! document depth is bounded by memory rather than by the call stack. The
//! YAML emitter reproduces an editable document; the structural emitter in
//! [`pystruct`] produces the deterministic bracketed form used by golden
//! tests.

pub(crate) mod pystruct;
mod writer;

use smallvec::{smallvec, SmallVec};

use crate::context::Context;
use crate::element::{EltId, NodeKind, NO_ELT};
use writer::Writer;

/// Double-quote escaping shared by both emitters. A backslash directly
/// before `u`, `U`, or `x` stays single so preserved escape sequences
/// survive the round trip.
fn escape_double_quoted(w: &mut Writer, text: &[u8]) {
    for (i, &byte) in text.iter().enumerate() {
        match byte {
            b'"' => w.push_str("\\\""),
            b'\n' => w.push_str("\\n"),
            b'\r' => w.push_str("\\r"),
            b'\t' => w.push_str("\\t"),
            b'\\' => {
                if i + 1 >= text.len() || !matches!(text[i + 1], b'u' | b'U' | b'x') {
                    w.push_byte(b'\\');
                }
                w.push_byte(b'\\');
            }
            other => w.push_byte(other),
        }
    }
}

/// Write a scalar, choosing its style: plain when nothing in the text can
/// be misread (no leading indicator char, no trailing space, no tab or
/// carriage return, no key-like `: `, no comment-like ` #`, no newline),
/// else single-quoted when single-line, else double-quoted.
fn emit_scalar(w: &mut Writer, text: &[u8], after_key: bool) {
    let len = text.len();
    let mut is_plain =
        !matches!(text[0], b' ' | b'>' | b'|' | b'\'' | b'"') && text[len - 1] != b' ';
    let mut newline_count = 0;
    for i in 0..len {
        let c = text[i];
        if c == b'\n' {
            newline_count += 1;
        }
        if is_plain {
            if c == b'\t' || c == b'\r' {
                is_plain = false;
            } else if c == b':' && i + 1 < len && matches!(text[i + 1], b' ' | b'\r' | b'\n') {
                is_plain = false;
            } else if c == b'#' && (i == 0 || text[i - 1] == b' ') {
                is_plain = false;
            }
        }
    }

    if after_key {
        w.push_byte(b' ');
    }
    if is_plain && newline_count == 0 {
        w.push_bytes(text);
    } else if newline_count == 0 {
        w.push_byte(b'\'');
        for &c in text {
            if c == b'\'' {
                w.push_str("''");
            } else {
                w.push_byte(c);
            }
        }
        w.push_byte(b'\'');
    } else {
        w.push_byte(b'"');
        escape_double_quoted(w, text);
        w.push_byte(b'"');
    }
}

#[derive(Debug, Clone, Copy)]
struct YamlItem {
    id: EltId,
    indent: i32,
    parent_kind: NodeKind,
}

pub(crate) fn emit_yaml(ctx: &Context) -> String {
    let mut w = Writer::with_capacity(16 * 1024);
    let mut is_first = true;
    let mut last_is_comment = false;
    let mut last_is_key = false;

    let mut stack: SmallVec<[YamlItem; 32]> = smallvec![YamlItem {
        id: 0,
        indent: 0,
        parent_kind: ctx.element(0).kind(),
    }];

    while let Some(item) = stack.pop() {
        let elt = ctx.element(item.id);
        let kind = elt.kind();
        let mut indent = item.indent;

        match kind {
            NodeKind::Key => {
                // The root key has an empty name and emits nothing itself.
                if !elt.text().is_empty() {
                    if item.parent_kind == NodeKind::Sequence {
                        indent += 1;
                    } else {
                        if !is_first {
                            w.newline();
                        }
                        w.push_indent(indent);
                    }
                    w.push_str(ctx.get_str(elt.text()));
                    w.push_byte(b':');
                    indent += 1;
                    is_first = false;
                }
                if elt.key_child() != NO_ELT {
                    stack.push(YamlItem {
                        id: elt.key_child(),
                        indent,
                        parent_kind: NodeKind::Key,
                    });
                }
                last_is_key = true;
            }

            NodeKind::Sequence => {
                if item.parent_kind == NodeKind::Sequence {
                    if !is_first {
                        w.newline();
                    }
                    w.push_indent(indent);
                    w.push_str("- ");
                    indent += 1;
                }
                for &child in elt.children().iter().rev() {
                    stack.push(YamlItem {
                        id: child,
                        indent,
                        parent_kind: NodeKind::Sequence,
                    });
                }
                is_first = false;
            }

            NodeKind::Map => {
                if item.parent_kind == NodeKind::Sequence {
                    if !is_first {
                        w.newline();
                    }
                    w.push_indent(indent);
                    w.push_str("- ");
                    indent += 1;
                }
                let children = elt.children();
                for &child in children.iter().rev() {
                    stack.push(YamlItem {
                        id: child,
                        indent,
                        parent_kind: NodeKind::Map,
                    });
                }
                // The first entry of a map sequence item shares the
                // caret's line.
                if item.parent_kind == NodeKind::Sequence && !children.is_empty() {
                    let top = stack.last_mut().expect("children were just pushed");
                    top.indent -= 1;
                    top.parent_kind = NodeKind::Sequence;
                }
            }

            NodeKind::Value => {
                if item.parent_kind != NodeKind::Key || last_is_comment {
                    if !is_first {
                        w.newline();
                    }
                    w.push_indent(indent);
                    if item.parent_kind == NodeKind::Sequence {
                        w.push_str("- ");
                    }
                }
                if item.parent_kind == NodeKind::Sequence {
                    indent += 1;
                }
                if !elt.text().is_empty() {
                    emit_scalar(&mut w, ctx.arena.get_bytes(elt.text()), last_is_key);
                    is_first = false;
                }
            }

            NodeKind::Comment => {
                if elt.is_standalone_comment() {
                    if !is_first {
                        w.newline();
                    }
                    w.push_indent(indent);
                } else {
                    w.push_byte(b' ');
                }
                w.push_byte(b'#');
                w.push_str(ctx.get_str(elt.text()));
                last_is_comment = true;
                is_first = false;
            }

            NodeKind::Unknown => {
                if item.parent_kind != NodeKind::Key {
                    if !is_first {
                        w.newline();
                    }
                    w.push_indent(indent);
                    if item.parent_kind == NodeKind::Sequence {
                        w.push_str("- ");
                        indent += 1;
                    }
                }
            }
        }

        if kind != NodeKind::Comment {
            last_is_comment = false;
        }
        if kind != NodeKind::Key {
            last_is_key = false;
        }

        // Comments piggybacked on this element.
        let mut next = elt.next_comment();
        while next != NO_ELT {
            let comment = ctx.element(next);
            if last_is_comment || comment.is_standalone_comment() {
                if !is_first {
                    w.newline();
                }
                w.push_indent(indent);
            } else {
                w.push_byte(b' ');
            }
            w.push_byte(b'#');
            w.push_str(ctx.get_str(comment.text()));
            next = comment.next_comment();
            last_is_comment = true;
            is_first = false;
        }
    }

    w.finish()
}

#[cfg(test)]
mod tests {
    use crate::decode::parse;

    fn yaml(input: &str) -> String {
        parse(input).unwrap().as_yaml()
    }

    #[rstest::rstest]
    fn test_map_and_nested_sequence() {
        assert_eq!(
            yaml("foo: 1\nbar:\n - 2\n - 3\n"),
            "foo: 1\nbar:\n  - 2\n  - 3"
        );
    }

    #[rstest::rstest]
    fn test_sequence_item_map_shares_caret_line() {
        assert_eq!(yaml("- x: 1\n  y: 2\n"), "- x: 1\n  y: 2");
    }

    #[rstest::rstest]
    fn test_scalar_styles() {
        // Plain survives.
        assert_eq!(yaml("a: plain text\n"), "a: plain text");
        // Leading quote forces single-quote style.
        assert_eq!(yaml("a: '''quoted'''\n"), "a: '''quoted'''");
        // Key-like content cannot stay plain.
        assert_eq!(yaml("a: 'k: v'\n"), "a: 'k: v'");
        // Newlines force double quotes.
        assert_eq!(yaml("a: |-\n  x\n  y\n"), "a: \"x\\ny\"");
    }

    #[rstest::rstest]
    fn test_comment_placement() {
        assert_eq!(yaml("# head\nfoo: 1\n"), "# head\nfoo: 1");
        assert_eq!(yaml("foo: 1 # tail\n"), "foo: 1 # tail");
    }

    #[rstest::rstest]
    fn test_empty_document() {
        assert_eq!(yaml(""), "");
    }
}
