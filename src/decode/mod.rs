//! Parsing: turns source text into a [`Document`].
//!
//! The driver keeps a stack of indentation contexts, one per open element.
//! Each frame records the column its element was introduced at and the
//! column of the element's first child (`-1` until one is seen); every
//! token either extends the innermost context or pops back to the frame its
//! column belongs to. Sequence entries and key values enter the tree as
//! `Unknown` placeholders and are rewritten in place once their content
//! shows what they are, which is how empty values and the `- key:` idiom
//! fall out naturally.

pub(crate) mod scanner;

use smallvec::{smallvec, SmallVec};

use crate::context::Context;
use crate::document::Document;
use crate::element::{Element, EltId, NodeKind};
use crate::error::{Error, Result};
use scanner::{Scanner, TokenKind};

/// One open element on the indentation stack.
#[derive(Debug, Clone, Copy)]
struct Frame {
    elt: EltId,
    /// Column the element was introduced at.
    indent: i32,
    /// Column of the first child, -1 while the element has none.
    child_indent: i32,
}

/// Parse a whole input into a document. On error no partial document is
/// returned; the arena, elements, and index are dropped as a unit.
pub fn parse(text: &str) -> Result<Document> {
    let mut ctx = Context::with_arena_capacity(text.len());
    let mut scanner = Scanner::new(text.as_bytes());

    // Bottom frame is the synthetic root key.
    let mut stack: SmallVec<[Frame; 16]> = smallvec![Frame {
        elt: 0,
        indent: -1,
        child_indent: -1,
    }];

    // Reference column for block scalars and plain continuation, refreshed
    // on newlines and structural tokens.
    let mut ml_parent_indent = -1;
    // Start of the token being processed, for error reporting.
    let mut token_line = 1;
    let mut token_pos = 0;

    loop {
        let starts_line = scanner.at_line_start();
        let token = scanner.next_token(ml_parent_indent, &mut ctx)?;

        match token.kind {
            TokenKind::Comment => {
                let id = ctx.push_element(Element::new_comment(token.text, starts_line));

                // Attach to the innermost typed element; a trailing Unknown
                // placeholder delegates to the frame underneath it.
                let mut target = stack[stack.len() - 1].elt;
                if ctx.element(target).kind() == NodeKind::Unknown && stack.len() >= 2 {
                    target = stack[stack.len() - 2].elt;
                }
                if ctx.element(target).kind() != NodeKind::Unknown {
                    loop {
                        let next = ctx.element(target).next_comment();
                        if next == 0 {
                            break;
                        }
                        target = next;
                    }
                    ctx.element_mut(target).set_comment(id);
                }
            }

            TokenKind::Caret => {
                ml_parent_indent = token.column;
                let col = token.column;

                // Pop until the caret belongs to the top frame. A caret
                // directly below a key at the key's own column stays with
                // that key ("a:\n- b").
                while let Some(&top) = stack.last() {
                    let top_kind = ctx.element(top.elt).kind();
                    if top_kind == NodeKind::Key && col == top.indent {
                        break;
                    }
                    if top_kind == NodeKind::Unknown && stack.len() >= 2 {
                        let under = stack[stack.len() - 2];
                        if ctx.element(under.elt).kind() == NodeKind::Key && col == under.indent {
                            break;
                        }
                    }
                    if col > top.indent {
                        break;
                    }
                    if top.child_indent >= 0 && col >= top.child_indent {
                        break;
                    }
                    stack.pop();
                }

                let Some(&top) = stack.last() else {
                    return Err(Error::parse(
                        token_line,
                        scanner.line_text_at(token_pos),
                        format!("the indentation of the caret (={col}) does not match any parent"),
                    ));
                };
                if top.child_indent >= 0 && col != top.child_indent {
                    return Err(Error::parse(
                        token_line,
                        scanner.line_text_at(token_pos),
                        format!(
                            "the indentation of the caret (={col}) is not aligned with other \
                             child elements (={})",
                            top.child_indent
                        ),
                    ));
                }

                // Promote the parent to a sequence if it is not one yet.
                if ctx.element(top.elt).kind() != NodeKind::Sequence {
                    match ctx.element(top.elt).kind() {
                        NodeKind::Unknown => {
                            ctx.element_mut(top.elt).reset(NodeKind::Sequence);
                            let last = stack.len() - 1;
                            stack[last].indent = col;
                            stack[last].child_indent = col;
                            if stack[last - 1].child_indent < 0 {
                                stack[last - 1].child_indent = col;
                            }
                        }
                        kind => {
                            if kind == NodeKind::Key && ctx.element(top.elt).child_count() > 0 {
                                return Err(Error::parse(
                                    token_line,
                                    scanner.line_text_at(token_pos),
                                    "probably bad indentation with caret, as the parent ('Key') \
                                     already has a value",
                                ));
                            }
                            let id = ctx.push_element(Element::new_container(NodeKind::Sequence));
                            ctx.element_mut(top.elt).add_child(id);
                            stack.push(Frame {
                                elt: id,
                                indent: col,
                                child_indent: col,
                            });
                        }
                    }
                }

                // New entry starts untyped so empty entries stay representable.
                let id = ctx.push_element(Element::Unknown);
                let seq = stack[stack.len() - 1].elt;
                ctx.element_mut(seq).add_child(id);
                stack.push(Frame {
                    elt: id,
                    indent: col,
                    child_indent: -1,
                });
            }

            TokenKind::Key => {
                ml_parent_indent = token.column;
                let col = token.column;

                while let Some(&top) = stack.last() {
                    if col <= top.indent {
                        stack.pop();
                    } else {
                        break;
                    }
                }

                let Some(&top) = stack.last() else {
                    return Err(Error::parse(
                        token_line,
                        scanner.line_text_at(token_pos),
                        format!("the indentation of the key (={col}) does not match any parent"),
                    ));
                };
                if top.child_indent >= 0 && col < top.child_indent {
                    return Err(Error::parse(
                        token_line,
                        scanner.line_text_at(token_pos),
                        format!(
                            "the indentation of the key (={col}) is not aligned with other \
                             child elements (={})",
                            top.child_indent
                        ),
                    ));
                }
                if top.child_indent < 0 {
                    let last = stack.len() - 1;
                    stack[last].child_indent = col;
                }

                // Promote the parent to a map if needed; "- a:" implies a
                // map between the caret entry and the key.
                let top = stack[stack.len() - 1];
                if ctx.element(top.elt).kind() != NodeKind::Map {
                    match ctx.element(top.elt).kind() {
                        NodeKind::Unknown => ctx.element_mut(top.elt).reset(NodeKind::Map),
                        kind => {
                            if kind == NodeKind::Key && ctx.element(top.elt).child_count() > 0 {
                                return Err(Error::parse(
                                    token_line,
                                    scanner.line_text_at(token_pos),
                                    format!(
                                        "probably bad indentation, as the parent ('{kind}') \
                                         already has a value"
                                    ),
                                ));
                            }
                            let id = ctx.push_element(Element::new_container(NodeKind::Map));
                            ctx.element_mut(top.elt).add_child(id);
                            stack.push(Frame {
                                elt: id,
                                indent: top.indent,
                                child_indent: -1,
                            });
                        }
                    }
                }
                if stack[stack.len() - 1].child_indent < 0 {
                    let last = stack.len() - 1;
                    stack[last].child_indent = col;
                }

                let map_id = stack[stack.len() - 1].elt;
                let key_id = ctx.push_element(Element::new_key(token.text));
                ctx.element_mut(map_id).add_child(key_id);
                let slot = ctx.element(map_id).child_count() as u32 - 1;
                if !ctx.add_map_child_ref(map_id, token.text, slot) {
                    let key = ctx.get_str(token.text);
                    return Err(Error::parse(
                        token_line,
                        scanner.line_text_at(token_pos),
                        format!(
                            "duplicated key are forbidden and the key '{key}' is already present."
                        ),
                    ));
                }
                stack.push(Frame {
                    elt: key_id,
                    indent: col,
                    child_indent: -1,
                });

                // The key's value starts untyped.
                let unknown_id = ctx.push_element(Element::Unknown);
                ctx.element_mut(key_id).add_child(unknown_id);
                stack.push(Frame {
                    elt: unknown_id,
                    indent: col,
                    child_indent: -1,
                });
            }

            TokenKind::Scalar => {
                let col = token.column;
                let top = stack[stack.len() - 1];

                if col <= top.indent {
                    return Err(Error::parse(
                        token_line,
                        scanner.line_text_at(token_pos),
                        format!(
                            "the indentation of the value (={col}) is not compatible with the \
                             parent indentation (={})",
                            top.indent
                        ),
                    ));
                }
                if top.child_indent >= 0 && col < top.child_indent {
                    return Err(Error::parse(
                        token_line,
                        scanner.line_text_at(token_pos),
                        format!(
                            "the indentation of the value (={col}) is not aligned with other \
                             child elements (={})",
                            top.child_indent
                        ),
                    ));
                }
                if ctx.element(top.elt).kind() == NodeKind::Map {
                    return Err(Error::parse(
                        token_line,
                        scanner.line_text_at(token_pos),
                        "in a map, a value without a key is forbidden",
                    ));
                }
                if top.child_indent < 0 {
                    let last = stack.len() - 1;
                    stack[last].child_indent = col;
                }

                let top = stack[stack.len() - 1];
                if ctx.element(top.elt).kind() == NodeKind::Unknown {
                    let elt = ctx.element_mut(top.elt);
                    elt.reset(NodeKind::Value);
                    elt.set_text(token.text);
                    stack.pop();
                } else {
                    let id = ctx.push_element(Element::new_value(token.text));
                    ctx.element_mut(top.elt).add_child(id);
                }

                // A key holds exactly one child, so it is complete now.
                if ctx.element(stack[stack.len() - 1].elt).kind() == NodeKind::Key {
                    stack.pop();
                }
            }

            TokenKind::Newline => {
                ml_parent_indent = stack[stack.len() - 1].indent;
            }

            TokenKind::Eos => break,
        }

        token_line = scanner.line();
        token_pos = scanner.pos();
    }

    Ok(Document::from_context(ctx))
}
