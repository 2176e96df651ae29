use crate::context::Context;
use crate::element::{NodeKind, EltId, NO_ELT};
use crate::encode;
use crate::node::{Node, NodeMut};

/// An owned document tree.
///
/// The document owns the arena, the element vector, and the key index.
/// Views obtained through [`root`](Self::root) and
/// [`root_mut`](Self::root_mut) address the top-level value; a freshly
/// created (or empty-input) document has none until something is assigned.
#[derive(Debug)]
pub struct Document {
    ctx: Context,
}

impl Document {
    pub fn new() -> Self {
        Self {
            ctx: Context::with_arena_capacity(64),
        }
    }

    pub(crate) fn from_context(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Element addressed by the root views: the root key's value when it
    /// has one, otherwise the root slot itself (so that assigning through
    /// an empty document rewrites it in place).
    fn root_id(&self) -> EltId {
        let root = self.ctx.element(0);
        if root.kind() == NodeKind::Key && root.key_child() != NO_ELT {
            root.key_child()
        } else {
            0
        }
    }

    pub fn root(&self) -> Node<'_> {
        Node {
            id: self.root_id(),
            ctx: &self.ctx,
        }
    }

    pub fn root_mut(&mut self) -> NodeMut<'_> {
        NodeMut {
            id: self.root_id(),
            ctx: &mut self.ctx,
            pending_key: None,
        }
    }

    /// Emit the canonical YAML form.
    pub fn as_yaml(&self) -> String {
        encode::emit_yaml(&self.ctx)
    }

    /// Emit the structural (Python-literal) form used for golden testing.
    pub fn as_py_struct(&self, with_indent: bool) -> String {
        encode::pystruct::emit(&self.ctx, with_indent)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
