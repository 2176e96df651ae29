use crate::arena::StrRef;

/// Element id inside a document's element vector.
///
/// Id 0 is the synthetic root key; since the root can never be a child or a
/// comment, 0 doubles as "none" in child and comment links.
pub(crate) type EltId = u32;

pub(crate) const NO_ELT: EltId = 0;

/// Kind of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Unknown,
    Key,
    Value,
    Sequence,
    Map,
    Comment,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Unknown => "Unknown",
            NodeKind::Key => "Key",
            NodeKind::Value => "Value",
            NodeKind::Sequence => "Sequence",
            NodeKind::Map => "Map",
            NodeKind::Comment => "Comment",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record of the document tree.
///
/// Every reference to another element is an integer id into the same vector;
/// ids are assigned monotonically and never change meaning. Strings are
/// ranges into the document arena.
#[derive(Debug)]
pub(crate) enum Element {
    /// Placeholder for a node whose kind is not known yet (a sequence entry
    /// or key value whose content has not been seen).
    Unknown,
    Key {
        name: StrRef,
        /// The key's single value element, 0 while still unset.
        child: EltId,
        comment: EltId,
    },
    Value {
        text: StrRef,
        comment: EltId,
    },
    Sequence {
        children: Vec<EltId>,
    },
    Map {
        /// Each child is a `Key` or `Comment` element.
        children: Vec<EltId>,
    },
    Comment {
        text: StrRef,
        /// Set when the comment occupied its own line in the source.
        standalone: bool,
        next: EltId,
    },
}

impl Element {
    pub fn new_key(name: StrRef) -> Self {
        Element::Key {
            name,
            child: NO_ELT,
            comment: NO_ELT,
        }
    }

    pub fn new_value(text: StrRef) -> Self {
        Element::Value {
            text,
            comment: NO_ELT,
        }
    }

    pub fn new_comment(text: StrRef, standalone: bool) -> Self {
        Element::Comment {
            text,
            standalone,
            next: NO_ELT,
        }
    }

    pub fn new_container(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Sequence => Element::Sequence {
                children: Vec::new(),
            },
            NodeKind::Map => Element::Map {
                children: Vec::new(),
            },
            _ => unreachable!("only sequences and maps are containers"),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Element::Unknown => NodeKind::Unknown,
            Element::Key { .. } => NodeKind::Key,
            Element::Value { .. } => NodeKind::Value,
            Element::Sequence { .. } => NodeKind::Sequence,
            Element::Map { .. } => NodeKind::Map,
            Element::Comment { .. } => NodeKind::Comment,
        }
    }

    /// String payload of a key, value, or comment.
    pub fn text(&self) -> StrRef {
        match self {
            Element::Key { name, .. } => *name,
            Element::Value { text, .. } => *text,
            Element::Comment { text, .. } => *text,
            _ => StrRef::EMPTY,
        }
    }

    pub fn set_text(&mut self, sref: StrRef) {
        match self {
            Element::Key { name, .. } => *name = sref,
            Element::Value { text, .. } => *text = sref,
            Element::Comment { text, .. } => *text = sref,
            _ => debug_assert!(false, "set_text on a container"),
        }
    }

    /// Children of a container, in visual order.
    pub fn children(&self) -> &[EltId] {
        match self {
            Element::Sequence { children } | Element::Map { children } => children,
            _ => &[],
        }
    }

    pub fn child_count(&self) -> usize {
        match self {
            Element::Key { child, .. } => usize::from(*child != NO_ELT),
            Element::Sequence { children } | Element::Map { children } => children.len(),
            _ => 0,
        }
    }

    pub fn child_at(&self, idx: usize) -> EltId {
        self.children()[idx]
    }

    /// The value element of a key, 0 if unset.
    pub fn key_child(&self) -> EltId {
        match self {
            Element::Key { child, .. } => *child,
            _ => NO_ELT,
        }
    }

    /// Append a child: keys take their single value, containers push.
    pub fn add_child(&mut self, id: EltId) {
        match self {
            Element::Key { child, .. } => *child = id,
            Element::Sequence { children } | Element::Map { children } => children.push(id),
            _ => debug_assert!(false, "add_child on a leaf"),
        }
    }

    pub fn insert_child(&mut self, idx: usize, id: EltId) {
        match self {
            Element::Sequence { children } | Element::Map { children } => {
                children.insert(idx, id);
            }
            _ => debug_assert!(false, "insert_child on a non-container"),
        }
    }

    pub fn remove_child(&mut self, idx: usize) {
        match self {
            Element::Sequence { children } | Element::Map { children } => {
                children.remove(idx);
            }
            _ => debug_assert!(false, "remove_child on a non-container"),
        }
    }

    pub fn replace_child(&mut self, idx: usize, id: EltId) {
        match self {
            Element::Sequence { children } | Element::Map { children } => children[idx] = id,
            _ => debug_assert!(false, "replace_child on a non-container"),
        }
    }

    /// Rewrite this element in place as an empty node of the given kind.
    pub fn reset(&mut self, kind: NodeKind) {
        *self = match kind {
            NodeKind::Unknown => Element::Unknown,
            NodeKind::Value => Element::new_value(StrRef::EMPTY),
            NodeKind::Sequence | NodeKind::Map => Element::new_container(kind),
            _ => unreachable!("reset only targets unknown, value, or containers"),
        };
    }

    /// Attach a comment id: leaves hold it in their comment link, containers
    /// store comments inline among their children.
    pub fn set_comment(&mut self, id: EltId) {
        match self {
            Element::Key { comment, .. } => *comment = id,
            Element::Value { comment, .. } => *comment = id,
            Element::Comment { next, .. } => *next = id,
            Element::Sequence { children } | Element::Map { children } => children.push(id),
            Element::Unknown => debug_assert!(false, "set_comment on an untyped element"),
        }
    }

    /// Next comment in this element's chain, 0 when there is none.
    /// Containers have no chain: their comments are ordinary children.
    pub fn next_comment(&self) -> EltId {
        match self {
            Element::Key { comment, .. } => *comment,
            Element::Value { comment, .. } => *comment,
            Element::Comment { next, .. } => *next,
            _ => NO_ELT,
        }
    }

    pub fn is_standalone_comment(&self) -> bool {
        matches!(
            self,
            Element::Comment {
                standalone: true,
                ..
            }
        )
    }
}
