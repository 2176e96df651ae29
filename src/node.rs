//! Read and write views over document elements.
//!
//! A [`Node`] is a cheap copyable view `(element id, &Context)`; it never
//! owns storage. A [`NodeMut`] additionally carries an optional pending key:
//! looking up an absent key in a map yields a node that errors on every read
//! but materializes the key-value pair on assignment.

use smol_str::SmolStr;

use crate::context::Context;
use crate::convert::{FromScalar, ToScalar};
use crate::element::{Element, EltId, NodeKind, NO_ELT};
use crate::error::{Error, Result};

/// Read-only view of one element.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    pub(crate) id: EltId,
    pub(crate) ctx: &'a Context,
}

/// Mutating view of one element.
pub struct NodeMut<'a> {
    pub(crate) id: EltId,
    pub(crate) ctx: &'a mut Context,
    /// Key looked up in this map but not present yet. Set only when the
    /// element is a map.
    pub(crate) pending_key: Option<SmolStr>,
}

/// Human-readable description of an element, used in error messages.
fn describe(ctx: &Context, id: EltId) -> String {
    let elt = ctx.element(id);
    match elt.kind() {
        NodeKind::Unknown => "[ Unknown ]".to_string(),
        NodeKind::Key => {
            if elt.text().is_empty() {
                "[ Root ]".to_string()
            } else {
                format!("[ Key '{}' ]", ctx.get_str(elt.text()))
            }
        }
        NodeKind::Value => format!("[ Value string '{}' ]", ctx.get_str(elt.text())),
        NodeKind::Sequence => format!("[ Sequence of {} elements ]", elt.child_count()),
        NodeKind::Map => format!("[ Map of {} elements ]", elt.child_count()),
        NodeKind::Comment => format!("[ Comment '{}' ]", ctx.get_str(elt.text())),
    }
}

fn check_map<'a>(ctx: &'a Context, id: EltId, operation: &str) -> Result<&'a Element> {
    let elt = ctx.element(id);
    if elt.kind() != NodeKind::Map {
        return Err(Error::access(format!(
            "Access error: '{operation}' can only be used on Map elements, not '{}'",
            describe(ctx, id)
        )));
    }
    Ok(elt)
}

fn check_sequence<'a>(ctx: &'a Context, id: EltId, operation: &str) -> Result<&'a Element> {
    let elt = ctx.element(id);
    if elt.kind() != NodeKind::Sequence {
        return Err(Error::access(format!(
            "Access error: '{operation}' can only be used on Sequence elements, not '{}'",
            describe(ctx, id)
        )));
    }
    Ok(elt)
}

fn check_key_not_empty(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::access(
            "Access error: empty key is not allowed to access a Map element",
        ));
    }
    Ok(())
}

impl<'a> Node<'a> {
    /// Kind of this node; `Unknown` placeholders report as `Value`.
    pub fn kind(&self) -> NodeKind {
        match self.ctx.element(self.id).kind() {
            NodeKind::Unknown => NodeKind::Value,
            kind => kind,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(
            self.ctx.element(self.id).kind(),
            NodeKind::Value | NodeKind::Unknown
        )
    }

    pub fn is_key(&self) -> bool {
        self.ctx.element(self.id).kind() == NodeKind::Key
    }

    pub fn is_sequence(&self) -> bool {
        self.ctx.element(self.id).kind() == NodeKind::Sequence
    }

    pub fn is_map(&self) -> bool {
        self.ctx.element(self.id).kind() == NodeKind::Map
    }

    pub fn is_comment(&self) -> bool {
        self.ctx.element(self.id).kind() == NodeKind::Comment
    }

    /// Scalar text of this node. An `Unknown` placeholder reads as `""`.
    pub fn as_str(&self) -> Result<&'a str> {
        let elt = self.ctx.element(self.id);
        match elt.kind() {
            NodeKind::Value => Ok(self.ctx.get_str(elt.text())),
            NodeKind::Unknown => Ok(""),
            _ => Err(Error::access(format!(
                "Access error: unable to cast this node as it is not of type 'Value' but {}",
                describe(self.ctx, self.id)
            ))),
        }
    }

    /// Decode the scalar through the conversion layer.
    pub fn decode<T: FromScalar>(&self) -> Result<T> {
        let text = self.as_str()?;
        T::decode_scalar(text).map_err(|err| {
            Error::access(format!(
                "Access error: decoding error when accessing '{}':\n  {}",
                describe(self.ctx, self.id),
                err
            ))
        })
    }

    /// Decode the scalar, falling back to `default` on any failure.
    pub fn decode_or<T: FromScalar>(&self, default: T) -> T {
        self.decode().unwrap_or(default)
    }

    /// Name of a key element.
    pub fn key_name(&self) -> Result<&'a str> {
        let elt = self.ctx.element(self.id);
        if elt.kind() != NodeKind::Key {
            return Err(Error::access(format!(
                "Access error: 'key_name()' can only be used on Key elements, not '{}'",
                describe(self.ctx, self.id)
            )));
        }
        Ok(self.ctx.get_str(elt.text()))
    }

    /// Value of a key element; any other node is its own value.
    pub fn value(&self) -> Result<Node<'a>> {
        let elt = self.ctx.element(self.id);
        if elt.kind() == NodeKind::Key {
            let child = elt.key_child();
            if child == NO_ELT {
                return Err(Error::access(format!(
                    "Access error: the key '{}' has no value",
                    self.ctx.get_str(elt.text())
                )));
            }
            return Ok(Node {
                id: child,
                ctx: self.ctx,
            });
        }
        Ok(*self)
    }

    /// Comment text of a comment element.
    pub fn comment_text(&self) -> Result<&'a str> {
        let elt = self.ctx.element(self.id);
        if elt.kind() != NodeKind::Comment {
            return Err(Error::access(format!(
                "Access error: 'comment_text()' can only be used on Comment elements, not '{}'",
                describe(self.ctx, self.id)
            )));
        }
        Ok(self.ctx.get_str(elt.text()))
    }

    /// Number of children of a map or sequence.
    pub fn len(&self) -> Result<usize> {
        let elt = self.ctx.element(self.id);
        match elt.kind() {
            NodeKind::Map | NodeKind::Sequence => Ok(elt.child_count()),
            _ => Err(Error::access(format!(
                "Access error: 'len()' can only be used on the structural elements Map and \
                 Sequence, not '{}'",
                describe(self.ctx, self.id)
            ))),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Sequence element by position.
    pub fn at(&self, idx: usize) -> Result<Node<'a>> {
        let elt = check_sequence(self.ctx, self.id, &format!("[{idx}]"))?;
        if idx >= elt.child_count() {
            return Err(Error::access(format!(
                "Access error: access by '[{idx}]' is out of array bounds for '{}'",
                describe(self.ctx, self.id)
            )));
        }
        Ok(Node {
            id: elt.child_at(idx),
            ctx: self.ctx,
        })
    }

    pub fn has_key(&self, key: &str) -> Result<bool> {
        check_map(self.ctx, self.id, &format!("has_key({key})"))?;
        check_key_not_empty(key)?;
        Ok(self.ctx.map_child_slot(self.id, key.as_bytes()).is_some())
    }

    /// Value under `key`, if present.
    pub fn try_get(&self, key: &str) -> Result<Option<Node<'a>>> {
        let elt = check_map(self.ctx, self.id, &format!("[{key}]"))?;
        check_key_not_empty(key)?;
        let Some(slot) = self.ctx.map_child_slot(self.id, key.as_bytes()) else {
            return Ok(None);
        };
        let key_elt = self.ctx.element(elt.child_at(slot as usize));
        Ok(Some(Node {
            id: key_elt.key_child(),
            ctx: self.ctx,
        }))
    }

    /// Value under `key`; an absent key is an access error.
    pub fn get(&self, key: &str) -> Result<Node<'a>> {
        self.try_get(key)?.ok_or_else(|| {
            Error::access(format!(
                "Access error: '{key}' is a non-existent key in this Map element"
            ))
        })
    }

    /// Children of a map or sequence, in visual order. Map children are the
    /// key elements themselves; use [`key_name`](Self::key_name) and
    /// [`value`](Self::value) on them.
    pub fn children(&self) -> Result<Children<'a>> {
        let elt = self.ctx.element(self.id);
        match elt.kind() {
            NodeKind::Map | NodeKind::Sequence => Ok(Children {
                ids: elt.children().iter(),
                ctx: self.ctx,
            }),
            kind => Err(Error::access(format!(
                "Access error: only the structural elements Map and Sequence can be iterated, \
                 not type '{kind}'"
            ))),
        }
    }

    /// Description used in error messages, e.g. `[ Map of 3 elements ]`.
    pub fn describe(&self) -> String {
        describe(self.ctx, self.id)
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&describe(self.ctx, self.id))
    }
}

/// Iterator over the children of a container node.
pub struct Children<'a> {
    ids: std::slice::Iter<'a, EltId>,
    ctx: &'a Context,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.ids.next()?;
        Some(Node { id, ctx: self.ctx })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl ExactSizeIterator for Children<'_> {}

impl<'a> NodeMut<'a> {
    /// Read-only view of the same element. Errors while a pending key marks
    /// an absent map entry, since there is nothing to read yet.
    pub fn as_node(&self) -> Result<Node<'_>> {
        self.check_no_pending()?;
        Ok(Node {
            id: self.id,
            ctx: &*self.ctx,
        })
    }

    fn check_no_pending(&self) -> Result<()> {
        if let Some(key) = &self.pending_key {
            return Err(Error::access(format!(
                "Access error: '{key}' is a non-existent key in this Map element"
            )));
        }
        Ok(())
    }

    /// Assign a scalar. On a pending key this materializes the key-value
    /// pair; on anything but a key element it rewrites the node as a value.
    pub fn set<T: ToScalar>(&mut self, value: T) -> Result<()> {
        let encoded = value.encode_scalar().map_err(|err| {
            Error::access(format!(
                "Access error: encoding error when assigning to '{}':\n  {}",
                describe(self.ctx, self.id),
                err
            ))
        })?;

        if let Some(key) = self.pending_key.take() {
            return self.materialize_scalar_key(&key, encoded.as_bytes());
        }

        let kind = self.ctx.element(self.id).kind();
        match kind {
            NodeKind::Value => {
                let sref = self.ctx.add_string(encoded.as_bytes());
                self.ctx.element_mut(self.id).set_text(sref);
            }
            NodeKind::Key | NodeKind::Comment => {
                return Err(Error::access(format!(
                    "Access error: a scalar cannot be assigned to '{}'",
                    describe(self.ctx, self.id)
                )));
            }
            _ => {
                let sref = self.ctx.add_string(encoded.as_bytes());
                let elt = self.ctx.element_mut(self.id);
                elt.reset(NodeKind::Value);
                elt.set_text(sref);
            }
        }
        Ok(())
    }

    fn materialize_scalar_key(&mut self, key: &str, encoded: &[u8]) -> Result<()> {
        if self.ctx.map_child_slot(self.id, key.as_bytes()).is_some() {
            // The map changed since the lookup that produced this node.
            self.pending_key = Some(SmolStr::new(key));
            return Err(Error::access(format!(
                "Access error: duplicated key are forbidden and the key '{key}' is already present"
            )));
        }
        let text = self.ctx.add_string(encoded);
        let value_id = self.ctx.push_element(Element::new_value(text));
        let name = self.ctx.add_string(key.as_bytes());
        let mut key_elt = Element::new_key(name);
        key_elt.add_child(value_id);
        let key_id = self.ctx.push_element(key_elt);
        self.ctx.element_mut(self.id).add_child(key_id);
        let slot = self.ctx.element(self.id).child_count() as u32 - 1;
        self.ctx.add_map_child(self.id, key.as_bytes(), slot);
        Ok(())
    }

    /// Rewrite this node as an empty map; a pending key materializes the
    /// key with an empty map as its value.
    pub fn set_map(&mut self) -> Result<()> {
        self.set_container(NodeKind::Map)
    }

    /// Rewrite this node as an empty sequence.
    pub fn set_sequence(&mut self) -> Result<()> {
        self.set_container(NodeKind::Sequence)
    }

    fn set_container(&mut self, kind: NodeKind) -> Result<()> {
        if let Some(key) = self.pending_key.take() {
            if self.ctx.map_child_slot(self.id, key.as_bytes()).is_some() {
                self.pending_key = Some(key.clone());
                return Err(Error::access(format!(
                    "Access error: the key '{key}' has already been added in the map"
                )));
            }
            let container_id = self.ctx.push_element(Element::new_container(kind));
            let name = self.ctx.add_string(key.as_bytes());
            let mut key_elt = Element::new_key(name);
            key_elt.add_child(container_id);
            let key_id = self.ctx.push_element(key_elt);
            self.ctx.element_mut(self.id).add_child(key_id);
            let slot = self.ctx.element(self.id).child_count() as u32 - 1;
            self.ctx.add_map_child(self.id, key.as_bytes(), slot);
            return Ok(());
        }

        if self.ctx.element(self.id).kind() == NodeKind::Comment {
            return Err(Error::access(format!(
                "Access error: a container cannot be assigned to '{}'",
                describe(self.ctx, self.id)
            )));
        }
        self.ctx.element_mut(self.id).reset(kind);
        Ok(())
    }

    /// Mutable view of the value under `key`. An absent key yields a node
    /// carrying the key as pending: reads fail, assignment materializes it.
    pub fn get_mut(&mut self, key: &str) -> Result<NodeMut<'_>> {
        self.check_no_pending()?;
        check_map(self.ctx, self.id, &format!("[{key}]"))?;
        check_key_not_empty(key)?;
        match self.ctx.map_child_slot(self.id, key.as_bytes()) {
            Some(slot) => {
                let key_id = self.ctx.element(self.id).child_at(slot as usize);
                let value_id = self.ctx.element(key_id).key_child();
                Ok(NodeMut {
                    id: value_id,
                    ctx: &mut *self.ctx,
                    pending_key: None,
                })
            }
            None => Ok(NodeMut {
                id: self.id,
                ctx: &mut *self.ctx,
                pending_key: Some(SmolStr::new(key)),
            }),
        }
    }

    /// Insert a new scalar entry in a map. Duplicate keys are rejected
    /// before anything is written.
    pub fn insert<T: ToScalar>(&mut self, key: &str, value: T) -> Result<()> {
        self.check_no_pending()?;
        check_map(self.ctx, self.id, &format!("insert({key}, ...)"))?;
        check_key_not_empty(key)?;
        if self.ctx.map_child_slot(self.id, key.as_bytes()).is_some() {
            return Err(Error::access(format!(
                "Access error: duplicated key are forbidden and the key '{key}' is already present"
            )));
        }
        let encoded = value.encode_scalar().map_err(|err| {
            Error::access(format!(
                "Access error: encoding error when accessing '{}' with 'insert({key}, ...)':\n  {}",
                describe(self.ctx, self.id),
                err
            ))
        })?;
        self.materialize_scalar_key(key, encoded.as_bytes())?;
        Ok(())
    }

    /// Insert a new empty map under `key`.
    pub fn insert_map(&mut self, key: &str) -> Result<()> {
        self.insert_container(key, NodeKind::Map)
    }

    /// Insert a new empty sequence under `key`.
    pub fn insert_sequence(&mut self, key: &str) -> Result<()> {
        self.insert_container(key, NodeKind::Sequence)
    }

    fn insert_container(&mut self, key: &str, kind: NodeKind) -> Result<()> {
        self.check_no_pending()?;
        check_map(self.ctx, self.id, &format!("insert({key}, ...)"))?;
        check_key_not_empty(key)?;
        if self.ctx.map_child_slot(self.id, key.as_bytes()).is_some() {
            return Err(Error::access(format!(
                "Access error: duplicated key are forbidden and the key '{key}' is already present"
            )));
        }
        let container_id = self.ctx.push_element(Element::new_container(kind));
        let name = self.ctx.add_string(key.as_bytes());
        let mut key_elt = Element::new_key(name);
        key_elt.add_child(container_id);
        let key_id = self.ctx.push_element(key_elt);
        self.ctx.element_mut(self.id).add_child(key_id);
        let slot = self.ctx.element(self.id).child_count() as u32 - 1;
        self.ctx.add_map_child(self.id, key.as_bytes(), slot);
        Ok(())
    }

    /// Remove `key` from a map. Returns whether the key was present.
    ///
    /// Child slots stored in the key index must stay dense, so the removed
    /// child is swapped with the last one and the moved key is re-indexed
    /// under its new slot.
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        self.check_no_pending()?;
        check_map(self.ctx, self.id, &format!("remove({key})"))?;
        let Some(slot) = self.ctx.remove_map_child(self.id, key.as_bytes()) else {
            return Ok(false);
        };
        let count = self.ctx.element(self.id).child_count();
        let slot = slot as usize;
        if slot < count - 1 {
            let last_id = self.ctx.element(self.id).child_at(count - 1);
            let last = self.ctx.element(last_id);
            if last.kind() == NodeKind::Key {
                let name = last.text();
                self.ctx.remove_map_child_ref(self.id, name);
                self.ctx.element_mut(self.id).replace_child(slot, last_id);
                self.ctx.add_map_child_ref(self.id, name, slot as u32);
            } else {
                // Trailing comments carry no index entry.
                self.ctx.element_mut(self.id).replace_child(slot, last_id);
            }
        }
        self.ctx.element_mut(self.id).remove_child(count - 1);
        Ok(true)
    }

    /// Mutable view of a sequence element by position.
    pub fn at_mut(&mut self, idx: usize) -> Result<NodeMut<'_>> {
        self.check_no_pending()?;
        let elt = check_sequence(self.ctx, self.id, &format!("[{idx}]"))?;
        if idx >= elt.child_count() {
            return Err(Error::access(format!(
                "Access error: access by '[{idx}]' is out of array bounds for '{}'",
                describe(self.ctx, self.id)
            )));
        }
        let id = elt.child_at(idx);
        Ok(NodeMut {
            id,
            ctx: &mut *self.ctx,
            pending_key: None,
        })
    }

    /// Append a scalar to a sequence.
    pub fn push_back<T: ToScalar>(&mut self, value: T) -> Result<()> {
        self.check_no_pending()?;
        check_sequence(self.ctx, self.id, "push_back(...)")?;
        let encoded = value.encode_scalar().map_err(|err| {
            Error::access(format!(
                "Access error: encoding error when accessing '{}' with 'push_back(...)':\n  {}",
                describe(self.ctx, self.id),
                err
            ))
        })?;
        let text = self.ctx.add_string(encoded.as_bytes());
        let id = self.ctx.push_element(Element::new_value(text));
        self.ctx.element_mut(self.id).add_child(id);
        Ok(())
    }

    /// Append an empty map to a sequence.
    pub fn push_back_map(&mut self) -> Result<()> {
        self.push_back_container(NodeKind::Map)
    }

    /// Append an empty sequence to a sequence.
    pub fn push_back_sequence(&mut self) -> Result<()> {
        self.push_back_container(NodeKind::Sequence)
    }

    fn push_back_container(&mut self, kind: NodeKind) -> Result<()> {
        self.check_no_pending()?;
        check_sequence(self.ctx, self.id, "push_back(...)")?;
        let id = self.ctx.push_element(Element::new_container(kind));
        self.ctx.element_mut(self.id).add_child(id);
        Ok(())
    }

    /// Insert a scalar at `idx`, shifting later elements.
    pub fn insert_at<T: ToScalar>(&mut self, idx: usize, value: T) -> Result<()> {
        self.check_no_pending()?;
        let elt = check_sequence(self.ctx, self.id, &format!("insert({idx}, ...)"))?;
        if idx > elt.child_count() {
            return Err(Error::access(format!(
                "Access error: access by 'insert({idx}, ...)' is out of array bounds for '{}'",
                describe(self.ctx, self.id)
            )));
        }
        let encoded = value.encode_scalar().map_err(|err| {
            Error::access(format!(
                "Access error: encoding error when accessing '{}' with 'insert({idx}, ...)':\n  {}",
                describe(self.ctx, self.id),
                err
            ))
        })?;
        let text = self.ctx.add_string(encoded.as_bytes());
        let id = self.ctx.push_element(Element::new_value(text));
        self.ctx.element_mut(self.id).insert_child(idx, id);
        Ok(())
    }

    /// Remove the sequence element at `idx`, preserving the order of the
    /// others.
    pub fn remove_at(&mut self, idx: usize) -> Result<()> {
        self.check_no_pending()?;
        let elt = check_sequence(self.ctx, self.id, &format!("remove({idx})"))?;
        if idx >= elt.child_count() {
            return Err(Error::access(format!(
                "Access error: access by 'remove({idx})' is out of array bounds for '{}'",
                describe(self.ctx, self.id)
            )));
        }
        self.ctx.element_mut(self.id).remove_child(idx);
        Ok(())
    }

    /// Remove the last sequence element.
    pub fn pop_back(&mut self) -> Result<()> {
        self.check_no_pending()?;
        let elt = check_sequence(self.ctx, self.id, "pop_back()")?;
        let count = elt.child_count();
        if count == 0 {
            return Err(Error::access(
                "Access error: cannot 'pop_back' because array is empty",
            ));
        }
        self.ctx.element_mut(self.id).remove_child(count - 1);
        Ok(())
    }
}

impl std::fmt::Debug for NodeMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.pending_key {
            Some(key) => write!(f, "[ Pending key '{key}' ]"),
            None => f.write_str(&describe(self.ctx, self.id)),
        }
    }
}
