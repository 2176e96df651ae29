use crate::arena::{Arena, StrRef};
use crate::element::{Element, EltId};
use crate::index::{key_hash, KeyIndex};

/// Internal state of one document: the byte arena, the element vector, and
/// the key index. Owned by [`crate::Document`], shared by every view into it.
#[derive(Debug)]
pub(crate) struct Context {
    pub elements: Vec<Element>,
    pub arena: Arena,
    index: KeyIndex,
}

impl Context {
    /// `arena_reserve` is the expected total string volume, usually the
    /// input size when parsing.
    pub fn with_arena_capacity(arena_reserve: usize) -> Self {
        let mut ctx = Self {
            elements: Vec::new(),
            arena: Arena::with_capacity(arena_reserve),
            index: KeyIndex::new(),
        };
        // Slot 0 is the synthetic root: a key with an empty name whose
        // single child is the document's top-level value.
        ctx.elements.push(Element::new_key(StrRef::EMPTY));
        ctx
    }

    pub fn add_string(&mut self, text: &[u8]) -> StrRef {
        self.arena.add(text)
    }

    pub fn get_str(&self, sref: StrRef) -> &str {
        self.arena.get(sref)
    }

    pub fn element(&self, id: EltId) -> &Element {
        &self.elements[id as usize]
    }

    pub fn element_mut(&mut self, id: EltId) -> &mut Element {
        &mut self.elements[id as usize]
    }

    /// Append a new element, returning its id.
    pub fn push_element(&mut self, elt: Element) -> EltId {
        let id = self.elements.len() as EltId;
        self.elements.push(elt);
        id
    }

    /// Name of the key element sitting in `slot` of `parent`'s child array,
    /// if that child is a key.
    fn key_name_at_slot<'a>(
        elements: &'a [Element],
        arena: &'a Arena,
        parent: &Element,
        slot: u32,
    ) -> Option<&'a [u8]> {
        let children = parent.children();
        let child = *children.get(slot as usize)?;
        match &elements[child as usize] {
            Element::Key { name, .. } => Some(arena.get_bytes(*name)),
            _ => None,
        }
    }

    /// Child slot of `key` inside the map `parent_id`, if present.
    pub fn map_child_slot(&self, parent_id: EltId, key: &[u8]) -> Option<u32> {
        let parent = &self.elements[parent_id as usize];
        self.index.lookup(key_hash(parent_id, key), |candidate| {
            Self::key_name_at_slot(&self.elements, &self.arena, parent, candidate) == Some(key)
        })
    }

    /// Register `key` at `slot` of the map `parent_id`. Returns `false` when
    /// the key was already present (its slot is overwritten in that case).
    pub fn add_map_child(&mut self, parent_id: EltId, key: &[u8], slot: u32) -> bool {
        let elements = &self.elements;
        let arena = &self.arena;
        let parent = &elements[parent_id as usize];
        self.index.insert(key_hash(parent_id, key), slot, |candidate| {
            Self::key_name_at_slot(elements, arena, parent, candidate) == Some(key)
        })
    }

    /// Drop `key` from the index of map `parent_id`, returning the slot it
    /// occupied. The caller is responsible for the child array itself.
    pub fn remove_map_child(&mut self, parent_id: EltId, key: &[u8]) -> Option<u32> {
        let elements = &self.elements;
        let arena = &self.arena;
        let parent = &elements[parent_id as usize];
        self.index.remove(key_hash(parent_id, key), |candidate| {
            Self::key_name_at_slot(elements, arena, parent, candidate) == Some(key)
        })
    }

    /// As [`add_map_child`](Self::add_map_child), for a key already stored
    /// in the arena.
    pub fn add_map_child_ref(&mut self, parent_id: EltId, key: StrRef, slot: u32) -> bool {
        let elements = &self.elements;
        let arena = &self.arena;
        let key = arena.get_bytes(key);
        let parent = &elements[parent_id as usize];
        self.index.insert(key_hash(parent_id, key), slot, |candidate| {
            Self::key_name_at_slot(elements, arena, parent, candidate) == Some(key)
        })
    }

    /// As [`remove_map_child`](Self::remove_map_child), for a key already
    /// stored in the arena.
    pub fn remove_map_child_ref(&mut self, parent_id: EltId, key: StrRef) -> Option<u32> {
        let elements = &self.elements;
        let arena = &self.arena;
        let key = arena.get_bytes(key);
        let parent = &elements[parent_id as usize];
        self.index.remove(key_hash(parent_id, key), |candidate| {
            Self::key_name_at_slot(elements, arena, parent, candidate) == Some(key)
        })
    }
}
