//! Node interning.
//!
//! Category dumps repeat the same few hundred thousand category names millions
//! of times. Every name is interned once into a [`NodeId`], a dense `u32`
//! index, and all adjacency and depth tables are plain vectors indexed by it.
//!
//! [`NodeTable`] is the mutable interner used while reading edges;
//! [`NodeNames`] is its frozen, thread-safe form held by a
//! [`Hierarchy`](crate::Hierarchy).

use std::fmt;

use lasso::{Key, Rodeo, RodeoReader, Spur};

/// Dense identifier of an interned node name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of this node in every per-node table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn try_from_index(idx: usize) -> Option<Self> {
        u32::try_from(idx).ok().map(Self)
    }

    // Spur is a NonZeroU32 underneath, so every key lasso hands out fits.
    #[allow(clippy::cast_possible_truncation)]
    fn from_spur(spur: Spur) -> Self {
        let idx = spur.into_usize();
        debug_assert!(u32::try_from(idx).is_ok(), "lasso key {idx} exceeds u32");
        Self(idx as u32)
    }

    fn to_spur(self) -> Option<Spur> {
        Spur::try_from_usize(self.index())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Growable name interner used during graph construction.
#[derive(Debug, Default)]
pub struct NodeTable {
    rodeo: Rodeo,
}

impl NodeTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning the existing id when it was seen before.
    pub fn intern(&mut self, name: &str) -> NodeId {
        NodeId::from_spur(self.rodeo.get_or_intern(name))
    }

    #[must_use]
    pub fn id(&self, name: &str) -> Option<NodeId> {
        self.rodeo.get(name).map(NodeId::from_spur)
    }

    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        id.to_spur()
            .and_then(|spur| self.rodeo.try_resolve(&spur))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }

    /// Freeze the table into a read-only, `Send + Sync` view.
    #[must_use]
    pub fn freeze(self) -> NodeNames {
        NodeNames {
            reader: self.rodeo.into_reader(),
        }
    }
}

/// Frozen name table shared by query callers.
#[derive(Debug)]
pub struct NodeNames {
    reader: RodeoReader,
}

impl NodeNames {
    #[must_use]
    pub fn id(&self, name: &str) -> Option<NodeId> {
        self.reader.get(name).map(NodeId::from_spur)
    }

    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        id.to_spur()
            .and_then(|spur| self.reader.try_resolve(&spur))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reader.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reader.is_empty()
    }
}
