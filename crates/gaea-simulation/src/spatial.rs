use std::collections::HashMap;

use gaea_core::entity::EntityId;
use gaea_core::geometry::{Aabb, Point};

/// Quadtree over entity bounding boxes.
///
/// An entry lives in the deepest node whose bounds fully contain its box;
/// boxes straddling a split line, or lying outside the indexed area, stay in
/// a shallower node (ultimately the root). Each id is stored at most once.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    root: Node,
    locations: HashMap<EntityId, Aabb>,
    capacity: usize,
    max_depth: usize,
}

#[derive(Debug, Clone)]
struct Node {
    bounds: Aabb,
    depth: usize,
    entries: Vec<(EntityId, Aabb)>,
    children: Option<Box<[Node; 4]>>,
}

impl Node {
    fn new(bounds: Aabb, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            entries: Vec::new(),
            children: None,
        }
    }

    fn child_for(&mut self, aabb: &Aabb) -> Option<&mut Node> {
        self.children
            .as_mut()?
            .iter_mut()
            .find(|child| child.bounds.contains(aabb))
    }

    fn insert(&mut self, id: EntityId, aabb: Aabb, capacity: usize, max_depth: usize) {
        if let Some(child) = self.child_for(&aabb) {
            child.insert(id, aabb, capacity, max_depth);
            return;
        }
        self.entries.push((id, aabb));
        if self.children.is_none() && self.entries.len() > capacity && self.depth < max_depth {
            self.split(capacity, max_depth);
        }
    }

    fn split(&mut self, capacity: usize, max_depth: usize) {
        let Aabb { min, max } = self.bounds;
        let mid = self.bounds.center();
        let depth = self.depth + 1;
        self.children = Some(Box::new([
            Node::new(Aabb::new(min, mid), depth),
            Node::new(Aabb::new(Point::new(mid.x, min.y), Point::new(max.x, mid.y)), depth),
            Node::new(Aabb::new(Point::new(min.x, mid.y), Point::new(mid.x, max.y)), depth),
            Node::new(Aabb::new(mid, max), depth),
        ]));
        let entries = std::mem::take(&mut self.entries);
        for (id, aabb) in entries {
            match self.child_for(&aabb) {
                Some(child) => child.insert(id, aabb, capacity, max_depth),
                None => self.entries.push((id, aabb)),
            }
        }
    }

    fn remove(&mut self, id: EntityId, aabb: &Aabb) -> bool {
        if let Some(pos) = self.entries.iter().position(|(e, _)| *e == id) {
            self.entries.swap_remove(pos);
            return true;
        }
        match self.child_for(aabb) {
            Some(child) => child.remove(id, aabb),
            None => false,
        }
    }

    fn query<F>(&self, area: &Aabb, predicate: &mut F, out: &mut Vec<EntityId>)
    where
        F: FnMut(EntityId) -> bool,
    {
        for (id, aabb) in &self.entries {
            if aabb.intersects(area) && predicate(*id) {
                out.push(*id);
            }
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                if child.bounds.intersects(area) {
                    child.query(area, predicate, out);
                }
            }
        }
    }

    fn max_depth(&self) -> usize {
        self.children
            .as_ref()
            .map_or(self.depth, |c| c.iter().map(Node::max_depth).max().unwrap_or(self.depth))
    }
}

impl SpatialIndex {
    /// An empty index covering `bounds`.
    pub fn new(bounds: Aabb, capacity: usize, max_depth: usize) -> Self {
        Self {
            root: Node::new(bounds, 0),
            locations: HashMap::new(),
            capacity: capacity.max(1),
            max_depth,
        }
    }

    /// Area covered by the root node.
    pub fn bounds(&self) -> Aabb {
        self.root.bounds
    }

    /// Add an entry. Inserting an id that is already present replaces it.
    pub fn insert(&mut self, id: EntityId, aabb: Aabb) {
        if self.locations.contains_key(&id) {
            self.remove(id);
        }
        self.locations.insert(id, aabb);
        self.root.insert(id, aabb, self.capacity, self.max_depth);
    }

    /// Drop an entry. Returns `false` if the id was not indexed.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let Some(aabb) = self.locations.remove(&id) else {
            return false;
        };
        let removed = self.root.remove(id, &aabb);
        debug_assert!(removed, "indexed entry {id} missing from its node");
        removed
    }

    /// Move an entry to a new box.
    pub fn update(&mut self, id: EntityId, aabb: Aabb) {
        if self.locations.get(&id) == Some(&aabb) {
            return;
        }
        self.insert(id, aabb);
    }

    /// Ids of all entries intersecting `area` that satisfy `predicate`.
    ///
    /// The result is an owned snapshot, in no particular order.
    pub fn query<F>(&self, area: &Aabb, mut predicate: F) -> Vec<EntityId>
    where
        F: FnMut(EntityId) -> bool,
    {
        let mut out = Vec::new();
        self.root.query(area, &mut predicate, &mut out);
        out
    }

    /// The box an id was indexed with.
    pub fn location(&self, id: EntityId) -> Option<Aabb> {
        self.locations.get(&id).copied()
    }

    /// Whether the id is indexed.
    pub fn contains(&self, id: EntityId) -> bool {
        self.locations.contains_key(&id)
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Depth of the deepest node.
    pub fn depth(&self) -> usize {
        self.root.max_depth()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.root = Node::new(self.root.bounds, 0);
        self.locations.clear();
    }
}
