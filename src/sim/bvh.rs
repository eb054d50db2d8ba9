//! Bounding volume hierarchy over lane geometry
//!
//! An incrementally built tree of boxes living in one growable arena, root at
//! index 0. Nodes are never removed or rebalanced; a new level swaps in a
//! freshly built tree. Each node keeps the box it was inserted with plus an
//! enclosing box grown over its whole subtree, so query pruning stays sound
//! even when a child pokes outside the parent it attached to.

use serde::{Deserialize, Serialize};

use glam::Vec2;

use super::bounds::BoundingBox;

/// Handle to a node in the hierarchy. Absence is always `Option<NodeId>`,
/// never a reserved index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node, present in any non-empty tree
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BvhNode {
    parent: Option<NodeId>,
    depth: u32,
    children: Vec<NodeId>,
    /// The box this node was inserted with, unchanged since insertion
    bounds: BoundingBox,
    /// Union of `bounds` and every descendant's `subtree`; what traversal
    /// prunes against
    subtree: BoundingBox,
}

impl BvhNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }
}

/// Incrementally built tree of bounding boxes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
}

impl Bvh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&BvhNode> {
        self.nodes.get(id.index())
    }

    /// Insert a box, inferring its parent by walking down from the root and
    /// at each level descending into the first child whose subtree intersects
    /// it. The box becomes a child of the last matched node (the root when
    /// nothing matched). Every ancestor's subtree box is grown to enclose it.
    pub fn add_node(&mut self, bounds: BoundingBox) -> NodeId {
        if self.nodes.is_empty() {
            self.nodes.push(BvhNode {
                parent: None,
                depth: 0,
                children: Vec::new(),
                bounds,
                subtree: bounds,
            });
            return NodeId::ROOT;
        }

        let mut parent = NodeId::ROOT;
        loop {
            let matched = self.nodes[parent.index()]
                .children
                .iter()
                .copied()
                .find(|c| self.nodes[c.index()].subtree.intersects(&bounds));
            match matched {
                Some(child) => parent = child,
                None => break,
            }
        }

        let id = NodeId(self.nodes.len() as u32);
        let depth = self.nodes[parent.index()].depth + 1;
        self.nodes.push(BvhNode {
            parent: Some(parent),
            depth,
            children: Vec::new(),
            bounds,
            subtree: bounds,
        });
        self.nodes[parent.index()].children.push(id);

        // Grow ancestor subtree boxes so pruning remains sound
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            let grown = self.nodes[node.index()].subtree.union(&bounds);
            self.nodes[node.index()].subtree = grown;
            cursor = self.nodes[node.index()].parent;
        }

        id
    }

    /// All nodes whose inserted box contains the point, skipping subtrees
    /// whose enclosing box misses it
    pub fn query_point(&self, point: Vec2) -> Vec<NodeId> {
        self.query(
            |node| node.subtree.contains(point),
            |node| node.bounds.contains(point),
        )
    }

    /// All nodes whose inserted box intersects the query box, skipping
    /// subtrees whose enclosing box misses it
    pub fn query_box(&self, bounds: &BoundingBox) -> Vec<NodeId> {
        self.query(
            |node| node.subtree.intersects(bounds),
            |node| node.bounds.intersects(bounds),
        )
    }

    fn query(
        &self,
        descend: impl Fn(&BvhNode) -> bool,
        report: impl Fn(&BvhNode) -> bool,
    ) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.nodes.is_empty() {
            return out;
        }
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            if !descend(node) {
                continue;
            }
            if report(node) {
                out.push(id);
            }
            stack.extend(node.children.iter().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x0: f32, y0: f32, x1: f32, y1: f32) -> BoundingBox {
        BoundingBox::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    #[test]
    fn test_first_insert_creates_root() {
        let mut bvh = Bvh::new();
        assert!(bvh.is_empty());
        let id = bvh.add_node(boxed(0.0, 0.0, 10.0, 10.0));
        assert_eq!(id, NodeId::ROOT);
        assert_eq!(bvh.len(), 1);
        let root = bvh.get(id).unwrap();
        assert_eq!(root.depth(), 0);
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_disjoint_boxes_parent_to_root() {
        let mut bvh = Bvh::new();
        bvh.add_node(boxed(0.0, 0.0, 10.0, 10.0));
        let ids: Vec<_> = (1..5)
            .map(|i| {
                let x = i as f32 * 100.0;
                bvh.add_node(boxed(x, 0.0, x + 10.0, 10.0))
            })
            .collect();
        assert_eq!(bvh.len(), 5);
        for id in ids {
            let node = bvh.get(id).unwrap();
            assert_eq!(node.parent(), Some(NodeId::ROOT));
            assert_eq!(node.depth(), 1);
        }
    }

    #[test]
    fn test_nested_box_becomes_descendant() {
        let mut bvh = Bvh::new();
        let root = bvh.add_node(boxed(0.0, 0.0, 100.0, 100.0));
        let outer = bvh.add_node(boxed(10.0, 10.0, 50.0, 50.0));
        let inner = bvh.add_node(boxed(20.0, 20.0, 30.0, 30.0));

        assert_eq!(bvh.get(outer).unwrap().parent(), Some(root));
        assert_eq!(bvh.get(inner).unwrap().parent(), Some(outer));
        assert_eq!(bvh.get(inner).unwrap().depth(), 2);
    }

    #[test]
    fn test_query_point() {
        let mut bvh = Bvh::new();
        bvh.add_node(boxed(0.0, 0.0, 100.0, 100.0));
        let nested = bvh.add_node(boxed(20.0, 20.0, 40.0, 40.0));
        let apart = bvh.add_node(boxed(200.0, 200.0, 210.0, 210.0));

        let hits = bvh.query_point(Vec2::new(25.0, 25.0));
        assert!(hits.contains(&NodeId::ROOT));
        assert!(hits.contains(&nested));
        assert!(!hits.contains(&apart));

        assert!(bvh.query_point(Vec2::new(500.0, 500.0)).is_empty());
    }

    #[test]
    fn test_query_box_touching_counts() {
        let mut bvh = Bvh::new();
        let a = bvh.add_node(boxed(0.0, 0.0, 10.0, 10.0));
        let hits = bvh.query_box(&boxed(10.0, 10.0, 20.0, 20.0));
        assert_eq!(hits, vec![a]);
    }

    #[test]
    fn test_pruning_sound_when_child_pokes_outside_parent() {
        // Child intersects the parent but extends past it. The subtree box
        // must grow so a point only inside the overhang is still found.
        let mut bvh = Bvh::new();
        bvh.add_node(boxed(0.0, 0.0, 50.0, 50.0));
        let overhang = bvh.add_node(boxed(40.0, 40.0, 90.0, 90.0));

        let hits = bvh.query_point(Vec2::new(80.0, 80.0));
        assert_eq!(hits, vec![overhang]);
    }

    #[test]
    fn test_empty_tree_queries() {
        let bvh = Bvh::new();
        assert!(bvh.query_point(Vec2::ZERO).is_empty());
        assert!(bvh.query_box(&boxed(0.0, 0.0, 1.0, 1.0)).is_empty());
    }
}
