//! Node picking
//!
//! Node discs live in an R-tree (`rstar`) keyed by world position, so a
//! pointer lookup is a nearest-neighbour query instead of a scan over every
//! node. Distances are measured to the disc rim, so a point inside a disc is
//! at distance zero.

use egui::Pos2;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A node's footprint in world space
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDisc {
    pub id: String,
    pub center: Pos2,
    pub radius: f32,
}

impl NodeDisc {
    pub fn new(id: impl Into<String>, center: Pos2, radius: f32) -> Self {
        Self {
            id: id.into(),
            center,
            radius,
        }
    }

    /// Distance from `point` to the rim; zero inside
    pub fn rim_distance(&self, point: Pos2) -> f32 {
        ((point - self.center).length() - self.radius).max(0.0)
    }
}

impl RTreeObject for NodeDisc {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let (x, y, r) = (self.center.x, self.center.y, self.radius);
        AABB::from_corners([x - r, y - r], [x + r, y + r])
    }
}

impl PointDistance for NodeDisc {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let d = self.rim_distance(Pos2::new(point[0], point[1]));
        d * d
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        self.rim_distance(Pos2::new(point[0], point[1])) == 0.0
    }
}

/// R-tree of every node disc on a surface
#[derive(Default)]
pub struct DiscIndex {
    tree: RTree<NodeDisc>,
}

impl std::fmt::Debug for DiscIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscIndex")
            .field("len", &self.tree.size())
            .finish_non_exhaustive()
    }
}

impl Clone for DiscIndex {
    fn clone(&self) -> Self {
        Self {
            tree: RTree::bulk_load(self.tree.iter().cloned().collect()),
        }
    }
}

impl DiscIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with `discs` (bulk load)
    pub fn replace(&mut self, discs: impl IntoIterator<Item = NodeDisc>) {
        self.tree = RTree::bulk_load(discs.into_iter().collect());
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    /// Closest disc whose rim is within `slop` of `point`
    pub fn pick(&self, point: Pos2, slop: f32) -> Option<&NodeDisc> {
        self.tree
            .nearest_neighbor(&[point.x, point.y])
            .filter(|disc| disc.rim_distance(point) <= slop)
    }
}
