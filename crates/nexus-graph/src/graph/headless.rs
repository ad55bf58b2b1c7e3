//! Headless rendering surface
//!
//! An in-memory [`GraphSurface`]: deterministic ring placement, a camera,
//! highlight markers and an R-tree for hit testing. Used by the CLI and by
//! every controller test. Layout quality is not a goal here; positions only
//! need to be stable so anchors, hit tests and raster export are meaningful.

use std::collections::{BTreeSet, HashMap};
use std::f32::consts::TAU;

use egui::{Color32, Pos2, Rect, Vec2};
use image::{Rgba, RgbaImage};

use super::animation::AnimationSpec;
use super::camera::Camera2D;
use super::colors::{entity_type_fill, highlight_stroke, EDGE_COLOR};
use super::spatial::{DiscIndex, NodeDisc};
use super::surface::{EdgeRef, GraphSurface, HighlightClass};
use super::types::{EdgeElement, ElementRef, NodeElement, RenderElement};
use crate::error::GraphError;

/// Node disc radius in world units
pub const NODE_RADIUS: f32 = 14.0;
/// Extra pick slop around nodes and edges, in screen pixels
const PICK_SLOP_PX: f32 = 4.0;
/// Padding used when fitting the whole graph into view
const FIT_PADDING_PX: f32 = 50.0;
/// Largest raster `rasterize` will allocate (64 Mi pixels)
pub const MAX_RASTER_PIXELS: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone)]
struct PlacedNode {
    element: NodeElement,
    position: Pos2,
}

/// In-memory surface
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    nodes: Vec<PlacedNode>,
    node_index: HashMap<String, usize>,
    edges: Vec<EdgeElement>,
    edge_index: HashMap<String, usize>,
    classes: HashMap<String, BTreeSet<HighlightClass>>,
    camera: Camera2D,
    discs: DiscIndex,
    width: u32,
    height: u32,
    origin: Pos2,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashMap::new(),
            edges: Vec::new(),
            edge_index: HashMap::new(),
            classes: HashMap::new(),
            camera: Camera2D::new(),
            discs: DiscIndex::new(),
            width,
            height,
            origin: Pos2::ZERO,
        }
    }

    /// Place the surface at `origin` in page coordinates
    pub fn with_origin(mut self, origin: Pos2) -> Self {
        self.origin = origin;
        self
    }

    pub fn viewport(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(self.width as f32, self.height as f32))
    }

    pub fn viewport_center(&self) -> Pos2 {
        self.viewport().center()
    }

    /// Advance camera animation by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.camera.update(dt);
    }

    pub fn is_animating(&self) -> bool {
        self.camera.is_animating()
    }

    /// Set zoom immediately (user wheel zoom)
    pub fn set_zoom(&mut self, zoom: f32) {
        self.camera.zoom_to(zoom, AnimationSpec::instant());
    }

    pub fn node(&self, id: &str) -> Option<&NodeElement> {
        self.node_index.get(id).map(|&i| &self.nodes[i].element)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeElement> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    fn edge_world_points(&self, edge: &EdgeElement) -> Option<(Pos2, Pos2)> {
        let a = self.node_index.get(&edge.source)?;
        let b = self.node_index.get(&edge.target)?;
        Some((self.nodes[*a].position, self.nodes[*b].position))
    }

    /// Ring placement, then fit everything into view
    fn relayout(&mut self) {
        let count = self.nodes.len();
        let ring = (count as f32 * NODE_RADIUS * 3.0 / TAU).max(120.0);
        for (i, placed) in self.nodes.iter_mut().enumerate() {
            placed.position = if count == 1 {
                Pos2::ZERO
            } else {
                let angle = i as f32 / count as f32 * TAU;
                Pos2::new(ring * angle.cos(), ring * angle.sin())
            };
        }

        self.discs.replace(
            self.nodes
                .iter()
                .map(|n| NodeDisc::new(n.element.id.clone(), n.position, NODE_RADIUS)),
        );

        if let Some(bounds) = self.world_bounds() {
            self.camera.fit_to_bounds(bounds, self.viewport(), FIT_PADDING_PX);
        }
    }

    fn world_bounds(&self) -> Option<Rect> {
        let mut iter = self.nodes.iter();
        let first = iter.next()?;
        let mut bounds = Rect::from_center_size(first.position, Vec2::splat(NODE_RADIUS * 2.0));
        for n in iter {
            bounds = bounds.union(Rect::from_center_size(
                n.position,
                Vec2::splat(NODE_RADIUS * 2.0),
            ));
        }
        Some(bounds)
    }
}

impl GraphSurface for HeadlessSurface {
    fn add_elements(&mut self, elements: &[RenderElement]) {
        let mut added_nodes = 0usize;
        let mut dropped_edges = 0usize;

        for element in elements {
            match element {
                RenderElement::Node(node) => {
                    if self.node_index.contains_key(&node.id) {
                        continue;
                    }
                    self.node_index.insert(node.id.clone(), self.nodes.len());
                    self.nodes.push(PlacedNode {
                        element: node.clone(),
                        position: Pos2::ZERO,
                    });
                    added_nodes += 1;
                }
                RenderElement::Edge(edge) => {
                    let endpoints_known = self.node_index.contains_key(&edge.source)
                        && self.node_index.contains_key(&edge.target);
                    if !endpoints_known || self.edge_index.contains_key(&edge.id) {
                        dropped_edges += 1;
                        continue;
                    }
                    self.edge_index.insert(edge.id.clone(), self.edges.len());
                    self.edges.push(edge.clone());
                }
            }
        }

        if dropped_edges > 0 {
            tracing::debug!(dropped_edges, "edges with unknown endpoints or duplicate ids dropped");
        }
        if added_nodes > 0 {
            self.relayout();
        }
    }

    fn remove_all(&mut self) {
        self.nodes.clear();
        self.node_index.clear();
        self.edges.clear();
        self.edge_index.clear();
        self.classes.clear();
        self.discs.clear();
        self.camera.reset();
    }

    fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    fn has_edge(&self, id: &str) -> bool {
        self.edge_index.contains_key(id)
    }

    fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.element.id.clone()).collect()
    }

    fn edge_ids(&self) -> Vec<String> {
        self.edges.iter().map(|e| e.id.clone()).collect()
    }

    fn incident_edges(&self, node_id: &str) -> Vec<EdgeRef> {
        self.edges
            .iter()
            .filter(|e| e.source == node_id || e.target == node_id)
            .map(|e| EdgeRef {
                id: e.id.clone(),
                source: e.source.clone(),
                target: e.target.clone(),
            })
            .collect()
    }

    fn edge_endpoints(&self, edge_id: &str) -> Option<(String, String)> {
        self.edge(edge_id).map(|e| (e.source.clone(), e.target.clone()))
    }

    fn apply_class(&mut self, id: &str, class: HighlightClass) {
        if self.has_node(id) || self.has_edge(id) {
            self.classes.entry(id.to_string()).or_default().insert(class);
        }
    }

    fn clear_classes(&mut self) {
        self.classes.clear();
    }

    fn classes_of(&self, id: &str) -> Vec<HighlightClass> {
        self.classes
            .get(id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn zoom(&self) -> f32 {
        self.camera.zoom()
    }

    fn animate_to(
        &mut self,
        node_id: &str,
        zoom: f32,
        spec: AnimationSpec,
    ) -> Result<(), GraphError> {
        let index = self
            .node_index
            .get(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        let position = self.nodes[*index].position;
        self.camera.fly_to(position, zoom, spec);
        Ok(())
    }

    fn resolve_anchor(&self, id: &str) -> Option<Pos2> {
        let viewport = self.viewport();
        if let Some(&i) = self.node_index.get(id) {
            return Some(self.camera.world_to_screen(self.nodes[i].position, viewport));
        }
        let edge = self.edge(id)?;
        let (a, b) = self.edge_world_points(edge)?;
        let mid = Pos2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        Some(self.camera.world_to_screen(mid, viewport))
    }

    fn hit_test(&self, screen_pos: Pos2) -> Option<ElementRef> {
        let zoom = self.camera.zoom().max(f32::EPSILON);
        let world = self.camera.screen_to_world(screen_pos, self.viewport());
        let slop = PICK_SLOP_PX / zoom;

        if let Some(node) = self.discs.pick(world, slop) {
            return Some(ElementRef::Node(node.id.clone()));
        }

        self.edges
            .iter()
            .filter_map(|edge| {
                let (a, b) = self.edge_world_points(edge)?;
                let distance = distance_to_segment(world, a, b);
                let reach = (edge.width as f32 / 2.0) / zoom + slop;
                (distance <= reach).then_some((distance, edge))
            })
            .min_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, edge)| ElementRef::Edge(edge.id.clone()))
    }

    fn screen_origin(&self) -> Pos2 {
        self.origin
    }

    fn rasterize(&self, background: Color32, scale: f32) -> Result<RgbaImage, GraphError> {
        let (width, height) = raster_size(self.width, self.height, scale)?;
        let mut canvas = RgbaImage::from_pixel(width, height, rgba(background));
        let viewport = self.viewport();
        let zoom = self.camera.zoom();
        let to_pixels = |world: Pos2| {
            let screen = self.camera.world_to_screen(world, viewport);
            Pos2::new(screen.x * scale, screen.y * scale)
        };

        for edge in &self.edges {
            if let Some((a, b)) = self.edge_world_points(edge) {
                let color = highlight_stroke(&self.classes_of(&edge.id)).unwrap_or(EDGE_COLOR);
                let thickness = (edge.width as f32 * zoom * scale).max(1.0);
                draw_segment(&mut canvas, to_pixels(a), to_pixels(b), thickness, color);
            }
        }

        let radius = NODE_RADIUS * zoom * scale;
        for placed in &self.nodes {
            let center = to_pixels(placed.position);
            if let Some(stroke) = highlight_stroke(&self.classes_of(&placed.element.id)) {
                draw_disc(&mut canvas, center, radius + 3.0 * scale, stroke);
            }
            draw_disc(
                &mut canvas,
                center,
                radius,
                entity_type_fill(&placed.element.entity_type),
            );
        }

        Ok(canvas)
    }
}

// =============================================================================
// RASTER HELPERS
// =============================================================================

/// Pixel dimensions of a raster at `scale`, checked before anything is allocated
fn raster_size(width: u32, height: u32, scale: f32) -> Result<(u32, u32), GraphError> {
    // float-to-int casts saturate; NaN and negatives land on 0
    let width = (width as f32 * scale).round() as u32;
    let height = (height as f32 * scale).round() as u32;
    if width == 0 || height == 0 {
        return Err(GraphError::EmptyView { width, height });
    }
    u64::from(width)
        .checked_mul(u64::from(height))
        .filter(|&pixels| pixels <= MAX_RASTER_PIXELS)
        .map(|_| (width, height))
        .ok_or(GraphError::ViewTooLarge {
            width,
            height,
            limit: MAX_RASTER_PIXELS,
        })
}

fn rgba(color: Color32) -> Rgba<u8> {
    Rgba([color.r(), color.g(), color.b(), 255])
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

/// Clipped pixel range covering `[min, max]`
fn pixel_span(min: f32, max: f32, limit: u32) -> std::ops::Range<u32> {
    let start = min.floor().max(0.0) as u32;
    let end = (max.ceil().max(0.0) as u32).min(limit);
    start..end.max(start)
}

fn draw_disc(canvas: &mut RgbaImage, center: Pos2, radius: f32, color: Color32) {
    let (w, h) = canvas.dimensions();
    let r_sq = radius * radius;
    for y in pixel_span(center.y - radius, center.y + radius, h) {
        for x in pixel_span(center.x - radius, center.x + radius, w) {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            if dx * dx + dy * dy <= r_sq {
                canvas.put_pixel(x, y, rgba(color));
            }
        }
    }
}

fn draw_segment(canvas: &mut RgbaImage, a: Pos2, b: Pos2, thickness: f32, color: Color32) {
    let (w, h) = canvas.dimensions();
    let half = thickness / 2.0;
    for y in pixel_span(a.y.min(b.y) - half, a.y.max(b.y) + half, h) {
        for x in pixel_span(a.x.min(b.x) - half, a.x.max(b.x) + half, w) {
            let p = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            if distance_to_segment(p, a, b) <= half {
                canvas.put_pixel(x, y, rgba(color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::transform_snapshot;
    use nexus_types::{EntityType, GraphEdge, GraphNode, GraphSnapshot};

    fn snapshot() -> GraphSnapshot {
        GraphSnapshot {
            meta: None,
            nodes: vec![
                GraphNode {
                    id: "A".into(),
                    label: "Acme".into(),
                    entity_type: Some(EntityType::Organization),
                    claim_count: Some(3),
                },
                GraphNode {
                    id: "B".into(),
                    label: "Berlin".into(),
                    entity_type: Some(EntityType::Geo),
                    claim_count: None,
                },
            ],
            edges: vec![
                GraphEdge {
                    id: "A||B".into(),
                    source: "A".into(),
                    target: "B".into(),
                    strength: Some(-0.9),
                },
                GraphEdge {
                    id: "A||Nowhere".into(),
                    source: "A".into(),
                    target: "Nowhere".into(),
                    strength: Some(0.1),
                },
            ],
            adjacency: None,
        }
    }

    fn loaded() -> HeadlessSurface {
        let mut surface = HeadlessSurface::new(800, 600);
        surface.add_elements(&transform_snapshot(&snapshot()));
        surface
    }

    #[test]
    fn test_dangling_edge_is_dropped() {
        let surface = loaded();
        assert_eq!(surface.node_ids(), vec!["A", "B"]);
        assert_eq!(surface.edge_ids(), vec!["A||B"]);
    }

    #[test]
    fn test_anchor_hit_test_agree() {
        let surface = loaded();
        let anchor = surface.resolve_anchor("B").unwrap();
        assert_eq!(surface.hit_test(anchor), Some(ElementRef::Node("B".into())));

        let mid = surface.resolve_anchor("A||B").unwrap();
        assert_eq!(surface.hit_test(mid), Some(ElementRef::Edge("A||B".into())));
    }

    #[test]
    fn test_empty_space_hits_nothing() {
        let surface = loaded();
        assert_eq!(surface.hit_test(Pos2::new(2.0, 2.0)), None);
    }

    #[test]
    fn test_duplicate_edge_ids_keep_first() {
        let mut surface = loaded();
        let original = surface.edge("A||B").unwrap().clone();
        let mut twin = original.clone();
        twin.width = 9.0;
        surface.add_elements(&[RenderElement::Edge(twin)]);

        assert_eq!(surface.edge_ids(), vec!["A||B"]);
        assert_eq!(surface.edge("A||B"), Some(&original));
        assert_eq!(
            surface.edge_endpoints("A||B"),
            Some(("A".to_string(), "B".to_string()))
        );
    }

    #[test]
    fn test_large_graph_loads_with_indexed_edges() {
        let ids: Vec<String> = (0..2_000).map(|i| format!("n{}", i)).collect();
        let mut elements: Vec<RenderElement> = ids
            .iter()
            .map(|id| {
                RenderElement::Node(NodeElement {
                    id: id.clone(),
                    label: id.clone(),
                    entity_type: EntityType::Unknown,
                    claim_count: None,
                })
            })
            .collect();
        for i in 0..ids.len() {
            for step in 1..=20 {
                let (a, b) = (&ids[i], &ids[(i + step) % ids.len()]);
                elements.push(RenderElement::Edge(EdgeElement {
                    id: format!("{}||{}", a, b),
                    source: a.clone(),
                    target: b.clone(),
                    strength: None,
                    width: 2.0,
                }));
            }
        }

        let mut surface = HeadlessSurface::new(800, 600);
        surface.add_elements(&elements);
        assert_eq!(surface.edge_ids().len(), 40_000);
        assert!(surface.has_edge("n1999||n0"));
        assert_eq!(surface.incident_edges("n0").len(), 40);
    }

    #[test]
    fn test_classes_ignore_unknown_ids() {
        let mut surface = loaded();
        surface.apply_class("Nowhere", HighlightClass::Selected);
        surface.apply_class("A", HighlightClass::Neighbor);
        assert!(surface.classes_of("Nowhere").is_empty());
        assert_eq!(surface.classes_of("A"), vec![HighlightClass::Neighbor]);
        surface.clear_classes();
        assert!(surface.classes_of("A").is_empty());
    }

    #[test]
    fn test_remove_all() {
        let mut surface = loaded();
        surface.remove_all();
        assert!(surface.node_ids().is_empty());
        assert!(surface.edge_ids().is_empty());
        assert_eq!(surface.hit_test(surface.viewport_center()), None);
    }

    #[test]
    fn test_rasterize_scales_and_paints_nodes() {
        let surface = loaded();
        let background = Color32::from_rgb(11, 15, 26);
        let image = surface.rasterize(background, 2.0).unwrap();
        assert_eq!(image.dimensions(), (1600, 1200));
        assert_eq!(image.get_pixel(0, 0), &rgba(background));

        let anchor = surface.resolve_anchor("A").unwrap();
        let pixel = image.get_pixel((anchor.x * 2.0) as u32, (anchor.y * 2.0) as u32);
        assert_eq!(pixel, &rgba(entity_type_fill(&EntityType::Organization)));
    }

    #[test]
    fn test_rasterize_empty_viewport() {
        let surface = HeadlessSurface::new(0, 600);
        assert!(matches!(
            surface.rasterize(Color32::BLACK, 1.0),
            Err(GraphError::EmptyView { .. })
        ));
        assert!(matches!(
            loaded().rasterize(Color32::BLACK, f32::NAN),
            Err(GraphError::EmptyView { .. })
        ));
    }

    #[test]
    fn test_rasterize_refuses_oversized_canvas() {
        let surface = loaded();
        for scale in [100_000.0, f32::INFINITY] {
            let err = surface.rasterize(Color32::BLACK, scale).unwrap_err();
            assert_eq!(err.code(), "VIEW_TOO_LARGE");
        }
        assert_eq!(raster_size(8192, 8192, 1.0), Ok((8192, 8192)));
        assert!(raster_size(8192, 8193, 1.0).is_err());
    }
}
