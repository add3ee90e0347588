//! Surface collection, selection, and pointer-driven interaction.

use std::collections::VecDeque;

use log::debug;
use warp_core::{PinId, SurfaceId};
use warp_geometry::{Edge, TextureKey, WarpSurface, DEFAULT_SEGMENTS};
use warp_math::{Plane, Point2, Ray};
use warp_scene::scene::{HANDLE_RADIUS, PIN_RADIUS};
use warp_scene::{Camera, Scene, TextureImage, TextureStore};

use crate::events::EditorEvent;

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Other,
}

/// What a pointer-down grabbed.
#[derive(Debug, Clone, Copy)]
enum DragTarget {
    Corner(usize),
    Pin(PinId),
    Midpoint(Edge),
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    surface: SurfaceId,
    target: DragTarget,
    /// Control position minus pointer world position at grab time, so the
    /// control keeps its exact grab point instead of snapping to the pointer.
    offset: Point2,
}

#[derive(Debug, Clone, Copy)]
struct HandleHit {
    surface: SurfaceId,
    target: DragTarget,
    distance: f64,
}

/// Owns the ordered surface collection, the current selection, the scene
/// attachments, and the pointer gesture state machine.
///
/// All state is instance state; two managers never interfere. Every
/// mutation recomputes the affected surface synchronously and refreshes
/// its scene attachment before returning.
pub struct SurfaceManager {
    surfaces: Vec<WarpSurface>,
    selected: Option<SurfaceId>,
    scene: Scene,
    camera: Camera,
    textures: TextureStore,
    drag: Option<DragState>,
    events: VecDeque<EditorEvent>,
}

impl SurfaceManager {
    pub fn new(camera: Camera) -> Self {
        Self {
            surfaces: Vec::new(),
            selected: None,
            scene: Scene::new(),
            camera,
            textures: TextureStore::new(),
            drag: None,
            events: VecDeque::new(),
        }
    }

    // --- Accessors ---

    pub fn surfaces(&self) -> &[WarpSurface] {
        &self.surfaces
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&WarpSurface> {
        self.surfaces.iter().find(|s| s.id() == id)
    }

    pub fn selected_id(&self) -> Option<SurfaceId> {
        self.selected
    }

    pub fn selected_surface(&self) -> Option<&WarpSurface> {
        self.selected.and_then(|id| self.surface(id))
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    /// Drain pending change notifications.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain(..).collect()
    }

    // --- Structural operations ---

    /// Add a default surface and select it.
    pub fn add_surface(&mut self) -> SurfaceId {
        let surface = WarpSurface::default();
        let id = surface.id();
        debug!("add {id}");
        self.scene.attach(&surface);
        self.surfaces.push(surface);
        self.select(Some(id));
        self.events
            .push_back(EditorEvent::SurfaceCountChanged(self.surfaces.len()));
        id
    }

    /// Duplicate the selected surface and select the copy. The source is
    /// unaffected.
    pub fn duplicate_selected(&mut self) -> Option<SurfaceId> {
        let duplicate = self.selected_surface()?.duplicate();
        let id = duplicate.id();
        debug!("duplicate {} -> {id}", self.selected?);
        self.scene.attach(&duplicate);
        self.surfaces.push(duplicate);
        self.select(Some(id));
        self.events
            .push_back(EditorEvent::SurfaceCountChanged(self.surfaces.len()));
        Some(id)
    }

    /// Delete the selected surface and clear selection. No-op when
    /// nothing is selected.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        debug!("delete {id}");
        self.scene.detach(id);
        self.surfaces.retain(|s| s.id() != id);
        self.drag = None;
        self.select(None);
        self.events
            .push_back(EditorEvent::SurfaceCountChanged(self.surfaces.len()));
    }

    pub fn clear_all(&mut self) {
        debug!("clear all ({} surfaces)", self.surfaces.len());
        self.scene.clear();
        self.surfaces.clear();
        self.drag = None;
        self.select(None);
        self.events.push_back(EditorEvent::SurfaceCountChanged(0));
    }

    // --- Per-selection settings ---

    pub fn set_segments_on_selected(&mut self, segments: u32) {
        let Some(id) = self.selected else {
            return;
        };
        if let Some(index) = self.index_of(id) {
            self.surfaces[index].set_segments(segments);
            let actual = self.surfaces[index].segments();
            self.scene.sync(&self.surfaces[index]);
            self.events.push_back(EditorEvent::SegmentsChanged(actual));
        }
    }

    pub fn set_bezier_on_selected(&mut self, enabled: bool) {
        let Some(id) = self.selected else {
            return;
        };
        if let Some(index) = self.index_of(id) {
            self.surfaces[index].set_bezier_enabled(enabled);
            self.scene.sync(&self.surfaces[index]);
            self.events.push_back(EditorEvent::BezierChanged(enabled));
        }
    }

    /// Upload a decoded image and bind it to the selected surface.
    /// Returns the shared key, or `None` when nothing is selected.
    pub fn set_texture_on_selected(&mut self, image: TextureImage) -> Option<TextureKey> {
        let id = self.selected?;
        let index = self.index_of(id)?;
        let key = self.textures.insert(image);
        self.surfaces[index].set_texture(Some(key));
        Some(key)
    }

    pub fn set_handles_visible(&mut self, visible: bool) {
        self.scene.set_handles_visible(visible);
    }

    // --- Pointer interaction ---

    /// Left pointer-down: grab a handle, or select whichever surface body
    /// is under the pointer, or clear selection.
    pub fn pointer_down(&mut self, ndc: Point2) {
        let Some(world) = self.pointer_world(ndc) else {
            return;
        };

        if self.scene.handles_visible() {
            if let Some(hit) = self.hit_test_handles(ndc) {
                let control = self
                    .control_position(hit.surface, hit.target)
                    .unwrap_or(world);
                self.select(Some(hit.surface));
                self.drag = Some(DragState {
                    surface: hit.surface,
                    target: hit.target,
                    offset: control - world,
                });
                return;
            }
        }

        match self.hit_test_bodies(ndc) {
            Some((id, _)) => self.select(Some(id)),
            None => self.select(None),
        }
    }

    /// Pointer move: route an active drag to the grabbed control.
    pub fn pointer_move(&mut self, ndc: Point2) {
        let Some(drag) = self.drag else {
            return;
        };
        let Some(world) = self.pointer_world(ndc) else {
            return;
        };
        let position = world + drag.offset;

        let Some(index) = self.index_of(drag.surface) else {
            self.drag = None;
            return;
        };
        let surface = &mut self.surfaces[index];
        match drag.target {
            DragTarget::Corner(corner) => surface.set_corner(corner, position),
            DragTarget::Midpoint(edge) => surface.set_edge_midpoint(edge, position),
            DragTarget::Pin(pin) => {
                if surface.move_pin(pin, position).is_err() {
                    self.drag = None;
                    return;
                }
            }
        }
        self.scene.sync(&self.surfaces[index]);
    }

    /// Pointer up: end the gesture.
    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Double-click on the selected surface's body places a pin with zero
    /// initial displacement at the clicked point.
    pub fn double_click(&mut self, ndc: Point2) {
        let Some(id) = self.selected else {
            return;
        };
        let ray = self.camera.pointer_ray(ndc);
        let Some(index) = self.index_of(id) else {
            return;
        };
        let Some((_, point)) = body_hit(&self.surfaces[index], &ray) else {
            return;
        };
        self.surfaces[index].add_pin(point);
        self.scene.sync(&self.surfaces[index]);
    }

    /// Context-click (right-click) on a pin removes it.
    pub fn context_click(&mut self, ndc: Point2) {
        let Some(world) = self.pointer_world(ndc) else {
            return;
        };
        for index in 0..self.surfaces.len() {
            let hit = self.surfaces[index]
                .pins()
                .iter()
                .find(|pin| (pin.position - world).length() <= PIN_RADIUS)
                .map(|pin| pin.id);
            if let Some(pin) = hit {
                debug!("remove {pin}");
                // The pin was just found, removal cannot fail
                let _ = self.surfaces[index].remove_pin(pin);
                self.scene.sync(&self.surfaces[index]);
                return;
            }
        }
    }

    /// Delete/Backspace removes the selected surface, unless a text input
    /// has keyboard focus.
    pub fn key_down(&mut self, key: Key, text_input_focused: bool) {
        if text_input_focused {
            return;
        }
        if matches!(key, Key::Delete | Key::Backspace) {
            self.delete_selected();
        }
    }

    // --- Internals ---

    pub(crate) fn insert_restored(&mut self, surface: WarpSurface) {
        self.scene.attach(&surface);
        self.surfaces.push(surface);
    }

    pub(crate) fn select(&mut self, id: Option<SurfaceId>) {
        if let Some(previous) = self.selected {
            self.scene.set_selected(previous, false);
        }
        self.selected = id;
        if let Some(id) = id {
            self.scene.set_selected(id, true);
        }
        self.events.push_back(EditorEvent::SelectionChanged(id));

        let (segments, bezier) = self
            .selected_surface()
            .map(|s| (s.segments(), s.bezier_enabled()))
            .unwrap_or((DEFAULT_SEGMENTS, false));
        self.events.push_back(EditorEvent::SegmentsChanged(segments));
        self.events.push_back(EditorEvent::BezierChanged(bezier));
    }

    pub(crate) fn push_event(&mut self, event: EditorEvent) {
        self.events.push_back(event);
    }

    fn index_of(&self, id: SurfaceId) -> Option<usize> {
        self.surfaces.iter().position(|s| s.id() == id)
    }

    /// Pointer position projected onto the surface plane. `None` when the
    /// ray misses the plane (ignored, not an error).
    fn pointer_world(&self, ndc: Point2) -> Option<Point2> {
        let ray = self.camera.pointer_ray(ndc);
        let (_, hit) = ray.intersect_plane(&Plane::xy())?;
        Some(Point2::new(hit.x, hit.y))
    }

    fn control_position(&self, id: SurfaceId, target: DragTarget) -> Option<Point2> {
        let surface = self.surface(id)?;
        match target {
            DragTarget::Corner(corner) => Some(surface.corners()[corner]),
            DragTarget::Midpoint(edge) => surface.edge_midpoints()[edge.index()],
            DragTarget::Pin(pin) => surface.pin(pin).map(|p| p.position),
        }
    }

    /// Test corner handles, then pins, then midpoint handles, across all
    /// surfaces. The nearest hit to the camera wins; ties keep the first
    /// category checked.
    fn hit_test_handles(&self, ndc: Point2) -> Option<HandleHit> {
        let ray = self.camera.pointer_ray(ndc);
        let (distance, hit) = ray.intersect_plane(&Plane::xy())?;
        let world = Point2::new(hit.x, hit.y);

        let mut best: Option<HandleHit> = None;
        let mut consider = |surface: SurfaceId, target: DragTarget, point: Point2, radius: f64| {
            if (point - world).length() > radius {
                return;
            }
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(HandleHit {
                    surface,
                    target,
                    distance,
                });
            }
        };

        for surface in &self.surfaces {
            for (i, &corner) in surface.corners().iter().enumerate() {
                consider(surface.id(), DragTarget::Corner(i), corner, HANDLE_RADIUS);
            }
        }
        for surface in &self.surfaces {
            for pin in surface.pins() {
                consider(surface.id(), DragTarget::Pin(pin.id), pin.position, PIN_RADIUS);
            }
        }
        for surface in &self.surfaces {
            if !surface.bezier_enabled() {
                continue;
            }
            for edge in Edge::ALL {
                if let Some(midpoint) = surface.edge_midpoints()[edge.index()] {
                    consider(surface.id(), DragTarget::Midpoint(edge), midpoint, HANDLE_RADIUS);
                }
            }
        }
        best
    }

    /// Ray-test every surface's mesh body; the closest hit wins.
    fn hit_test_bodies(&self, ndc: Point2) -> Option<(SurfaceId, Point2)> {
        let ray = self.camera.pointer_ray(ndc);
        let mut best: Option<(SurfaceId, Point2, f64)> = None;
        for surface in &self.surfaces {
            if let Some((t, point)) = body_hit(surface, &ray) {
                if best.map_or(true, |(_, _, bt)| t < bt) {
                    best = Some((surface.id(), point, t));
                }
            }
        }
        best.map(|(id, point, _)| (id, point))
    }
}

/// Nearest ray intersection with a surface's grid triangles.
fn body_hit(surface: &WarpSurface, ray: &Ray) -> Option<(f64, Point2)> {
    let mut best: Option<(f64, Point2)> = None;
    for (a, b, c) in surface.grid().triangles() {
        if let Some((t, point)) = ray.intersect_triangle(a, b, c) {
            if best.map_or(true, |(bt, _)| t < bt) {
                best = Some((t, Point2::new(point.x, point.y)));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp_math::dvec2;

    fn manager() -> SurfaceManager {
        // Square viewport so NDC maps 1:1 to world units
        SurfaceManager::new(Camera::new(1.0))
    }

    #[test]
    fn test_add_selects_new_surface() {
        let mut m = manager();
        let id = m.add_surface();
        assert_eq!(m.selected_id(), Some(id));
        assert_eq!(m.surfaces().len(), 1);
        let events = m.drain_events();
        assert!(events.contains(&EditorEvent::SelectionChanged(Some(id))));
        assert!(events.contains(&EditorEvent::SurfaceCountChanged(1)));
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut m = manager();
        m.add_surface();
        m.drain_events();
        m.delete_selected();
        assert_eq!(m.selected_id(), None);
        assert!(m.surfaces().is_empty());
        let events = m.drain_events();
        assert!(events.contains(&EditorEvent::SelectionChanged(None)));
        assert!(events.contains(&EditorEvent::SurfaceCountChanged(0)));
    }

    #[test]
    fn test_delete_with_no_selection_is_noop() {
        let mut m = manager();
        m.add_surface();
        m.pointer_down(dvec2(0.99, 0.99)); // empty space clears selection
        m.drain_events();
        m.delete_selected();
        assert_eq!(m.surfaces().len(), 1);
        assert!(m.drain_events().is_empty());
    }

    #[test]
    fn test_pointer_down_on_body_selects() {
        let mut m = manager();
        let id = m.add_surface();
        m.pointer_down(dvec2(0.99, 0.99));
        assert_eq!(m.selected_id(), None);
        m.pointer_down(dvec2(0.0, 0.0));
        assert_eq!(m.selected_id(), Some(id));
    }

    #[test]
    fn test_corner_drag_preserves_grab_offset() {
        let mut m = manager();
        let id = m.add_surface();
        // Grab slightly off the TL corner at (-0.5, 0.375)
        let grab = dvec2(-0.51, 0.38);
        m.pointer_down(grab);
        m.pointer_move(dvec2(-0.61, 0.48));
        m.pointer_up();

        let corner = m.surface(id).unwrap().corners()[0];
        // Corner moved by exactly the pointer delta
        assert!((corner - (dvec2(-0.5, 0.375) + dvec2(-0.1, 0.1))).length() < 1e-9);
    }

    #[test]
    fn test_hidden_handles_not_pickable() {
        let mut m = manager();
        let id = m.add_surface();
        m.set_handles_visible(false);
        m.pointer_down(dvec2(-0.5, 0.375)); // exactly on the TL corner
        m.pointer_move(dvec2(-0.7, 0.5));
        // No drag happened; the click selected the body instead
        assert_eq!(m.surface(id).unwrap().corners()[0], dvec2(-0.5, 0.375));
        assert_eq!(m.selected_id(), Some(id));
    }

    #[test]
    fn test_double_click_adds_pin_on_selected() {
        let mut m = manager();
        let id = m.add_surface();
        m.double_click(dvec2(0.1, 0.1));
        let pins = m.surface(id).unwrap().pins();
        assert_eq!(pins.len(), 1);
        assert!((pins[0].origin - dvec2(0.1, 0.1)).length() < 1e-9);
        assert_eq!(pins[0].origin, pins[0].position);
    }

    #[test]
    fn test_double_click_needs_selection() {
        let mut m = manager();
        m.add_surface();
        m.pointer_down(dvec2(0.99, 0.99)); // deselect
        m.double_click(dvec2(0.0, 0.0));
        assert!(m.surfaces()[0].pins().is_empty());
    }

    #[test]
    fn test_pin_drag() {
        let mut m = manager();
        let id = m.add_surface();
        m.double_click(dvec2(0.0, 0.0));
        m.pointer_down(dvec2(0.0, 0.0));
        m.pointer_move(dvec2(0.1, 0.0));
        m.pointer_up();

        let pin = m.surface(id).unwrap().pins()[0];
        assert!((pin.position - dvec2(0.1, 0.0)).length() < 1e-9);
        assert_eq!(pin.origin, dvec2(0.0, 0.0));
    }

    #[test]
    fn test_context_click_removes_pin() {
        let mut m = manager();
        let id = m.add_surface();
        m.double_click(dvec2(0.0, 0.0));
        assert_eq!(m.surface(id).unwrap().pins().len(), 1);
        m.context_click(dvec2(0.0, 0.0));
        assert!(m.surface(id).unwrap().pins().is_empty());
    }

    #[test]
    fn test_midpoint_drag_when_bezier_enabled() {
        let mut m = manager();
        let id = m.add_surface();
        m.set_bezier_on_selected(true);
        // Top midpoint starts at (0, 0.375)
        m.pointer_down(dvec2(0.0, 0.375));
        m.pointer_move(dvec2(0.0, 0.6));
        m.pointer_up();

        let midpoint = m.surface(id).unwrap().edge_midpoints()[0].unwrap();
        assert!((midpoint - dvec2(0.0, 0.6)).length() < 1e-9);
        // The top edge now bows upward
        let top = m.surface(id).unwrap().point_at(0.5, 1.0);
        assert!(top.y > 0.4);
    }

    #[test]
    fn test_key_delete_respects_text_focus() {
        let mut m = manager();
        m.add_surface();
        m.key_down(Key::Delete, true);
        assert_eq!(m.surfaces().len(), 1);
        m.key_down(Key::Delete, false);
        assert!(m.surfaces().is_empty());
    }

    #[test]
    fn test_duplicate_selects_copy() {
        let mut m = manager();
        let source = m.add_surface();
        let copy = m.duplicate_selected().unwrap();
        assert_ne!(source, copy);
        assert_eq!(m.selected_id(), Some(copy));
        assert_eq!(m.surfaces().len(), 2);
    }

    #[test]
    fn test_selection_events_mirror_surface_settings() {
        let mut m = manager();
        m.add_surface();
        m.set_segments_on_selected(16);
        m.set_bezier_on_selected(true);
        m.drain_events();

        // Clicking empty space reports the defaults
        m.pointer_down(dvec2(0.99, 0.99));
        let events = m.drain_events();
        assert!(events.contains(&EditorEvent::SelectionChanged(None)));
        assert!(events.contains(&EditorEvent::SegmentsChanged(DEFAULT_SEGMENTS)));
        assert!(events.contains(&EditorEvent::BezierChanged(false)));
    }

    #[test]
    fn test_segments_setter_clamps() {
        let mut m = manager();
        let id = m.add_surface();
        m.drain_events();
        m.set_segments_on_selected(500);
        assert_eq!(m.surface(id).unwrap().segments(), 64);
        let events = m.drain_events();
        assert!(events.contains(&EditorEvent::SegmentsChanged(64)));
    }

    #[test]
    fn test_texture_shared_with_duplicate() {
        let mut m = manager();
        let source = m.add_surface();
        let key = m
            .set_texture_on_selected(TextureImage::new(1, 1, vec![0; 4]))
            .unwrap();
        let copy = m.duplicate_selected().unwrap();
        assert_eq!(m.surface(source).unwrap().texture(), Some(key));
        assert_eq!(m.surface(copy).unwrap().texture(), Some(key));
        assert!(m.surface(copy).unwrap().textured());
    }
}
