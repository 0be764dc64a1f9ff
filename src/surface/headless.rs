use egui::{Pos2, pos2};

use crate::geometry::{self, Contact};

use super::{Arbiter, Hit, Surface, Visual, VisualId, VisualStore};

/// An off-screen surface with fixed data limits.
///
/// Used by tests and by hosts that drive tools without a window. It keeps
/// the visual list, counts redraw requests and hit-tests exactly like
/// `PlotCanvas` does.
#[derive(Debug)]
pub struct HeadlessSurface {
    visuals: VisualStore,
    x_limits: (f32, f32),
    y_limits: (f32, f32),
    pick_radius: f32,
    competing_mode: bool,
    redraw_requests: usize,
    arbiter: Arbiter,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::with_limits((0.0, 100.0), (0.0, 100.0))
    }
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(x_limits: (f32, f32), y_limits: (f32, f32)) -> Self {
        Self {
            visuals: VisualStore::new(),
            x_limits,
            y_limits,
            pick_radius: 0.015,
            competing_mode: false,
            redraw_requests: 0,
            arbiter: Arbiter::new(),
        }
    }

    /// Pick radius in axes fraction
    pub fn set_pick_radius(&mut self, radius: f32) {
        self.pick_radius = radius;
    }

    /// Simulate a host pan/zoom mode taking over the pointer
    pub fn set_competing_mode(&mut self, active: bool) {
        self.competing_mode = active;
    }

    pub fn redraw_requests(&self) -> usize {
        self.redraw_requests
    }

    pub fn visuals(&self) -> &VisualStore {
        &self.visuals
    }
}

impl Surface for HeadlessSurface {
    fn attach_visual(&mut self, visual: Visual) -> VisualId {
        self.visuals.insert(visual)
    }

    fn detach_visual(&mut self, id: VisualId) -> Option<Visual> {
        self.visuals.remove(id)
    }

    fn visual(&self, id: VisualId) -> Option<&Visual> {
        self.visuals.get(id)
    }

    fn visual_mut(&mut self, id: VisualId) -> Option<&mut Visual> {
        self.visuals.get_mut(id)
    }

    fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }

    fn hit_test(&self, position: Pos2) -> Vec<Hit> {
        self.visuals
            .iter()
            .rev()
            .filter(|(_, visual)| visual.visible && visual.pickable)
            .filter_map(|(id, visual)| {
                let resolved = visual.geometry.resolve(|p| self.normalized_to_data(p));
                let contact = geometry::hit_geometry(&resolved, position, self.pick_radius, |p| {
                    self.data_to_normalized(p)
                })?;
                Some(Hit {
                    visual: id,
                    index: match contact {
                        Contact::Vertex(i) => Some(i),
                        Contact::Body => None,
                    },
                })
            })
            .collect()
    }

    fn data_bounds_contains(&self, position: Pos2) -> bool {
        let (x0, x1) = self.x_limits;
        let (y0, y1) = self.y_limits;
        position.x >= x0.min(x1)
            && position.x <= x0.max(x1)
            && position.y >= y0.min(y1)
            && position.y <= y0.max(y1)
    }

    fn data_to_normalized(&self, position: Pos2) -> Pos2 {
        let (x0, x1) = self.x_limits;
        let (y0, y1) = self.y_limits;
        pos2((position.x - x0) / (x1 - x0), (position.y - y0) / (y1 - y0))
    }

    fn normalized_to_data(&self, position: Pos2) -> Pos2 {
        let (x0, x1) = self.x_limits;
        let (y0, y1) = self.y_limits;
        pos2(x0 + position.x * (x1 - x0), y0 + position.y * (y1 - y0))
    }

    fn competing_mode_active(&self) -> bool {
        self.competing_mode
    }

    fn arbiter(&self) -> Arbiter {
        self.arbiter.clone()
    }
}
