use crate::style::ResolvedStyle;
use crate::surface::{Geometry, Surface, Visual, VisualId, VisualRole, VisualStyle};

use super::ShapeId;

/// State shared by every shape family: identity, style and the visuals
/// the shape attached to its surface.
#[derive(Debug, Clone)]
pub struct ElementCore {
    id: ShapeId,
    number: usize,
    style: ResolvedStyle,
    visuals: Vec<(VisualRole, VisualId)>,
}

impl ElementCore {
    pub fn new(number: usize, style: ResolvedStyle) -> Self {
        Self {
            id: ShapeId::generate(),
            number,
            style,
            visuals: Vec::new(),
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }

    pub fn attach(
        &mut self,
        surface: &mut dyn Surface,
        role: VisualRole,
        geometry: Geometry,
        style: VisualStyle,
    ) -> VisualId {
        let id = surface.attach_visual(Visual {
            owner: self.id,
            role,
            geometry,
            style,
            visible: true,
            pickable: false,
        });
        self.visuals.push((role, id));
        id
    }

    pub fn visual(&self, role: VisualRole) -> Option<VisualId> {
        self.visuals
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, id)| *id)
    }

    pub fn role_of(&self, visual: VisualId) -> Option<VisualRole> {
        self.visuals
            .iter()
            .find(|(_, id)| *id == visual)
            .map(|(role, _)| *role)
    }

    pub fn set_geometry(&self, surface: &mut dyn Surface, role: VisualRole, geometry: Geometry) {
        if let Some(visual) = self.visual(role).and_then(|id| surface.visual_mut(id)) {
            visual.geometry = geometry;
        }
    }

    pub fn set_pickable(&self, surface: &mut dyn Surface, pickable: bool) {
        for (_, id) in &self.visuals {
            if let Some(visual) = surface.visual_mut(*id) {
                visual.pickable = pickable;
            }
        }
    }

    pub fn set_visible(&self, surface: &mut dyn Surface, role: VisualRole, visible: bool) {
        for (_, id) in self.visuals.iter().filter(|(r, _)| *r == role) {
            if let Some(visual) = surface.visual_mut(*id) {
                visual.visible = visible;
            }
        }
    }

    pub fn detach_all(&mut self, surface: &mut dyn Surface) {
        for (_, id) in self.visuals.drain(..) {
            surface.detach_visual(id);
        }
    }
}

/// Outline (and optional fill) of a shape body
pub(crate) fn body_style(style: &ResolvedStyle, filled: bool) -> VisualStyle {
    VisualStyle {
        stroke_color: style.edge_color,
        fill_color: filled.then_some(style.face_color),
        line_width: style.line_width,
        line_style: style.line_style,
        marker: style.marker,
        marker_size: style.marker_size,
    }
}

/// Hollow vertex markers in the edge colour
pub(crate) fn handle_style(style: &ResolvedStyle) -> VisualStyle {
    VisualStyle {
        fill_color: None,
        ..body_style(style, false)
    }
}
