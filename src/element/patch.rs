use egui::{Pos2, Vec2, pos2};

/// Handle that follows the pointer while a patch is spawned: the corner
/// diagonally opposite the first click.
pub(crate) const FREE_HANDLE: usize = 4;

/// Two opposite corners of an axis-aligned box.
///
/// `p0` is where the spawn started and `p1` the diagonally opposite corner.
/// The eight handles are derived from the pair, so dragging one corner past
/// the other flips the box without renumbering any handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Corners {
    pub p0: Pos2,
    pub p1: Pos2,
}

impl Corners {
    pub fn at(position: Pos2) -> Self {
        Self {
            p0: position,
            p1: position,
        }
    }

    pub fn min(&self) -> Pos2 {
        self.p0.min(self.p1)
    }

    pub fn size(&self) -> Vec2 {
        (self.p1 - self.p0).abs()
    }

    pub fn center(&self) -> Pos2 {
        self.p0.lerp(self.p1, 0.5)
    }

    /// Corner, bottom mid, corner, right mid, far corner, top mid, corner, left mid
    pub fn handles(&self) -> Vec<Pos2> {
        let (x0, y0) = (self.p0.x, self.p0.y);
        let (x1, y1) = (self.p1.x, self.p1.y);
        let (xm, ym) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
        vec![
            pos2(x0, y0),
            pos2(xm, y0),
            pos2(x1, y0),
            pos2(x1, ym),
            pos2(x1, y1),
            pos2(xm, y1),
            pos2(x0, y1),
            pos2(x0, ym),
        ]
    }

    /// Move handle `index` to `position`. The opposite handle,
    /// `(index + 4) % 8`, stays put. Midpoints change one dimension only.
    pub fn move_handle(&mut self, index: usize, position: Pos2) -> bool {
        match index {
            0 => self.p0 = position,
            1 => self.p0.y = position.y,
            2 => {
                self.p1.x = position.x;
                self.p0.y = position.y;
            }
            3 => self.p1.x = position.x,
            4 => self.p1 = position,
            5 => self.p1.y = position.y,
            6 => {
                self.p0.x = position.x;
                self.p1.y = position.y;
            }
            7 => self.p0.x = position.x,
            _ => return false,
        }
        true
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.p0 += delta;
        self.p1 += delta;
    }
}
