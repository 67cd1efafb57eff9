/// An axis-aligned face rectangle in pixel coordinates, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// True when the rectangle lies fully inside a `frame_width` x `frame_height` image.
    pub fn is_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width >= 0
            && self.height >= 0
            && i64::from(self.right()) <= i64::from(frame_width)
            && i64::from(self.bottom()) <= i64::from(frame_height)
    }

    /// Intersects a raw `(x, y, width, height)` box with the image bounds.
    ///
    /// Returns `None` when nothing of the box remains visible.
    pub fn clipped(
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        frame_width: u32,
        frame_height: u32,
    ) -> Option<Region> {
        let x1 = x.max(0);
        let y1 = y.max(0);
        let x2 = (x + width).min(i64::from(frame_width));
        let y2 = (y + height).min(i64::from(frame_height));
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Region {
            x: x1 as i32,
            y: y1 as i32,
            width: (x2 - x1) as i32,
            height: (y2 - y1) as i32,
        })
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}
