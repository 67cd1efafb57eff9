use ndarray::{s, ArrayViewMut3};

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::color::RectColor;
use crate::shared::constants::DEFAULT_STROKE_WIDTH;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Draws hollow rectangles of `stroke` pixels around each region.
///
/// The outer edge runs through `(x, y)` and `(x + width, y + height)`
/// inclusive; further stroke rings grow inward. Anything outside the frame
/// is clipped. Regions are drawn in order, so later ones overdraw earlier.
pub struct RectangleAnnotator {
    stroke: u32,
}

impl RectangleAnnotator {
    pub fn new(stroke: u32) -> Self {
        Self {
            stroke: stroke.max(1),
        }
    }

    pub fn stroke(&self) -> u32 {
        self.stroke
    }
}

impl Default for RectangleAnnotator {
    fn default() -> Self {
        Self::new(DEFAULT_STROKE_WIDTH)
    }
}

impl FrameAnnotator for RectangleAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        regions: &[Region],
        color: RectColor,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Ok(());
        }
        let (fw, fh) = (i64::from(frame.width()), i64::from(frame.height()));
        let color = color.rgb();
        let mut pixels = frame.as_ndarray_mut();

        for r in regions {
            let (x1, y1) = (i64::from(r.x), i64::from(r.y));
            let (x2, y2) = (i64::from(r.right()), i64::from(r.bottom()));
            for ring in 0..i64::from(self.stroke) {
                let (left, top, right, bottom) = (x1 + ring, y1 + ring, x2 - ring, y2 - ring);
                if left > right || top > bottom {
                    break;
                }
                fill_span(&mut pixels, top, top, left, right, fw, fh, color);
                fill_span(&mut pixels, bottom, bottom, left, right, fw, fh, color);
                fill_span(&mut pixels, top, bottom, left, left, fw, fh, color);
                fill_span(&mut pixels, top, bottom, right, right, fw, fh, color);
            }
        }

        Ok(())
    }
}

/// Paint the inclusive block `[row0, row1] x [col0, col1]`, clipped to the frame.
#[allow(clippy::too_many_arguments)]
fn fill_span(
    pixels: &mut ArrayViewMut3<'_, u8>,
    row0: i64,
    row1: i64,
    col0: i64,
    col1: i64,
    fw: i64,
    fh: i64,
    color: [u8; 3],
) {
    let (r0, r1) = (row0.max(0), row1.min(fh - 1));
    let (c0, c1) = (col0.max(0), col1.min(fw - 1));
    if r0 > r1 || c0 > c1 {
        return;
    }
    let mut block = pixels.slice_mut(s![r0 as usize..=r1 as usize, c0 as usize..=c1 as usize, ..]);
    for mut px in block.lanes_mut(ndarray::Axis(2)) {
        px[0] = color[0];
        px[1] = color[1];
        px[2] = color[2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: RectColor = RectColor::new(0, 255, 0);
    const BACKGROUND: [u8; 3] = [40, 80, 120];

    fn make_frame(width: u32, height: u32) -> Frame {
        let data = BACKGROUND
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        Frame::new(data, width, height)
    }

    #[test]
    fn test_border_pixels_take_color() {
        let mut frame = make_frame(100, 100);
        let annotator = RectangleAnnotator::new(2);
        annotator
            .annotate(&mut frame, &[Region::new(10, 10, 50, 50)], GREEN)
            .unwrap();

        // Outer edges run from 10 to 60 inclusive
        for i in 10..=60 {
            assert_eq!(frame.pixel(i, 10), [0, 255, 0], "top edge at x={i}");
            assert_eq!(frame.pixel(i, 60), [0, 255, 0], "bottom edge at x={i}");
            assert_eq!(frame.pixel(10, i), [0, 255, 0], "left edge at y={i}");
            assert_eq!(frame.pixel(60, i), [0, 255, 0], "right edge at y={i}");
        }
        // Second stroke ring
        assert_eq!(frame.pixel(30, 11), [0, 255, 0]);
        assert_eq!(frame.pixel(11, 30), [0, 255, 0]);
        assert_eq!(frame.pixel(59, 30), [0, 255, 0]);
        assert_eq!(frame.pixel(30, 59), [0, 255, 0]);
    }

    #[test]
    fn test_interior_and_exterior_unchanged() {
        let mut frame = make_frame(100, 100);
        RectangleAnnotator::new(2)
            .annotate(&mut frame, &[Region::new(10, 10, 50, 50)], GREEN)
            .unwrap();

        for y in 12..=58 {
            for x in 12..=58 {
                assert_eq!(frame.pixel(x, y), BACKGROUND, "interior at ({x}, {y})");
            }
        }
        assert_eq!(frame.pixel(9, 9), BACKGROUND);
        assert_eq!(frame.pixel(61, 61), BACKGROUND);
        assert_eq!(frame.pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn test_region_touching_frame_edge_is_clipped() {
        let mut frame = make_frame(20, 20);
        RectangleAnnotator::new(2)
            .annotate(&mut frame, &[Region::new(0, 0, 20, 20)], GREEN)
            .unwrap();
        // Right/bottom edges at 20 fall outside; the inner ring at 19 is drawn
        assert_eq!(frame.pixel(0, 0), [0, 255, 0]);
        assert_eq!(frame.pixel(19, 10), [0, 255, 0]);
        assert_eq!(frame.pixel(10, 19), [0, 255, 0]);
        assert_eq!(frame.pixel(10, 10), BACKGROUND);
    }

    #[test]
    fn test_overlapping_regions_are_both_drawn() {
        let mut frame = make_frame(50, 50);
        let red = RectColor::new(255, 0, 0);
        RectangleAnnotator::new(1)
            .annotate(
                &mut frame,
                &[Region::new(5, 5, 20, 20), Region::new(15, 15, 20, 20)],
                red,
            )
            .unwrap();
        assert_eq!(frame.pixel(5, 5), [255, 0, 0]);
        assert_eq!(frame.pixel(35, 35), [255, 0, 0]);
        // Inside the first rectangle, on the second's top edge
        assert_eq!(frame.pixel(20, 15), [255, 0, 0]);
        assert_eq!(frame.pixel(10, 10), BACKGROUND);
    }

    #[test]
    fn test_reannotating_overdraws_previous_color() {
        let mut frame = make_frame(30, 30);
        let annotator = RectangleAnnotator::new(2);
        let regions = [Region::new(5, 5, 10, 10)];
        annotator
            .annotate(&mut frame, &regions, RectColor::new(255, 0, 0))
            .unwrap();
        annotator
            .annotate(&mut frame, &regions, RectColor::new(0, 0, 255))
            .unwrap();
        assert_eq!(frame.pixel(5, 5), [0, 0, 255]);
        assert_eq!(frame.pixel(14, 14), [0, 0, 255]);
    }

    #[test]
    fn test_tiny_region_is_filled() {
        let mut frame = make_frame(10, 10);
        RectangleAnnotator::new(2)
            .annotate(&mut frame, &[Region::new(4, 4, 1, 1)], GREEN)
            .unwrap();
        assert_eq!(frame.pixel(4, 4), [0, 255, 0]);
        assert_eq!(frame.pixel(5, 5), [0, 255, 0]);
        assert_eq!(frame.pixel(6, 6), BACKGROUND);
    }

    #[test]
    fn test_no_regions_leaves_frame_untouched() {
        let mut frame = make_frame(10, 10);
        let before = frame.clone();
        RectangleAnnotator::default()
            .annotate(&mut frame, &[], GREEN)
            .unwrap();
        assert_eq!(frame, before);
    }

    #[test]
    fn test_zero_stroke_is_raised_to_one() {
        assert_eq!(RectangleAnnotator::new(0).stroke(), 1);
    }
}
