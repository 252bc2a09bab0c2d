//! Framing the background map around the player.

/// Where the viewport sits on the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framing {
    /// Top-left corner of the viewport in background pixels.
    pub origin: (i32, i32),
    /// How far clamping moved the view away from being centred on the
    /// target, per axis. Zero when the target could be centred exactly.
    pub offset: (i32, i32),
}

/// Centre a `viewport` on `center`, keeping it inside `background`.
///
/// When the background is smaller than the viewport along an axis the origin
/// is pinned to 0 on that axis.
pub fn frame_viewport(background: (i32, i32), viewport: (i32, i32), center: (i32, i32)) -> Framing {
    let (origin_x, offset_x) = frame_axis(background.0, viewport.0, center.0);
    let (origin_y, offset_y) = frame_axis(background.1, viewport.1, center.1);
    Framing {
        origin: (origin_x, origin_y),
        offset: (offset_x, offset_y),
    }
}

fn frame_axis(background: i32, viewport: i32, center: i32) -> (i32, i32) {
    let wanted = i64::from(center) - i64::from(viewport) / 2;
    let max_origin = (i64::from(background) - i64::from(viewport)).max(0);
    let origin = wanted.clamp(0, max_origin);
    (saturate(origin), saturate((wanted - origin).abs()))
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

impl Framing {
    /// Project a background pixel into a `cols` x `rows` cell grid covering
    /// the viewport. `None` when the pixel is outside the viewport.
    pub fn project(
        &self,
        pixel: (i32, i32),
        viewport: (i32, i32),
        cols: u16,
        rows: u16,
    ) -> Option<(u16, u16)> {
        let rel_x = i64::from(pixel.0) - i64::from(self.origin.0);
        let rel_y = i64::from(pixel.1) - i64::from(self.origin.1);
        let (width, height) = (i64::from(viewport.0), i64::from(viewport.1));
        if rel_x < 0 || rel_y < 0 || rel_x >= width || rel_y >= height {
            return None;
        }
        let col = rel_x * i64::from(cols) / width;
        let row = rel_y * i64::from(rows) / height;
        Some((col as u16, row as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: (i32, i32) = (800, 500);
    const BACKGROUND: (i32, i32) = (2800, 1800);

    #[test]
    fn test_map_no_offset() {
        let framing = frame_viewport(BACKGROUND, WINDOW, (1400, 900));

        assert_eq!(framing.offset, (0, 0));
        assert_eq!(framing.origin, (1000, 650));
    }

    #[test]
    fn test_map_offset_near_bottom_left_edge() {
        let edge = 1;
        let framing = frame_viewport(BACKGROUND, WINDOW, (edge, BACKGROUND.1 - edge));

        assert_eq!(framing.offset, (WINDOW.0 / 2 - 1, WINDOW.1 / 2 - 1));
        assert_eq!(framing.origin, (0, BACKGROUND.1 - WINDOW.1));
    }

    #[test]
    fn test_map_offset_opposite_direction() {
        let edge = 1;
        let framing = frame_viewport(BACKGROUND, WINDOW, (edge, edge));

        assert_eq!(framing.offset, (WINDOW.0 / 2 - 1, WINDOW.1 / 2 - 1));
        assert_eq!(framing.origin, (0, 0));
    }

    #[test]
    fn test_background_smaller_than_viewport() {
        let framing = frame_viewport((400, 300), WINDOW, (200, 150));
        assert_eq!(framing.origin, (0, 0));
    }

    #[test]
    fn test_project_into_grid() {
        let framing = frame_viewport(BACKGROUND, WINDOW, (1400, 900));

        assert_eq!(framing.project((1400, 900), WINDOW, 40, 10), Some((20, 5)));
        assert_eq!(framing.project((1000, 650), WINDOW, 40, 10), Some((0, 0)));
        assert_eq!(framing.project((999, 650), WINDOW, 40, 10), None);
        assert_eq!(framing.project((1800, 900), WINDOW, 40, 10), None);
    }

    #[test]
    fn test_extreme_centre_saturates_instead_of_overflowing() {
        let framing = frame_viewport(BACKGROUND, WINDOW, (i32::MIN, i32::MAX));

        assert_eq!(framing.origin, (0, BACKGROUND.1 - WINDOW.1));
        assert_eq!(framing.offset, (i32::MAX, i32::MAX - WINDOW.1 / 2 - (BACKGROUND.1 - WINDOW.1)));
        assert_eq!(framing.project((i32::MIN, i32::MAX), WINDOW, 40, 10), None);
    }
}
