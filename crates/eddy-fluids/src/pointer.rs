use glam::Vec2;

/// Latest pointer sample, in the form the injector consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Position in normalized domain coordinates, y pointing up.
    pub position: Vec2,
    /// Displacement since the previous sample, in surface pixels (y pointing down).
    pub delta: Vec2,
    /// Motion that no tick has consumed yet.
    pub dirty: bool,
    /// Previous sample in surface pixels.
    pub(crate) last: Option<Vec2>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a motion sample at `pixel` on a surface of `surface` pixels. The most recent
    /// sample wins; the first sample reports no displacement.
    pub fn record(&mut self, pixel: Vec2, surface: Vec2) {
        self.delta = pixel - self.last.unwrap_or(pixel);
        self.last = Some(pixel);
        self.position = Vec2::new(pixel.x / surface.x, 1.0 - pixel.y / surface.y);
        self.dirty = true;
    }

    /// Marks the current motion as consumed.
    pub fn consume(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_has_no_displacement() {
        let mut pointer = PointerState::new();
        pointer.record(Vec2::new(30.0, 10.0), Vec2::new(100.0, 50.0));

        assert!(pointer.dirty);
        assert_eq!(pointer.delta, Vec2::ZERO);
        assert_eq!(pointer.position, Vec2::new(0.3, 0.8));
    }

    #[test]
    fn displacement_is_measured_from_the_previous_sample() {
        let mut pointer = PointerState::new();
        let surface = Vec2::new(200.0, 100.0);
        pointer.record(Vec2::new(50.0, 50.0), surface);
        pointer.record(Vec2::new(52.0, 47.0), surface);
        pointer.record(Vec2::new(60.0, 25.0), surface);

        assert_eq!(pointer.delta, Vec2::new(8.0, -22.0));
        assert_eq!(pointer.position, Vec2::new(0.3, 0.75));
    }

    #[test]
    fn consume_clears_dirty_only() {
        let mut pointer = PointerState::new();
        pointer.record(Vec2::new(5.0, 5.0), Vec2::splat(10.0));
        pointer.consume();

        assert!(!pointer.dirty);
        assert_eq!(pointer.position, Vec2::splat(0.5));
    }
}
