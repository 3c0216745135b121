use std::time::Instant;

// Terminal cells approximated as fixed-size pixel boxes so the gesture
// thresholds keep their pointer-device meaning.
pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Converts terminal mouse cells into the pixel translations and release
/// velocity the gesture machine consumes. Velocity is the horizontal speed
/// between the last two samples, signed, in px/s.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    start: Option<(f32, f32)>,
    last: Option<(f32, Instant)>,
    velocity: f32,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self {
            start: None,
            last: None,
            velocity: 0.0,
        }
    }

    pub fn cell_to_px(column: u16, row: u16) -> (f32, f32) {
        (
            f32::from(column) * CELL_WIDTH_PX,
            f32::from(row) * CELL_HEIGHT_PX,
        )
    }

    pub fn active(&self) -> bool {
        self.start.is_some()
    }

    /// Starts tracking. Returns the press location in px.
    pub fn press(&mut self, column: u16, row: u16, now: Instant) -> (f32, f32) {
        let (x, y) = Self::cell_to_px(column, row);
        self.start = Some((x, y));
        self.last = Some((x, now));
        self.velocity = 0.0;
        (x, y)
    }

    /// Returns the translation since the press, or `None` without one.
    pub fn drag(&mut self, column: u16, row: u16, now: Instant) -> Option<(f32, f32)> {
        let (start_x, start_y) = self.start?;
        let (x, y) = Self::cell_to_px(column, row);

        if let Some((last_x, last_at)) = self.last {
            let dt = now.duration_since(last_at).as_secs_f32();
            // Same-instant samples keep the previous velocity.
            if dt > 1e-4 {
                self.velocity = (x - last_x) / dt;
            }
        }
        self.last = Some((x, now));

        Some((x - start_x, y - start_y))
    }

    /// Ends tracking. Returns the final translation and release velocity.
    pub fn release(&mut self, column: u16, row: u16, now: Instant) -> Option<(f32, f32, f32)> {
        let (dx, dy) = self.drag(column, row, now)?;
        let velocity = self.velocity;
        self.reset();
        Some((dx, dy, velocity))
    }

    pub fn reset(&mut self) {
        self.start = None;
        self.last = None;
        self.velocity = 0.0;
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}
