use gaea_core::geometry::Aabb;

/// Colour of a debug shape, by meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugColor {
    /// Area searched by a spatial query.
    Red,
    /// Tile returned by a spatial query.
    Green,
    /// Movement target chosen from a response.
    Blue,
    /// The requesting creature.
    White,
}

/// A box to draw until `expires_at` virtual seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugShape {
    /// Box to draw.
    pub area: Aabb,
    /// What the box means.
    pub color: DebugColor,
    /// Virtual time after which the shape is dropped.
    pub expires_at: f64,
}

/// Collects short-lived debug shapes for a renderer to pick up.
///
/// When disabled, [`DebugOverlay::publish`] is a no-op.
#[derive(Debug, Clone)]
pub struct DebugOverlay {
    enabled: bool,
    ttl_secs: f32,
    shapes: Vec<DebugShape>,
}

impl DebugOverlay {
    /// A new overlay; shapes live for `ttl_secs` virtual seconds.
    pub fn new(enabled: bool, ttl_secs: f32) -> Self {
        Self {
            enabled,
            ttl_secs,
            shapes: Vec::new(),
        }
    }

    /// Whether shapes are being recorded.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn recording on or off. Turning it off drops current shapes.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.shapes.clear();
        }
    }

    /// Record a shape at virtual time `now`.
    pub fn publish(&mut self, area: Aabb, color: DebugColor, now: u64) {
        if !self.enabled {
            return;
        }
        self.shapes.push(DebugShape {
            area,
            color,
            expires_at: now as f64 + f64::from(self.ttl_secs),
        });
    }

    /// Drop shapes whose time has passed.
    pub fn prune(&mut self, now: u64) {
        let now = now as f64;
        self.shapes.retain(|s| s.expires_at > now);
    }

    /// Shapes currently visible.
    pub fn shapes(&self) -> &[DebugShape] {
        &self.shapes
    }
}

#[cfg(test)]
mod tests {
    use gaea_core::geometry::Point;

    use super::*;

    #[test]
    fn disabled_overlay_records_nothing() {
        let mut overlay = DebugOverlay::new(false, 3.0);
        overlay.publish(Aabb::tile(Point::default()), DebugColor::Red, 0);
        assert!(overlay.shapes().is_empty());
    }

    #[test]
    fn shapes_expire_after_ttl() {
        let mut overlay = DebugOverlay::new(true, 3.0);
        overlay.publish(Aabb::tile(Point::default()), DebugColor::Red, 10);
        overlay.prune(12);
        assert_eq!(overlay.shapes().len(), 1);
        overlay.prune(13);
        assert!(overlay.shapes().is_empty());
    }

    #[test]
    fn disabling_clears() {
        let mut overlay = DebugOverlay::new(true, 3.0);
        overlay.publish(Aabb::tile(Point::default()), DebugColor::Green, 0);
        overlay.set_enabled(false);
        assert!(!overlay.is_enabled());
        assert!(overlay.shapes().is_empty());
    }
}
