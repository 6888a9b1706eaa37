/// Multiplicative zoom factor: shrinking compounds without a floor,
/// growing claws back 3% per step but never exceeds full size.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomLevel {
    factor: f64,
}

const SHRINK_RATE: f64 = 0.93;
const GROW_RATE: f64 = 1.03;

impl Default for ZoomLevel {
    fn default() -> Self {
        Self { factor: 1.0 }
    }
}

impl ZoomLevel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn shrink(&mut self) {
        self.factor *= SHRINK_RATE;
    }

    pub fn grow(&mut self) {
        if self.factor < 1.0 {
            self.factor *= GROW_RATE;
        }
        if self.factor > 1.0 {
            self.factor = 1.0;
        }
    }
}

/// Shrinks the zoom while the classifier keeps seeing the distraction
/// label, grows it back otherwise.
#[derive(Debug, Clone)]
pub struct FocusTracker {
    distraction_label: String,
    zoom: ZoomLevel,
}

impl FocusTracker {
    pub fn new(distraction_label: impl Into<String>) -> Self {
        Self {
            distraction_label: distraction_label.into(),
            zoom: ZoomLevel::new(),
        }
    }

    /// Feeds one predicted label and returns the zoom factor after it.
    pub fn observe(&mut self, label: &str) -> f64 {
        if label == self.distraction_label {
            self.zoom.shrink();
        } else {
            self.zoom.grow();
        }
        self.zoom.factor()
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom.factor()
    }

    pub fn distraction_label(&self) -> &str {
        &self.distraction_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }
    const EPS: f64 = 1e-12;

    #[test]
    fn starts_at_full_size() {
        assert!(approx(ZoomLevel::new().factor(), 1.0, EPS));
    }

    #[test]
    fn shrinking_compounds() {
        let mut zoom = ZoomLevel::new();
        zoom.shrink();
        zoom.shrink();
        assert!(approx(zoom.factor(), 0.93 * 0.93, EPS));
    }

    #[test]
    fn growing_never_exceeds_full_size() {
        let mut zoom = ZoomLevel::new();
        zoom.grow();
        assert!(approx(zoom.factor(), 1.0, EPS));

        zoom.shrink();
        for _ in 0..100 {
            zoom.grow();
        }
        assert!(approx(zoom.factor(), 1.0, EPS));
    }

    #[test]
    fn shrink_then_grow_recovers_exactly_to_one() {
        let mut zoom = ZoomLevel::new();
        for _ in 0..5 {
            zoom.shrink();
        }
        for _ in 0..200 {
            zoom.grow();
        }
        assert_eq!(zoom.factor(), 1.0);
    }

    #[test]
    fn tracker_shrinks_on_the_distraction_label_only() {
        let mut tracker = FocusTracker::new("phone");
        let after_phone = tracker.observe("phone");
        assert!(after_phone < 1.0);

        let after_face = tracker.observe("face");
        assert!(after_face > after_phone);
        assert_eq!(tracker.distraction_label(), "phone");
    }
}
