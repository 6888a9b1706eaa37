use std::collections::BTreeMap;

/// What a recognized label does to the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorAction {
    Move { dx: f64, dy: f64 },
    Reset,
}

/// A point in a bounded plane, starting at the center. The plane's origin is
/// the top-left corner, so positive `dy` moves down.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorState {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl CursorState {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: width / 2.0,
            y: height / 2.0,
            width,
            height,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Moves by (dx, dy), clamped to the plane.
    pub fn nudge(&mut self, dx: f64, dy: f64) {
        self.x = (self.x + dx).clamp(0.0, self.width);
        self.y = (self.y + dy).clamp(0.0, self.height);
    }

    pub fn recenter(&mut self) {
        self.x = self.width / 2.0;
        self.y = self.height / 2.0;
    }

    pub fn apply(&mut self, action: CursorAction) {
        match action {
            CursorAction::Move { dx, dy } => self.nudge(dx, dy),
            CursorAction::Reset => self.recenter(),
        }
    }
}

/// Maps predicted labels to cursor actions. Labels with no binding are
/// ignored, so a classifier may know more labels than the pad handles.
#[derive(Debug, Clone, Default)]
pub struct DirectionPad {
    bindings: BTreeMap<String, CursorAction>,
}

impl DirectionPad {
    /// A pad with no bindings; every label is a no-op.
    pub fn unbound() -> Self {
        Self::default()
    }

    /// The five-label arrow layout: Left/Right/Up/Down move by `step` on
    /// one axis, Stop snaps back to the center.
    pub fn arrows(step: f64) -> Self {
        let mut pad = Self::default();
        pad.bind("Left", CursorAction::Move { dx: -step, dy: 0.0 });
        pad.bind("Right", CursorAction::Move { dx: step, dy: 0.0 });
        pad.bind("Up", CursorAction::Move { dx: 0.0, dy: -step });
        pad.bind("Down", CursorAction::Move { dx: 0.0, dy: step });
        pad.bind("Stop", CursorAction::Reset);
        pad
    }

    pub fn bind(&mut self, label: impl Into<String>, action: CursorAction) {
        self.bindings.insert(label.into(), action);
    }

    pub fn action_for(&self, label: &str) -> Option<CursorAction> {
        self.bindings.get(label).copied()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}
