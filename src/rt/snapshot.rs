use rtrb::{Consumer, Producer, RingBuffer};

use crate::curve::{Curve, CurveError, CurveType, Warp, WarpType};
use crate::persist::ParseError;

/// A handful of in-flight snapshots is plenty: the audio side drains the
/// whole ring every block, and snapshots are idempotent full states.
const SNAPSHOT_QUEUE_SIZE: usize = 8;

/// Create a connected editor/audio pair, both starting from `initial`.
pub fn curve_channel(initial: Curve) -> (CurveEditor, SharedCurve) {
    let (tx, rx) = RingBuffer::<Curve>::new(SNAPSHOT_QUEUE_SIZE);

    let editor = CurveEditor { curve: initial, tx };
    let shared = SharedCurve { curve: initial, rx };

    (editor, shared)
}

/// The editing side: owns the working curve, publishes a snapshot after
/// every successful mutation.
///
/// If the ring is momentarily full the snapshot is dropped, exactly like
/// the engine's other control queues; the next mutation republishes the
/// full state, and [`CurveEditor::publish`] lets a caller force one out
/// (e.g. on gesture end) if the last edit of a burst must not be lost.
pub struct CurveEditor {
    curve: Curve,
    tx: Producer<Curve>,
}

impl CurveEditor {
    pub fn insert_vertex(&mut self, x: f32, y: f32) -> Result<(), CurveError> {
        self.curve.insert_vertex(x, y)?;
        self.publish();
        Ok(())
    }

    pub fn insert_vertex_with(
        &mut self,
        x: f32,
        y: f32,
        tension: f32,
        curve_type: CurveType,
    ) -> Result<(), CurveError> {
        self.curve.insert_vertex_with(x, y, tension, curve_type)?;
        self.publish();
        Ok(())
    }

    pub fn remove_vertex(&mut self, index: usize) -> Result<(), CurveError> {
        self.curve.remove_vertex(index)?;
        self.publish();
        Ok(())
    }

    pub fn set_tension(&mut self, index: usize, tension: f32) -> Result<(), CurveError> {
        self.curve.set_tension(index, tension)?;
        self.publish();
        Ok(())
    }

    pub fn set_curve_type(&mut self, index: usize, curve_type: CurveType) -> Result<(), CurveError> {
        self.curve.set_curve_type(index, curve_type)?;
        self.publish();
        Ok(())
    }

    pub fn set_vertex_position(&mut self, index: usize, x: f32, y: f32) -> Result<(), CurveError> {
        self.curve.set_vertex_position(index, x, y)?;
        self.publish();
        Ok(())
    }

    pub fn set_warp_amount(&mut self, amount: f32) {
        self.curve.set_warp_amount(amount);
        self.publish();
    }

    pub fn set_warp_type(&mut self, kind: WarpType) {
        self.curve.set_warp_type(kind);
        self.publish();
    }

    pub fn set_bipolar_mode(&mut self, bipolar: bool) {
        self.curve.set_bipolar_mode(bipolar);
        self.publish();
    }

    pub fn reset(&mut self) {
        self.curve.reset();
        self.publish();
    }

    pub fn rebuild_from_string(&mut self, text: &str) -> Result<(), ParseError> {
        self.curve.rebuild_from_string(text)?;
        self.publish();
        Ok(())
    }

    /// Push the current state into the ring. Returns false if the ring was
    /// full and the snapshot was dropped.
    pub fn publish(&mut self) -> bool {
        self.tx.push(self.curve).is_ok()
    }

    /// The working curve, for display and serialization.
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn warp(&self) -> Warp {
        self.curve.warp()
    }
}

/// The audio side: wait-free reads of the newest published curve.
pub struct SharedCurve {
    curve: Curve,
    rx: Consumer<Curve>,
}

impl SharedCurve {
    /// Drain the ring, keeping the newest snapshot. Call once per audio
    /// block, before rendering. Bounded by the ring size; never blocks.
    pub fn refresh(&mut self) {
        while let Ok(snapshot) = self.rx.pop() {
            self.curve = snapshot;
        }
    }

    /// Evaluate the last-known-good curve. Safe at audio rate.
    #[inline]
    pub fn evaluate(&self, x: f32) -> f32 {
        self.curve.evaluate(x)
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }
}
