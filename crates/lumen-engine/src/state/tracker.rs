use crate::device::{Capabilities, Capability, GlDriver, Winding};

use super::{BlendMode, BlendTable};

/// Fixed-function state a draw needs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RenderState {
    pub blend: bool,
    pub blend_mode: BlendMode,
    pub depth_test: bool,
    pub cull_face: bool,
    pub front_face: Winding,
}

impl Default for RenderState {
    /// Blending on with [`BlendMode::Normal`], everything else off, CCW.
    fn default() -> Self {
        Self {
            blend: true,
            blend_mode: BlendMode::Normal,
            depth_test: false,
            cull_face: false,
            front_face: Winding::Ccw,
        }
    }
}

/// What the driver was last told. `None` means unknown: the next request for
/// that field always emits.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
struct ActiveState {
    blend: Option<bool>,
    blend_mode: Option<BlendMode>,
    depth_test: Option<bool>,
    cull_face: Option<bool>,
    front_face: Option<Winding>,
}

impl ActiveState {
    fn known(&self) -> Option<RenderState> {
        Some(RenderState {
            blend: self.blend?,
            blend_mode: self.blend_mode?,
            depth_test: self.depth_test?,
            cull_face: self.cull_face?,
            front_face: self.front_face?,
        })
    }
}

/// Tracks the active [`RenderState`] of one context and issues only deltas.
///
/// Invariant: the number of driver state calls equals the number of fields
/// that actually changed.
#[derive(Debug)]
pub struct StateTracker {
    active: ActiveState,

    /// Saved states. Slots above `depth` are kept for reuse.
    stack: Vec<ActiveState>,
    depth: usize,

    blend_table: BlendTable,
    max_vertex_attribs: u32,
    has_vao: bool,
}

impl StateTracker {
    pub fn new(caps: &Capabilities) -> Self {
        Self {
            active: ActiveState::default(),
            stack: Vec::new(),
            depth: 0,
            blend_table: BlendTable::new(),
            max_vertex_attribs: caps.max_vertex_attribs,
            has_vao: caps.has_vao(),
        }
    }

    /// The active state, or `None` while any field is unknown.
    #[inline]
    pub fn active(&self) -> Option<RenderState> {
        self.active.known()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn blend_table(&self) -> &BlendTable {
        &self.blend_table
    }

    /// Brings the driver to `desired`. Returns the number of primitives issued.
    pub fn apply_state(&mut self, driver: &mut dyn GlDriver, desired: RenderState) -> usize {
        [
            self.set_blend(driver, desired.blend),
            self.set_blend_mode(driver, desired.blend_mode),
            self.set_depth_test(driver, desired.depth_test),
            self.set_cull_face(driver, desired.cull_face),
            self.set_front_face(driver, desired.front_face),
        ]
        .into_iter()
        .filter(|changed| *changed)
        .count()
    }

    // ── per-field setters ─────────────────────────────────────────────────
    //
    // Each returns true if a primitive was issued.

    pub fn set_blend(&mut self, driver: &mut dyn GlDriver, enabled: bool) -> bool {
        if self.active.blend == Some(enabled) {
            return false;
        }
        self.active.blend = Some(enabled);
        driver.set_enabled(Capability::Blend, enabled);
        log::trace!("state: blend={enabled}");
        true
    }

    pub fn set_blend_mode(&mut self, driver: &mut dyn GlDriver, mode: BlendMode) -> bool {
        if self.active.blend_mode == Some(mode) {
            return false;
        }
        self.active.blend_mode = Some(mode);
        let (src, dst) = self.blend_table.factors(mode);
        driver.blend_func(src, dst);
        log::trace!("state: blend_mode={mode:?}");
        true
    }

    pub fn set_depth_test(&mut self, driver: &mut dyn GlDriver, enabled: bool) -> bool {
        if self.active.depth_test == Some(enabled) {
            return false;
        }
        self.active.depth_test = Some(enabled);
        driver.set_enabled(Capability::DepthTest, enabled);
        log::trace!("state: depth_test={enabled}");
        true
    }

    pub fn set_cull_face(&mut self, driver: &mut dyn GlDriver, enabled: bool) -> bool {
        if self.active.cull_face == Some(enabled) {
            return false;
        }
        self.active.cull_face = Some(enabled);
        driver.set_enabled(Capability::CullFace, enabled);
        log::trace!("state: cull_face={enabled}");
        true
    }

    pub fn set_front_face(&mut self, driver: &mut dyn GlDriver, winding: Winding) -> bool {
        if self.active.front_face == Some(winding) {
            return false;
        }
        self.active.front_face = Some(winding);
        driver.front_face(winding);
        log::trace!("state: front_face={winding:?}");
        true
    }

    // ── save / restore ────────────────────────────────────────────────────

    /// Saves the active state.
    pub fn push_state(&mut self) {
        if self.depth == self.stack.len() {
            self.stack.push(self.active);
        } else {
            self.stack[self.depth] = self.active;
        }
        self.depth += 1;
    }

    /// Restores the most recently saved state. Returns the number of
    /// primitives issued.
    ///
    /// # Panics
    ///
    /// If nothing was pushed.
    pub fn pop_state(&mut self, driver: &mut dyn GlDriver) -> usize {
        assert!(self.depth > 0, "pop_state called with an empty state stack");
        self.depth -= 1;
        let saved = self.stack[self.depth];

        let mut issued = 0;
        macro_rules! restore {
            ($field:ident, $setter:ident) => {
                match saved.$field {
                    Some(v) => issued += self.$setter(driver, v) as usize,
                    None => self.active.$field = None,
                }
            };
        }
        restore!(blend, set_blend);
        restore!(blend_mode, set_blend_mode);
        restore!(depth_test, set_depth_test);
        restore!(cull_face, set_cull_face);
        restore!(front_face, set_front_face);

        issued
    }

    /// Puts the context back into a known state.
    ///
    /// Unbinds the VAO (when the extension exists), disables vertex attributes
    /// above 0, resets the unpack-flip-Y flag, forgets every tracked field and
    /// applies `default` so each of its primitives is issued once.
    pub fn reset_to_default(&mut self, driver: &mut dyn GlDriver, default: RenderState) {
        if self.has_vao {
            driver.unbind_vertex_array();
        }
        for index in 1..self.max_vertex_attribs {
            driver.disable_vertex_attrib_array(index);
        }

        self.active = ActiveState::default();
        driver.set_unpack_flip_y(false);

        self.apply_state(driver, default);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{BlendFactor, GlCall, TraceDriver};

    fn tracker(driver: &TraceDriver) -> StateTracker {
        StateTracker::new(&Capabilities::negotiate(driver))
    }

    fn state_calls(driver: &TraceDriver) -> usize {
        driver.count(GlCall::is_state_change)
    }

    fn all_off() -> RenderState {
        RenderState {
            blend: false,
            blend_mode: BlendMode::Normal,
            depth_test: false,
            cull_face: false,
            front_face: Winding::Ccw,
        }
    }

    // ── deduplication ─────────────────────────────────────────────────────

    #[test]
    fn first_apply_emits_every_field() {
        let mut driver = TraceDriver::new();
        let mut st = tracker(&driver);

        assert_eq!(st.apply_state(&mut driver, RenderState::default()), 5);
        assert_eq!(state_calls(&driver), 5);
        assert_eq!(st.active(), Some(RenderState::default()));
    }

    #[test]
    fn repeated_apply_is_free() {
        let mut driver = TraceDriver::new();
        let mut st = tracker(&driver);
        st.apply_state(&mut driver, RenderState::default());
        driver.clear();

        for _ in 0..10 {
            assert_eq!(st.apply_state(&mut driver, RenderState::default()), 0);
        }
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn call_count_matches_changed_fields() {
        let mut driver = TraceDriver::new();
        let mut st = tracker(&driver);
        st.apply_state(&mut driver, all_off());
        driver.clear();

        let sequence = [
            RenderState { blend: true, ..all_off() },
            RenderState { blend: true, blend_mode: BlendMode::Add, ..all_off() },
            RenderState { blend: true, blend_mode: BlendMode::Add, ..all_off() },
            RenderState { cull_face: true, front_face: Winding::Cw, ..all_off() },
            RenderState { depth_test: true, ..all_off() },
            all_off(),
        ];

        let mut prev = all_off();
        let mut expected = 0;
        for desired in sequence {
            let changed = [
                prev.blend != desired.blend,
                prev.blend_mode != desired.blend_mode,
                prev.depth_test != desired.depth_test,
                prev.cull_face != desired.cull_face,
                prev.front_face != desired.front_face,
            ]
            .iter()
            .filter(|c| **c)
            .count();

            assert_eq!(st.apply_state(&mut driver, desired), changed);
            expected += changed;
            prev = desired;
        }

        assert_eq!(state_calls(&driver), expected);
    }

    #[test]
    fn blend_mode_issues_table_factors() {
        let mut driver = TraceDriver::new();
        let mut st = tracker(&driver);

        st.set_blend_mode(&mut driver, BlendMode::Screen);
        assert_eq!(
            driver.calls(),
            &[GlCall::BlendFunc(BlendFactor::One, BlendFactor::OneMinusSrcColor)]
        );
    }

    // ── push / pop ────────────────────────────────────────────────────────

    #[test]
    fn push_pop_restores_prior_state() {
        let mut driver = TraceDriver::new();
        let mut st = tracker(&driver);
        let outer = RenderState { blend_mode: BlendMode::Multiply, ..RenderState::default() };
        st.apply_state(&mut driver, outer);

        st.push_state();
        st.apply_state(&mut driver, all_off());
        st.apply_state(&mut driver, RenderState { cull_face: true, ..all_off() });
        st.pop_state(&mut driver);

        assert_eq!(st.active(), Some(outer));
        assert_eq!(st.depth(), 0);
    }

    #[test]
    fn push_then_pop_issues_nothing() {
        let mut driver = TraceDriver::new();
        let mut st = tracker(&driver);
        st.apply_state(&mut driver, RenderState::default());
        driver.clear();

        st.push_state();
        assert_eq!(st.pop_state(&mut driver), 0);
        assert!(driver.calls().is_empty());
    }

    #[test]
    fn nested_push_reuses_slots() {
        let mut driver = TraceDriver::new();
        let mut st = tracker(&driver);
        st.apply_state(&mut driver, RenderState::default());

        for _ in 0..3 {
            st.push_state();
            st.push_state();
            st.pop_state(&mut driver);
            st.pop_state(&mut driver);
        }
        assert_eq!(st.stack.len(), 2);
        assert_eq!(st.depth(), 0);
    }

    #[test]
    fn pop_of_unknown_snapshot_forgets_fields() {
        let mut driver = TraceDriver::new();
        let mut st = tracker(&driver);

        st.push_state();
        st.apply_state(&mut driver, RenderState::default());
        st.pop_state(&mut driver);
        assert_eq!(st.active(), None);

        driver.clear();
        assert_eq!(st.apply_state(&mut driver, RenderState::default()), 5);
    }

    #[test]
    #[should_panic(expected = "empty state stack")]
    fn pop_without_push_panics() {
        let mut driver = TraceDriver::new();
        let mut st = tracker(&driver);
        st.pop_state(&mut driver);
    }

    // ── reset ─────────────────────────────────────────────────────────────

    #[test]
    fn reset_reissues_every_field() {
        let mut driver = TraceDriver::new().with_max_vertex_attribs(4);
        let mut st = tracker(&driver);
        st.apply_state(&mut driver, RenderState::default());
        driver.clear();

        st.reset_to_default(&mut driver, RenderState::default());

        assert_eq!(
            driver.calls()[..4],
            [
                GlCall::DisableVertexAttribArray(1),
                GlCall::DisableVertexAttribArray(2),
                GlCall::DisableVertexAttribArray(3),
                GlCall::UnpackFlipY(false),
            ]
        );
        assert_eq!(state_calls(&driver), 5);
        assert!(!driver.calls().contains(&GlCall::UnbindVertexArray));
    }

    #[test]
    fn reset_unbinds_vao_when_available() {
        let mut driver = TraceDriver::new().with_extension("OES_vertex_array_object");
        let mut st = tracker(&driver);

        st.reset_to_default(&mut driver, RenderState::default());
        assert_eq!(driver.calls()[0], GlCall::UnbindVertexArray);
    }
}
