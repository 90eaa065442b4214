//=========================================================================
// Window Collection
//=========================================================================
//
// Ordered set of live windows and the per-frame passes over them.
//
// Frame usage (driven by the App):
//   Update:  update_drift() → take_moved() → Platform::set_window_position
//   Render:  reconcile_resizes() → present()
//
// Windows keep their creation order; every pass visits them in that order.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{IVec2, Vec2};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{Window, WindowHandle};
use crate::core::math::wrap_ping_pong_period;
use crate::core::platform_bridge::Platform;
use crate::core::renderer::Renderer;

//=== Constants ===========================================================

/// Angular spacing between successive windows' drift directions (golden angle).
const DRIFT_ANGLE_STEP: f32 = 2.399_963;

//=== WindowCollection ====================================================

pub struct WindowCollection {
    windows: Vec<Window>,
    drift_speed: f32,
    drift_range: f32,
    manual_offset: Vec2,
    spawned: usize,
}

impl WindowCollection {
    /// `drift_speed` in pixels per scaled second; `drift_range` is how far a
    /// window wanders from its origin on each axis before turning back.
    pub fn new(drift_speed: f32, drift_range: f32) -> Self {
        Self {
            windows: Vec::new(),
            drift_speed,
            drift_range,
            manual_offset: Vec2::ZERO,
            spawned: 0,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a window the platform just created.
    ///
    /// Acquires its display context and creates its swap chain. Either
    /// failure is logged and the window is registered anyway.
    pub fn add_window(
        &mut self,
        handle: WindowHandle,
        title: String,
        origin: Vec2,
        client_dimensions: IVec2,
        platform: &mut dyn Platform,
        renderer: &mut dyn Renderer,
    ) -> &Window {
        let velocity = Vec2::from_angle(self.spawned as f32 * DRIFT_ANGLE_STEP) * self.drift_speed;
        self.spawned += 1;

        let mut window = Window::new(handle, title, origin, client_dimensions, velocity);
        window.place(self.manual_offset, self.drift_range);

        match platform.acquire_display_context(handle) {
            Ok(context) => window.set_display_context(context),
            Err(e) => warn!(target: "window", "No display context for window {}: {}", handle, e),
        }

        match renderer.create_window_swap_chain(&window.surface()) {
            Ok(()) => window.set_has_swap_chain(true),
            Err(e) => warn!(target: "window", "Swap chain creation failed for window {}: {}", handle, e),
        }

        info!(
            target: "window",
            "Window {} '{}' registered at ({}, {}) size {}x{}",
            handle,
            window.title(),
            origin.x,
            origin.y,
            client_dimensions.x,
            client_dimensions.y
        );

        self.windows.push(window);
        let index = self.windows.len() - 1;
        &self.windows[index]
    }

    /// Removes every window, oldest first, for teardown.
    pub(crate) fn drain(&mut self) -> Vec<Window> {
        std::mem::take(&mut self.windows)
    }

    //--- Motion -----------------------------------------------------------

    /// Advances every window's drift by `scaled_delta_seconds`.
    pub fn update_drift(&mut self, scaled_delta_seconds: f32) {
        let range = self.drift_range;
        for window in self.windows.iter_mut() {
            let offset = window.drift_offset + window.drift_velocity * scaled_delta_seconds;
            // One ping-pong period holds every position, so the offset never
            // grows large enough to lose f32 precision.
            window.drift_offset = Vec2::new(
                wrap_ping_pong_period(offset.x, range),
                wrap_ping_pong_period(offset.y, range),
            );
            window.place(self.manual_offset, range);
        }
    }

    pub fn manual_offset(&self) -> Vec2 {
        self.manual_offset
    }

    /// Shifts every window by `offset` relative to its origin.
    pub fn set_manual_offset(&mut self, offset: Vec2) {
        self.manual_offset = offset;
        for window in self.windows.iter_mut() {
            window.place(self.manual_offset, self.drift_range);
        }
    }

    /// Windows whose position changed since the last call.
    pub fn take_moved(&mut self) -> Vec<(WindowHandle, Vec2)> {
        self.windows
            .iter_mut()
            .filter(|w| w.position_dirty)
            .map(|w| {
                w.position_dirty = false;
                (w.handle, w.position)
            })
            .collect()
    }

    //--- Render Sync ------------------------------------------------------

    /// Records a new client size reported by the platform.
    ///
    /// Returns `false` for unknown handles.
    pub fn mark_resized(&mut self, handle: WindowHandle, client_dimensions: IVec2) -> bool {
        let Some(window) = self.get_mut(handle) else {
            return false;
        };
        window.client_dimensions = client_dimensions;
        window.needs_resize = true;
        true
    }

    #[cfg(test)]
    pub fn mark_all_for_update(&mut self) {
        for window in self.windows.iter_mut() {
            window.needs_update = true;
        }
    }

    /// Resizes swap chains of windows flagged `needs_resize`.
    ///
    /// A window whose swap chain creation failed earlier gets a fresh one
    /// instead. Failures leave the flag set so the next frame retries.
    /// Returns how many windows were reconciled.
    pub fn reconcile_resizes(&mut self, renderer: &mut dyn Renderer) -> usize {
        let mut reconciled = 0;

        for window in self.windows.iter_mut().filter(|w| w.needs_resize) {
            let surface = window.surface();
            let result = if window.has_swap_chain {
                renderer.resize_window_swap_chain(&surface)
            } else {
                renderer.create_window_swap_chain(&surface)
            };

            match result {
                Ok(()) => {
                    window.has_swap_chain = true;
                    window.needs_resize = false;
                    window.needs_update = true;
                    window.resize_failures = 0;
                    reconciled += 1;
                }
                Err(e) => {
                    window.resize_failures += 1;
                    if window.resize_failures == 1 {
                        warn!(target: "window", "Resize failed for window {}: {}", window.handle, e);
                    } else {
                        debug!(
                            target: "window",
                            "Resize still failing for window {} ({} frames): {}",
                            window.handle,
                            window.resize_failures,
                            e
                        );
                    }
                }
            }
        }

        reconciled
    }

    /// Presents every window that needs it and has no resize pending.
    ///
    /// Returns how many windows were presented.
    pub fn present(&mut self, renderer: &mut dyn Renderer) -> usize {
        let mut presented = 0;

        for window in self.windows.iter_mut() {
            if !window.needs_update || window.needs_resize || !window.has_swap_chain {
                continue;
            }

            match renderer.render_viewport_to_window(window.handle, window.viewport()) {
                Ok(()) => {
                    window.needs_update = false;
                    presented += 1;
                }
                Err(e) => warn!(target: "window", "Present failed for window {}: {}", window.handle, e),
            }
        }

        presented
    }

    //--- Queries ----------------------------------------------------------

    pub fn get(&self, handle: WindowHandle) -> Option<&Window> {
        self.windows.iter().find(|w| w.handle == handle)
    }

    fn get_mut(&mut self, handle: WindowHandle) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.handle == handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.windows.iter()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::ping_pong;
    use crate::core::renderer::HeadlessRenderer;
    use crate::core::testing::MockPlatform;

    //--- Test Helpers -----------------------------------------------------

    struct Fixture {
        windows: WindowCollection,
        platform: MockPlatform,
        renderer: HeadlessRenderer,
    }

    impl Fixture {
        fn new(count: u64) -> Self {
            let mut renderer = HeadlessRenderer::new();
            renderer.startup().unwrap();
            let mut fixture = Self {
                windows: WindowCollection::new(40.0, 120.0),
                platform: MockPlatform::new(),
                renderer,
            };
            for id in 1..=count {
                fixture.add(id, 400, 300);
            }
            fixture
        }

        fn add(&mut self, id: u64, w: i32, h: i32) {
            self.windows.add_window(
                WindowHandle::new(id),
                format!("window {}", id),
                Vec2::new(100.0 * id as f32, 100.0),
                IVec2::new(w, h),
                &mut self.platform,
                &mut self.renderer,
            );
        }

        fn frame(&mut self) -> usize {
            self.renderer.begin_frame();
            self.windows.reconcile_resizes(&mut self.renderer);
            let presented = self.windows.present(&mut self.renderer);
            self.renderer.end_frame();
            presented
        }
    }

    //--- Registration -----------------------------------------------------

    #[test]
    fn added_windows_are_ready_for_first_present() {
        let fixture = Fixture::new(3);

        assert_eq!(fixture.windows.len(), 3);
        for window in fixture.windows.iter() {
            assert!(window.needs_update());
            assert!(window.has_swap_chain());
            assert!(window.has_display_context());
        }
    }

    #[test]
    fn failed_swap_chain_still_registers_window() {
        let mut fixture = Fixture::new(0);
        fixture.add(1, 0, 0);

        let window = fixture.windows.get(WindowHandle::new(1)).unwrap();
        assert!(!window.has_swap_chain());
        assert_eq!(fixture.frame(), 0);
    }

    #[test]
    fn drift_directions_differ_per_window() {
        let fixture = Fixture::new(2);
        let velocities: Vec<Vec2> = fixture.windows.iter().map(|w| w.drift_velocity()).collect();

        assert_ne!(velocities[0], velocities[1]);
        for v in velocities {
            assert!((v.length() - 40.0).abs() < 1e-3);
        }
    }

    //--- Motion -----------------------------------------------------------

    #[test]
    fn drift_is_additive_over_frame_splits() {
        let mut one_step = Fixture::new(1);
        let mut many_steps = Fixture::new(1);

        one_step.windows.update_drift(0.75);
        for _ in 0..3 {
            many_steps.windows.update_drift(0.25);
        }

        let a = one_step.windows.iter().next().unwrap().drift_offset();
        let b = many_steps.windows.iter().next().unwrap().drift_offset();
        assert!((a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4);

        let travel = one_step.windows.iter().next().unwrap().drift_velocity() * 0.75;
        let expected = Vec2::new(
            wrap_ping_pong_period(travel.x, 120.0),
            wrap_ping_pong_period(travel.y, 120.0),
        );
        assert!((a.x - expected.x).abs() < 1e-3 && (a.y - expected.y).abs() < 1e-3);
    }

    #[test]
    fn drift_offset_wraps_to_one_period() {
        let mut fixture = Fixture::new(2);
        for _ in 0..100_000 {
            fixture.windows.update_drift(0.1);
        }

        for window in fixture.windows.iter() {
            let offset = window.drift_offset();
            assert!(offset.x >= 0.0 && offset.x < 240.0, "x offset {}", offset.x);
            assert!(offset.y >= 0.0 && offset.y < 240.0, "y offset {}", offset.y);

            let delta = window.position() - window.origin();
            assert!(delta.x >= 0.0 && delta.x <= 120.0);
            assert!(delta.y >= 0.0 && delta.y <= 120.0);
        }
    }

    #[test]
    fn wrapped_drift_lands_where_unwrapped_would() {
        let mut fixture = Fixture::new(1);
        fixture.windows.update_drift(10.0);

        let window = fixture.windows.iter().next().unwrap();
        let travel = window.drift_velocity() * 10.0;
        let expected = window.origin()
            + Vec2::new(ping_pong(travel.x, 120.0), ping_pong(travel.y, 120.0));
        let position = window.position();
        assert!((position.x - expected.x).abs() < 1e-3);
        assert!((position.y - expected.y).abs() < 1e-3);
    }

    #[test]
    fn zero_range_drift_is_not_wrapped() {
        let mut fixture = Fixture::new(0);
        fixture.windows = WindowCollection::new(40.0, 0.0);
        fixture.add(1, 400, 300);
        fixture.windows.update_drift(100.0);

        let window = fixture.windows.iter().next().unwrap();
        let expected = window.drift_velocity() * 100.0;
        assert!((window.drift_offset() - expected).length() < 1e-3);
    }

    #[test]
    fn drift_stays_within_range() {
        let mut fixture = Fixture::new(3);
        for _ in 0..500 {
            fixture.windows.update_drift(0.1);
        }

        for window in fixture.windows.iter() {
            let delta = window.position() - window.origin();
            assert!(delta.x >= 0.0 && delta.x <= 120.0);
            assert!(delta.y >= 0.0 && delta.y <= 120.0);
        }
    }

    #[test]
    fn movement_flags_update_and_reports_once() {
        let mut fixture = Fixture::new(2);
        fixture.frame();

        fixture.windows.update_drift(0.5);
        assert!(fixture.windows.iter().all(|w| w.needs_update()));
        assert_eq!(fixture.windows.take_moved().len(), 2);
        assert!(fixture.windows.take_moved().is_empty());
    }

    #[test]
    fn zero_delta_changes_nothing() {
        let mut fixture = Fixture::new(1);
        fixture.frame();

        fixture.windows.update_drift(0.0);

        assert!(fixture.windows.take_moved().is_empty());
        assert_eq!(fixture.frame(), 0);
    }

    #[test]
    fn manual_offset_shifts_all_windows() {
        let mut fixture = Fixture::new(2);
        let before: Vec<Vec2> = fixture.windows.iter().map(|w| w.position()).collect();

        fixture.windows.set_manual_offset(Vec2::new(10.0, -10.0));

        for (window, old) in fixture.windows.iter().zip(before) {
            assert_eq!(window.position(), old + Vec2::new(10.0, -10.0));
        }
        assert_eq!(fixture.windows.take_moved().len(), 2);
    }

    //--- Render Sync ------------------------------------------------------

    #[test]
    fn present_clears_needs_update() {
        let mut fixture = Fixture::new(3);

        assert_eq!(fixture.frame(), 3);
        assert!(fixture.windows.iter().all(|w| !w.needs_update()));
        assert_eq!(fixture.frame(), 0);
    }

    #[test]
    fn successful_resize_flags_update() {
        let mut fixture = Fixture::new(1);
        fixture.frame();
        let handle = WindowHandle::new(1);

        assert!(fixture.windows.mark_resized(handle, IVec2::new(640, 480)));
        assert_eq!(fixture.windows.reconcile_resizes(&mut fixture.renderer), 1);

        let window = fixture.windows.get(handle).unwrap();
        assert!(!window.needs_resize());
        assert!(window.needs_update());
        assert_eq!(fixture.renderer.swap_chain_dimensions(handle), Some(IVec2::new(640, 480)));
    }

    #[test]
    fn failed_resize_skips_window_and_retries() {
        let mut fixture = Fixture::new(2);
        fixture.frame();
        let minimized = WindowHandle::new(1);

        fixture.windows.mark_resized(minimized, IVec2::new(0, 0));
        fixture.windows.mark_all_for_update();

        assert_eq!(fixture.frame(), 1);
        assert!(fixture.windows.get(minimized).unwrap().needs_resize());
        assert!(fixture.windows.get(minimized).unwrap().needs_update());

        fixture.windows.mark_resized(minimized, IVec2::new(400, 300));
        assert_eq!(fixture.frame(), 1);
        assert!(!fixture.windows.get(minimized).unwrap().needs_resize());
    }

    #[test]
    fn mark_resized_unknown_handle() {
        let mut fixture = Fixture::new(1);
        assert!(!fixture.windows.mark_resized(WindowHandle::new(99), IVec2::new(1, 1)));
    }
}
