//=========================================================================
// Game
//=========================================================================
//
// Two-state demo game driven by the app's frame loop.
//
// State machine:
// ```text
//            SPACE (+ sound, half speed)
//   ATTRACT ─────────────────────────────► GAME
//      │    ◄───────────────────────────── │
//      │             ESC (+ sound)
//      └─ ESC → quit
// ```
//
// Every transition fires `OnGameStateChanged` with the new state's label.
// Time controls (P pause, O step, hold T slow-mo) act on the game clock
// in both states.
//
//=========================================================================

//=== Module Declarations =================================================

mod state;

//=== Public API ==========================================================

pub use state::GameState;

//=== External Dependencies ===============================================

use glam::Vec2;
use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::audio::{SoundDimension, SoundPlayback};
use crate::core::clock::Clock;
use crate::core::context::AppContext;
use crate::core::event_system::{
    EventArgs, EventSystem, SubscriptionId, EVENT_GAME_STATE_CHANGED, EVENT_WINDOW_SIZE_CHANGED,
};
use crate::core::input::KeyCode;
use crate::core::math::Aabb2;
use crate::core::quit::QuitReason;
use crate::core::renderer::{
    add_verts_for_aabb2d, add_verts_for_disc2d, add_verts_for_line_segment2d, BlendMode, Camera,
    DepthMode, ModelConstants, RasterizerMode, RenderState, Renderer, Rgba8, SamplerMode, Vertex,
};

//=== Constants ===========================================================

pub const CLICK_SOUND_PATH: &str = "Data/Audio/TestSound.mp3";
pub const ATTRACT_TEXTURE_PATH: &str = "Data/Images/goop.png";
pub const GAME_TEXTURE_PATH: &str = "Data/Images/serenity.png";
pub const DEFAULT_SHADER_PATH: &str = "Data/Shaders/Default";

/// Distance moved per frame while a movement key is held.
const MOVE_STEP: f32 = 10.0;
const DISC_RADIUS: f32 = 300.0;
const LINE_THICKNESS: f32 = 10.0;
const LINE_INSET: f32 = 100.0;
const SLOW_MOTION_SCALE: f64 = 0.1;
const DEBUG_TEXT_HEIGHT: f32 = 20.0;

const OPAQUE_STATE: RenderState = RenderState {
    blend: BlendMode::Opaque,
    rasterizer: RasterizerMode::SolidCullBack,
    sampler: SamplerMode::BilinearClamp,
    depth: DepthMode::Disabled,
};

//=== Game ================================================================

pub struct Game {
    state: GameState,
    clock: Clock,
    screen_camera: Camera,

    /// WASD offset of the attract-screen disc from screen center.
    disc_offset: Vec2,

    size_subscription: Option<SubscriptionId>,
}

impl Game {
    //--- Construction -----------------------------------------------------

    /// Creates the game in the attract state and subscribes its handlers.
    pub fn new(events: &mut EventSystem, screen_size: Vec2) -> Self {
        let size_subscription = events.subscribe(EVENT_WINDOW_SIZE_CHANGED, |args| {
            let width: i32 = args.get_value("newWidth", -1);
            let height: i32 = args.get_value("newHeight", -1);
            info!(target: "game", "Window size changed to {}x{}", width, height);
            false
        });

        Self {
            state: GameState::Attract,
            clock: Clock::new(),
            screen_camera: Camera::orthographic(Vec2::ZERO, screen_size),
            disc_offset: Vec2::ZERO,
            size_subscription: Some(size_subscription),
        }
    }

    pub fn shutdown(&mut self, events: &mut EventSystem) {
        if let Some(id) = self.size_subscription.take() {
            events.unsubscribe(id);
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn disc_offset(&self) -> Vec2 {
        self.disc_offset
    }

    //--- State Machine ----------------------------------------------------

    /// Switches to `target` and fires `OnGameStateChanged`.
    ///
    /// Switching to the current state does nothing and fires nothing.
    pub fn change_game_state(&mut self, target: GameState, events: &mut EventSystem) {
        if target == self.state {
            return;
        }

        info!(target: "game", "Game state {} -> {}", self.state, target);
        self.state = target;

        let mut args = EventArgs::new().with_value(EVENT_GAME_STATE_CHANGED, target.as_str());
        events.fire_event(EVENT_GAME_STATE_CHANGED, &mut args);
    }

    //--- Update -----------------------------------------------------------

    pub fn update(&mut self, ctx: &mut AppContext) {
        self.clock.advance(ctx.system_clock.delta_seconds());
        self.update_from_input(ctx);
        self.adjust_for_pause_and_time_distortion(ctx);
    }

    fn update_from_input(&mut self, ctx: &mut AppContext) {
        match self.state {
            GameState::Attract => self.update_attract(ctx),
            GameState::Game => self.update_game(ctx),
        }
    }

    fn update_attract(&mut self, ctx: &mut AppContext) {
        let input = &ctx.input;

        let mut disc_step = Vec2::ZERO;
        if input.is_key_down(KeyCode::KeyW) { disc_step.y += MOVE_STEP; }
        if input.is_key_down(KeyCode::KeyA) { disc_step.x -= MOVE_STEP; }
        if input.is_key_down(KeyCode::KeyS) { disc_step.y -= MOVE_STEP; }
        if input.is_key_down(KeyCode::KeyD) { disc_step.x += MOVE_STEP; }
        self.disc_offset += disc_step;

        let mut window_step = Vec2::ZERO;
        if input.is_key_down(KeyCode::KeyL) { window_step.x += MOVE_STEP; }
        if input.is_key_down(KeyCode::KeyJ) { window_step.x -= MOVE_STEP; }
        if input.is_key_down(KeyCode::KeyI) { window_step.y += MOVE_STEP; }
        if input.is_key_down(KeyCode::KeyK) { window_step.y -= MOVE_STEP; }
        if window_step != Vec2::ZERO {
            let offset = ctx.windows.manual_offset() + window_step;
            ctx.windows.set_manual_offset(offset);
        }

        if ctx.input.was_key_just_pressed(KeyCode::Escape) {
            ctx.quit.request(QuitReason::Game);
        }

        if ctx.input.was_key_just_pressed(KeyCode::Space) {
            self.change_game_state(GameState::Game, &mut ctx.events);
            play_click(ctx, SoundPlayback::default().with_speed(0.5));
        }
    }

    fn update_game(&mut self, ctx: &mut AppContext) {
        if ctx.input.was_key_just_pressed(KeyCode::Escape) {
            self.change_game_state(GameState::Attract, &mut ctx.events);
            play_click(ctx, SoundPlayback::default());
        }
    }

    fn adjust_for_pause_and_time_distortion(&mut self, ctx: &AppContext) {
        let input = &ctx.input;

        if input.was_key_just_pressed(KeyCode::KeyP) {
            self.clock.toggle_pause();
        }
        if input.was_key_just_pressed(KeyCode::KeyO) {
            self.clock.step_single_frame();
        }
        if input.is_key_down(KeyCode::KeyT) {
            self.clock.set_time_scale(SLOW_MOTION_SCALE);
        }
        if input.was_key_just_released(KeyCode::KeyT) {
            self.clock.set_time_scale(1.0);
        }
    }

    //--- Render -----------------------------------------------------------

    pub fn render(&self, ctx: &mut AppContext) {
        let renderer = ctx.renderer.as_mut();

        renderer.begin_camera(&self.screen_camera);
        match self.state {
            GameState::Attract => self.render_attract(renderer),
            GameState::Game => self.render_game(renderer),
        }
        renderer.end_camera(&self.screen_camera);

        if self.state == GameState::Game {
            self.add_debug_text(ctx);
            ctx.debug_render.render_screen(ctx.renderer.as_mut(), &self.screen_camera);
        }
    }

    fn render_attract(&self, renderer: &mut dyn Renderer) {
        let screen = self.screen_camera.bounds();

        let mut backdrop = Vec::new();
        add_verts_for_aabb2d(&mut backdrop, screen, Rgba8::WHITE, Aabb2::ZERO_TO_ONE);
        draw(renderer, &backdrop, Some(ATTRACT_TEXTURE_PATH));

        let mut disc = Vec::new();
        add_verts_for_disc2d(&mut disc, screen.center() + self.disc_offset, DISC_RADIUS, Rgba8::YELLOW);
        draw(renderer, &disc, None);
    }

    fn render_game(&self, renderer: &mut dyn Renderer) {
        let screen = self.screen_camera.bounds();

        let mut backdrop = Vec::new();
        add_verts_for_aabb2d(&mut backdrop, screen, Rgba8::WHITE, Aabb2::ZERO_TO_ONE);
        draw(renderer, &backdrop, Some(GAME_TEXTURE_PATH));

        let inset = Vec2::new(LINE_INSET, LINE_INSET);
        let bottom_right = Vec2::new(screen.maxs.x, screen.mins.y);
        let top_left = Vec2::new(screen.mins.x, screen.maxs.y);

        let mut lines = Vec::new();
        add_verts_for_line_segment2d(
            &mut lines,
            screen.mins + inset,
            screen.maxs - inset,
            LINE_THICKNESS,
            Rgba8::GREEN,
        );
        add_verts_for_line_segment2d(
            &mut lines,
            top_left + Vec2::new(LINE_INSET, -LINE_INSET),
            bottom_right + Vec2::new(-LINE_INSET, LINE_INSET),
            LINE_THICKNESS,
            Rgba8::GREEN,
        );
        draw(renderer, &lines, None);
    }

    fn add_debug_text(&self, ctx: &mut AppContext) {
        let delta = self.clock.delta_seconds();
        let fps = if delta > 0.0 { 1.0 / delta } else { 0.0 };
        let text = format!(
            "Time: {:.2}\nFPS: {:.2}\nScale: {:.1}",
            self.clock.total_seconds(),
            fps,
            self.clock.time_scale()
        );

        let screen = self.screen_camera.bounds();
        let anchors = [screen.maxs - Vec2::new(200.0, 60.0), screen.mins];
        for anchor in anchors {
            ctx.debug_render.add_screen_text(
                text.clone(),
                anchor,
                DEBUG_TEXT_HEIGHT,
                Vec2::ZERO,
                Rgba8::WHITE,
            );
        }
    }
}

//=== Helpers =============================================================

fn play_click(ctx: &mut AppContext, playback: SoundPlayback) {
    let result = ctx
        .audio
        .create_or_get_sound(CLICK_SOUND_PATH, SoundDimension::Sound2D)
        .and_then(|sound| ctx.audio.start_sound(sound, playback));

    if let Err(e) = result {
        warn!(target: "game", "Click sound failed: {}", e);
    }
}

/// Opaque draw with the default shader and optional texture.
///
/// Missing resources are logged and the draw goes ahead untextured.
fn draw(renderer: &mut dyn Renderer, verts: &[Vertex], texture_path: Option<&str>) {
    let texture = texture_path.and_then(|path| match renderer.create_or_get_texture_from_file(path) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(target: "game", "Texture unavailable: {}", e);
            None
        }
    });
    let shader = match renderer.create_or_get_shader_from_file(DEFAULT_SHADER_PATH) {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(target: "game", "Shader unavailable: {}", e);
            None
        }
    };

    renderer.set_model_constants(ModelConstants::default());
    renderer.set_render_state(OPAQUE_STATE);
    renderer.bind_texture(texture);
    renderer.bind_shader(shader);
    renderer.draw_vertex_array(verts);
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::InputEvent;
    use crate::core::testing::TestContext;
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    const SCREEN: Vec2 = Vec2::new(1600.0, 800.0);

    fn setup() -> (TestContext, Game) {
        let mut test = TestContext::new();
        let game = Game::new(&mut test.ctx.events, SCREEN);
        (test, game)
    }

    /// Runs one input frame then one game update.
    fn frame(test: &mut TestContext, game: &mut Game, events: &[InputEvent]) {
        test.ctx.input.begin_frame();
        test.ctx.input.process_events(events);
        test.ctx.input.finalize_frame();
        test.ctx.system_clock.advance(1.0 / 60.0);
        game.update(&mut test.ctx);
    }

    fn state_changes(events: &mut EventSystem) -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        events.subscribe(EVENT_GAME_STATE_CHANGED, move |args| {
            sink.borrow_mut().push(args.get_string(EVENT_GAME_STATE_CHANGED, "DEFAULT"));
            false
        });
        seen
    }

    //--- State Machine ----------------------------------------------------

    #[test]
    fn change_to_current_state_is_silent() {
        let (mut test, mut game) = setup();
        let seen = state_changes(&mut test.ctx.events);

        game.change_game_state(GameState::Attract, &mut test.ctx.events);

        assert_eq!(game.state(), GameState::Attract);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn change_to_other_state_fires_once() {
        let (mut test, mut game) = setup();
        let seen = state_changes(&mut test.ctx.events);

        game.change_game_state(GameState::Game, &mut test.ctx.events);

        assert_eq!(game.state(), GameState::Game);
        assert_eq!(*seen.borrow(), vec!["GAME".to_string()]);
    }

    #[test]
    fn space_in_attract_starts_game_with_half_speed_sound() {
        let (mut test, mut game) = setup();
        let seen = state_changes(&mut test.ctx.events);

        frame(&mut test, &mut game, &[InputEvent::key_down(KeyCode::Space)]);

        assert_eq!(game.state(), GameState::Game);
        assert_eq!(*seen.borrow(), vec!["GAME".to_string()]);

        let audio = test.audio.borrow();
        assert_eq!(audio.sound_count(), 1);
        let played = audio.playbacks();
        assert_eq!(played.len(), 1);
        assert_eq!(audio.sound_path(played[0].sound), Some(CLICK_SOUND_PATH));
        assert_eq!(played[0].playback.volume, 1.0);
        assert_eq!(played[0].playback.balance, 0.0);
        assert_eq!(played[0].playback.speed, 0.5);
        assert!(!played[0].playback.looped);
    }

    #[test]
    fn esc_in_game_returns_to_attract_with_default_sound() {
        let (mut test, mut game) = setup();
        frame(&mut test, &mut game, &[InputEvent::key_down(KeyCode::Space)]);
        frame(&mut test, &mut game, &[InputEvent::key_down(KeyCode::Escape)]);

        assert_eq!(game.state(), GameState::Attract);
        assert!(!test.ctx.quit.is_requested());

        let audio = test.audio.borrow();
        assert_eq!(audio.sound_count(), 1);
        assert_eq!(audio.playbacks()[1].playback, SoundPlayback::default());
    }

    #[test]
    fn esc_in_attract_requests_quit() {
        let (mut test, mut game) = setup();

        frame(&mut test, &mut game, &[InputEvent::key_down(KeyCode::Escape)]);

        assert_eq!(test.ctx.quit.reason(), Some(QuitReason::Game));
        assert_eq!(game.state(), GameState::Attract);
    }

    //--- Attract Controls -------------------------------------------------

    #[test]
    fn wasd_moves_disc_each_frame_held() {
        let (mut test, mut game) = setup();

        frame(&mut test, &mut game, &[InputEvent::key_down(KeyCode::KeyD)]);
        frame(&mut test, &mut game, &[]);
        frame(&mut test, &mut game, &[InputEvent::key_down(KeyCode::KeyW)]);

        assert_eq!(game.disc_offset(), Vec2::new(30.0, 10.0));
    }

    #[test]
    fn ijkl_ignored_outside_attract() {
        let (mut test, mut game) = setup();
        game.change_game_state(GameState::Game, &mut test.ctx.events);

        frame(&mut test, &mut game, &[InputEvent::key_down(KeyCode::KeyL)]);

        assert_eq!(test.ctx.windows.manual_offset(), Vec2::ZERO);
    }

    #[test]
    fn ijkl_shifts_window_offset() {
        let (mut test, mut game) = setup();

        frame(
            &mut test,
            &mut game,
            &[InputEvent::key_down(KeyCode::KeyL), InputEvent::key_down(KeyCode::KeyK)],
        );

        assert_eq!(test.ctx.windows.manual_offset(), Vec2::new(10.0, -10.0));
    }

    //--- Time Controls ----------------------------------------------------

    #[test]
    fn pause_freezes_game_clock() {
        let (mut test, mut game) = setup();
        frame(&mut test, &mut game, &[InputEvent::key_down(KeyCode::KeyP)]);
        let frozen = game.clock().total_seconds();

        frame(&mut test, &mut game, &[]);

        assert!(game.clock().is_paused());
        assert_eq!(game.clock().total_seconds(), frozen);
    }

    #[test]
    fn step_advances_exactly_one_frame() {
        let (mut test, mut game) = setup();
        frame(&mut test, &mut game, &[InputEvent::key_down(KeyCode::KeyP)]);
        let paused_at = game.clock().total_seconds();

        frame(&mut test, &mut game, &[InputEvent::key_down(KeyCode::KeyO)]);
        frame(&mut test, &mut game, &[]);
        let stepped = game.clock().total_seconds();
        frame(&mut test, &mut game, &[]);

        assert!(stepped > paused_at);
        assert_eq!(game.clock().total_seconds(), stepped);
    }

    #[test]
    fn holding_t_slows_time_until_released() {
        let (mut test, mut game) = setup();

        frame(&mut test, &mut game, &[InputEvent::key_down(KeyCode::KeyT)]);
        assert_eq!(game.clock().time_scale(), 0.1);

        frame(&mut test, &mut game, &[InputEvent::key_up(KeyCode::KeyT)]);
        assert_eq!(game.clock().time_scale(), 1.0);
    }

    //--- Render -----------------------------------------------------------

    #[test]
    fn debug_text_only_in_game_state() {
        let (mut test, mut game) = setup();

        game.render(&mut test.ctx);
        assert!(test.ctx.debug_render.screen_texts().is_empty());

        game.change_game_state(GameState::Game, &mut test.ctx.events);
        game.render(&mut test.ctx);
        let texts = test.ctx.debug_render.screen_texts();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].text.starts_with("Time: "));
    }

    #[test]
    fn render_draws_inside_screen_camera() {
        let (mut test, mut game) = setup();

        test.ctx.renderer.begin_frame();
        game.render(&mut test.ctx);
        assert_eq!(test.renderer.borrow().current_frame().draw_calls, 2);

        game.change_game_state(GameState::Game, &mut test.ctx.events);
        test.ctx.renderer.begin_frame();
        game.render(&mut test.ctx);
        // backdrop + lines + debug text
        assert_eq!(test.renderer.borrow().current_frame().draw_calls, 3);
    }
}
