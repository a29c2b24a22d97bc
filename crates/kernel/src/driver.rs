use crate::clock::{DEFAULT_MAX_FRAME_TIME, FrameClock};
use crate::player::Player;
use crate::scene::Scene;
use glam::{Mat4, Vec3};
use starlight_input::InputSnapshot;
use starlight_render::{Frame, RenderCommand, RenderError, Renderer};
use std::f32::consts::FRAC_PI_4;
use std::time::{Duration, Instant};

/// Left-handed perspective projection with a 0..1 depth range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: FRAC_PI_4,
            aspect: 1000.0 / 800.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

impl Projection {
    /// Match the aspect ratio to a viewport, ignoring zero-sized ones.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// Frame driver settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverConfig {
    pub max_frame_time: Duration,
    pub clear_color: [f32; 4],
    /// Direction toward the light, written into every object's constants.
    pub light_dir: Vec3,
    pub projection: Projection,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_frame_time: DEFAULT_MAX_FRAME_TIME,
            clear_color: [0.0, 0.1, 0.2, 1.0],
            light_dir: Vec3::new(0.3, 1.0, 0.5).normalize(),
            projection: Projection::default(),
        }
    }
}

/// Loop state. `Terminating` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Terminating,
}

/// Runs one input → simulate → render step per tick.
///
/// Owns the input snapshot, the player and the scene. The renderer is passed
/// in per tick so the driver can run against any backend.
#[derive(Debug)]
pub struct FrameDriver {
    state: DriverState,
    clock: FrameClock,
    input: InputSnapshot,
    player: Player,
    scene: Scene,
    clear_color: [f32; 4],
    light_dir: Vec3,
    projection: Projection,
    view_proj: Mat4,
    frame: Frame,
    ticks: u64,
}

impl FrameDriver {
    pub fn new(config: DriverConfig, player: Player, scene: Scene, start: Instant) -> Self {
        let view_proj = config.projection.matrix() * player.view_matrix();
        Self {
            state: DriverState::Running,
            clock: FrameClock::new(start, config.max_frame_time),
            input: InputSnapshot::new(),
            player,
            scene,
            clear_color: config.clear_color,
            light_dir: config.light_dir,
            projection: config.projection,
            view_proj,
            frame: Frame::new(),
            ticks: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Ticks that reached the renderer.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn input_mut(&mut self) -> &mut InputSnapshot {
        &mut self.input
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// View-projection matrix used by the most recent tick.
    pub fn view_proj(&self) -> Mat4 {
        self.view_proj
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.set_viewport(width, height);
    }

    /// Run one tick at wall-clock time `now`.
    ///
    /// Once a quit has been observed nothing else happens and no frame is
    /// submitted. Renderer errors are returned unchanged.
    pub fn tick<R: Renderer + ?Sized>(
        &mut self,
        now: Instant,
        renderer: &mut R,
    ) -> Result<DriverState, RenderError> {
        if self.state == DriverState::Terminating {
            return Ok(self.state);
        }

        let input = self.input.consume();
        if input.quit {
            tracing::info!(ticks = self.ticks, "frame driver terminating");
            self.state = DriverState::Terminating;
            return Ok(self.state);
        }

        let dt = self.clock.tick(now).as_secs_f32();

        self.player.apply_mouse_delta(input.mouse_delta);
        self.player.apply_movement(input.intent, dt);

        self.view_proj = self.projection.matrix() * self.player.view_matrix();

        self.scene.animate(dt);

        self.frame.reset();
        self.frame.push(RenderCommand::Clear {
            color: self.clear_color,
        });
        if self.scene.backdrop() {
            self.frame.push(RenderCommand::DrawBackdrop);
        }
        for object in self.scene.objects() {
            self.frame.push(object.draw(self.view_proj, self.light_dir));
        }
        self.frame.push(RenderCommand::Present);

        renderer.submit(&self.frame)?;
        self.ticks += 1;
        tracing::trace!(tick = self.ticks, dt, "frame submitted");
        Ok(self.state)
    }
}
