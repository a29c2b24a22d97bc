use anyhow::{Context, Result};
use clap::Parser;
use starlight_assets::{MeshData, load_obj};
use starlight_input::{InputEvent, InputSnapshot, MoveKey};
use starlight_kernel::{
    DEFAULT_MODEL_PATH, DriverConfig, DriverState, FrameDriver, Player, PlayerConfig,
    default_scene,
};
use starlight_render::Renderer;
use starlight_render_wgpu::{SurfaceOptions, WgpuRenderer};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "starlight-desktop", about = "Starlight desktop renderer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Window client width in pixels
    #[arg(long, default_value = "1000")]
    width: u32,

    /// Window client height in pixels
    #[arg(long, default_value = "800")]
    height: u32,

    /// OBJ model drawn behind the pyramid
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Present without waiting for vertical sync
    #[arg(long)]
    no_vsync: bool,

    /// Longest simulated step per frame, in milliseconds
    #[arg(long, default_value = "33")]
    max_frame_ms: u64,

    /// Radians of turn per mouse count
    #[arg(long, default_value = "0.005")]
    sensitivity: f32,

    /// Movement speed in units per second
    #[arg(long, default_value = "20.0")]
    speed: f32,
}

impl Cli {
    fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            speed: self.speed,
            sensitivity: self.sensitivity,
            ..PlayerConfig::default()
        }
    }

    fn driver_config(&self) -> DriverConfig {
        let mut config = DriverConfig {
            max_frame_time: Duration::from_millis(self.max_frame_ms),
            ..DriverConfig::default()
        };
        config.projection.set_viewport(self.width, self.height);
        config
    }
}

/// Host-side key binding. Escape is handled separately as a quit request.
fn move_key(code: KeyCode) -> Option<MoveKey> {
    match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(MoveKey::Forward),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(MoveKey::Backward),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(MoveKey::Left),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(MoveKey::Right),
        _ => None,
    }
}

fn key_event(code: KeyCode, state: ElementState) -> Option<InputEvent> {
    let pressed = state == ElementState::Pressed;
    if code == KeyCode::Escape {
        return pressed.then_some(InputEvent::Quit);
    }
    let key = move_key(code)?;
    Some(if pressed {
        InputEvent::KeyDown(key)
    } else {
        InputEvent::KeyUp(key)
    })
}

/// Keep the cursor inside the window. Some platforms only support locking.
fn confine_cursor(window: &Window) {
    let result = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    if let Err(e) = result {
        tracing::warn!("could not confine cursor: {e}");
    }
}

/// Release the cursor while in the background and forget keys whose release
/// another window may receive.
fn apply_focus(window: &Window, input: &mut InputSnapshot, focused: bool) {
    if focused {
        window.set_cursor_visible(false);
        confine_cursor(window);
    } else {
        input.release_all();
        if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            tracing::warn!("could not release cursor: {e}");
        }
        window.set_cursor_visible(true);
    }
}

/// One open window with everything that renders into it.
///
/// The renderer is declared before the window so its surface is released
/// first.
struct Viewport {
    driver: FrameDriver,
    renderer: WgpuRenderer,
    window: Arc<Window>,
    /// Raw mouse motion only turns the view of a focused window.
    focused: bool,
}

struct App {
    cli: Cli,
    model: MeshData,
    viewports: HashMap<WindowId, Viewport>,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli, model: MeshData) -> Self {
        Self {
            cli,
            model,
            viewports: HashMap::new(),
            failure: None,
        }
    }

    fn create_viewport(&self, event_loop: &ActiveEventLoop) -> Result<Viewport> {
        let attrs = Window::default_attributes()
            .with_title("Starlight")
            .with_inner_size(PhysicalSize::new(self.cli.width, self.cli.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let mut renderer = WgpuRenderer::new(
            window.clone(),
            size.width,
            size.height,
            SurfaceOptions {
                vsync: !self.cli.no_vsync,
            },
        )
        .context("failed to initialize graphics")?;

        let (scene, _) =
            default_scene(&mut renderer, &self.model).context("failed to build scene")?;

        let mut config = self.cli.driver_config();
        config.projection.set_viewport(size.width, size.height);
        let mut driver = FrameDriver::new(
            config,
            Player::new(self.cli.player_config()),
            scene,
            Instant::now(),
        );

        let focused = window.has_focus();
        apply_focus(&window, driver.input_mut(), focused);

        Ok(Viewport {
            driver,
            renderer,
            window,
            focused,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.failure = Some(error);
        self.viewports.clear();
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.viewports.is_empty() {
            return;
        }

        match self.create_viewport(event_loop) {
            Ok(viewport) => {
                let id = viewport.window.id();
                tracing::info!(?id, "window opened");
                viewport.window.request_redraw();
                self.viewports.insert(id, viewport);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(viewport) = self.viewports.get_mut(&window_id) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                let input = viewport.driver.input_mut();
                if !input.quit_requested() {
                    tracing::info!(?window_id, "close requested");
                    input.handle(InputEvent::Quit);
                }
                viewport.window.request_redraw();
            }
            WindowEvent::Focused(focused) => {
                viewport.focused = focused;
                apply_focus(&viewport.window, viewport.driver.input_mut(), focused);
            }
            WindowEvent::Resized(size) => {
                viewport.renderer.resize(size.width, size.height);
                viewport.driver.resize(size.width, size.height);
                if viewport.focused {
                    confine_cursor(&viewport.window);
                }
            }
            WindowEvent::Moved(_) if viewport.focused => confine_cursor(&viewport.window),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if let Some(input) = key_event(code, state) {
                    viewport.driver.input_mut().handle(input);
                }
            }
            WindowEvent::RedrawRequested => {
                match viewport.driver.tick(Instant::now(), &mut viewport.renderer) {
                    Ok(DriverState::Running) => {}
                    Ok(DriverState::Terminating) => {
                        tracing::info!(ticks = viewport.driver.ticks(), "window closed");
                        self.viewports.remove(&window_id);
                        if self.viewports.is_empty() {
                            event_loop.exit();
                        }
                    }
                    Err(e) => {
                        let error = anyhow::Error::new(e).context("frame failed");
                        self.fail(event_loop, error);
                    }
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            for viewport in self.viewports.values_mut().filter(|v| v.focused) {
                viewport.driver.input_mut().handle(InputEvent::MouseDelta {
                    dx: delta.0 as f32,
                    dy: delta.1 as f32,
                });
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        for viewport in self.viewports.values() {
            viewport.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("starlight-desktop starting");

    let model = load_obj(&cli.model)
        .with_context(|| format!("failed to load model {}", cli.model.display()))
        .inspect_err(|e| tracing::error!("{e:#}"))?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(cli, model);
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_arrows_share_bindings() {
        assert_eq!(move_key(KeyCode::KeyW), Some(MoveKey::Forward));
        assert_eq!(move_key(KeyCode::ArrowUp), Some(MoveKey::Forward));
        assert_eq!(move_key(KeyCode::KeyA), Some(MoveKey::Left));
        assert_eq!(move_key(KeyCode::ArrowRight), Some(MoveKey::Right));
        assert_eq!(move_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn escape_press_quits_and_release_is_ignored() {
        assert_eq!(
            key_event(KeyCode::Escape, ElementState::Pressed),
            Some(InputEvent::Quit)
        );
        assert_eq!(key_event(KeyCode::Escape, ElementState::Released), None);
    }

    #[test]
    fn key_release_maps_to_key_up() {
        assert_eq!(
            key_event(KeyCode::KeyS, ElementState::Released),
            Some(InputEvent::KeyUp(MoveKey::Backward))
        );
    }

    #[test]
    fn cli_defaults_match_stock_settings() {
        let cli = Cli::parse_from(["starlight-desktop"]);
        assert_eq!((cli.width, cli.height), (1000, 800));
        assert_eq!(cli.model, PathBuf::from(DEFAULT_MODEL_PATH));
        let config = cli.driver_config();
        assert_eq!(config.max_frame_time, Duration::from_millis(33));
        assert!((config.projection.aspect - 1.25).abs() < 1e-6);
        assert_eq!(cli.player_config(), PlayerConfig::default());
    }
}
