use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{error, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::input::InputToken;
use super::metrics::{MetricsAccumulator, MetricsHandle};
use super::rendering::{Renderer, Viewport};
use super::sim::{Simulation, TickError, TickSnapshot};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Tile World".to_string(),
            window_width: 900,
            window_height: 750,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            max_render_fps: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
    #[error("simulation tick failed: {0}")]
    Simulation(#[from] TickError),
}

pub fn run_app(config: LoopConfig, sim: Simulation) -> Result<(), AppError> {
    let metrics_handle = MetricsHandle::default();
    run_app_with_metrics(config, sim, metrics_handle)
}

pub fn run_app_with_metrics(
    config: LoopConfig,
    mut sim: Simulation,
    metrics_handle: MetricsHandle,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let window_for_loop = Arc::clone(&window);

    let scene = sim.active_scene();
    let framebuffer = Viewport::for_map(scene.width(), scene.height());
    let mut renderer = Renderer::new(window, framebuffer).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);

    info!(scene = sim.active_scene().name, "scene_loaded");
    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        render_fps_cap = ?effective_render_cap,
        "loop_config"
    );

    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut last_snapshot = sim.snapshot();
    let mut last_applied_title: Option<String> = None;

    let fault: Rc<RefCell<Option<TickError>>> = Rc::new(RefCell::new(None));
    let fault_for_loop = Rc::clone(&fault);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window_for_loop.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(err) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %err, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = window_for_loop.inner_size();
                        if let Err(err) = renderer.resize(size.width, size.height) {
                            warn!(error = %err, "renderer_resize_failed");
                            window_target.exit();
                        }
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        // OS auto-repeat is dropped; the input buffer owns
                        // repeat timing itself.
                        if event.repeat {
                            return;
                        }
                        let PhysicalKey::Code(code) = event.physical_key else {
                            return;
                        };
                        if code == KeyCode::Escape && event.state == ElementState::Pressed {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                            return;
                        }
                        if let Some(token) = token_for_key(code) {
                            match event.state {
                                ElementState::Pressed => sim.input_mut().press(token),
                                ElementState::Released => sim.input_mut().release(token),
                            }
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                        last_frame_instant = now;

                        let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                        accumulator = accumulator.saturating_add(clamped_frame_dt);

                        let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                        for _ in 0..step_plan.ticks_to_run {
                            match sim.tick(fixed_dt_seconds) {
                                Ok(snapshot) => {
                                    if snapshot.scene != last_snapshot.scene {
                                        info!(scene = sim.active_scene().name, "scene_switched");
                                    }
                                    last_snapshot = snapshot;
                                    metrics_accumulator.record_tick();
                                }
                                Err(err) => {
                                    // Fail-stop: a tick fault means corrupt
                                    // state, so halt instead of rendering on.
                                    error!(error = %err, "simulation_fault");
                                    *fault_for_loop.borrow_mut() = Some(err);
                                    window_target.exit();
                                    return;
                                }
                            }
                        }
                        accumulator = step_plan.remaining_accumulator;

                        if step_plan.dropped_backlog > Duration::ZERO {
                            warn!(
                                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                                max_ticks_per_frame, "sim_clamp_triggered"
                            );
                        }

                        let elapsed_since_last_present =
                            Instant::now().saturating_duration_since(last_present_instant);
                        let cap_sleep =
                            compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                        if cap_sleep > Duration::ZERO {
                            thread::sleep(cap_sleep);
                        }

                        if let Err(err) = renderer.render_scene(sim.active_scene(), &last_snapshot)
                        {
                            warn!(error = %err, "renderer_draw_failed");
                            window_target.exit();
                        }
                        last_present_instant = Instant::now();

                        let next_title = Some(status_title(
                            &config.window_title,
                            sim.active_scene().name,
                            &last_snapshot,
                            metrics_handle.snapshot().fps,
                        ));
                        if next_title != last_applied_title {
                            if let Some(title) = &next_title {
                                window_for_loop.set_title(title);
                            }
                            last_applied_title = next_title;
                        }
                        metrics_accumulator.record_frame(raw_frame_dt);

                        if let Some(snapshot) = metrics_accumulator.flush(now) {
                            metrics_handle.publish(snapshot);
                            info!(
                                fps = snapshot.fps,
                                tps = snapshot.tps,
                                frame_time_ms = snapshot.frame_time_ms,
                                scene = sim.active_scene().name,
                                "loop_metrics"
                            );
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window_for_loop.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)?;

    let result = match fault.borrow_mut().take() {
        Some(err) => Err(AppError::Simulation(err)),
        None => Ok(()),
    };
    result
}

fn token_for_key(code: KeyCode) -> Option<InputToken> {
    match code {
        KeyCode::ArrowUp => Some(InputToken::ArrowUp),
        KeyCode::ArrowDown => Some(InputToken::ArrowDown),
        KeyCode::ArrowLeft => Some(InputToken::ArrowLeft),
        KeyCode::ArrowRight => Some(InputToken::ArrowRight),
        KeyCode::KeyW => Some(InputToken::KeyW),
        KeyCode::KeyS => Some(InputToken::KeyS),
        KeyCode::KeyA => Some(InputToken::KeyA),
        KeyCode::KeyD => Some(InputToken::KeyD),
        KeyCode::KeyR => Some(InputToken::Reset),
        _ => None,
    }
}

fn status_title(base: &str, scene_name: &str, snapshot: &TickSnapshot, fps: f32) -> String {
    format!(
        "{base} | {scene_name} | ({:.1}, {:.1}) | {fps:.0} fps",
        snapshot.position.x, snapshot.position.y
    )
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}
