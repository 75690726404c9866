//! Core Engine struct and the frame scheduler

use std::path::Path;

use crate::core::config::{EngineConfig, HookErrorPolicy};
use crate::core::debug::DebugInfo;
use crate::core::error::{EngineError, HookFailure, HookFailures};
use crate::core::phase::Phase;
use crate::core::time::{Clock, Stopwatch, Time, TimeState};
use crate::ecs::{
    Behaviour, GameObject, ObjectHandle, ObjectId, ObjectManager, SpawnCatalog, Transform,
};
use crate::input::{Input, InputDevice, ScriptedInput};
use crate::physics;
use crate::renderer::{DrawRequest, HeadlessRenderer, RenderBackend, SpriteHandle};

/// Context passed to behaviour hooks
pub struct EngineContext {
    /// Time tracking
    pub time: Time,
    /// Input state
    pub input: Input,
    /// Game objects
    pub objects: ObjectManager,
    /// Debug information and stats
    pub debug: DebugInfo,
    renderer: Box<dyn RenderBackend>,
    /// Draw requests collected this frame
    draw_list: Vec<DrawRequest>,
    /// Should the engine quit
    should_quit: bool,
}

impl EngineContext {
    fn new(objects: ObjectManager, renderer: Box<dyn RenderBackend>, debug: DebugInfo) -> Self {
        Self {
            time: Time::new(),
            input: Input::new(),
            objects,
            debug,
            renderer,
            draw_list: Vec::new(),
            should_quit: false,
        }
    }

    /// Load a sprite through the render backend
    ///
    /// # Errors
    ///
    /// [`EngineError::AssetNotFound`] if the backend cannot load `path`.
    pub fn load_sprite(&mut self, path: impl AsRef<Path>) -> Result<SpriteHandle, EngineError> {
        self.renderer.load_sprite(path.as_ref())
    }

    /// Draw requests collected so far this frame
    pub fn draw_list(&self) -> &[DrawRequest] {
        &self.draw_list
    }

    /// Request engine shutdown after the current frame
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Check if engine should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Summary of one frame
#[derive(Debug)]
pub struct FrameReport {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Fixed steps run this frame
    pub fixed_steps: u32,
    /// Draw requests handed to the renderer
    pub draw_calls: usize,
    /// Hooks that failed; only non-empty under [`HookErrorPolicy::LogAndContinue`]
    pub hook_failures: Vec<HookFailure>,
}

/// Builds an [`Engine`].
///
/// Types must be registered here; the spawn catalog is closed once the
/// engine is built.
pub struct EngineBuilder {
    config: EngineConfig,
    catalog: SpawnCatalog,
    clock: Option<Box<dyn Clock>>,
    input: Option<Box<dyn InputDevice>>,
    renderer: Option<Box<dyn RenderBackend>>,
}

impl EngineBuilder {
    fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            catalog: SpawnCatalog::new(),
            clock: None,
            input: None,
            renderer: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a spawnable type
    pub fn register<F, B>(mut self, tag: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> B + 'static,
        B: Behaviour,
    {
        self.catalog.register(tag, constructor);
        self
    }

    /// Register a [`Default`]-constructible spawnable type
    pub fn register_default<B: Behaviour + Default>(mut self, tag: impl Into<String>) -> Self {
        self.catalog.register_default::<B>(tag);
        self
    }

    /// Use `clock` instead of a wall-clock [`Stopwatch`]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Poll `device` instead of an idle [`ScriptedInput`]
    pub fn with_input(mut self, device: impl InputDevice + 'static) -> Self {
        self.input = Some(Box::new(device));
        self
    }

    /// Hand frames to `renderer` instead of a [`HeadlessRenderer`]
    pub fn with_renderer(mut self, renderer: impl RenderBackend + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Build the engine
    ///
    /// # Errors
    ///
    /// [`EngineError::Config`] if the configuration is invalid.
    pub fn build(self) -> Result<Engine, EngineError> {
        self.config.validate()?;
        log::info!(
            "Building engine `{}` with {} spawnable types",
            self.config.title,
            self.catalog.len()
        );

        let debug = DebugInfo::new(self.config.show_debug, self.config.frame_time_samples);
        let renderer = self
            .renderer
            .unwrap_or_else(|| Box::new(HeadlessRenderer::new()));
        Ok(Engine {
            context: EngineContext::new(ObjectManager::new(self.catalog), renderer, debug),
            clock: self.clock.unwrap_or_else(|| Box::new(Stopwatch::new())),
            device: self
                .input
                .unwrap_or_else(|| Box::new(ScriptedInput::new())),
            config: self.config,
        })
    }
}

/// Main engine struct
pub struct Engine {
    config: EngineConfig,
    context: EngineContext,
    clock: Box<dyn Clock>,
    device: Box<dyn InputDevice>,
}

impl Engine {
    /// Start building an engine
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Start the engine, or resume it after [`stop`](Self::stop).
    ///
    /// The first start zeroes the clock; a resume keeps elapsed time.
    pub fn start(&mut self) {
        match self.context.time.state() {
            TimeState::Uninitialized => {
                self.clock.start();
                self.context.time.reset();
                log::info!("Engine started");
            }
            TimeState::Paused => {
                self.clock.start();
                self.context.time.set_state(TimeState::Running);
                log::info!("Engine resumed at {:.3}s", self.context.time.elapsed_seconds());
            }
            TimeState::Running => {}
        }
    }

    /// Pause the engine. Takes effect between frames.
    pub fn stop(&mut self) {
        if self.context.time.state() == TimeState::Running {
            self.clock.stop();
            self.context.time.set_state(TimeState::Paused);
            log::info!("Engine stopped at {:.3}s", self.context.time.elapsed_seconds());
        }
    }

    /// Whether [`tick`](Self::tick) will run a frame
    pub fn is_running(&self) -> bool {
        self.context.time.state() == TimeState::Running
    }

    /// Whether a behaviour asked the engine to quit
    pub fn should_quit(&self) -> bool {
        self.context.should_quit
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.context
    }

    /// Game objects
    pub fn objects(&self) -> &ObjectManager {
        &self.context.objects
    }

    /// Game objects, for spawning outside of hooks
    pub fn objects_mut(&mut self) -> &mut ObjectManager {
        &mut self.context.objects
    }

    pub(crate) fn set_input_device(&mut self, device: impl InputDevice + 'static) {
        self.device = Box::new(device);
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        self.context.renderer.resize(width, height);
    }

    /// Run one frame.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotRunning`] while stopped. Under
    /// [`HookErrorPolicy::Halt`], [`EngineError::Hooks`] after the first phase
    /// with a failing hook; the engine is stopped in that case.
    pub fn tick(&mut self) -> Result<FrameReport, EngineError> {
        if !self.is_running() {
            return Err(EngineError::NotRunning);
        }

        let mut failures = Vec::new();
        self.context.time.update(self.clock.elapsed());
        self.context.debug.clear_lines();
        self.context.input.poll(self.device.as_mut());

        let awake = self.context.objects.awake_pending();
        self.dispatch(Phase::Awake, &awake, &mut failures)?;

        let start = self.context.objects.start_pending();
        self.dispatch(Phase::Start, &start, &mut failures)?;

        let fixed_steps = self.context.time.advance_fixed(
            self.config.fixed_step(),
            self.config.fixed_step_mode,
            self.config.max_fixed_steps,
        );
        for _ in 0..fixed_steps {
            let snapshot = self.context.objects.snapshot();
            self.dispatch(Phase::FixedUpdate, &snapshot, &mut failures)?;
            self.physics_update();
        }

        self.context.time.update_delta();
        let snapshot = self.context.objects.snapshot();
        self.dispatch(Phase::Update, &snapshot, &mut failures)?;

        if let Some(key) = self.config.debug_toggle_key
            && self.context.input.is_key_down(key)
        {
            self.context.debug.toggle();
        }

        self.propagate_parents()?;
        self.collect_draws()?;
        let draw_calls = self.present();

        Ok(FrameReport {
            frame: self.context.time.frame_count(),
            fixed_steps,
            draw_calls,
            hook_failures: failures,
        })
    }

    /// Call `phase` on `handles`, then reap destroyed objects.
    ///
    /// Each object is re-checked right before its hook runs, so destroys and
    /// enable toggles made earlier in the phase are respected. Objects spawned
    /// after this frame's Start phase wait for the next frame.
    fn dispatch(
        &mut self,
        phase: Phase,
        handles: &[ObjectHandle],
        failures: &mut Vec<HookFailure>,
    ) -> Result<(), EngineError> {
        let mut phase_failures = Vec::new();
        for &handle in handles {
            let objects = &mut self.context.objects;
            let due = match phase {
                Phase::Awake | Phase::Start => objects.contains(handle),
                _ => objects.is_active(handle) && objects.is_started(handle),
            };
            if !due {
                continue;
            }
            match phase {
                Phase::Awake => objects.mark_awoken(handle),
                Phase::Start => objects.mark_started(handle),
                _ => {}
            }
            if let Some(failure) = self.call_hook(phase, handle) {
                phase_failures.push(failure);
            }
        }

        self.reap(&mut phase_failures);
        self.settle(phase_failures, failures)
    }

    /// Run `on_destroy` for every marked object and release it
    fn reap(&mut self, failures: &mut Vec<HookFailure>) {
        loop {
            let doomed = self.context.objects.take_doomed();
            if doomed.is_empty() {
                break;
            }
            for handle in doomed {
                if let Some(failure) = self.call_hook(Phase::Destroy, handle) {
                    failures.push(failure);
                }
                self.context.objects.release(handle);
            }
        }
    }

    /// Apply the hook error policy to one phase's failures
    fn settle(
        &mut self,
        phase_failures: Vec<HookFailure>,
        failures: &mut Vec<HookFailure>,
    ) -> Result<(), EngineError> {
        match self.config.hook_error_policy {
            HookErrorPolicy::LogAndContinue => {
                failures.extend(phase_failures);
                Ok(())
            }
            HookErrorPolicy::Halt => match HookFailures::new(phase_failures) {
                Some(halted) => {
                    self.stop();
                    Err(halted.into())
                }
                None => Ok(()),
            },
        }
    }

    fn call_hook(&mut self, phase: Phase, handle: ObjectHandle) -> Option<HookFailure> {
        let ctx = &mut self.context;
        let mut behaviour = ctx.objects.take_behaviour(handle)?;
        let result = match phase {
            Phase::Awake => behaviour.awake(ctx, handle),
            Phase::Start => behaviour.start(ctx, handle),
            Phase::FixedUpdate => behaviour.fixed_update(ctx, handle),
            Phase::Update => behaviour.update(ctx, handle),
            Phase::Destroy => behaviour.on_destroy(ctx, handle),
            Phase::PhysicsUpdate | Phase::Draw => Ok(()),
        };
        if phase != Phase::Destroy {
            ctx.objects.restore_behaviour(handle, behaviour);
        }

        let source = result.err()?;
        // the object may be gone from the world; never lose the error over it
        let (id, name) = ctx
            .objects
            .world()
            .get::<GameObject>(handle)
            .map(|object| (object.id(), object.name.clone()))
            .unwrap_or_else(|_| (ObjectId::UNKNOWN, String::from("<missing>")));
        let failure = HookFailure {
            phase,
            id,
            name,
            source,
        };
        log::error!("{failure}");
        Some(failure)
    }

    /// Integrate every active rigidbody by one fixed step
    fn physics_update(&mut self) {
        let dt = self.context.time.fixed_delta_seconds();
        let objects = &mut self.context.objects;
        for handle in objects.snapshot() {
            if !objects.is_active(handle) || !objects.is_started(handle) {
                continue;
            }
            if let Some((body, transform)) = objects.world_mut().body_and_transform_mut(handle) {
                physics::integrate(body, transform, dt);
            }
        }
    }

    /// Resolve world positions and rotations of parented objects
    fn propagate_parents(&mut self) -> Result<(), EngineError> {
        let objects = &mut self.context.objects;
        for handle in objects.snapshot() {
            let parented = objects
                .world()
                .get::<Transform>(handle)
                .is_ok_and(|transform| transform.parent().is_some());
            if !parented {
                continue;
            }
            let pose = objects.world_pose(handle)?;
            let transform = objects.transform_mut(handle)?;
            transform.position = pose.position;
            transform.rotation = pose.rotation;
        }
        Ok(())
    }

    /// Queue a draw request for every visible object
    fn collect_draws(&mut self) -> Result<(), EngineError> {
        let ctx = &mut self.context;
        for handle in ctx.objects.iter() {
            if !ctx.objects.is_active(handle) {
                continue;
            }
            let renderer = *ctx.objects.renderer(handle)?;
            let Some(sprite) = renderer.sprite.filter(|_| renderer.enabled) else {
                continue;
            };
            let pose = ctx.objects.world_pose(handle)?;
            ctx.draw_list.push(DrawRequest {
                sprite,
                position: pose.position,
                rotation: pose.rotation,
                scale: pose.scale,
                tint: renderer.tint,
                depth: renderer.draw_depth,
            });
        }
        Ok(())
    }

    /// Hand the draw list to the renderer and clear it
    fn present(&mut self) -> usize {
        let ctx = &mut self.context;
        ctx.debug.record_frame(ctx.time.delta());
        let overlay = ctx.debug.overlay(ctx.objects.len());

        let draw_calls = ctx.draw_list.len();
        for request in ctx.draw_list.drain(..) {
            ctx.renderer.submit(request);
        }
        ctx.renderer.present(overlay.as_ref());
        draw_calls
    }
}
