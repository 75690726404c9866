//! Core engine module
//!
//! Contains the Engine struct, the frame scheduler, time and configuration

mod app;
mod config;
mod debug;
mod engine;
mod error;
mod phase;
mod time;

pub use config::{ConfigError, EngineConfig, FixedStepMode, HookErrorPolicy};
pub use debug::{DebugInfo, FrameStats};
pub use engine::{Engine, EngineBuilder, EngineContext, FrameReport};
pub use error::{EngineError, HookError, HookFailure, HookFailures, HookResult};
pub use phase::Phase;
pub use time::{Clock, ManualClock, Stopwatch, Time, TimeState};
