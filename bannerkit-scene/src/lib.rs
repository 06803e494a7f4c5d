//! Per-frame scene evaluator for decoded Wii banner/icon layouts.
//!
//! This crate is a pure, synchronous function from `(layout, animations,
//! options, frame)` to a flat draw list: pane-chain resolution, keyframe
//! sampling, the start/loop/hold phase machine, render-state and locale
//! filtering, and transform/alpha composition. It does no I/O, owns no thread
//! or timer, and never touches `bannerkit-syntax`'s parsing concerns directly
//! — see [`Engine`] for the entry point.

#![forbid(unsafe_code)]

pub mod animation;
pub mod compose;
pub mod engine;
pub mod locale;
pub mod options;
pub mod output;
pub mod pane_chain;
pub mod phase;
pub mod sampler;

pub use animation::{AnimRole, AnimationEntry};
pub use engine::Engine;
pub use options::{Locale, PlaybackMode, RenderState, SceneOptions, TitleLocale};
pub use output::{DrawItem, PaneRef, ResolvedPaneState, SceneFrame};
pub use phase::Phase;
