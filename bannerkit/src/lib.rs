//! Pipeline orchestrator: turns a raw WAD byte buffer into one or two fully
//! decoded resource sets (banner, icon), each ready to hand to a
//! `bannerkit_scene::Engine`.
//!
//! This crate sits above `bannerkit-syntax` (container/decryption + asset
//! decoders) and below `bannerkit-scene` (the per-frame evaluator): it owns the
//! parts of the spec that neither of those crates is responsible for —
//! meta-archive scoring, banner/icon target extraction, and animation
//! role/render-state inference from filenames.

#![forbid(unsafe_code)]

pub mod pipeline;

pub use pipeline::{LoadedWad, PipelineOptions, ResourceSet, Target, load};
