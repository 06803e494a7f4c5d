//! Build a fully-decoded [`ResourceSet`] (layout, animations, textures, fonts,
//! optional audio) from one extracted banner/icon sub-archive.

use bannerkit_scene::AnimationEntry;
use bannerkit_syntax::bns::{AudioTrack, decode_bns};
use bannerkit_syntax::brfnt::{Font, decode_brfnt};
use bannerkit_syntax::brlan::{BrlanOptions, decode_brlan};
use bannerkit_syntax::brlyt::{DefaultCanvas, Layout, decode_brlyt};
use bannerkit_syntax::diagnostics::Logger;
use bannerkit_syntax::tpl::{TplImage, decode_tpl};
use bannerkit_syntax::u8archive::U8Archive;
use rustc_hash::FxHashMap;

use super::anim_role::{infer_render_state, infer_role};
use super::layout_builder::synthetic_layout;

/// Everything the scene engine and a rasterizer need for one target (banner or
/// icon): the layout, its classified animation entries, and the decoded assets
/// it references by name.
#[derive(Debug, Clone)]
pub struct ResourceSet {
    pub layout: Layout,
    pub animations: Vec<AnimationEntry>,
    /// Keyed by archive path (as it appears in the layout's `txl1` name table).
    pub textures: FxHashMap<String, Vec<TplImage>>,
    pub fonts: FxHashMap<String, Font>,
    pub audio: Option<AudioTrack>,
}

/// Per-resource-set caps and feature toggles, named in §4.11/§5's "max 200
/// textures per resource set" cancellation backstop and §9's isolation of the
/// BRLAN negative-frame normalization.
#[derive(Debug, Clone, Copy)]
pub struct ResourceOptions {
    pub max_textures: usize,
    pub brlan: BrlanOptions,
}

impl Default for ResourceOptions {
    fn default() -> Self {
        Self {
            max_textures: 200,
            brlan: BrlanOptions::default(),
        }
    }
}

/// Build a resource set from an already-extracted sub-archive.
pub fn build_resource_set(
    archive: &U8Archive,
    default_canvas: DefaultCanvas,
    options: ResourceOptions,
    logger: &dyn Logger,
) -> Option<ResourceSet> {
    let layout = match archive.paths().find(|p| p.ends_with(".brlyt")) {
        Some(layout_path) => {
            let layout_path = layout_path.to_string();
            let layout_bytes = archive.get(&layout_path)?;
            match decode_brlyt(layout_bytes, default_canvas, logger) {
                Ok(layout) => layout,
                Err(e) => {
                    logger.error(&format!("{layout_path} failed to decode: {e}"));
                    return None;
                }
            }
        }
        None => {
            logger.warn("no .brlyt found in this resource archive, synthesizing an empty layout");
            synthetic_layout(default_canvas)
        }
    };

    let mut animations = Vec::new();
    let brlan_paths: Vec<String> = archive
        .paths()
        .filter(|p| p.ends_with(".brlan"))
        .map(str::to_string)
        .collect();
    for path in &brlan_paths {
        let Some(bytes) = archive.get(path) else {
            continue;
        };
        match decode_brlan(bytes, options.brlan, logger) {
            Ok(animation) => {
                animations.push(AnimationEntry {
                    role: infer_role(path),
                    render_state: infer_render_state(path),
                    animation,
                });
            }
            Err(e) => logger.warn(&format!("{path} failed to decode: {e}")),
        }
    }

    let mut textures = FxHashMap::default();
    let mut texture_count = 0usize;
    let tpl_paths: Vec<String> = archive
        .paths()
        .filter(|p| p.ends_with(".tpl"))
        .map(str::to_string)
        .collect();
    for path in &tpl_paths {
        if texture_count >= options.max_textures {
            logger.warn(&format!(
                "reached the {}-texture cap, skipping remaining TPL files starting at {path}",
                options.max_textures
            ));
            break;
        }
        let Some(bytes) = archive.get(path) else {
            continue;
        };
        match decode_tpl(bytes, logger) {
            Ok(images) => {
                texture_count += images.len();
                textures.insert(path.clone(), images);
            }
            Err(e) => logger.warn(&format!("{path} failed to decode: {e}")),
        }
    }

    let mut fonts = FxHashMap::default();
    let brfnt_paths: Vec<String> = archive
        .paths()
        .filter(|p| p.ends_with(".brfnt"))
        .map(str::to_string)
        .collect();
    for path in &brfnt_paths {
        let Some(bytes) = archive.get(path) else {
            continue;
        };
        match decode_brfnt(bytes, logger) {
            Ok(font) => {
                fonts.insert(path.clone(), font);
            }
            Err(e) => logger.warn(&format!("{path} failed to decode: {e}")),
        }
    }

    let audio = archive
        .paths()
        .find(|p| p.ends_with(".bns"))
        .and_then(|path| archive.get(path).map(|bytes| (path, bytes)))
        .and_then(|(path, bytes)| match decode_bns(bytes, logger) {
            Ok(track) => Some(track),
            Err(e) => {
                logger.warn(&format!("{path} failed to decode: {e}"));
                None
            }
        });

    Some(ResourceSet {
        layout,
        animations,
        textures,
        fonts,
        audio,
    })
}
