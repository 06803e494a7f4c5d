//! The output model a rasterizer consumes: one draw item per visible pane, plus
//! the authoritative canvas size.

use bannerkit_syntax::brlyt::material::{BlendMode, TextureSrt};
use bannerkit_syntax::brlyt::pane::TexCoord;
use kurbo::Affine;

/// Identifies the pane a draw item came from, for rasterizers that want to
/// correlate back to the source layout (hit-testing, editor selection, etc).
#[derive(Debug, Clone)]
pub struct PaneRef {
    pub index: usize,
    pub name: String,
}

/// Everything a rasterizer needs to draw one pane, fully resolved for the
/// sampled frame: no further animation or inheritance lookups required.
#[derive(Debug, Clone)]
pub struct ResolvedPaneState {
    /// Product of every chain entry's normalized alpha, in `[0, 1]`.
    pub alpha: f32,
    pub blend_mode: Option<BlendMode>,
    /// One `(tl, tr, bl, br)` quad per texture map; empty for non-`pic1` panes.
    pub tex_coords: Vec<[TexCoord; 4]>,
    /// TL, TR, BL, BR vertex colors; `[255; 4]` repeated for non-`pic1` panes.
    pub vertex_colors: [[u8; 4]; 4],
    /// The 8-entry, 32-byte material color register layout (material, color1-3,
    /// kColor0-3), after any `RLMC` overrides for this frame.
    pub material_color_registers: Option<[[u8; 4]; 8]>,
    /// Resolved texture indices into the layout's texture table, after any
    /// `RLTP` texture-pattern override.
    pub active_texture_indices: Vec<u16>,
    /// The material's texture SRTs, after any `RLTS` overrides; empty for
    /// panes with no bound material.
    pub texture_srts: Vec<TextureSrt>,
}

/// One resolved, drawable pane for a single sampled frame.
#[derive(Debug, Clone)]
pub struct DrawItem {
    pub matrix: Affine,
    pub pane: PaneRef,
    pub resolved: ResolvedPaneState,
}

/// A fully-sampled scene frame: the draw list plus the canvas size it was
/// composed against.
#[derive(Debug, Clone)]
pub struct SceneFrame {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub draw_items: Vec<DrawItem>,
}
