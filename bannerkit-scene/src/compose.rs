//! Transform composition: each chain entry's `T·R·S`, the pane's own anchor
//! offset, and the outer→inner product that yields the final draw matrix.

use bannerkit_syntax::brlyt::pane::{Origin, Transform};
use kurbo::{Affine, Vec2};

/// One chain entry's resolved (possibly animation-overridden) local state.
#[derive(Debug, Clone, Copy)]
pub struct LocalState {
    pub transform: Transform,
    pub origin: Origin,
    /// Normalized `[0,1]` alpha, not the raw `0..255` byte.
    pub alpha: f32,
    pub visible: bool,
}

/// `T(tx, -ty) · R_z(rot) · S(sx, sy) · T(-anchor)`, where `anchor` is the
/// pane's own origin offset scaled by half its own size. Y is negated because
/// the layout coordinate system is y-up.
pub fn local_matrix(local: &LocalState) -> Affine {
    let t = &local.transform;
    let (col, row) = local.origin.col_row();
    let anchor = Vec2::new(
        col as f64 * t.size[0] as f64 / 2.0,
        row as f64 * t.size[1] as f64 / 2.0,
    );

    Affine::translate((t.translate[0] as f64, -(t.translate[1] as f64)))
        * Affine::rotate((t.rotate[2] as f64).to_radians())
        * Affine::scale_non_uniform(t.scale[0] as f64, t.scale[1] as f64)
        * Affine::translate(-anchor)
}

/// Compose a chain's local matrices outer→inner (root first) into one matrix.
pub fn chain_matrix(locals: &[LocalState]) -> Affine {
    locals
        .iter()
        .map(local_matrix)
        .fold(Affine::IDENTITY, |acc, m| acc * m)
}

/// Effective alpha is the product of every chain entry's normalized alpha.
pub fn chain_alpha(locals: &[LocalState]) -> f32 {
    locals.iter().map(|l| l.alpha).product()
}

/// Effective visibility is `false` if any chain entry (including the pane
/// itself) resolves to invisible.
pub fn chain_visible(locals: &[LocalState]) -> bool {
    locals.iter().all(|l| l.visible)
}
