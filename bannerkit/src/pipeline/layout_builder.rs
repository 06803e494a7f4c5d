//! Renderable-layout builder: the synthetic layout fallback used when a
//! resource archive carries no `.brlyt` at all (some icon-only WADs ship just
//! a TPL and no layout), and the named deep-clone entry point the engine's
//! single-owner lifetime rule (§3 "Lifetimes") relies on.

use bannerkit_syntax::brlyt::{DefaultCanvas, Layout};

/// An empty layout sized to the target's default canvas, used when no
/// `.brlyt` file is present in the extracted sub-archive. A pipeline caller
/// gets a valid (if pane-less) [`Layout`] back instead of `None`, so a
/// texture-only icon WAD still produces a resource set the engine can sample.
pub fn synthetic_layout(default_canvas: DefaultCanvas) -> Layout {
    let (width, height) = match default_canvas {
        DefaultCanvas::Banner => (608.0, 456.0),
        DefaultCanvas::Icon => (128.0, 128.0),
    };

    Layout {
        width,
        height,
        textures: Vec::new(),
        fonts: Vec::new(),
        materials: Vec::new(),
        groups: Vec::new(),
        panes: Vec::new(),
    }
}

/// Deep-clone a parsed layout before handing it to an [`bannerkit_scene::Engine`],
/// so the engine's runtime-only bookkeeping never mutates the archive's parsed
/// copy (§3's "parsed entities are immutable after construction" invariant).
/// A caller that needs several engines over the same resource set (e.g. one
/// per render-state selection) clones from the same source each time rather
/// than re-parsing the archive.
pub fn deep_clone_for_mutation(layout: &Layout) -> Layout {
    layout.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_layout_uses_the_default_canvas_size() {
        let banner = synthetic_layout(DefaultCanvas::Banner);
        assert_eq!((banner.width, banner.height), (608.0, 456.0));
        assert!(banner.panes.is_empty());

        let icon = synthetic_layout(DefaultCanvas::Icon);
        assert_eq!((icon.width, icon.height), (128.0, 128.0));
    }

    #[test]
    fn deep_clone_is_independent_of_the_source() {
        let original = synthetic_layout(DefaultCanvas::Icon);
        let mut cloned = deep_clone_for_mutation(&original);
        cloned.width = 999.0;
        assert_eq!(original.width, 128.0);
        assert_eq!(cloned.width, 999.0);
    }
}
