//! Pane hierarchy: a tagged sum over the five section kinds the format supports,
//! sharing one header layout.

/// 3×3 anchor enum used for both a pane's own origin and (via the scene engine)
/// its final screen-space placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Origin {
    /// Decode the raw 0..8 origin byte into the 3×3 enum.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Origin::TopLeft,
            1 => Origin::TopCenter,
            2 => Origin::TopRight,
            3 => Origin::CenterLeft,
            4 => Origin::Center,
            5 => Origin::CenterRight,
            6 => Origin::BottomLeft,
            7 => Origin::BottomCenter,
            _ => Origin::BottomRight,
        }
    }

    /// `(col, row)` each in `{-1, 0, 1}`, matching `col = origin % 3 - 1`,
    /// `row = origin / 3 - 1` after mapping to a linear 0..8 index.
    pub fn col_row(self) -> (i32, i32) {
        let raw = match self {
            Origin::TopLeft => 0,
            Origin::TopCenter => 1,
            Origin::TopRight => 2,
            Origin::CenterLeft => 3,
            Origin::Center => 4,
            Origin::CenterRight => 5,
            Origin::BottomLeft => 6,
            Origin::BottomCenter => 7,
            Origin::BottomRight => 8,
        };
        (raw % 3 - 1, raw / 3 - 1)
    }
}

/// A 2D translate/rotate/scale/size block shared by every pane variant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub translate: [f32; 3],
    pub rotate: [f32; 3],
    pub scale: [f32; 2],
    pub size: [f32; 2],
}

/// Fields common to every pane variant, occupying the shared 68-byte header block.
#[derive(Debug, Clone)]
pub struct PaneHeader {
    pub name: String,
    pub visible: bool,
    pub origin: Origin,
    pub alpha: u8,
    /// Resolved during layout construction (see [`super::Layout::resolve_parents`]);
    /// `None` for a root pane.
    pub parent: Option<usize>,
    pub transform: Transform,
}

/// One of the four vertex corners of a `pic1` pane, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// A single `(s, t)` texture-coordinate pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TexCoord {
    pub s: f32,
    pub t: f32,
}

/// `pic1`-specific trailer fields.
#[derive(Debug, Clone)]
pub struct PicData {
    /// TL, TR, BL, BR, in that order.
    pub vertex_colors: [[u8; 4]; 4],
    pub material_index: i16,
    /// One `(tl, tr, bl, br)` quad per texture map.
    pub tex_coords: Vec<[TexCoord; 4]>,
}

/// `txt1`-specific trailer fields.
#[derive(Debug, Clone)]
pub struct TxtData {
    pub text_buffer_bytes: u16,
    pub material_index: i16,
    pub font_index: i16,
    pub position_flags: u8,
    pub alignment: u8,
    pub top_color: [u8; 4],
    pub bottom_color: [u8; 4],
    pub font_size: [f32; 2],
    pub char_spacing: f32,
    pub line_spacing: f32,
    pub text: String,
}

/// A tagged pane: shared header plus subtype-specific trailer fields. `Bnd` is a
/// pure grouping pane (bounding box) and `Wnd` a nine-slice window pane; neither
/// carries extra renderable data beyond the shared header.
#[derive(Debug, Clone)]
pub enum Pane {
    Pan(PaneHeader),
    Pic(PaneHeader, PicData),
    Txt(PaneHeader, TxtData),
    Bnd(PaneHeader),
    Wnd(PaneHeader),
}

impl Pane {
    pub fn header(&self) -> &PaneHeader {
        match self {
            Pane::Pan(h) | Pane::Bnd(h) | Pane::Wnd(h) => h,
            Pane::Pic(h, _) => h,
            Pane::Txt(h, _) => h,
        }
    }

    pub fn header_mut(&mut self) -> &mut PaneHeader {
        match self {
            Pane::Pan(h) | Pane::Bnd(h) | Pane::Wnd(h) => h,
            Pane::Pic(h, _) => h,
            Pane::Txt(h, _) => h,
        }
    }

    pub fn name(&self) -> &str {
        &self.header().name
    }
}
