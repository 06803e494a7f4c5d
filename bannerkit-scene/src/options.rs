//! The single options struct a caller configures the engine with: render-state
//! selection, title locale, pane-state overrides, playback mode, and frame rate.

use rustc_hash::FxHashMap;

/// Which `RSO<N>` render-state group to draw, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RenderState {
    /// Resolve automatically: prefer `RSO0` when present, else the first declared
    /// `RSO<N>` group, else draw every pane.
    #[default]
    Auto,
    /// Draw only the named group's subtree. Must name a group of the form
    /// `RSO<N>`; an unknown name behaves as if no panes in that group exist.
    Explicit(String),
}

/// One of the eight title locale codes the layout's pane-naming convention encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    Jp,
    Ne,
    Ge,
    Sp,
    It,
    Fr,
    Us,
    Kr,
}

impl Locale {
    /// Parse a two-letter code, case-insensitively. Returns `None` outside the
    /// closed set `{JP, NE, GE, SP, IT, FR, US, KR}`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "JP" => Some(Locale::Jp),
            "NE" => Some(Locale::Ne),
            "GE" => Some(Locale::Ge),
            "SP" => Some(Locale::Sp),
            "IT" => Some(Locale::It),
            "FR" => Some(Locale::Fr),
            "US" => Some(Locale::Us),
            "KR" => Some(Locale::Kr),
            _ => None,
        }
    }
}

/// Which title locale to filter panes by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TitleLocale {
    /// Draw every locale-tagged pane (no filtering).
    #[default]
    Auto,
    Explicit(Locale),
}

/// Whether a driving animation wraps back to its start or freezes on its last
/// frame once it reaches the end of its playable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    #[default]
    Loop,
    Hold,
}

/// The options struct threaded through every `Engine` construction.
#[derive(Debug, Clone)]
pub struct SceneOptions {
    pub render_state: RenderState,
    pub title_locale: TitleLocale,
    /// Explicit pane choices within a named group, e.g. selecting one pane out of
    /// a radio-button-style group regardless of render-state selection.
    pub pane_state_overrides: FxHashMap<String, String>,
    pub playback_mode: PlaybackMode,
    pub fps: u16,
}

impl SceneOptions {
    /// `fps: 60`, everything else at its `Default`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SceneOptions {
    /// `fps: 60` (not `u16`'s zero) — a scene has no meaningful frame rate of 0.
    fn default() -> Self {
        Self {
            render_state: RenderState::default(),
            title_locale: TitleLocale::default(),
            pane_state_overrides: FxHashMap::default(),
            playback_mode: PlaybackMode::default(),
            fps: 60,
        }
    }
}
