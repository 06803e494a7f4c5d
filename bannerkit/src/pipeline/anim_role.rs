//! Animation role and render-state inference from a `.brlan` file's name.
//!
//! Neither the filename substring convention (`start`/`loop`) nor the
//! `RSO<N>` regex is part of the BRLAN container format itself — both are
//! naming conventions the pipeline orchestrator applies to the archive path,
//! so they live here rather than in `bannerkit-syntax::brlan`.

use bannerkit_scene::AnimRole;
use regex::Regex;
use std::sync::OnceLock;

fn rso_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)(rso\d+)").unwrap())
}

/// `start` → [`AnimRole::Start`], `loop` → [`AnimRole::Loop`], else generic.
pub fn infer_role(path: &str) -> AnimRole {
    let lower = path.to_ascii_lowercase();
    if lower.contains("start") {
        AnimRole::Start
    } else if lower.contains("loop") {
        AnimRole::Loop
    } else {
        AnimRole::Generic
    }
}

/// Extract a `RSO<N>` render-state tag from a path, if present. Matching is
/// case-insensitive but the returned string is normalized to the pattern's
/// original casing in the source name (uppercase `RSO`, as the layout's own
/// group names use).
pub fn infer_render_state(path: &str) -> Option<String> {
    let m = rso_pattern().captures(path)?;
    let raw = m.get(1)?.as_str();
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    Some(format!("RSO{digits}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_start_and_loop_substrings() {
        assert_eq!(infer_role("banner_start.brlan"), AnimRole::Start);
        assert_eq!(infer_role("banner_loop.brlan"), AnimRole::Loop);
        assert_eq!(infer_role("banner_RSO1_loop.brlan"), AnimRole::Loop);
        assert_eq!(infer_role("banner_idle.brlan"), AnimRole::Generic);
    }

    #[test]
    fn extracts_render_state_case_insensitively() {
        assert_eq!(
            infer_render_state("anim/rso1_loop.brlan"),
            Some("RSO1".to_string())
        );
        assert_eq!(
            infer_render_state("anim/RSO12_start.brlan"),
            Some("RSO12".to_string())
        );
        assert_eq!(infer_render_state("anim/generic_loop.brlan"), None);
    }
}
