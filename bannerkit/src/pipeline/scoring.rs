//! Meta-archive scoring: a WAD can carry several `.app` contents, but only one
//! holds the banner/icon resources. Score each content's U8 file-path table
//! against the predicates in the pipeline orchestrator's scoring heuristic and
//! keep the highest-scoring content.

use bannerkit_syntax::u8archive::U8Archive;

/// Score one content's U8 table. Positive scores indicate a plausible banner
/// archive; zero or negative means "almost certainly not this one".
pub fn score_archive(archive: &U8Archive) -> i32 {
    let paths: Vec<&str> = archive.paths().collect();
    let mut score = 0i32;

    if paths.iter().any(|p| path_basename(p) == "banner.bin") {
        score += 200;
    }
    if paths.iter().any(|p| path_basename(p) == "icon.bin") {
        score += 180;
    }
    if paths.iter().any(|p| p.ends_with(".brlyt")) {
        score += 80;
    }
    if paths.iter().any(|p| p.ends_with(".brlan")) {
        score += 60;
    }
    if paths.iter().any(|p| p.ends_with(".tpl")) {
        score += 40;
    }
    let szs_count = paths.iter().filter(|p| p.ends_with(".szs")).count();
    if szs_count > 0 {
        score += (25 * szs_count as i32).min(300);
    }
    if paths.iter().any(|p| p.contains("channel/screenall")) {
        score += 260;
    }
    if paths.iter().any(|p| p.contains("homebutton")) {
        score -= 120;
    }

    score
}

/// Whether this archive already contains a `banner.bin` payload, used by the
/// content-index-0 tie-breaker.
pub fn has_banner_payload(archive: &U8Archive) -> bool {
    archive.paths().any(|p| path_basename(p) == "banner.bin")
}

fn path_basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
