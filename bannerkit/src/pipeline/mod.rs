//! Pipeline orchestrator: WAD → meta archive → banner/icon resource sets.
//!
//! This module owns exactly the parts of the spec that don't belong to a
//! single asset decoder: scoring which `.app` content holds the banner
//! resources (§4.11), extracting the banner/icon sub-archive from it, and
//! classifying each `.brlan` file's role and render state from its filename.

pub mod anim_role;
pub mod layout_builder;
pub mod resources;
pub mod scoring;
pub mod target;

use bannerkit_syntax::diagnostics::Logger;
use bannerkit_syntax::error::BannerError;
use bannerkit_syntax::brlyt::DefaultCanvas;
use bannerkit_syntax::u8archive::U8Archive;
use bannerkit_syntax::wad::{ContentRecord, WadFrame};

pub use resources::{ResourceOptions, ResourceSet};
pub use target::Target;

/// Options threaded through the whole WAD → resource-set pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub resources: ResourceOptions,
}

/// The result of loading one WAD: up to two resource sets (a WAD missing a
/// banner or icon payload simply has that field as `None`), plus which TMD
/// content index the meta archive was found in, for diagnostics.
#[derive(Debug, Clone)]
pub struct LoadedWad {
    pub banner: Option<ResourceSet>,
    pub icon: Option<ResourceSet>,
    pub meta_content_index: u16,
}

/// Load and fully decode a WAD's banner and icon resources.
///
/// Per §7's propagation policy, this is the only call in the whole crate
/// allowed to abort outright (on a malformed top-level WAD header, or when no
/// content scores above zero during meta-archive selection); every decode
/// failure below that level is logged and the affected resource is skipped.
pub fn load(data: &[u8], logger: &dyn Logger) -> Result<LoadedWad, BannerError> {
    load_with_options(data, PipelineOptions::default(), logger)
}

/// Like [`load`], with explicit [`PipelineOptions`].
pub fn load_with_options(
    data: &[u8],
    options: PipelineOptions,
    logger: &dyn Logger,
) -> Result<LoadedWad, BannerError> {
    let (frame, contents_by_name) = WadFrame::parse(data)?;

    // §7: try to find a meta archive without decryption first (some WADs carry
    // plaintext content, and skipping AES entirely avoids a wrong-common-key
    // failure where one isn't needed).
    let mut candidates: Vec<(ContentRecord, U8Archive)> = Vec::new();
    for record in &frame.contents {
        let Some(ciphertext) = contents_by_name.get(&record.filename()) else {
            continue;
        };
        if let Ok(archive) = U8Archive::parse(ciphertext, logger) {
            candidates.push((record.clone(), archive));
        }
    }

    if candidates.is_empty() {
        logger.info("no content parsed as a U8 archive without decryption, trying AES unwrap");
        for record in &frame.contents {
            let Some(ciphertext) = contents_by_name.get(&record.filename()) else {
                continue;
            };
            let Some(plaintext) = frame.decrypt_content(record, ciphertext, logger) else {
                continue;
            };
            if let Ok(archive) = U8Archive::parse(&plaintext, logger) {
                candidates.push((record.clone(), archive));
            }
        }
    }

    let (record, meta) = pick_best_candidate(candidates)
        .ok_or_else(|| BannerError::no_renderable("no content scored above zero"))?;

    logger.success(&format!(
        "selected content id {:#010x} (index {}) as the meta archive",
        record.id, record.index
    ));

    let banner = target::extract(&meta, Target::Banner, logger).and_then(|archive| {
        resources::build_resource_set(&archive, DefaultCanvas::Banner, options.resources, logger)
    });
    let icon = target::extract(&meta, Target::Icon, logger).and_then(|archive| {
        resources::build_resource_set(&archive, DefaultCanvas::Icon, options.resources, logger)
    });

    if banner.is_none() && icon.is_none() {
        logger.warn("meta archive selected but neither a banner nor an icon resource set decoded");
    }

    Ok(LoadedWad {
        banner,
        icon,
        meta_content_index: record.index,
    })
}

/// Score every candidate and keep the highest; at equal scores, prefer the
/// content at TMD index 0 when it already contains a banner payload, per
/// §4.11's tie-breaker. Only candidates scoring above zero are considered.
fn pick_best_candidate(
    candidates: Vec<(ContentRecord, U8Archive)>,
) -> Option<(ContentRecord, U8Archive)> {
    let mut best: Option<(ContentRecord, U8Archive, i32)> = None;

    for (record, archive) in candidates {
        let score = scoring::score_archive(&archive);
        if score <= 0 {
            continue;
        }

        let replace = match &best {
            None => true,
            Some((_, _, best_score)) => {
                score > *best_score
                    || (score == *best_score
                        && record.index == 0
                        && scoring::has_banner_payload(&archive))
            }
        };

        if replace {
            best = Some((record, archive, score));
        }
    }

    best.map(|(record, archive, _)| (record, archive))
}
