//! Target extraction: given the selected meta archive, recover the banner or
//! icon resource sub-archive.

use bannerkit_syntax::diagnostics::Logger;
use bannerkit_syntax::u8archive::U8Archive;

/// Which of the two renderable surfaces to extract from a meta archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Banner,
    Icon,
}

impl Target {
    fn sub_archive_name(self) -> &'static str {
        match self {
            Target::Banner => "banner.bin",
            Target::Icon => "icon.bin",
        }
    }
}

/// Region preference order for `screenall/<region>/layout00.szs` fallback.
const REGION_PREFERENCE: [&str; 4] = ["cmn", "usa", "eng", "jpn"];

/// Extract the sub-archive for `target` from a decoded meta archive.
///
/// Preference order: a `banner.bin`/`icon.bin` sub-archive (itself a nested,
/// possibly-compressed U8 archive); then `screenall/<region>/layout00.szs` in
/// region-preference order; then the largest remaining candidate file that
/// isn't under a `sofkeybd` or `homebutton` path. Returns `None` only if
/// nothing at all is a plausible candidate.
pub fn extract(meta: &U8Archive, target: Target, logger: &dyn Logger) -> Option<U8Archive> {
    let name = target.sub_archive_name();
    if let Some(bytes) = find_path_by_basename(meta, name) {
        match U8Archive::parse(bytes, logger) {
            Ok(archive) => {
                logger.success(&format!("extracted {name} as the {target:?} target"));
                return Some(archive);
            }
            Err(e) => logger.warn(&format!("{name} did not parse as a U8 archive: {e}")),
        }
    }

    for region in REGION_PREFERENCE {
        let suffix = format!("screenall/{region}/layout00.szs");
        if let Some(path) = meta.paths().find(|p| p.ends_with(&suffix)) {
            let path = path.to_string();
            let bytes = meta.get(&path)?;
            match U8Archive::parse(bytes, logger) {
                Ok(archive) => {
                    logger.success(&format!("extracted {path} as the {target:?} target"));
                    return Some(archive);
                }
                Err(e) => logger.warn(&format!("{path} did not parse as a U8 archive: {e}")),
            }
        }
    }

    let fallback = meta
        .paths()
        .filter(|p| !p.contains("sofkeybd") && !p.contains("homebutton"))
        .filter_map(|p| meta.get(p).map(|bytes| (p, bytes.len())))
        .max_by_key(|(_, len)| *len)
        .map(|(p, _)| p.to_string())?;

    let bytes = meta.get(&fallback)?;
    match U8Archive::parse(bytes, logger) {
        Ok(archive) => {
            logger.warn(&format!(
                "no {name} or screenall layout found, falling back to largest candidate {fallback}"
            ));
            Some(archive)
        }
        Err(e) => {
            logger.warn(&format!("fallback candidate {fallback} did not parse: {e}"));
            None
        }
    }
}

fn find_path_by_basename<'a>(archive: &'a U8Archive, basename: &str) -> Option<&'a [u8]> {
    let path = archive
        .paths()
        .find(|p| p.rsplit('/').next().unwrap_or(p) == basename)?;
    archive.get(path)
}
