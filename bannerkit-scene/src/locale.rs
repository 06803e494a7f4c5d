//! Title-locale inference from pane names, and the filtering policy that uses it.

use crate::options::Locale;

/// Try each of the three documented prefix patterns against a pane name and
/// return the locale it encodes, if any.
pub fn locale_from_pane_name(name: &str) -> Option<Locale> {
    let upper = name.to_ascii_uppercase();

    if let Some(rest) = upper.strip_prefix("N_TITLE") {
        let code = rest.split('_').next().unwrap_or("");
        if let Some(locale) = Locale::from_code(code) {
            return Some(locale);
        }
    }
    if let Some(rest) = upper.strip_prefix("TITLE_") {
        let code = rest.split('_').next().unwrap_or("");
        if let Some(locale) = Locale::from_code(code) {
            return Some(locale);
        }
    }
    let code = upper.split('_').next().unwrap_or("");
    if code.len() == 2 {
        if let Some(locale) = Locale::from_code(code) {
            return Some(locale);
        }
    }

    None
}

/// Infer a pane's locale from its chain, deepest-named ancestor wins: walk from
/// `self` back toward the root and take the first pane whose name encodes a locale.
pub fn locale_of_chain(chain: &[usize], names: &[&str]) -> Option<Locale> {
    for &idx in chain.iter().rev() {
        if let Some(locale) = locale_from_pane_name(names[idx]) {
            return Some(locale);
        }
    }
    None
}

/// Whether a pane with the given (possibly absent) locale passes the active
/// filter. Panes without a locale always pass; locale-tagged panes only pass
/// when no filter is active or the filter matches.
pub fn passes_locale_filter(pane_locale: Option<Locale>, selected: Option<Locale>) -> bool {
    match (pane_locale, selected) {
        (None, _) => true,
        (Some(_), None) => true,
        (Some(p), Some(s)) => p == s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_all_three_prefix_patterns() {
        assert_eq!(locale_from_pane_name("N_titleUS_logo"), Some(Locale::Us));
        assert_eq!(locale_from_pane_name("title_JP_bg"), Some(Locale::Jp));
        assert_eq!(locale_from_pane_name("KR_banner"), Some(Locale::Kr));
    }

    #[test]
    fn unrelated_names_have_no_locale() {
        assert_eq!(locale_from_pane_name("root"), None);
        assert_eq!(locale_from_pane_name("pic_00"), None);
    }

    #[test]
    fn deepest_named_ancestor_wins() {
        let names = ["US_root", "generic_child", "child_leaf"];
        // chain is [root, child, leaf]; only root is locale-tagged.
        assert_eq!(locale_of_chain(&[0, 1, 2], &names), Some(Locale::Us));
    }

    #[test]
    fn filter_passes_untagged_panes_regardless() {
        assert!(passes_locale_filter(None, Some(Locale::Jp)));
        assert!(passes_locale_filter(Some(Locale::Jp), None));
        assert!(passes_locale_filter(Some(Locale::Jp), Some(Locale::Jp)));
        assert!(!passes_locale_filter(Some(Locale::Jp), Some(Locale::Us)));
    }
}
