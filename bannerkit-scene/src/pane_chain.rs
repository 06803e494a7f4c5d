//! Pane-chain resolver: for every pane, the ordered list of ancestor indices
//! from the root down to the pane itself, computed once per layout.

use bannerkit_syntax::Logger;
use bannerkit_syntax::brlyt::pane::Pane;
use smallvec::SmallVec;

/// A pane chain rarely nests more than a handful of panes deep, so this stays
/// on the stack for the overwhelming majority of layouts.
pub type Chain = SmallVec<[usize; 8]>;

/// Walk every pane's `parent` link back to the root, detecting cycles.
///
/// Returns one chain per pane, in `[root, ..., self]` order, indexed the same
/// way as the input slice. A pane caught in a cycle (which should never occur in
/// well-formed input, since `parent` only ever names an earlier-declared pane)
/// resolves to a single-element chain containing just itself, and is logged.
pub fn resolve_chains(panes: &[Pane], logger: &dyn Logger) -> Vec<Chain> {
    let mut chains = Vec::with_capacity(panes.len());

    for i in 0..panes.len() {
        chains.push(resolve_one(panes, i, logger));
    }

    chains
}

fn resolve_one(panes: &[Pane], index: usize, logger: &dyn Logger) -> Chain {
    let mut chain: Chain = smallvec::smallvec![index];
    let mut visited = vec![false; panes.len()];
    visited[index] = true;

    let mut current = index;
    while let Some(parent) = panes[current].header().parent {
        if parent >= panes.len() || visited[parent] {
            logger.error(&format!(
                "pane {:?} has a cyclic or out-of-range parent chain, truncating",
                panes[index].name()
            ));
            break;
        }
        chain.push(parent);
        visited[parent] = true;
        current = parent;
    }

    chain.reverse();
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use bannerkit_syntax::diagnostics::NullLogger;
    use bannerkit_syntax::brlyt::pane::{Origin, PaneHeader, Transform};

    fn pane(name: &str, parent: Option<usize>) -> Pane {
        Pane::Pan(PaneHeader {
            name: name.to_string(),
            visible: true,
            origin: Origin::Center,
            alpha: 255,
            parent,
            transform: Transform::default(),
        })
    }

    #[test]
    fn chain_is_root_to_self_order() {
        let panes = vec![pane("root", None), pane("mid", Some(0)), pane("leaf", Some(1))];
        let chains = resolve_chains(&panes, &NullLogger);
        assert_eq!(chains[2].as_slice(), [0, 1, 2]);
        assert_eq!(chains[0].as_slice(), [0]);
    }

    #[test]
    fn cycle_is_truncated_not_infinite() {
        // Malformed on purpose: 0 -> 1 -> 0.
        let panes = vec![pane("a", Some(1)), pane("b", Some(0))];
        let chains = resolve_chains(&panes, &NullLogger);
        assert!(chains[0].len() <= 2);
        assert!(chains[1].len() <= 2);
    }

    #[test]
    fn chain_never_contains_duplicates() {
        let panes = vec![pane("root", None), pane("mid", Some(0)), pane("leaf", Some(1))];
        let chains = resolve_chains(&panes, &NullLogger);
        for chain in &chains {
            let mut seen = chain.clone();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), chain.len());
        }
    }
}
