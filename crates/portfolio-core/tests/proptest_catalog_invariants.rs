//! Property-based invariant tests for the project catalog.
//!
//! Verifies:
//! 1. The visible set after any filter/search sequence equals the cards
//!    satisfying the matching rule, and the count equals its size.
//! 2. Clearing the search restores the pure category result.
//! 3. Recompute is idempotent.
//! 4. Every CatalogUpdate's shown/hidden sets are exactly the visibility diff.
//! 5. A PendingHide commits iff its card was not re-shown afterwards.
//! 6. RevealAnimator reveals each key at most once.

use portfolio_core::{
    ALL_CATEGORIES, PendingHide, ProjectCard, ProjectCatalog, RevealAnimator, RevealDecision,
};
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

const CATEGORIES: [&str; 4] = ["web", "tool", "game", "Web"];
const WORDS: [&str; 8] = ["Shop", "cli", "Helper", "rust", "ENGINE", "maze", "", "ab"];

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS.to_vec()), 0..4).prop_map(|w| w.join(" "))
}

fn arb_card() -> impl Strategy<Value = ProjectCard> {
    (prop::sample::select(CATEGORIES.to_vec()), arb_text(), arb_text())
        .prop_map(|(cat, title, desc)| ProjectCard::new(cat, title, desc))
}

fn arb_category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(ALL_CATEGORIES.to_string()),
        prop::sample::select(CATEGORIES.to_vec()).prop_map(String::from),
        Just("unknown".to_string()),
    ]
}

fn arb_search() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        prop::sample::select(WORDS.to_vec()).prop_map(String::from),
        "[a-zA-Z ]{0,4}",
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Filter(String),
    Search(String),
    Recompute,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_category().prop_map(Op::Filter),
        arb_search().prop_map(Op::Search),
        Just(Op::Recompute),
    ]
}

fn reference_visible(cards: &[ProjectCard], category: &str, search: &str) -> Vec<usize> {
    let needle = search.to_lowercase();
    cards
        .iter()
        .enumerate()
        .filter(|(_, c)| category == ALL_CATEGORIES || c.category == category)
        .filter(|(_, c)| {
            needle.is_empty()
                || c.title.to_lowercase().contains(&needle)
                || c.description.to_lowercase().contains(&needle)
        })
        .map(|(i, _)| i)
        .collect()
}

proptest! {
    #[test]
    fn visible_set_matches_rule(
        cards in prop::collection::vec(arb_card(), 0..12),
        ops in prop::collection::vec(arb_op(), 0..16),
    ) {
        let mut catalog = ProjectCatalog::new(cards.clone());
        let mut category = ALL_CATEGORIES.to_string();
        let mut search = String::new();

        for op in ops {
            let update = match op {
                Op::Filter(c) => { category = c; catalog.set_filter(&category) }
                Op::Search(s) => { search = s; catalog.set_search(&search) }
                Op::Recompute => catalog.recompute(),
            };
            let expected = reference_visible(&cards, &category, &search);
            prop_assert_eq!(catalog.visible_indices(), expected.clone());
            prop_assert_eq!(update.visible_count, expected.len());
            prop_assert_eq!(catalog.visible_count(), expected.len());
        }
    }

    #[test]
    fn clearing_search_restores_category(
        cards in prop::collection::vec(arb_card(), 0..12),
        category in arb_category(),
        search in arb_search(),
    ) {
        let mut catalog = ProjectCatalog::new(cards.clone());
        catalog.set_filter(&category);
        let category_only = catalog.visible_indices();
        catalog.set_search(&search);
        catalog.set_search("");
        prop_assert_eq!(catalog.visible_indices(), category_only);
    }

    #[test]
    fn recompute_is_idempotent(
        cards in prop::collection::vec(arb_card(), 0..12),
        category in arb_category(),
        search in arb_search(),
    ) {
        let mut catalog = ProjectCatalog::new(cards);
        catalog.set_filter(&category);
        catalog.set_search(&search);
        let before = catalog.visible_indices();
        let update = catalog.recompute();
        prop_assert!(update.is_unchanged());
        prop_assert_eq!(catalog.visible_indices(), before);
    }

    #[test]
    fn update_is_exact_visibility_diff(
        cards in prop::collection::vec(arb_card(), 1..12),
        ops in prop::collection::vec(arb_op(), 1..16),
    ) {
        let mut catalog = ProjectCatalog::new(cards.clone());
        for op in ops {
            let before: Vec<bool> = (0..cards.len()).map(|i| catalog.is_visible(i)).collect();
            let update = match op {
                Op::Filter(c) => catalog.set_filter(&c),
                Op::Search(s) => catalog.set_search(&s),
                Op::Recompute => catalog.recompute(),
            };
            for i in 0..cards.len() {
                let after = catalog.is_visible(i);
                prop_assert_eq!(update.shown.contains(&i), !before[i] && after);
                let hidden = update.hidden.iter().any(|p| p.index == i);
                prop_assert_eq!(hidden, before[i] && !after);
            }
            prop_assert!(update.hidden.iter().all(|p| p.generation == update.generation));
        }
    }

    #[test]
    fn pending_hide_commits_iff_not_reshown(
        cards in prop::collection::vec(arb_card(), 1..10),
        ops in prop::collection::vec(arb_op(), 1..12),
    ) {
        let mut catalog = ProjectCatalog::new(cards.clone());
        let mut reshown_after: Vec<(PendingHide, bool)> = Vec::new();

        for op in ops {
            let update = match op {
                Op::Filter(c) => catalog.set_filter(&c),
                Op::Search(s) => catalog.set_search(&s),
                Op::Recompute => catalog.recompute(),
            };
            for entry in &mut reshown_after {
                if update.shown.contains(&entry.0.index) {
                    entry.1 = true;
                }
            }
            for p in &update.hidden {
                reshown_after.push((*p, false));
            }
        }

        for (p, reshown) in reshown_after {
            prop_assert_eq!(catalog.commit_hide(&p), !reshown);
        }
    }

    #[test]
    fn reveal_at_most_once(reports in prop::collection::vec((0u8..6, any::<bool>()), 0..64)) {
        let mut anim = RevealAnimator::new();
        for key in 0u8..6 {
            anim.observe(key);
        }
        let mut reveals = [0u32; 6];
        for (key, hit) in reports {
            if anim.on_intersection(&key, hit) == RevealDecision::Reveal {
                reveals[key as usize] += 1;
                prop_assert!(hit);
            }
            prop_assert!(!anim.observe(key) || !anim.is_revealed(&key));
        }
        prop_assert!(reveals.iter().all(|n| *n <= 1));
        prop_assert_eq!(anim.pending() + anim.revealed(), 6);
    }
}
