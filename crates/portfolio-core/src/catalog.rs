#![forbid(unsafe_code)]
//! Project catalog: category filter + case-insensitive substring search.
//!
//! The catalog owns the filter state and the per-card visibility it implies.
//! Every mutation recomputes visibility and returns a [`CatalogUpdate`]
//! describing only the cards that changed, so the host can fade them in or
//! out without touching the rest.
//!
//! # Matching rule
//!
//! A card is visible iff
//! `(category == "all" || card.category == category)` and
//! `(search is empty || lower(title) ∋ search || lower(description) ∋ search)`.
//!
//! # Deferred hides
//!
//! Hiding a card is two-step on the page: a fade-out class now, a hidden
//! class after the transition. Each recompute bumps a generation counter and
//! newly hidden cards carry it in a [`PendingHide`]. When the timer fires the
//! host asks [`ProjectCatalog::commit_hide`], which refuses if the card has
//! been shown again since, so an overtaken timer cannot hide a visible card.


use crate::{debug, trace};

/// Category value that matches every card.
pub const ALL_CATEGORIES: &str = "all";

/// An outbound link attached to a project card.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardLink {
    pub label: String,
    pub url: String,
}

impl CardLink {
    #[must_use]
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// A static project card as read from the page markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectCard {
    pub category: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub links: Vec<CardLink>,
}

impl ProjectCard {
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            title: title.into(),
            description: description.into(),
            tags: Vec::new(),
            links: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_links<I>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = CardLink>,
    {
        self.links = links.into_iter().collect();
        self
    }
}

/// Active category and search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    category: String,
    /// Stored lowercased.
    search: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_owned(),
            search: String::new(),
        }
    }
}

impl FilterState {
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Lowercased search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Apply the matching rule to one card.
    #[must_use]
    pub fn matches(&self, card: &ProjectCard) -> bool {
        self.matches_category(&card.category)
            && self.matches_text(&card.title.to_lowercase(), &card.description.to_lowercase())
    }

    fn matches_category(&self, category: &str) -> bool {
        self.category == ALL_CATEGORIES || self.category == category
    }

    fn matches_text(&self, title_lower: &str, description_lower: &str) -> bool {
        self.search.is_empty()
            || title_lower.contains(&self.search)
            || description_lower.contains(&self.search)
    }
}

/// A hide scheduled for after the fade-out transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingHide {
    pub index: usize,
    pub generation: u64,
}

/// Cards whose visibility changed in one recompute pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogUpdate {
    pub generation: u64,
    /// Indices that became visible, ascending.
    pub shown: Vec<usize>,
    /// Cards that became hidden, ascending by index.
    pub hidden: Vec<PendingHide>,
    pub visible_count: usize,
}

impl CatalogUpdate {
    /// True when no card changed visibility.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.shown.is_empty() && self.hidden.is_empty()
    }
}

#[derive(Debug, Clone)]
struct IndexedCard {
    card: ProjectCard,
    title_lower: String,
    description_lower: String,
}

impl IndexedCard {
    fn new(card: ProjectCard) -> Self {
        Self {
            title_lower: card.title.to_lowercase(),
            description_lower: card.description.to_lowercase(),
            card,
        }
    }
}

/// Filterable set of project cards.
#[derive(Debug, Clone)]
pub struct ProjectCatalog {
    cards: Vec<IndexedCard>,
    filter: FilterState,
    visible: Vec<bool>,
    /// Generation at which each card was last made visible.
    shown_at: Vec<u64>,
    generation: u64,
    visible_count: usize,
}

impl ProjectCatalog {
    /// Build a catalog with the default filter (`"all"`, no search).
    ///
    /// Every card starts visible, which is what the default filter selects.
    #[must_use]
    pub fn new(cards: Vec<ProjectCard>) -> Self {
        let len = cards.len();
        Self {
            cards: cards.into_iter().map(IndexedCard::new).collect(),
            filter: FilterState::default(),
            visible: vec![true; len],
            shown_at: vec![0; len],
            generation: 0,
            visible_count: len,
        }
    }

    /// Set the active category and recompute.
    pub fn set_filter(&mut self, category: &str) -> CatalogUpdate {
        category.clone_into(&mut self.filter.category);
        debug!(category, "catalog filter changed");
        self.recompute()
    }

    /// Set the search text (matched case-insensitively) and recompute.
    pub fn set_search(&mut self, text: &str) -> CatalogUpdate {
        self.filter.search = text.to_lowercase();
        debug!(search = %self.filter.search, "catalog search changed");
        self.recompute()
    }

    /// Re-evaluate every card against the current filter.
    ///
    /// Idempotent: a second call without an intervening filter change returns
    /// an update with no shown or hidden cards.
    pub fn recompute(&mut self) -> CatalogUpdate {
        self.generation += 1;
        let generation = self.generation;
        let mut update = CatalogUpdate {
            generation,
            ..CatalogUpdate::default()
        };

        for (index, entry) in self.cards.iter().enumerate() {
            let now = self.filter.matches_category(&entry.card.category)
                && self
                    .filter
                    .matches_text(&entry.title_lower, &entry.description_lower);
            match (self.visible[index], now) {
                (false, true) => {
                    self.shown_at[index] = generation;
                    update.shown.push(index);
                }
                (true, false) => update.hidden.push(PendingHide { index, generation }),
                _ => {}
            }
            self.visible[index] = now;
        }

        self.visible_count = self.visible.iter().filter(|v| **v).count();
        update.visible_count = self.visible_count;
        trace!(
            generation,
            shown = update.shown.len(),
            hidden = update.hidden.len(),
            visible = update.visible_count,
            "catalog recomputed"
        );
        update
    }

    /// Drop the filter and search, showing every card again.
    ///
    /// Hides scheduled before the reset are stale afterwards.
    pub fn reset(&mut self) -> CatalogUpdate {
        self.filter = FilterState::default();
        debug!("catalog filter reset");
        self.recompute()
    }

    /// Whether a scheduled hide should still be applied.
    ///
    /// False if the card is visible now, or was shown again after the hide
    /// was scheduled (even if a later pass hid it once more; that pass owns
    /// its own [`PendingHide`]).
    #[must_use]
    pub fn commit_hide(&self, pending: &PendingHide) -> bool {
        let Some(&visible) = self.visible.get(pending.index) else {
            return false;
        };
        !visible && self.shown_at[pending.index] <= pending.generation
    }

    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn visible_indices(&self) -> Vec<usize> {
        self.visible
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.then_some(i))
            .collect()
    }

    #[must_use]
    pub const fn visible_count(&self) -> usize {
        self.visible_count
    }

    #[must_use]
    pub const fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub fn card(&self, index: usize) -> Option<&ProjectCard> {
        self.cards.get(index).map(|entry| &entry.card)
    }

    pub fn cards(&self) -> impl Iterator<Item = &ProjectCard> + '_ {
        self.cards.iter().map(|entry| &entry.card)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Single-selection state for the filter button group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButtons {
    categories: Vec<String>,
    active: Option<usize>,
}

impl FilterButtons {
    /// The first button whose category is `"all"` starts active.
    #[must_use]
    pub fn new(categories: Vec<String>) -> Self {
        let active = categories.iter().position(|c| c == ALL_CATEGORIES);
        Self { categories, active }
    }

    /// Build the group from `(button, category attribute)` pairs.
    ///
    /// Buttons with a missing or empty category would match no card, so they
    /// are dropped. Returns the kept buttons in the same order as the group.
    pub fn from_buttons<T>(
        buttons: impl IntoIterator<Item = (T, Option<String>)>,
    ) -> (Self, Vec<T>) {
        let mut kept = Vec::new();
        let mut categories = Vec::new();
        for (button, category) in buttons {
            match category {
                Some(category) if !category.is_empty() => {
                    categories.push(category);
                    kept.push(button);
                }
                _ => debug!(position = kept.len(), "filter button without a category skipped"),
            }
        }
        (Self::new(categories), kept)
    }

    /// Mark the button for `category` active.
    ///
    /// Returns the new active index; `None` when no button carries that
    /// category, in which case no button is highlighted.
    pub fn select(&mut self, category: &str) -> Option<usize> {
        self.active = self.categories.iter().position(|c| c == category);
        self.active
    }

    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn category(&self, index: usize) -> Option<&str> {
        self.categories.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shop_and_cli() -> ProjectCatalog {
        ProjectCatalog::new(vec![
            ProjectCard::new("web", "Shop", "An online storefront"),
            ProjectCard::new("tool", "CLI Helper", "Automates chores"),
        ])
    }

    #[test]
    fn starts_with_everything_visible() {
        let catalog = shop_and_cli();
        assert_eq!(catalog.visible_indices(), vec![0, 1]);
        assert_eq!(catalog.visible_count(), 2);
        assert_eq!(catalog.filter_state(), &FilterState::default());
    }

    #[test]
    fn filter_then_search_then_all() {
        let mut catalog = shop_and_cli();

        let update = catalog.set_filter("web");
        assert_eq!(catalog.visible_indices(), vec![0]);
        assert_eq!(update.visible_count, 1);
        assert_eq!(update.hidden.iter().map(|p| p.index).collect::<Vec<_>>(), vec![1]);

        let update = catalog.set_search("helper");
        assert!(catalog.visible_indices().is_empty());
        assert_eq!(update.visible_count, 0);

        let update = catalog.set_filter("all");
        assert_eq!(catalog.visible_indices(), vec![1]);
        assert_eq!(update.visible_count, 1);
        assert_eq!(update.shown, vec![1]);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let mut catalog = shop_and_cli();
        catalog.set_search("SHOP");
        assert_eq!(catalog.visible_indices(), vec![0]);
        catalog.set_search("chores");
        assert_eq!(catalog.visible_indices(), vec![1]);
        catalog.set_search("o");
        assert_eq!(catalog.visible_indices(), vec![0, 1]);
    }

    #[test]
    fn unknown_category_matches_nothing() {
        let mut catalog = shop_and_cli();
        let update = catalog.set_filter("mobile");
        assert_eq!(update.visible_count, 0);
        assert_eq!(catalog.visible_count(), 0);
    }

    #[test]
    fn category_match_is_exact() {
        let mut catalog = shop_and_cli();
        catalog.set_filter("Web");
        assert_eq!(catalog.visible_count(), 0);
    }

    #[test]
    fn clearing_search_restores_category_result() {
        let mut catalog = shop_and_cli();
        catalog.set_filter("tool");
        catalog.set_search("zzz");
        assert_eq!(catalog.visible_count(), 0);
        catalog.set_search("");
        assert_eq!(catalog.visible_indices(), vec![1]);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut catalog = shop_and_cli();
        catalog.set_filter("web");
        let again = catalog.recompute();
        assert!(again.is_unchanged());
        assert_eq!(again.visible_count, 1);
    }

    #[test]
    fn last_write_wins() {
        let mut catalog = shop_and_cli();
        catalog.set_filter("web");
        catalog.set_filter("tool");
        catalog.set_filter("web");
        assert_eq!(catalog.visible_indices(), vec![0]);
    }

    #[test]
    fn pending_hide_commits_when_not_overtaken() {
        let mut catalog = shop_and_cli();
        let update = catalog.set_filter("web");
        let pending = update.hidden[0];
        catalog.set_search("sho");
        assert!(catalog.commit_hide(&pending));
    }

    #[test]
    fn stale_pending_hide_rejected_after_reshow() {
        let mut catalog = shop_and_cli();
        let stale = catalog.set_filter("web").hidden[0];
        catalog.set_filter("all");
        assert!(!catalog.commit_hide(&stale));

        // Hidden again: only the newer deferral may commit.
        let fresh = catalog.set_filter("web").hidden[0];
        assert!(!catalog.commit_hide(&stale));
        assert!(catalog.commit_hide(&fresh));
    }

    #[test]
    fn pending_hide_out_of_range_is_rejected() {
        let catalog = shop_and_cli();
        assert!(!catalog.commit_hide(&PendingHide {
            index: 9,
            generation: 1
        }));
    }

    #[test]
    fn empty_catalog_is_valid() {
        let mut catalog = ProjectCatalog::new(Vec::new());
        assert!(catalog.is_empty());
        let update = catalog.set_search("anything");
        assert_eq!(update.visible_count, 0);
        assert!(update.is_unchanged());
    }

    #[test]
    fn reset_shows_everything_and_retires_pending_hides() {
        let mut catalog = shop_and_cli();
        let update = catalog.set_filter("web");
        let pending = update.hidden[0];
        assert!(catalog.commit_hide(&pending));

        let update = catalog.reset();
        assert_eq!(update.shown, vec![pending.index]);
        assert!(update.hidden.is_empty());
        assert_eq!(update.visible_count, catalog.len());
        assert_eq!(catalog.filter_state().category(), ALL_CATEGORIES);
        assert_eq!(catalog.filter_state().search(), "");
        assert!(!catalog.commit_hide(&pending));
    }

    #[test]
    fn buttons_without_category_are_dropped() {
        let (buttons, kept) = FilterButtons::from_buttons([
            ("all", Some("all".to_owned())),
            ("blank", Some(String::new())),
            ("missing", None),
            ("web", Some("web".to_owned())),
        ]);
        assert_eq!(kept, vec!["all", "web"]);
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons.active(), Some(0));
        assert_eq!(buttons.category(1), Some("web"));
    }

    #[test]
    fn filter_buttons_single_selection() {
        let mut buttons = FilterButtons::new(vec!["all".into(), "web".into(), "tool".into()]);
        assert_eq!(buttons.active(), Some(0));
        assert_eq!(buttons.select("tool"), Some(2));
        assert_eq!(buttons.category(2), Some("tool"));
        assert_eq!(buttons.select("mobile"), None);
        assert_eq!(buttons.active(), None);
    }

    #[test]
    fn filter_state_matches_full_card() {
        let card = ProjectCard::new("web", "Shop", "Storefront")
            .with_tags(["rust", "wasm"])
            .with_links([CardLink::new("Live", "https://example.com")]);
        let mut catalog = ProjectCatalog::new(vec![card.clone()]);
        catalog.set_search("front");
        assert!(catalog.filter_state().matches(&card));
        assert_eq!(catalog.card(0), Some(&card));
    }
}
