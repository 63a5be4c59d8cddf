#![forbid(unsafe_code)]
//! One-shot reveal tracking for scroll-in animations.
//!
//! An element is observed once, revealed on its first intersecting report,
//! and then retired for good: later reports are ignored and it cannot be
//! observed again.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::hash::Hash;

use crate::config::RevealConfig;
use crate::trace;

/// What the host should do with one intersection report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealDecision {
    /// Apply the revealed class and stop observing the element.
    Reveal,
    Ignore,
}

/// Tracks which elements are waiting to be revealed and which are done.
#[derive(Debug, Clone)]
pub struct RevealAnimator<K> {
    pending: HashSet<K>,
    revealed: HashSet<K>,
}

impl<K> Default for RevealAnimator<K> {
    fn default() -> Self {
        Self {
            pending: HashSet::new(),
            revealed: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> RevealAnimator<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `key`.
    ///
    /// Returns false if it is already watched or was already revealed; the
    /// host should then skip attaching it to the observer.
    pub fn observe(&mut self, key: K) -> bool {
        if self.revealed.contains(&key) {
            return false;
        }
        self.pending.insert(key)
    }

    /// Record `key` as already revealed, e.g. an element that still carries
    /// the revealed class from an earlier mount.
    pub fn mark_revealed(&mut self, key: K) {
        self.pending.remove(&key);
        self.revealed.insert(key);
    }

    pub fn on_intersection(&mut self, key: &K, is_intersecting: bool) -> RevealDecision {
        if is_intersecting && self.pending.remove(key) {
            self.revealed.insert(key.clone());
            trace!(pending = self.pending.len(), "element revealed");
            RevealDecision::Reveal
        } else {
            RevealDecision::Ignore
        }
    }

    #[must_use]
    pub fn is_revealed(&self, key: &K) -> bool {
        self.revealed.contains(key)
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn revealed(&self) -> usize {
        self.revealed.len()
    }
}

/// CSS for the pending/revealed classes plus the sibling stagger delays.
#[must_use]
pub fn animation_stylesheet(config: &RevealConfig) -> String {
    let mut css = String::new();
    let _ = write!(
        css,
        ".{pending} {{ opacity: 0; transform: translateY({offset}px); \
         transition: opacity {d}s ease-out, transform {d}s ease-out; }}\n\
         .{revealed} {{ opacity: 1; transform: translateY(0); }}\n",
        pending = config.pending_class,
        revealed = config.revealed_class,
        offset = config.offset_px,
        d = config.duration_secs,
    );
    for rule in &config.stagger {
        for child in 2..=rule.children {
            let delay = f32::from(child - 1) * rule.step_secs;
            let _ = writeln!(
                css,
                "{}:nth-child({child}) {{ transition-delay: {delay:.1}s; }}",
                rule.selector
            );
        }
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaggerRule;

    #[test]
    fn reveals_once() {
        let mut anim = RevealAnimator::new();
        assert!(anim.observe(1u32));
        assert_eq!(anim.on_intersection(&1, false), RevealDecision::Ignore);
        assert_eq!(anim.on_intersection(&1, true), RevealDecision::Reveal);
        assert_eq!(anim.on_intersection(&1, true), RevealDecision::Ignore);
        assert!(anim.is_revealed(&1));
        assert_eq!((anim.pending(), anim.revealed()), (0, 1));
    }

    #[test]
    fn revealed_elements_cannot_be_reobserved() {
        let mut anim = RevealAnimator::new();
        anim.observe("hero");
        anim.on_intersection(&"hero", true);
        assert!(!anim.observe("hero"));
        assert_eq!(anim.on_intersection(&"hero", true), RevealDecision::Ignore);
    }

    #[test]
    fn marked_elements_are_never_revealed_again() {
        let mut anim = RevealAnimator::new();
        anim.mark_revealed(0u32);
        assert!(!anim.observe(0));
        assert_eq!(anim.on_intersection(&0, true), RevealDecision::Ignore);

        assert!(anim.observe(1));
        anim.mark_revealed(1);
        assert_eq!(anim.on_intersection(&1, true), RevealDecision::Ignore);
        assert_eq!((anim.pending(), anim.revealed()), (0, 2));
    }

    #[test]
    fn duplicate_observe_is_rejected() {
        let mut anim = RevealAnimator::new();
        assert!(anim.observe(7u32));
        assert!(!anim.observe(7u32));
        assert_eq!(anim.pending(), 1);
    }

    #[test]
    fn unobserved_keys_are_ignored() {
        let mut anim: RevealAnimator<u32> = RevealAnimator::new();
        assert_eq!(anim.on_intersection(&3, true), RevealDecision::Ignore);
        assert_eq!(anim.revealed(), 0);
    }

    #[test]
    fn stylesheet_contains_classes_and_delays() {
        let css = animation_stylesheet(&RevealConfig::default());
        assert!(css.contains(".hidden-animate {"));
        assert!(css.contains("translateY(30px)"));
        assert!(css.contains(".fade-in-up {"));
        assert!(css.contains(".timeline-item:nth-child(2) { transition-delay: 0.2s; }"));
        assert!(css.contains(".project-card:nth-child(3) { transition-delay: 0.4s; }"));
        assert!(!css.contains("nth-child(1)"));
    }

    #[test]
    fn stagger_with_single_child_adds_nothing() {
        let config = RevealConfig {
            stagger: vec![StaggerRule::new(".x", 1, 0.5)],
            ..RevealConfig::default()
        };
        assert!(!animation_stylesheet(&config).contains(".x"));
    }
}
