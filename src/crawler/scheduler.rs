//! Crawl frontier
//!
//! The frontier decides which page is visited next. It handles:
//! - Normalization of candidate URLs (fragment and trailing slash dropped)
//! - Same-origin scoping against the seed host
//! - Deduplication against both visited and queued URLs
//! - Breadth-first (FIFO) ordering
//! - The page budget

use crate::url::{classify_link, host_of, normalize_url};
use crate::{UrlError, UrlResult};
use std::collections::{HashSet, VecDeque};

/// Visited set plus FIFO queue of same-origin URLs
///
/// A URL is in at most one of `visited` and the queue at any time. It leaves
/// the queue through [`next`](Self::next) and enters `visited` through
/// [`mark_visited`](Self::mark_visited), exactly once.
#[derive(Debug)]
pub struct Frontier {
    /// Host every crawled URL must share (lowercased, no port)
    seed_host: String,

    /// Maximum number of pages `next` will hand out
    max_pages: usize,

    /// Normalized URLs already visited
    visited: HashSet<String>,

    /// Pending URLs in discovery order
    queue: VecDeque<String>,

    /// Membership index for `queue`
    queued: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier scoped to the seed's host and enqueues the seed
    ///
    /// # Errors
    ///
    /// Returns a `UrlError` if the seed is not an absolute http(s) URL with a
    /// host.
    pub fn new(seed: &str, max_pages: usize) -> UrlResult<Self> {
        let normalized = normalize_url(seed)?;
        let seed_host = host_of(&normalized).ok_or(UrlError::MissingHost)?;

        let mut frontier = Self {
            seed_host,
            max_pages,
            visited: HashSet::new(),
            queue: VecDeque::new(),
            queued: HashSet::new(),
        };
        frontier.enqueue_seed(&normalized)?;

        Ok(frontier)
    }

    /// Queues a URL without the scope check
    ///
    /// Returns Ok(false) when the URL is already visited or queued.
    pub fn enqueue_seed(&mut self, url: &str) -> UrlResult<bool> {
        let normalized = normalize_url(url)?;
        Ok(self.push(normalized))
    }

    /// Pops the oldest queued URL, or None when the queue is empty or the
    /// budget is spent
    pub fn next(&mut self) -> Option<String> {
        if self.budget_exhausted() {
            return None;
        }

        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    /// Records a URL as visited
    ///
    /// Returns false if it was already visited.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        let key = normalize_url(url).unwrap_or_else(|_| url.to_string());
        // Visited and queued must stay disjoint
        if self.queued.remove(&key) {
            self.queue.retain(|queued| queued != &key);
        }
        self.visited.insert(key)
    }

    /// Offers discovered links to the frontier
    ///
    /// Off-origin, unparseable and non-http(s) candidates are dropped, as are
    /// URLs already visited or queued. Returns how many were queued.
    pub fn offer<I, S>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut accepted = 0;

        for candidate in candidates {
            let candidate = candidate.as_ref();

            let scope = classify_link(candidate, &self.seed_host);
            if !scope.should_crawl() {
                tracing::trace!("Rejected {} ({:?})", candidate, scope);
                continue;
            }

            match normalize_url(candidate) {
                Ok(normalized) => {
                    if self.push(normalized) {
                        accepted += 1;
                    }
                }
                Err(e) => tracing::trace!("Failed to normalize URL {}: {}", candidate, e),
            }
        }

        accepted
    }

    fn push(&mut self, normalized: String) -> bool {
        if self.visited.contains(&normalized) || self.queued.contains(&normalized) {
            return false;
        }
        self.queued.insert(normalized.clone());
        self.queue.push_back(normalized);
        true
    }

    pub fn is_visited(&self, url: &str) -> bool {
        match normalize_url(url) {
            Ok(normalized) => self.visited.contains(&normalized),
            Err(_) => self.visited.contains(url),
        }
    }

    pub fn is_queued(&self, url: &str) -> bool {
        normalize_url(url)
            .map(|normalized| self.queued.contains(&normalized))
            .unwrap_or(false)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// True once as many pages were visited as the budget allows
    pub fn budget_exhausted(&self) -> bool {
        self.visited.len() >= self.max_pages
    }

    pub fn seed_host(&self) -> &str {
        &self.seed_host
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier(max_pages: usize) -> Frontier {
        Frontier::new("https://example.com/", max_pages).unwrap()
    }

    /// Pops and marks, the way the run loop does
    fn visit_next(frontier: &mut Frontier) -> Option<String> {
        let url = frontier.next()?;
        frontier.mark_visited(&url);
        Some(url)
    }

    #[test]
    fn test_new_frontier_holds_seed() {
        let frontier = frontier(10);
        assert_eq!(frontier.seed_host(), "example.com");
        assert_eq!(frontier.queued_count(), 1);
        assert_eq!(frontier.visited_count(), 0);
        assert!(frontier.is_queued("https://example.com"));
    }

    #[test]
    fn test_invalid_seed() {
        assert!(Frontier::new("not a url", 10).is_err());
        assert!(Frontier::new("ftp://example.com", 10).is_err());
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = frontier(10);
        assert_eq!(visit_next(&mut frontier).as_deref(), Some("https://example.com"));

        let accepted = frontier.offer([
            "https://example.com/b",
            "https://example.com/a",
            "https://example.com/c",
        ]);
        assert_eq!(accepted, 3);

        assert_eq!(frontier.next().as_deref(), Some("https://example.com/b"));
        assert_eq!(frontier.next().as_deref(), Some("https://example.com/a"));
        assert_eq!(frontier.next().as_deref(), Some("https://example.com/c"));
        assert_eq!(frontier.next(), None);
    }

    #[test]
    fn test_offer_rejects_off_origin_and_unsupported() {
        let mut frontier = frontier(10);
        let accepted = frontier.offer([
            "https://other.com/page",
            "https://cdn.example.com/page",
            "mailto:hello@example.com",
            "not a url",
        ]);
        assert_eq!(accepted, 0);
        assert_eq!(frontier.queued_count(), 1);
    }

    #[test]
    fn test_port_is_ignored_for_scope() {
        let mut frontier = frontier(10);
        assert_eq!(frontier.offer(["http://example.com:8080/admin"]), 1);
    }

    #[test]
    fn test_fragments_and_trailing_slashes_collapse() {
        let mut frontier = frontier(10);
        visit_next(&mut frontier);

        let accepted = frontier.offer([
            "https://example.com/about",
            "https://example.com/about/",
            "https://example.com/about#team",
            "https://example.com/#top",
        ]);
        assert_eq!(accepted, 1);
        assert_eq!(frontier.queued_count(), 1);
    }

    #[test]
    fn test_query_is_significant() {
        let mut frontier = frontier(10);
        let accepted = frontier.offer(["https://example.com/?page=1", "https://example.com/?page=2"]);
        assert_eq!(accepted, 2);
    }

    #[test]
    fn test_visited_urls_are_not_requeued() {
        let mut frontier = frontier(10);
        visit_next(&mut frontier);

        assert_eq!(frontier.offer(["https://example.com/"]), 0);
        assert!(frontier.is_visited("https://example.com/#x"));
        assert_eq!(frontier.queued_count(), 0);
    }

    #[test]
    fn test_mark_visited_reports_repeat() {
        let mut frontier = frontier(10);
        let url = frontier.next().unwrap();
        assert!(frontier.mark_visited(&url));
        assert!(!frontier.mark_visited(&url));
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_mark_visited_removes_from_queue() {
        let mut frontier = frontier(10);
        frontier.offer(["https://example.com/a"]);
        frontier.mark_visited("https://example.com/a");

        assert!(!frontier.is_queued("https://example.com/a"));
        assert_eq!(frontier.queued_count(), 1);
    }

    #[test]
    fn test_budget() {
        let mut frontier = frontier(2);
        visit_next(&mut frontier);
        frontier.offer(["https://example.com/a", "https://example.com/b"]);

        assert!(visit_next(&mut frontier).is_some());
        assert!(frontier.budget_exhausted());
        assert_eq!(frontier.next(), None);
        assert_eq!(frontier.queued_count(), 1);
        assert_eq!(frontier.visited_count(), 2);
    }

    #[test]
    fn test_visited_and_queue_stay_disjoint() {
        let mut frontier = frontier(50);
        let links: Vec<String> = (0..20)
            .map(|i| format!("https://example.com/p{}", i % 7))
            .collect();

        while let Some(url) = visit_next(&mut frontier) {
            frontier.offer(&links);
            for queued in frontier.queue.iter() {
                assert!(!frontier.visited.contains(queued));
            }
            assert_eq!(frontier.queue.len(), frontier.queued.len());
            assert!(frontier.is_visited(&url));
        }

        assert_eq!(frontier.visited_count(), 8);
    }
}
