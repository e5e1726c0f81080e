// Catalog query engine: filtering, pagination, and pager summarization.
//
// Every list endpoint fetches its rows, runs them through this module, and
// renders the resulting slice plus page tokens. Everything here is pure and
// synchronous; callers re-run the pipeline on fresh rows after any mutation
// rather than patching previous output.

use std::collections::HashMap;

use serde::ser::{Serialize, Serializer};

/// Selection value meaning "no constraint on this axis".
pub const AXIS_ALL: &str = "all";

/// A row that can be filtered and paged by the engine.
///
/// `display_name` feeds the free-text search; `axis_value` resolves one
/// categorical dimension (e.g. "category", "language", "platform") to the
/// row's value on it, or `None` when the row has no value for that axis.
pub trait CatalogEntry {
    fn display_name(&self) -> &str;

    fn axis_value(&self, axis: &str) -> Option<&str>;
}

/// Active filter set: free-text search plus categorical selections.
///
/// A selection of [`AXIS_ALL`] (or an absent axis) imposes no constraint.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub search: String,
    pub axes: HashMap<String, String>,
}

impl FilterState {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            axes: HashMap::new(),
        }
    }

    /// Adds a categorical selection. `None` and `"all"` are both recorded
    /// as-is; the predicate treats them as unconstrained.
    pub fn with_axis(mut self, axis: impl Into<String>, selection: Option<String>) -> Self {
        if let Some(selection) = selection {
            self.axes.insert(axis.into(), selection);
        }
        self
    }
}

/// Whether one entry passes the active filter set.
///
/// Text match is a case-insensitive substring test on the display name;
/// whitespace-only search text matches everything. Every constrained axis
/// must match exactly; an entry missing a constrained axis does not match.
pub fn matches<E: CatalogEntry>(entry: &E, filter: &FilterState) -> bool {
    let needle = filter.search.trim().to_lowercase();
    if !needle.is_empty() && !entry.display_name().to_lowercase().contains(&needle) {
        return false;
    }

    filter
        .axes
        .iter()
        .filter(|(_, selection)| selection.as_str() != AXIS_ALL)
        .all(|(axis, selection)| entry.axis_value(axis) == Some(selection.as_str()))
}

/// Applies [`matches`] across a collection, preserving input order.
///
/// Order preservation is load-bearing: it is what makes repeated pagination
/// over identical inputs deterministic.
pub fn filter_entries<'a, E: CatalogEntry>(entries: &'a [E], filter: &FilterState) -> Vec<&'a E> {
    entries.iter().filter(|e| matches(*e, filter)).collect()
}

/// Resolved slice bounds for one page of a filtered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    /// The clamped, always-in-range page actually used.
    pub page: usize,
    pub total_pages: usize,
    /// Half-open bounds into the filtered collection.
    pub start: usize,
    pub end: usize,
}

/// Computes page count and slice bounds for a filtered collection.
///
/// Out-of-range page requests are clamped, never rejected: page 0 or a page
/// past the end still yields a valid (possibly empty) slice. An empty
/// collection yields `total_pages = 0` with an empty slice on page 1.
pub fn paginate(filtered_count: usize, page_size: usize, requested_page: usize) -> PageSlice {
    debug_assert!(page_size > 0);
    let total_pages = filtered_count.div_ceil(page_size);
    let page = requested_page.clamp(1, total_pages.max(1));
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(filtered_count);

    PageSlice {
        page,
        total_pages,
        start,
        end,
    }
}

/// One label in a pager control: a page number or an elided run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageToken::Page(n) => serializer.serialize_u64(*n as u64),
            PageToken::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Produces the abbreviated page-label sequence for a pager control.
///
/// `max_visible` is a presentation budget chosen by the caller (3 on narrow
/// viewports, 5 otherwise). A single page (or none) emits no tokens at all:
/// the pager is not rendered for one page. For larger sets the sequence is
/// anchored at page 1 and `total_pages`, with at most two ellipses and a
/// contiguous window near the current page.
pub fn page_tokens(current: usize, total_pages: usize, max_visible: usize) -> Vec<PageToken> {
    use PageToken::{Ellipsis, Page};

    if total_pages <= 1 {
        return Vec::new();
    }

    if total_pages <= max_visible {
        return (1..=total_pages).map(Page).collect();
    }

    let mut tokens = Vec::with_capacity(7);

    if current <= 3 {
        // Contiguous run anchored at page 1, then the last page
        let head_end = 4.min(total_pages - 1);
        tokens.extend((1..=head_end).map(Page));
        if total_pages > head_end + 1 {
            tokens.push(Ellipsis);
        }
        tokens.push(Page(total_pages));
    } else if current >= total_pages.saturating_sub(2) {
        // Mirror: page 1, then a contiguous run anchored at the end
        let tail_start = total_pages.saturating_sub(3).max(2);
        tokens.push(Page(1));
        if tail_start > 2 {
            tokens.push(Ellipsis);
        }
        tokens.extend((tail_start..=total_pages).map(Page));
    } else {
        // Middle: both gaps are guaranteed non-empty here
        tokens.push(Page(1));
        tokens.push(Ellipsis);
        tokens.extend((current - 1..=current + 1).map(Page));
        tokens.push(Ellipsis);
        tokens.push(Page(total_pages));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    struct Entry {
        name: &'static str,
        category: Option<&'static str>,
        language: Option<&'static str>,
    }

    impl CatalogEntry for Entry {
        fn display_name(&self) -> &str {
            self.name
        }

        fn axis_value(&self, axis: &str) -> Option<&str> {
            match axis {
                "category" => self.category,
                "language" => self.language,
                _ => None,
            }
        }
    }

    fn entry(name: &'static str) -> Entry {
        Entry {
            name,
            category: Some("hollywood"),
            language: Some("english"),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = FilterState::default();
        assert!(matches(&entry("The Matrix"), &filter));
    }

    #[test]
    fn text_match_is_case_insensitive_substring() {
        let e = entry("The Matrix");
        assert!(matches(&e, &FilterState::new("matrix")));
        assert!(matches(&e, &FilterState::new("MATRIX")));
        assert!(matches(&e, &FilterState::new("  matrix  ")));
        assert!(!matches(&entry("Alien"), &FilterState::new("matrix")));
    }

    #[test]
    fn all_selection_ignores_the_axis() {
        let filter =
            FilterState::default().with_axis("category", Some(AXIS_ALL.to_string()));
        assert!(matches(&entry("Alien"), &filter));

        let bolly = Entry {
            name: "Sholay",
            category: Some("bollywood"),
            language: Some("hindi"),
        };
        assert!(matches(&bolly, &filter));
    }

    #[test]
    fn axis_constraints_are_anded() {
        let filter = FilterState::default()
            .with_axis("category", Some("hollywood".to_string()))
            .with_axis("language", Some("hindi".to_string()));
        // category matches, language does not
        assert!(!matches(&entry("The Matrix"), &filter));
    }

    #[test]
    fn missing_axis_value_is_a_non_match() {
        let e = Entry {
            name: "Unknown",
            category: None,
            language: None,
        };
        let filter = FilterState::default().with_axis("category", Some("hollywood".to_string()));
        assert!(!matches(&e, &filter));
    }

    #[test]
    fn filtering_preserves_order_and_is_idempotent() {
        let entries = vec![entry("Dual A"), entry("Solo"), entry("Dual B")];
        let filter = FilterState::new("dual");

        let once = filter_entries(&entries, &filter);
        assert_eq!(
            once.iter().map(|e| e.name).collect::<Vec<_>>(),
            vec!["Dual A", "Dual B"]
        );

        let owned: Vec<Entry> = once.iter().map(|e| **e).collect();
        let twice = filter_entries(&owned, &filter);
        assert_eq!(twice.len(), once.len());
    }

    #[test]
    fn paginate_computes_bounds_and_clamps() {
        let slice = paginate(23, 10, 1);
        assert_eq!(slice.total_pages, 3);
        assert_eq!((slice.start, slice.end), (0, 10));

        let slice = paginate(23, 10, 3);
        assert_eq!((slice.start, slice.end), (20, 23));

        // out-of-range requests clamp instead of failing
        assert_eq!(paginate(23, 10, 99).page, 3);
        assert_eq!(paginate(23, 10, 0).page, 1);
    }

    #[test]
    fn paginate_empty_collection() {
        let slice = paginate(0, 10, 1);
        assert_eq!(slice.total_pages, 0);
        assert_eq!(slice.page, 1);
        assert_eq!((slice.start, slice.end), (0, 0));
    }

    #[test]
    fn tokens_small_set_has_no_ellipsis() {
        assert_eq!(
            page_tokens(1, 3, 5),
            vec![PageToken::Page(1), PageToken::Page(2), PageToken::Page(3)]
        );
    }

    #[test]
    fn tokens_single_page_emits_nothing() {
        assert!(page_tokens(1, 1, 5).is_empty());
        assert!(page_tokens(1, 0, 5).is_empty());
    }

    #[test]
    fn tokens_start_window() {
        use PageToken::{Ellipsis, Page};
        assert_eq!(
            page_tokens(2, 20, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn tokens_end_window() {
        use PageToken::{Ellipsis, Page};
        assert_eq!(
            page_tokens(19, 20, 5),
            vec![Page(1), Ellipsis, Page(17), Page(18), Page(19), Page(20)]
        );
    }

    #[test]
    fn tokens_middle_window() {
        use PageToken::{Ellipsis, Page};
        assert_eq!(
            page_tokens(10, 20, 5),
            vec![
                Page(1),
                Ellipsis,
                Page(9),
                Page(10),
                Page(11),
                Ellipsis,
                Page(20)
            ]
        );
    }

    #[test]
    fn tokens_invariants_hold_across_positions() {
        for total in 2..=40 {
            for current in 1..=total {
                for max_visible in [3, 5] {
                    let tokens = page_tokens(current, total, max_visible);

                    let numbers: Vec<usize> = tokens
                        .iter()
                        .filter_map(|t| match t {
                            PageToken::Page(n) => Some(*n),
                            PageToken::Ellipsis => None,
                        })
                        .collect();
                    assert!(numbers.windows(2).all(|w| w[0] < w[1]));

                    let ellipses = tokens.len() - numbers.len();
                    assert!(ellipses <= 2);
                    assert!(!tokens
                        .windows(2)
                        .any(|w| w[0] == PageToken::Ellipsis && w[1] == PageToken::Ellipsis));

                    if total > max_visible {
                        assert_eq!(numbers.first(), Some(&1));
                        assert_eq!(numbers.last(), Some(&total));
                    }
                }
            }
        }
    }

    #[test]
    fn token_serialization_matches_pager_labels() {
        let json = serde_json::to_string(&page_tokens(10, 20, 5)).unwrap();
        assert_eq!(json, r#"[1,"...",9,10,11,"...",20]"#);
    }

    struct OwnedEntry {
        name: String,
        language: &'static str,
    }

    impl CatalogEntry for OwnedEntry {
        fn display_name(&self) -> &str {
            &self.name
        }

        fn axis_value(&self, axis: &str) -> Option<&str> {
            (axis == "language").then_some(self.language)
        }
    }

    #[test]
    fn end_to_end_filter_then_page() {
        let mut entries = Vec::new();
        for i in 0..12 {
            entries.push(OwnedEntry {
                name: format!("Dual Audio {i}"),
                language: "dual",
            });
        }
        for i in 0..13 {
            entries.push(OwnedEntry {
                name: format!("Other {i}"),
                language: "hindi",
            });
        }

        let filter = FilterState::new("dual");
        let filtered = filter_entries(&entries, &filter);
        assert_eq!(filtered.len(), 12);

        let slice = paginate(filtered.len(), 10, 2);
        assert_eq!(slice.total_pages, 2);
        assert_eq!((slice.start, slice.end), (10, 12));
        assert_eq!(filtered[slice.start..slice.end].len(), 2);

        assert_eq!(
            page_tokens(slice.page, slice.total_pages, 5),
            vec![PageToken::Page(1), PageToken::Page(2)]
        );
    }
}
