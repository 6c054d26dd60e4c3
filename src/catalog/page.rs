// src/catalog/page.rs
//
// Pagination window: the compact page-button list shown around the current
// page, e.g. [1, …, 5, 6, 7, …, 42]. Pure functions, no side effects.

/// One entry in the rendered page-button strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    /// A concrete, clickable page number.
    Page(u32),
    /// An ellipsis standing in for a run of hidden pages.
    Gap,
}

/// Number of pages needed for `item_count` items at `page_size` per page.
/// Always at least 1 so an empty result still has a well-defined page.
pub fn total_pages(item_count: usize, page_size: usize) -> u32 {
    if page_size == 0 || item_count == 0 {
        return 1;
    }
    (item_count.div_ceil(page_size)) as u32
}

/// Clamp a requested 1-indexed page into `[1, total]`.
pub fn clamp_page(page: u32, total: u32) -> u32 {
    page.clamp(1, total.max(1))
}

/// Build the token strip for `current` of `total` pages with `delta`
/// neighbors on each side of the current page.
///
/// Guarantees: first and last page always present, numeric tokens strictly
/// increasing, a `Gap` appears exactly where consecutive numbers would
/// differ by more than one.
pub fn page_tokens(current: u32, total: u32, delta: u32) -> Vec<PageToken> {
    if total <= 1 {
        return vec![PageToken::Page(1)];
    }
    let current = clamp_page(current, total);

    let left = current.saturating_sub(delta).max(2);
    let right = (current.saturating_add(delta)).min(total - 1);

    let mut tokens = vec![PageToken::Page(1)];
    if left > 2 {
        tokens.push(PageToken::Gap);
    }
    for p in left..=right {
        tokens.push(PageToken::Page(p));
    }
    if right + 1 < total {
        tokens.push(PageToken::Gap);
    }
    tokens.push(PageToken::Page(total));
    tokens
}

/// The slice of `items` belonging to the (already clamped) `page`.
pub fn page_slice<T>(items: &[T], page: u32, page_size: usize) -> &[T] {
    if page_size == 0 {
        return items;
    }
    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(tokens: &[PageToken]) -> Vec<u32> {
        tokens
            .iter()
            .filter_map(|t| match t {
                PageToken::Page(p) => Some(*p),
                PageToken::Gap => None,
            })
            .collect()
    }

    #[test]
    fn single_page_is_just_one() {
        assert_eq!(page_tokens(1, 1, 2), vec![PageToken::Page(1)]);
        assert_eq!(page_tokens(7, 0, 2), vec![PageToken::Page(1)]);
    }

    #[test]
    fn first_and_last_always_present() {
        for total in 2..=30u32 {
            for current in 1..=total {
                let nums = numbers(&page_tokens(current, total, 2));
                assert_eq!(nums.first(), Some(&1), "total={total} current={current}");
                assert_eq!(nums.last(), Some(&total), "total={total} current={current}");
            }
        }
    }

    #[test]
    fn window_covers_current_neighbors() {
        let tokens = page_tokens(10, 20, 2);
        let nums = numbers(&tokens);
        for p in 8..=12 {
            assert!(nums.contains(&p), "missing {p} in {nums:?}");
        }
    }

    #[test]
    fn middle_of_long_range_has_two_gaps() {
        let tokens = page_tokens(10, 20, 2);
        let gaps = tokens.iter().filter(|t| **t == PageToken::Gap).count();
        assert_eq!(gaps, 2);
        assert_eq!(numbers(&tokens), vec![1, 8, 9, 10, 11, 12, 20]);
    }

    #[test]
    fn no_gap_when_window_touches_edges() {
        assert_eq!(numbers(&page_tokens(2, 5, 2)), vec![1, 2, 3, 4, 5]);
        let tokens = page_tokens(2, 5, 2);
        assert!(tokens.iter().all(|t| *t != PageToken::Gap));
    }

    #[test]
    fn out_of_range_current_is_clamped() {
        assert_eq!(page_tokens(99, 4, 2), page_tokens(4, 4, 2));
        assert_eq!(page_tokens(0, 4, 2), page_tokens(1, 4, 2));
    }

    #[test]
    fn total_pages_rounds_up_and_never_zero() {
        assert_eq!(total_pages(37, 12), 4);
        assert_eq!(total_pages(36, 12), 3);
        assert_eq!(total_pages(0, 12), 1);
        assert_eq!(total_pages(5, 0), 1);
    }

    #[test]
    fn page_slice_windows() {
        let items: Vec<u32> = (0..37).collect();
        assert_eq!(page_slice(&items, 1, 12), &items[0..12]);
        assert_eq!(page_slice(&items, 4, 12), &items[36..37]);
        assert!(page_slice(&items, 5, 12).is_empty());
    }
}
