// tests/pagination_window.rs
//
// Property-style sweeps over the pagination window. The inline unit tests
// cover the pointwise cases; these exercise the invariants across the
// whole (current, total, delta) space the UI can produce.

use coursecove::catalog::page::{page_tokens, PageToken};

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
fn degenerate_totals_collapse_to_single_token() {
    for current in [0u32, 1, 5, 100] {
        for total in [0u32, 1] {
            for delta in 0..4 {
                assert_eq!(page_tokens(current, total, delta), vec![PageToken::Page(1)]);
            }
        }
    }
}

#[test]
fn endpoints_always_present() {
    for total in 2..=40u32 {
        for current in 0..=total + 3 {
            for delta in 0..=4 {
                let nums = numbers(&page_tokens(current, total, delta));
                assert_eq!(nums.first(), Some(&1));
                assert_eq!(nums.last(), Some(&total));
            }
        }
    }
}

#[test]
fn numeric_tokens_strictly_increase_without_duplicates() {
    for total in 2..=40u32 {
        for current in 1..=total {
            for delta in 0..=4 {
                let nums = numbers(&page_tokens(current, total, delta));
                for pair in nums.windows(2) {
                    assert!(
                        pair[0] < pair[1],
                        "not strictly increasing: total={total} current={current} delta={delta} nums={nums:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn gap_appears_iff_numbers_skip_more_than_one() {
    for total in 2..=40u32 {
        for current in 1..=total {
            for delta in 0..=4 {
                let tokens = page_tokens(current, total, delta);
                for window in tokens.windows(2) {
                    match (window[0], window[1]) {
                        (PageToken::Page(a), PageToken::Page(b)) => {
                            assert_eq!(
                                b - a,
                                1,
                                "adjacent numbers must be consecutive: {tokens:?}"
                            );
                        }
                        (PageToken::Gap, PageToken::Gap) => {
                            panic!("double gap in {tokens:?}");
                        }
                        _ => {}
                    }
                }
                // Every gap really hides at least one page.
                for (i, token) in tokens.iter().enumerate() {
                    if *token == PageToken::Gap {
                        let PageToken::Page(before) = tokens[i - 1] else {
                            panic!("gap without page before: {tokens:?}");
                        };
                        let PageToken::Page(after) = tokens[i + 1] else {
                            panic!("gap without page after: {tokens:?}");
                        };
                        assert!(after - before > 1, "empty gap in {tokens:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn window_is_centered_and_clamped() {
    // Deep in a long range the window is exactly current ± delta.
    let nums = numbers(&page_tokens(50, 100, 3));
    assert_eq!(nums, vec![1, 47, 48, 49, 50, 51, 52, 53, 100]);

    // Near an edge the window clamps instead of wrapping.
    let nums = numbers(&page_tokens(2, 100, 3));
    assert_eq!(nums, vec![1, 2, 3, 4, 5, 100]);
}
