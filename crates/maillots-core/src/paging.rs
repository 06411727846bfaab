//! Page slicing, the page-number strip, and random sampling.

use rand::seq::SliceRandom;

/// One page of a result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based, clamped into `1..=total_pages` (1 for an empty list).
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<'a, T> Page<'a, T> {
    /// Slice out page `number` (1-based) of `items`.
    pub fn of(items: &'a [T], number: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = items.len().div_ceil(page_size);
        let number = number.clamp(1, total_pages.max(1));
        let start = ((number - 1) * page_size).min(items.len());
        let end = (start + page_size).min(items.len());
        Self {
            items: &items[start..end],
            number,
            total_pages,
            total_items: items.len(),
        }
    }
}

/// An element of the page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Number(usize),
    Current(usize),
    Gap,
}

/// The page-number strip shown under a paginated list, e.g.
/// `1 … 4 5 [6] 7 8 … 12`. Empty when there is at most one page.
pub fn page_window(current: usize, total: usize) -> Vec<PageLink> {
    if total <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total);

    let mut start = current.saturating_sub(2).max(1);
    let mut end = (current + 2).min(total);
    if current <= 3 {
        end = total.min(5);
    }
    if current + 3 > total {
        start = total.saturating_sub(4).max(1);
    }

    let mut links = Vec::new();
    if start > 1 {
        links.push(PageLink::Number(1));
        if start > 2 {
            links.push(PageLink::Gap);
        }
    }
    for n in start..=end {
        if n == current {
            links.push(PageLink::Current(n));
        } else {
            links.push(PageLink::Number(n));
        }
    }
    if end < total {
        if end + 1 < total {
            links.push(PageLink::Gap);
        }
        links.push(PageLink::Number(total));
    }
    links
}

/// Render a strip as text: `1 … 4 [5] 6 … 9`.
pub fn render_window(links: &[PageLink]) -> String {
    links
        .iter()
        .map(|link| match link {
            PageLink::Number(n) => n.to_string(),
            PageLink::Current(n) => format!("[{}]", n),
            PageLink::Gap => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Up to `count` distinct items picked uniformly at random.
pub fn sample<T>(items: &[T], count: usize) -> Vec<&T> {
    let mut rng = rand::thread_rng();
    items.choose_multiple(&mut rng, count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_page_slices() {
        let items: Vec<u32> = (1..=45).collect();
        let p1 = Page::of(&items, 1, 20);
        assert_eq!(p1.items.len(), 20);
        assert_eq!(p1.total_pages, 3);
        let p3 = Page::of(&items, 3, 20);
        assert_eq!(p3.items, &[41, 42, 43, 44, 45]);
    }

    #[test]
    fn test_page_number_is_clamped() {
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(Page::of(&items, 0, 2).number, 1);
        let last = Page::of(&items, 99, 2);
        assert_eq!(last.number, 3);
        assert_eq!(last.items, &[5]);
    }

    #[test]
    fn test_empty_page() {
        let items: Vec<u32> = Vec::new();
        let page = Page::of(&items, 2, 20);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_window_single_page() {
        assert!(page_window(1, 1).is_empty());
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn test_window_near_start() {
        assert_eq!(render_window(&page_window(1, 10)), "[1] 2 3 4 5 … 10");
        assert_eq!(render_window(&page_window(3, 10)), "1 2 [3] 4 5 … 10");
    }

    #[test]
    fn test_window_middle() {
        assert_eq!(render_window(&page_window(6, 12)), "1 … 4 5 [6] 7 8 … 12");
        assert_eq!(render_window(&page_window(4, 10)), "1 2 3 [4] 5 6 … 10");
    }

    #[test]
    fn test_window_near_end() {
        assert_eq!(render_window(&page_window(10, 10)), "1 … 6 7 8 9 [10]");
        assert_eq!(render_window(&page_window(8, 10)), "1 … 6 7 [8] 9 10");
    }

    #[test]
    fn test_window_few_pages() {
        assert_eq!(render_window(&page_window(2, 3)), "1 [2] 3");
    }

    #[test]
    fn test_sample_is_distinct_and_bounded() {
        let items: Vec<u32> = (0..10).collect();
        let picked = sample(&items, 6);
        assert_eq!(picked.len(), 6);
        let unique: HashSet<u32> = picked.iter().map(|v| **v).collect();
        assert_eq!(unique.len(), 6);

        assert_eq!(sample(&items, 50).len(), 10);
        assert!(sample(&Vec::<u32>::new(), 6).is_empty());
    }
}
