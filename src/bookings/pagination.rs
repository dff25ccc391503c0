use serde::Serialize;

use super::params::SearchParams;

/// Number of pages needed for `count` items; zero items means zero pages
pub fn total_pages(count: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    let pages = count.div_ceil(u64::from(per_page));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Relative links to the neighbouring pages, keeping the other query parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageMeta {
    pub prev: Option<String>,
    pub next: Option<String>,
}

pub fn page_meta(params: &SearchParams, page: u32, total_pages: u32) -> PageMeta {
    let link = |target: u32| {
        let mut params = params.clone();
        params.set("page", target.to_string());
        format!("?{}", params.to_query_string())
    };

    PageMeta {
        prev: (page > 1).then(|| link(page - 1)),
        next: (page < total_pages).then(|| link(page + 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_pages() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn first_page_has_only_next() {
        let params = SearchParams::parse(Some("s=cam"));
        let meta = page_meta(&params, 1, 3);
        assert_eq!(meta.prev, None);
        assert_eq!(meta.next.as_deref(), Some("?s=cam&page=2"));
    }

    #[test]
    fn middle_page_keeps_filters() {
        let params = SearchParams::parse(Some("status=DRAFT&page=2&per_page=50"));
        let meta = page_meta(&params, 2, 3);
        assert_eq!(meta.prev.as_deref(), Some("?status=DRAFT&page=1&per_page=50"));
        assert_eq!(meta.next.as_deref(), Some("?status=DRAFT&page=3&per_page=50"));
    }

    #[test]
    fn last_or_beyond_has_no_next() {
        let params = SearchParams::default();
        assert_eq!(page_meta(&params, 3, 3).next, None);
        assert_eq!(page_meta(&params, 7, 3).next, None);
        assert_eq!(page_meta(&params, 1, 0), PageMeta::default());
    }
}
