//! Book assembler: per-page state derived from the delayed page.
//!
//! Everything here is a pure function of the page count and the delayed page,
//! recomputed whenever either changes.

use serde::{Deserialize, Serialize};

use crate::inputs::PageSpec;

/// What one page needs to know about the book this frame.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageState {
    pub index: usize,
    pub opened: bool,
    pub book_closed: bool,
    /// Z offset that stacks pages and slides the stack as pages turn.
    pub depth_offset: f32,
}

/// The book is shut when the front or back cover is showing.
#[inline]
pub fn is_book_closed(delayed_page: usize, page_count: usize) -> bool {
    delayed_page == 0 || delayed_page == page_count
}

pub fn page_state(index: usize, page_count: usize, delayed_page: usize, page_depth: f32) -> PageState {
    PageState {
        index,
        opened: delayed_page > index,
        book_closed: is_book_closed(delayed_page, page_count),
        depth_offset: -(index as f32) * page_depth + delayed_page as f32 * page_depth,
    }
}

/// States for every page, in page order.
pub fn assemble(page_count: usize, delayed_page: usize, page_depth: f32) -> Vec<PageState> {
    (0..page_count)
        .map(|i| page_state(i, page_count, delayed_page, page_depth))
        .collect()
}

/// Paginate a run of pictures between two covers.
///
/// The first sheet carries the cover and the first picture, the following
/// pictures pair up front/back, and the last sheet always shows the last
/// picture against the back cover. When the pictures after the first pair up
/// evenly, the last picture therefore appears on both of the final two sheets.
pub fn layout_pages<S: AsRef<str>>(cover: &str, back_cover: &str, pictures: &[S]) -> Vec<PageSpec> {
    let Some((first, rest)) = pictures.split_first() else {
        return vec![PageSpec::new(cover, back_cover)];
    };
    let mut pages = Vec::with_capacity(pictures.len() / 2 + 2);
    pages.push(PageSpec::new(cover, first.as_ref()));
    pages.extend(
        rest.chunks_exact(2)
            .map(|pair| PageSpec::new(pair[0].as_ref(), pair[1].as_ref())),
    );
    let last = rest.last().unwrap_or(first);
    pages.push(PageSpec::new(last.as_ref(), back_cover));
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opened_and_closed_flags() {
        let states = assemble(5, 2, 0.003);
        assert_eq!(states.len(), 5);
        assert!(states[0].opened && states[1].opened);
        assert!(!states[2].opened);
        assert!(states.iter().all(|s| !s.book_closed));

        assert!(assemble(5, 0, 0.003).iter().all(|s| s.book_closed));
        assert!(assemble(5, 5, 0.003).iter().all(|s| s.book_closed && s.opened));
    }

    #[test]
    fn depth_offsets_slide_with_delayed_page() {
        let d = 0.01;
        let s = page_state(3, 10, 5, d);
        assert!((s.depth_offset - 0.02).abs() < 1e-6);
        let s = page_state(3, 10, 0, d);
        assert!((s.depth_offset + 0.03).abs() < 1e-6);
    }

    #[test]
    fn layout_odd_picture_run() {
        let pics = ["p0", "p1", "p2", "p3", "p4"];
        let pages = layout_pages("cover", "back", &pics);
        assert_eq!(pages.len(), 4);
        assert_eq!(pages[0], PageSpec::new("cover", "p0"));
        assert_eq!(pages[1], PageSpec::new("p1", "p2"));
        assert_eq!(pages[2], PageSpec::new("p3", "p4"));
        assert_eq!(pages[3], PageSpec::new("p4", "back"));
        assert!(pages.iter().all(|p| p.front != "back"));
    }

    #[test]
    fn layout_even_picture_run() {
        let pics = ["p0", "p1", "p2", "p3"];
        let pages = layout_pages("cover", "back", &pics);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], PageSpec::new("cover", "p0"));
        assert_eq!(pages[1], PageSpec::new("p1", "p2"));
        assert_eq!(pages[2], PageSpec::new("p3", "back"));
    }

    #[test]
    fn layout_single_picture() {
        let pages = layout_pages("cover", "back", &["p0"]);
        assert_eq!(
            pages,
            vec![PageSpec::new("cover", "p0"), PageSpec::new("p0", "back")]
        );
    }

    #[test]
    fn layout_without_pictures() {
        let pages = layout_pages::<&str>("cover", "back", &[]);
        assert_eq!(pages, vec![PageSpec::new("cover", "back")]);
    }
}
