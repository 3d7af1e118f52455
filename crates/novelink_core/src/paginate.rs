//! crates/novelink_core/src/paginate.rs
//!
//! Splits a novel's raw content into an ordered paragraph sequence and exposes
//! a fixed-size paged view over it with bounds checking.

use crate::domain::ContentFragment;

/// Number of paragraph fragments shown per page.
pub const PARAGRAPHS_PER_PAGE: usize = 50;

/// The closing block-element marker used to detect editor-produced markup.
const BLOCK_CLOSE: &str = "</p>";

/// Derives the paragraph sequence for a piece of content.
///
/// If the content contains a closing block marker it is treated as markup:
/// split on the marker, the marker reattached to each fragment so embedded
/// rich content (e.g. images) survives intact. Otherwise it is plain text
/// split on line breaks. Empty fragments are dropped in both cases. The
/// plain-vs-markup decision is made here, once, for every fragment.
pub fn split_fragments(content: &str) -> Vec<ContentFragment> {
    if content.contains(BLOCK_CLOSE) {
        content
            .split(BLOCK_CLOSE)
            .filter(|p| !p.trim().is_empty())
            .map(|p| ContentFragment::TrustedMarkup(format!("{}{}", p, BLOCK_CLOSE)))
            .collect()
    } else {
        content
            .split('\n')
            .filter(|p| !p.trim().is_empty())
            .map(|p| ContentFragment::PlainText(p.to_string()))
            .collect()
    }
}

/// A finite, restartable paged view over a novel's paragraph sequence.
///
/// Recomputed whenever the source content changes; never persisted.
#[derive(Debug, Clone)]
pub struct Paginator {
    fragments: Vec<ContentFragment>,
    page_size: usize,
}

impl Paginator {
    pub fn new(content: &str) -> Self {
        Self::with_page_size(content, PARAGRAPHS_PER_PAGE)
    }

    pub fn with_page_size(content: &str, page_size: usize) -> Self {
        Self {
            fragments: split_fragments(content),
            page_size: page_size.max(1),
        }
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Total page count: ceil(fragments / page size). Zero fragments means
    /// zero pages.
    pub fn page_count(&self) -> usize {
        self.fragments.len().div_ceil(self.page_size)
    }

    /// The fragments of page `index`, or `None` outside `[0, page_count)`.
    pub fn page(&self, index: usize) -> Option<&[ContentFragment]> {
        if index >= self.page_count() {
            return None;
        }
        let start = index * self.page_size;
        let end = (start + self.page_size).min(self.fragments.len());
        Some(&self.fragments[start..end])
    }

    /// The concatenated, tag-stripped text of page `index`, for speech.
    /// Empty when the page is out of range or contains no speakable text.
    pub fn page_text(&self, index: usize) -> String {
        let Some(fragments) = self.page(index) else {
            return String::new();
        };
        fragments
            .iter()
            .map(|f| f.spoken_text())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_splits_on_newlines_dropping_empty_lines() {
        let fragments = split_fragments("Para1\nPara2\n\nPara3");
        assert_eq!(
            fragments,
            vec![
                ContentFragment::PlainText("Para1".to_string()),
                ContentFragment::PlainText("Para2".to_string()),
                ContentFragment::PlainText("Para3".to_string()),
            ]
        );
    }

    #[test]
    fn markup_splits_on_block_close_and_reattaches_marker() {
        let fragments = split_fragments("<p>A</p><p>B</p>");
        assert_eq!(
            fragments,
            vec![
                ContentFragment::TrustedMarkup("<p>A</p>".to_string()),
                ContentFragment::TrustedMarkup("<p>B</p>".to_string()),
            ]
        );
    }

    #[test]
    fn markup_fragments_keep_embedded_rich_content() {
        let fragments = split_fragments("<p>look <img src=\"a.png\"/></p><p>done</p>");
        assert_eq!(
            fragments[0],
            ContentFragment::TrustedMarkup("<p>look <img src=\"a.png\"/></p>".to_string())
        );
    }

    #[test]
    fn page_count_is_ceiling_of_fragments_over_page_size() {
        let content = (0..120).map(|i| format!("p{i}")).collect::<Vec<_>>().join("\n");
        let paginator = Paginator::new(&content);
        assert_eq!(paginator.page_count(), 3);
        assert_eq!(paginator.page(0).unwrap().len(), 50);
        assert_eq!(paginator.page(1).unwrap().len(), 50);
        assert_eq!(paginator.page(2).unwrap().len(), 20);
    }

    #[test]
    fn empty_content_has_zero_pages() {
        let paginator = Paginator::new("");
        assert_eq!(paginator.page_count(), 0);
        assert!(paginator.page(0).is_none());
    }

    #[test]
    fn out_of_range_page_is_none() {
        let paginator = Paginator::new("one\ntwo");
        assert!(paginator.page(1).is_none());
        assert!(paginator.page(usize::MAX).is_none());
    }

    #[test]
    fn page_text_concatenates_and_strips_tags() {
        let paginator = Paginator::new("<p>Hello</p><p><img src=\"x\"/>world</p>");
        assert_eq!(paginator.page_text(0), "Hello world");
    }

    #[test]
    fn page_text_out_of_range_is_empty() {
        let paginator = Paginator::new("only");
        assert_eq!(paginator.page_text(3), "");
    }
}
