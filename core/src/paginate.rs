use std::fmt;

/// A contiguous run of results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    items: &'a [T],
}

impl<'a, T> Page<'a, T> {
    pub fn items(&self) -> &'a [T] { self.items }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

impl<T: fmt::Display> fmt::Display for Page<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.items {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Pages of at most `page_size` items; only the last may be shorter.
#[derive(Debug, Clone)]
pub struct Paginator<'a, T> {
    pages: Vec<Page<'a, T>>,
}

impl<'a, T> Paginator<'a, T> {
    pub fn new(items: &'a [T], page_size: usize) -> Self {
        let pages = if page_size == 0 {
            Vec::new()
        } else {
            items.chunks(page_size).map(|items| Page { items }).collect()
        };
        Self { pages }
    }

    pub fn len(&self) -> usize { self.pages.len() }

    pub fn is_empty(&self) -> bool { self.pages.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, Page<'a, T>> { self.pages.iter() }
}

impl<'a, T> IntoIterator for Paginator<'a, T> {
    type Item = Page<'a, T>;
    type IntoIter = std::vec::IntoIter<Page<'a, T>>;

    fn into_iter(self) -> Self::IntoIter { self.pages.into_iter() }
}

pub fn paginate<T>(items: &[T], page_size: usize) -> Paginator<'_, T> {
    Paginator::new(items, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_holds_the_remainder() {
        let items = [1, 2, 3, 4, 5];
        let pages = paginate(&items, 2);
        assert_eq!(pages.len(), 3);
        let sizes: Vec<usize> = pages.iter().map(Page::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(pages.iter().last().unwrap().items(), &[5]);
    }

    #[test]
    fn zero_page_size_or_no_items_gives_no_pages() {
        assert!(paginate(&[1, 2], 0).is_empty());
        assert!(paginate::<i32>(&[], 3).is_empty());
    }

    #[test]
    fn page_displays_its_items() {
        let items = ["a", "b", "c"];
        let rendered: Vec<String> = paginate(&items, 2).into_iter().map(|p| p.to_string()).collect();
        assert_eq!(rendered, vec!["ab", "c"]);
    }
}
