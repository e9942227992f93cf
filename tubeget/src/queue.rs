use crate::model::QueuedItem;

/// Ordered list of discovered playlist entries. An item's identity is its
/// position; titles and URLs are stored together so they can never drift
/// apart.
#[derive(Debug, Clone, Default)]
pub struct ItemQueue {
    items: Vec<QueuedItem>
}

impl ItemQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: QueuedItem) {
        self.items.push(item);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedItem> {
        self.items.iter()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|i| i.title.as_str())
    }

    /// Owned copy of the URLs, for handing to a background task.
    pub fn snapshot_urls(&self) -> Vec<String> {
        self.items.iter().map(|i| i.url.clone()).collect()
    }

    /// Removes every selected index in one go. Indices refer to positions
    /// before the call; duplicates and out-of-range values are ignored.
    /// Returns the removed items in descending index order.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Vec<QueuedItem> {
        let mut sorted: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|i| *i < self.items.len())
            .collect();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        sorted.into_iter().map(|i| self.items.remove(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(n: usize) -> ItemQueue {
        let mut q = ItemQueue::new();
        for i in 0..n {
            q.push(QueuedItem {
                title: format!("title {i}"),
                url: format!("url {i}")
            });
        }
        q
    }

    #[test]
    fn test_remove_indices_keeps_pairs_aligned() {
        let mut q = queue(5);
        let removed = q.remove_indices(&[1, 3]);

        assert_eq!(removed.iter().map(|i| i.title.as_str()).collect::<Vec<_>>(), [
            "title 3", "title 1"
        ]);
        assert_eq!(q.titles().collect::<Vec<_>>(), ["title 0", "title 2", "title 4"]);
        assert_eq!(q.snapshot_urls(), ["url 0", "url 2", "url 4"]);
        for item in q.iter() {
            assert_eq!(item.title.replace("title", "url"), item.url);
        }
    }

    #[test]
    fn test_remove_indices_order_independent() {
        let mut a = queue(6);
        let mut b = queue(6);
        a.remove_indices(&[0, 4, 2]);
        b.remove_indices(&[2, 0, 4]);
        assert_eq!(a.snapshot_urls(), b.snapshot_urls());
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn test_remove_indices_ignores_duplicates_and_out_of_range() {
        let mut q = queue(3);
        let removed = q.remove_indices(&[1, 1, 7]);
        assert_eq!(removed.len(), 1);
        assert_eq!(q.snapshot_urls(), ["url 0", "url 2"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut q = queue(2);
        let snapshot = q.snapshot_urls();
        q.clear();
        assert!(q.is_empty());
        assert_eq!(snapshot, ["url 0", "url 1"]);
    }
}
