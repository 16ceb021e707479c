//! Panorama ids already handed out in a capture session.

use std::collections::HashSet;
use crate::model::PanoramaId;

/// Set of panorama ids assigned to vantages so far.
///
/// Share one across every point of interest that should never reuse a
/// panorama; create a fresh one to allow reuse.
#[derive(Debug, Clone, Default)]
pub struct UsedPanoramas {
    ids: HashSet<PanoramaId>,
}

impl UsedPanoramas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id`. Returns false if it was already taken.
    pub fn reserve(&mut self, id: &PanoramaId) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.clone())
    }

    pub fn contains(&self, id: &PanoramaId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_once() {
        let mut used = UsedPanoramas::new();
        let id = PanoramaId::new("CAoSLEFGMVFpcE");
        assert!(used.reserve(&id));
        assert!(!used.reserve(&id));
        assert!(used.contains(&id));
        assert_eq!(used.len(), 1);
    }
}
