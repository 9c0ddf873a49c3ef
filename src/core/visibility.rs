#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId {
    index: usize,
    generation: u64,
}

#[derive(Debug)]
struct Watch<T> {
    threshold: f32,
    payload: T,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    watch: Option<Watch<T>>,
}

/// 一次性觸發的可見度觀察；槽位可重用，但舊的 WatchId 世代不同，不會再觸發
#[derive(Debug)]
pub struct VisibilityWatcher<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Default for VisibilityWatcher<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<T> VisibilityWatcher<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登記一個觀察目標，可見比例達到 threshold 時觸發一次
    pub fn watch(&mut self, threshold: f32, payload: T) -> WatchId {
        let watch = Watch {
            threshold: threshold.clamp(0.0, 1.0),
            payload,
        };
        self.len += 1;

        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.generation += 1;
                slot.watch = Some(watch);
                WatchId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    watch: Some(watch),
                });
                WatchId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    /// 回報可見比例；第一次達到門檻時取回 payload
    pub fn report(&mut self, id: WatchId, visible_fraction: f32) -> Option<T> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }

        let watch = slot.watch.as_ref()?;
        // NaN 不算相交
        if visible_fraction.is_nan()
            || visible_fraction <= 0.0
            || visible_fraction < watch.threshold
        {
            return None;
        }

        let fired = slot.watch.take()?;
        self.free.push(id.index);
        self.len -= 1;
        Some(fired.payload)
    }

    pub fn unwatch(&mut self, id: WatchId) -> Option<T> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        let removed = slot.watch.take()?;
        self.free.push(id.index);
        self.len -= 1;
        Some(removed.payload)
    }

    pub fn is_watching(&self, id: WatchId) -> bool {
        self.slots
            .get(id.index)
            .is_some_and(|slot| slot.generation == id.generation && slot.watch.is_some())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_at_threshold() {
        let mut watcher = VisibilityWatcher::new();
        let id = watcher.watch(0.2, "timeline-1");

        assert_eq!(watcher.report(id, 0.0), None);
        assert_eq!(watcher.report(id, 0.19), None);
        assert!(watcher.is_watching(id));

        assert_eq!(watcher.report(id, 0.2), Some("timeline-1"));
        assert!(!watcher.is_watching(id));
        assert_eq!(watcher.report(id, 1.0), None);
        assert!(watcher.is_empty());
    }

    #[test]
    fn test_zero_threshold_needs_intersection() {
        let mut watcher = VisibilityWatcher::new();
        let id = watcher.watch(0.0, 1);
        assert_eq!(watcher.report(id, 0.0), None);
        assert_eq!(watcher.report(id, 0.01), Some(1));
    }

    #[test]
    fn test_nan_fraction_never_fires() {
        let mut watcher = VisibilityWatcher::new();
        let id = watcher.watch(0.1, "card");
        assert_eq!(watcher.report(id, f32::NAN), None);
        assert!(watcher.is_watching(id));
        assert_eq!(watcher.report(id, 0.5), Some("card"));
    }

    #[test]
    fn test_reused_slot_ignores_stale_id() {
        let mut watcher = VisibilityWatcher::new();
        let first = watcher.watch(0.1, "a");
        assert_eq!(watcher.report(first, 0.5), Some("a"));

        let second = watcher.watch(0.1, "b");
        assert_ne!(first, second);
        assert_eq!(watcher.report(first, 1.0), None);
        assert!(watcher.is_watching(second));
        assert_eq!(watcher.report(second, 1.0), Some("b"));
    }

    #[test]
    fn test_unwatch() {
        let mut watcher = VisibilityWatcher::new();
        let id = watcher.watch(0.5, 7);
        let other = watcher.watch(0.5, 8);
        assert_eq!(watcher.len(), 2);

        assert_eq!(watcher.unwatch(id), Some(7));
        assert_eq!(watcher.unwatch(id), None);
        assert_eq!(watcher.report(id, 1.0), None);
        assert_eq!(watcher.len(), 1);
        assert!(watcher.is_watching(other));
    }
}
