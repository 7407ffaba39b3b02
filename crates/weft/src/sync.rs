//! Enter / update / exit reconciliation of keyed elements.

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::surface::{ElementAttrs, ElementId, ElementKind, RenderSurface};

/// Result of comparing the previous key set with the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDiff<'a> {
    pub entered: Vec<&'a ElementId>,
    pub retained: Vec<&'a ElementId>,
    pub exited: Vec<&'a ElementId>,
}

/// Splits keys into entered, retained and exited sets. Entered and retained
/// keep the order of `current`, exited the order of `previous`.
pub fn diff<'a>(
    previous: &'a IndexSet<ElementId>,
    current: &'a IndexSet<ElementId>,
) -> KeyDiff<'a> {
    let (retained, entered): (Vec<_>, Vec<_>) =
        current.iter().partition(|id| previous.contains(*id));
    let exited = previous.iter().filter(|id| !current.contains(*id)).collect();
    KeyDiff {
        entered,
        retained,
        exited,
    }
}

/// Counts of one sync cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub entered: usize,
    pub retained: usize,
    pub exited: usize,
}

impl SyncReport {
    pub fn is_unchanged(&self) -> bool {
        self.entered == 0 && self.exited == 0
    }
}

/// Remembers which elements of each synced kind the surface holds.
#[derive(Debug, Default)]
pub struct RenderSync {
    tracked: IndexMap<ElementKind, IndexSet<ElementId>>,
    cycles: u64,
}

impl RenderSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cycles run since creation.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Keys currently held for `kind`.
    pub fn tracked(&self, kind: ElementKind) -> impl Iterator<Item = &ElementId> {
        self.tracked.get(&kind).into_iter().flatten()
    }

    /// Forgets every tracked element. Used after the surface was reset.
    pub fn reset(&mut self) {
        self.tracked.clear();
    }

    /// Runs one cycle: removes exited elements, creates entered ones and
    /// updates retained ones, kind by kind.
    pub fn sync<R: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut R,
        desired: Vec<(ElementId, ElementAttrs)>,
    ) -> SyncReport {
        let mut by_kind: IndexMap<ElementKind, IndexMap<ElementId, ElementAttrs>> = IndexMap::new();
        for (id, attrs) in desired {
            by_kind.entry(id.kind()).or_default().insert(id, attrs);
        }

        let mut report = SyncReport::default();
        surface.begin_cycle();

        for kind in ElementKind::SYNCED {
            let wanted = by_kind.shift_remove(&kind).unwrap_or_default();
            let current: IndexSet<ElementId> = wanted.keys().cloned().collect();
            let previous = self.tracked.get(&kind).cloned().unwrap_or_default();

            let changes = diff(&previous, &current);
            for id in &changes.exited {
                surface.remove(id);
            }
            for id in &changes.entered {
                surface.create(id, &wanted[*id]);
            }
            for id in &changes.retained {
                surface.update(id, &wanted[*id]);
            }

            report.entered += changes.entered.len();
            report.retained += changes.retained.len();
            report.exited += changes.exited.len();

            self.tracked.insert(kind, current);
        }

        surface.end_cycle();
        self.cycles += 1;

        debug!(
            entered = report.entered,
            retained = report.retained,
            exited = report.exited;
            "Synchronized surface"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use weft_core::{
        draw::MarkerDefinition,
        geometry::{Size, Transform},
        identifier::Key,
    };

    use super::*;
    use crate::surface::{HoverAttrs, Placement};

    #[derive(Default)]
    struct Log {
        calls: Vec<String>,
    }

    impl RenderSurface for Log {
        fn reset(&mut self, _size: Size, _zoomable: bool) {}

        fn define_marker(&mut self, _marker: &MarkerDefinition) {}

        fn begin_cycle(&mut self) {
            self.calls.push("begin".to_string());
        }

        fn end_cycle(&mut self) {
            self.calls.push("end".to_string());
        }

        fn create(&mut self, id: &ElementId, _attrs: &ElementAttrs) {
            self.calls.push(format!("create {id}"));
        }

        fn update(&mut self, id: &ElementId, _attrs: &ElementAttrs) {
            self.calls.push(format!("update {id}"));
        }

        fn remove(&mut self, id: &ElementId) {
            self.calls.push(format!("remove {id}"));
        }

        fn place(&mut self, _id: &ElementId, _placement: &Placement) {}

        fn zoom(&mut self, _transform: Transform) {}
    }

    fn hovers(keys: &[&str]) -> Vec<(ElementId, ElementAttrs)> {
        keys.iter()
            .map(|key| {
                (
                    ElementId::edge_hover(Key::new(key)),
                    ElementAttrs::EdgeHover(HoverAttrs::default()),
                )
            })
            .collect()
    }

    #[test]
    fn test_diff() {
        let previous: IndexSet<ElementId> = ["a", "b"]
            .iter()
            .map(|k| ElementId::node(Key::new(k)))
            .collect();
        let current: IndexSet<ElementId> = ["b", "c"]
            .iter()
            .map(|k| ElementId::node(Key::new(k)))
            .collect();

        let changes = diff(&previous, &current);
        assert_eq!(changes.entered, vec![&ElementId::node(Key::new("c"))]);
        assert_eq!(changes.retained, vec![&ElementId::node(Key::new("b"))]);
        assert_eq!(changes.exited, vec![&ElementId::node(Key::new("a"))]);
    }

    #[test]
    fn test_sync_enter_update_exit() {
        let mut sync = RenderSync::new();
        let mut surface = Log::default();

        let first = sync.sync(&mut surface, hovers(&["a", "b"]));
        assert_eq!(
            first,
            SyncReport {
                entered: 2,
                retained: 0,
                exited: 0
            }
        );

        surface.calls.clear();
        let second = sync.sync(&mut surface, hovers(&["b", "c"]));
        assert_eq!(
            second,
            SyncReport {
                entered: 1,
                retained: 1,
                exited: 1
            }
        );
        assert_eq!(
            surface.calls,
            vec![
                "begin",
                "remove edge-a-hover",
                "create edge-c-hover",
                "update edge-b-hover",
                "end",
            ]
        );
        assert_eq!(sync.cycles(), 2);
    }

    #[test]
    fn test_unchanged_cycle() {
        let mut sync = RenderSync::new();
        let mut surface = Log::default();

        sync.sync(&mut surface, hovers(&["a"]));
        let report = sync.sync(&mut surface, hovers(&["a"]));
        assert!(report.is_unchanged());
        assert_eq!(report.retained, 1);
    }

    #[test]
    fn test_reset_forgets_elements() {
        let mut sync = RenderSync::new();
        let mut surface = Log::default();

        sync.sync(&mut surface, hovers(&["a"]));
        sync.reset();
        assert_eq!(sync.tracked(ElementKind::EdgeHover).count(), 0);

        let report = sync.sync(&mut surface, hovers(&["a"]));
        assert_eq!(report.entered, 1);
    }
}
