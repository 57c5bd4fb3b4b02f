//! Drawing surfaces.
//!
//! A [`Surface`] is the retained-mode target the render state machine writes
//! to. [`RetainedSurface`] keeps every element with its running transition
//! so a host can sample the animated scene at any instant.

use crate::scene::{Element, ElementKey, ElementKind, Patch, PatchOp};
use crate::transition::Transition;
use std::collections::BTreeMap;
use std::time::Instant;

/// Retained-mode drawing target with fixed logical dimensions.
pub trait Surface {
    fn width(&self) -> f64;

    fn height(&self) -> f64;

    /// The settled (target) state of an element, if it exists.
    fn target(&self, key: &ElementKey) -> Option<&Element>;

    /// Keys of all elements currently on the surface, in paint order.
    fn keys(&self) -> Vec<ElementKey>;

    fn apply(&mut self, patch: Patch, now: Instant);
}

/// In-memory surface holding each element's transition.
#[derive(Debug, Clone)]
pub struct RetainedSurface {
    width: f64,
    height: f64,
    elements: BTreeMap<ElementKey, Transition<Element>>,
}

impl RetainedSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: BTreeMap::new(),
        }
    }

    /// Interpolated state of one element at `now`.
    pub fn element_at(&self, key: &ElementKey, now: Instant) -> Option<Element> {
        self.elements.get(key).map(|tr| tr.value_at(now))
    }

    /// Every element interpolated at `now`, in paint order.
    pub fn elements_at(&self, now: Instant) -> Vec<(ElementKey, Element)> {
        self.elements
            .iter()
            .map(|(key, tr)| (*key, tr.value_at(now)))
            .collect()
    }

    /// Whether any element is still mid-transition.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.elements.values().any(|tr| !tr.is_finished(now))
    }

    /// Jump every running transition to its end state.
    pub fn settle(&mut self) {
        for tr in self.elements.values_mut() {
            tr.finish();
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn count(&self, kind: ElementKind) -> usize {
        self.elements.keys().filter(|key| key.kind() == kind).count()
    }
}

impl Surface for RetainedSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn target(&self, key: &ElementKey) -> Option<&Element> {
        self.elements.get(key).map(|tr| tr.target())
    }

    fn keys(&self) -> Vec<ElementKey> {
        self.elements.keys().copied().collect()
    }

    fn apply(&mut self, patch: Patch, now: Instant) {
        match (patch.op, patch.element) {
            (PatchOp::Exit, _) => {
                self.elements.remove(&patch.key);
            }
            (PatchOp::Enter, Some(element)) => {
                self.elements
                    .insert(patch.key, Transition::settled(element, now));
            }
            (PatchOp::Update, Some(element)) => {
                let next = match self.elements.get(&patch.key) {
                    Some(current) => current.retarget(element, patch.duration, now),
                    None => Transition::settled(element, now),
                };
                self.elements.insert(patch.key, next);
            }
            (_, None) => {
                tracing::warn!(key = ?patch.key, op = ?patch.op, "patch without element ignored");
            }
        }
    }
}
