//! Retained scene elements and the reconciliation diff.
//!
//! The render state machine never draws directly. It describes the elements
//! it wants to exist, and [`reconcile`] turns that description into the
//! minimal list of [`Patch`]es needed to bring a [`Surface`] in line with it.

use crate::color::Rgb;
use crate::sample::Category;
use crate::surface::Surface;
use crate::transition::Lerp;
use std::time::Duration;

/// Identity of a retained element. Ordering is paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKey {
    Bar(Category),
    CutoffLine,
    CutoffLabel,
    Marker(Category),
}

/// Element family, used to scope a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Bar,
    Marker,
    CutoffLine,
    CutoffLabel,
}

impl ElementKey {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementKey::Bar(_) => ElementKind::Bar,
            ElementKey::Marker(_) => ElementKind::Marker,
            ElementKey::CutoffLine => ElementKind::CutoffLine,
            ElementKey::CutoffLabel => ElementKind::CutoffLabel,
        }
    }
}

/// Horizontal anchoring of a text element relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectElement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineElement {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: Rgb,
    pub stroke_width: f64,
    /// Dash and gap length, `None` for a solid stroke.
    pub dash: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
    pub fill: Rgb,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rect(RectElement),
    Line(LineElement),
    Text(TextElement),
}

impl Element {
    pub fn as_rect(&self) -> Option<&RectElement> {
        match self {
            Element::Rect(rect) => Some(rect),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&LineElement> {
        match self {
            Element::Line(line) => Some(line),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            Element::Text(text) => Some(text),
            _ => None,
        }
    }
}

// Non-numeric attributes (text, anchor, dash) take the target value as soon
// as the transition starts.
impl Lerp for Element {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        match (self, to) {
            (Element::Rect(a), Element::Rect(b)) => Element::Rect(RectElement {
                x: a.x.lerp(&b.x, t),
                y: a.y.lerp(&b.y, t),
                width: a.width.lerp(&b.width, t),
                height: a.height.lerp(&b.height, t),
                fill: a.fill.lerp(&b.fill, t),
            }),
            (Element::Line(a), Element::Line(b)) => Element::Line(LineElement {
                x1: a.x1.lerp(&b.x1, t),
                y1: a.y1.lerp(&b.y1, t),
                x2: a.x2.lerp(&b.x2, t),
                y2: a.y2.lerp(&b.y2, t),
                stroke: a.stroke.lerp(&b.stroke, t),
                stroke_width: a.stroke_width.lerp(&b.stroke_width, t),
                dash: b.dash,
            }),
            (Element::Text(a), Element::Text(b)) => Element::Text(TextElement {
                x: a.x.lerp(&b.x, t),
                y: a.y.lerp(&b.y, t),
                anchor: b.anchor,
                fill: a.fill.lerp(&b.fill, t),
                content: b.content.clone(),
            }),
            _ => to.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOp {
    Enter,
    Update,
    Exit,
}

/// One change to apply to a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub op: PatchOp,
    pub key: ElementKey,
    /// Target element; `None` for [`PatchOp::Exit`].
    pub element: Option<Element>,
    pub duration: Duration,
}

impl Patch {
    pub fn enter(key: ElementKey, element: Element) -> Self {
        Self {
            op: PatchOp::Enter,
            key,
            element: Some(element),
            duration: Duration::ZERO,
        }
    }

    pub fn update(key: ElementKey, element: Element, duration: Duration) -> Self {
        Self {
            op: PatchOp::Update,
            key,
            element: Some(element),
            duration,
        }
    }

    pub fn exit(key: ElementKey) -> Self {
        Self {
            op: PatchOp::Exit,
            key,
            element: None,
            duration: Duration::ZERO,
        }
    }
}

/// An element the caller wants to exist after reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Desired {
    pub key: ElementKey,
    pub element: Element,
    /// Transition length when the element already exists.
    pub duration: Duration,
}

/// Diff `desired` against what `surface` currently holds.
///
/// Only elements whose kind is listed in `scope` are considered for removal,
/// so a pass over the bar never touches the cut-off line. Elements already at
/// their desired state produce no patch.
pub fn reconcile<S: Surface + ?Sized>(
    surface: &S,
    scope: &[ElementKind],
    desired: &[Desired],
) -> Vec<Patch> {
    let mut patches = Vec::new();

    for want in desired {
        match surface.target(&want.key) {
            None => patches.push(Patch::enter(want.key, want.element.clone())),
            Some(current) if *current != want.element => {
                patches.push(Patch::update(want.key, want.element.clone(), want.duration))
            }
            Some(_) => {}
        }
    }

    for key in surface.keys() {
        if scope.contains(&key.kind()) && !desired.iter().any(|want| want.key == key) {
            patches.push(Patch::exit(key));
        }
    }

    patches
}
