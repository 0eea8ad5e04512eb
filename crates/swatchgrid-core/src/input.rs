//! Input model for document-level keyboard and pointer events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a host element (anchor buttons, overlay containers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub Uuid);

impl ElementId {
    /// Mint a fresh element id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

/// Hit-test path of a click: innermost element first, outermost last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementPath(Vec<ElementId>);

impl ElementPath {
    /// Create a path from the innermost element outwards.
    pub fn new(path: Vec<ElementId>) -> Self {
        Self(path)
    }

    /// A path consisting of a single element.
    pub fn single(id: ElementId) -> Self {
        Self(vec![id])
    }

    /// The element the click actually landed on.
    pub fn target(&self) -> Option<ElementId> {
        self.0.first().copied()
    }

    /// Whether the element appears anywhere on the path.
    pub fn contains(&self, id: ElementId) -> bool {
        self.0.contains(&id)
    }

    /// Whether the target is a strict descendant of `ancestor`.
    pub fn is_descendant_of(&self, ancestor: ElementId) -> bool {
        self.0.iter().skip(1).any(|&id| id == ancestor)
    }

    /// Iterate from the innermost element outwards.
    pub fn iter(&self) -> impl Iterator<Item = &ElementId> {
        self.0.iter()
    }
}

impl From<Vec<ElementId>> for ElementPath {
    fn from(path: Vec<ElementId>) -> Self {
        Self(path)
    }
}

/// Logical keys the overlay reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Escape,
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Other(String),
}

impl Key {
    /// Map a DOM-style key name to a key.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" | "Return" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "ArrowDown" | "Down" => Self::ArrowDown,
            other => Self::Other(other.to_string()),
        }
    }

    /// Keys intercepted by grid navigation while the overlay is visible.
    pub fn is_grid_navigation(&self) -> bool {
        matches!(
            self,
            Self::Enter | Self::ArrowLeft | Self::ArrowUp | Self::ArrowRight | Self::ArrowDown
        )
    }
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Down(Key),
    Up(Key),
}

/// Pointer event type.
///
/// Cell events are addressed to an overlay by its container id; `Click`
/// is the document-level click every overlay observes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEvent {
    CellEnter { overlay: ElementId, index: usize },
    CellLeave { overlay: ElementId, index: usize },
    CellClick { overlay: ElementId, index: usize },
    Click(ElementPath),
}

/// Any event routed through the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
}

impl From<KeyEvent> for DocumentEvent {
    fn from(event: KeyEvent) -> Self {
        Self::Key(event)
    }
}

impl From<PointerEvent> for DocumentEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

/// Whether an event continues to lower-priority handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    /// The handler claimed the event.
    Stop,
}

impl Propagation {
    pub fn is_stopped(self) -> bool {
        self == Self::Stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("Enter"), Key::Enter);
        assert_eq!(Key::from_name("Esc"), Key::Escape);
        assert_eq!(Key::from_name("Left"), Key::ArrowLeft);
        assert_eq!(Key::from_name("ArrowDown"), Key::ArrowDown);
        assert_eq!(Key::from_name("a"), Key::Other("a".to_string()));
    }

    #[test]
    fn test_grid_navigation_keys() {
        assert!(Key::Enter.is_grid_navigation());
        assert!(Key::ArrowUp.is_grid_navigation());
        assert!(!Key::Escape.is_grid_navigation());
        assert!(!Key::Other("Tab".to_string()).is_grid_navigation());
    }

    #[test]
    fn test_element_path() {
        let inner = ElementId::new();
        let anchor = ElementId::new();
        let body = ElementId::new();
        let path = ElementPath::new(vec![inner, anchor, body]);

        assert_eq!(path.target(), Some(inner));
        assert!(path.contains(anchor));
        assert!(path.is_descendant_of(anchor));
        assert!(!path.is_descendant_of(inner));
        assert!(!ElementPath::default().contains(inner));
    }
}
