//! Debounced switch input.

use blockline_core::Switch;

/// One debounced edge of a panel control.
///
/// The switch collaborator owns debouncing and reports each change once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchEdge {
    /// Control that changed.
    pub switch: Switch,
    /// `true` on press, `false` on release.
    pub pressed: bool,
}

impl SwitchEdge {
    /// Press edge of `switch`.
    pub fn press(switch: Switch) -> Self {
        Self { switch, pressed: true }
    }

    /// Release edge of `switch`.
    pub fn release(switch: Switch) -> Self {
        Self { switch, pressed: false }
    }
}
