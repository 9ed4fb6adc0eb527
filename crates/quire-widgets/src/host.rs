#![forbid(unsafe_code)]

//! The editor engine, as seen from the panels.
//!
//! Quire never owns the document. Everything it needs from the editor goes
//! through [`HostEditor`]: anchor geometry for the floating panels, focus,
//! the text before the caret (for trigger detection), and a way to dispatch
//! content mutations. Dispatch is fire-and-forget from Quire's side; a
//! failure is logged where it happens and never surfaces to the host.

use std::fmt;
use std::ops::Range;

use quire_core::geometry::Rect;
use quire_layout::AnchorGeometry;

use crate::embed::Embed;

/// A content mutation requested by a panel or drop handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    /// Delete the document range (host positions, end exclusive).
    DeleteRange(Range<usize>),
    /// Replace the current selection with an embedded element.
    ReplaceSelection(Embed),
}

/// Why the host refused a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The host understood the command but declined to apply it.
    Rejected { reason: String },
    /// The host has no way to apply this kind of command (for example, no
    /// node type registered for the embed).
    Unavailable,
}

impl CommandError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { reason } => write!(f, "editor rejected command: {reason}"),
            Self::Unavailable => write!(f, "editor cannot apply this command"),
        }
    }
}

impl std::error::Error for CommandError {}

/// The editor collaborator.
///
/// Geometry is reported in viewport (client) coordinates.
pub trait HostEditor {
    /// Anchor for the current selection, or `None` when it is empty.
    fn selection_anchor(&self) -> Option<AnchorGeometry>;

    /// Anchor for the caret position.
    fn caret_anchor(&self) -> Option<AnchorGeometry>;

    /// Whether the editable surface has focus.
    fn is_focused(&self) -> bool;

    /// Document position of the caret.
    fn caret_offset(&self) -> usize;

    /// Text of the current block, from its start up to the caret.
    ///
    /// Each `char` is one document position.
    fn text_before_caret(&self) -> String;

    /// Bounds of the editable surface.
    fn surface_bounds(&self) -> Rect;

    /// Apply a content mutation.
    fn dispatch(&mut self, command: EditorCommand) -> Result<(), CommandError>;
}

/// Dispatch `command`, logging and dropping any failure.
///
/// Returns whether the host accepted it.
pub(crate) fn dispatch_quietly<H: HostEditor + ?Sized>(
    host: &mut H,
    site: &'static str,
    command: EditorCommand,
) -> bool {
    match host.dispatch(command) {
        Ok(()) => true,
        Err(err) => {
            quire_core::logging::swallowed(site, &err);
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Scriptable editor used by unit tests.
    #[derive(Debug, Default)]
    pub struct ScriptedEditor {
        pub selection: Option<AnchorGeometry>,
        pub caret: Option<AnchorGeometry>,
        pub focused: bool,
        pub text: String,
        pub surface: Rect,
        pub fail_with: Option<CommandError>,
        pub dispatched: Vec<EditorCommand>,
    }

    impl HostEditor for ScriptedEditor {
        fn selection_anchor(&self) -> Option<AnchorGeometry> {
            self.selection
        }

        fn caret_anchor(&self) -> Option<AnchorGeometry> {
            self.caret
        }

        fn is_focused(&self) -> bool {
            self.focused
        }

        fn caret_offset(&self) -> usize {
            // Block starts at position 1, like a document whose first node
            // opens at 0.
            1 + self.text.chars().count()
        }

        fn text_before_caret(&self) -> String {
            self.text.clone()
        }

        fn surface_bounds(&self) -> Rect {
            self.surface
        }

        fn dispatch(&mut self, command: EditorCommand) -> Result<(), CommandError> {
            if let Some(err) = self.fail_with.clone() {
                return Err(err);
            }
            if let EditorCommand::DeleteRange(range) = &command {
                let keep = range.start.saturating_sub(1);
                self.text = self.text.chars().take(keep).collect();
            }
            self.dispatched.push(command);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedEditor;
    use super::*;

    #[test]
    fn dispatch_quietly_reports_success() {
        let mut host = ScriptedEditor::default();
        assert!(dispatch_quietly(&mut host, "test", EditorCommand::DeleteRange(0..0)));
        assert_eq!(host.dispatched.len(), 1);
    }

    #[test]
    fn dispatch_quietly_swallows_failure() {
        let mut host = ScriptedEditor {
            fail_with: Some(CommandError::Unavailable),
            ..ScriptedEditor::default()
        };
        assert!(!dispatch_quietly(&mut host, "test", EditorCommand::DeleteRange(0..1)));
        assert!(host.dispatched.is_empty());
    }

    #[test]
    fn command_error_display() {
        assert_eq!(
            CommandError::rejected("read-only").to_string(),
            "editor rejected command: read-only"
        );
        assert_eq!(
            CommandError::Unavailable.to_string(),
            "editor cannot apply this command"
        );
    }
}
