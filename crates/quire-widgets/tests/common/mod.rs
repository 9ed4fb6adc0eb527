//! Shared helpers for integration tests.
//!
//! Each test file compiles separately, so some helpers look unused.

#![allow(dead_code)]

use quire_core::geometry::{Rect, Viewport};
use quire_layout::AnchorGeometry;
use quire_widgets::host::{CommandError, EditorCommand, HostEditor};

/// In-memory editor: one block of text with the caret at its end.
///
/// The block opens at document position 1, so the first character sits at
/// position 1 and the caret at `1 + text.chars().count()`.
#[derive(Debug, Default)]
pub struct TestEditor {
    pub text: String,
    pub selection: Option<AnchorGeometry>,
    pub caret: Option<AnchorGeometry>,
    pub focused: bool,
    pub surface: Rect,
    pub reject: bool,
    pub commands: Vec<EditorCommand>,
}

impl TestEditor {
    /// Focused editor with its surface at (100, 100), 600×120, and the caret
    /// at (120, 200).
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            caret: Some(AnchorGeometry::point(Rect::new(120.0, 200.0, 0.0, 18.0))),
            focused: true,
            surface: Rect::new(100.0, 100.0, 600.0, 120.0),
            ..Self::default()
        }
    }

    /// Same editor with a selection spanning x 400..500 on the line at y 300.
    pub fn with_selection(mut self) -> Self {
        self.selection = Some(AnchorGeometry::range(
            Rect::from_edges(400.0, 300.0, 400.0, 318.0),
            Rect::from_edges(500.0, 300.0, 500.0, 318.0),
        ));
        self.surface = Rect::new(100.0, 250.0, 600.0, 200.0);
        self
    }
}

impl HostEditor for TestEditor {
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
        1 + self.text.chars().count()
    }

    fn text_before_caret(&self) -> String {
        self.text.clone()
    }

    fn surface_bounds(&self) -> Rect {
        self.surface
    }

    fn dispatch(&mut self, command: EditorCommand) -> Result<(), CommandError> {
        if self.reject {
            return Err(CommandError::rejected("read-only document"));
        }
        if let EditorCommand::DeleteRange(range) = &command {
            let keep = range.start.saturating_sub(1);
            self.text = self.text.chars().take(keep).collect();
        }
        self.commands.push(command);
        Ok(())
    }
}

pub fn viewport() -> Viewport {
    Viewport::new(1000.0, 800.0)
}
