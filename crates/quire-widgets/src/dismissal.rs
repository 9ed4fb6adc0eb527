#![forbid(unsafe_code)]

//! Outside-pointer dismissal.
//!
//! While its panel is shown, a [`DismissalController`] holds a global
//! pointer-down listener. A press outside both the panel and the editor
//! surface hides the panel. For a caret menu opened by a trigger character,
//! dismissal also removes that character if it is still the last thing
//! before the caret, so clicking away does not leave a stray `/` behind.
//!
//! The listener is released on every path to `Hidden`: outside click,
//! [`sync`](DismissalController::sync) after the panel hid for any other
//! reason, and [`release`](DismissalController::release) at teardown.

use quire_core::event::{Event, PointerEventKind};
use quire_core::geometry::{Point, Viewport};
use quire_core::scope::{HostGlobals, ListenerScope, ListenerSet};

use crate::host::{EditorCommand, HostEditor, dispatch_quietly};
use crate::positioner::{FloatingPanel, PanelInput, PanelResponse, PanelTrigger};

/// Result of a pointer-down seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissalOutcome {
    /// The controller is not armed; the panel is hidden.
    Ignored,
    /// Inside the panel or the editor surface; nothing happens.
    Inside,
    /// Outside both; the panel was dismissed.
    Dismissed {
        /// Whether the trigger character before the caret was deleted.
        trigger_removed: bool,
    },
}

/// Watches for pointer-downs outside a floating panel.
#[derive(Debug, Default)]
pub struct DismissalController {
    trigger: Option<char>,
    listener: Option<ListenerScope>,
}

impl DismissalController {
    /// Plain dismissal, no trigger cleanup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dismissal that also removes `trigger` from before the caret.
    #[must_use]
    pub fn with_trigger(trigger: char) -> Self {
        Self {
            trigger: Some(trigger),
            listener: None,
        }
    }

    pub fn trigger(&self) -> Option<char> {
        self.trigger
    }

    /// Whether the pointer-down listener is installed.
    pub fn is_armed(&self) -> bool {
        self.listener.is_some()
    }

    /// Arm while `panel` is shown, disarm once it is hidden.
    pub fn sync(&mut self, panel: &FloatingPanel, globals: &mut HostGlobals) {
        match (panel.is_shown(), self.listener.is_some()) {
            (true, false) => self.listener = Some(globals.listen(ListenerSet::POINTER_DOWN)),
            (false, true) => self.release(globals),
            _ => {}
        }
    }

    /// Drop the listener, if held.
    pub fn release(&mut self, globals: &mut HostGlobals) {
        if let Some(scope) = self.listener.take() {
            globals.unlisten(scope);
        }
    }

    /// Handle a global pointer-down at `point` (viewport coordinates).
    pub fn on_pointer_down<H: HostEditor + ?Sized>(
        &mut self,
        point: Point,
        panel: &mut FloatingPanel,
        host: &mut H,
        viewport: &Viewport,
        globals: &mut HostGlobals,
    ) -> DismissalOutcome {
        if !self.is_armed() || !panel.is_shown() {
            return DismissalOutcome::Ignored;
        }

        let at = viewport.to_document(point);
        let in_panel = panel.panel_rect().is_some_and(|rect| rect.contains(at));
        let in_surface = viewport
            .rect_to_document(host.surface_bounds())
            .contains(at);
        if in_panel || in_surface {
            return DismissalOutcome::Inside;
        }

        panel.dismiss();
        self.release(globals);
        let trigger_removed = self.remove_trigger(host);
        quire_core::debug!(kind = ?panel.kind(), trigger_removed, "panel dismissed by outside press");
        DismissalOutcome::Dismissed { trigger_removed }
    }

    fn remove_trigger<H: HostEditor + ?Sized>(&self, host: &mut H) -> bool {
        let Some(trigger) = self.trigger else {
            return false;
        };
        if host.text_before_caret().chars().next_back() != Some(trigger) {
            return false;
        }
        let caret = host.caret_offset();
        let Some(start) = caret.checked_sub(1) else {
            return false;
        };
        quire_core::trace!(caret, %trigger, "removing trigger character");
        dispatch_quietly(host, "dismissal.remove_trigger", EditorCommand::DeleteRange(start..caret))
    }
}

/// Feed one host event to a panel and its dismissal controller.
///
/// Pointer-downs go to dismissal, triggers to the positioner. The
/// controller is re-synced afterwards so its listener tracks visibility.
pub(crate) fn route_panel_event<H: HostEditor + ?Sized>(
    panel: &mut FloatingPanel,
    dismissal: &mut DismissalController,
    event: &Event,
    input: PanelInput,
    host: &mut H,
    viewport: &Viewport,
    globals: &mut HostGlobals,
) -> PanelResponse {
    let response = match event {
        Event::Pointer(pointer) if matches!(pointer.kind, PointerEventKind::Down(_)) => {
            PanelResponse::Dismissal(dismissal.on_pointer_down(
                pointer.position(),
                panel,
                host,
                viewport,
                globals,
            ))
        }
        _ => match PanelTrigger::from_event(event) {
            Some(trigger) => PanelResponse::Transition(panel.update(trigger, input, viewport)),
            None => PanelResponse::Ignored,
        },
    };
    dismissal.sync(panel, globals);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CommandError;
    use crate::host::testing::ScriptedEditor;
    use crate::positioner::{PanelKind, PanelState};
    use quire_core::geometry::{Rect, Size};
    use quire_layout::AnchorGeometry;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 800.0)
    }

    fn caret() -> AnchorGeometry {
        AnchorGeometry::point(Rect::new(120.0, 200.0, 0.0, 18.0))
    }

    fn editor(text: &str) -> ScriptedEditor {
        ScriptedEditor {
            caret: Some(caret()),
            focused: true,
            text: text.to_string(),
            surface: Rect::new(100.0, 100.0, 600.0, 120.0),
            ..ScriptedEditor::default()
        }
    }

    /// Caret menu shown below the caret at (120, 226), 200×40.
    fn shown_menu(globals: &mut HostGlobals, host: &ScriptedEditor) -> FloatingPanel {
        let mut panel = FloatingPanel::new(PanelKind::CaretMenu);
        panel.set_measured_size(Size::new(200.0, 40.0));
        panel.mount(globals, PanelInput::default(), &viewport());
        panel.update(
            PanelTrigger::SelectionChanged,
            PanelInput::from_caret(host, true),
            &viewport(),
        );
        assert_eq!(panel.state(), PanelState::Visible);
        panel
    }

    #[test]
    fn sync_arms_and_disarms_with_panel() {
        let mut globals = HostGlobals::new();
        let host = editor("/");
        let mut panel = shown_menu(&mut globals, &host);
        let mut dismissal = DismissalController::new();

        dismissal.sync(&panel, &mut globals);
        assert!(dismissal.is_armed());
        assert_eq!(globals.listeners().count(ListenerSet::POINTER_DOWN), 1);

        dismissal.sync(&panel, &mut globals);
        assert_eq!(globals.listeners().count(ListenerSet::POINTER_DOWN), 1);

        panel.update(
            PanelTrigger::SelectionChanged,
            PanelInput::from_caret(&host, false),
            &viewport(),
        );
        dismissal.sync(&panel, &mut globals);
        assert!(!dismissal.is_armed());
        assert_eq!(globals.listeners().count(ListenerSet::POINTER_DOWN), 0);
        panel.unmount(&mut globals);
        assert!(globals.is_quiescent());
    }

    #[test]
    fn press_inside_panel_or_surface_keeps_panel() {
        let mut globals = HostGlobals::new();
        let mut host = editor("/");
        let mut panel = shown_menu(&mut globals, &host);
        let mut dismissal = DismissalController::with_trigger('/');
        dismissal.sync(&panel, &mut globals);

        let menu = panel.panel_rect().expect("shown");
        let in_menu = Point::new(menu.left() + 5.0, menu.top() + 5.0);
        assert!(!host.surface.contains(in_menu));
        let outcome =
            dismissal.on_pointer_down(in_menu, &mut panel, &mut host, &viewport(), &mut globals);
        assert_eq!(outcome, DismissalOutcome::Inside);

        let in_surface = Point::new(650.0, 150.0);
        let outcome =
            dismissal.on_pointer_down(in_surface, &mut panel, &mut host, &viewport(), &mut globals);
        assert_eq!(outcome, DismissalOutcome::Inside);
        assert!(panel.is_shown());
        assert!(host.dispatched.is_empty());
    }

    #[test]
    fn press_outside_dismisses_and_removes_trigger() {
        let mut globals = HostGlobals::new();
        let mut host = editor("/");
        let mut panel = shown_menu(&mut globals, &host);
        let mut dismissal = DismissalController::with_trigger('/');
        dismissal.sync(&panel, &mut globals);

        let outcome = dismissal.on_pointer_down(
            Point::new(900.0, 700.0),
            &mut panel,
            &mut host,
            &viewport(),
            &mut globals,
        );
        assert_eq!(outcome, DismissalOutcome::Dismissed { trigger_removed: true });
        assert_eq!(panel.state(), PanelState::Hidden);
        assert_eq!(host.dispatched, vec![EditorCommand::DeleteRange(1..2)]);
        assert!(!dismissal.is_armed());

        panel.unmount(&mut globals);
        assert!(globals.is_quiescent());
    }

    #[test]
    fn trigger_kept_when_no_longer_last() {
        let mut globals = HostGlobals::new();
        let mut host = editor("/he");
        let mut panel = shown_menu(&mut globals, &host);
        let mut dismissal = DismissalController::with_trigger('/');
        dismissal.sync(&panel, &mut globals);

        let outcome = dismissal.on_pointer_down(
            Point::new(900.0, 700.0),
            &mut panel,
            &mut host,
            &viewport(),
            &mut globals,
        );
        assert_eq!(outcome, DismissalOutcome::Dismissed { trigger_removed: false });
        assert!(host.dispatched.is_empty());
        panel.unmount(&mut globals);
    }

    #[test]
    fn failed_trigger_removal_is_swallowed() {
        let mut globals = HostGlobals::new();
        let mut host = editor("/");
        host.fail_with = Some(CommandError::rejected("read-only"));
        let mut panel = shown_menu(&mut globals, &host);
        let mut dismissal = DismissalController::with_trigger('/');
        dismissal.sync(&panel, &mut globals);

        let outcome = dismissal.on_pointer_down(
            Point::new(900.0, 700.0),
            &mut panel,
            &mut host,
            &viewport(),
            &mut globals,
        );
        assert_eq!(outcome, DismissalOutcome::Dismissed { trigger_removed: false });
        assert_eq!(panel.state(), PanelState::Hidden);
        panel.unmount(&mut globals);
        assert!(globals.is_quiescent());
    }

    #[test]
    fn hit_test_accounts_for_scroll() {
        let mut globals = HostGlobals::new();
        let mut host = editor("");
        let scrolled = viewport().with_scroll(0.0, 1000.0);
        let mut panel = FloatingPanel::new(PanelKind::CaretMenu);
        panel.set_measured_size(Size::new(200.0, 40.0));
        panel.mount(&mut globals, PanelInput::default(), &scrolled);
        panel.update(
            PanelTrigger::SelectionChanged,
            PanelInput::from_caret(&host, true),
            &scrolled,
        );
        let mut dismissal = DismissalController::new();
        dismissal.sync(&panel, &mut globals);

        // Client (130, 230) is document (130, 1230): on the menu, below the surface.
        let outcome = dismissal.on_pointer_down(
            Point::new(130.0, 230.0),
            &mut panel,
            &mut host,
            &scrolled,
            &mut globals,
        );
        assert_eq!(outcome, DismissalOutcome::Inside);
        panel.unmount(&mut globals);
        dismissal.release(&mut globals);
        assert!(globals.is_quiescent());
    }

    #[test]
    fn unarmed_controller_ignores_presses() {
        let mut globals = HostGlobals::new();
        let mut host = editor("/");
        let mut panel = shown_menu(&mut globals, &host);
        let mut dismissal = DismissalController::with_trigger('/');
        let outcome = dismissal.on_pointer_down(
            Point::new(900.0, 700.0),
            &mut panel,
            &mut host,
            &viewport(),
            &mut globals,
        );
        assert_eq!(outcome, DismissalOutcome::Ignored);
        assert!(panel.is_shown());
        panel.unmount(&mut globals);
    }
}
