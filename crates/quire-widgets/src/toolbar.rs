#![forbid(unsafe_code)]

//! Selection-anchored formatting toolbar.
//!
//! [`SelectionToolbar`] pairs a [`FloatingPanel`] of kind
//! [`PanelKind::Toolbar`] with a [`DismissalController`] and owns the
//! toolbar's items. Items are either leaves carrying an action or groups
//! that open a submenu. At most one submenu is open, and it closes whenever
//! the toolbar hides.
//!
//! The action type `A` is the host's: a command enum, a closure id, anything
//! `Clone`. The toolbar never runs actions itself; activation hands them back.

use quire_core::event::Event;
use quire_core::geometry::{Size, Viewport};
use quire_core::scope::HostGlobals;
use quire_layout::{PlacementConfig, PlacementConfigError};

use crate::dismissal::{DismissalController, route_panel_event};
use crate::host::HostEditor;
use crate::positioner::{
    FloatingPanel, PanelInput, PanelKind, PanelResponse, PanelTransition, PanelView,
};

/// One toolbar button.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarItem<A> {
    pub label: String,
    pub tooltip: Option<String>,
    pub action: Option<A>,
    pub submenu: Vec<ToolbarItem<A>>,
}

impl<A> ToolbarItem<A> {
    /// A button that yields `action` when activated.
    #[must_use]
    pub fn leaf(label: impl Into<String>, action: A) -> Self {
        Self {
            label: label.into(),
            tooltip: None,
            action: Some(action),
            submenu: Vec::new(),
        }
    }

    /// A button that toggles a submenu of `items`.
    #[must_use]
    pub fn group(label: impl Into<String>, items: Vec<ToolbarItem<A>>) -> Self {
        Self {
            label: label.into(),
            tooltip: None,
            action: None,
            submenu: items,
        }
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn has_submenu(&self) -> bool {
        !self.submenu.is_empty()
    }
}

/// Result of activating a toolbar item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarActivation<A> {
    /// The item's action; any open submenu was closed.
    Action(A),
    SubmenuOpened(usize),
    SubmenuClosed(usize),
    /// No such item, or it carries nothing to do.
    Inert,
}

/// Floating toolbar over the current selection.
#[derive(Debug)]
pub struct SelectionToolbar<A> {
    panel: FloatingPanel,
    dismissal: DismissalController,
    items: Vec<ToolbarItem<A>>,
    open_submenu: Option<usize>,
}

impl<A: Clone> SelectionToolbar<A> {
    #[must_use]
    pub fn new(items: Vec<ToolbarItem<A>>) -> Self {
        Self {
            panel: FloatingPanel::new(PanelKind::Toolbar),
            dismissal: DismissalController::new(),
            items,
            open_submenu: None,
        }
    }

    pub fn with_config(
        items: Vec<ToolbarItem<A>>,
        config: PlacementConfig,
    ) -> Result<Self, PlacementConfigError> {
        Ok(Self {
            panel: FloatingPanel::with_config(PanelKind::Toolbar, config)?,
            ..Self::new(items)
        })
    }

    pub fn items(&self) -> &[ToolbarItem<A>] {
        &self.items
    }

    pub fn panel(&self) -> &FloatingPanel {
        &self.panel
    }

    pub fn view(&self) -> PanelView {
        self.panel.view()
    }

    /// Index of the group whose submenu is open.
    pub fn open_submenu(&self) -> Option<usize> {
        self.open_submenu
    }

    /// Whether the outside-press listener is installed.
    pub fn is_armed(&self) -> bool {
        self.dismissal.is_armed()
    }

    pub fn set_measured_size(&mut self, size: Size) {
        self.panel.set_measured_size(size);
    }

    pub fn mount<H: HostEditor + ?Sized>(
        &mut self,
        host: &H,
        viewport: &Viewport,
        globals: &mut HostGlobals,
    ) -> PanelTransition {
        let transition = self
            .panel
            .mount(globals, PanelInput::from_selection(host), viewport);
        self.settle(globals);
        transition
    }

    pub fn handle_event<H: HostEditor + ?Sized>(
        &mut self,
        event: &Event,
        host: &mut H,
        viewport: &Viewport,
        globals: &mut HostGlobals,
    ) -> PanelResponse {
        let input = PanelInput::from_selection(host);
        let response = route_panel_event(
            &mut self.panel,
            &mut self.dismissal,
            event,
            input,
            host,
            viewport,
            globals,
        );
        self.settle(globals);
        response
    }

    /// Deferred post-mount recompute.
    pub fn tick<H: HostEditor + ?Sized>(
        &mut self,
        host: &H,
        viewport: &Viewport,
        globals: &mut HostGlobals,
    ) -> PanelTransition {
        let transition = self.panel.tick(PanelInput::from_selection(host), viewport);
        self.settle(globals);
        transition
    }

    pub fn unmount(&mut self, globals: &mut HostGlobals) -> PanelTransition {
        self.dismissal.release(globals);
        self.open_submenu = None;
        self.panel.unmount(globals)
    }

    /// Activate the top-level item at `index`.
    ///
    /// A group toggles its submenu (closing any other); a leaf yields its
    /// action and closes the open submenu.
    pub fn activate(&mut self, index: usize) -> ToolbarActivation<A> {
        if !self.panel.is_shown() {
            return ToolbarActivation::Inert;
        }
        let Some(item) = self.items.get(index) else {
            return ToolbarActivation::Inert;
        };
        if item.has_submenu() {
            return if self.open_submenu == Some(index) {
                self.open_submenu = None;
                ToolbarActivation::SubmenuClosed(index)
            } else {
                self.open_submenu = Some(index);
                ToolbarActivation::SubmenuOpened(index)
            };
        }
        match &item.action {
            Some(action) => {
                let action = action.clone();
                self.open_submenu = None;
                ToolbarActivation::Action(action)
            }
            None => ToolbarActivation::Inert,
        }
    }

    /// Activate entry `child` of the open submenu belonging to `parent`.
    pub fn activate_submenu(&mut self, parent: usize, child: usize) -> ToolbarActivation<A> {
        if self.open_submenu != Some(parent) {
            return ToolbarActivation::Inert;
        }
        let action = self
            .items
            .get(parent)
            .and_then(|group| group.submenu.get(child))
            .and_then(|entry| entry.action.clone());
        match action {
            Some(action) => {
                self.open_submenu = None;
                ToolbarActivation::Action(action)
            }
            None => ToolbarActivation::Inert,
        }
    }

    fn settle(&mut self, globals: &mut HostGlobals) {
        self.dismissal.sync(&self.panel, globals);
        if !self.panel.is_shown() {
            self.open_submenu = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dismissal::DismissalOutcome;
    use crate::host::testing::ScriptedEditor;
    use crate::positioner::{PanelState, PanelTrigger};
    use quire_core::event::{PointerButton, PointerEventKind};
    use quire_core::geometry::Rect;
    use quire_layout::AnchorGeometry;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Format {
        Bold,
        Italic,
        Heading(u8),
    }

    fn items() -> Vec<ToolbarItem<Format>> {
        vec![
            ToolbarItem::leaf("B", Format::Bold).with_tooltip("Bold"),
            ToolbarItem::leaf("I", Format::Italic),
            ToolbarItem::group(
                "H",
                vec![
                    ToolbarItem::leaf("H1", Format::Heading(1)),
                    ToolbarItem::leaf("H2", Format::Heading(2)),
                ],
            ),
        ]
    }

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 800.0)
    }

    fn editor() -> ScriptedEditor {
        ScriptedEditor {
            selection: Some(AnchorGeometry::range(
                Rect::from_edges(400.0, 300.0, 400.0, 318.0),
                Rect::from_edges(500.0, 300.0, 500.0, 318.0),
            )),
            focused: true,
            surface: Rect::new(100.0, 250.0, 600.0, 200.0),
            ..ScriptedEditor::default()
        }
    }

    fn shown(globals: &mut HostGlobals, host: &ScriptedEditor) -> SelectionToolbar<Format> {
        let mut toolbar = SelectionToolbar::new(items());
        toolbar.set_measured_size(Size::new(200.0, 40.0));
        toolbar.mount(host, &viewport(), globals);
        assert_eq!(toolbar.panel().state(), PanelState::Visible);
        toolbar
    }

    #[test]
    fn mount_with_selection_shows_and_arms() {
        let mut globals = HostGlobals::new();
        let host = editor();
        let mut toolbar = shown(&mut globals, &host);
        assert!(toolbar.is_armed());
        assert!(toolbar.view().visible);
        toolbar.unmount(&mut globals);
        assert!(globals.is_quiescent());
    }

    #[test]
    fn leaf_yields_action() {
        let mut globals = HostGlobals::new();
        let host = editor();
        let mut toolbar = shown(&mut globals, &host);
        assert_eq!(toolbar.activate(0), ToolbarActivation::Action(Format::Bold));
        assert_eq!(toolbar.items()[0].tooltip.as_deref(), Some("Bold"));
        assert_eq!(toolbar.activate(9), ToolbarActivation::Inert);
        toolbar.unmount(&mut globals);
    }

    #[test]
    fn group_toggles_submenu_and_leaf_closes_it() {
        let mut globals = HostGlobals::new();
        let host = editor();
        let mut toolbar = shown(&mut globals, &host);

        assert_eq!(toolbar.activate(2), ToolbarActivation::SubmenuOpened(2));
        assert_eq!(toolbar.open_submenu(), Some(2));
        assert_eq!(toolbar.activate(2), ToolbarActivation::SubmenuClosed(2));
        assert_eq!(toolbar.open_submenu(), None);

        toolbar.activate(2);
        assert_eq!(toolbar.activate(1), ToolbarActivation::Action(Format::Italic));
        assert_eq!(toolbar.open_submenu(), None);

        toolbar.activate(2);
        assert_eq!(
            toolbar.activate_submenu(2, 1),
            ToolbarActivation::Action(Format::Heading(2))
        );
        assert_eq!(toolbar.open_submenu(), None);
        assert_eq!(toolbar.activate_submenu(2, 0), ToolbarActivation::Inert);
        toolbar.unmount(&mut globals);
    }

    #[test]
    fn hiding_closes_submenu_and_disarms() {
        let mut globals = HostGlobals::new();
        let mut host = editor();
        let mut toolbar = shown(&mut globals, &host);
        toolbar.activate(2);

        host.focused = false;
        let response =
            toolbar.handle_event(&Event::Focus(false), &mut host, &viewport(), &mut globals);
        assert!(matches!(
            response,
            PanelResponse::Transition(t) if t.to == PanelState::Hidden
                && t.cause == crate::positioner::PanelCause::Trigger(PanelTrigger::FocusChanged)
        ));
        assert_eq!(toolbar.open_submenu(), None);
        assert!(!toolbar.is_armed());
        assert_eq!(toolbar.activate(0), ToolbarActivation::Inert);
        toolbar.unmount(&mut globals);
        assert!(globals.is_quiescent());
    }

    #[test]
    fn outside_press_dismisses_until_selection_changes() {
        let mut globals = HostGlobals::new();
        let mut host = editor();
        let mut toolbar = shown(&mut globals, &host);

        let press = Event::pointer(PointerEventKind::Down(PointerButton::Primary), 900.0, 700.0);
        let response = toolbar.handle_event(&press, &mut host, &viewport(), &mut globals);
        assert_eq!(
            response,
            PanelResponse::Dismissal(DismissalOutcome::Dismissed {
                trigger_removed: false
            })
        );
        assert!(!toolbar.is_armed());
        assert!(host.dispatched.is_empty());

        toolbar.handle_event(&Event::Scrolled, &mut host, &viewport(), &mut globals);
        assert!(!toolbar.panel().is_shown());

        toolbar.handle_event(&Event::SelectionChanged, &mut host, &viewport(), &mut globals);
        assert!(toolbar.panel().is_shown());
        assert!(toolbar.is_armed());
        toolbar.unmount(&mut globals);
        assert!(globals.is_quiescent());
    }

    #[test]
    fn unrelated_events_are_ignored() {
        let mut globals = HostGlobals::new();
        let mut host = editor();
        let mut toolbar = shown(&mut globals, &host);
        let response =
            toolbar.handle_event(&Event::PointerLeftWindow, &mut host, &viewport(), &mut globals);
        assert_eq!(response, PanelResponse::Ignored);
        assert!(toolbar.panel().is_shown());
        toolbar.unmount(&mut globals);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PlacementConfig::toolbar().with_padding(-1.0);
        assert!(SelectionToolbar::with_config(items(), config).is_err());
    }
}
