#![forbid(unsafe_code)]

//! Slash-command menu anchored at the caret.
//!
//! Typing the trigger character (by default `/` at the start of a block)
//! opens a [`SlashMenu`]. The text typed after the trigger is the query;
//! items whose title starts with it (ignoring case) are offered. Choosing
//! one deletes the trigger and query from the document and hands the item's
//! action back to the host.
//!
//! The menu closes when:
//!
//! - the trigger no longer matches (deleted, or the caret moved away);
//! - Escape is pressed (the typed text stays; this trigger will not reopen
//!   the menu);
//! - a pointer-down lands outside the menu and the editor (the trigger is
//!   removed if nothing was typed after it);
//! - an item is chosen.

use std::fmt;
use std::ops::Range;

use quire_core::event::{Event, KeyCode, KeyEvent};
use quire_core::geometry::{Size, Viewport};
use quire_core::scope::HostGlobals;

use crate::dismissal::{DismissalController, route_panel_event};
use crate::host::{EditorCommand, HostEditor, dispatch_quietly};
use crate::positioner::{
    FloatingPanel, PanelInput, PanelKind, PanelResponse, PanelTransition, PanelView,
};

/// Trigger rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SlashConfig {
    pub trigger: char,
    /// Only match a trigger at the very start of the block.
    pub start_of_line: bool,
    /// Whether the query may contain whitespace.
    pub allow_spaces: bool,
}

impl Default for SlashConfig {
    fn default() -> Self {
        Self {
            trigger: '/',
            start_of_line: true,
            allow_spaces: false,
        }
    }
}

impl SlashConfig {
    #[must_use]
    pub fn with_trigger(mut self, trigger: char) -> Self {
        self.trigger = trigger;
        self
    }

    #[must_use]
    pub fn with_start_of_line(mut self, start_of_line: bool) -> Self {
        self.start_of_line = start_of_line;
        self
    }

    #[must_use]
    pub fn with_allow_spaces(mut self, allow_spaces: bool) -> Self {
        self.allow_spaces = allow_spaces;
        self
    }

    pub fn validate(&self) -> Result<(), SlashConfigError> {
        if self.trigger.is_whitespace() || self.trigger.is_control() {
            return Err(SlashConfigError::InvalidTrigger {
                trigger: self.trigger,
            });
        }
        Ok(())
    }
}

/// Slash configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashConfigError {
    InvalidTrigger { trigger: char },
}

impl fmt::Display for SlashConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTrigger { trigger } => {
                write!(f, "trigger {trigger:?} must be a visible character")
            }
        }
    }
}

impl std::error::Error for SlashConfigError {}

/// An active trigger: where it sits and what was typed after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashMatch {
    /// Document range covering the trigger and the query.
    pub range: Range<usize>,
    pub query: String,
}

/// Find the active trigger in `text_before_caret`.
///
/// `caret` is the document position at the end of that text; each `char`
/// counts as one position.
///
/// ```
/// use quire_widgets::slash::{detect, SlashConfig};
///
/// let found = detect("/hea", 5, &SlashConfig::default()).expect("trigger");
/// assert_eq!(found.query, "hea");
/// assert_eq!(found.range, 1..5);
/// assert!(detect("a /hea", 7, &SlashConfig::default()).is_none());
/// ```
pub fn detect(text_before_caret: &str, caret: usize, config: &SlashConfig) -> Option<SlashMatch> {
    let after = if config.start_of_line {
        text_before_caret.strip_prefix(config.trigger)?
    } else {
        let at = text_before_caret.rfind(config.trigger)?;
        let preceded_by_space = text_before_caret[..at]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        if !preceded_by_space {
            return None;
        }
        &text_before_caret[at + config.trigger.len_utf8()..]
    };
    if !config.allow_spaces && after.contains(char::is_whitespace) {
        return None;
    }
    let len = after.chars().count() + 1;
    let start = caret.checked_sub(len)?;
    Some(SlashMatch {
        range: start..caret,
        query: after.to_string(),
    })
}

/// One menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashItem<A> {
    pub title: String,
    pub description: Option<String>,
    pub action: A,
}

impl<A> SlashItem<A> {
    #[must_use]
    pub fn new(title: impl Into<String>, action: A) -> Self {
        Self {
            title: title.into(),
            description: None,
            action,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Case-insensitive title prefix match.
    pub fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().starts_with(&query.to_lowercase())
    }
}

/// What a key press did to an open menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashKeyOutcome<A> {
    /// The highlight moved to this index of the filtered list.
    Highlighted(usize),
    /// Enter chose an item.
    Chosen(A),
    /// Escape closed the menu.
    Closed,
    /// The menu is closed or the key is not a menu key; let the editor
    /// have it.
    Ignored,
}

/// Caret-anchored command menu.
#[derive(Debug)]
pub struct SlashMenu<A> {
    config: SlashConfig,
    panel: FloatingPanel,
    dismissal: DismissalController,
    items: Vec<SlashItem<A>>,
    active: Option<SlashMatch>,
    highlighted: usize,
    /// Start of a trigger closed with Escape.
    escaped_at: Option<usize>,
}

impl<A: Clone> SlashMenu<A> {
    /// Menu with the default `/` trigger.
    #[must_use]
    pub fn new(items: Vec<SlashItem<A>>) -> Self {
        let config = SlashConfig::default();
        Self {
            config,
            panel: FloatingPanel::new(PanelKind::CaretMenu),
            dismissal: DismissalController::with_trigger(config.trigger),
            items,
            active: None,
            highlighted: 0,
            escaped_at: None,
        }
    }

    pub fn with_config(items: Vec<SlashItem<A>>, config: SlashConfig) -> Result<Self, SlashConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            dismissal: DismissalController::with_trigger(config.trigger),
            ..Self::new(items)
        })
    }

    pub fn config(&self) -> &SlashConfig {
        &self.config
    }

    pub fn panel(&self) -> &FloatingPanel {
        &self.panel
    }

    pub fn view(&self) -> PanelView {
        self.panel.view()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some() && self.panel.is_shown()
    }

    pub fn active_match(&self) -> Option<&SlashMatch> {
        self.active.as_ref()
    }

    pub fn query(&self) -> Option<&str> {
        self.active.as_ref().map(|found| found.query.as_str())
    }

    /// Index into [`filtered`](Self::filtered) of the highlighted item.
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Items matching the current query, in declaration order.
    pub fn filtered(&self) -> Vec<&SlashItem<A>> {
        let query = self.query().unwrap_or_default();
        self.items.iter().filter(|item| item.matches(query)).collect()
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
        self.redetect(host);
        let input = self.input(host);
        let transition = self.panel.mount(globals, input, viewport);
        self.settle(globals);
        transition
    }

    /// Feed a host event. Selection changes re-run trigger detection before
    /// the panel recomputes.
    pub fn handle_event<H: HostEditor + ?Sized>(
        &mut self,
        event: &Event,
        host: &mut H,
        viewport: &Viewport,
        globals: &mut HostGlobals,
    ) -> PanelResponse {
        if matches!(event, Event::SelectionChanged) {
            self.redetect(host);
        }
        let input = self.input(host);
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

    pub fn tick<H: HostEditor + ?Sized>(
        &mut self,
        host: &H,
        viewport: &Viewport,
        globals: &mut HostGlobals,
    ) -> PanelTransition {
        let input = self.input(host);
        let transition = self.panel.tick(input, viewport);
        self.settle(globals);
        transition
    }

    /// Menu keys: arrows move the highlight, Enter chooses, Escape closes.
    pub fn on_key<H: HostEditor + ?Sized>(
        &mut self,
        key: &KeyEvent,
        host: &mut H,
        globals: &mut HostGlobals,
    ) -> SlashKeyOutcome<A> {
        if !self.is_open() {
            return SlashKeyOutcome::Ignored;
        }
        let count = self.filtered().len();
        match key.code {
            KeyCode::Down if count > 0 => {
                self.highlighted = (self.highlighted + 1) % count;
                SlashKeyOutcome::Highlighted(self.highlighted)
            }
            KeyCode::Up if count > 0 => {
                self.highlighted = (self.highlighted + count - 1) % count;
                SlashKeyOutcome::Highlighted(self.highlighted)
            }
            KeyCode::Enter => match self.choose(self.highlighted, host, globals) {
                Some(action) => SlashKeyOutcome::Chosen(action),
                None => SlashKeyOutcome::Ignored,
            },
            KeyCode::Escape => {
                self.escaped_at = self.active.as_ref().map(|found| found.range.start);
                self.close(globals);
                SlashKeyOutcome::Closed
            }
            _ => SlashKeyOutcome::Ignored,
        }
    }

    /// Choose entry `index` of the filtered list.
    ///
    /// Deletes the trigger and query, closes the menu, and returns the
    /// item's action. A failed deletion is logged; the action is still
    /// returned.
    pub fn choose<H: HostEditor + ?Sized>(
        &mut self,
        index: usize,
        host: &mut H,
        globals: &mut HostGlobals,
    ) -> Option<A> {
        if !self.is_open() {
            return None;
        }
        let action = self.filtered().get(index).map(|item| item.action.clone())?;
        let range = self.active.as_ref()?.range.clone();
        quire_core::debug!(index, start = range.start, end = range.end, "slash item chosen");
        dispatch_quietly(host, "slash.choose", EditorCommand::DeleteRange(range));
        self.close(globals);
        Some(action)
    }

    pub fn unmount(&mut self, globals: &mut HostGlobals) -> PanelTransition {
        self.dismissal.release(globals);
        self.active = None;
        self.highlighted = 0;
        self.panel.unmount(globals)
    }

    fn redetect<H: HostEditor + ?Sized>(&mut self, host: &H) {
        let found = detect(&host.text_before_caret(), host.caret_offset(), &self.config);
        match (&found, self.escaped_at) {
            (Some(found), Some(start)) if found.range.start == start => {
                self.active = None;
                return;
            }
            (None, _) => self.escaped_at = None,
            _ => {}
        }
        if found.as_ref().map(|m| &m.query) != self.active.as_ref().map(|m| &m.query) {
            self.highlighted = 0;
        }
        self.active = found;
    }

    fn input<H: HostEditor + ?Sized>(&self, host: &H) -> PanelInput {
        PanelInput::from_caret(host, self.active.is_some())
    }

    fn close(&mut self, globals: &mut HostGlobals) {
        self.active = None;
        self.highlighted = 0;
        self.panel.dismiss();
        self.settle(globals);
    }

    fn settle(&mut self, globals: &mut HostGlobals) {
        self.dismissal.sync(&self.panel, globals);
        if !self.panel.is_shown() {
            self.active = None;
            self.highlighted = 0;
        }
    }
}
