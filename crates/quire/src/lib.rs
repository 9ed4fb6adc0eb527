#![forbid(unsafe_code)]

//! Quire public facade crate.
//!
//! Re-exports the types a host needs to wire Quire's panels and
//! interactions into its editor, plus a prelude for day-to-day use.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use quire_core::event::{
    Event, KeyCode, KeyEvent, Modifiers, PointerButton, PointerEvent, PointerEventKind, Visibility,
};
pub use quire_core::frame::FrameCoalescer;
pub use quire_core::geometry::{Point, Rect, Size, Viewport};
pub use quire_core::scope::{GlobalStyle, HostGlobals, ListenerSet};

// --- Layout re-exports -----------------------------------------------------

pub use quire_layout::{
    AnchorGeometry, HorizontalMode, PanelPlacement, PlacementConfig, PlacementConfigError,
    VerticalPlacement, VerticalPreference, place,
};

// --- Widget re-exports -----------------------------------------------------

pub use quire_widgets::{
    BoxDimensions, BoxHeight, BoxWidth, CommandError, DismissalController, DismissalOutcome,
    DropHandler, DropOutcome, DropPayload, DropRouter, DroppedFile, EditorCommand, Embed,
    FloatingPanel, HostEditor, PanelKind, PanelResponse, PanelState, PanelView, ResizeBox,
    ResizeConfig, ResizeConfigError, ResizeEffect, ResizeExitReason, ResizeStatus,
    ResizeTransition, SelectionToolbar, SlashConfig, SlashConfigError, SlashItem,
    SlashKeyOutcome, SlashMenu, ToolbarActivation, ToolbarItem, UploadError, Uploader,
    standard_router,
};

// --- Errors ---------------------------------------------------------------

/// Configuration errors from any Quire component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    Placement(PlacementConfigError),
    Resize(ResizeConfigError),
    Slash(SlashConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placement(err) => write!(f, "placement config: {err}"),
            Self::Resize(err) => write!(f, "resize config: {err}"),
            Self::Slash(err) => write!(f, "slash config: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Placement(err) => Some(err),
            Self::Resize(err) => Some(err),
            Self::Slash(err) => Some(err),
        }
    }
}

impl From<PlacementConfigError> for Error {
    fn from(err: PlacementConfigError) -> Self {
        Self::Placement(err)
    }
}

impl From<ResizeConfigError> for Error {
    fn from(err: ResizeConfigError) -> Self {
        Self::Resize(err)
    }
}

impl From<SlashConfigError> for Error {
    fn from(err: SlashConfigError) -> Self {
        Self::Slash(err)
    }
}

/// Standard result type for Quire setup.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AnchorGeometry, BoxDimensions, DropPayload, DropRouter, EditorCommand, Error, Event,
        FloatingPanel, HostEditor, HostGlobals, PanelKind, Point, Rect, ResizeBox, ResizeConfig,
        Result, SelectionToolbar, Size, SlashItem, SlashMenu, ToolbarItem, Viewport,
    };

    pub use crate::{core, layout, widgets};
}

pub use quire_core as core;
pub use quire_layout as layout;
pub use quire_widgets as widgets;
