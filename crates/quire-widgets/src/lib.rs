#![forbid(unsafe_code)]

//! Editor panels and interactions for Quire.
//!
//! - [`positioner`] - visibility lifecycle and placement of a floating panel
//! - [`dismissal`] - outside-press dismissal with trigger cleanup
//! - [`toolbar`] / [`slash`] - the selection toolbar and the caret menu
//! - [`resize`] - pointer-driven resize of embedded boxes
//! - [`drop`] / [`embed`] - ordered drop routing and media recognition
//!
//! Everything here is driven by the host: it forwards events, calls
//! `tick`/`animation_frame` when its scheduler fires, and applies the
//! proposals and commands that come back. The editor itself is reached only
//! through [`HostEditor`].

pub mod dismissal;
pub mod drop;
pub mod embed;
pub mod host;
pub mod positioner;
pub mod resize;
pub mod slash;
pub mod toolbar;

pub use dismissal::{DismissalController, DismissalOutcome};
pub use drop::{DropHandler, DropOutcome, DropPayload, DropRouter, DroppedFile};
pub use embed::{
    Embed, ImageFileDrop, TweetLinkDrop, UploadError, Uploader, YoutubeLinkDrop, standard_router,
    tweet_id, youtube_embed_url,
};
pub use host::{CommandError, EditorCommand, HostEditor};
pub use positioner::{
    FloatingPanel, PANEL_LISTENERS, PanelCause, PanelInput, PanelKind, PanelResponse, PanelState,
    PanelTransition, PanelTrigger, PanelView,
};
pub use resize::{
    BoxDimensions, BoxHeight, BoxWidth, DRAG_LISTENERS, ResizeBox, ResizeConfig,
    ResizeConfigError, ResizeEffect, ResizeExitReason, ResizeNoopReason, ResizePhase,
    ResizeState, ResizeStatus, ResizeTransition,
};
pub use slash::{SlashConfig, SlashConfigError, SlashItem, SlashKeyOutcome, SlashMatch, SlashMenu};
pub use toolbar::{SelectionToolbar, ToolbarActivation, ToolbarItem};
