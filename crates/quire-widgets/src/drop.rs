#![forbid(unsafe_code)]

//! Ordered drop routing.
//!
//! A [`DropRouter`] holds handlers in registration order. For each drop it
//! asks them in turn whether they [`accept`](DropHandler::accepts) the
//! payload; the first that does is the only one that runs, and its answer
//! is the router's answer.
//!
//! # Invariants
//!
//! 1. Predicates are evaluated in registration order.
//! 2. At most one handler's `handle` runs per drop.
//! 3. No predicate after the first match is evaluated.
//!
//! # Failure Modes
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | No handler accepts | [`DropOutcome::Unhandled`]; the host applies its default drop |
//! | Accepting handler returns `false` | [`DropOutcome::Declined`] |

use quire_core::geometry::Point;

/// A file carried by a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DroppedFile {
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// True for `image/*` files.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// What was dropped: typed string entries plus any files.
///
/// # Examples
///
/// ```
/// use quire_widgets::drop::DropPayload;
///
/// let payload = DropPayload::new().with_data("text/uri-list", "https://youtu.be/xyz");
/// assert_eq!(payload.text(), Some("https://youtu.be/xyz"));
/// assert!(!payload.has_files());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropPayload {
    entries: Vec<(String, String)>,
    files: Vec<DroppedFile>,
    position: Option<Point>,
}

impl DropPayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the entry for `mime_type`.
    #[must_use]
    pub fn with_data(mut self, mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        let data = data.into();
        match self.entries.iter_mut().find(|(kind, _)| *kind == mime_type) {
            Some(entry) => entry.1 = data,
            None => self.entries.push((mime_type, data)),
        }
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: DroppedFile) -> Self {
        self.files.push(file);
        self
    }

    /// Viewport position of the drop.
    #[must_use]
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    /// Entry for `mime_type`, if present.
    pub fn data(&self, mime_type: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(kind, _)| kind == mime_type)
            .map(|(_, data)| data.as_str())
    }

    /// Dropped text: `text/plain`, falling back to `text/uri-list`.
    ///
    /// Empty entries count as missing.
    pub fn text(&self) -> Option<&str> {
        self.data("text/plain")
            .filter(|text| !text.is_empty())
            .or_else(|| self.data("text/uri-list").filter(|text| !text.is_empty()))
    }

    pub fn files(&self) -> &[DroppedFile] {
        &self.files
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }
}

/// Result of routing a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropOutcome {
    /// An accepting handler applied the drop.
    Handled,
    /// An accepting handler ran and declined.
    Declined,
    /// No handler accepted the payload.
    Unhandled,
}

impl DropOutcome {
    /// True only for [`Handled`](Self::Handled); the host should then
    /// suppress its default drop behaviour.
    pub fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// One entry in a [`DropRouter`].
///
/// `C` is whatever the handler needs to apply the drop, usually the host
/// editor.
pub trait DropHandler<C: ?Sized> {
    /// Short label used in diagnostics.
    fn name(&self) -> &str {
        "anonymous"
    }

    /// Cheap check: does this handler want the payload?
    fn accepts(&self, payload: &DropPayload) -> bool;

    /// Apply the drop. Returns whether it was handled.
    fn handle(&mut self, ctx: &mut C, payload: &DropPayload) -> bool;
}

/// A handler built from a predicate and a handle closure.
struct FnHandler<P, F> {
    name: String,
    predicate: P,
    handle: F,
}

impl<C, P, F> DropHandler<C> for FnHandler<P, F>
where
    C: ?Sized,
    P: Fn(&DropPayload) -> bool,
    F: FnMut(&mut C, &DropPayload) -> bool,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, payload: &DropPayload) -> bool {
        (self.predicate)(payload)
    }

    fn handle(&mut self, ctx: &mut C, payload: &DropPayload) -> bool {
        (self.handle)(ctx, payload)
    }
}

/// Ordered list of drop handlers; first match wins.
pub struct DropRouter<C: ?Sized> {
    handlers: Vec<Box<dyn DropHandler<C>>>,
}

impl<C: ?Sized> Default for DropRouter<C> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<C: ?Sized> std::fmt::Debug for DropRouter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropRouter")
            .field("handlers", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl<C: ?Sized> DropRouter<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler; it runs after every handler registered before it.
    pub fn register(&mut self, handler: impl DropHandler<C> + 'static) -> &mut Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with_handler(mut self, handler: impl DropHandler<C> + 'static) -> Self {
        self.register(handler);
        self
    }

    /// Append a handler made of a predicate and a handle closure.
    pub fn route_fn<P, F>(&mut self, name: impl Into<String>, predicate: P, handle: F) -> &mut Self
    where
        P: Fn(&DropPayload) -> bool + 'static,
        F: FnMut(&mut C, &DropPayload) -> bool + 'static,
    {
        self.register(FnHandler {
            name: name.into(),
            predicate,
            handle,
        })
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handler names in evaluation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|handler| handler.name())
    }

    /// Route one drop.
    pub fn dispatch(&mut self, ctx: &mut C, payload: &DropPayload) -> DropOutcome {
        let Some(handler) = self
            .handlers
            .iter_mut()
            .find(|handler| handler.accepts(payload))
        else {
            quire_core::trace!("drop unhandled");
            return DropOutcome::Unhandled;
        };
        let handled = handler.handle(ctx, payload);
        quire_core::trace!(handler = handler.name(), handled, "drop routed");
        if handled {
            DropOutcome::Handled
        } else {
            DropOutcome::Declined
        }
    }
}
