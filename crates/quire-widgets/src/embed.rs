#![forbid(unsafe_code)]

//! Embedded media: link recognition and the standard drop handlers.
//!
//! Three handlers cover the common cases and are registered in this order by
//! [`standard_router`]:
//!
//! | Handler | Accepts | Inserts |
//! |---------|---------|---------|
//! | [`ImageFileDrop`] | any payload carrying files | one image per uploaded file |
//! | [`YoutubeLinkDrop`] | a YouTube watch, embed or short link | a YouTube player |
//! | [`TweetLinkDrop`] | a `twitter.com` / `x.com` status link | a tweet card |
//!
//! Insertion always replaces the current selection. A failed upload or a
//! refused insertion is logged and skipped; the drop is still reported as
//! handled because the handler already claimed it.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::drop::{DropHandler, DropPayload, DropRouter, DroppedFile};
use crate::host::{EditorCommand, HostEditor, dispatch_quietly};

static YOUTUBE_VIDEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:(?:www\.)?youtube\.com/(?:watch\?v=|embed/)|youtu\.be/)([\w-]+)")
        .expect("youtube regex")
});

static TWEET_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?(?:twitter\.com|x\.com)/[A-Za-z0-9_]+/status/([0-9]+)")
        .expect("tweet regex")
});

/// An embedded element inserted into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Embed {
    Image { src: String },
    Youtube { src: String },
    Tweet { src: String },
}

impl Embed {
    /// A YouTube embed pointing at the player URL, or `None` if `url` is
    /// not a video link.
    pub fn youtube(url: &str) -> Option<Self> {
        Some(Self::Youtube {
            src: youtube_embed_url(url)?,
        })
    }

    /// A tweet embed, or `None` if `url` is not a status link.
    pub fn tweet(url: &str) -> Option<Self> {
        tweet_id(url)?;
        Some(Self::Tweet {
            src: url.to_string(),
        })
    }

    pub fn image(src: impl Into<String>) -> Self {
        Self::Image { src: src.into() }
    }

    /// The element's source URL.
    pub fn src(&self) -> &str {
        match self {
            Self::Image { src } | Self::Youtube { src } | Self::Tweet { src } => src,
        }
    }
}

/// Player URL for a YouTube watch, embed or short link.
///
/// ```
/// use quire_widgets::embed::youtube_embed_url;
///
/// assert_eq!(
///     youtube_embed_url("https://youtu.be/dQw4w9WgXcQ?t=3").as_deref(),
///     Some("https://www.youtube.com/embed/dQw4w9WgXcQ"),
/// );
/// assert_eq!(
///     youtube_embed_url("https://www.youtube.com/embed/dQw4w9WgXcQ?si=x").as_deref(),
///     Some("https://www.youtube.com/embed/dQw4w9WgXcQ"),
/// );
/// assert_eq!(youtube_embed_url("https://example.com"), None);
/// ```
pub fn youtube_embed_url(url: &str) -> Option<String> {
    let id = YOUTUBE_VIDEO.captures(url)?.get(1)?.as_str();
    Some(format!("https://www.youtube.com/embed/{id}"))
}

/// Status id of a tweet link.
pub fn tweet_id(url: &str) -> Option<&str> {
    TWEET_STATUS
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// ---------------------------------------------------------------------------
// Upload seam
// ---------------------------------------------------------------------------

/// Turns a dropped file into a URL the document can reference.
pub trait Uploader {
    fn upload(&mut self, file: &DroppedFile) -> Result<String, UploadError>;
}

impl<F> Uploader for F
where
    F: FnMut(&DroppedFile) -> Result<String, UploadError>,
{
    fn upload(&mut self, file: &DroppedFile) -> Result<String, UploadError> {
        self(file)
    }
}

/// Upload failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The uploader does not handle this kind of file.
    Unsupported { mime_type: String },
    /// The upload was attempted and failed.
    Failed(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { mime_type } => write!(f, "cannot upload files of type {mime_type}"),
            Self::Failed(msg) => write!(f, "upload failed: {msg}"),
        }
    }
}

impl std::error::Error for UploadError {}

// ---------------------------------------------------------------------------
// Standard handlers
// ---------------------------------------------------------------------------

/// Uploads dropped files and inserts each as an image.
#[derive(Debug)]
pub struct ImageFileDrop<U> {
    uploader: U,
}

impl<U: Uploader> ImageFileDrop<U> {
    pub fn new(uploader: U) -> Self {
        Self { uploader }
    }

    pub fn uploader(&self) -> &U {
        &self.uploader
    }
}

impl<H, U> DropHandler<H> for ImageFileDrop<U>
where
    H: HostEditor + ?Sized,
    U: Uploader,
{
    fn name(&self) -> &str {
        "image-file"
    }

    fn accepts(&self, payload: &DropPayload) -> bool {
        payload.has_files()
    }

    fn handle(&mut self, host: &mut H, payload: &DropPayload) -> bool {
        for file in payload.files() {
            let url = match self.uploader.upload(file) {
                Ok(url) => url,
                Err(err) => {
                    quire_core::logging::swallowed("drop.image_upload", &err);
                    continue;
                }
            };
            if url.is_empty() {
                quire_core::debug!(file = %file.name, "upload produced no url; skipped");
                continue;
            }
            dispatch_quietly(
                host,
                "drop.image_insert",
                EditorCommand::ReplaceSelection(Embed::image(url)),
            );
        }
        true
    }
}

/// Inserts a YouTube player for dropped YouTube links.
#[derive(Debug, Default, Clone, Copy)]
pub struct YoutubeLinkDrop;

impl<H: HostEditor + ?Sized> DropHandler<H> for YoutubeLinkDrop {
    fn name(&self) -> &str {
        "youtube-link"
    }

    fn accepts(&self, payload: &DropPayload) -> bool {
        payload
            .text()
            .is_some_and(|text| youtube_embed_url(text).is_some())
    }

    fn handle(&mut self, host: &mut H, payload: &DropPayload) -> bool {
        let Some(embed) = payload.text().and_then(Embed::youtube) else {
            return false;
        };
        dispatch_quietly(
            host,
            "drop.youtube_insert",
            EditorCommand::ReplaceSelection(embed),
        );
        true
    }
}

/// Inserts a tweet card for dropped status links.
#[derive(Debug, Default, Clone, Copy)]
pub struct TweetLinkDrop;

impl<H: HostEditor + ?Sized> DropHandler<H> for TweetLinkDrop {
    fn name(&self) -> &str {
        "tweet-link"
    }

    fn accepts(&self, payload: &DropPayload) -> bool {
        payload.text().is_some_and(|text| tweet_id(text).is_some())
    }

    fn handle(&mut self, host: &mut H, payload: &DropPayload) -> bool {
        let Some(embed) = payload.text().and_then(Embed::tweet) else {
            return false;
        };
        dispatch_quietly(
            host,
            "drop.tweet_insert",
            EditorCommand::ReplaceSelection(embed),
        );
        true
    }
}

/// Router with the image, YouTube, and tweet handlers, in that order.
///
/// Without an uploader, file drops fall through to the host's default.
pub fn standard_router<H, U>(uploader: Option<U>) -> DropRouter<H>
where
    H: HostEditor + ?Sized + 'static,
    U: Uploader + 'static,
{
    let mut router = DropRouter::new();
    if let Some(uploader) = uploader {
        router.register(ImageFileDrop::new(uploader));
    }
    router.register(YoutubeLinkDrop);
    router.register(TweetLinkDrop);
    router
}
