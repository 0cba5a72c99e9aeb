use std::sync::Arc;

use crate::assets::decode::PreparedImage;

/// Stable handle of a resource inside a [`ResourceManager`](crate::ResourceManager).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub usize);

/// What a resource decodes into once fetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Raster bitmap, decoded to premultiplied RGBA8.
    Image,
    /// UTF-8 text.
    Text,
    /// Opaque bytes.
    Binary,
}

impl ResourceKind {
    /// Guess the kind from an origin's file extension. Unknown extensions are binary.
    pub fn from_origin(origin: &str) -> Self {
        let path = origin.split(['?', '#']).next().unwrap_or(origin);
        let ext = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "tga" | "tif" | "tiff" => {
                Self::Image
            }
            "txt" | "json" | "xml" | "html" | "htm" | "css" | "csv" | "md" | "svg" => Self::Text,
            _ => Self::Binary,
        }
    }
}

/// Decoded payload of an available resource.
#[derive(Clone, Debug)]
pub enum ResourceData {
    /// Decoded bitmap.
    Image(PreparedImage),
    /// Text content.
    Text(String),
    /// Raw bytes.
    Binary(Vec<u8>),
}

/// Load lifecycle of a resource.
///
/// `Pending` is the "registered" state: a resource is in it exactly while it sits in the
/// manager's pending queue. `Available` and `Failed` are terminal for one load attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Known but never queued.
    #[default]
    Idle,
    /// Queued for loading.
    Pending,
    /// Loaded and decoded.
    Available,
    /// Fetch or decode failed; carries the failure message.
    Failed(String),
}

/// Passive descriptor of a fetchable asset.
///
/// Identity is `(key, locale)`, compared case-insensitively.
#[derive(Clone, Debug)]
pub struct Resource {
    kind: ResourceKind,
    key: String,
    locale: Option<String>,
    origin: String,
    state: LoadState,
    data: Option<Arc<ResourceData>>,
}

impl Resource {
    /// Create an idle resource of an explicit kind.
    pub fn new(
        kind: ResourceKind,
        key: impl Into<String>,
        locale: Option<&str>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            key: normalize_key(key.into()),
            locale: normalize_locale(locale),
            origin: origin.into(),
            state: LoadState::Idle,
            data: None,
        }
    }

    /// Create a resource whose kind is inferred from the origin's extension.
    pub fn from_origin(key: impl Into<String>, locale: Option<&str>, origin: &str) -> Self {
        Self::new(ResourceKind::from_origin(origin), key, locale, origin)
    }

    /// Create an image resource.
    pub fn image(key: impl Into<String>, locale: Option<&str>, origin: impl Into<String>) -> Self {
        Self::new(ResourceKind::Image, key, locale, origin)
    }

    /// Create a textual resource whose content is known up front.
    ///
    /// Inline text has no origin and is available immediately; registering it is a no-op.
    pub fn inline_text(
        key: impl Into<String>,
        locale: Option<&str>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind: ResourceKind::Text,
            key: normalize_key(key.into()),
            locale: normalize_locale(locale),
            origin: String::new(),
            state: LoadState::Available,
            data: Some(Arc::new(ResourceData::Text(text.into()))),
        }
    }

    /// Resource kind.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Lookup key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Locale tag, if localized.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Fetchable origin (empty for inline resources).
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// `true` while queued for loading.
    pub fn is_registered(&self) -> bool {
        self.state == LoadState::Pending
    }

    /// `true` once loaded successfully.
    pub fn is_available(&self) -> bool {
        self.state == LoadState::Available
    }

    /// `true` when the last load attempt failed.
    pub fn is_error(&self) -> bool {
        matches!(self.state, LoadState::Failed(_))
    }

    /// `true` for textual resources with nothing to fetch.
    pub fn is_inline_text(&self) -> bool {
        self.kind == ResourceKind::Text && self.origin.is_empty()
    }

    /// Decoded payload, once available.
    pub fn data(&self) -> Option<&Arc<ResourceData>> {
        self.data.as_ref()
    }

    /// Decoded image, when this is an available image resource.
    pub fn image_data(&self) -> Option<&PreparedImage> {
        match self.data.as_deref() {
            Some(ResourceData::Image(img)) => Some(img),
            _ => None,
        }
    }

    /// Decoded text, when this is an available text resource.
    pub fn text_data(&self) -> Option<&str> {
        match self.data.as_deref() {
            Some(ResourceData::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Case-insensitive identity comparison on `(key, locale)`.
    pub fn same_identity(&self, key: &str, locale: Option<&str>) -> bool {
        self.key.eq_ignore_ascii_case(key.trim())
            && match (self.locale.as_deref(), normalize_locale(locale).as_deref()) {
                (None, None) => true,
                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                _ => false,
            }
    }

    pub(crate) fn set_origin(&mut self, kind: ResourceKind, origin: String) {
        self.kind = kind;
        self.origin = origin;
    }

    pub(crate) fn mark_pending(&mut self) {
        self.state = LoadState::Pending;
    }

    pub(crate) fn reset(&mut self) {
        self.state = LoadState::Idle;
    }

    pub(crate) fn finish(&mut self, outcome: Result<ResourceData, String>) {
        match outcome {
            Ok(data) => {
                self.data = Some(Arc::new(data));
                self.state = LoadState::Available;
            }
            Err(msg) => {
                self.data = None;
                self.state = LoadState::Failed(msg);
            }
        }
    }
}

fn normalize_key(key: String) -> String {
    if key.trim().len() == key.len() {
        key
    } else {
        key.trim().to_owned()
    }
}

fn normalize_locale(locale: Option<&str>) -> Option<String> {
    locale
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resource.rs"]
mod tests;
