/// Session state for one blueprint workspace
///
/// The session owns the current `ImageSet` snapshot, the source image and
/// the last combined artifact. Each mutation swaps in a new snapshot, so
/// the readiness gate and the gallery are plain functions of `snapshot()`.

use chrono::{DateTime, Utc};

use super::data::{ImagePayload, ImageSet, ViewSlot};

/// Batch identifier; advanced whenever a new batch starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    fn next(self) -> Self {
        Epoch(self.0 + 1)
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The rendered and encoded composite plus the inputs it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedArtifact {
    pub payload: ImagePayload,
    /// `ImageSet::digest()` of the five views used for this render
    pub inputs: blake3::Hash,
    pub rendered_at: DateTime<Utc>,
}

impl CombinedArtifact {
    pub fn filename() -> &'static str {
        "combined_blueprint.png"
    }

    /// True when this artifact was rendered from exactly `set`
    pub fn matches(&self, set: &ImageSet) -> bool {
        self.inputs == set.digest()
    }
}

/// The uploaded original and an optional styled replacement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceImage {
    pub uploaded: Option<ImagePayload>,
    pub styled: Option<ImagePayload>,
}

impl SourceImage {
    /// The image shown in the source cell; the styled one wins
    pub fn display(&self) -> Option<&ImagePayload> {
        self.styled.as_ref().or(self.uploaded.as_ref())
    }

    pub fn title(&self) -> &'static str {
        match (&self.styled, &self.uploaded) {
            (Some(_), _) => "Styled Source Image",
            (None, Some(_)) => "Uploaded Image",
            (None, None) => "Source Image",
        }
    }

    pub fn filename() -> &'static str {
        "source_image.png"
    }
}

/// Outcome of applying an asynchronous result to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Accepted,
    /// The result belongs to an older batch or older inputs
    Stale,
}

#[derive(Debug, Default)]
pub struct Session {
    views: ImageSet,
    source: SourceImage,
    combined: Option<CombinedArtifact>,
    epoch: Epoch,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &ImageSet {
        &self.views
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// The combined artifact, only while it still matches the current views
    pub fn combined(&self) -> Option<&CombinedArtifact> {
        self.combined
            .as_ref()
            .filter(|artifact| artifact.matches(&self.views))
    }

    /// Start a new batch: all slots absent, combined cleared, epoch advanced
    pub fn reset_views(&mut self) -> Epoch {
        self.views = ImageSet::new();
        self.combined = None;
        self.epoch = self.epoch.next();
        tracing::debug!(epoch = %self.epoch, "views reset");
        self.epoch
    }

    /// A new source image also starts a new batch
    pub fn set_source_image(&mut self, payload: Option<ImagePayload>) -> Epoch {
        self.source = SourceImage {
            uploaded: payload,
            styled: None,
        };
        self.reset_views()
    }

    /// Replace the styled source without touching the views
    pub fn set_styled_source(&mut self, payload: Option<ImagePayload>) {
        self.source.styled = payload;
    }

    /// Write one slot. Results from an older batch are dropped.
    pub fn set_view(
        &mut self,
        epoch: Epoch,
        slot: ViewSlot,
        payload: Option<ImagePayload>,
    ) -> Applied {
        if epoch != self.epoch {
            tracing::debug!(%slot, result_epoch = %epoch, current = %self.epoch, "discarding stale view");
            return Applied::Stale;
        }
        self.views = self.views.with_view(slot, payload);
        self.combined = None;
        Applied::Accepted
    }

    /// Store a freshly rendered composite if it was built from the current views
    pub fn accept_combined(&mut self, artifact: CombinedArtifact) -> Applied {
        if !artifact.matches(&self.views) {
            tracing::debug!("discarding composite rendered from outdated views");
            return Applied::Stale;
        }
        self.combined = Some(artifact);
        Applied::Accepted
    }

    /// A failed render leaves no combined artifact behind
    pub fn clear_combined(&mut self) {
        self.combined = None;
    }
}
