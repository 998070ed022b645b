/// Gallery sequence and zoom viewer state
///
/// The sequence is derived from the session on demand and never stored.
/// The zoom cursor is a small state machine over `Closed | Open(index)`.

use super::data::{ImagePayload, ViewSlot};
use super::session::{CombinedArtifact, Session, SourceImage};

/// What a gallery entry shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryEntry {
    Source,
    View(ViewSlot),
    Combined,
}

impl GalleryEntry {
    pub fn title(self) -> &'static str {
        match self {
            GalleryEntry::Source => "Source Image",
            GalleryEntry::View(slot) => slot.title(),
            GalleryEntry::Combined => "Combined Blueprint",
        }
    }

    pub fn download_filename(self) -> &'static str {
        match self {
            GalleryEntry::Source => SourceImage::filename(),
            GalleryEntry::View(slot) => slot.download_filename(),
            GalleryEntry::Combined => CombinedArtifact::filename(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub entry: GalleryEntry,
    pub payload: ImagePayload,
}

/// Build the ordered list of viewable images:
/// display image, front, back, top, right, left, combined (absent skipped)
pub fn gallery_sequence(session: &Session) -> Vec<GalleryItem> {
    let source = session.source().display().map(|payload| GalleryItem {
        entry: GalleryEntry::Source,
        payload: payload.clone(),
    });

    let views = ViewSlot::DISPLAY_ORDER.into_iter().filter_map(|slot| {
        session.snapshot().get(slot).map(|payload| GalleryItem {
            entry: GalleryEntry::View(slot),
            payload: payload.clone(),
        })
    });

    let combined = session.combined().map(|artifact| GalleryItem {
        entry: GalleryEntry::Combined,
        payload: artifact.payload.clone(),
    });

    source.into_iter().chain(views).chain(combined).collect()
}

/// Zoom viewer position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomCursor {
    #[default]
    Closed,
    Open(usize),
}

impl ZoomCursor {
    pub fn index(self) -> Option<usize> {
        match self {
            ZoomCursor::Closed => None,
            ZoomCursor::Open(index) => Some(index),
        }
    }

    /// Open on the first item equal to `payload`.
    /// Returns false (and leaves the cursor untouched) when it is not in the sequence.
    pub fn open(&mut self, sequence: &[GalleryItem], payload: &ImagePayload) -> bool {
        match sequence.iter().position(|item| &item.payload == payload) {
            Some(index) => {
                *self = ZoomCursor::Open(index);
                true
            }
            None => false,
        }
    }

    pub fn next(&mut self, len: usize) {
        if let ZoomCursor::Open(index) = *self {
            if index + 1 < len {
                *self = ZoomCursor::Open(index + 1);
            }
        }
    }

    pub fn prev(&mut self) {
        if let ZoomCursor::Open(index) = *self {
            if index > 0 {
                *self = ZoomCursor::Open(index - 1);
            }
        }
    }

    pub fn close(&mut self) {
        *self = ZoomCursor::Closed;
    }

    pub fn has_next(self, len: usize) -> bool {
        matches!(self, ZoomCursor::Open(index) if index + 1 < len)
    }

    pub fn has_prev(self) -> bool {
        matches!(self, ZoomCursor::Open(index) if index > 0)
    }

    /// Re-check the cursor after the sequence changed shape:
    /// clamp to the last item, or close when nothing is left
    pub fn revalidate(&mut self, len: usize) {
        if let ZoomCursor::Open(index) = *self {
            if len == 0 {
                *self = ZoomCursor::Closed;
            } else if index >= len {
                *self = ZoomCursor::Open(len - 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::*;
    use crate::state::session::CombinedArtifact;
    use chrono::Utc;

    fn complete_session() -> Session {
        let mut session = Session::new();
        session.set_source_image(Some(solid_png(16, 16, [1, 2, 3, 255])));
        let epoch = session.epoch();
        for (slot, payload) in complete_set().iter() {
            session.set_view(epoch, slot, payload.cloned());
        }
        let artifact = CombinedArtifact {
            payload: solid_png(8, 8, [9, 9, 9, 255]),
            inputs: session.snapshot().digest(),
            rendered_at: Utc::now(),
        };
        session.accept_combined(artifact);
        session
    }

    #[test]
    fn test_sequence_order_is_fixed() {
        let session = complete_session();
        let entries: Vec<_> = gallery_sequence(&session)
            .into_iter()
            .map(|item| item.entry)
            .collect();

        assert_eq!(
            entries,
            vec![
                GalleryEntry::Source,
                GalleryEntry::View(ViewSlot::Front),
                GalleryEntry::View(ViewSlot::Back),
                GalleryEntry::View(ViewSlot::Top),
                GalleryEntry::View(ViewSlot::Right),
                GalleryEntry::View(ViewSlot::Left),
                GalleryEntry::Combined,
            ]
        );
    }

    #[test]
    fn test_sequence_skips_absent_entries() {
        let mut session = Session::new();
        assert!(gallery_sequence(&session).is_empty());

        let epoch = session.reset_views();
        session.set_view(epoch, ViewSlot::Top, Some(solid_png(4, 4, RED)));
        session.set_view(epoch, ViewSlot::Back, Some(solid_png(4, 4, GREEN)));

        let entries: Vec<_> = gallery_sequence(&session)
            .into_iter()
            .map(|item| item.entry)
            .collect();
        assert_eq!(
            entries,
            vec![
                GalleryEntry::View(ViewSlot::Back),
                GalleryEntry::View(ViewSlot::Top),
            ]
        );
    }

    #[test]
    fn test_stale_combined_is_not_listed() {
        let mut session = complete_session();
        assert_eq!(gallery_sequence(&session).len(), 7);

        let epoch = session.epoch();
        session.set_view(epoch, ViewSlot::Front, Some(solid_png(4, 4, GREEN)));

        let sequence = gallery_sequence(&session);
        assert_eq!(sequence.len(), 6);
        assert!(sequence.iter().all(|item| item.entry != GalleryEntry::Combined));
    }

    #[test]
    fn test_zoom_on_partial_set() {
        // Source present, only the front view generated so far
        let mut session = Session::new();
        session.set_source_image(Some(solid_png(16, 16, BLUE)));
        let front = solid_png(4, 4, RED);
        let epoch = session.epoch();
        session.set_view(epoch, ViewSlot::Front, Some(front.clone()));

        let sequence = gallery_sequence(&session);
        assert_eq!(sequence.len(), 2);

        let mut cursor = ZoomCursor::Closed;
        assert!(cursor.open(&sequence, &front));
        assert_eq!(cursor, ZoomCursor::Open(1));

        cursor.next(sequence.len());
        assert_eq!(cursor, ZoomCursor::Open(1));
        assert!(!cursor.has_next(sequence.len()));
    }

    #[test]
    fn test_prev_is_noop_at_start() {
        let session = complete_session();
        let sequence = gallery_sequence(&session);
        let mut cursor = ZoomCursor::Closed;
        assert!(cursor.open(&sequence, &sequence[0].payload));

        cursor.prev();
        assert_eq!(cursor, ZoomCursor::Open(0));
        assert!(!cursor.has_prev());

        cursor.next(sequence.len());
        cursor.next(sequence.len());
        assert_eq!(cursor, ZoomCursor::Open(2));
        cursor.prev();
        assert_eq!(cursor, ZoomCursor::Open(1));
    }

    #[test]
    fn test_open_on_unknown_image_is_noop() {
        let session = complete_session();
        let sequence = gallery_sequence(&session);
        let mut cursor = ZoomCursor::Closed;

        assert!(!cursor.open(&sequence, &solid_png(3, 3, YELLOW)));
        assert_eq!(cursor, ZoomCursor::Closed);
    }

    #[test]
    fn test_navigation_while_closed_does_nothing() {
        let mut cursor = ZoomCursor::Closed;
        cursor.next(5);
        cursor.prev();
        assert_eq!(cursor, ZoomCursor::Closed);
        assert!(!cursor.has_next(5));
    }

    #[test]
    fn test_revalidate_clamps_or_closes() {
        let mut cursor = ZoomCursor::Open(6);
        cursor.revalidate(7);
        assert_eq!(cursor, ZoomCursor::Open(6));

        cursor.revalidate(3);
        assert_eq!(cursor, ZoomCursor::Open(2));

        cursor.revalidate(0);
        assert_eq!(cursor, ZoomCursor::Closed);
    }
}
