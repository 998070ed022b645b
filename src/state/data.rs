/// Shared data structures for the application state
///
/// These types are the data model that flows between the loaders,
/// the compositor and the UI. All of them are cheap to clone: image
/// bytes are reference-counted and never copied after load.

use std::fmt;
use std::sync::Arc;

use image::ImageFormat;

use crate::error::{BlueprintError, Result};

/// One of the five fixed orthographic view identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewSlot {
    Front,
    Back,
    Left,
    Right,
    Top,
}

impl ViewSlot {
    /// All slots in storage order
    pub const ALL: [ViewSlot; 5] = [
        ViewSlot::Front,
        ViewSlot::Back,
        ViewSlot::Left,
        ViewSlot::Right,
        ViewSlot::Top,
    ];

    /// Order in which views appear in the gallery and the zoom viewer
    pub const DISPLAY_ORDER: [ViewSlot; 5] = [
        ViewSlot::Front,
        ViewSlot::Back,
        ViewSlot::Top,
        ViewSlot::Right,
        ViewSlot::Left,
    ];

    fn index(self) -> usize {
        match self {
            ViewSlot::Front => 0,
            ViewSlot::Back => 1,
            ViewSlot::Left => 2,
            ViewSlot::Right => 3,
            ViewSlot::Top => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewSlot::Front => "front",
            ViewSlot::Back => "back",
            ViewSlot::Left => "left",
            ViewSlot::Right => "right",
            ViewSlot::Top => "top",
        }
    }

    /// Human-readable title shown above each gallery cell
    pub fn title(self) -> &'static str {
        match self {
            ViewSlot::Front => "Front View",
            ViewSlot::Back => "Back View",
            ViewSlot::Left => "Left Side View",
            ViewSlot::Right => "Right Side View",
            ViewSlot::Top => "Top View",
        }
    }

    /// Stable filename used when the view is downloaded or exported
    pub fn download_filename(self) -> &'static str {
        match self {
            ViewSlot::Front => "front_view.png",
            ViewSlot::Back => "back_view.png",
            ViewSlot::Left => "left_side_view.png",
            ViewSlot::Right => "right_side_view.png",
            ViewSlot::Top => "top_view.png",
        }
    }

    /// Match a file stem such as `front`, `Top_View` or `right_side_view`
    pub fn from_file_stem(stem: &str) -> Option<ViewSlot> {
        let stem = stem.to_lowercase();
        ViewSlot::ALL.into_iter().find(|slot| {
            let name = slot.as_str();
            stem == name
                || stem == format!("{}_view", name)
                || stem == slot.download_filename().trim_end_matches(".png")
        })
    }
}

impl fmt::Display for ViewSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An encoded image (PNG, JPEG, ...) plus its format tag and content digest
///
/// Two payloads are equal when their bytes are equal, regardless of
/// where they came from.
#[derive(Clone)]
pub struct ImagePayload {
    bytes: Arc<[u8]>,
    format: ImageFormat,
    digest: blake3::Hash,
}

impl ImagePayload {
    /// Wrap encoded bytes, sniffing the format from the magic number
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let bytes = bytes.into();
        let format = image::guess_format(&bytes)
            .map_err(|e| BlueprintError::UnsupportedFormat(e.to_string()))?;
        Ok(Self::with_format(bytes, format))
    }

    /// Wrap encoded bytes with a known format tag (no sniffing)
    pub fn with_format(bytes: impl Into<Arc<[u8]>>, format: ImageFormat) -> Self {
        let bytes = bytes.into();
        let digest = blake3::hash(&bytes);
        Self {
            bytes,
            format,
            digest,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn digest(&self) -> blake3::Hash {
        self.digest
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl PartialEq for ImagePayload {
    fn eq(&self, other: &Self) -> bool {
        self.digest == other.digest && self.bytes == other.bytes
    }
}

impl Eq for ImagePayload {}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .field("digest", &&self.digest.to_hex()[..12])
            .finish()
    }
}

/// The five view slots of one blueprint batch
///
/// Every slot always exists; absence is an explicit `None`. The set is an
/// immutable snapshot: updates return a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSet {
    slots: [Option<ImagePayload>; 5],
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: ViewSlot) -> Option<&ImagePayload> {
        self.slots[slot.index()].as_ref()
    }

    /// Return a new snapshot with exactly one slot replaced
    pub fn with_view(&self, slot: ViewSlot, payload: Option<ImagePayload>) -> Self {
        let mut next = self.clone();
        next.slots[slot.index()] = payload;
        next
    }

    /// Readiness gate: true only when all five views are present
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn missing(&self) -> Vec<ViewSlot> {
        ViewSlot::ALL
            .into_iter()
            .filter(|slot| self.get(*slot).is_none())
            .collect()
    }

    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ViewSlot, Option<&ImagePayload>)> + '_ {
        ViewSlot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }

    /// Digest identifying the exact five inputs (absent slots included)
    pub fn digest(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for (slot, payload) in self.iter() {
            hasher.update(slot.as_str().as_bytes());
            match payload {
                Some(payload) => {
                    hasher.update(&[1]);
                    hasher.update(payload.digest().as_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
        }
        hasher.finalize()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    /// Encode a solid-colour PNG of the given size
    pub fn solid_png(width: u32, height: u32, color: [u8; 4]) -> ImagePayload {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        ImagePayload::from_bytes(buf).unwrap()
    }

    pub const RED: [u8; 4] = [220, 40, 40, 255];
    pub const GREEN: [u8; 4] = [40, 200, 60, 255];
    pub const BLUE: [u8; 4] = [40, 80, 220, 255];
    pub const YELLOW: [u8; 4] = [230, 210, 30, 255];
    pub const MAGENTA: [u8; 4] = [200, 40, 200, 255];

    /// Complete set: front=A red, back=B green, left=C blue, right=D yellow, top=E magenta
    pub fn complete_set() -> ImageSet {
        ImageSet::new()
            .with_view(ViewSlot::Front, Some(solid_png(100, 100, RED)))
            .with_view(ViewSlot::Back, Some(solid_png(100, 100, GREEN)))
            .with_view(ViewSlot::Left, Some(solid_png(100, 100, BLUE)))
            .with_view(ViewSlot::Right, Some(solid_png(100, 100, YELLOW)))
            .with_view(ViewSlot::Top, Some(solid_png(100, 100, MAGENTA)))
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_new_set_has_all_slots_absent() {
        let set = ImageSet::new();
        assert_eq!(set.present_count(), 0);
        assert_eq!(set.missing(), ViewSlot::ALL.to_vec());
        assert!(!set.is_complete());
    }

    #[test]
    fn test_readiness_requires_all_five() {
        let set = complete_set();
        assert!(set.is_complete());

        let without_top = set.with_view(ViewSlot::Top, None);
        assert!(!without_top.is_complete());
        assert_eq!(without_top.missing(), vec![ViewSlot::Top]);
        // The original snapshot is untouched
        assert!(set.is_complete());
    }

    #[test]
    fn test_payload_equality_is_by_content() {
        let a = solid_png(8, 8, RED);
        let b = solid_png(8, 8, RED);
        let c = solid_png(8, 8, BLUE);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.format(), ImageFormat::Png);
    }

    #[test]
    fn test_unknown_bytes_are_rejected() {
        let err = ImagePayload::from_bytes(b"not an image".to_vec()).unwrap_err();
        assert!(matches!(err, BlueprintError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_digest_tracks_every_slot() {
        let set = complete_set();
        let replaced = set.with_view(ViewSlot::Left, Some(solid_png(100, 100, RED)));
        assert_ne!(set.digest(), replaced.digest());
        assert_eq!(set.digest(), complete_set().digest());

        // Moving a payload to another slot is a different set
        let swapped = ImageSet::new().with_view(ViewSlot::Front, Some(solid_png(4, 4, RED)));
        let moved = ImageSet::new().with_view(ViewSlot::Back, Some(solid_png(4, 4, RED)));
        assert_ne!(swapped.digest(), moved.digest());
    }

    #[test]
    fn test_slot_names_from_file_stems() {
        assert_eq!(ViewSlot::from_file_stem("front"), Some(ViewSlot::Front));
        assert_eq!(ViewSlot::from_file_stem("Top_View"), Some(ViewSlot::Top));
        assert_eq!(
            ViewSlot::from_file_stem("right_side_view"),
            Some(ViewSlot::Right)
        );
        assert_eq!(ViewSlot::from_file_stem("left_view"), Some(ViewSlot::Left));
        assert_eq!(ViewSlot::from_file_stem("combined_blueprint"), None);
    }
}
