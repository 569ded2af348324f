use serde::{Deserialize, Serialize};

use crate::types::BoundingBox;

/// Cumulative pixel offset of a frame's origin relative to the top-level
/// viewport. Adding it to a frame-local bounding box yields coordinates
/// in the top-level viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameOffset {
    pub x: f64,
    pub y: f64,
}

impl FrameOffset {
    pub const ZERO: FrameOffset = FrameOffset { x: 0.0, y: 0.0 };

    /// Extend this offset by one more frame boundary. `boundary` is the
    /// embedding element's position within the parent frame; `None` means
    /// the boundary element could not be inspected (common for
    /// cross-origin embeds), which contributes zero and marks the result
    /// approximate.
    pub fn compose(self, boundary: Option<&BoundingBox>) -> (FrameOffset, bool) {
        match boundary {
            Some(rect) => (
                FrameOffset {
                    x: self.x + rect.x,
                    y: self.y + rect.y,
                },
                false,
            ),
            None => (self, true),
        }
    }

    /// Translate a frame-local bounding box into top-level viewport
    /// coordinates.
    pub fn translate(&self, rect: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x: rect.x + self.x,
            y: rect.y + self.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Sum an ancestor chain of boundary-element positions, main frame first.
/// Returns the cumulative offset and whether any link was uninspectable.
pub fn accumulate(chain: &[Option<BoundingBox>]) -> (FrameOffset, bool) {
    let mut offset = FrameOffset::ZERO;
    let mut approximate = false;
    for link in chain {
        let (next, missing) = offset.compose(link.as_ref());
        offset = next;
        approximate |= missing;
    }
    (offset, approximate)
}

#[cfg(test)]
#[path = "offset_test.rs"]
mod offset_test;
