//! Catch and miss detection
//!
//! A droplet is only caught from above: its bottom edge has to sit inside a
//! thin band just under the bucket's top edge on the frame the two
//! rectangles overlap. A droplet that has already sunk below the band is
//! treated as passing through the bucket and keeps falling.

use super::rect::Rect;

/// Whether `droplet_bottom` lies in `(bucket_top - band, bucket_top]`
#[inline]
pub fn in_capture_band(droplet_bottom: f32, bucket_top: f32, band: f32) -> bool {
    droplet_bottom <= bucket_top && droplet_bottom > bucket_top - band
}

/// Full catch test: capture band plus rectangle overlap
pub fn is_caught(droplet: &Rect, bucket: &Rect, band: f32) -> bool {
    in_capture_band(droplet.y, bucket.top(), band) && droplet.overlaps(bucket)
}

/// A droplet below the playfield floor ends the run
#[inline]
pub fn hit_floor(droplet: &Rect) -> bool {
    droplet.y < 0.0
}
