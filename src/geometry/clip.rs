//! Drop ring points that cannot affect what is visible inside a rectangle.
//!
//! When three consecutive points all lie strictly on the same outer side of
//! the rectangle (all left, all right, all above or all below), the chord that
//! replaces the middle point stays on that side too, so the silhouette inside
//! and around the rectangle is unchanged.

use super::{Bounds, Point2D};

type Zone = (i8, i8);

fn is_redundant(prev: Zone, mid: Zone, next: Zone) -> bool {
    (mid.0 != 0 && prev.0 == mid.0 && mid.0 == next.0)
        || (mid.1 != 0 && prev.1 == mid.1 && mid.1 == next.1)
}

/// Simplify a closed ring against the rectangle of interest.
///
/// The input must be closed (first point equals last). The output is closed
/// again and starts at the first surviving point. Rings lying completely on
/// one side of the rectangle collapse below 4 points; callers drop those.
pub fn clip_ring(ring: &[Point2D], rect: &Bounds) -> Vec<Point2D> {
    if ring.len() < 4 {
        return ring.to_vec();
    }

    let open = &ring[..ring.len() - 1];
    let mut kept: Vec<(Point2D, Zone)> = Vec::with_capacity(open.len());

    // forward pass; each removal re-checks the triple that becomes adjacent
    for &p in open {
        kept.push((p, rect.zone(p)));
        while kept.len() >= 3 {
            let n = kept.len();
            if is_redundant(kept[n - 3].1, kept[n - 2].1, kept[n - 1].1) {
                kept.remove(n - 2);
            } else {
                break;
            }
        }
    }

    // wraparound across the closing point
    while kept.len() > 3 {
        let n = kept.len();
        if is_redundant(kept[n - 2].1, kept[n - 1].1, kept[0].1) {
            kept.pop();
        } else if is_redundant(kept[n - 1].1, kept[0].1, kept[1].1) {
            kept.remove(0);
        } else {
            break;
        }
    }

    let mut out: Vec<Point2D> = kept.into_iter().map(|(p, _)| p).collect();
    if let Some(&first) = out.first() {
        out.push(first);
    }
    out
}
