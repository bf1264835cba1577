//! Candidate clustering: disjoint-set union of overlapping rectangles.

use std::collections::BTreeMap;

use crate::types::{Detection, Rect};

/// Flat-array disjoint set with iterative find and path compression.
///
/// No union-by-rank: candidate clusters are small and the compression keeps
/// chains short enough.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<u32>,
}

impl DisjointSet {
    /// `len` singleton sets, each its own representative.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len as u32).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the set holding `i`, compressing the visited path.
    pub fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] as usize != root {
            root = self.parent[root] as usize;
        }
        let mut cur = i;
        while self.parent[cur] as usize != cur {
            let next = self.parent[cur] as usize;
            self.parent[cur] = root as u32;
            cur = next;
        }
        root
    }

    /// Merge the sets holding `i` and `j`.
    pub fn union(&mut self, i: usize, j: usize) {
        let i_rep = self.find(i);
        let j_rep = self.find(j);
        self.parent[i_rep] = j_rep as u32;
    }
}

/// Merge overlapping candidates into averaged detections.
///
/// Two rectangles land in the same cluster when both
/// `overlap / (a1 * (a1 / a2)) >= regions_overlap` and
/// `overlap / (a2 * (a1 / a2)) >= regions_overlap` hold. Note the criterion
/// is asymmetric in the two areas (the second test simplifies to
/// `overlap * a2 / a1^2`); it is kept for drop-in compatibility with
/// existing deployments, where a symmetric rule would instead use
/// `overlap / min(a1, a2)`.
///
/// Each cluster yields one detection whose coordinates are the rounded
/// arithmetic means of its members, with `total` counting the members.
/// Clusters are emitted in numeric order of their representative index, so
/// the output order is deterministic for a fixed input order.
pub fn merge_rectangles(rects: &[Rect], regions_overlap: f64) -> Vec<Detection> {
    let mut set = DisjointSet::new(rects.len());
    for i in 0..rects.len() {
        for j in 0..rects.len() {
            let (a, b) = (&rects[i], &rects[j]);
            if !intersects(a, b) {
                continue;
            }
            let x1 = f64::from(a.x.max(b.x));
            let y1 = f64::from(a.y.max(b.y));
            let x2 = f64::from((a.x + a.width).min(b.x + b.width));
            let y2 = f64::from((a.y + a.height).min(b.y + b.height));
            let overlap = (x1 - x2) * (y1 - y2);
            let area1 = a.area() as f64;
            let area2 = b.area() as f64;
            if overlap / (area1 * (area1 / area2)) >= regions_overlap
                && overlap / (area2 * (area1 / area2)) >= regions_overlap
            {
                set.union(i, j);
            }
        }
    }

    #[derive(Default)]
    struct Accum {
        total: u64,
        x: u64,
        y: u64,
        width: u64,
        height: u64,
    }

    let mut groups: BTreeMap<usize, Accum> = BTreeMap::new();
    for k in 0..rects.len() {
        let rep = set.find(k);
        let entry = groups.entry(rep).or_default();
        entry.total += 1;
        entry.x += u64::from(rects[k].x);
        entry.y += u64::from(rects[k].y);
        entry.width += u64::from(rects[k].width);
        entry.height += u64::from(rects[k].height);
    }

    groups
        .into_values()
        .map(|g| {
            let total = g.total as f64;
            Detection {
                x: (g.x as f64 / total + 0.5) as u32,
                y: (g.y as f64 / total + 0.5) as u32,
                width: (g.width as f64 / total + 0.5) as u32,
                height: (g.height as f64 / total + 0.5) as u32,
                total: g.total as u32,
            }
        })
        .collect()
}

/// Axis-aligned overlap with positive area; touching edges do not count.
#[inline]
fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
}
