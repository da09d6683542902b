//! Incremental Delaunay Triangulation
//!
//! Builds a 2D Delaunay triangulation with halfedge connectivity using the
//! sweep-circle construction popularized by the delaunator family of
//! libraries.
//!
//! # Algorithm
//!
//! A seed triangle is formed from the point nearest the bounding-box center,
//! its nearest neighbor, and the point giving the smallest circumcircle with
//! those two. The remaining points are sorted by distance from the seed
//! triangle's circumcenter and inserted in that order. Each insertion finds a
//! hull edge visible from the new point (a pseudo-angle hash gives the
//! starting guess), fans triangles across all visible edges, and legalizes
//! every new edge with in-circle flips until the Delaunay condition holds.
//!
//! The advancing hull is kept as index arrays (`prev`/`next`/`tri` keyed by
//! point index), so hull surgery is plain array writes.
//!
//! # References
//!
//! - [delaunator](https://github.com/mapbox/delaunator) - the incremental
//!   algorithm this module follows

use glam::DVec2;

use crate::error::{DungeonError, Result};

/// Sentinel for a missing halfedge twin (hull boundary) or point index
pub const EMPTY: usize = usize::MAX;

/// Tolerance for treating two points as the same point
const EPSILON: f64 = f64::EPSILON * 2.0;

/// Next halfedge around the same triangle
#[inline]
pub fn next_halfedge(e: usize) -> usize {
    if e % 3 == 2 {
        e - 2
    } else {
        e + 1
    }
}

/// Previous halfedge around the same triangle
#[inline]
pub fn prev_halfedge(e: usize) -> usize {
    if e % 3 == 0 {
        e + 2
    } else {
        e - 1
    }
}

fn orient(p: DVec2, q: DVec2, r: DVec2) -> bool {
    (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y) < 0.0
}

/// Squared circumradius of the triangle `(a, b, c)`, or `f64::MAX` when the
/// points are collinear or coincident
fn circumradius(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    let d = b - a;
    let e = c - a;

    let bl = d.length_squared();
    let cl = e.length_squared();
    let det = d.x * e.y - d.y * e.x;

    let x = (e.y * bl - d.y * cl) * 0.5 / det;
    let y = (d.x * cl - e.x * bl) * 0.5 / det;

    if bl != 0.0 && cl != 0.0 && det != 0.0 {
        x * x + y * y
    } else {
        f64::MAX
    }
}

fn circumcenter(a: DVec2, b: DVec2, c: DVec2) -> DVec2 {
    let d = b - a;
    let e = c - a;

    let bl = d.length_squared();
    let cl = e.length_squared();
    let det = d.x * e.y - d.y * e.x;

    a + DVec2::new(
        (e.y * bl - d.y * cl) * 0.5 / det,
        (d.x * cl - e.x * bl) * 0.5 / det,
    )
}

/// True when `p` lies strictly inside the circumcircle of `(a, b, c)`
fn in_circle(a: DVec2, b: DVec2, c: DVec2, p: DVec2) -> bool {
    let d = a - p;
    let e = b - p;
    let f = c - p;

    let ap = d.length_squared();
    let bp = e.length_squared();
    let cp = f.length_squared();

    d.x * (e.y * cp - bp * f.y) - d.y * (e.x * cp - bp * f.x) + ap * (e.x * f.y - e.y * f.x)
        < 0.0
}

fn points_equal(a: DVec2, b: DVec2) -> bool {
    (a.x - b.x).abs() <= EPSILON && (a.y - b.y).abs() <= EPSILON
}

/// Monotonically increases with the real angle; avoids trigonometry
fn pseudo_angle(d: DVec2) -> f64 {
    let p = d.x / (d.x.abs() + d.y.abs());
    (if d.y > 0.0 { 3.0 - p } else { 1.0 + p }) / 4.0 // [0..1)
}

/// A Delaunay triangulation with halfedge connectivity
///
/// Triangle `t` owns halfedges `3t`, `3t+1`, `3t+2`. Halfedge `e` runs from
/// `triangles[e]` to `triangles[next_halfedge(e)]`; `halfedges[e]` is the
/// oppositely directed halfedge in the adjacent triangle, or [`EMPTY`] when
/// `e` lies on the convex hull.
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// Point indices of the triangle corners, as flat triples in a single
    /// consistent winding
    pub triangles: Vec<usize>,
    /// Twin halfedge of each halfedge, or [`EMPTY`] on the hull
    pub halfedges: Vec<usize>,
    /// Point indices on the convex hull, in boundary traversal order
    pub hull: Vec<usize>,
}

impl Triangulation {
    fn with_capacity(n: usize) -> Self {
        let max_triangles = 2 * n - 5;
        Self {
            triangles: Vec::with_capacity(max_triangles * 3),
            halfedges: Vec::with_capacity(max_triangles * 3),
            hull: Vec::new(),
        }
    }

    /// Number of triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Point indices of triangle `t`
    #[inline]
    pub fn triangle_points(&self, t: usize) -> [usize; 3] {
        [
            self.triangles[3 * t],
            self.triangles[3 * t + 1],
            self.triangles[3 * t + 2],
        ]
    }

    /// Iterate the deduplicated undirected edges as `(smaller, larger)`
    /// point index pairs
    ///
    /// Each twin pair is reported once, at its lower halfedge index; hull
    /// halfedges have no twin and are always reported. The order is fixed by
    /// the halfedge layout, which matters to callers drawing per-edge
    /// randomness.
    pub fn undirected_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.triangles.len()).filter_map(move |e| {
            if e < self.halfedges[e] {
                let a = self.triangles[e];
                let b = self.triangles[next_halfedge(e)];
                Some((a.min(b), a.max(b)))
            } else {
                None
            }
        })
    }

    /// Endpoint pair of halfedge `e`
    #[inline]
    pub fn halfedge_endpoints(&self, e: usize) -> (usize, usize) {
        (self.triangles[e], self.triangles[next_halfedge(e)])
    }

    fn add_triangle(
        &mut self,
        i0: usize,
        i1: usize,
        i2: usize,
        a: usize,
        b: usize,
        c: usize,
    ) -> usize {
        let t = self.triangles.len();
        self.triangles.push(i0);
        self.triangles.push(i1);
        self.triangles.push(i2);
        self.link(t, a);
        self.link(t + 1, b);
        self.link(t + 2, c);
        t
    }

    fn link(&mut self, a: usize, b: usize) {
        let s = self.halfedges.len();
        if a == s {
            self.halfedges.push(b);
        } else if a < s {
            self.halfedges[a] = b;
        } else {
            unreachable!("halfedge {} linked past arena end {}", a, s);
        }

        if b != EMPTY {
            let s = self.halfedges.len();
            if b == s {
                self.halfedges.push(a);
            } else if b < s {
                self.halfedges[b] = a;
            } else {
                unreachable!("halfedge {} linked past arena end {}", b, s);
            }
        }
    }

    /// Restore the Delaunay condition around halfedge `a` by edge flips
    ///
    /// If the opposite vertex of the twin triangle lies inside the current
    /// triangle's circumcircle, the shared edge is flipped and both new edges
    /// are re-checked. The flip cascade runs on an explicit stack instead of
    /// recursion, so the depth is bounded by the stack allocation and every
    /// twin-map update happens in one visible place.
    ///
    /// Returns a halfedge on the hull side of the final fan, used by the
    /// caller as the new hull triangle marker.
    fn legalize(&mut self, a: usize, points: &[DVec2], hull: &mut Hull) -> usize {
        let mut stack: Vec<usize> = Vec::new();
        let mut a = a;
        let mut ar;

        loop {
            let b = self.halfedges[a];

            let a0 = a - a % 3;
            ar = a0 + (a + 2) % 3;

            // hull edges have no twin to check against
            if b == EMPTY {
                match stack.pop() {
                    Some(edge) => {
                        a = edge;
                        continue;
                    }
                    None => break,
                }
            }

            let b0 = b - b % 3;
            let al = a0 + (a + 1) % 3;
            let bl = b0 + (b + 2) % 3;

            let p0 = self.triangles[ar];
            let pr = self.triangles[a];
            let pl = self.triangles[al];
            let p1 = self.triangles[bl];

            let illegal = in_circle(points[p0], points[pr], points[pl], points[p1]);
            if illegal {
                self.triangles[a] = p1;
                self.triangles[b] = p0;

                let hbl = self.halfedges[bl];

                // the flipped edge sat on the hull (rare); repoint its marker
                if hbl == EMPTY {
                    let mut e = hull.start;
                    loop {
                        if hull.tri[e] == bl {
                            hull.tri[e] = a;
                            break;
                        }
                        e = hull.next[e];
                        if e == hull.start {
                            break;
                        }
                    }
                }

                self.link(a, hbl);
                let har = self.halfedges[ar];
                self.link(b, har);
                self.link(ar, bl);

                let br = b0 + (b + 1) % 3;
                stack.push(br);
            } else {
                match stack.pop() {
                    Some(edge) => a = edge,
                    None => break,
                }
            }
        }

        ar
    }
}

/// Advancing convex hull, tracked as index arrays keyed by point index
///
/// `next[e] == e` marks a point that left the hull. The hash maps the
/// pseudo-angle of a point (seen from the seed circumcenter) to a recent
/// hull point near that angle, giving the visible-edge search its start.
struct Hull {
    prev: Vec<usize>,
    next: Vec<usize>,
    tri: Vec<usize>,
    hash: Vec<usize>,
    start: usize,
    center: DVec2,
}

impl Hull {
    fn new(
        n: usize,
        center: DVec2,
        i0: usize,
        i1: usize,
        i2: usize,
        points: &[DVec2],
    ) -> Self {
        let hash_size = (n as f64).sqrt().ceil() as usize;
        let mut hull = Self {
            prev: vec![0; n],
            next: vec![0; n],
            tri: vec![0; n],
            hash: vec![EMPTY; hash_size],
            start: i0,
            center,
        };

        hull.next[i0] = i1;
        hull.prev[i2] = i1;
        hull.next[i1] = i2;
        hull.prev[i0] = i2;
        hull.next[i2] = i0;
        hull.prev[i1] = i0;

        hull.tri[i0] = 0;
        hull.tri[i1] = 1;
        hull.tri[i2] = 2;

        hull.hash_edge(points[i0], i0);
        hull.hash_edge(points[i1], i1);
        hull.hash_edge(points[i2], i2);

        hull
    }

    fn hash_key(&self, p: DVec2) -> usize {
        let angle = pseudo_angle(p - self.center);
        ((angle * self.hash.len() as f64).floor() as usize) % self.hash.len()
    }

    fn hash_edge(&mut self, p: DVec2, i: usize) {
        let key = self.hash_key(p);
        self.hash[key] = i;
    }
}

/// Compute the Delaunay triangulation of a point set
///
/// # Errors
///
/// Returns `DegenerateGeometry` when fewer than 3 points are given, when all
/// points coincide, or when no triple of points spans a finite circumcircle
/// (all points collinear).
///
/// # Example
///
/// ```rust
/// use dungeon_graph::generation::triangulate;
/// use glam::DVec2;
///
/// let points = vec![
///     DVec2::new(0.0, 0.0),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(0.0, 1.0),
///     DVec2::new(1.0, 1.0),
/// ];
/// let triangulation = triangulate(&points).unwrap();
/// assert_eq!(triangulation.triangle_count(), 2);
/// ```
pub fn triangulate(points: &[DVec2]) -> Result<Triangulation> {
    let n = points.len();
    if n < 3 {
        return Err(DungeonError::DegenerateGeometry(format!(
            "triangulation needs at least 3 points (got {})",
            n
        )));
    }

    let mut min = DVec2::splat(f64::MAX);
    let mut max = DVec2::splat(f64::MIN);
    for p in points {
        min = min.min(*p);
        max = max.max(*p);
    }
    let bbox_center = (min + max) * 0.5;

    // pick a seed point close to the bounding box center
    let mut i0 = 0;
    let mut min_dist = f64::MAX;
    for (i, p) in points.iter().enumerate() {
        let d = p.distance_squared(bbox_center);
        if d < min_dist {
            i0 = i;
            min_dist = d;
        }
    }
    let p0 = points[i0];

    // find the point closest to the seed
    let mut i1 = EMPTY;
    let mut min_dist = f64::MAX;
    for (i, p) in points.iter().enumerate() {
        if i == i0 {
            continue;
        }
        let d = p.distance_squared(p0);
        if d < min_dist && d > 0.0 {
            i1 = i;
            min_dist = d;
        }
    }
    if i1 == EMPTY {
        return Err(DungeonError::DegenerateGeometry(
            "all points coincide".to_string(),
        ));
    }
    let mut p1 = points[i1];

    // find the third point forming the smallest circumcircle with those two
    let mut i2 = EMPTY;
    let mut min_radius = f64::MAX;
    for (i, p) in points.iter().enumerate() {
        if i == i0 || i == i1 {
            continue;
        }
        let r = circumradius(p0, p1, *p);
        if r < min_radius {
            i2 = i;
            min_radius = r;
        }
    }
    if i2 == EMPTY {
        return Err(DungeonError::DegenerateGeometry(
            "no seed triangle with a finite circumcircle, points may be collinear".to_string(),
        ));
    }
    let mut p2 = points[i2];

    if orient(p0, p1, p2) {
        std::mem::swap(&mut i1, &mut i2);
        std::mem::swap(&mut p1, &mut p2);
    }

    let center = circumcenter(p0, p1, p2);

    // sort the points by distance from the seed triangle circumcenter,
    // breaking ties by coordinates
    let dists: Vec<f64> = points.iter().map(|p| p.distance_squared(center)).collect();
    let mut ids: Vec<usize> = (0..n).collect();
    ids.sort_unstable_by(|&i, &j| {
        dists[i]
            .partial_cmp(&dists[j])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                points[i]
                    .x
                    .partial_cmp(&points[j].x)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| {
                points[i]
                    .y
                    .partial_cmp(&points[j].y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    let mut hull = Hull::new(n, center, i0, i1, i2, points);
    let mut triangulation = Triangulation::with_capacity(n);
    triangulation.add_triangle(i0, i1, i2, EMPTY, EMPTY, EMPTY);

    let mut prev_point = DVec2::NAN;
    for (k, &i) in ids.iter().enumerate() {
        let p = points[i];

        // skip near-duplicate points
        if k > 0 && points_equal(p, prev_point) {
            continue;
        }
        prev_point = p;

        // skip seed triangle points
        if points_equal(p, p0) || points_equal(p, p1) || points_equal(p, p2) {
            continue;
        }

        // find a visible edge on the convex hull, starting from the edge hash
        let mut start = 0;
        let key = hull.hash_key(p);
        for j in 0..hull.hash.len() {
            start = hull.hash[(key + j) % hull.hash.len()];
            if start != EMPTY && start != hull.next[start] {
                break;
            }
        }

        start = hull.prev[start];
        let mut e = start;
        loop {
            let q = hull.next[e];
            if orient(p, points[e], points[q]) {
                break;
            }
            e = q;
            if e == start {
                e = EMPTY;
                break;
            }
        }
        if e == EMPTY {
            // likely a near-duplicate point; skip it
            continue;
        }

        // add the first triangle from the point
        let t = triangulation.add_triangle(e, i, hull.next[e], EMPTY, EMPTY, hull.tri[e]);

        let marker = triangulation.legalize(t + 2, points, &mut hull);
        hull.tri[i] = marker;
        hull.tri[e] = t;

        // walk forward through the hull, adding more triangles and flipping
        let mut next = hull.next[e];
        loop {
            let q = hull.next[next];
            if !orient(p, points[next], points[q]) {
                break;
            }
            let t = triangulation.add_triangle(next, i, q, hull.tri[i], EMPTY, hull.tri[next]);
            let marker = triangulation.legalize(t + 2, points, &mut hull);
            hull.tri[i] = marker;
            hull.next[next] = next; // mark as removed
            next = q;
        }

        // walk backward from the other side, adding more triangles and flipping
        if e == start {
            loop {
                let q = hull.prev[e];
                if !orient(p, points[q], points[e]) {
                    break;
                }
                let t = triangulation.add_triangle(q, i, e, EMPTY, hull.tri[e], hull.tri[q]);
                triangulation.legalize(t + 2, points, &mut hull);
                hull.tri[q] = t;
                hull.next[e] = e; // mark as removed
                e = q;
            }
        }

        // splice the new point into the hull
        hull.prev[i] = e;
        hull.start = e;
        hull.prev[next] = i;
        hull.next[e] = i;
        hull.next[i] = next;

        hull.hash_edge(p, i);
        hull.hash_edge(points[e], e);
    }

    // read the final hull off the link arrays
    let mut hull_points = Vec::new();
    let mut e = hull.start;
    loop {
        hull_points.push(e);
        e = hull.next[e];
        if e == hull.start {
            break;
        }
    }
    triangulation.hull = hull_points;

    Ok(triangulation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SampleRegion;
    use crate::generation::poisson::generate_poisson_points;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn sample_points(count: usize, seed: u64) -> Vec<DVec2> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate_poisson_points(count, SampleRegion::Square, &mut rng)
    }

    #[test]
    fn test_unit_square() {
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, 1.0),
        ];
        let t = triangulate(&points).unwrap();

        assert_eq!(t.triangle_count(), 2);
        assert_eq!(t.halfedges.len(), 6);
        assert_eq!(t.hull.len(), 4);

        // the two triangles share exactly one edge (the diagonal)
        let twinned = t.halfedges.iter().filter(|&&h| h != EMPTY).count();
        assert_eq!(twinned, 2);

        // together they use all four corners
        let used: HashSet<usize> = t.triangles.iter().copied().collect();
        assert_eq!(used.len(), 4);
    }

    #[test]
    fn test_too_few_points() {
        assert!(triangulate(&[]).is_err());
        assert!(triangulate(&[DVec2::new(0.0, 0.0)]).is_err());
        assert!(triangulate(&[DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0)]).is_err());
    }

    #[test]
    fn test_collinear_points() {
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(3.0, 3.0),
        ];
        let result = triangulate(&points);
        assert!(matches!(
            result,
            Err(DungeonError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_coincident_points() {
        let points = vec![DVec2::new(0.5, 0.5); 5];
        assert!(triangulate(&points).is_err());
    }

    #[test]
    fn test_halfedge_twins() {
        let points = sample_points(40, 42);
        let t = triangulate(&points).unwrap();

        for e in 0..t.halfedges.len() {
            let twin = t.halfedges[e];
            if twin == EMPTY {
                continue;
            }
            assert_eq!(t.halfedges[twin], e, "twin map is not an involution at {}", e);

            // twins are the same edge travelled in opposite directions
            let (a, b) = t.halfedge_endpoints(e);
            let (c, d) = t.halfedge_endpoints(twin);
            assert_eq!((a, b), (d, c));
        }
    }

    #[test]
    fn test_consistent_winding() {
        let points = sample_points(40, 7);
        let t = triangulate(&points).unwrap();

        for tri in 0..t.triangle_count() {
            let [a, b, c] = t.triangle_points(tri);
            let ab = points[b] - points[a];
            let ac = points[c] - points[a];
            let cross = ab.x * ac.y - ab.y * ac.x;
            assert!(cross < 0.0, "triangle {} has flipped winding", tri);
        }
    }

    #[test]
    fn test_delaunay_property() {
        let points = sample_points(50, 1337);
        let t = triangulate(&points).unwrap();

        for tri in 0..t.triangle_count() {
            let [a, b, c] = t.triangle_points(tri);
            let center = circumcenter(points[a], points[b], points[c]);
            let radius_sq = points[a].distance_squared(center);

            for (i, p) in points.iter().enumerate() {
                if i == a || i == b || i == c {
                    continue;
                }
                assert!(
                    p.distance_squared(center) >= radius_sq - 1e-9,
                    "point {} is inside the circumcircle of triangle {}",
                    i,
                    tri
                );
            }
        }
    }

    #[test]
    fn test_undirected_edge_count() {
        let points = sample_points(60, 99);
        let t = triangulate(&points).unwrap();

        let edges: Vec<(usize, usize)> = t.undirected_edges().collect();
        let unique: HashSet<(usize, usize)> = edges.iter().copied().collect();

        assert_eq!(edges.len(), unique.len(), "duplicate undirected edges");
        for &(a, b) in &edges {
            assert!(a < b);
            assert!(b < points.len());
        }

        // every triangle contributes three halfedges; interior edges are
        // shared by two triangles, hull edges by one
        let expected = (3 * t.triangle_count() + t.hull.len()) / 2;
        assert_eq!(edges.len(), expected);
    }

    #[test]
    fn test_halfedge_helpers() {
        assert_eq!(next_halfedge(0), 1);
        assert_eq!(next_halfedge(1), 2);
        assert_eq!(next_halfedge(2), 0);
        assert_eq!(next_halfedge(4), 5);
        assert_eq!(next_halfedge(5), 3);

        assert_eq!(prev_halfedge(0), 2);
        assert_eq!(prev_halfedge(1), 0);
        assert_eq!(prev_halfedge(2), 1);
        assert_eq!(prev_halfedge(3), 5);
    }

    #[test]
    fn test_triangulation_determinism() {
        let points = sample_points(30, 4242);
        let t1 = triangulate(&points).unwrap();
        let t2 = triangulate(&points).unwrap();

        assert_eq!(t1.triangles, t2.triangles);
        assert_eq!(t1.halfedges, t2.halfedges);
        assert_eq!(t1.hull, t2.hull);
    }
}
