//! Simple Features geometry model.
//!
//! A compact object model for the OpenGIS Simple Features types. Only the
//! accessors needed by the operations in this crate are provided: emptiness,
//! dimension, envelope, area, and component coordinate sequences.

use crate::geom::{Coordinate, Envelope};
use crate::robust::{orientation, Orientation};

/// A single point, possibly empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point {
    pub coord: Option<Coordinate>,
}

impl Point {
    /// Creates a point at the given coordinate.
    #[inline]
    pub fn new(coord: Coordinate) -> Self {
        Self { coord: Some(coord) }
    }

    /// Creates an empty point.
    #[inline]
    pub fn empty() -> Self {
        Self { coord: None }
    }

    /// Returns true if this point has no coordinate.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coord.is_none()
    }
}

/// An open polyline, empty or with at least two coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString {
    pub coords: Vec<Coordinate>,
}

impl LineString {
    /// Creates a line string from a coordinate sequence.
    ///
    /// The sequence must be empty or hold at least two coordinates.
    pub fn new(coords: Vec<Coordinate>) -> Self {
        debug_assert!(coords.is_empty() || coords.len() >= 2);
        Self { coords }
    }

    /// Creates an empty line string.
    #[inline]
    pub fn empty() -> Self {
        Self { coords: Vec::new() }
    }

    /// Returns true if this line string has no coordinates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

/// A closed, simple ring: empty, or at least four coordinates with the
/// first equal to the last.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearRing {
    pub coords: Vec<Coordinate>,
}

impl LinearRing {
    /// Creates a ring, closing the sequence if the caller left it open.
    pub fn new(mut coords: Vec<Coordinate>) -> Self {
        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if first != last {
                coords.push(first);
            }
        }
        debug_assert!(coords.is_empty() || coords.len() >= 4);
        Self { coords }
    }

    /// Creates an empty ring.
    #[inline]
    pub fn empty() -> Self {
        Self { coords: Vec::new() }
    }

    /// Returns true if this ring has no coordinates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Returns the signed area: positive for counter-clockwise winding.
    #[inline]
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.coords)
    }

    /// Tests whether the ring winds counter-clockwise.
    #[inline]
    pub fn is_ccw(&self) -> bool {
        is_ccw(&self.coords)
    }

    /// Returns a ring with reversed winding.
    pub fn reversed(&self) -> Self {
        let mut coords = self.coords.clone();
        coords.reverse();
        Self { coords }
    }
}

/// A polygon with one shell and zero or more holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub shell: LinearRing,
    pub holes: Vec<LinearRing>,
}

impl Polygon {
    /// Creates a polygon from a shell and holes.
    #[inline]
    pub fn new(shell: LinearRing, holes: Vec<LinearRing>) -> Self {
        Self { shell, holes }
    }

    /// Creates an empty polygon.
    #[inline]
    pub fn empty() -> Self {
        Self {
            shell: LinearRing::empty(),
            holes: Vec::new(),
        }
    }

    /// Returns true if the polygon's shell is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shell.is_empty()
    }

    /// Returns the area of the polygon: shell area minus hole areas.
    pub fn area(&self) -> f64 {
        let mut area = self.shell.signed_area().abs();
        for hole in &self.holes {
            area -= hole.signed_area().abs();
        }
        area
    }
}

/// Any Simple Features geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(Vec<Point>),
    MultiLineString(Vec<LineString>),
    MultiPolygon(Vec<Polygon>),
    Collection(Vec<Geometry>),
}

impl Geometry {
    /// Returns true if the geometry contains no coordinates.
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(p) => p.is_empty(),
            Geometry::LineString(l) => l.is_empty(),
            Geometry::Polygon(p) => p.is_empty(),
            Geometry::MultiPoint(ps) => ps.iter().all(Point::is_empty),
            Geometry::MultiLineString(ls) => ls.iter().all(LineString::is_empty),
            Geometry::MultiPolygon(ps) => ps.iter().all(Polygon::is_empty),
            Geometry::Collection(gs) => gs.iter().all(Geometry::is_empty),
        }
    }

    /// Returns the topological dimension: 0 for points, 1 for lines,
    /// 2 for polygons, and the maximum over collection members.
    pub fn dimension(&self) -> u8 {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => 0,
            Geometry::LineString(_) | Geometry::MultiLineString(_) => 1,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => 2,
            Geometry::Collection(gs) => gs.iter().map(Geometry::dimension).max().unwrap_or(0),
        }
    }

    /// Returns the envelope of the geometry; empty for empty geometries.
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::empty();
        for seq in self.coord_seqs() {
            for &c in seq {
                env.expand_to_include(c);
            }
        }
        env
    }

    /// Returns the total area of the polygonal components.
    pub fn area(&self) -> f64 {
        match self {
            Geometry::Polygon(p) => p.area(),
            Geometry::MultiPolygon(ps) => ps.iter().map(Polygon::area).sum(),
            Geometry::Collection(gs) => gs.iter().map(Geometry::area).sum(),
            _ => 0.0,
        }
    }

    /// Returns every constituent coordinate sequence.
    ///
    /// Point coordinates appear as one-element slices; polygon shells and
    /// holes as their closed ring sequences.
    pub fn coord_seqs(&self) -> Vec<&[Coordinate]> {
        let mut seqs = Vec::new();
        self.collect_seqs(&mut seqs);
        seqs
    }

    fn collect_seqs<'a>(&'a self, out: &mut Vec<&'a [Coordinate]>) {
        match self {
            Geometry::Point(p) => {
                if let Some(c) = &p.coord {
                    out.push(std::slice::from_ref(c));
                }
            }
            Geometry::LineString(l) => {
                if !l.is_empty() {
                    out.push(&l.coords);
                }
            }
            Geometry::Polygon(p) => {
                if !p.is_empty() {
                    out.push(&p.shell.coords);
                    for hole in &p.holes {
                        out.push(&hole.coords);
                    }
                }
            }
            Geometry::MultiPoint(ps) => {
                for p in ps {
                    if let Some(c) = &p.coord {
                        out.push(std::slice::from_ref(c));
                    }
                }
            }
            Geometry::MultiLineString(ls) => {
                for l in ls {
                    if !l.is_empty() {
                        out.push(&l.coords);
                    }
                }
            }
            Geometry::MultiPolygon(ps) => {
                for p in ps {
                    if !p.is_empty() {
                        out.push(&p.shell.coords);
                        for hole in &p.holes {
                            out.push(&hole.coords);
                        }
                    }
                }
            }
            Geometry::Collection(gs) => {
                for g in gs {
                    g.collect_seqs(out);
                }
            }
        }
    }
}

/// Computes the signed area of a ring using the shoelace formula.
///
/// Positive for counter-clockwise winding. The ring may be open or closed.
pub fn signed_area(coords: &[Coordinate]) -> f64 {
    if coords.len() < 3 {
        return 0.0;
    }
    let n = coords.len();
    let closed = coords[0] == coords[n - 1];
    let last = if closed { n - 1 } else { n };

    let mut area = 0.0;
    for i in 0..last {
        let j = (i + 1) % last;
        area += coords[i].x * coords[j].y;
        area -= coords[j].x * coords[i].y;
    }
    area / 2.0
}

/// Tests whether a ring winds counter-clockwise.
///
/// Uses the orientation at the highest vertex rather than the area sign,
/// so self-crossing rings still get a definite answer from the winding
/// near the top of the figure.
pub fn is_ccw(coords: &[Coordinate]) -> bool {
    if coords.len() < 4 {
        return false;
    }
    let n = coords.len() - 1; // ignore the closing duplicate

    // highest point, first occurrence
    let mut hi = 0;
    for i in 1..n {
        if coords[i].y > coords[hi].y {
            hi = i;
        }
    }

    // previous and next distinct points around the ring
    let mut i_prev = hi;
    loop {
        i_prev = (i_prev + n - 1) % n;
        if coords[i_prev] != coords[hi] || i_prev == hi {
            break;
        }
    }
    let mut i_next = hi;
    loop {
        i_next = (i_next + 1) % n;
        if coords[i_next] != coords[hi] || i_next == hi {
            break;
        }
    }

    let prev = coords[i_prev];
    let next = coords[i_next];
    match orientation(prev, coords[hi], next) {
        Orientation::CounterClockwise => true,
        Orientation::Clockwise => false,
        // flat top: fall back to x ordering of the neighbors
        Orientation::Collinear => prev.x > next.x,
    }
}

/// Removes consecutive duplicate coordinates from a sequence.
pub fn remove_repeated(coords: &[Coordinate]) -> Vec<Coordinate> {
    let mut out: Vec<Coordinate> = Vec::with_capacity(coords.len());
    for &c in coords {
        if out.last() != Some(&c) {
            out.push(c);
        }
    }
    out
}
