//! Planar geometry values for union reduction.
//!
//! The union only ever needs four capabilities from a geometry: merge with
//! another geometry, report whether the result is multi-part, flatten a
//! multi-part result into simple parts, and round-trip through the WKT
//! shape-record format. Everything else (the boolean-operation kernel
//! itself) is delegated to the `geo` crate.

use crate::error::{GeoUnionError, Result};
use geo::{BooleanOps, MultiPolygon, Polygon};
use std::str::FromStr;
use wkt::ToWkt;

/// An opaque areal region: either a simple polygon or a multi-part
/// collection of disjoint polygons.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon<f64>),
    Collection(MultiPolygon<f64>),
}

impl Geometry {
    /// Compute the union of two geometries.
    ///
    /// Unioning spatially disjoint inputs produces a multi-part
    /// [`Geometry::Collection`]; overlapping inputs merge into fewer parts.
    /// The operation is commutative and associative, which is what allows
    /// partial unions to be taken in any order and at any granularity.
    pub fn union(&self, other: &Geometry) -> Geometry {
        let merged = match (self, other) {
            (Geometry::Polygon(a), Geometry::Polygon(b)) => a.union(b),
            (Geometry::Polygon(a), Geometry::Collection(b)) => a.union(b),
            (Geometry::Collection(a), Geometry::Polygon(b)) => a.union(b),
            (Geometry::Collection(a), Geometry::Collection(b)) => a.union(b),
        };
        Geometry::from_parts(merged)
    }

    /// Whether this geometry is a multi-part collection.
    pub fn is_collection(&self) -> bool {
        matches!(self, Geometry::Collection(_))
    }

    /// Flatten into constituent simple geometries.
    ///
    /// Downstream consumers expect a sequence of simple polygons, never a
    /// single wrapped collection.
    pub fn decompose(self) -> Vec<Geometry> {
        match self {
            Geometry::Polygon(p) => vec![Geometry::Polygon(p)],
            Geometry::Collection(mp) => mp.0.into_iter().map(Geometry::Polygon).collect(),
        }
    }

    /// Normalize a boolean-op result: single-part output collapses to a
    /// simple polygon.
    fn from_parts(mut parts: MultiPolygon<f64>) -> Geometry {
        if parts.0.len() == 1 {
            Geometry::Polygon(parts.0.remove(0))
        } else {
            Geometry::Collection(parts)
        }
    }

    /// Parse one WKT shape record.
    ///
    /// Only areal types take part in a union; any other WKT type is an
    /// [`GeoUnionError::UnsupportedGeometry`] error.
    pub fn from_wkt(s: &str) -> Result<Geometry> {
        let parsed = wkt::Wkt::<f64>::from_str(s)
            .map_err(|e| GeoUnionError::WktParse(format!("{:?}", e)))?;
        let geom: geo::Geometry<f64> = parsed.try_into().map_err(|e: wkt::conversion::Error| {
            GeoUnionError::WktParse(format!("{:?}", e))
        })?;
        match geom {
            geo::Geometry::Polygon(p) => Ok(Geometry::Polygon(p)),
            geo::Geometry::MultiPolygon(mp) => Ok(Geometry::from_parts(mp)),
            other => Err(GeoUnionError::UnsupportedGeometry(
                kind_name(&other).to_string(),
            )),
        }
    }

    /// Serialize as a WKT shape record.
    pub fn to_wkt(&self) -> String {
        let geom: geo::Geometry<f64> = match self {
            Geometry::Polygon(p) => geo::Geometry::Polygon(p.clone()),
            Geometry::Collection(mp) => geo::Geometry::MultiPolygon(mp.clone()),
        };
        geom.wkt_string()
    }
}

fn kind_name(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "POINT",
        geo::Geometry::Line(_) => "LINE",
        geo::Geometry::LineString(_) => "LINESTRING",
        geo::Geometry::Polygon(_) => "POLYGON",
        geo::Geometry::MultiPoint(_) => "MULTIPOINT",
        geo::Geometry::MultiLineString(_) => "MULTILINESTRING",
        geo::Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        geo::Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        geo::Geometry::Rect(_) => "RECT",
        geo::Geometry::Triangle(_) => "TRIANGLE",
    }
}
