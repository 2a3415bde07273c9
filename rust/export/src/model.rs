// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural model input
//!
//! The upstream model provider hands over element records, a node
//! coordinate lookup and the storey list. All lengths are millimetres,
//! angles are degrees.

use crate::error::SkipReason;
use nalgebra::Point3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Node id to coordinate lookup
pub type NodeMap = FxHashMap<u32, Point>;

/// 3D coordinate in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_point3(self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }
}

/// A literal coordinate or a reference into the node lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    Node(u32),
    Point(Point),
}

impl From<Point> for Endpoint {
    fn from(point: Point) -> Self {
        Endpoint::Point(point)
    }
}

impl From<u32> for Endpoint {
    fn from(node: u32) -> Self {
        Endpoint::Node(node)
    }
}

/// One building level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storey {
    pub id: String,
    pub name: String,
    /// Elevation in millimetres
    pub elevation: f64,
}

/// Element kinds, in export order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Column,
    Beam,
    Brace,
    Slab,
    Wall,
    Pile,
    Footing,
    FoundationColumn,
}

impl ElementKind {
    /// All kinds in the order elements are written
    pub const EXPORT_ORDER: [ElementKind; 8] = [
        ElementKind::Column,
        ElementKind::Beam,
        ElementKind::Brace,
        ElementKind::Slab,
        ElementKind::Wall,
        ElementKind::Pile,
        ElementKind::Footing,
        ElementKind::FoundationColumn,
    ];

    /// IFC entity keyword
    pub fn entity(self) -> &'static str {
        match self {
            ElementKind::Column | ElementKind::FoundationColumn => "IFCCOLUMN",
            ElementKind::Beam => "IFCBEAM",
            ElementKind::Brace => "IFCMEMBER",
            ElementKind::Slab => "IFCSLAB",
            ElementKind::Wall => "IFCWALL",
            ElementKind::Pile => "IFCPILE",
            ElementKind::Footing => "IFCFOOTING",
        }
    }

    /// Predefined type used when the input carries none
    pub fn default_predefined_type(self) -> &'static str {
        match self {
            ElementKind::Column => "COLUMN",
            ElementKind::Beam => "BEAM",
            ElementKind::Brace => "BRACE",
            ElementKind::Slab => "FLOOR",
            ElementKind::Wall => "SOLIDWALL",
            ElementKind::Pile => "BORED",
            ElementKind::Footing => "PAD_FOOTING",
            ElementKind::FoundationColumn => "USERDEFINED",
        }
    }

    /// Values of the entity's predefined type enumeration
    pub fn predefined_types(self) -> &'static [&'static str] {
        match self {
            ElementKind::Column | ElementKind::FoundationColumn => {
                &["COLUMN", "PILASTER", "USERDEFINED", "NOTDEFINED"]
            }
            ElementKind::Beam => &[
                "BEAM", "JOIST", "HOLLOWCORE", "LINTEL", "SPANDREL", "T_BEAM", "USERDEFINED",
                "NOTDEFINED",
            ],
            ElementKind::Brace => &[
                "BRACE", "CHORD", "COLLAR", "MEMBER", "MULLION", "PLATE", "POST", "PURLIN",
                "RAFTER", "STRINGER", "STRUT", "STUD", "USERDEFINED", "NOTDEFINED",
            ],
            ElementKind::Slab => &["FLOOR", "ROOF", "LANDING", "BASESLAB", "USERDEFINED", "NOTDEFINED"],
            ElementKind::Wall => &[
                "MOVABLE", "PARAPET", "PARTITIONING", "PLUMBINGWALL", "SHEAR", "SOLIDWALL",
                "STANDARD", "POLYGONAL", "ELEMENTEDWALL", "USERDEFINED", "NOTDEFINED",
            ],
            ElementKind::Pile => &[
                "BORED", "DRIVEN", "JETGROUTING", "COHESION", "FRICTION", "SUPPORT", "USERDEFINED",
                "NOTDEFINED",
            ],
            ElementKind::Footing => &[
                "CAISSON_FOUNDATION", "FOOTING_BEAM", "PAD_FOOTING", "PILE_CAP", "STRIP_FOOTING",
                "USERDEFINED", "NOTDEFINED",
            ],
        }
    }

    /// Object type written for every element of this kind
    pub fn object_type(self) -> Option<&'static str> {
        match self {
            ElementKind::FoundationColumn => Some("FoundationColumn"),
            _ => None,
        }
    }

    /// Human readable name, also the fallback object type
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Column => "Column",
            ElementKind::Beam => "Beam",
            ElementKind::Brace => "Brace",
            ElementKind::Slab => "Slab",
            ElementKind::Wall => "Wall",
            ElementKind::Pile => "Pile",
            ElementKind::Footing => "Footing",
            ElementKind::FoundationColumn => "FoundationColumn",
        }
    }
}

/// Element geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementShape {
    /// Two-point member. For piles `start` is the top and `end` the bottom.
    #[serde(rename_all = "camelCase")]
    Line { start: Endpoint, end: Endpoint },
    /// Vertical element hanging below a point
    #[serde(rename_all = "camelCase")]
    Point {
        at: Endpoint,
        height: f64,
        /// When false the rotation is measured from the Y axis
        #[serde(default = "default_true")]
        reference_flag: bool,
    },
    /// Planar element: vertex loop plus thickness
    #[serde(rename_all = "camelCase")]
    Polygon {
        vertices: Vec<Endpoint>,
        thickness: f64,
    },
}

fn default_true() -> bool {
    true
}

impl ElementShape {
    pub fn name(&self) -> &'static str {
        match self {
            ElementShape::Line { .. } => "line",
            ElementShape::Point { .. } => "point",
            ElementShape::Polygon { .. } => "polygon",
        }
    }
}

/// Cross-section dimensions in millimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SectionShape {
    /// Doubly symmetric I or H section
    #[serde(rename_all = "camelCase")]
    IShape {
        width: f64,
        depth: f64,
        web_thickness: f64,
        flange_thickness: f64,
        #[serde(default)]
        fillet_radius: Option<f64>,
    },
    /// Closed rectangular tube
    #[serde(rename_all = "camelCase")]
    RectangleHollow {
        width: f64,
        depth: f64,
        wall_thickness: f64,
    },
    /// Solid or hollow circular section
    #[serde(rename_all = "camelCase")]
    Circle {
        radius: f64,
        #[serde(default)]
        wall_thickness: Option<f64>,
    },
    Rectangle { width: f64, depth: f64 },
    /// U section
    #[serde(rename_all = "camelCase")]
    Channel {
        width: f64,
        depth: f64,
        web_thickness: f64,
        flange_thickness: f64,
    },
    /// L section
    Angle {
        width: f64,
        depth: f64,
        thickness: f64,
    },
    #[serde(other)]
    Unknown,
}

/// Named section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProfile {
    #[serde(default)]
    pub name: Option<String>,
    pub shape: SectionShape,
}

impl SectionProfile {
    pub fn new(name: impl Into<String>, shape: SectionShape) -> Self {
        Self {
            name: Some(name.into()),
            shape,
        }
    }
}

/// Offset of the element from its reference line or point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanarOffset {
    pub x: f64,
    pub y: f64,
}

/// One element record from the model provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub kind: ElementKind,
    pub shape: ElementShape,
    #[serde(default)]
    pub section: Option<SectionProfile>,
    /// Roll angle in degrees
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub offset: PlanarOffset,
    #[serde(default)]
    pub predefined_type: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
}

impl StructuralElement {
    pub fn new(id: impl Into<String>, kind: ElementKind, shape: ElementShape) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind,
            shape,
            section: None,
            rotation: 0.0,
            offset: PlanarOffset::default(),
            predefined_type: None,
            material: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_section(mut self, section: SectionProfile) -> Self {
        self.section = Some(section);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset = PlanarOffset { x, y };
        self
    }

    pub fn with_predefined_type(mut self, tag: impl Into<String>) -> Self {
        self.predefined_type = Some(tag.into());
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Display name, falling back to the element id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Everything the exporter reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralModel {
    #[serde(default)]
    pub nodes: NodeMap,
    #[serde(default)]
    pub storeys: Vec<Storey>,
    #[serde(default)]
    pub elements: Vec<StructuralElement>,
}

impl StructuralModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a model from JSON
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn add_node(&mut self, id: u32, point: Point) {
        self.nodes.insert(id, point);
    }

    pub fn add_storey(&mut self, id: impl Into<String>, name: impl Into<String>, elevation: f64) {
        self.storeys.push(Storey {
            id: id.into(),
            name: name.into(),
            elevation,
        });
    }

    pub fn add_element(&mut self, element: StructuralElement) {
        self.elements.push(element);
    }

    /// Resolve an endpoint to finite world coordinates
    pub fn resolve(&self, endpoint: &Endpoint) -> Result<Point3<f64>, SkipReason> {
        let point = match endpoint {
            Endpoint::Point(p) => *p,
            Endpoint::Node(id) => *self.nodes.get(id).ok_or(SkipReason::MissingNode(*id))?,
        };
        if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
            return Err(SkipReason::NonFinite);
        }
        Ok(point.to_point3())
    }
}
