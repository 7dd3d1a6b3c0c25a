//! The closed enumeration of built-in categories

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::id::EntityId;

macro_rules! builtin_categories {
    ($( $variant:ident = $id:literal, $label:literal; )*) => {
        /// A category every document defines, addressed by a reserved negative id.
        ///
        /// Names are the `OST_`-prefixed identifiers used by persisted graphs.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum BuiltInCategory {
            $(
                #[doc = $label]
                $variant,
            )*
        }

        impl BuiltInCategory {
            /// Every built-in category, in declaration order.
            pub const ALL: &'static [BuiltInCategory] = &[$(BuiltInCategory::$variant),*];

            /// The reserved id of this category.
            pub const fn id(self) -> EntityId {
                match self {
                    $(BuiltInCategory::$variant => EntityId::new($id),)*
                }
            }

            /// The enumeration name, e.g. `OST_Walls`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(BuiltInCategory::$variant => concat!("OST_", stringify!($variant)),)*
                }
            }

            /// The human-readable label, e.g. `Walls`.
            pub const fn label(self) -> &'static str {
                match self {
                    $(BuiltInCategory::$variant => $label,)*
                }
            }

            /// Look up the built-in category reserved under `id`.
            pub fn from_id(id: EntityId) -> Option<Self> {
                match id.value() {
                    $($id => Some(BuiltInCategory::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

builtin_categories! {
    Walls = -2000011, "Walls";
    Windows = -2000014, "Windows";
    Doors = -2000023, "Doors";
    Floors = -2000032, "Floors";
    Roofs = -2000035, "Roofs";
    Ceilings = -2000038, "Ceilings";
    Lines = -2000051, "Lines";
    Furniture = -2000080, "Furniture";
    Columns = -2000100, "Columns";
    Stairs = -2000120, "Stairs";
    StairsRailing = -2000126, "Railings";
    GenericModel = -2000151, "Generic Models";
    Rooms = -2000160, "Rooms";
    Levels = -2000240, "Levels";
    Grids = -2000220, "Grids";
    Dimensions = -2000260, "Dimensions";
    TextNotes = -2000300, "Text Notes";
    Materials = -2000700, "Materials";
    Views = -2000279, "Views";
    Sheets = -2003100, "Sheets";
    DoorTags = -2000460, "Door Tags";
    WindowTags = -2000600, "Window Tags";
    RoomTags = -2000480, "Room Tags";
    WallTags = -2005008, "Wall Tags";
    StructuralColumns = -2001330, "Structural Columns";
    StructuralFraming = -2001320, "Structural Framing";
    StructuralFoundation = -2001300, "Structural Foundations";
    Topography = -2001340, "Topography";
    Site = -2001260, "Site";
    Parking = -2001180, "Parking";
    Planting = -2001360, "Planting";
    LightingFixtures = -2001120, "Lighting Fixtures";
    MechanicalEquipment = -2001140, "Mechanical Equipment";
    PlumbingFixtures = -2001160, "Plumbing Fixtures";
    ElectricalEquipment = -2001040, "Electrical Equipment";
    DuctCurves = -2008000, "Ducts";
    PipeCurves = -2008044, "Pipes";
    CurtainWallPanels = -2000170, "Curtain Panels";
    CurtainWallMullions = -2000171, "Curtain Wall Mullions";
    SketchLines = -2000045, "Sketch Lines";
    AnalyticalNodes = -2009570, "Analytical Nodes";
    ColumnAnalytical = -2009010, "Analytical Columns";
    RvtLinks = -2001352, "RVT Links";
    Cameras = -2000500, "Cameras";
}

impl FromStr for BuiltInCategory {
    type Err = ParseError;

    /// Exact, case-sensitive match against [`BuiltInCategory::name`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuiltInCategory::ALL
            .iter()
            .copied()
            .find(|category| category.name() == s)
            .ok_or_else(|| ParseError::UnknownName {
                kind: "built-in category",
                text: s.to_string(),
            })
    }
}

impl fmt::Display for BuiltInCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_reserved() {
        for (i, a) in BuiltInCategory::ALL.iter().enumerate() {
            assert!(a.id().value() < -1, "{a} should use a reserved id");
            for b in &BuiltInCategory::ALL[i + 1..] {
                assert_ne!(a.id(), b.id(), "{a} and {b} share an id");
            }
        }
    }

    #[test]
    fn test_from_id_inverts_id() {
        for category in BuiltInCategory::ALL {
            assert_eq!(BuiltInCategory::from_id(category.id()), Some(*category));
        }
        assert_eq!(BuiltInCategory::from_id(EntityId::new(42)), None);
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(
            "OST_Walls".parse::<BuiltInCategory>(),
            Ok(BuiltInCategory::Walls)
        );
        assert!("OST_walls".parse::<BuiltInCategory>().is_err());
        assert!("Walls".parse::<BuiltInCategory>().is_err());
        assert!(" OST_Walls".parse::<BuiltInCategory>().is_err());
    }

    #[test]
    fn test_name_and_label() {
        assert_eq!(BuiltInCategory::GenericModel.name(), "OST_GenericModel");
        assert_eq!(BuiltInCategory::GenericModel.label(), "Generic Models");
    }
}
