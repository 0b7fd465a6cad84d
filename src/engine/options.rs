//! Options passed to the engine's view and label APIs.

use crate::types::Location;

/// Template for creating a map view.
#[derive(Debug, Clone, PartialEq)]
pub struct MapviewInfo {
    pub view_name: String,
    pub view_info_name: String,
    pub default_position: Location,
    pub default_level: i32,
}

/// Opaque handle of a registered camera handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u64);

/// Opaque handle of a placed POI marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoiHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompetitionType {
    #[default]
    None,
    Upper,
    Same,
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompetitionUnit {
    Poi,
    #[default]
    SymbolFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderType {
    #[default]
    Rank,
    Closer,
}

/// Options for a label layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayerOptions {
    pub layer_id: String,
    pub competition_type: CompetitionType,
    pub competition_unit: CompetitionUnit,
    pub order_type: OrderType,
    pub z_order: i32,
}

impl LabelLayerOptions {
    pub fn new(layer_id: impl Into<String>) -> Self {
        Self {
            layer_id: layer_id.into(),
            competition_type: CompetitionType::None,
            competition_unit: CompetitionUnit::SymbolFirst,
            order_type: OrderType::Rank,
            z_order: 0,
        }
    }
}

/// Icon drawn for a POI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoiIconStyle {
    pub symbol: String,
}

/// Style variant applied from `level` upward until the next variant's level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerLevelPoiStyle {
    pub icon: PoiIconStyle,
    pub level: i32,
}

/// Named POI style with one variant per zoom band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoiStyle {
    pub style_id: String,
    pub styles: Vec<PerLevelPoiStyle>,
}

impl PoiStyle {
    /// The variant in effect at `zoom_level`, if any.
    pub fn variant_for(&self, zoom_level: i32) -> Option<&PerLevelPoiStyle> {
        self.styles
            .iter()
            .filter(|s| s.level <= zoom_level)
            .max_by_key(|s| s.level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformType {
    #[default]
    Default,
    AbsoluteRotation,
    KeepUpright,
    Decal,
}

/// Options for adding a POI to a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiOptions {
    pub style_id: String,
    pub rank: i32,
    pub transform_type: TransformType,
}

impl PoiOptions {
    pub fn new(style_id: impl Into<String>) -> Self {
        Self {
            style_id: style_id.into(),
            rank: 0,
            transform_type: TransformType::Default,
        }
    }
}
