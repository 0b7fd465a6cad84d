//! POI Render Pipeline - Full-replace marker refresh
//!
//! One refresh, in order:
//!
//! 1. Ensure the `"PoiLayer"` label layer exists (adding it again is a no-op)
//! 2. Register the `"PerLevelStyle"` style (variants at levels 5 and 12, one icon)
//! 3. Clear every marker in the layer
//! 4. Add one marker per location and show it
//!
//! Clear happens before create, so markers from the previous dataset never
//! coexist with the new set. There is no diffing; dataset sizes are small.

use tracing::debug;

use crate::config::MapConfig;
use crate::engine::{
    LabelLayerOptions, MapView, PerLevelPoiStyle, PoiHandle, PoiIconStyle, PoiOptions, PoiStyle,
    TransformType,
};
use crate::types::Location;

/// A marker placed by the last refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub handle: PoiHandle,
    pub position: Location,
}

/// What a refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Markers replaced; the count placed.
    Rendered(usize),
    /// The label layer could not be found; nothing drawn.
    MissingLayer,
}

pub struct PoiRenderer {
    layer_options: LabelLayerOptions,
    style: PoiStyle,
    poi_options: PoiOptions,
    markers: Vec<Marker>,
    last_locations: Vec<Location>,
}

impl PoiRenderer {
    pub fn new(config: &MapConfig) -> Self {
        let icon = PoiIconStyle { symbol: config.icon_symbol.clone() };
        let styles = config
            .style_levels
            .iter()
            .map(|&level| PerLevelPoiStyle { icon: icon.clone(), level })
            .collect();

        let mut poi_options = PoiOptions::new(config.style_id.clone());
        poi_options.rank = 0;
        poi_options.transform_type = TransformType::Decal;

        Self {
            layer_options: LabelLayerOptions::new(config.layer_id.clone()),
            style: PoiStyle { style_id: config.style_id.clone(), styles },
            poi_options,
            markers: Vec::new(),
            last_locations: Vec::new(),
        }
    }

    /// Replace the markers in `view` with one per location.
    pub fn render(&mut self, view: &mut dyn MapView, locations: &[Location]) -> RenderOutcome {
        self.last_locations = locations.to_vec();

        let labels = view.label_manager();
        labels.add_label_layer(&self.layer_options);
        labels.add_poi_style(&self.style);

        let Some(layer) = labels.label_layer_mut(&self.layer_options.layer_id) else {
            debug!(layer = %self.layer_options.layer_id, "label layer missing; skipping refresh");
            return RenderOutcome::MissingLayer;
        };

        layer.clear_all_items();
        self.markers.clear();

        for &position in locations {
            if let Some(handle) = layer.add_poi(&self.poi_options, position) {
                layer.show_poi(handle);
                self.markers.push(Marker { handle, position });
            }
        }

        debug!(count = self.markers.len(), "markers rendered");
        RenderOutcome::Rendered(self.markers.len())
    }

    /// Draw the last dataset again, e.g. into a freshly created view.
    pub fn redraw(&mut self, view: &mut dyn MapView) -> RenderOutcome {
        let locations = std::mem::take(&mut self.last_locations);
        self.render(view, &locations)
    }

    /// Keep `locations` for the next `redraw` when no view can take them yet.
    pub fn defer(&mut self, locations: &[Location]) {
        self.last_locations = locations.to_vec();
    }

    /// Forget marker handles whose view was destroyed.
    pub fn invalidate(&mut self) {
        self.markers.clear();
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn last_locations(&self) -> &[Location] {
        &self.last_locations
    }

    pub fn style(&self) -> &PoiStyle {
        &self.style
    }

    pub fn layer_options(&self) -> &LabelLayerOptions {
        &self.layer_options
    }
}

// =============================================================================
// TESTS
// =============================================================================
