use crate::core::filter::is_mappable;
use crate::domain::model::{
    MarkerVariant, RenderGroup, ResultGroup, Venue, VenueOverlay, VenueOverlayItem,
};
use std::sync::Arc;

/// 曾到訪的地點使用另一種標記
pub fn marker_for(visited: bool) -> MarkerVariant {
    if visited {
        MarkerVariant::BeenThere
    } else {
        MarkerVariant::Default
    }
}

/// Keeps the mappable venues of `group` in their original order. Returns
/// `None` when nothing survives the filter so callers never install an empty
/// overlay.
pub fn build_render_group(group: &ResultGroup) -> Option<RenderGroup> {
    tracing::debug!("Adding items in group: {}", group.category);

    let venues: Vec<Arc<Venue>> = group
        .venues
        .iter()
        .filter(|venue| is_mappable(venue))
        .inspect(|venue| tracing::debug!("adding venue: {}", venue.name))
        .cloned()
        .collect();

    if venues.is_empty() {
        return None;
    }

    Some(RenderGroup {
        category: group.category.clone(),
        venues,
    })
}

pub fn build_overlay(group: RenderGroup) -> VenueOverlay {
    let items = group
        .venues
        .into_iter()
        .map(|venue| {
            let marker = marker_for(venue.has_visited());
            if marker == MarkerVariant::BeenThere {
                tracing::debug!("using the been-there marker for: {}", venue.name);
            }
            VenueOverlayItem {
                position: venue.position(),
                venue,
                marker,
            }
        })
        .collect();

    VenueOverlay {
        category: group.category,
        items,
    }
}

/// 一個分類對應一個 overlay，沒有可上圖地點的分類直接略過
pub fn build_overlay_for(group: &ResultGroup) -> Option<VenueOverlay> {
    build_render_group(group).map(build_overlay)
}

/// The overlays currently installed on the map, in category order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlaySet {
    overlays: Vec<VenueOverlay>,
}

impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, overlay: VenueOverlay) {
        self.overlays.push(overlay);
    }

    pub fn clear(&mut self) {
        self.overlays.clear();
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn as_slice(&self) -> &[VenueOverlay] {
        &self.overlays
    }

    pub fn iter(&self) -> impl Iterator<Item = &VenueOverlay> {
        self.overlays.iter()
    }

    pub fn venue_at(&self, overlay: usize, item: usize) -> Option<&Arc<Venue>> {
        self.overlays
            .get(overlay)
            .and_then(|o| o.item(item))
            .map(|i| &i.venue)
    }

    pub fn categories(&self) -> Vec<&str> {
        self.overlays.iter().map(|o| o.category.as_str()).collect()
    }
}
