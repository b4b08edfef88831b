use crate::core::overlay::{build_overlay_for, OverlaySet};
use crate::domain::model::ResultSet;
use crate::domain::ports::{LiveLocationProvider, MapSurface, PersistentOverlay};

pub const DEFAULT_ZOOM_LEVEL: u8 = 16;

/// Owns the installed overlays and mirrors the latest result set onto the map.
pub struct MapOverlaySynchronizer<M: MapSurface, L: LiveLocationProvider> {
    surface: M,
    location: L,
    overlays: OverlaySet,
    zoom_level: u8,
}

impl<M: MapSurface, L: LiveLocationProvider> MapOverlaySynchronizer<M, L> {
    pub fn new(surface: M, location: L) -> Self {
        Self::with_zoom_level(surface, location, DEFAULT_ZOOM_LEVEL)
    }

    pub fn with_zoom_level(surface: M, location: L, zoom_level: u8) -> Self {
        Self {
            surface,
            location,
            overlays: OverlaySet::new(),
            zoom_level,
        }
    }

    /// Drops every venue overlay. The live-location marker is re-added
    /// straight away; it never lives in the overlay set.
    pub fn clear(&mut self) {
        tracing::debug!("clearing map overlays");
        self.overlays.clear();
        self.surface.clear_overlays();
        self.surface
            .add_persistent_overlay(PersistentOverlay::MyLocation);
        self.surface.request_redraw();
    }

    /// 呼叫前必須先 clear()；本方法不會自行清空
    pub fn load(&mut self, results: Option<&ResultSet>) {
        let Some(results) = results else {
            tracing::debug!("no search results. Not loading.");
            return;
        };
        tracing::debug!("Loading search results ({} groups)", results.len());

        for group in results {
            if let Some(overlay) = build_overlay_for(group) {
                tracing::debug!("adding a map view venue overlay for {}", overlay.category);
                self.overlays.push(overlay);
            }
        }

        // 只有在至少一個 overlay 時才安裝到地圖上
        if !self.overlays.is_empty() {
            self.surface.install_overlays(self.overlays.as_slice());
        }
    }

    pub fn recenter(&mut self) {
        match self.location.current_fix() {
            Some(center) => {
                tracing::debug!("recentering map on live location {:?}", center);
                self.surface.move_to(center);
                self.surface.set_zoom(self.zoom_level);
            }
            None => tracing::debug!("Could not re-center, no location fix yet."),
        }
    }

    pub fn resync(&mut self, results: Option<&ResultSet>) {
        self.clear();
        self.load(results);
        self.recenter();
    }

    pub fn overlays(&self) -> &OverlaySet {
        &self.overlays
    }

    pub fn zoom_level(&self) -> u8 {
        self.zoom_level
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut M {
        &mut self.surface
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::location::SimulatedLocation;
    use crate::adapters::map_surface::{RecordingMapSurface, SurfaceOp};
    use crate::domain::model::{GeoPoint, ResultGroup, Venue};

    fn synchronizer() -> (
        MapOverlaySynchronizer<RecordingMapSurface, SimulatedLocation>,
        RecordingMapSurface,
        SimulatedLocation,
    ) {
        let surface = RecordingMapSurface::new();
        let location = SimulatedLocation::new();
        let sync = MapOverlaySynchronizer::new(surface.clone(), location.clone());
        (sync, surface, location)
    }

    fn results() -> ResultSet {
        vec![
            ResultGroup::new(
                "Bars",
                vec![
                    Venue::new("a", "A").with_coordinates("40.0", "-73.0"),
                    Venue::new("b", "B").with_coordinates("0", "0"),
                ],
            ),
            ResultGroup::new("Coffee", vec![]),
            ResultGroup::new(
                "Parks",
                vec![Venue::new("p", "P").with_coordinates("40.5", "-73.5")],
            ),
        ]
    }

    #[test]
    fn test_clear_keeps_live_location_marker() {
        let (mut sync, surface, _) = synchronizer();
        sync.clear();
        sync.clear();

        assert!(sync.overlays().is_empty());
        assert_eq!(surface.persistent_overlays(), vec![PersistentOverlay::MyLocation]);
        assert!(surface.installed().is_empty());
    }

    #[test]
    fn test_load_installs_mappable_categories_in_order() {
        let (mut sync, surface, _) = synchronizer();
        let results = results();
        sync.clear();
        sync.load(Some(&results));

        assert_eq!(sync.overlays().categories(), vec!["Bars", "Parks"]);
        assert_eq!(surface.installed(), sync.overlays().as_slice().to_vec());
        // 一次安裝全部 overlay
        let installs = surface
            .operations()
            .into_iter()
            .filter(|op| matches!(op, SurfaceOp::Install(_)))
            .count();
        assert_eq!(installs, 1);
    }

    #[test]
    fn test_load_without_results_installs_nothing() {
        let (mut sync, surface, _) = synchronizer();
        sync.clear();
        sync.load(None);
        sync.load(Some(&vec![ResultGroup::new("Coffee", vec![])]));

        assert!(sync.overlays().is_empty());
        assert!(!surface
            .operations()
            .iter()
            .any(|op| matches!(op, SurfaceOp::Install(_))));
    }

    #[test]
    fn test_recenter_uses_live_fix_and_zoom() {
        let (mut sync, surface, location) = synchronizer();
        sync.recenter();
        assert_eq!(surface.center(), None);

        location.push_fix(GeoPoint::new(40.0, -73.0));
        sync.recenter();
        assert_eq!(surface.center(), Some(GeoPoint::new(40.0, -73.0)));
        assert_eq!(surface.zoom(), Some(DEFAULT_ZOOM_LEVEL));
    }

    #[test]
    fn test_resync_is_idempotent() {
        let (mut sync, surface, _) = synchronizer();
        let results = results();

        sync.resync(Some(&results));
        let first = sync.overlays().clone();
        let first_installed = surface.installed();
        sync.resync(Some(&results));

        assert_eq!(sync.overlays(), &first);
        assert_eq!(surface.installed(), first_installed);
    }

    #[test]
    fn test_resync_with_null_results_empties_and_recenters() {
        let (mut sync, surface, location) = synchronizer();
        sync.resync(Some(&results()));
        location.push_fix(GeoPoint::new(1.0, 2.0));

        sync.resync(None);

        assert!(sync.overlays().is_empty());
        assert!(surface.installed().is_empty());
        assert_eq!(surface.center(), Some(GeoPoint::new(1.0, 2.0)));
    }
}
