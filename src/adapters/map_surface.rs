use crate::domain::model::{GeoPoint, VenueOverlay};
use crate::domain::ports::{MapSurface, PersistentOverlay};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Install(Vec<String>),
    Clear,
    AddPersistent(PersistentOverlay),
    MoveTo(GeoPoint),
    SetZoom(u8),
    ZoomControls(bool),
    Redraw,
}

#[derive(Debug, Default)]
struct SurfaceState {
    persistent: Vec<PersistentOverlay>,
    installed: Vec<VenueOverlay>,
    center: Option<GeoPoint>,
    zoom: Option<u8>,
    zoom_controls: bool,
    operations: Vec<SurfaceOp>,
}

/// In-memory map surface that records what was drawn on it.
#[derive(Debug, Clone, Default)]
pub struct RecordingMapSurface {
    state: Arc<Mutex<SurfaceState>>,
}

/// 地圖目前狀態的快照，供報表輸出
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceSnapshot {
    pub overlays: Vec<VenueOverlay>,
    pub center: Option<GeoPoint>,
    pub zoom: Option<u8>,
    pub zoom_controls: bool,
    pub live_location_marker: bool,
}

impl RecordingMapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn installed(&self) -> Vec<VenueOverlay> {
        self.lock().installed.clone()
    }

    pub fn persistent_overlays(&self) -> Vec<PersistentOverlay> {
        self.lock().persistent.clone()
    }

    pub fn center(&self) -> Option<GeoPoint> {
        self.lock().center
    }

    pub fn zoom(&self) -> Option<u8> {
        self.lock().zoom
    }

    pub fn zoom_controls(&self) -> bool {
        self.lock().zoom_controls
    }

    pub fn operations(&self) -> Vec<SurfaceOp> {
        self.lock().operations.clone()
    }

    pub fn install_count(&self) -> usize {
        self.lock()
            .operations
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Install(_)))
            .count()
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        let state = self.lock();
        SurfaceSnapshot {
            overlays: state.installed.clone(),
            center: state.center,
            zoom: state.zoom,
            zoom_controls: state.zoom_controls,
            live_location_marker: state.persistent.contains(&PersistentOverlay::MyLocation),
        }
    }
}

impl MapSurface for RecordingMapSurface {
    fn install_overlays(&mut self, overlays: &[VenueOverlay]) {
        let mut state = self.lock();
        let categories = overlays.iter().map(|o| o.category.clone()).collect();
        state.operations.push(SurfaceOp::Install(categories));
        state.installed.extend(overlays.iter().cloned());
    }

    /// 與原生地圖一致：連同常駐 overlay 一起清除
    fn clear_overlays(&mut self) {
        let mut state = self.lock();
        state.operations.push(SurfaceOp::Clear);
        state.installed.clear();
        state.persistent.clear();
    }

    fn add_persistent_overlay(&mut self, overlay: PersistentOverlay) {
        let mut state = self.lock();
        state.operations.push(SurfaceOp::AddPersistent(overlay));
        if !state.persistent.contains(&overlay) {
            state.persistent.push(overlay);
        }
    }

    fn move_to(&mut self, point: GeoPoint) {
        let mut state = self.lock();
        state.operations.push(SurfaceOp::MoveTo(point));
        state.center = Some(point);
    }

    fn set_zoom(&mut self, level: u8) {
        let mut state = self.lock();
        state.operations.push(SurfaceOp::SetZoom(level));
        state.zoom = Some(level);
    }

    fn set_builtin_zoom_controls(&mut self, enabled: bool) {
        let mut state = self.lock();
        state.operations.push(SurfaceOp::ZoomControls(enabled));
        state.zoom_controls = enabled;
    }

    fn request_redraw(&mut self) {
        self.lock().operations.push(SurfaceOp::Redraw);
    }
}
