use crate::domain::model::GeoPoint;
use crate::domain::ports::{Callback, LiveLocationProvider};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct LocationState {
    enabled: bool,
    fix: Option<GeoPoint>,
    first_fix_seen: bool,
    first_fix_callbacks: Vec<Callback>,
}

/// Live location fed by hand, for replays and tests.
#[derive(Clone, Default)]
pub struct SimulatedLocation {
    state: Arc<Mutex<LocationState>>,
}

impl SimulatedLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fix(point: GeoPoint) -> Self {
        let location = Self::new();
        location.push_fix(point);
        location
    }

    fn lock(&self) -> MutexGuard<'_, LocationState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reports a new fix. The first one ever reported fires the pending
    /// first-fix callbacks.
    pub fn push_fix(&self, point: GeoPoint) {
        let callbacks = {
            let mut state = self.lock();
            state.fix = Some(point);
            if state.first_fix_seen {
                Vec::new()
            } else {
                state.first_fix_seen = true;
                std::mem::take(&mut state.first_fix_callbacks)
            }
        };

        if !callbacks.is_empty() {
            tracing::debug!("first fix arrived, running {} callbacks", callbacks.len());
        }
        for callback in callbacks {
            callback();
        }
    }

    /// 失去定位訊號；之後 current_fix() 回傳 None
    pub fn lose_fix(&self) {
        self.lock().fix = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }
}

impl LiveLocationProvider for SimulatedLocation {
    fn current_fix(&self) -> Option<GeoPoint> {
        self.lock().fix
    }

    fn run_on_first_fix(&self, callback: Callback) {
        {
            let mut state = self.lock();
            if !state.first_fix_seen {
                state.first_fix_callbacks.push(callback);
                return;
            }
        }
        callback();
    }

    fn enable(&mut self) {
        tracing::debug!("enabling live location");
        self.lock().enabled = true;
    }

    fn disable(&mut self) {
        tracing::debug!("disabling live location");
        self.lock().enabled = false;
    }
}
