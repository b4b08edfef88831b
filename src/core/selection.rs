use crate::domain::model::{SelectionState, Venue};
use crate::domain::ports::{ActionSurface, DetailNavigator};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// 點到地圖空白處時是否一併清除選取
    pub reset_on_map_tap: bool,
    pub reset_on_resync: bool,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            reset_on_map_tap: false,
            reset_on_resync: true,
        }
    }
}

/// Tracks the tapped venue and the action button that opens its details.
pub struct SelectionController<A: ActionSurface, N: DetailNavigator> {
    action: A,
    navigator: N,
    state: SelectionState,
    policy: SelectionPolicy,
}

impl<A: ActionSurface, N: DetailNavigator> SelectionController<A, N> {
    pub fn new(action: A, navigator: N, policy: SelectionPolicy) -> Self {
        Self {
            action,
            navigator,
            state: SelectionState::Unselected,
            policy,
        }
    }

    pub fn on_overlay_tap(&mut self, venue: Arc<Venue>) {
        tracing::debug!("overlay tap on {}", venue.name);
        self.action.set_label(&venue.name);
        self.action.show();
        self.state = SelectionState::Selected(venue);
    }

    pub fn on_map_tap(&mut self) {
        tracing::debug!("map tap missed every item");
        self.action.hide();
        if self.policy.reset_on_map_tap {
            self.state = SelectionState::Unselected;
        }
    }

    /// Hands the selected venue to the navigator. Returns false when nothing
    /// is selected.
    pub fn on_action_triggered(&mut self) -> bool {
        match &self.state {
            SelectionState::Selected(venue) => {
                tracing::debug!("firing detail view for venue {}", venue.id);
                self.navigator.open_detail_for(venue);
                true
            }
            SelectionState::Unselected => {
                tracing::debug!("action triggered without a selected venue");
                false
            }
        }
    }

    pub fn on_resync(&mut self) {
        if self.policy.reset_on_resync {
            self.action.hide();
            self.state = SelectionState::Unselected;
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected(&self) -> Option<&Arc<Venue>> {
        self.state.venue()
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }
}
