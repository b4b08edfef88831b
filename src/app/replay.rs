use crate::adapters::action::ActionState;
use crate::adapters::{
    RecordingActionSurface, RecordingMapSurface, RecordingNavigator, SearchResultsObservable,
    SimulatedLocation,
};
use crate::config::scenario_config::{ScenarioConfig, Step};
use crate::core::session::{event_channel, MapEvent, MapSession};
use crate::domain::model::{GeoPoint, MarkerVariant};
use crate::utils::error::{MapError, Result};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Serialize)]
pub struct OverlaySummary {
    pub category: String,
    pub venues: Vec<String>,
    pub been_there: usize,
}

/// Final state of the map after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub scenario: String,
    pub steps_applied: usize,
    pub events_handled: usize,
    pub overlays: Vec<OverlaySummary>,
    pub center: Option<GeoPoint>,
    pub zoom: Option<u8>,
    pub live_location_marker: bool,
    pub selected_venue: Option<String>,
    pub action: ActionState,
    pub opened_details: Vec<String>,
    pub observing_results: bool,
}

impl ReplayReport {
    pub fn print_summary(&self) {
        println!("🗺️  Scenario: {}", self.scenario);
        println!(
            "   {} steps applied, {} events handled",
            self.steps_applied, self.events_handled
        );
        if self.overlays.is_empty() {
            println!("   No venue overlays installed");
        }
        for overlay in &self.overlays {
            println!(
                "   [{}] {} venues ({} visited): {}",
                overlay.category,
                overlay.venues.len(),
                overlay.been_there,
                overlay.venues.join(", ")
            );
        }
        match (self.center, self.zoom) {
            (Some(center), Some(zoom)) => {
                println!("   Centered on {:.5}, {:.5} at zoom {}", center.lat, center.lon, zoom)
            }
            _ => println!("   Map not centered (no location fix)"),
        }
        match &self.selected_venue {
            Some(venue) => println!("   Selected venue: {}", venue),
            None => println!("   No venue selected"),
        }
        println!(
            "   Venue button: {} ({})",
            self.action.label.as_deref().unwrap_or("-"),
            if self.action.visible { "visible" } else { "hidden" }
        );
        if !self.opened_details.is_empty() {
            println!("   Opened details for: {}", self.opened_details.join(", "));
        }
    }
}

/// Plays a scenario against in-memory collaborators, one step at a time.
pub struct ScenarioReplay {
    config: ScenarioConfig,
}

impl ScenarioReplay {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<ReplayReport> {
        tracing::info!("🚀 Replaying scenario '{}'", self.config.name());

        let subject = SearchResultsObservable::new();
        let surface = RecordingMapSurface::new();
        let location = match self.config.initial_fix() {
            Some(fix) => SimulatedLocation::with_fix(fix),
            None => SimulatedLocation::new(),
        };
        let action = RecordingActionSurface::new();
        let navigator = RecordingNavigator::new();

        let (tx, mut rx) = event_channel();
        let mut session = MapSession::with_settings(
            subject.clone(),
            surface.clone(),
            location.clone(),
            action.clone(),
            navigator.clone(),
            &self.config,
            &tx,
        );

        // 已有定位時，首次定位回呼會在建立時立即排入
        let mut events_handled = session.drain_pending(&mut rx);
        let delay = self.config.step_delay_ms();

        for (index, step) in self.config.steps.iter().enumerate() {
            tracing::info!("▶️  Step {}: {}", index + 1, step.describe());
            self.apply(step, &subject, &location, &tx)?;
            events_handled += session.drain_pending(&mut rx);

            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        let snapshot = surface.snapshot();
        let report = ReplayReport {
            scenario: self.config.name().to_string(),
            steps_applied: self.config.steps.len(),
            events_handled,
            overlays: snapshot
                .overlays
                .iter()
                .map(|overlay| OverlaySummary {
                    category: overlay.category.clone(),
                    venues: overlay.items.iter().map(|i| i.venue.name.clone()).collect(),
                    been_there: overlay
                        .items
                        .iter()
                        .filter(|i| i.marker == MarkerVariant::BeenThere)
                        .count(),
                })
                .collect(),
            center: snapshot.center,
            zoom: snapshot.zoom,
            live_location_marker: snapshot.live_location_marker,
            selected_venue: session.selection().selected().map(|v| v.name.clone()),
            action: action.snapshot(),
            opened_details: navigator.opened().into_iter().map(|v| v.name).collect(),
            observing_results: session.is_subscribed(),
        };

        tracing::info!(
            "✅ Scenario finished with {} overlays installed",
            report.overlays.len()
        );
        Ok(report)
    }

    fn apply(
        &self,
        step: &Step,
        subject: &SearchResultsObservable,
        location: &SimulatedLocation,
        events: &UnboundedSender<MapEvent>,
    ) -> Result<()> {
        let send = |event: MapEvent| events.send(event).map_err(|_| MapError::ChannelClosed);

        match step {
            Step::Activate => send(MapEvent::Activate)?,
            Step::Deactivate => send(MapEvent::Deactivate)?,
            Step::Publish { .. } => {
                let results = self.config.results_for(step)?;
                tracing::debug!(
                    "publishing {} groups to {} observers",
                    results.len(),
                    subject.observer_count()
                );
                subject.set_search_results(Some(results));
            }
            Step::ClearResults => subject.set_search_results(None),
            Step::Fix { lat, lon } => location.push_fix(GeoPoint::new(*lat, *lon)),
            Step::LoseFix => location.lose_fix(),
            Step::TapItem { overlay, item } => send(MapEvent::OverlayTap {
                overlay: *overlay,
                item: *item,
            })?,
            Step::TapMap => send(MapEvent::MapTap)?,
            Step::OpenDetail => send(MapEvent::ActionTriggered)?,
        }

        Ok(())
    }
}
