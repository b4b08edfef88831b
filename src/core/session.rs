use crate::core::selection::{SelectionController, SelectionPolicy};
use crate::core::synchronizer::MapOverlaySynchronizer;
use crate::domain::ports::{
    ActionSurface, Callback, DetailNavigator, LiveLocationProvider, MapSettings, MapSurface,
    PersistentOverlay, ResultSubject, SubscriptionId,
};
use crate::utils::error::{ErrorSeverity, MapError, Result};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};

/// Discrete events delivered by the host's event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    Activate,
    Deactivate,
    ResultsChanged,
    FirstFix,
    OverlayTap { overlay: usize, item: usize },
    MapTap,
    ActionTriggered,
    Close,
}

pub fn event_channel() -> (UnboundedSender<MapEvent>, UnboundedReceiver<MapEvent>) {
    mpsc::unbounded_channel()
}

/// 回呼只持有弱參照，主機丟棄所有 sender 後通道即會關閉
fn enqueue(events: &WeakUnboundedSender<MapEvent>, event: MapEvent) -> Callback {
    let events = events.clone();
    Box::new(move || match events.upgrade() {
        Some(tx) => {
            if tx.send(event).is_err() {
                tracing::warn!("map event loop is gone, dropping {:?}", event);
            }
        }
        None => tracing::debug!("no host sender left, dropping {:?}", event),
    })
}

/// The map screen: wires the result subject, the overlay synchronizer and the
/// selection controller together and owns the activation lifecycle.
pub struct MapSession<S, M, L, A, N>
where
    S: ResultSubject,
    M: MapSurface,
    L: LiveLocationProvider,
    A: ActionSurface,
    N: DetailNavigator,
{
    subject: S,
    synchronizer: MapOverlaySynchronizer<M, L>,
    selection: SelectionController<A, N>,
    events: WeakUnboundedSender<MapEvent>,
    subscription: Option<SubscriptionId>,
}

impl<S, M, L, A, N> MapSession<S, M, L, A, N>
where
    S: ResultSubject,
    M: MapSurface,
    L: LiveLocationProvider,
    A: ActionSurface,
    N: DetailNavigator,
{
    pub fn new(
        subject: S,
        synchronizer: MapOverlaySynchronizer<M, L>,
        selection: SelectionController<A, N>,
        events: &UnboundedSender<MapEvent>,
    ) -> Self {
        let mut session = Self {
            subject,
            synchronizer,
            selection,
            events: events.downgrade(),
            subscription: None,
        };
        session.init_map();
        session
    }

    /// Builds a session from any [`MapSettings`] provider.
    pub fn with_settings<C: MapSettings>(
        subject: S,
        surface: M,
        location: L,
        action: A,
        navigator: N,
        settings: &C,
        events: &UnboundedSender<MapEvent>,
    ) -> Self {
        let synchronizer =
            MapOverlaySynchronizer::with_zoom_level(surface, location, settings.zoom_level());
        let policy = SelectionPolicy {
            reset_on_map_tap: settings.reset_selection_on_map_tap(),
            reset_on_resync: settings.reset_selection_on_resync(),
        };
        let selection = SelectionController::new(action, navigator, policy);
        Self::new(subject, synchronizer, selection, events)
    }

    fn init_map(&mut self) {
        let surface = self.synchronizer.surface_mut();
        surface.set_builtin_zoom_controls(true);
        surface.add_persistent_overlay(PersistentOverlay::MyLocation);

        self.synchronizer
            .location()
            .run_on_first_fix(enqueue(&self.events, MapEvent::FirstFix));
    }

    /// View became active: start location updates, rebuild, then observe.
    pub fn activate(&mut self) {
        tracing::debug!("activating map view");
        self.synchronizer.location_mut().enable();
        self.resync();

        if self.subscription.is_some() {
            tracing::debug!("already observing search results");
            return;
        }
        let id = self
            .subject
            .subscribe(enqueue(&self.events, MapEvent::ResultsChanged));
        self.subscription = Some(id);
    }

    pub fn deactivate(&mut self) {
        tracing::debug!("deactivating map view");
        self.synchronizer.location_mut().disable();
        if let Some(id) = self.subscription.take() {
            if !self.subject.unsubscribe(id) {
                tracing::warn!("search results observer {:?} was already gone", id);
            }
        }
    }

    pub fn resync(&mut self) {
        let results = self.subject.current_results();
        self.synchronizer.resync(results.as_deref());
        self.selection.on_resync();
    }

    pub fn on_overlay_tap(&mut self, overlay: usize, item: usize) -> Result<()> {
        let venue = self
            .synchronizer
            .overlays()
            .venue_at(overlay, item)
            .cloned()
            .ok_or(MapError::TapOutOfRange { overlay, item })?;
        self.selection.on_overlay_tap(venue);
        Ok(())
    }

    /// Processes one event to completion. Returns false once `Close` arrives.
    pub fn handle(&mut self, event: MapEvent) -> Result<bool> {
        tracing::debug!("handling {:?}", event);
        match event {
            MapEvent::Activate => self.activate(),
            MapEvent::Deactivate => self.deactivate(),
            // 停用前已排入的通知不可再重建地圖
            MapEvent::ResultsChanged if self.subscription.is_none() => {
                tracing::debug!("view is inactive, ignoring search results change");
            }
            MapEvent::ResultsChanged => self.resync(),
            MapEvent::FirstFix => self.synchronizer.recenter(),
            MapEvent::OverlayTap { overlay, item } => self.on_overlay_tap(overlay, item)?,
            MapEvent::MapTap => self.selection.on_map_tap(),
            MapEvent::ActionTriggered => {
                self.selection.on_action_triggered();
            }
            MapEvent::Close => return Ok(false),
        }
        Ok(true)
    }

    /// 處理佇列中已排入的所有事件，不等待新事件
    pub fn drain_pending(&mut self, events: &mut UnboundedReceiver<MapEvent>) -> usize {
        let mut handled = 0;
        while let Ok(event) = events.try_recv() {
            handled += 1;
            if let Err(e) = self.handle(event) {
                tracing::warn!("⚠️ {}", e.user_friendly_message());
            }
        }
        handled
    }

    /// Host event loop. Runs until `Close` is received or every host sender
    /// has been dropped, which deactivates the view and yields
    /// [`MapError::ChannelClosed`]. A tap that misses the installed overlays
    /// is logged and skipped.
    pub async fn run(&mut self, mut events: UnboundedReceiver<MapEvent>) -> Result<()> {
        tracing::info!("🗺️ Map session started");
        while let Some(event) = events.recv().await {
            match self.handle(event) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::info!("Map session closed");
                    self.deactivate();
                    return Ok(());
                }
                Err(e) if e.severity() == ErrorSeverity::Low => {
                    tracing::warn!("⚠️ {}", e.user_friendly_message());
                }
                Err(e) => return Err(e),
            }
        }
        tracing::warn!("every map event sender was dropped without a Close");
        self.deactivate();
        Err(MapError::ChannelClosed)
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// A sender onto the session's queue, while the host still holds one.
    pub fn sender(&self) -> Option<UnboundedSender<MapEvent>> {
        self.events.upgrade()
    }

    pub fn subject(&self) -> &S {
        &self.subject
    }

    pub fn synchronizer(&self) -> &MapOverlaySynchronizer<M, L> {
        &self.synchronizer
    }

    pub fn selection(&self) -> &SelectionController<A, N> {
        &self.selection
    }
}
