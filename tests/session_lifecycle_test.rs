use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use venue_map::adapters::map_surface::SurfaceOp;
use venue_map::adapters::{
    RecordingActionSurface, RecordingMapSurface, RecordingNavigator, SearchResultsObservable,
    SimulatedLocation,
};
use venue_map::domain::model::{GeoPoint, ResultGroup, SelectionState, Venue};
use venue_map::{
    event_channel, MapEvent, MapOverlaySynchronizer, MapSession, SelectionController,
    SelectionPolicy,
};

type Session = MapSession<
    SearchResultsObservable,
    RecordingMapSurface,
    SimulatedLocation,
    RecordingActionSurface,
    RecordingNavigator,
>;

struct Harness {
    subject: SearchResultsObservable,
    surface: RecordingMapSurface,
    location: SimulatedLocation,
    action: RecordingActionSurface,
    navigator: RecordingNavigator,
    session: Session,
    // 保留 sender，否則回呼無法再排入事件
    _sender: UnboundedSender<MapEvent>,
    events: UnboundedReceiver<MapEvent>,
}

impl Harness {
    fn new(policy: SelectionPolicy) -> Self {
        let subject = SearchResultsObservable::new();
        let surface = RecordingMapSurface::new();
        let location = SimulatedLocation::new();
        let action = RecordingActionSurface::new();
        let navigator = RecordingNavigator::new();
        let (tx, events) = event_channel();

        let session = MapSession::new(
            subject.clone(),
            MapOverlaySynchronizer::new(surface.clone(), location.clone()),
            SelectionController::new(action.clone(), navigator.clone(), policy),
            &tx,
        );

        Self {
            subject,
            surface,
            location,
            action,
            navigator,
            session,
            _sender: tx,
            events,
        }
    }

    fn pump(&mut self) -> usize {
        self.session.drain_pending(&mut self.events)
    }
}

fn bars_and_coffee() -> Vec<ResultGroup> {
    vec![
        ResultGroup::new(
            "Bars",
            vec![
                Venue::new("a", "Venue A").with_coordinates("40.0", "-73.0"),
                Venue::new("b", "Venue B").with_coordinates("0", "0"),
            ],
        ),
        ResultGroup::new("Coffee", vec![]),
    ]
}

#[test]
fn test_bars_and_empty_coffee_installs_single_overlay() {
    let mut h = Harness::new(SelectionPolicy::default());
    h.subject.set_search_results(Some(bars_and_coffee()));
    h.session.activate();

    let installed = h.surface.installed();
    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].category, "Bars");
    assert_eq!(installed[0].items.len(), 1);
    assert_eq!(installed[0].items[0].venue.id, "a");
}

#[test]
fn test_null_results_leave_map_empty_but_still_recenter() {
    let mut h = Harness::new(SelectionPolicy::default());
    h.location.push_fix(GeoPoint::new(40.7, -73.9));
    h.pump();

    h.subject.set_search_results(None);
    h.session.activate();

    assert!(h.session.synchronizer().overlays().is_empty());
    assert!(h.surface.installed().is_empty());
    assert_eq!(h.surface.center(), Some(GeoPoint::new(40.7, -73.9)));
    assert_eq!(h.surface.zoom(), Some(16));
}

#[test]
fn test_activation_subscribes_once() {
    let mut h = Harness::new(SelectionPolicy::default());
    h.session.activate();
    h.session.activate();

    assert!(h.session.is_subscribed());
    assert_eq!(h.subject.observer_count(), 1);
    assert!(h.location.is_enabled());
}

#[test]
fn test_deactivation_unsubscribes_and_stops_rebuilds() {
    let mut h = Harness::new(SelectionPolicy::default());
    h.session.activate();
    let installs_before = h.surface.install_count();

    h.session.deactivate();
    assert_eq!(h.subject.observer_count(), 0);
    assert!(!h.location.is_enabled());

    h.subject.set_search_results(Some(bars_and_coffee()));
    assert_eq!(h.pump(), 0);
    assert_eq!(h.surface.install_count(), installs_before);

    // 再次停用不會出錯
    h.session.deactivate();
    assert_eq!(h.subject.observer_count(), 0);
}

#[test]
fn test_reactivating_twice_keeps_one_handler() {
    let mut h = Harness::new(SelectionPolicy::default());
    for _ in 0..2 {
        h.session.activate();
        h.session.deactivate();
    }
    h.session.activate();
    assert_eq!(h.subject.observer_count(), 1);

    let installs_before = h.surface.install_count();
    h.subject.set_search_results(Some(bars_and_coffee()));

    assert_eq!(h.pump(), 1);
    assert_eq!(h.surface.install_count(), installs_before + 1);
}

#[test]
fn test_results_change_rebuilds_from_scratch() {
    let mut h = Harness::new(SelectionPolicy::default());
    h.session.activate();
    h.subject.set_search_results(Some(bars_and_coffee()));
    h.pump();

    h.subject.set_search_results(Some(vec![ResultGroup::new(
        "Parks",
        vec![Venue::new("p", "Park").with_coordinates("40.8", "-73.95")],
    )]));
    h.pump();

    assert_eq!(h.session.synchronizer().overlays().categories(), vec!["Parks"]);
    let installed: Vec<String> = h
        .surface
        .installed()
        .into_iter()
        .map(|o| o.category)
        .collect();
    assert_eq!(installed, vec!["Parks".to_string()]);

    // 每次重建都先清除並重新加入定位標記
    let ops = h.surface.operations();
    let clears = ops.iter().filter(|op| **op == SurfaceOp::Clear).count();
    assert_eq!(clears, 3);
}

#[test]
fn test_tap_then_action_opens_the_tapped_venue() {
    let mut h = Harness::new(SelectionPolicy::default());
    h.subject.set_search_results(Some(vec![
        ResultGroup::new(
            "Bars",
            vec![
                Venue::new("a", "A").with_coordinates("40.0", "-73.0"),
                Venue::new("x", "X").with_coordinates("0", "-73.0"),
                Venue::new("b", "B").with_coordinates("40.1", "-73.1"),
            ],
        ),
        ResultGroup::new(
            "Coffee",
            vec![Venue::new("c", "C").with_coordinates("40.2", "-73.2")],
        ),
    ]));
    h.session.activate();

    h.session.handle(MapEvent::OverlayTap { overlay: 0, item: 1 }).unwrap();
    h.session.handle(MapEvent::ActionTriggered).unwrap();
    h.session.handle(MapEvent::OverlayTap { overlay: 1, item: 0 }).unwrap();
    h.session.handle(MapEvent::ActionTriggered).unwrap();

    assert_eq!(h.navigator.opened_ids(), vec!["b".to_string(), "c".to_string()]);
    assert_eq!(h.action.label().as_deref(), Some("C"));
    assert!(h.action.is_visible());
}

#[test]
fn test_resync_clears_standing_selection_by_default() {
    let mut h = Harness::new(SelectionPolicy::default());
    h.subject.set_search_results(Some(bars_and_coffee()));
    h.session.activate();
    h.session.handle(MapEvent::OverlayTap { overlay: 0, item: 0 }).unwrap();
    assert!(h.action.is_visible());

    h.subject.set_search_results(Some(bars_and_coffee()));
    h.pump();

    assert_eq!(h.session.selection().state(), &SelectionState::Unselected);
    assert!(!h.action.is_visible());
    h.session.handle(MapEvent::ActionTriggered).unwrap();
    assert!(h.navigator.opened().is_empty());
}

#[test]
fn test_resync_keeps_selection_when_configured() {
    let policy = SelectionPolicy {
        reset_on_map_tap: false,
        reset_on_resync: false,
    };
    let mut h = Harness::new(policy);
    h.subject.set_search_results(Some(bars_and_coffee()));
    h.session.activate();
    h.session.handle(MapEvent::OverlayTap { overlay: 0, item: 0 }).unwrap();

    h.subject.set_search_results(None);
    h.pump();

    // 選取的地點已不在任何 overlay 中，但仍保留
    assert!(h.session.synchronizer().overlays().is_empty());
    let selected = h.session.selection().selected().cloned();
    assert_eq!(selected.map(|v| v.id.clone()), Some("a".to_string()));
}

#[test]
fn test_map_tap_hides_button_and_keeps_venue_by_default() {
    let mut h = Harness::new(SelectionPolicy::default());
    h.subject.set_search_results(Some(bars_and_coffee()));
    h.session.activate();
    h.session.handle(MapEvent::OverlayTap { overlay: 0, item: 0 }).unwrap();

    h.session.handle(MapEvent::MapTap).unwrap();

    assert!(!h.action.is_visible());
    assert!(h.session.selection().state().is_selected());
}

#[test]
fn test_selected_venue_is_shared_with_result_set() {
    let mut h = Harness::new(SelectionPolicy::default());
    h.subject.set_search_results(Some(bars_and_coffee()));
    h.session.activate();
    h.session.handle(MapEvent::OverlayTap { overlay: 0, item: 0 }).unwrap();

    let results = venue_map::domain::ports::ResultSubject::current_results(&h.subject).unwrap();
    let selected = h.session.selection().selected().unwrap();
    assert!(Arc::ptr_eq(selected, &results[0].venues[0]));
}

#[test]
fn test_first_fix_after_activation_recenters() {
    let mut h = Harness::new(SelectionPolicy::default());
    h.session.activate();
    assert_eq!(h.surface.center(), None);

    h.location.push_fix(GeoPoint::new(51.5, -0.12));
    assert_eq!(h.pump(), 1);
    assert_eq!(h.surface.center(), Some(GeoPoint::new(51.5, -0.12)));

    h.location.push_fix(GeoPoint::new(51.6, -0.13));
    assert_eq!(h.pump(), 0);
}
