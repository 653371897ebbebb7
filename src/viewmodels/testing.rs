// Fakes de los ports para los tests del selector

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::maps::{GeocodeCallback, Geocoder, MapError, MapProvider, MarkerDragCallback, PlaceCallback};
use crate::models::{Location, PlaceResult, UiEvent};
use crate::services::handoff_service::HandoffService;
use crate::state::PrimaryAction;
use crate::viewmodels::ports::{
    GeolocationError, GeolocationSensor, PositionCallback, PositionOptions, SelectorView,
    UiEventHandler, UiEventSource,
};
use crate::viewmodels::selector_viewmodel::{LocationSelector, MapPorts, SelectorSettings};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Preview(String, String),
    ClearPreview,
    PrimaryAction(PrimaryAction, String),
    Attention(bool),
    ClearButton(bool),
    InputValue(String),
    FocusInput,
    KeyboardUp(bool),
    OpenSheet,
    CloseSheet(Duration),
    Alert(String),
    Navigate(String),
}

#[derive(Default)]
pub struct RecordingView {
    calls: RefCell<Vec<ViewCall>>,
}

impl RecordingView {
    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.borrow().clone()
    }

    fn last<T>(&self, pick: impl Fn(&ViewCall) -> Option<T>) -> Option<T> {
        self.calls.borrow().iter().rev().find_map(pick)
    }

    pub fn last_preview(&self) -> Option<(String, String)> {
        self.last(|c| match c {
            ViewCall::Preview(label, coords) => Some((label.clone(), coords.clone())),
            _ => None,
        })
    }

    pub fn last_primary(&self) -> Option<PrimaryAction> {
        self.last(|c| match c {
            ViewCall::PrimaryAction(action, _) => Some(*action),
            _ => None,
        })
    }

    pub fn last_attention(&self) -> Option<bool> {
        self.last(|c| match c {
            ViewCall::Attention(visible) => Some(*visible),
            _ => None,
        })
    }

    pub fn last_clear_visible(&self) -> Option<bool> {
        self.last(|c| match c {
            ViewCall::ClearButton(visible) => Some(*visible),
            _ => None,
        })
    }

    pub fn last_keyboard_up(&self) -> Option<bool> {
        self.last(|c| match c {
            ViewCall::KeyboardUp(up) => Some(*up),
            _ => None,
        })
    }

    pub fn last_input_value(&self) -> Option<String> {
        self.last(|c| match c {
            ViewCall::InputValue(value) => Some(value.clone()),
            _ => None,
        })
    }

    pub fn alerts(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                ViewCall::Alert(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                ViewCall::Navigate(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ViewCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl SelectorView for RecordingView {
    fn show_preview(&self, label: &str, coords: &str) {
        self.record(ViewCall::Preview(label.to_string(), coords.to_string()));
    }

    fn clear_preview(&self) {
        self.record(ViewCall::ClearPreview);
    }

    fn set_primary_action(&self, action: PrimaryAction, label: &str) {
        self.record(ViewCall::PrimaryAction(action, label.to_string()));
    }

    fn set_attention(&self, visible: bool) {
        self.record(ViewCall::Attention(visible));
    }

    fn set_clear_button_visible(&self, visible: bool) {
        self.record(ViewCall::ClearButton(visible));
    }

    fn set_input_value(&self, value: &str) {
        self.record(ViewCall::InputValue(value.to_string()));
    }

    fn focus_input(&self) {
        self.record(ViewCall::FocusInput);
    }

    fn set_keyboard_up(&self, up: bool) {
        self.record(ViewCall::KeyboardUp(up));
    }

    fn open_sheet(&self) {
        self.record(ViewCall::OpenSheet);
    }

    fn close_sheet(&self, transition: Duration) {
        self.record(ViewCall::CloseSheet(transition));
    }

    fn alert(&self, message: &str) {
        self.record(ViewCall::Alert(message.to_string()));
    }

    fn navigate(&self, url: &str) {
        self.record(ViewCall::Navigate(url.to_string()));
    }
}

#[derive(Default)]
pub struct FakeEventSource {
    handlers: RefCell<Vec<UiEventHandler>>,
}

impl FakeEventSource {
    pub fn emit(&self, event: UiEvent) {
        let handlers = self.handlers.borrow().clone();
        for handler in handlers {
            handler(event.clone());
        }
    }
}

impl UiEventSource for FakeEventSource {
    fn subscribe(&self, handler: UiEventHandler) {
        self.handlers.borrow_mut().push(handler);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    PanTo(Location),
    Center(Location),
    Marker(Location),
}

#[derive(Default)]
pub struct FakeMap {
    calls: RefCell<Vec<MapCall>>,
    on_place: RefCell<Option<PlaceCallback>>,
    on_drag: RefCell<Option<MarkerDragCallback>>,
}

impl FakeMap {
    pub fn calls(&self) -> Vec<MapCall> {
        self.calls.borrow().clone()
    }

    pub fn select_place(&self, place: PlaceResult) {
        if let Some(callback) = self.on_place.borrow().as_ref() {
            callback(place);
        }
    }

    pub fn drag_marker(&self, location: Location) {
        if let Some(callback) = self.on_drag.borrow().as_ref() {
            callback(location);
        }
    }
}

impl MapProvider for FakeMap {
    fn pan_to(&self, location: Location) -> Result<(), MapError> {
        self.calls.borrow_mut().push(MapCall::PanTo(location));
        Ok(())
    }

    fn set_center(&self, location: Location) -> Result<(), MapError> {
        self.calls.borrow_mut().push(MapCall::Center(location));
        Ok(())
    }

    fn set_marker_position(&self, location: Location) -> Result<(), MapError> {
        self.calls.borrow_mut().push(MapCall::Marker(location));
        Ok(())
    }

    fn set_place_callback(&self, callback: PlaceCallback) -> Result<(), MapError> {
        *self.on_place.borrow_mut() = Some(callback);
        Ok(())
    }

    fn set_marker_drag_callback(&self, callback: MarkerDragCallback) -> Result<(), MapError> {
        *self.on_drag.borrow_mut() = Some(callback);
        Ok(())
    }
}

/// Geocoder que encola las peticiones y las resuelve a mano, en orden
#[derive(Default)]
pub struct FakeGeocoder {
    pending: RefCell<VecDeque<GeocodeCallback>>,
}

impl FakeGeocoder {
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn resolve(&self, address: Option<String>) {
        let callback = self.pending.borrow_mut().pop_front();
        if let Some(callback) = callback {
            callback(address);
        }
    }
}

impl Geocoder for FakeGeocoder {
    fn reverse_geocode(&self, _location: Location, callback: GeocodeCallback) {
        self.pending.borrow_mut().push_back(callback);
    }
}

/// Sensor que responde de inmediato con un resultado fijo
pub struct FakeSensor {
    result: Result<Location, GeolocationError>,
    requests: RefCell<Vec<PositionOptions>>,
}

impl FakeSensor {
    pub fn returning(result: Result<Location, GeolocationError>) -> Self {
        Self {
            result,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requested_options(&self) -> Vec<PositionOptions> {
        self.requests.borrow().clone()
    }
}

impl GeolocationSensor for FakeSensor {
    fn is_supported(&self) -> bool {
        true
    }

    fn current_position(&self, options: PositionOptions, callback: PositionCallback) {
        self.requests.borrow_mut().push(options);
        callback(self.result.clone());
    }
}

pub struct Harness {
    pub selector: Rc<LocationSelector>,
    pub view: Rc<RecordingView>,
    pub map: Rc<FakeMap>,
    pub geocoder: Rc<FakeGeocoder>,
    pub sensor: Rc<FakeSensor>,
}

impl Harness {
    /// Selector sin mapa ni sensor
    pub fn new() -> Self {
        Self::build(None, false)
    }

    pub fn with_map() -> Self {
        Self::build(None, true)
    }

    pub fn with_map_and_sensor(sensor: FakeSensor) -> Self {
        Self::build(Some(sensor), true)
    }

    fn build(sensor: Option<FakeSensor>, with_map: bool) -> Self {
        let config = AppConfig::default();
        let view = Rc::new(RecordingView::default());
        let map = Rc::new(FakeMap::default());
        let geocoder = Rc::new(FakeGeocoder::default());
        let has_sensor = sensor.is_some();
        let sensor = Rc::new(sensor.unwrap_or_else(|| {
            FakeSensor::returning(Err(GeolocationError::PositionUnavailable))
        }));

        let selector = LocationSelector::new(
            view.clone(),
            has_sensor.then(|| sensor.clone() as Rc<dyn GeolocationSensor>),
            HandoffService::from_config(&config.messaging).unwrap(),
            SelectorSettings::from_config(&config),
        );

        if with_map {
            selector
                .attach_map(MapPorts {
                    map: map.clone(),
                    geocoder: geocoder.clone(),
                })
                .unwrap();
        }

        Self {
            selector,
            view,
            map,
            geocoder,
            sensor,
        }
    }
}
