// ============================================================================
// SELECTOR VIEWMODEL - Lógica del selector de ubicación de entrega
// ============================================================================
// Único punto de entrada para cambiar la ubicación: `set_location`.
// Ningún camino (búsqueda, pin arrastrado, GPS, geocoding) escribe
// coordenadas sin actualizar también la etiqueta y el estado de la UI.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::maps::{Geocoder, MapError, MapProvider};
use crate::models::{CloseTrigger, Location, LocationSource, PlaceResult, Selection, UiEvent};
use crate::services::handoff_service::HandoffService;
use crate::state::{SelectorPhase, SelectorState};
use crate::utils::i18n::t;
use crate::viewmodels::ports::{
    GeolocationError, GeolocationSensor, PositionOptions, SelectorView, UiEventSource,
};

/// Mapa + geocoder, disponibles cuando el script del proveedor llama a `initMap`
#[derive(Clone)]
pub struct MapPorts {
    pub map: Rc<dyn MapProvider>,
    pub geocoder: Rc<dyn Geocoder>,
}

/// Ajustes del selector que vienen de la configuración
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorSettings {
    pub language: String,
    pub sheet_transition: Duration,
    pub position_options: PositionOptions,
}

impl SelectorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            language: config.language.clone(),
            sheet_transition: config.sheet_transition(),
            position_options: PositionOptions::from_config(&config.geolocation),
        }
    }
}

/// Selector de ubicación. Se crea una sola vez al iniciar la página y se
/// comparte por `Rc` con todos los handlers.
pub struct LocationSelector {
    state: RefCell<SelectorState>,
    view: Rc<dyn SelectorView>,
    geolocation: Option<Rc<dyn GeolocationSensor>>,
    map: RefCell<Option<MapPorts>>,
    handoff: HandoffService,
    language: RefCell<String>,
    settings: SelectorSettings,
}

impl LocationSelector {
    pub fn new(
        view: Rc<dyn SelectorView>,
        geolocation: Option<Rc<dyn GeolocationSensor>>,
        handoff: HandoffService,
        settings: SelectorSettings,
    ) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(SelectorState::new()),
            view,
            geolocation,
            map: RefCell::new(None),
            handoff,
            language: RefCell::new(settings.language.clone()),
            settings,
        })
    }

    /// Copia del estado actual
    pub fn state(&self) -> SelectorState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> SelectorPhase {
        self.state.borrow().phase()
    }

    /// Pintar el estado inicial (sin ubicación)
    pub fn render(&self) {
        self.render_primary_action();
        self.refresh_attention();
        let clear_visible = self.state.borrow().clear_button_visible();
        self.view.set_clear_button_visible(clear_visible);
    }

    /// Registrar el selector en la fuente de eventos de UI
    pub fn attach(self: &Rc<Self>, source: &dyn UiEventSource) {
        let selector = Rc::downgrade(self);
        source.subscribe(Rc::new(move |event| {
            if let Some(selector) = selector.upgrade() {
                selector.handle(event);
            }
        }));
    }

    /// Conectar el mapa cuando el proveedor está listo
    pub fn attach_map(self: &Rc<Self>, ports: MapPorts) -> Result<(), MapError> {
        let selector = Rc::downgrade(self);
        ports.map.set_place_callback(Box::new(move |place| {
            if let Some(selector) = selector.upgrade() {
                selector.on_place_selected(place);
            }
        }))?;

        let selector = Rc::downgrade(self);
        ports.map.set_marker_drag_callback(Box::new(move |location| {
            if let Some(selector) = selector.upgrade() {
                selector.on_marker_drag_end(location);
            }
        }))?;

        *self.map.borrow_mut() = Some(ports);
        log::info!("🗺️ Mapa conectado al selector");
        Ok(())
    }

    pub fn set_language(&self, language: &str) {
        *self.language.borrow_mut() = language.to_uppercase();
        self.render_primary_action();
    }

    // ------------------------------------------------------------------------
    // Selección
    // ------------------------------------------------------------------------

    /// Registrar la ubicación actual.
    ///
    /// Sin coordenadas válidas (`None`) no cambia nada y devuelve `false`.
    pub fn set_location(&self, label: &str, location: Option<Location>) -> bool {
        let Some(location) = location else {
            log::debug!("set_location sin coordenadas, ignorado");
            return false;
        };

        let selection = Selection::new(label, location);
        self.state.borrow_mut().selection = Some(selection.clone());

        log::info!(
            "📍 Ubicación seleccionada: {} ({})",
            selection.label,
            location.preview()
        );

        self.view.show_preview(&selection.label, &location.preview());
        self.render_primary_action();
        self.refresh_attention();
        true
    }

    /// `set_location` con la etiqueta por defecto del origen si no hay otra
    pub fn set_location_from(
        &self,
        source: LocationSource,
        label: Option<String>,
        location: Option<Location>,
    ) -> bool {
        let label = label.unwrap_or_else(|| self.t(source.default_label_key()));
        self.set_location(&label, location)
    }

    // ------------------------------------------------------------------------
    // Sheet de revisión
    // ------------------------------------------------------------------------

    pub fn open_review_sheet(&self) {
        {
            let mut state = self.state.borrow_mut();
            if !state.is_selected() || state.sheet_open {
                return;
            }
            state.sheet_open = true;
        }
        log::info!("📋 Sheet de revisión abierto");
        self.view.open_sheet();
    }

    pub fn close_review_sheet(&self, trigger: CloseTrigger) {
        {
            let mut state = self.state.borrow_mut();
            if !state.sheet_open {
                return;
            }
            state.sheet_open = false;
            if trigger == CloseTrigger::Change {
                state.reset_selection();
            }
        }

        self.view.close_sheet(self.settings.sheet_transition);

        if trigger == CloseTrigger::Change {
            log::info!("🔄 Cambiar ubicación: selección reiniciada");
            self.view.clear_preview();
            self.view.set_input_value("");
            self.view.set_clear_button_visible(false);
            self.render_primary_action();
            self.refresh_attention();
        } else {
            log::info!("📋 Sheet de revisión cerrado ({:?})", trigger);
        }
    }

    /// Confirmar y enviar al canal de mensajería
    pub fn confirm_and_handoff(&self) {
        let selection = self.state.borrow().selection.clone();

        match self.handoff.prepare(selection.as_ref()) {
            Ok(link) => {
                self.close_review_sheet(CloseTrigger::Confirm);
                self.view.navigate(&link);
            }
            Err(e) => {
                log::warn!("⚠️ Hand-off cancelado: {}", e);
                self.view.alert(&self.t(e.message_key()));
            }
        }
    }

    // ------------------------------------------------------------------------
    // Eventos de UI
    // ------------------------------------------------------------------------

    pub fn handle(self: &Rc<Self>, event: UiEvent) {
        match event {
            UiEvent::InputFocus => {
                self.view.set_keyboard_up(true);
                self.refresh_attention();
            }
            UiEvent::InputBlur => {
                self.view.set_keyboard_up(false);
                self.refresh_attention();
            }
            UiEvent::InputChanged(text) => {
                let clear_visible = {
                    let mut state = self.state.borrow_mut();
                    state.input_text = text;
                    state.clear_button_visible()
                };
                self.view.set_clear_button_visible(clear_visible);
                self.refresh_attention();
            }
            UiEvent::OutsideClick {
                inside_search,
                inside_suggestions,
            } => {
                if !inside_search && !inside_suggestions {
                    self.refresh_attention();
                }
            }
            UiEvent::ClearInput => self.clear_input(),
            UiEvent::LocateMe => self.locate_me(),
            UiEvent::PrimaryAction => {
                if self.state.borrow().is_selected() {
                    self.open_review_sheet();
                } else {
                    self.view.focus_input();
                }
            }
            UiEvent::ConfirmHandoff | UiEvent::CloseSheet(CloseTrigger::Confirm) => {
                self.confirm_and_handoff();
            }
            UiEvent::CloseSheet(trigger) => self.close_review_sheet(trigger),
            UiEvent::Escape => self.close_review_sheet(CloseTrigger::Generic),
        }
    }

    fn clear_input(&self) {
        self.state.borrow_mut().input_text.clear();
        self.view.set_input_value("");
        self.view.set_clear_button_visible(false);
        self.refresh_attention();
        self.view.focus_input();
    }

    // ------------------------------------------------------------------------
    // Eventos del mapa
    // ------------------------------------------------------------------------

    /// Sugerencia elegida en el autocompletado
    pub fn on_place_selected(&self, place: PlaceResult) {
        let Some(location) = place.location else {
            // Texto ambiguo: el proveedor no devolvió geometría
            log::debug!("Lugar sin geometría, ignorado");
            return;
        };

        if let Some(ports) = self.map_ports() {
            if let Err(e) = ports.map.pan_to(location) {
                log::warn!("⚠️ No se pudo mover el mapa: {}", e);
            }
            if let Err(e) = ports.map.set_marker_position(location) {
                log::warn!("⚠️ No se pudo mover el marcador: {}", e);
            }
        }

        let label = place.label().unwrap_or_else(|| {
            let typed = self.state.borrow().input_text.trim().to_string();
            if typed.is_empty() {
                self.t(LocationSource::Search.default_label_key())
            } else {
                typed
            }
        });

        self.sync_input(&label);
        self.set_location(&label, Some(location));
    }

    /// Fin de arrastre del marcador
    pub fn on_marker_drag_end(self: &Rc<Self>, location: Location) {
        if self.set_location_from(LocationSource::DroppedPin, None, Some(location)) {
            self.reverse_geocode(location);
        }
    }

    /// Botón "ubicarme"
    pub fn locate_me(self: &Rc<Self>) {
        let sensor = self
            .geolocation
            .clone()
            .filter(|sensor| sensor.is_supported());

        let Some(sensor) = sensor else {
            log::warn!("⚠️ Geolocalización no soportada");
            self.view.alert(&self.t("geolocation_unsupported"));
            return;
        };

        log::info!("📡 Solicitando ubicación del dispositivo...");
        let selector = Rc::downgrade(self);
        sensor.current_position(
            self.settings.position_options,
            Box::new(move |result| {
                if let Some(selector) = selector.upgrade() {
                    selector.on_position(result);
                }
            }),
        );
    }

    fn on_position(self: &Rc<Self>, result: Result<Location, GeolocationError>) {
        match result {
            Ok(location) => {
                if let Some(ports) = self.map_ports() {
                    if let Err(e) = ports.map.set_center(location) {
                        log::warn!("⚠️ No se pudo centrar el mapa: {}", e);
                    }
                    if let Err(e) = ports.map.set_marker_position(location) {
                        log::warn!("⚠️ No se pudo mover el marcador: {}", e);
                    }
                }
                if self.set_location_from(LocationSource::Device, None, Some(location)) {
                    self.reverse_geocode(location);
                }
            }
            Err(e) => {
                log::error!("❌ Error de geolocalización: {}", e);
                let key = match e {
                    GeolocationError::PermissionDenied => "geolocation_denied",
                    _ => "geolocation_failed",
                };
                self.view.alert(&self.t(key));
            }
        }
    }

    fn reverse_geocode(self: &Rc<Self>, location: Location) {
        let Some(ports) = self.map_ports() else {
            return;
        };
        let selector = Rc::downgrade(self);
        ports.geocoder.reverse_geocode(
            location,
            Box::new(move |address| {
                if let Some(selector) = selector.upgrade() {
                    selector.on_reverse_geocoded(location, address);
                }
            }),
        );
    }

    /// Resultado del geocoding inverso. Solo se aplica si la selección
    /// sigue apuntando a las mismas coordenadas.
    pub fn on_reverse_geocoded(&self, location: Location, address: Option<String>) {
        let Some(address) = address.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()) else {
            return;
        };

        let still_current = self
            .state
            .borrow()
            .selection
            .as_ref()
            .map(|s| s.location == location)
            .unwrap_or(false);
        if !still_current {
            log::debug!("Geocoding obsoleto para {}, descartado", location.preview());
            return;
        }

        self.sync_input(&address);
        self.set_location(&address, Some(location));
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn t(&self, key: &str) -> String {
        t(key, &self.language.borrow())
    }

    fn map_ports(&self) -> Option<MapPorts> {
        self.map.borrow().clone()
    }

    fn sync_input(&self, text: &str) {
        self.state.borrow_mut().input_text = text.to_string();
        self.view.set_input_value(text);
        self.view.set_clear_button_visible(!text.is_empty());
    }

    fn render_primary_action(&self) {
        let action = self.state.borrow().primary_action();
        self.view.set_primary_action(action, &self.t(action.label_key()));
    }

    /// Overlay + pulse = sin ubicación y con el input vacío
    fn refresh_attention(&self) {
        let visible = self.state.borrow().attention_visible();
        self.view.set_attention(visible);
    }
}
