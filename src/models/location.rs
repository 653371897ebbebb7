use serde::{Deserialize, Serialize};

/// Punto de entrega. Siempre completo: nunca existe con una sola coordenada.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Construye una ubicación válida.
    ///
    /// `0.0` es una coordenada válida (ecuador / meridiano de Greenwich);
    /// solo se rechazan NaN, infinitos y valores fuera de rango.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        valid.then_some(Self { latitude, longitude })
    }

    /// Coordenadas para el preview del sheet (6 decimales)
    pub fn preview(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }

    /// Coordenadas para el texto del hand-off: `lat,lng` tal como las
    /// escribe un número de JavaScript (`1.5,2.5`, `0`, `1e-7`)
    pub fn message_coords(&self) -> String {
        format!("{},{}", js_number(self.latitude), js_number(self.longitude))
    }
}

/// `Number.prototype.toString()` para valores finitos: dígitos más cortos
/// que recuperan el valor, notación exponencial fuera de [1e-6, 1e21)
fn js_number(value: f64) -> String {
    if value == 0.0 {
        // -0 también se escribe "0"
        return "0".to_string();
    }

    // `{:e}` ya da los dígitos más cortos: "3.6804e1", "1e-7"
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return value.to_string(),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = match exponent.parse() {
        Ok(exponent) => exponent,
        Err(_) => return value.to_string(),
    };

    let k = digits.len() as i32;
    let n = exponent + 1;
    let sign = if value < 0.0 { "-" } else { "" };

    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let exp_sign = if n - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, exp_sign, (n - 1).abs())
        } else {
            format!("{}.{}e{}{}", first, rest, exp_sign, (n - 1).abs())
        }
    };

    format!("{}{}", sign, body)
}

/// Origen de una selección (define la etiqueta por defecto)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Search,
    DroppedPin,
    Device,
}

impl LocationSource {
    /// Clave i18n de la etiqueta por defecto
    pub fn default_label_key(&self) -> &'static str {
        match self {
            LocationSource::Search => "search_result",
            LocationSource::DroppedPin => "dropped_pin",
            LocationSource::Device => "current_location",
        }
    }
}

/// Par ubicación + etiqueta. Se reemplaza entero, nunca campo a campo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub location: Location,
    pub label: String,
}

impl Selection {
    pub fn new(label: impl Into<String>, location: Location) -> Self {
        Self {
            location,
            label: label.into(),
        }
    }

    /// Texto libre enviado al canal de mensajería: `"{label} {lat},{lng}"`
    pub fn message_text(&self) -> String {
        format!("{} {}", self.label, self.location.message_coords())
    }
}

/// Resultado de búsqueda del proveedor de mapas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceResult {
    /// `None` cuando el resultado no trae geometría (texto ambiguo)
    pub location: Option<Location>,
    pub formatted_address: Option<String>,
    pub name: Option<String>,
}

impl PlaceResult {
    /// Mejor etiqueta disponible: dirección formateada, luego nombre
    pub fn label(&self) -> Option<String> {
        [self.formatted_address.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}
