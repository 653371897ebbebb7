// ============================================================================
// MÓDULO DE INTERNACIONALIZACIÓN
// ============================================================================

use std::collections::HashMap;

/// Obtener diccionario de traducciones para un idioma
fn get_translations(lang: &str) -> HashMap<&'static str, &'static str> {
    let mut translations = HashMap::new();
    let lang_upper = lang.to_uppercase();

    match lang_upper.as_str() {
        "ES" => {
            // Botón principal
            translations.insert("set_delivery_location", "Elegir ubicación de entrega");
            translations.insert("review_location", "Revisar ubicación");

            // Etiquetas por defecto
            translations.insert("search_result", "Ubicación seleccionada");
            translations.insert("dropped_pin", "Pin colocado");
            translations.insert("current_location", "Ubicación actual");

            // Alertas
            translations.insert("geolocation_unsupported", "Tu navegador no soporta geolocalización.");
            translations.insert("geolocation_denied", "Permite el acceso a la ubicación en los ajustes del navegador o escribe tu ubicación arriba.");
            translations.insert("geolocation_failed", "No se pudo obtener la ubicación. Inténtalo de nuevo.");
            translations.insert("location_required", "Elige primero una ubicación de entrega.");
        }
        "FR" => {
            translations.insert("set_delivery_location", "Choisir le lieu de livraison");
            translations.insert("review_location", "Vérifier le lieu");

            translations.insert("search_result", "Lieu sélectionné");
            translations.insert("dropped_pin", "Épingle déposée");
            translations.insert("current_location", "Position actuelle");

            translations.insert("geolocation_unsupported", "Votre navigateur ne prend pas en charge la géolocalisation.");
            translations.insert("geolocation_denied", "Autorisez l'accès à la position dans les paramètres du navigateur ou saisissez votre adresse ci-dessus.");
            translations.insert("geolocation_failed", "Impossible de récupérer la position. Réessayez.");
            translations.insert("location_required", "Veuillez d'abord choisir un lieu de livraison.");
        }
        "EN" | _ => {
            translations.insert("set_delivery_location", "Set delivery location");
            translations.insert("review_location", "Review location");

            translations.insert("search_result", "Selected location");
            translations.insert("dropped_pin", "Dropped pin");
            translations.insert("current_location", "Current Location");

            translations.insert("geolocation_unsupported", "Geolocation is not supported by your browser.");
            translations.insert("geolocation_denied", "Please allow location access in your browser settings or type your location above.");
            translations.insert("geolocation_failed", "Failed to retrieve location. Try again.");
            translations.insert("location_required", "Please select a delivery location first.");
        }
    }

    translations
}

/// Función de traducción
///
/// Devuelve la clave si no hay traducción
pub fn t(key: &str, lang: &str) -> String {
    let translations = get_translations(lang);

    if let Some(translation) = translations.get(key) {
        return translation.to_string();
    }

    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_is_the_fallback_language() {
        assert_eq!(t("dropped_pin", "EN"), "Dropped pin");
        assert_eq!(t("dropped_pin", "de"), "Dropped pin");
        assert_eq!(t("current_location", "es"), "Ubicación actual");
    }

    #[test]
    fn unknown_key_returns_key() {
        assert_eq!(t("no_such_key", "FR"), "no_such_key");
    }
}
