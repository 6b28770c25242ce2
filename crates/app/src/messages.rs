//! User-facing messages
//!
//! The product UI is Spanish; every error that reaches the user goes
//! through here. Raw error objects never cross this boundary.

pub const NEED_QUESTIONS: &str =
    "Primero debes generar preguntas con IA antes de crear la partida.";
pub const NEED_TOPIC: &str = "Por favor selecciona un tema antes de crear la partida.";
pub const BATCH_NOT_SAVED: &str =
    "Las preguntas todavía no se han guardado. Intenta guardarlas de nuevo.";
pub const ALREADY_CREATED: &str = "La partida ya fue creada con estas preguntas.";
pub const GAME_ALREADY_STARTED: &str =
    "La partida ya ha comenzado. No puedes unirte en este momento.";
pub const CONNECTION_ERROR: &str = "Error de conexión. Intenta nuevamente.";
pub const INVALID_RESPONSE: &str = "Respuesta inválida del backend.";
pub const GENERIC: &str = "Ocurrió un error inesperado. Intenta nuevamente.";
pub const ONLY_HOST_STARTS: &str = "Solo el anfitrión puede iniciar la partida.";
pub const INCOMPLETE_QUESTION: &str = "Completa la pregunta y todas las opciones.";
pub const INVALID_CODE: &str = "Por favor ingresa un código de partida válido.";
pub const ALREADY_IN_GAME: &str =
    "Ya estás en una partida. Sal de la sala actual antes de unirte a otra.";
pub const CONFIG_INVALID: &str = "La configuración del cliente no es válida.";
pub const CREATE_FAILED_PREFIX: &str = "Ocurrió un error al crear la partida: ";

/// Localize a session-scoped `error` event for display
///
/// Recognized reasons get their localized text; anything else falls back
/// to the generic message.
pub fn localize_session_error(raw: &str) -> String {
    match raw {
        "Game already started" => GAME_ALREADY_STARTED.to_string(),
        _ => GENERIC.to_string(),
    }
}
