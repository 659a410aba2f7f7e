use axum::Router;

/// A service module that contributes HTTP routes.
///
/// The server binary collects every module and merges its routes into a
/// single Router. Routes are returned fully stated (`Router<()>`) and carry
/// their own path prefix.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes.
    fn routes(&self) -> Router;
}
