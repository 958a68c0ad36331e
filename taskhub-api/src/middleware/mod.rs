/// Middleware for the API server
///
/// - `security`: response security headers
///
/// Authentication runs as `app::jwt_auth_layer` because it needs the
/// application state.

pub mod security;
