/*
 * Responsibility
 * - middleware public interface
 * - auth::context (empty AuthContext per request), auth::access (the gate), http (transport)
 */
pub mod auth;
pub mod http;
