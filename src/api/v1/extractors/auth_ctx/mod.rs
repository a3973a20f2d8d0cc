/*!
 * Authentication context extractors
 *
 * Responsibility:
 * - hand the request's AuthContext (filled by the gate) to handlers
 * - `Authenticated` is the downstream check: no identity -> 401
 *
 * Public API:
 * - Authenticated
 * - CurrentAuth
 */

mod extract;

pub use extract::{Authenticated, CurrentAuth};
