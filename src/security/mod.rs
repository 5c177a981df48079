/*!
 * Security Module
 * Path string hardening applied before any tree access
 */

pub mod path;

pub use path::{
    is_traversal, join, normalize, sanitize, validate_bounds, validate_filename, validate_length,
};
