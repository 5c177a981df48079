/*!
 * Persistence
 * Tree serialization and the encrypted on-disk envelope
 */

pub mod codec;
pub mod envelope;

pub use codec::{decode, encode, encoded_size};
pub use envelope::{load, load_with_config, save};
