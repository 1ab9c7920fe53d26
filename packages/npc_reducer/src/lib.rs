/// Thins out NPCs that share a home location.
///
mod location_key;
mod reducer;

pub use location_key::LocationKey;
pub use reducer::CROWDED_THRESHOLD;
pub use reducer::HOME_LOCATION_FIELD;
pub use reducer::Reduction;
pub use reducer::SAMPLE_SIZE;
pub use reducer::reduce;
pub use reducer::reduce_file;
