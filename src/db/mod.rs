//! Persistence module split across logical submodules. `WorkoutStore` is the
//! only path to the database; each entity family adds its queries in its own
//! file through a separate `impl` block.

mod connection;
mod error;
mod exercises;
mod sets;
mod workouts;

pub use connection::WorkoutStore;
pub use error::{StoreError, StoreResult};
