pub mod player;
pub mod registry;
pub mod state;

pub use player::{Creation, Player, Teardown};
pub use registry::SurfaceRegistry;
pub use state::State;
