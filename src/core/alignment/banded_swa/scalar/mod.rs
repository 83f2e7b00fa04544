pub mod directional;
pub mod implementation;

pub use directional::scalar_banded_directional;
pub use implementation::scalar_banded_extz;
