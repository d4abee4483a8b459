pub mod alert;
pub mod crop;
pub mod environmental;
pub mod forecast;
pub mod location;
pub mod prediction;
pub mod suitability;

pub use alert::*;
pub use crop::*;
pub use environmental::*;
pub use forecast::*;
pub use location::*;
pub use prediction::*;
pub use suitability::*;
