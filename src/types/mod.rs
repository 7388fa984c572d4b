pub mod features;
pub mod market;
pub mod rate;
pub mod signals;

pub use features::*;
pub use market::*;
pub use rate::*;
pub use signals::*;
