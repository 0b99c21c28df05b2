//! 도메인 타입.

mod instrument;
mod record;
mod scored;

pub use instrument::*;
pub use record::*;
pub use scored::*;
