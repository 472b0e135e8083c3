pub mod column;
pub mod dependency;
pub mod member;
pub mod task;

pub use column::*;
pub use dependency::*;
pub use member::*;
pub use task::*;
