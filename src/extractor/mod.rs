pub mod annotation;
pub mod attribution;
pub mod boundary;
pub mod entity;
pub mod lexicon;
pub mod pipeline;
pub mod segment;
pub mod similarity;

pub use annotation::*;
pub use attribution::*;
pub use boundary::*;
pub use entity::*;
pub use lexicon::*;
pub use pipeline::*;
pub use segment::*;
pub use similarity::*;
