pub mod similarity;

pub use similarity::{find_similar, similarity};
