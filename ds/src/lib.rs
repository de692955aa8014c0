#[doc(inline)]
pub use lazy_range_tree::{self, *};
