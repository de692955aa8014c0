#[doc(inline)]
pub use range_naive::{self, *};
