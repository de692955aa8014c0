//! Range-fold data structures built around lazily propagated range
//! operations, plus the operator algebra they are parameterized by.

#[doc(inline)]
pub use ds::{self, *};
#[doc(inline)]
pub use naive::{self, *};
#[doc(inline)]
pub use ops::{self, *};
