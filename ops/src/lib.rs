#[doc(inline)]
pub use monoid::{self, *};
#[doc(inline)]
pub use op_add::{self, *};
#[doc(inline)]
pub use op_xor::{self, *};
#[doc(inline)]
pub use usize_bounds::{self, *};
