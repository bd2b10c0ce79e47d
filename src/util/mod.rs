//! C2, the dynamic-sequence contract. The growable half of that contract
//! (`push`/`pop`/`remove`/`get`/iterate/`resize`/sort with amortized-O(1)
//! doubling growth) is satisfied directly by `std::Vec<T>` at every call
//! site that needs it (the route table, the header overflow list) — `Vec`
//! already implements every one of those operations, so a hand-rolled
//! wrapper would only be unidiomatic indirection. The one piece `Vec`
//! cannot express is a *fixed*-capacity sequence, needed for the
//! 16-parameter route-parameter array (SPEC_FULL §3); [`FixedVec`] is that
//! sibling, grounded on `original_source/include/dyn_arr.h`'s contract but
//! refusing growth past its const-generic capacity instead of reallocating.

mod fixed_vec;

pub use fixed_vec::FixedVec;
