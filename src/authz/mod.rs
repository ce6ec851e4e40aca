//! Authorization engine: one decision procedure for every resource.
//!
//! Services call [`Authorizer::enforce`] for single-row actions and
//! [`Authorizer::row_filter`] for list actions. Ownership lookups go through
//! the [`OwnershipResolver`] seam so the engine itself holds no state.

pub mod caller;
pub mod engine;
pub mod filter;
pub mod policy;
pub mod store;

pub use caller::{Action, Caller, ResourceKind};
pub use engine::{
    Authorizer, Decision, Owner, OwnershipResolver, Parent, Target, check_fields, row_filter,
};
pub use filter::RowFilter;
pub use store::{StoreOwnership, linked_gym};
