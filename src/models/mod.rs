//! Procore API model types.

mod company;
mod direct_cost;
mod identifier;
mod project;

pub use company::*;
pub use direct_cost::*;
pub use identifier::*;
pub use project::*;
