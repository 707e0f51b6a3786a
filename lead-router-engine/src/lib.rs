//! Matching and distribution engine
//!
//! Given the active rule list and an incoming lead, the matcher finds the
//! highest-priority rule whose conditions all hold; the distributor then
//! selects an agent according to that rule's strategy.

pub mod distributor;
pub mod matcher;
pub mod router;

pub use distributor::Distributor;
pub use router::LeadRouter;
