// ============================================================================
// Order Domain - Read-side Aggregation for Orders
// ============================================================================
//
// - Value objects (OrderStatus)
// - Aggregator (flat join rows → nested OrderWithDetails)
//
// ============================================================================

pub mod value_objects;
pub mod aggregator;

pub use value_objects::*;
pub use aggregator::*;
