// ============================================================================
// Domain Layer - Retrieval and Shaping Logic
// ============================================================================
//
// Each area has its own subdirectory. Nothing here talks SQL; all data
// access goes through the `Store` trait.
//
// ============================================================================

pub mod order;
pub mod customer;
