//! Level solver.
//!
//! Breadth-first search over every reachable `(BlockState, SwitchState)` pair,
//! driven by the same per-move pipeline the session plays with. Used to prove
//! levels solvable within their move budget and to suggest the next move.

pub mod solve;

pub use solve::{hint, solve, solve_from, Solution};
