//! Grammar productions, split by area.
//!
//! `members` covers everything declaration-shaped (namespaces through
//! features and their clauses); `expressions` is the precedence-climbing
//! expression parser.

mod expressions;
mod members;
