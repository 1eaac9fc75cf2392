//! The logic adapter contract ([`LogicAdapter`]) and an in-tree backend
//! ([`interp::Interpreter`]) implementing it: a clause database, SLD
//! resolution with a local cut, and occurs-checked unification built on
//! `ena`'s union-find table. Narrow by design — no `findall`, arithmetic,
//! or I/O — scoped to the fixed clause templates the constraint inventory
//! renders.

mod adapter;
mod clause_parser;
mod database;
mod interp;
mod runtime;
mod solve;

pub use adapter::LogicAdapter;
pub use interp::Interpreter;
