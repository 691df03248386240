//! Deterministic yearly cash-flow projection
//!
//! Turns one realization of the macro-variable paths into the net cash-flow
//! sequence of a single project, with or without debt service.

mod cashflows;

pub use cashflows::{equity_cash_flows, financed_cash_flows};
