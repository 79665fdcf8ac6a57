//! Boundary adapters for the order submitter: CSV in, CSV out.

pub mod csv;
