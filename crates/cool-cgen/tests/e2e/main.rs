//! End-to-end tests for the code generator
//!
//! These tests generate assembly for small annotated programs and execute
//! it on the harness machine, checking what the programs print or return.


mod arithmetic;
mod classes;
mod control_flow;
