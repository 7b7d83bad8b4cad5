/// Numeric conversion and formatting helpers.
///
/// This module provides safe functions for converting between integer and
/// floating-point types, and the routine used to print decimal numbers in
/// CSS output (fixed precision, no trailing zeroes, optional leading zero).
pub mod num;
