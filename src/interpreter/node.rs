/// The node arena and the node kinds.
///
/// Declares [`core::Tree`], the owner of every node, along with
/// [`core::NodeKind`] (the closed set of value and token kinds with their
/// payloads) and [`core::Position`].
pub mod core;

/// RGBA colors: named colors, hexadecimal parsing, HSL conversions and the
/// shortest CSS serialization.
pub mod color;

/// Conversion of nodes back to CSS text.
pub mod display;

/// `U+` unicode ranges.
pub mod unicode_range;
