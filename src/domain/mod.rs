// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust types that describe what the system works with:
// image shapes, accelerator choice, and grayscale image grids.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Which hardware the training backend runs on
pub mod accelerator;

// Image shapes and grayscale image grids
pub mod image;

// Core abstractions (traits) that other layers implement
pub mod traits;
