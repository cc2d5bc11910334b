// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Workflow coordination only: no tensor code, no printing.
// Each use case tells the data, ml and infra layers what to do
// in which order.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow, ending with one sample grid
pub mod train_use_case;

// Standalone sampling from a saved checkpoint
pub mod sample_use_case;
