// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal each (training or evaluating a miner).
//
// Rules for this layer:
//   - No tensor code here (that's Layer 5)
//   - No argument parsing here (that's Layer 1)
//   - Only workflow coordination and configuration
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// The evaluation workflow
pub mod eval_use_case;
