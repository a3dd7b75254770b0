//! Observability for emrel.
//! `tracing` crate with `EnvFilter`, per-crate log levels.
//!
//! Stable structured fields:
//!
//! | Field | Emitted by | Meaning |
//! |---|---|---|
//! | `iteration` | driver | 1-based window number |
//! | `elapsed_ms` | driver | cumulative simulated time |
//! | `min_reliability` | driver | minimum reliability of the window |
//! | `checkpoint_bytes` | driver | size of the new checkpoint |
//! | `engine_wall_time_ms` | process engine | wall-clock time of one invocation |

pub mod setup;

pub use setup::init_tracing;
