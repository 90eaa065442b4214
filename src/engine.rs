//=========================================================================
// Engine
//
// Application facade: configuration and the frame loop.
//
// Architecture:
// ```text
//     AppBuilder  ──build()──>  App  ──run()──>  startup → frames → shutdown
//         │                      │
//         ├─ with_*()            ├─ owns Platform + AppContext + Game
//         └─ with_platform()     └─ returns once quit is requested
// ```
//
//=========================================================================

//=== Module Declarations =================================================

mod app;
mod builder;

//=== Public API ==========================================================

pub use app::{App, LoopState};
pub use builder::{AppBuilder, AppConfig, TimeSource};
