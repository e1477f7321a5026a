//! Page Turn Core (engine-agnostic)
//!
//! Procedural page-turn animation for a book built from skinned page meshes. Each
//! page carries a linear chain of bones; every frame the engine solves a target
//! rotation per bone from the book state and damps the current pose toward it.
//! A timer-driven flip scheduler walks the visible page toward the requested one
//! so that jumping across many pages reads as a flip-through.
//!
//! Hosts (Bevy, wasm) own the render loop and call [`BookEngine::update`] once per
//! frame; outputs are plain rotation arrays plus flip events.

pub mod assembler;
pub mod config;
pub mod curvature;
pub mod damping;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod inputs;
pub mod outputs;
pub mod page;
pub mod resources;
pub mod scheduler;
pub mod skeleton;

// Re-exports for consumers (adapters)
pub use assembler::{assemble, is_book_closed, layout_pages, page_state, PageState};
pub use config::{Config, CurveTuning, DampingConfig, FlipTiming, PageDimensions, TextureFallbacks};
pub use curvature::{turning_progress, CurveSolver, PageContext};
pub use damping::{damp, damp_angle, damping_alpha, wrap_angle};
pub use engine::BookEngine;
pub use error::{PageTurnError, Result};
pub use geometry::{skin_binding, FaceGroup, MaterialSlotKind, PageGeometry, SkinBinding};
pub use ids::{IdAllocator, StepToken};
pub use inputs::{parse_page_list_json, BookCommand, Inputs, PageSpec};
pub use outputs::{BookEvent, Outputs, PagePose};
pub use page::PageRig;
pub use resources::{
    MaterialBinding, PageMaterials, PassthroughResolver, ResourceCache, TextureRef,
    TextureResolver,
};
pub use scheduler::{FlipEvent, FlipPhase, FlipScheduler, ScheduledStep};
pub use skeleton::{Bone, Skeleton};
