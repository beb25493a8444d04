//! Page turning core for the flipbook.
//!
//! This crate provides the engine-independent half of the flipbook:
//! - Curve-based page deformation (cover and inner page profiles)
//! - Bounded, inertial damped scalars with gravity toward their bounds
//! - Drag gesture interpretation (page turn vs. viewpoint shift)
//! - Stack layout and a book controller driving everything from one tick
//!
//! # Architecture
//!
//! Nothing in here schedules itself. The host calls
//! [`BookController::tick`] once per frame with the frame `dt`; the
//! controller advances both damped scalars, assigns every leaf its turn
//! progress, lets the trailing lag catch up and re-deforms the meshes of
//! the leaves that moved. The host then uploads the rewritten
//! [`SlabMesh`] buffers to its renderer.
//!
//! ## Key Components
//!
//! - **Damped**: [`DampedScalar`], the value every gesture drives
//! - **Gesture**: [`GestureSession`], drag samples → scalar nudges
//! - **Curve model**: [`build_curve`], page state → Bézier profile
//! - **Deformer**: [`PageDeformer`], profile → vertex positions
//! - **Slab**: [`SlabMesh`], the box-topology mesh the deformer writes into

pub mod book;
pub mod curve;
pub mod curve_model;
pub mod damped;
pub mod deformer;
pub mod error;
pub mod gesture;
pub mod layout;
pub mod math;
pub mod page;
pub mod slab;
pub mod types;

pub use book::{BookController, BookSpec, TickReport};
pub use curve::{Curve2, PageCurve};
pub use curve_model::{CurveState, build_curve};
pub use damped::DampedScalar;
pub use deformer::{FaceRect, PageDeformer, PageFace};
pub use error::TurningError;
pub use gesture::{ActiveGesture, DragSample, GestureSession};
pub use page::{Page, PageGeometry};
pub use slab::{SlabBounds, SlabMesh, SlabSegments, VertexBuffer};
pub use types::{
    CurveTuning, DampedTuning, GestureTuning, LagTuning, LayoutMode, PageKind, ScalarEvent,
    TurningConfig,
};
