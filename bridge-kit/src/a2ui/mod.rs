//! A2UI Protocol Implementation
//!
//! A2UI (Agent-to-UI) is a declarative JSON protocol for AI agents to generate
//! rich, interactive UIs. This module implements the protocol processor that
//! sits between the agent's message stream and a renderer.
//!
//! # Architecture
//!
//! ```text
//! A2UI JSON Messages (SSE / JSONL / JSON)
//!        ↓
//!   stream framing
//!        ↓
//!     Processor ──────────────┐
//!        ↓                    │
//! ┌──────┴──────┐             │
//! │             │             │
//! DataModel  ComponentTable   │
//!    │             │          │
//!    └──────┬──────┘          │
//!           ↓                 │
//!   Arc<SurfaceSnapshot>      │
//!           ↓                 │
//!        Renderer ── click ── ActionDispatcher → UserAction
//! ```
//!
//! # Example
//!
//! ```rust
//! use bridge_kit::a2ui::*;
//!
//! let mut processor = Processor::with_standard_catalog();
//! processor.process_json(r#"[
//!     {"beginRendering": {"surfaceId": "main", "root": "title"}},
//!     {"surfaceUpdate": {"surfaceId": "main", "components": [
//!         {"id": "title", "component": {"Text": {"text": {"path": "greeting"}}}}
//!     ]}},
//!     {"dataModelUpdate": {"surfaceId": "main", "contents": [
//!         {"key": "greeting", "valueString": "Hello"}
//!     ]}}
//! ]"#).unwrap();
//!
//! let snapshot = processor.current_snapshot("main").unwrap();
//! let tree = snapshot.tree().unwrap();
//! if let ComponentKind::Text(text) = tree.kind() {
//!     assert_eq!(resolve_string(&text.text, snapshot.data_model()), Some("Hello"));
//! }
//! ```

mod action;
mod component;
mod data_model;
mod error;
mod host;
mod message;
mod processor;
mod registry;
mod repair;
mod stream;
mod surface;
mod value;

pub use action::*;
pub use component::*;
pub use data_model::*;
pub use error::*;
pub use host::*;
pub use message::*;
pub use processor::*;
pub use registry::*;
pub use repair::*;
pub use stream::*;
pub use surface::*;
pub use value::*;
