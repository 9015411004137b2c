//! # Description
//!
//! Bridge Kit is a Rust crate that turns a stream of A2UI (Agent-to-UI)
//! protocol messages produced by an LLM or any other generator into live,
//! queryable UI surfaces, and routes user actions back to the producer.
//!
//! # Features
//!
//! - Incremental surface state: components are upserted by id, data is merged by path.
//! - Immutable `Arc` snapshots that stay valid while new messages are applied.
//! - Typed views of the standard component catalog, with an opaque fallback for everything else.
//! - SSE, JSONL and JSON stream framing, plus opt-in repair of truncated LLM output.
//!
//! Rendering is left to the host application: it reads a
//! [`SurfaceSnapshot`](a2ui::SurfaceSnapshot) and calls back through
//! [`ActionDispatcher`](a2ui::ActionDispatcher).

pub mod a2ui;
