// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime precondition and validation errors.

use thiserror::Error;

/// Errors returned to callers of the scene runtime's public surface.
/// State is unchanged when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("no active game")]
    NoActiveGame,
    #[error("unknown scene: {0}")]
    UnknownScene(String),
    #[error("unknown node: {0}")]
    UnknownNode(String),
    #[error("node already terminal: {0}")]
    NodeAlreadyTerminal(String),
    #[error("scene graph has no scenes")]
    EmptyGraph,
}
