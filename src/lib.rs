//! Workspace-level integration tests for zmat live under `tests/`.
