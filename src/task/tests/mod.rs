//! Unit tests for the task stack bounded context.
