//! Test fixtures shared by the app crate's unit tests.

mod helpers;

pub(crate) use helpers::*;
