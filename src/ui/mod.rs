//! UI module - reusable widgets used by the app panels

pub mod components;
