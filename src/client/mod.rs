//! Typed client for the dishwise API: session handling, a cached dish
//! catalog, preference tag lists and a virtual page the controller renders
//! into.

pub mod api;
pub mod catalog;
pub mod controller;
pub mod error;
pub mod notify;
pub mod page;
pub mod render;
pub mod session;
pub mod tags;
