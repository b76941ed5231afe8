//! Fuel route planner server.
//!
//! A web application that answers: "I'm driving from here to there,
//! where should I buy fuel so the trip costs the least?"

pub mod cache;
pub mod domain;
pub mod geocode;
pub mod osrm;
pub mod planner;
pub mod provider;
pub mod route;
pub mod stations;
pub mod web;
