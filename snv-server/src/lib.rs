//! SNV route resolution server.
//!
//! A web service that answers: "which segment of the Brazilian federal road
//! inventory (SNV) is this coordinate on?", by querying DNIT's APIGEO
//! geolocation service and reconciling its route and segment data.

pub mod apigeo;
pub mod cache;
pub mod domain;
pub mod proximity;
pub mod resolver;
pub mod retry;
pub mod web;
