pub mod auth;
pub mod backend;
pub mod db;
pub mod drawer;
pub mod error;
pub mod geometry;
pub mod nav;
pub mod plans;
pub mod remote;
pub mod search;
pub mod sites;
