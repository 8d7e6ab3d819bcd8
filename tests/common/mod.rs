mod fixtures;
mod http_stub;
pub use fixtures::*;
pub use http_stub::*;

// Re-export commonly used types from jobsite_kiosk for tests
pub use jobsite_kiosk::core::{
    auth::{
        AuthClient, Credentials, GateState, Session, SessionEvent, SessionGate, SessionHub,
        SessionSubscription, User,
    },
    db::{
        AccountRepository, LocalDb, NewAccount, Role, SeedAccount, SeedAssignment, SeedData,
        SeedProfile, SessionStore, Site, SiteRepository,
    },
    error::KioskError,
    plans::{Catalog, Folder, Plan},
};
