// src/integrations/mod.rs
//
// External Integrations Module
//
// Concrete RemoteStore backends.

pub mod firebase;

pub use firebase::client::FirebaseRestStore;
