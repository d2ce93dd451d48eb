pub mod client;

pub use client::FirebaseRestStore;
