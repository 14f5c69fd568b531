/// Behavioral event schema shared across Atelier services
///
/// Storefront instrumentation (client- and server-side) writes
/// `InteractionEvent` records; the intelligence service reads them back.
/// Payloads are open, type-dependent attribute maps; typed access goes
/// through [`EventData`] so consumers never fail on a missing field.
pub mod event;
pub mod payload;

pub use event::{EventType, InteractionEvent};
pub use payload::{EventData, PurchaseItem};
