use crate::{Event, EventEnvelope};

/// Consumes a published event and performs the follow-up it implies.
///
/// Handlers turn a cross-aggregate consistency rule into an explicit step: the
/// ledger that owns a write emits the event, and the handler owning the other
/// aggregate decides what (if anything) to do about it. This keeps the rule
/// visible instead of burying a direct call inside the writer.
///
/// Handlers must tolerate events they do not care about by returning `Ok(())`.
pub trait EventHandler<E: Event> {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn handle(&self, envelope: &EventEnvelope<E>) -> Result<(), Self::Error>;
}
