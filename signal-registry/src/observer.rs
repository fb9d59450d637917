//! Observer capability
//!
//! An observer is anything that can receive an event of type `E`,
//! optionally with a payload of type `P`. Subjects only ever hold observers
//! weakly; whoever owns the `Arc` decides how long an observer lives.

use std::sync::Weak;

use crate::id::Identified;

/// Receiver of typed event notifications
///
/// `P = ()` is the payload-less form. Subjects release their lock before
/// calling `update`, so an implementation may attach to, detach from or
/// notify the subject that is notifying it.
///
/// # Example
///
/// ```rust
/// use signal_registry::{Id, Identified, Observer};
///
/// enum Sensor { Triggered }
///
/// struct Led { id: Id }
///
/// impl Identified for Led {
///     fn id(&self) -> Id { self.id }
/// }
///
/// impl Observer<Sensor> for Led {
///     fn update(&self, event: &Sensor, _payload: &()) {
///         match event {
///             Sensor::Triggered => { /* blink */ }
///         }
///     }
/// }
/// ```
pub trait Observer<E, P = ()>: Identified + Send + Sync {
    fn update(&self, event: &E, payload: &P);
}

/// Non-owning handle to an observer as stored by subjects
pub type WeakObserver<E, P = ()> = Weak<dyn Observer<E, P>>;
