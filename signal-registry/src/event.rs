//! Extending an application event enum with base events
//!
//! Library components raise their own small event sets (for example a
//! mailbox announcing a new message). [`Extended`] lets an application use
//! its own enum for everything else without having to declare those base
//! variants itself.
//!
//! ```rust
//! use signal_registry::Extended;
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Fruit { Orange, Mango }
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum NewFruit { Apple }
//!
//! type MyFruit = Extended<NewFruit, Fruit>;
//!
//! let a = MyFruit::from_own(NewFruit::Apple);
//! let b: MyFruit = Fruit::Mango.into();
//! assert_eq!(a.own(), Some(&NewFruit::Apple));
//! assert_eq!(b.base(), Some(&Fruit::Mango));
//! ```

/// Either an application event or an inherited base event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extended<E, B> {
    Own(E),
    Base(B),
}

impl<E, B> Extended<E, B> {
    pub fn own(&self) -> Option<&E> {
        match self {
            Extended::Own(event) => Some(event),
            Extended::Base(_) => None,
        }
    }

    pub fn base(&self) -> Option<&B> {
        match self {
            Extended::Base(event) => Some(event),
            Extended::Own(_) => None,
        }
    }

    pub fn is_base(&self) -> bool {
        matches!(self, Extended::Base(_))
    }
}

// Only the base direction gets `From`: a second blanket impl for `E` would
// overlap with this one whenever `E == B`.
impl<E, B> From<B> for Extended<E, B> {
    fn from(event: B) -> Self {
        Extended::Base(event)
    }
}

impl<E, B> Extended<E, B> {
    /// Wrap an application event
    pub fn from_own(event: E) -> Self {
        Extended::Own(event)
    }
}
