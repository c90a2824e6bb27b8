//! Lock-guarded struct properties with **generated get/set accessors**.
//!
//! Write a struct inside [`atomic!`] and mark properties with `#[atomic]`.
//! Each marked property is stored in its own [`Lock`] and reached only
//! through generated accessors, so every read and write is serialized per
//! property.
//!
//! # Quick Start
//!
//! ```rust
//! use atomic_property::atomic;
//!
//! atomic! {
//!     pub struct Counter {
//!         #[atomic]
//!         pub let mut number: i32;
//!
//!         #[atomic]
//!         pub let mut limit: i32 = 100;
//!     }
//! }
//!
//! let counter = Counter::new(1);
//! counter.set_number(counter.number() + 1);
//! assert_eq!(counter.number(), 2);
//! assert_eq!(counter.limit(), 100);
//! ```
//!
//! # Declarations
//!
//! The struct body holds declarations, not fields:
//!
//! - `vis let mut name: Type;` or `vis let mut name: Type = expr;`. With
//!   `#[atomic]` the property becomes lock-guarded. Without it the property
//!   is an ordinary field.
//! - `fn` items, copied into the struct's inherent impl block.
//!
//! Properties without an initializer become parameters of the generated
//! `new`, in declaration order. A struct literal initializer must be wrapped
//! in parentheses.
//!
//! A hand-written `fn new` in the body replaces the generated one. The
//! memberwise constructor is then emitted privately as `memberwise`, and the
//! hand-written `new` may call it or build the struct itself, going through
//! `Self::init_<name>` for each `#[atomic]` property without an initializer.
//!
//! Doc comments on an `#[atomic]` property document its getter. Lint
//! attributes (`allow`, `warn`, `deny`, `forbid`, `expect`) apply to its
//! getter and setter. Any other attribute is rejected.
//!
//! `#[atomic]` is rejected at compile time on anything but a `let mut`
//! property with a single identifier, an explicit type and no `{ .. }`
//! accessor block. A `let` without `mut` gets a suggestion to add it.
//!
//! # Options
//!
//! ```rust
//! use std::sync::Arc;
//! use atomic_property::atomic;
//!
//! atomic! {
//!     pub struct Document {
//!         #[atomic(copy_on_assign = true, unchecked = true)]
//!         pub let mut title: Arc<String> = Arc::new(String::from("untitled"));
//!     }
//! }
//!
//! let doc = Document::new();
//! let title = Arc::new(String::from("draft"));
//! doc.set_title(title.clone());
//! assert_eq!(*doc.title(), "draft");
//! assert!(!Arc::ptr_eq(&doc.title(), &title));
//! ```
//!
//! | Argument | Effect |
//! |----------|--------|
//! | `copy_on_assign = true` | Every write (setter, `new`, initializer) stores [`Copying::copy`] of the value. Reads never copy. |
//! | `unchecked = true` | Uses [`Lock::new_unchecked`] and [`Lock::with_lock_unchecked`] everywhere for this property. |
//!
//! Other arguments are ignored.
//!
//! # Generated API
//!
//! For `#[atomic] pub let mut number: T;` inside `struct Foo`:
//!
//! | Item | Purpose |
//! |------|---------|
//! | `_number: Lock<T>` | Private backing field |
//! | `pub fn number(&self) -> T` | Clone of the value, read under the lock (`T: Clone`) |
//! | `pub fn set_number(&self, new_value: T)` | Store under the lock |
//! | `fn init_number(initial_value: T) -> Lock<T>` | Builds the lock once, called from `Foo::new` (only without an initializer) |

mod copying;
mod lock;

pub use atomic_property_derive::atomic;
pub use copying::Copying;
pub use lock::Lock;
