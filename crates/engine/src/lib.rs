//! # Pipegate Engine
//!
//! The navigation core of the pipegate wizard. It owns every decision about
//! which screen is shown, which values have been chosen, and which
//! collaborator call is in flight, and it performs no I/O of its own.
//!
//! ## Usage
//!
//! ```rust
//! use pipegate_engine::{Catalog, Choice, LocatorOptions, ScreenId, Wizard};
//!
//! let wizard = Wizard::new(LocatorOptions {
//!     profiles: vec!["default".into()],
//!     regions: vec!["us-east-1".into()],
//! });
//! let aws = Catalog::global().provider("aws").expect("builtin provider");
//! let next = wizard.advance(Choice::Provider(aws))?.wizard;
//! assert_eq!(next.screen(), ScreenId::ChooseLocator);
//! assert_eq!(next.retreat().screen(), ScreenId::ChooseProvider);
//! # Ok::<(), pipegate_engine::PreconditionError>(())
//! ```
//!
//! ## Architecture
//!
//! - **`catalog`**: the static provider / service / category / operation tree
//! - **`selection`**: the ordered selection path and its entries
//! - **`navigator`**: the [`Wizard`] state machine
//! - **`task`**: requests and completions exchanged with the runtime
//! - **`presentation`**: table columns and rows for list screens

pub mod catalog;
pub mod error;
pub mod input;
pub mod navigator;
pub mod presentation;
pub mod screen;
pub mod selection;
pub mod task;

pub use catalog::{Catalog, CategorySpec, OperationKind, OperationSpec, ProviderSpec, ServiceSpec};
pub use error::{PreconditionError, ValidationError};
pub use input::{InputMode, TextBuffer};
pub use navigator::{Choice, Failure, LocatorOptions, Transition, Wizard};
pub use presentation::{ColumnSpec, MANUAL_ENTRY_LABEL, RowPick};
pub use screen::{LocatorStep, ScreenId};
pub use selection::{ActionKind, Depth, Fetched, PathEntry, SelectionPath, TargetItem};
pub use task::{PendingTask, StartedTask, TaskCompletion, TaskOutcome, TaskPayload, TaskRequest, TaskTicket};
