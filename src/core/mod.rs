//! Core module - page state, wizard container, value snapshots and configuration

pub mod config;
pub mod form_page;
pub mod page;
pub mod values;
pub mod wizard;

pub use config::Config;
pub use form_page::FormPage;
pub use page::{PageHandle, PageState, WizardNavigator};
pub use values::{resolve_value, NoValues, SnapshotError, ValueSnapshot};
pub use wizard::Wizard;
