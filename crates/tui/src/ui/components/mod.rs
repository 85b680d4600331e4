//! UI components: wizard body, breadcrumb header, activity panel.

pub mod activity;
pub mod breadcrumb;
pub mod component;
pub mod wizard;

pub use activity::ActivityComponent;
pub use breadcrumb::BreadcrumbComponent;
pub use component::*;
pub use wizard::WizardComponent;
