//! Page state machine - completion flag and navigation links
//!
//! A page is `Incomplete` or `Complete`, and either unattached or attached to
//! a wizard. Links to the wizard and to the previous page are handles, never
//! owning pointers, so the wizard can own its pages without reference cycles.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Index of a page inside its wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageHandle(pub usize);

impl PageHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The container contract a page navigates through
pub trait WizardNavigator {
    /// The page that follows `page_id`, if any. Must not have side effects.
    fn next_page(&self, page_id: &str) -> Option<PageHandle>;
}

/// Completion and navigation state of one wizard page
pub struct PageState {
    id: String,
    name: String,
    description: String,
    complete: Cell<bool>,
    previous_page: Cell<Option<PageHandle>>,
    wizard: RefCell<Option<Weak<dyn WizardNavigator>>>,
}

impl PageState {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            complete: Cell::new(false),
            previous_page: Cell::new(None),
            wizard: RefCell::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Attach the page to a wizard (last write wins)
    pub fn attach_to_container(&self, wizard: &Rc<dyn WizardNavigator>) {
        self.attach_weak(Rc::downgrade(wizard));
    }

    /// Attach through an existing weak handle, e.g. while the wizard is being built
    pub fn attach_weak(&self, wizard: Weak<dyn WizardNavigator>) {
        *self.wizard.borrow_mut() = Some(wizard);
    }

    /// Whether the page is attached to a wizard that is still alive
    pub fn is_attached(&self) -> bool {
        self.wizard
            .borrow()
            .as_ref()
            .is_some_and(|w| w.strong_count() > 0)
    }

    pub fn set_previous_page(&self, page: PageHandle) {
        self.previous_page.set(Some(page));
    }

    pub fn previous_page(&self) -> Option<PageHandle> {
        self.previous_page.get()
    }

    pub fn set_complete(&self, complete: bool) {
        self.complete.set(complete);
    }

    pub fn is_complete(&self) -> bool {
        self.complete.get()
    }

    /// The page after this one, as reported by the wizard
    ///
    /// Absent when the page is unattached or its wizard has been dropped.
    pub fn next_page(&self) -> Option<PageHandle> {
        let wizard = self.wizard.borrow().as_ref().and_then(Weak::upgrade)?;
        wizard.next_page(&self.id)
    }

    /// Complete and followed by another page
    pub fn can_advance(&self) -> bool {
        self.is_complete() && self.next_page().is_some()
    }
}

impl fmt::Debug for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageState")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("complete", &self.complete.get())
            .field("previous_page", &self.previous_page.get())
            .field("attached", &self.is_attached())
            .finish()
    }
}
