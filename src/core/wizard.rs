//! Wizard container - owns the page arena and answers navigation queries

use std::rc::{Rc, Weak};

use crate::core::form_page::FormPage;
use crate::core::page::{PageHandle, WizardNavigator};

/// An ordered set of pages, navigated front to back
#[derive(Debug)]
pub struct Wizard {
    title: String,
    pages: Vec<FormPage>,
}

impl Wizard {
    /// Build a wizard and wire every page to it
    ///
    /// Each page is attached through a weak handle and, except for the
    /// first, gets the page before it as its previous page.
    pub fn new(title: impl Into<String>, pages: Vec<FormPage>) -> Rc<Self> {
        let title = title.into();
        Rc::new_cyclic(|weak: &Weak<Wizard>| {
            let navigator: Weak<dyn WizardNavigator> = weak.clone();
            for (index, page) in pages.iter().enumerate() {
                page.attach_weak(navigator.clone());
                if index > 0 {
                    page.set_previous_page(PageHandle(index - 1));
                }
            }
            Wizard { title, pages }
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn pages(&self) -> &[FormPage] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, handle: PageHandle) -> Option<&FormPage> {
        self.pages.get(handle.index())
    }

    pub fn handle_of(&self, page_id: &str) -> Option<PageHandle> {
        self.pages
            .iter()
            .position(|p| p.id() == page_id)
            .map(PageHandle)
    }

    pub fn page_by_id(&self, page_id: &str) -> Option<&FormPage> {
        self.handle_of(page_id).and_then(|h| self.page(h))
    }

    pub fn first_page(&self) -> Option<&FormPage> {
        self.pages.first()
    }

    /// True once every page reports complete
    pub fn can_finish(&self) -> bool {
        self.pages.iter().all(|p| p.is_complete())
    }
}

impl WizardNavigator for Wizard {
    fn next_page(&self, page_id: &str) -> Option<PageHandle> {
        let next = self.handle_of(page_id)?.index() + 1;
        (next < self.pages.len()).then_some(PageHandle(next))
    }
}
