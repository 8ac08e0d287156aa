use crate::host::MappedRow;

use std::rc::{Rc, Weak};

/// One registered back-reference: the owning row and the attribute key the
/// value is stored under.
///
/// The row side is weak, so a back-reference never keeps the owning row
/// alive and removing it never destroys the value.
#[derive(Clone)]
pub(crate) struct Owner {
    row: Weak<dyn MappedRow>,
    key: Rc<str>,
}

impl Owner {
    fn is(&self, row: &Rc<dyn MappedRow>, key: &str) -> bool {
        *self.key == *key
            && self
                .row
                .upgrade()
                .is_some_and(|live| same_row(&live, row))
    }

    /// Flags the owner's attribute as modified. Returns false if the owner
    /// row is already gone.
    fn notify(&self) -> bool {
        match self.row.upgrade() {
            Some(row) => {
                log::trace!("flagging attribute '{}' as modified", self.key);
                row.flag_modified(&self.key);
                true
            }
            None => false,
        }
    }
}

/// The owner back-references registered on one wrapped container.
#[derive(Default, Clone)]
pub(crate) struct OwnerSet {
    owners: Vec<Owner>,
}

impl OwnerSet {
    pub(crate) fn attach(&mut self, row: &Rc<dyn MappedRow>, key: &Rc<str>) {
        if self.owners.iter().any(|owner| owner.is(row, key)) {
            return;
        }
        self.owners.push(Owner {
            row: Rc::downgrade(row),
            key: key.clone(),
        });
    }

    /// Detaching an owner that was never registered is defined behavior, not
    /// a failure.
    pub(crate) fn detach(&mut self, row: &Rc<dyn MappedRow>, key: &str) {
        self.owners.retain(|owner| !owner.is(row, key));
    }

    /// Copies entries from `other`, skipping ones already present.
    pub(crate) fn merge(&mut self, other: &OwnerSet) {
        for owner in &other.owners {
            let present = self.owners.iter().any(|mine| {
                mine.key == owner.key && Weak::ptr_eq(&mine.row, &owner.row)
            });
            if !present {
                self.owners.push(owner.clone());
            }
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<Owner> {
        self.owners.clone()
    }

    pub(crate) fn prune(&mut self) {
        self.owners.retain(|owner| owner.row.strong_count() > 0);
    }
}

/// Notifies every owner in the snapshot. Returns true when a dead owner was
/// seen, so the caller can prune its set.
pub(crate) fn notify_snapshot(owners: &[Owner]) -> bool {
    let mut dead = false;
    for owner in owners {
        if !owner.notify() {
            dead = true;
        }
    }
    dead
}

fn same_row(a: &Rc<dyn MappedRow>, b: &Rc<dyn MappedRow>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const u8, Rc::as_ptr(b) as *const u8)
}
