//! Connection slots.
//!
//! A fixed arena of `N` slots. Free slots are kept on a free-list,
//! ordered so that the lowest free index is handed out first.

use crate::error::Error;

/// Protocol state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// awaiting a handshake, or free
    Closed,
    /// handshake complete
    Open,
}

/// How a ready handle was routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// the handle already owns this slot
    Existing(usize),
    /// the handle was just bound to this free slot
    New(usize),
}

impl Binding {
    #[inline]
    pub const fn slot(self) -> usize {
        match self {
            Binding::Existing(i) | Binding::New(i) => i,
        }
    }
}

#[derive(Debug)]
struct Slot<H> {
    state: State,
    handle: Option<H>,
}

/// Fixed capacity slot table.
#[derive(Debug)]
pub struct SlotTable<H, const N: usize> {
    slots: [Slot<H>; N],
    // free indexes, descending, the smallest at the tail
    free: [usize; N],
    free_len: usize,
}

impl<H: Clone + PartialEq, const N: usize> SlotTable<H, N> {
    /// All slots closed and free.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| Slot {
                state: State::Closed,
                handle: None,
            }),
            free: std::array::from_fn(|i| N - 1 - i),
            free_len: N,
        }
    }

    #[inline]
    pub const fn capacity(&self) -> usize { N }

    #[inline]
    pub const fn free_count(&self) -> usize { self.free_len }

    /// Find the slot bound to `handle`, or bind it to the lowest free slot.
    ///
    /// If every slot is taken nothing changes and
    /// [`Error::CapacityExhausted`] is returned.
    pub fn match_or_allocate(&mut self, handle: &H) -> Result<Binding, Error> {
        if let Some(i) = self.find(handle) {
            return Ok(Binding::Existing(i));
        }

        if self.free_len == 0 {
            return Err(Error::CapacityExhausted);
        }

        self.free_len -= 1;
        let i = self.free[self.free_len];
        let slot = &mut self.slots[i];
        debug_assert!(slot.handle.is_none());
        slot.state = State::Closed;
        slot.handle = Some(handle.clone());
        Ok(Binding::New(i))
    }

    /// Slot index bound to `handle`.
    #[inline]
    pub fn find(&self, handle: &H) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.handle.as_ref() == Some(handle))
    }

    /// Set the state of a slot.
    ///
    /// Moving to [`State::Closed`] unbinds the handle, which is returned,
    /// and puts the slot back on the free-list.
    pub fn transition(&mut self, slot: usize, state: State) -> Option<H> {
        match state {
            State::Open => {
                if let Some(s) = self.slots.get_mut(slot) {
                    s.state = State::Open;
                }
                None
            }
            State::Closed => self.release(slot),
        }
    }

    fn release(&mut self, slot: usize) -> Option<H> {
        let s = self.slots.get_mut(slot)?;
        s.state = State::Closed;
        let handle = s.handle.take()?;

        // keep descending order
        let pos = self.free[..self.free_len]
            .iter()
            .position(|&i| i < slot)
            .unwrap_or(self.free_len);
        self.free.copy_within(pos..self.free_len, pos + 1);
        self.free[pos] = slot;
        self.free_len += 1;

        Some(handle)
    }

    #[inline]
    pub fn state(&self, slot: usize) -> Option<State> { self.slots.get(slot).map(|s| s.state) }

    #[inline]
    pub fn handle(&self, slot: usize) -> Option<&H> { self.slots.get(slot)?.handle.as_ref() }

    /// Indexes of open slots, ascending.
    pub fn open_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.state == State::Open)
            .map(|(i, _)| i)
    }
}

impl<H: Clone + PartialEq, const N: usize> Default for SlotTable<H, N> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn allocate_lowest_first() {
        let mut table = SlotTable::<u32, 3>::new();
        assert_eq!(table.match_or_allocate(&10).unwrap(), Binding::New(0));
        assert_eq!(table.match_or_allocate(&11).unwrap(), Binding::New(1));
        assert_eq!(table.match_or_allocate(&10).unwrap(), Binding::Existing(0));
        assert_eq!(table.match_or_allocate(&12).unwrap(), Binding::New(2));
        assert_eq!(table.free_count(), 0);

        assert!(matches!(
            table.match_or_allocate(&13),
            Err(Error::CapacityExhausted)
        ));
        assert_eq!(table.find(&13), None);

        // free 2 then 0, 0 comes back first
        assert_eq!(table.transition(2, State::Closed), Some(12));
        assert_eq!(table.transition(0, State::Closed), Some(10));
        assert_eq!(table.free_count(), 2);
        assert_eq!(table.match_or_allocate(&14).unwrap(), Binding::New(0));
        assert_eq!(table.match_or_allocate(&15).unwrap(), Binding::New(2));
    }

    #[test]
    fn open_and_close() {
        let mut table = SlotTable::<&str, 2>::new();
        let slot = table.match_or_allocate(&"a").unwrap().slot();
        assert_eq!(table.state(slot), Some(State::Closed));

        assert_eq!(table.transition(slot, State::Open), None);
        assert_eq!(table.state(slot), Some(State::Open));
        assert_eq!(table.handle(slot), Some(&"a"));
        assert_eq!(table.open_slots().collect::<Vec<_>>(), vec![slot]);

        assert_eq!(table.transition(slot, State::Closed), Some("a"));
        assert_eq!(table.state(slot), Some(State::Closed));
        assert_eq!(table.handle(slot), None);
        assert_eq!(table.find(&"a"), None);

        // closing twice does not grow the free-list
        assert_eq!(table.transition(slot, State::Closed), None);
        assert_eq!(table.free_count(), 2);
        assert_eq!(table.state(7), None);
    }
}
