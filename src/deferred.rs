use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// FIFO of side effects raised while shared state is borrowed. They run
/// from [`Deferred::flush`] once the caller has released its borrows.
pub struct Deferred<T> {
    queue: Rc<RefCell<VecDeque<T>>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
        }
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }
}

impl<T> Deferred<T> {
    pub fn push(&self, item: T) {
        self.queue.borrow_mut().push_back(item);
    }

    /// Run `f` on every queued item in order, including items `f` itself
    /// queues. The queue is not borrowed while `f` runs.
    pub fn flush(&self, mut f: impl FnMut(T)) -> usize {
        let mut ran = 0;
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(item) => {
                    f(item);
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}
