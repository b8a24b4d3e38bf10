//! Array-backed binary max-heap of tasks.
//!
//! Tasks are stored densely in a `Vec` using the implicit tree layout
//! `parent(i) = (i-1)/2`, `left(i) = 2i+1`, `right(i) = 2i+2`.
//!
//! # Invariant
//! For every non-root index `i`, `tasks[parent(i)].priority >= tasks[i].priority`.
//!
//! # Complexity
//! `insert` and `extract_max` are O(log n); `peek`, `size` are O(1).
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 6 (Heapsort, Priority Queues)

use crate::error::{SchedError, SchedResult};
use crate::models::Task;

/// Default capacity of a bounded queue.
pub const MAX_TASKS: usize = 20;

#[inline]
fn left(i: usize) -> usize {
    2 * i + 1
}

#[inline]
fn right(i: usize) -> usize {
    2 * i + 2
}

#[inline]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}

/// Priority queue of tasks, highest priority first.
///
/// Either bounded (inserting past `capacity` fails with
/// `CapacityExceeded`) or growable when created with [`TaskQueue::unbounded`].
/// Order among equal priorities is unspecified.
///
/// # Example
/// ```
/// use u_simsched::models::Task;
/// use u_simsched::queue::TaskQueue;
///
/// let mut queue = TaskQueue::with_capacity(4);
/// queue.insert(Task::new("A", 5, 3).unwrap()).unwrap();
/// queue.insert(Task::new("B", 9, 2).unwrap()).unwrap();
/// assert_eq!(queue.extract_max().unwrap().name, "B");
/// ```
#[derive(Debug, Clone)]
pub struct TaskQueue {
    tasks: Vec<Task>,
    capacity: Option<usize>,
}

impl TaskQueue {
    /// Creates an empty queue bounded at [`MAX_TASKS`].
    pub fn new() -> Self {
        Self::with_capacity(MAX_TASKS)
    }

    /// Creates an empty queue holding at most `capacity` tasks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tasks: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// Creates an empty queue that grows as needed.
    pub fn unbounded() -> Self {
        Self {
            tasks: Vec::new(),
            capacity: None,
        }
    }

    /// Creates a queue from an optional capacity (`None` = unbounded).
    pub fn from_capacity(capacity: Option<usize>) -> Self {
        match capacity {
            Some(c) => Self::with_capacity(c),
            None => Self::unbounded(),
        }
    }

    /// Bulk-loads tasks by repeated insertion.
    ///
    /// Stops at the first task that does not fit.
    pub fn from_tasks(
        tasks: impl IntoIterator<Item = Task>,
        capacity: Option<usize>,
    ) -> SchedResult<Self> {
        let mut queue = Self::from_capacity(capacity);
        for task in tasks {
            queue.insert(task)?;
        }
        Ok(queue)
    }

    /// Inserts a task and sifts it up to its position.
    ///
    /// # Errors
    /// `CapacityExceeded` if the queue is bounded and full. The task is
    /// handed back inside the error.
    pub fn insert(&mut self, task: Task) -> SchedResult<()> {
        if let Some(capacity) = self.capacity {
            if self.tasks.len() >= capacity {
                return Err(SchedError::CapacityExceeded {
                    capacity,
                    task: Box::new(task),
                });
            }
        }

        self.tasks.push(task);
        self.sift_up(self.tasks.len() - 1);
        Ok(())
    }

    /// Removes and returns the highest-priority task.
    ///
    /// # Errors
    /// `EmptyQueue` if there is nothing to extract.
    pub fn extract_max(&mut self) -> SchedResult<Task> {
        if self.tasks.is_empty() {
            return Err(SchedError::EmptyQueue);
        }
        // Move the last leaf to the root, then repair downward
        let max = self.tasks.swap_remove(0);
        self.sift_down(0);
        Ok(max)
    }

    /// The highest-priority task, without removing it.
    pub fn peek(&self) -> Option<&Task> {
        self.tasks.first()
    }

    /// Whether the queue holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks in the queue.
    pub fn size(&self) -> usize {
        self.tasks.len()
    }

    /// Maximum number of tasks, `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Whether a bounded queue has reached its capacity.
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|c| self.tasks.len() >= c)
    }

    /// Tasks in heap (array) order.
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    /// Checks the max-heap invariant over every parent/child pair.
    pub fn is_heap(&self) -> bool {
        (1..self.tasks.len()).all(|i| self.tasks[parent(i)].priority >= self.tasks[i].priority)
    }

    /// Priorities grouped by tree level, root first.
    ///
    /// Level `z` holds indices `2^z - 1 .. 2^(z+1) - 1`.
    pub fn levels(&self) -> Vec<Vec<i32>> {
        let mut levels = Vec::new();
        let mut start = 0;
        let mut width = 1;
        while start < self.tasks.len() {
            let end = (start + width).min(self.tasks.len());
            levels.push(self.tasks[start..end].iter().map(|t| t.priority).collect());
            start += width;
            width *= 2;
        }
        levels
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 && self.tasks[i].priority > self.tasks[parent(i)].priority {
            self.tasks.swap(i, parent(i));
            i = parent(i);
        }
    }

    /// Restores the invariant below `i`, assuming both subtrees are heaps.
    ///
    /// Ties keep the node in place. Returns the number of swaps performed.
    pub(crate) fn sift_down(&mut self, mut i: usize) -> usize {
        let len = self.tasks.len();
        let mut swaps = 0;
        loop {
            let (l, r) = (left(i), right(i));
            let mut largest = i;
            if l < len && self.tasks[l].priority > self.tasks[largest].priority {
                largest = l;
            }
            if r < len && self.tasks[r].priority > self.tasks[largest].priority {
                largest = r;
            }
            if largest == i {
                return swaps;
            }
            self.tasks.swap(i, largest);
            swaps += 1;
            i = largest;
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
