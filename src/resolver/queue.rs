use std::cmp::Ordering;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::config::FailurePolicy;
use crate::error::ResolveError;
use crate::resolver::Resolvable;
use crate::resolver::track::Track;
use crate::services::catalog::Catalog;

/// An element of a [`Queue`]: either a single item or a nested queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<T> {
    Item(T),
    Queue(Queue<T>),
}

/// Ordered container of resolvers or resolved tracks. Insertion order is the
/// order of the final playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Queue<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.entries.push(Entry::Item(item));
    }

    pub fn push_queue(&mut self, queue: Queue<T>) {
        self.entries.push(Entry::Queue(queue));
    }

    pub fn append(&mut self, entry: Entry<T>) {
        self.entries.push(entry);
    }

    pub fn get(&self, index: usize) -> Option<&Entry<T>> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry<T>> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entry<T>> {
        self.entries.iter_mut()
    }

    /// All items, depth-first, left to right.
    pub fn items<'a>(&'a self) -> Box<dyn Iterator<Item = &'a T> + 'a> {
        Box::new(self.entries.iter().flat_map(
            |entry| -> Box<dyn Iterator<Item = &'a T> + 'a> {
                match entry {
                    Entry::Item(item) => Box::new(std::iter::once(item)),
                    Entry::Queue(queue) => queue.items(),
                }
            },
        ))
    }

    /// Applies `f` to every item, keeping the nesting.
    pub fn map<U, F>(&self, mut f: F) -> Queue<U>
    where
        F: FnMut(&T) -> U,
    {
        self.map_with(&mut f)
    }

    fn map_with<U, F>(&self, f: &mut F) -> Queue<U>
    where
        F: FnMut(&T) -> U,
    {
        let entries = self
            .entries
            .iter()
            .map(|entry| match entry {
                Entry::Item(item) => Entry::Item(f(item)),
                Entry::Queue(queue) => Entry::Queue(queue.map_with(f)),
            })
            .collect();
        Queue { entries }
    }

    /// `self` followed by `other`.
    pub fn concat(&self, other: &Queue<T>) -> Queue<T>
    where
        T: Clone,
    {
        let mut entries = self.entries.clone();
        entries.extend(other.entries.iter().cloned());
        Queue { entries }
    }

    /// Stable in-place sort.
    pub fn sort_by<F>(&mut self, compare: F) -> &mut Self
    where
        F: FnMut(&Entry<T>, &Entry<T>) -> Ordering,
    {
        self.entries.sort_by(compare);
        self
    }

    /// Replaces every nested queue with its own (flattened) entries, in place.
    pub fn flatten(&mut self) -> &mut Self {
        let entries = std::mem::take(&mut self.entries);
        for entry in entries {
            match entry {
                Entry::Item(item) => self.entries.push(Entry::Item(item)),
                Entry::Queue(mut queue) => {
                    queue.flatten();
                    self.entries.append(&mut queue.entries);
                }
            }
        }
        self
    }

    /// Consumes the queue into its items, depth-first.
    pub fn into_items(mut self) -> Vec<T> {
        self.flatten();
        self.entries
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Item(item) => Some(item),
                Entry::Queue(_) => None,
            })
            .collect()
    }
}

impl<T: Resolvable> Queue<T> {
    /// Dispatches every entry one at a time, in order, collecting the results
    /// in a new queue. Never more than one entry is in flight.
    pub fn dispatch<'a>(
        &'a mut self,
        catalog: &'a Catalog,
    ) -> BoxFuture<'a, Result<Queue<Track>, ResolveError>> {
        async move {
            let mut result = Queue::new();
            for entry in self.entries.iter_mut() {
                let outcome = match entry {
                    Entry::Item(item) => item.dispatch(catalog).await,
                    Entry::Queue(queue) => queue.dispatch(catalog).await.map(Entry::Queue),
                };

                match outcome {
                    Ok(resolved) => result.append(resolved),
                    Err(error) => match catalog.failure_policy() {
                        FailurePolicy::AbortAll => return Err(error),
                        FailurePolicy::SkipAndContinue => {
                            let description = match entry {
                                Entry::Item(item) => item.to_string(),
                                Entry::Queue(_) => "nested queue".to_string(),
                            };
                            log::warn!("Skipping \"{}\": {}", description, error);
                        }
                    },
                }
            }
            Ok(result)
        }
        .boxed()
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Queue {
            entries: iter.into_iter().map(Entry::Item).collect(),
        }
    }
}

impl<T> IntoIterator for Queue<T> {
    type Item = Entry<T>;
    type IntoIter = std::vec::IntoIter<Entry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
