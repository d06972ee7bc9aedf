use std::collections::HashMap;

pub use crate::config::*;

/// A builder for assembling groups and lists, one item at a time.
///
/// Groups and lists are created the first time their name is seen, and keep
/// that order.
///
/// ```
/// pub use robust_rank::builder::Builder;
/// pub use robust_rank::RraOptions;
/// # use robust_rank::RraError;
///
/// let mut builder = Builder::new(&RraOptions::DEFAULT_OPTIONS)?;
///
/// builder.add_item("sgA1", "geneA", "screen1", -2.5)?;
/// builder.add_item("sgA2", "geneA", "screen2", -1.0)?;
/// builder.add_item("sgB1", "geneB", "screen1", 0.3)?;
///
/// let dataset = builder.build()?;
/// assert_eq!(dataset.groups.len(), 2);
/// assert_eq!(dataset.lists.len(), 2);
///
/// # Ok::<(), RraError>(())
/// ```
pub struct Builder {
    pub(crate) _options: RraOptions,
    pub(crate) _groups: Vec<Group>,
    pub(crate) _lists: Vec<List>,
    group_index: HashMap<String, usize>,
    list_index: HashMap<String, usize>,
}

impl Builder {
    pub fn new(options: &RraOptions) -> Result<Builder, RraError> {
        options.validate()?;
        Ok(Builder {
            _options: options.clone(),
            _groups: Vec::new(),
            _lists: Vec::new(),
            group_index: HashMap::new(),
            list_index: HashMap::new(),
        })
    }

    /// Adds one measurement.
    ///
    /// Fails when the value is not finite, or when a new group or a new list
    /// would exceed the limits of the options.
    pub fn add_item(
        &mut self,
        item_name: &str,
        group_name: &str,
        list_name: &str,
        value: f64,
    ) -> Result<(), RraError> {
        if !value.is_finite() {
            return Err(RraError::InvalidValue {
                item: item_name.to_string(),
                value,
            });
        }
        let group_idx = match self.group_index.get(group_name) {
            Some(idx) => *idx,
            None => {
                if self._groups.len() >= self._options.max_groups {
                    return Err(RraError::TooManyGroups(self._options.max_groups));
                }
                self._groups.push(Group::new(group_name));
                self.group_index
                    .insert(group_name.to_string(), self._groups.len() - 1);
                self._groups.len() - 1
            }
        };
        let list_idx = match self.list_index.get(list_name) {
            Some(idx) => *idx,
            None => {
                if self._lists.len() >= self._options.max_lists {
                    return Err(RraError::TooManyLists(self._options.max_lists));
                }
                self._lists.push(List::new(list_name));
                self.list_index
                    .insert(list_name.to_string(), self._lists.len() - 1);
                self._lists.len() - 1
            }
        };

        self._groups[group_idx].items.push(Item {
            name: item_name.to_string(),
            list_index: list_idx,
            value,
            percentile: 0.0,
        });
        self._lists[list_idx].push(value);
        Ok(())
    }

    pub fn num_groups(&self) -> usize {
        self._groups.len()
    }

    pub fn num_lists(&self) -> usize {
        self._lists.len()
    }

    pub fn build(self) -> Result<Dataset, RraError> {
        if self._groups.is_empty() {
            return Err(RraError::EmptyDataset);
        }
        Ok(Dataset {
            groups: self._groups,
            lists: self._lists,
        })
    }
}
