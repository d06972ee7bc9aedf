use log::debug;

use crate::config::*;
use crate::order_stats::mid_rank;

/// The percentile of `value` in a sorted list: its mid-rank divided by the
/// length of the list.
///
/// The list must be sorted and must contain `value`. The result is then in (0, 1],
/// and equal to 1 for the unique largest value.
pub fn item_percentile(value: f64, list: &List) -> Result<f64, RraError> {
    if list.is_empty() {
        return Err(RraError::EmptyList(list.name.clone()));
    }
    if !list.is_sorted() {
        return Err(RraError::UnsortedList(list.name.clone()));
    }
    Ok(mid_rank(value, list.values()) / list.len() as f64)
}

/// Sorts every list, then fills the percentile of every item of every group.
pub fn assign_percentiles(groups: &mut [Group], lists: &mut [List]) -> Result<(), RraError> {
    for list in lists.iter_mut() {
        if list.is_empty() {
            return Err(RraError::EmptyList(list.name.clone()));
        }
        list.sort();
    }
    for group in groups.iter_mut() {
        for item in group.items.iter_mut() {
            let list = lists
                .get(item.list_index)
                .ok_or_else(|| RraError::InvalidListIndex {
                    item: item.name.clone(),
                    list_index: item.list_index,
                })?;
            item.percentile = item_percentile(item.value, list)?;
        }
        debug!(
            "assign_percentiles: group {}: {:?}",
            group.name,
            group.percentiles()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(name: &str, values: &[f64]) -> List {
        let mut l = List::new(name);
        for v in values {
            l.push(*v);
        }
        l.sort();
        l
    }

    #[test]
    fn middle_of_five() {
        let l = list_of("screen", &[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(item_percentile(30.0, &l), Ok(0.6));
    }

    #[test]
    fn extremes_are_bounded() {
        let l = list_of("screen", &[50.0, 10.0, 40.0, 20.0, 30.0]);
        assert_eq!(item_percentile(50.0, &l), Ok(1.0));
        assert_eq!(item_percentile(10.0, &l), Ok(0.2));
    }

    #[test]
    fn ties_share_the_mid_rank() {
        let l = list_of("screen", &[1.0, 2.0, 2.0, 3.0]);
        let p = item_percentile(2.0, &l).unwrap();
        // Ranks 2 and 3 averaged over 4 values.
        assert_eq!(p, 2.5 / 4.0);
    }

    #[test]
    fn unsorted_list_is_rejected() {
        let mut l = List::new("screen");
        l.push(3.0);
        l.push(1.0);
        assert_eq!(
            item_percentile(1.0, &l),
            Err(RraError::UnsortedList("screen".to_string()))
        );
    }

    #[test]
    fn empty_list_is_rejected() {
        let l = List::new("empty");
        assert_eq!(
            item_percentile(1.0, &l),
            Err(RraError::EmptyList("empty".to_string()))
        );
    }

    #[test]
    fn assign_fills_every_item() {
        let mut lists = vec![List::new("a"), List::new("b")];
        let mut g = Group::new("gene");
        for (li, v) in [(0, 3.0), (0, 1.0), (1, 7.0)] {
            lists[li].push(v);
            g.items.push(Item {
                name: format!("sg{}", v),
                list_index: li,
                value: v,
                percentile: 0.0,
            });
        }
        lists[1].push(5.0);
        let mut groups = vec![g];
        assign_percentiles(&mut groups, &mut lists).unwrap();
        assert!(lists.iter().all(|l| l.is_sorted()));
        assert_eq!(groups[0].percentiles(), vec![1.0, 0.5, 1.0]);
        for p in groups[0].percentiles() {
            assert!(p > 0.0 && p <= 1.0);
        }
    }

    #[test]
    fn dangling_list_index() {
        let mut lists = vec![list_of("a", &[1.0])];
        let mut g = Group::new("gene");
        g.items.push(Item {
            name: "sg".to_string(),
            list_index: 3,
            value: 1.0,
            percentile: 0.0,
        });
        let res = assign_percentiles(&mut [g], &mut lists);
        assert_eq!(
            res,
            Err(RraError::InvalidListIndex {
                item: "sg".to_string(),
                list_index: 3
            })
        );
    }
}
